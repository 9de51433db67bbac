//! Category catalog
//!
//! The catalog is an immutable table of top-level categories, each holding the
//! subcategories whose best-seller listings get crawled. It is built once at
//! startup from the built-in table plus any subcategories declared in the
//! configuration, and never changes afterwards.

mod builtin;

use crate::config::Config;
use crate::{ConfigError, OptionsError, SurferError, UrlError, UrlResult};
use std::collections::BTreeMap;
use url::Url;

/// A top-level catalog category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub id: u8,
    pub name: String,
    pub slug: String,
    pub subcategories: Vec<Subcategory>,
}

/// A subcategory with its own best-seller listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subcategory {
    pub id: u64,
    pub slug: String,
}

/// The frozen category table plus the host listings are built on
#[derive(Debug, Clone)]
pub struct Catalog {
    host: Url,
    categories: Vec<Category>,
}

impl Catalog {
    /// Creates a catalog from an explicit category list
    pub fn new(host: Url, categories: Vec<Category>) -> Self {
        Self { host, categories }
    }

    /// Creates the built-in catalog on the given host
    pub fn builtin(host: Url) -> Self {
        let categories = builtin::CATEGORIES
            .iter()
            .map(|&(id, name, slug)| Category {
                id,
                name: name.to_string(),
                slug: slug.to_string(),
                subcategories: builtin::SUBCATEGORIES
                    .iter()
                    .filter(|&&(parent, _, _)| parent == id)
                    .map(|&(_, sub_id, sub_slug)| Subcategory {
                        id: sub_id,
                        slug: sub_slug.to_string(),
                    })
                    .collect(),
            })
            .collect();

        Self::new(host, categories)
    }

    /// Builds the catalog described by the configuration
    ///
    /// Starts from the built-in table and attaches every configured extra
    /// subcategory to its parent. A subcategory already present is not added
    /// twice.
    pub fn from_config(config: &Config) -> Result<Self, SurferError> {
        let host = Url::parse(&config.crawler.host)?;
        let mut catalog = Self::builtin(host);

        for extra in &config.catalog.subcategory {
            let parent = catalog
                .categories
                .iter_mut()
                .find(|c| c.id == extra.category)
                .ok_or_else(|| {
                    ConfigError::Validation(format!(
                        "Subcategory '{}' refers to unknown category {}",
                        extra.slug, extra.category
                    ))
                })?;

            let sub = Subcategory {
                id: extra.id,
                slug: extra.slug.clone(),
            };
            if !parent.subcategories.contains(&sub) {
                parent.subcategories.push(sub);
            }
        }

        Ok(catalog)
    }

    /// The host every listing and detail link is built on
    pub fn host(&self) -> &Url {
        &self.host
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn get(&self, id: u8) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    /// Returns `{id -> name}` for every category, for selection menus
    pub fn list_categories(&self) -> BTreeMap<u8, String> {
        self.categories
            .iter()
            .map(|c| (c.id, c.name.clone()))
            .collect()
    }

    /// Resolves selected ids into categories
    ///
    /// Any id missing from the catalog rejects the whole selection. Repeated
    /// ids are collapsed, keeping the first occurrence.
    pub fn select(&self, ids: &[u8]) -> Result<Vec<&Category>, OptionsError> {
        let mut selected: Vec<&Category> = Vec::with_capacity(ids.len());

        for &id in ids {
            let category = self.get(id).ok_or(OptionsError::UnknownCategory(id))?;
            if !selected.iter().any(|c| c.id == id) {
                selected.push(category);
            }
        }

        Ok(selected)
    }

    /// Expands categories into their subcategory listing URLs
    ///
    /// Categories without subcategories contribute nothing and are reported
    /// as a warning. A subcategory whose URL cannot be built is logged and
    /// skipped; the other links are unaffected.
    pub fn expand_to_links(&self, categories: &[&Category]) -> Vec<Url> {
        let mut links = Vec::new();

        for category in categories {
            if category.subcategories.is_empty() {
                tracing::warn!(
                    "Category '{}' ({}) has no subcategories, nothing to crawl",
                    category.name,
                    category.id
                );
                continue;
            }

            for sub in &category.subcategories {
                match listing_url(&self.host, &category.slug, sub) {
                    Ok(url) => links.push(url),
                    Err(e) => tracing::error!(
                        "Cannot build listing URL for subcategory {} of '{}': {}",
                        sub.id,
                        category.name,
                        e
                    ),
                }
            }
        }

        links
    }
}

/// Builds the best-seller listing URL of one subcategory
///
/// Layout: `{host}/{subcategory slug}/zgbs/{category slug}/{subcategory id}`
///
/// # Example
///
/// ```
/// use shelf_surfer::catalog::{listing_url, Subcategory};
/// use url::Url;
///
/// let host = Url::parse("https://www.amazon.com").unwrap();
/// let sub = Subcategory { id: 3741261, slug: "Best-Sellers-Appliances-Cooktops".into() };
/// let url = listing_url(&host, "appliances", &sub).unwrap();
/// assert_eq!(
///     url.as_str(),
///     "https://www.amazon.com/Best-Sellers-Appliances-Cooktops/zgbs/appliances/3741261"
/// );
/// ```
pub fn listing_url(host: &Url, category_slug: &str, sub: &Subcategory) -> UrlResult<Url> {
    if sub.slug.is_empty() || category_slug.is_empty() {
        return Err(UrlError::Malformed(format!(
            "empty slug in subcategory {}",
            sub.id
        )));
    }

    let mut url = host.clone();
    url.set_query(None);
    url.set_fragment(None);

    let id = sub.id.to_string();
    url.path_segments_mut()
        .map_err(|_| UrlError::Malformed(format!("host '{}' cannot carry a path", host)))?
        .pop_if_empty()
        .extend([sub.slug.as_str(), "zgbs", category_slug, id.as_str()]);

    Ok(url)
}
