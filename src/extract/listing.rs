//! Listing page parsing and link canonicalization

use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use url::Url;

static ENTRY_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("div.zg_itemWrapper > div, li.zg-item-immersion")
        .expect("Entry selector is hardcoded and valid")
});

static ANCHOR_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a[href]").expect("Anchor selector is hardcoded and valid"));

/// One product entry found on a listing page
#[derive(Debug, Clone, PartialEq)]
pub struct ListingEntry {
    /// Canonical detail page link, used as the deduplication key
    pub link: Url,

    /// Anchor text of the entry, trimmed
    pub title: String,
}

/// Extracts the product entries of a best-seller listing page
///
/// Entries without a usable link are skipped. Order follows the page, and
/// duplicates within the page are kept (deduplication belongs to the walker).
pub fn parse_listing(html: &str, base: &Url) -> Vec<ListingEntry> {
    let document = Html::parse_document(html);
    let mut entries = Vec::new();

    for block in document.select(&ENTRY_SELECTOR) {
        let Some(anchor) = block.select(&ANCHOR_SELECTOR).next() else {
            tracing::debug!("Listing entry without a link on {}", base);
            continue;
        };

        let Some(href) = anchor.value().attr("href") else {
            continue;
        };

        match canonical_link(href, base) {
            Some(link) => entries.push(ListingEntry {
                link,
                title: collapse_whitespace(&anchor.text().collect::<String>()),
            }),
            None => tracing::debug!("Skipping unusable entry link '{}' on {}", href, base),
        }
    }

    entries
}

/// Normalizes a detail page href into its deduplication-safe form
///
/// The link is resolved against `base` and pinned to the base scheme, host and
/// port. Query, fragment and every path segment from the first `ref=` marker
/// onwards are dropped, so tracking variants of one product collapse to the
/// same URL.
///
/// # Example
///
/// ```
/// use shelf_surfer::extract::canonical_link;
/// use url::Url;
///
/// let base = Url::parse("https://www.amazon.com/Best-Sellers/zgbs/appliances/1").unwrap();
/// let link = canonical_link("/Burner-Cooktop/dp/B00X1/ref=zg_bs_1_3?psc=1", &base).unwrap();
/// assert_eq!(link.as_str(), "https://www.amazon.com/Burner-Cooktop/dp/B00X1");
/// ```
pub fn canonical_link(href: &str, base: &Url) -> Option<Url> {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') || href.starts_with("javascript:") {
        return None;
    }

    let mut url = base.join(href).ok()?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return None;
    }

    url.set_scheme(base.scheme()).ok()?;
    url.set_host(base.host_str()).ok()?;
    url.set_port(base.port()).ok()?;
    url.set_query(None);
    url.set_fragment(None);

    // Segments stay in their percent-encoded form
    let segments: Vec<&str> = url
        .path()
        .split('/')
        .filter(|segment| !segment.is_empty())
        .take_while(|segment| !segment.starts_with("ref="))
        .collect();

    if segments.is_empty() {
        return None;
    }

    let path = format!("/{}", segments.join("/"));
    url.set_path(&path);
    Some(url)
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
