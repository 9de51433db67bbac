//! Mapping of flat caller input into [`CrawlOptions`]

use super::{Bounds, CrawlOptions, UnknownPolicy};
use crate::catalog::Catalog;
use crate::OptionsError;
use std::str::FromStr;

/// Field names accepted by [`OptionsForm`]
pub mod fields {
    pub const CATEGORIES: &str = "categories";
    pub const MIN_PRICE: &str = "min-price";
    pub const MAX_PRICE: &str = "max-price";
    pub const MIN_RANK: &str = "min-rank";
    pub const MAX_RANK: &str = "max-rank";
    pub const MIN_REVIEWS: &str = "min-reviews";
    pub const MAX_REVIEWS: &str = "max-reviews";
    pub const MAX_LENGTH: &str = "max-length";
    pub const MAX_WIDTH: &str = "max-width";
    pub const MAX_HEIGHT: &str = "max-height";
    pub const MAX_WEIGHT: &str = "max-weight";
    pub const TOLERANCE: &str = "tolerance";
    pub const UNKNOWN: &str = "unknown";
}

/// Flat named string fields, as submitted by a search form or the CLI
///
/// `categories` may repeat. For every other field the first value is used;
/// absent or blank fields leave the criterion unbounded.
#[derive(Debug, Clone, Default)]
pub struct OptionsForm {
    values: Vec<(String, String)>,
}

impl OptionsForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one field value
    pub fn push(&mut self, field: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.values.push((field.into(), value.into()));
        self
    }

    /// First non-blank value of a field
    fn get(&self, field: &str) -> Option<&str> {
        self.values
            .iter()
            .filter(|(name, _)| name == field)
            .map(|(_, value)| value.trim())
            .find(|value| !value.is_empty())
    }

    /// All non-blank values of a field
    fn get_all<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.values
            .iter()
            .filter(move |(name, _)| name == field)
            .map(|(_, value)| value.trim())
            .filter(|value| !value.is_empty())
    }

    /// Maps the form into validated crawl options
    ///
    /// Fails on the first malformed field, on category ids missing from
    /// `catalog`, and on inverted ranges. Nothing is fetched here.
    pub fn into_options(&self, catalog: &Catalog) -> Result<CrawlOptions, OptionsError> {
        let categories = self
            .get_all(fields::CATEGORIES)
            .map(|value| parse_field::<u8>(fields::CATEGORIES, value))
            .collect::<Result<Vec<_>, _>>()?;

        if categories.is_empty() {
            return Err(OptionsError::NoCategories);
        }

        let categories = catalog
            .select(&categories)?
            .into_iter()
            .map(|category| category.id)
            .collect();

        let price = Bounds::new(
            self.amount(fields::MIN_PRICE)?,
            self.amount(fields::MAX_PRICE)?,
        );
        check_order("price", &price)?;

        let rank = Bounds::new(self.count(fields::MIN_RANK)?, self.count(fields::MAX_RANK)?);
        check_order("rank", &rank)?;

        let reviews = Bounds::new(
            self.count(fields::MIN_REVIEWS)?,
            self.count(fields::MAX_REVIEWS)?,
        );
        check_order("reviews", &reviews)?;

        let unknown = match self.get(fields::UNKNOWN) {
            None => UnknownPolicy::default(),
            Some(value) if value.eq_ignore_ascii_case("check") => UnknownPolicy::Check,
            Some(value) if value.eq_ignore_ascii_case("accept") => UnknownPolicy::Accept,
            Some(value) => {
                return Err(OptionsError::Field {
                    field: fields::UNKNOWN,
                    value: value.to_string(),
                    reason: "expected 'check' or 'accept'".to_string(),
                })
            }
        };

        Ok(CrawlOptions {
            categories,
            price,
            rank,
            reviews,
            max_length: self.amount(fields::MAX_LENGTH)?,
            max_width: self.amount(fields::MAX_WIDTH)?,
            max_height: self.amount(fields::MAX_HEIGHT)?,
            max_weight: self.amount(fields::MAX_WEIGHT)?,
            tolerance: self.amount(fields::TOLERANCE)?.unwrap_or(0.0),
            unknown,
        })
    }

    /// Parses a non-negative finite decimal field
    fn amount(&self, field: &'static str) -> Result<Option<f64>, OptionsError> {
        let Some(value) = self.get(field) else {
            return Ok(None);
        };

        let amount = parse_field::<f64>(field, value)?;
        if !amount.is_finite() || amount < 0.0 {
            return Err(OptionsError::Field {
                field,
                value: value.to_string(),
                reason: "must be a non-negative number".to_string(),
            });
        }

        Ok(Some(amount))
    }

    /// Parses a non-negative integer field
    fn count(&self, field: &'static str) -> Result<Option<u64>, OptionsError> {
        self.get(field)
            .map(|value| parse_field::<u64>(field, value))
            .transpose()
    }
}

impl<K, V> FromIterator<(K, V)> for OptionsForm
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut form = Self::new();
        for (field, value) in iter {
            form.push(field, value);
        }
        form
    }
}

fn parse_field<T>(field: &'static str, value: &str) -> Result<T, OptionsError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.parse::<T>().map_err(|e| OptionsError::Field {
        field,
        value: value.to_string(),
        reason: e.to_string(),
    })
}

fn check_order<T: PartialOrd + Copy>(
    field: &'static str,
    bounds: &Bounds<T>,
) -> Result<(), OptionsError> {
    match (bounds.min, bounds.max) {
        (Some(min), Some(max)) if min > max => Err(OptionsError::InvertedRange { field }),
        _ => Ok(()),
    }
}
