//! Per-field attribute parsers
//!
//! Each parser takes a piece of page text and returns `None` when the text
//! does not carry the field. They never fail loudly and never depend on each
//! other, so one malformed attribute cannot spoil the rest of a product.
//!
//! Rank, dimensions and weight expect digit-grouping commas to be stripped
//! beforehand (see [`strip_grouping`]).

use once_cell::sync::Lazy;
use regex::Regex;

static REVIEWS_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(\d[\d,]*)\s+customer\s+reviews?\b")
        .expect("Reviews regex is hardcoded and valid")
});

static RANK_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"#(\d+)\s+in\s+\S").expect("Rank regex is hardcoded and valid")
});

static DIMENSIONS_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(\d+(?:\.\d+)?)\s+x\s+(\d+(?:\.\d+)?)\s+x\s+(\d+(?:\.\d+)?)\s+inches")
        .expect("Dimensions regex is hardcoded and valid")
});

static WEIGHT_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*(?:ounces|pounds)\b")
        .expect("Weight regex is hardcoded and valid")
});

/// Physical dimensions in inches, in the order the page lists them
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Dimensions {
    pub length: f64,
    pub width: f64,
    pub height: f64,
}

/// Removes digit-grouping commas so numbers like `1,234` match as one token
pub fn strip_grouping(text: &str) -> String {
    text.replace(',', "")
}

/// Parses a displayed price
///
/// The text must start with `$`. A range such as `$10.00 - $15.99` yields the
/// mean of both bounds.
///
/// # Examples
///
/// ```
/// use shelf_surfer::extract::parse_price;
///
/// assert_eq!(parse_price("$19.99"), Some(19.99));
/// assert_eq!(parse_price("$1,299.00"), Some(1299.0));
/// assert_eq!(parse_price("19.99"), None);
/// ```
pub fn parse_price(text: &str) -> Option<f64> {
    let text = text.trim();
    if !text.starts_with('$') {
        return None;
    }

    match text.split_once('-') {
        Some((low, high)) => {
            let low = parse_amount(low)?;
            let high = parse_amount(high)?;
            Some((low + high) / 2.0)
        }
        None => parse_amount(text),
    }
}

/// Parses a single `$` amount, dropping thousands separators
fn parse_amount(text: &str) -> Option<f64> {
    let digits = text.trim().strip_prefix('$')?.trim().replace(',', "");
    digits
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite() && *value >= 0.0)
}

/// Parses `<N> customer review[s]`
pub fn parse_reviews(text: &str) -> Option<u64> {
    let caps = REVIEWS_PATTERN.captures(text)?;
    caps[1].replace(',', "").parse().ok()
}

/// Parses the first `#<N> in <category>` best-seller rank
pub fn parse_rank(text: &str) -> Option<u64> {
    let caps = RANK_PATTERN.captures(text)?;
    caps[1].parse().ok()
}

/// Parses the first `<l> x <w> x <h> inches` triple
pub fn parse_dimensions(text: &str) -> Option<Dimensions> {
    let caps = DIMENSIONS_PATTERN.captures(text)?;
    Some(Dimensions {
        length: caps[1].parse().ok()?,
        width: caps[2].parse().ok()?,
        height: caps[3].parse().ok()?,
    })
}

/// Parses the shipping weight
///
/// Item weight is listed before shipping weight, so the last
/// `<num> ounces|pounds` occurrence wins. The number is returned as written.
pub fn parse_weight(text: &str) -> Option<f64> {
    WEIGHT_PATTERN
        .captures_iter(text)
        .last()
        .and_then(|caps| caps[1].parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_price() {
        assert_eq!(parse_price("$19.99"), Some(19.99));
        assert_eq!(parse_price("  $7  "), Some(7.0));
    }

    #[test]
    fn test_parse_price_range_is_mean() {
        let price = parse_price("$10.00 - $15.99").unwrap();
        assert!((price - 12.995).abs() < 1e-9);
    }

    #[test]
    fn test_parse_price_thousands() {
        assert_eq!(parse_price("$1,299.99"), Some(1299.99));
        assert_eq!(parse_price("$1,000.00 - $3,000.00"), Some(2000.0));
    }

    #[test]
    fn test_parse_price_rejects_garbage() {
        assert_eq!(parse_price(""), None);
        assert_eq!(parse_price("19.99"), None);
        assert_eq!(parse_price("EUR 19.99"), None);
        assert_eq!(parse_price("$"), None);
        assert_eq!(parse_price("$abc"), None);
        assert_eq!(parse_price("$10 - "), None);
        assert_eq!(parse_price("$1 - $2 - $3"), None);
    }

    #[test]
    fn test_parse_reviews() {
        assert_eq!(parse_reviews("150 customer reviews"), Some(150));
        assert_eq!(parse_reviews("1 customer review"), Some(1));
        assert_eq!(parse_reviews("12,345 customer reviews"), Some(12345));
        assert_eq!(parse_reviews("150 ratings"), None);
        assert_eq!(parse_reviews(""), None);
    }

    #[test]
    fn test_parse_rank() {
        assert_eq!(
            parse_rank("Best Sellers Rank #45 in Kitchen (See Top 100 in Kitchen)"),
            Some(45)
        );
        assert_eq!(parse_rank("#1234 in Appliances #2 in Cooktops"), Some(1234));
        assert_eq!(parse_rank("Rank unavailable"), None);
        assert_eq!(parse_rank("#abc in Kitchen"), None);
    }

    #[test]
    fn test_parse_dimensions() {
        let dims = parse_dimensions("Product Dimensions: 12.3 x 14 x 23 inches ; 4 pounds").unwrap();
        assert_eq!(dims.length, 12.3);
        assert_eq!(dims.width, 14.0);
        assert_eq!(dims.height, 23.0);
    }

    #[test]
    fn test_parse_dimensions_missing() {
        assert_eq!(parse_dimensions("12.3 x 14 inches"), None);
        assert_eq!(parse_dimensions("12 x 14 x 23 cm"), None);
        // Unspaced figures are usually part of a model name
        assert_eq!(parse_dimensions("Shelf Kit 2x4x6inches"), None);
        assert_eq!(parse_dimensions(""), None);
    }

    #[test]
    fn test_parse_weight_last_match_wins() {
        let text = "Item Weight: 1.2 pounds Shipping Weight: 2.5 pounds (View shipping rates)";
        assert_eq!(parse_weight(text), Some(2.5));
    }

    #[test]
    fn test_parse_weight_ounces() {
        assert_eq!(parse_weight("Shipping Weight: 12 ounces"), Some(12.0));
    }

    #[test]
    fn test_parse_weight_missing() {
        assert_eq!(parse_weight("Weight unknown"), None);
    }

    #[test]
    fn test_strip_grouping() {
        assert_eq!(strip_grouping("#1,234 in Books"), "#1234 in Books");
        assert_eq!(parse_rank(&strip_grouping("#1,234 in Books")), Some(1234));
    }
}
