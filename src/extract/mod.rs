//! Product attribute extraction
//!
//! This module turns raw pages into structured data:
//! - Listing pages into canonical detail links ([`parse_listing`])
//! - Detail pages into [`Product`] records ([`extract_product`])
//!
//! Extraction is tolerant per field. A field that cannot be found or parsed
//! falls back to zero (or an empty name) and the product is still produced.

mod fields;
mod listing;

pub use fields::{
    parse_dimensions, parse_price, parse_rank, parse_reviews, parse_weight, strip_grouping,
    Dimensions,
};
pub use listing::{canonical_link, parse_listing, ListingEntry};

use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};

static TITLE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("#productTitle").expect("Title selector is hardcoded and valid"));

static SALE_PRICE_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("#priceblock_saleprice").expect("Sale price selector is hardcoded and valid")
});

static LIST_PRICE_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("#priceblock_ourprice").expect("List price selector is hardcoded and valid")
});

static REVIEWS_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("#acrCustomerReviewText").expect("Reviews selector is hardcoded and valid")
});

static CONTAINER_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("#dp-container").expect("Container selector is hardcoded and valid")
});

/// A product as delivered to the consumer
///
/// Zero (or an empty name) means the attribute was not found on the page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub name: String,
    /// Canonical detail page link
    pub link: String,
    pub price: f64,
    /// Best-seller rank, lower is more popular
    pub rank: u64,
    pub review_count: u64,
    pub length: f64,
    pub width: f64,
    pub height: f64,
    pub weight: f64,
}

/// Extracts every attribute of a detail page
///
/// Never fails: missing attributes are logged at debug level and left at
/// their zero value.
///
/// # Arguments
///
/// * `html` - The detail page body
/// * `link` - The canonical link the page was fetched from
pub fn extract_product(html: &str, link: &str) -> Product {
    let document = Html::parse_document(html);

    let name = select_text(&document, &TITLE_SELECTOR).unwrap_or_default();
    if name.is_empty() {
        tracing::debug!("No product title on {}", link);
    }

    let price = price_text(&document)
        .and_then(|text| {
            let price = parse_price(&text);
            if price.is_none() {
                tracing::debug!("Unparseable price '{}' on {}", text, link);
            }
            price
        })
        .unwrap_or_else(|| {
            tracing::debug!("No price on {}", link);
            0.0
        });

    let review_count = select_text(&document, &REVIEWS_SELECTOR)
        .and_then(|text| parse_reviews(&text))
        .unwrap_or_else(|| {
            tracing::debug!("No review count on {}", link);
            0
        });

    // Rank, dimensions and weight live somewhere in the product details block
    let container = strip_grouping(&container_text(&document));

    let rank = parse_rank(&container).unwrap_or_else(|| {
        tracing::debug!("No best-seller rank on {}", link);
        0
    });

    let dimensions = parse_dimensions(&container).unwrap_or_else(|| {
        tracing::debug!("No dimensions on {}", link);
        Dimensions::default()
    });

    let weight = parse_weight(&container).unwrap_or_else(|| {
        tracing::debug!("No weight on {}", link);
        0.0
    });

    Product {
        name,
        link: link.to_string(),
        price,
        rank,
        review_count,
        length: dimensions.length,
        width: dimensions.width,
        height: dimensions.height,
        weight,
    }
}

/// Returns the sale price text if present, otherwise the regular price text
fn price_text(document: &Html) -> Option<String> {
    select_text(document, &SALE_PRICE_SELECTOR)
        .filter(|text| !text.is_empty())
        .or_else(|| select_text(document, &LIST_PRICE_SELECTOR))
        .filter(|text| !text.is_empty())
}

/// Trimmed text of the first element matching `selector`
fn select_text(document: &Html, selector: &Selector) -> Option<String> {
    document
        .select(selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
}

/// Text of the details container, or of the whole page when it is missing
///
/// Text nodes are joined with spaces so adjacent cells do not fuse numbers.
fn container_text(document: &Html) -> String {
    match document.select(&CONTAINER_SELECTOR).next() {
        Some(container) => container.text().collect::<Vec<_>>().join(" "),
        None => document.root_element().text().collect::<Vec<_>>().join(" "),
    }
}
