//! Crawl options and the product validity filter
//!
//! [`CrawlOptions`] holds the caller's criteria for one run. It is usually
//! built from flat string fields through [`OptionsForm`], which reports
//! malformed input before any crawling starts. [`is_valid`] then decides for
//! each extracted product whether it reaches the output stream.

mod form;

pub use form::{fields, OptionsForm};

/// How zero-valued (unknown) price, rank and review counts are judged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownPolicy {
    /// Zero is checked like any other value against bounds the caller set
    #[default]
    Check,

    /// Zero means "not found" and always passes the corresponding check
    Accept,
}

impl UnknownPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Check => "check",
            Self::Accept => "accept",
        }
    }
}

/// An inclusive range where either end may be left open
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds<T> {
    pub min: Option<T>,
    pub max: Option<T>,
}

impl<T: PartialOrd + Copy> Bounds<T> {
    pub fn new(min: Option<T>, max: Option<T>) -> Self {
        Self { min, max }
    }

    /// Returns true when neither end is set
    pub fn is_open(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    pub fn contains(&self, value: T) -> bool {
        self.min.map_or(true, |min| value >= min) && self.max.map_or(true, |max| value <= max)
    }
}

/// Filter criteria for one crawl run
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CrawlOptions {
    /// Selected catalog category ids
    pub categories: Vec<u8>,
    pub price: Bounds<f64>,
    pub rank: Bounds<u64>,
    pub reviews: Bounds<u64>,
    pub max_length: Option<f64>,
    pub max_width: Option<f64>,
    pub max_height: Option<f64>,
    pub max_weight: Option<f64>,
    /// Fraction a dimension or weight may exceed its ceiling by
    pub tolerance: f64,
    pub unknown: UnknownPolicy,
}

impl CrawlOptions {
    /// Options selecting `categories` with no filtering at all
    pub fn for_categories(categories: Vec<u8>) -> Self {
        Self {
            categories,
            ..Self::default()
        }
    }

    /// Whether a ceiling holds once stretched by the tolerance
    fn within_ceiling(&self, value: f64, ceiling: Option<f64>) -> bool {
        ceiling.map_or(true, |ceiling| value <= ceiling * (1.0 + self.tolerance))
    }

    /// Checks a range, letting unknown values through under `Accept`
    fn within_bounds<T>(&self, value: T, bounds: &Bounds<T>, unknown: bool) -> bool
    where
        T: PartialOrd + Copy,
    {
        if unknown && self.unknown == UnknownPolicy::Accept {
            return true;
        }
        bounds.contains(value)
    }
}

/// Decides whether a product satisfies every criterion
///
/// All checks must pass; evaluation stops at the first failing one.
///
/// # Example
///
/// ```
/// use shelf_surfer::{is_valid, CrawlOptions, Product};
///
/// let mut options = CrawlOptions::for_categories(vec![1]);
/// options.max_weight = Some(10.0);
/// options.tolerance = 0.1;
///
/// let product = Product { weight: 11.0, ..Product::default() };
/// assert!(is_valid(&product, &options));
/// ```
pub fn is_valid(product: &crate::Product, options: &CrawlOptions) -> bool {
    options.within_bounds(product.price, &options.price, product.price == 0.0)
        && options.within_bounds(product.rank, &options.rank, product.rank == 0)
        && options.within_bounds(product.review_count, &options.reviews, product.review_count == 0)
        && options.within_ceiling(product.length, options.max_length)
        && options.within_ceiling(product.width, options.max_width)
        && options.within_ceiling(product.height, options.max_height)
        && options.within_ceiling(product.weight, options.max_weight)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Product;

    fn product() -> Product {
        Product {
            name: "Burner".to_string(),
            link: "https://www.amazon.com/Burner/dp/B01".to_string(),
            price: 25.0,
            rank: 150,
            review_count: 40,
            length: 12.0,
            width: 8.0,
            height: 4.0,
            weight: 3.0,
        }
    }

    fn options() -> CrawlOptions {
        CrawlOptions {
            categories: vec![1],
            price: Bounds::new(Some(10.0), Some(50.0)),
            rank: Bounds::new(Some(1), Some(1000)),
            reviews: Bounds::new(Some(10), Some(500)),
            max_length: Some(20.0),
            max_width: Some(20.0),
            max_height: Some(20.0),
            max_weight: Some(10.0),
            tolerance: 0.0,
            unknown: UnknownPolicy::Check,
        }
    }

    #[test]
    fn test_product_within_all_bounds() {
        assert!(is_valid(&product(), &options()));
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let mut p = product();
        p.price = 50.0;
        p.rank = 1;
        p.review_count = 10;
        p.length = 20.0;
        assert!(is_valid(&p, &options()));
    }

    #[test]
    fn test_each_range_rejects() {
        let mut p = product();
        p.price = 50.01;
        assert!(!is_valid(&p, &options()));

        let mut p = product();
        p.rank = 1001;
        assert!(!is_valid(&p, &options()));

        let mut p = product();
        p.review_count = 9;
        assert!(!is_valid(&p, &options()));

        let mut p = product();
        p.height = 20.5;
        assert!(!is_valid(&p, &options()));
    }

    #[test]
    fn test_weight_tolerance() {
        let mut p = product();
        p.weight = 11.0;

        let mut opts = options();
        opts.tolerance = 0.1;
        assert!(is_valid(&p, &opts));

        opts.tolerance = 0.05;
        assert!(!is_valid(&p, &opts));
    }

    #[test]
    fn test_tolerance_applies_to_dimensions() {
        let mut p = product();
        p.length = 21.0;

        let mut opts = options();
        assert!(!is_valid(&p, &opts));

        opts.tolerance = 0.05;
        assert!(is_valid(&p, &opts));
    }

    #[test]
    fn test_open_options_accept_everything() {
        let opts = CrawlOptions::for_categories(vec![1]);
        assert!(is_valid(&product(), &opts));
        assert!(is_valid(&Product::default(), &opts));
    }

    #[test]
    fn test_unknown_checked_against_set_bounds() {
        let mut p = product();
        p.price = 0.0;
        assert!(!is_valid(&p, &options()));

        // No price bound set: zero is not disqualifying
        let mut opts = options();
        opts.price = Bounds::default();
        assert!(is_valid(&p, &opts));
    }

    #[test]
    fn test_unknown_accept_policy() {
        let mut opts = options();
        opts.unknown = UnknownPolicy::Accept;

        let mut p = product();
        p.price = 0.0;
        p.rank = 0;
        p.review_count = 0;
        assert!(is_valid(&p, &opts));

        // Known values are still checked
        p.price = 5.0;
        assert!(!is_valid(&p, &opts));
    }

    #[test]
    fn test_unknown_dimensions_never_exceed_ceilings() {
        let mut p = product();
        p.length = 0.0;
        p.width = 0.0;
        p.height = 0.0;
        p.weight = 0.0;
        assert!(is_valid(&p, &options()));
    }

    #[test]
    fn test_bounds_helpers() {
        let open: Bounds<u64> = Bounds::default();
        assert!(open.is_open());
        assert!(open.contains(u64::MAX));

        let half = Bounds::new(Some(5u64), None);
        assert!(!half.is_open());
        assert!(half.contains(5));
        assert!(!half.contains(4));
    }
}
