//! Output sink trait and errors
//!
//! A sink receives every accepted product of a run as it arrives, then the
//! run summary once the stream has closed.

use crate::crawler::RunSummary;
use crate::Product;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to format output: {0}")]
    Format(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Trait for product sinks
///
/// Sinks are driven from a single consumer task, so they take `&mut self`
/// and need not be thread-safe.
pub trait ProductSink {
    /// Records one accepted product
    ///
    /// # Arguments
    ///
    /// * `product` - The product, in delivery order
    fn accept(&mut self, product: &Product) -> OutputResult<()>;

    /// Finalizes the output, performing any final writes
    ///
    /// # Arguments
    ///
    /// * `summary` - The summary of the finished run
    fn finish(&mut self, summary: &RunSummary) -> OutputResult<()>;
}
