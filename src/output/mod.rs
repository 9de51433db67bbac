//! Output module for consuming a run's product stream
//!
//! This module handles:
//! - Writing accepted products as JSON lines
//! - Generating a markdown report of a run
//! - Printing run statistics

mod jsonl;
mod markdown;
pub mod stats;
mod traits;

pub use jsonl::JsonLinesSink;
pub use markdown::{format_markdown_report, generate_markdown_report, MarkdownReport};
pub use stats::write_summary;
pub use traits::{OutputError, OutputResult, ProductSink};

use crate::crawler::{ProductStream, RunSummary};

/// Feeds every product of a stream to the given sinks until it closes
///
/// A failing sink aborts the drain; the caller decides whether to stop the
/// run. Returns the number of products received.
pub async fn drain(
    stream: &mut ProductStream,
    sinks: &mut [Box<dyn ProductSink + Send>],
) -> OutputResult<u64> {
    let mut received = 0;

    while let Some(product) = stream.next().await {
        received += 1;
        tracing::debug!("Received {} ({})", product.name, product.link);
        for sink in sinks.iter_mut() {
            sink.accept(&product)?;
        }
    }

    Ok(received)
}

/// Hands the finished run's summary to every sink
pub fn finish(sinks: &mut [Box<dyn ProductSink + Send>], summary: &RunSummary) -> OutputResult<()> {
    for sink in sinks.iter_mut() {
        sink.finish(summary)?;
    }
    Ok(())
}
