//! JSON lines product output

use super::traits::{OutputResult, ProductSink};
use crate::crawler::RunSummary;
use crate::Product;
use serde::Serialize;
use std::io::Write;

/// Writes one JSON object per accepted product
///
/// Each line is flushed as soon as it is written so a downstream reader sees
/// products while the run is still going. The run totals follow as a final
/// `{"summary": ...}` line.
pub struct JsonLinesSink<W: Write> {
    writer: W,
    written: u64,
}

#[derive(Serialize)]
struct Trailer<'a> {
    summary: &'a crate::crawler::RunTotals,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, written: 0 }
    }

    /// Products written so far
    pub fn written(&self) -> u64 {
        self.written
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> ProductSink for JsonLinesSink<W> {
    fn accept(&mut self, product: &Product) -> OutputResult<()> {
        serde_json::to_writer(&mut self.writer, product)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        self.written += 1;
        Ok(())
    }

    fn finish(&mut self, summary: &RunSummary) -> OutputResult<()> {
        let totals = summary.totals();
        serde_json::to_writer(&mut self.writer, &Trailer { summary: &totals })?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }
}
