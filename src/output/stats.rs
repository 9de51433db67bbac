//! Run statistics printing

use crate::crawler::{RunSummary, WalkOutcome};
use std::io::{self, Write};

/// Writes run statistics in a formatted manner
///
/// The binary points this at stderr so stdout stays clean for products.
///
/// # Arguments
///
/// * `out` - Where to write
/// * `summary` - The statistics to display
pub fn write_summary(out: &mut impl Write, summary: &RunSummary) -> io::Result<()> {
    writeln!(out, "=== Run Statistics ===\n")?;

    writeln!(out, "Overview:")?;
    writeln!(out, "  Listing links: {}", summary.links)?;
    writeln!(out, "  Listing pages fetched: {}", summary.pages())?;
    writeln!(out, "  Detail pages fetched: {}", summary.detail_pages())?;
    writeln!(
        out,
        "  Duration: {}s{}",
        summary.duration().num_seconds().max(0),
        if summary.cancelled { " (stopped)" } else { "" }
    )?;
    writeln!(out)?;

    writeln!(out, "Products:")?;
    writeln!(out, "  Accepted: {}", summary.accepted())?;
    writeln!(out, "  Rejected: {}", summary.rejected())?;
    writeln!(out, "  Failed: {}", summary.failed())?;
    writeln!(out)?;

    let cancelled: Vec<_> = summary
        .reports
        .iter()
        .filter(|r| r.outcome == WalkOutcome::Cancelled)
        .collect();
    if !cancelled.is_empty() || summary.skipped() > 0 {
        writeln!(out, "Interrupted Links ({}):", cancelled.len())?;
        for report in cancelled {
            writeln!(out, "  - {} after {} pages", report.link, report.pages)?;
        }
        if summary.skipped() > 0 {
            writeln!(out, "  {} links were never started", summary.skipped())?;
        }
        writeln!(out)?;
    }

    let examined = summary.accepted() + summary.rejected();
    let acceptance = if examined > 0 {
        (summary.accepted() as f64 / examined as f64) * 100.0
    } else {
        0.0
    };

    writeln!(
        out,
        "Acceptance Rate: {:.1}% ({} / {} products matched)",
        acceptance,
        summary.accepted(),
        examined
    )
}
