//! Markdown report generation
//!
//! This module generates a human-readable markdown report of a run,
//! including run information, per-link results, and the accepted products.

use super::traits::{OutputResult, ProductSink};
use crate::crawler::RunSummary;
use crate::Product;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Collects products during a run and writes the report when it finishes
pub struct MarkdownReport {
    path: PathBuf,
    config_hash: Option<String>,
    products: Vec<Product>,
}

impl MarkdownReport {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            config_hash: None,
            products: Vec::new(),
        }
    }

    /// Records the hash of the config file the run was started with
    pub fn with_config_hash(mut self, hash: impl Into<String>) -> Self {
        self.config_hash = Some(hash.into());
        self
    }
}

impl ProductSink for MarkdownReport {
    fn accept(&mut self, product: &Product) -> OutputResult<()> {
        self.products.push(product.clone());
        Ok(())
    }

    fn finish(&mut self, summary: &RunSummary) -> OutputResult<()> {
        generate_markdown_report(
            summary,
            &self.products,
            self.config_hash.as_deref(),
            &self.path,
        )?;
        tracing::info!("Wrote report to {}", self.path.display());
        Ok(())
    }
}

/// Writes a markdown report of a run
///
/// # Arguments
///
/// * `summary` - The run summary
/// * `products` - Accepted products in delivery order
/// * `config_hash` - Hash of the config file, if one was loaded
/// * `output_path` - Path where the markdown file should be written
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote the report
/// * `Err(OutputError)` - Failed to write the report
pub fn generate_markdown_report(
    summary: &RunSummary,
    products: &[Product],
    config_hash: Option<&str>,
    output_path: &Path,
) -> OutputResult<()> {
    let markdown = format_markdown_report(summary, products, config_hash);

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats a run as markdown
///
/// Products are listed by best-seller rank, unranked ones last.
pub fn format_markdown_report(
    summary: &RunSummary,
    products: &[Product],
    config_hash: Option<&str>,
) -> String {
    let mut md = String::new();

    md.push_str("# Shelf-Surfer Run Report\n\n");

    // Run metadata
    md.push_str("## Run Information\n\n");
    md.push_str(&format!("- **Started**: {}\n", summary.started_at.to_rfc3339()));
    md.push_str(&format!("- **Finished**: {}\n", summary.finished_at.to_rfc3339()));
    let duration = summary.duration().num_seconds().max(0);
    md.push_str(&format!(
        "- **Duration**: {} seconds ({:.2} minutes)\n",
        duration,
        duration as f64 / 60.0
    ));
    md.push_str(&format!(
        "- **Status**: {}\n",
        if summary.cancelled {
            "stopped"
        } else {
            "completed"
        }
    ));
    if let Some(hash) = config_hash {
        md.push_str(&format!("- **Config Hash**: {}\n", hash));
    }
    md.push('\n');

    // Overall statistics
    md.push_str("## Overall Statistics\n\n");
    md.push_str(&format!("- **Listing Links**: {}\n", summary.links));
    md.push_str(&format!("- **Listing Pages**: {}\n", summary.pages()));
    md.push_str(&format!("- **Detail Pages**: {}\n", summary.detail_pages()));
    md.push_str(&format!("- **Accepted**: {}\n", summary.accepted()));
    md.push_str(&format!("- **Rejected**: {}\n", summary.rejected()));
    md.push_str(&format!("- **Failed**: {}\n", summary.failed()));
    if summary.skipped() > 0 {
        md.push_str(&format!("- **Links Not Started**: {}\n", summary.skipped()));
    }
    md.push('\n');

    // Per-link breakdown
    if !summary.reports.is_empty() {
        let mut reports: Vec<_> = summary.reports.iter().collect();
        reports.sort_by(|a, b| a.link.cmp(&b.link));

        md.push_str("## Listing Links\n\n");
        md.push_str("| Link | Pages | Accepted | Rejected | Failed | Outcome |\n");
        md.push_str("|------|-------|----------|----------|--------|---------|\n");
        for report in reports {
            md.push_str(&format!(
                "| {} | {} | {} | {} | {} | {} |\n",
                report.link,
                report.pages,
                report.accepted,
                report.rejected,
                report.failed,
                report.outcome
            ));
        }
        md.push('\n');
    }

    // Products
    md.push_str("## Products\n\n");
    if products.is_empty() {
        md.push_str("No products matched.\n");
        return md;
    }

    let mut ranked: Vec<_> = products.iter().collect();
    ranked.sort_by_key(|p| if p.rank == 0 { u64::MAX } else { p.rank });

    md.push_str("| Rank | Name | Price | Reviews | Dimensions (in) | Weight |\n");
    md.push_str("|------|------|-------|---------|-----------------|--------|\n");
    for product in ranked {
        let rank = if product.rank == 0 {
            "-".to_string()
        } else {
            format!("#{}", product.rank)
        };
        md.push_str(&format!(
            "| {} | [{}]({}) | ${:.2} | {} | {} x {} x {} | {} |\n",
            rank,
            escape_cell(&product.name),
            product.link,
            product.price,
            product.review_count,
            product.length,
            product.width,
            product.height,
            product.weight
        ));
    }

    md
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}
