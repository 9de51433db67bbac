//! Aggregated outcome of one crawl run

use super::walker::{WalkOutcome, WalkReport};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Everything a finished run reports about itself
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Listing links planned for the run
    pub links: usize,
    /// Whether the run was stopped before it finished on its own
    pub cancelled: bool,
    /// One report per walker that was launched, in completion order
    pub reports: Vec<WalkReport>,
}

impl RunSummary {
    pub fn accepted(&self) -> u64 {
        self.reports.iter().map(|r| u64::from(r.accepted)).sum()
    }

    pub fn rejected(&self) -> u64 {
        self.reports.iter().map(|r| u64::from(r.rejected)).sum()
    }

    pub fn failed(&self) -> u64 {
        self.reports.iter().map(|r| u64::from(r.failed)).sum()
    }

    /// Listing pages fetched across all walkers
    pub fn pages(&self) -> u64 {
        self.reports.iter().map(|r| u64::from(r.pages)).sum()
    }

    pub fn detail_pages(&self) -> u64 {
        self.reports.iter().map(|r| u64::from(r.detail_pages)).sum()
    }

    /// Links whose walker never started because the run was stopped first
    pub fn skipped(&self) -> usize {
        self.links.saturating_sub(self.reports.len())
    }

    pub fn exhausted(&self) -> usize {
        self.reports
            .iter()
            .filter(|r| r.outcome == WalkOutcome::Exhausted)
            .count()
    }

    pub fn duration(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }

    /// Sorts reports by link so output does not depend on completion order
    pub fn sort_reports(&mut self) {
        self.reports.sort_by(|a, b| a.link.cmp(&b.link));
    }

    /// Compact serializable form, used by the JSON lines trailer
    pub fn totals(&self) -> RunTotals {
        RunTotals {
            started_at: self.started_at,
            finished_at: self.finished_at,
            links: self.links,
            cancelled: self.cancelled,
            pages: self.pages(),
            accepted: self.accepted(),
            rejected: self.rejected(),
            failed: self.failed(),
        }
    }
}

/// Run-wide counters without the per-link breakdown
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunTotals {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub links: usize,
    pub cancelled: bool,
    pub pages: u64,
    pub accepted: u64,
    pub rejected: u64,
    pub failed: u64,
}
