//! Per-link pagination
//!
//! A [`PageWalker`] owns one best-seller listing link. It walks the listing
//! page by page, fetches each product it has not seen before, filters it and
//! emits the accepted ones. The walk ends when the source stops answering
//! with a success status or when the run is cancelled.

use super::fetcher::{fetch_page, listing_page_url, FetchResult};
use super::stream::{EmitOutcome, ProductSender};
use super::{CancelSignal, Politeness};
use crate::extract::{extract_product, parse_listing, ListingEntry};
use crate::filter::{is_valid, CrawlOptions};
use reqwest::Client;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use url::Url;

/// Walker states
///
/// `Fetching → Parsing → Dispatching → NextPage → Fetching ...` until one of
/// the terminal states is reached.
#[derive(Debug)]
pub enum WalkState {
    /// Requesting the current listing page
    Fetching,
    /// Listing page body received
    Parsing(String),
    /// Working through the entries of the current page
    Dispatching(Vec<ListingEntry>),
    /// Page done, moving on
    NextPage,
    /// No more pages for this link
    Exhausted,
    /// The run was stopped
    Cancelled,
}

/// Terminal outcome of a walk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WalkOutcome {
    Exhausted,
    Cancelled,
}

impl fmt::Display for WalkOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exhausted => write!(f, "exhausted"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// What one walker did before terminating
#[derive(Debug, Clone, PartialEq)]
pub struct WalkReport {
    pub link: String,
    /// Listing pages fetched successfully
    pub pages: u32,
    /// Detail pages fetched successfully
    pub detail_pages: u32,
    /// Products delivered to the consumer
    pub accepted: u32,
    /// Products that failed the filter
    pub rejected: u32,
    /// Detail pages that could not be fetched
    pub failed: u32,
    pub outcome: WalkOutcome,
}

impl WalkReport {
    fn new(link: &Url) -> Self {
        Self {
            link: link.to_string(),
            pages: 0,
            detail_pages: 0,
            accepted: 0,
            rejected: 0,
            failed: 0,
            outcome: WalkOutcome::Exhausted,
        }
    }
}

/// Walks every page of one listing link
pub struct PageWalker {
    link: Url,
    client: Client,
    options: Arc<CrawlOptions>,
    sender: ProductSender,
    cancel: CancelSignal,
    politeness: Politeness,
    max_pages: u32,
    page: u32,
    seen: HashSet<String>,
}

impl PageWalker {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        link: Url,
        client: Client,
        options: Arc<CrawlOptions>,
        sender: ProductSender,
        cancel: CancelSignal,
        politeness: Politeness,
        max_pages: u32,
    ) -> Self {
        Self {
            link,
            client,
            options,
            sender,
            cancel,
            politeness,
            max_pages,
            page: 1,
            seen: HashSet::new(),
        }
    }

    /// Runs the walk to a terminal state
    pub async fn run(mut self) -> WalkReport {
        let mut report = WalkReport::new(&self.link);
        let mut state = WalkState::Fetching;

        tracing::info!("Walking {}", self.link);

        report.outcome = loop {
            state = match state {
                WalkState::Fetching => self.fetch_listing(&mut report).await,
                WalkState::Parsing(body) => self.parse_listing(&body),
                WalkState::Dispatching(entries) => self.dispatch(entries, &mut report).await,
                WalkState::NextPage => self.next_page().await,
                WalkState::Exhausted => break WalkOutcome::Exhausted,
                WalkState::Cancelled => break WalkOutcome::Cancelled,
            };
        };

        tracing::info!(
            "Finished {} ({}): {} pages, {} products accepted, {} rejected, {} failed",
            report.link,
            report.outcome,
            report.pages,
            report.accepted,
            report.rejected,
            report.failed
        );

        report
    }

    async fn fetch_listing(&mut self, report: &mut WalkReport) -> WalkState {
        if self.cancel.is_active() {
            return WalkState::Cancelled;
        }

        let url = listing_page_url(&self.link, self.page);
        tracing::debug!("Fetching listing page {}", url);

        match fetch_page(&self.client, url.as_str()).await {
            FetchResult::Success { body, .. } => {
                report.pages += 1;
                WalkState::Parsing(body)
            }
            FetchResult::HttpError { status_code } => {
                tracing::debug!(
                    "Listing {} ended at page {} (HTTP {})",
                    self.link,
                    self.page,
                    status_code
                );
                WalkState::Exhausted
            }
            FetchResult::NetworkError { error, .. } => {
                tracing::warn!(
                    "Listing page {} of {} failed, giving up on this link: {}",
                    self.page,
                    self.link,
                    error
                );
                WalkState::Exhausted
            }
        }
    }

    fn parse_listing(&self, body: &str) -> WalkState {
        let entries = parse_listing(body, &self.link);
        if entries.is_empty() {
            tracing::debug!("No entries on page {} of {}", self.page, self.link);
            return WalkState::Exhausted;
        }

        tracing::debug!(
            "Found {} entries on page {} of {}",
            entries.len(),
            self.page,
            self.link
        );
        WalkState::Dispatching(entries)
    }

    async fn dispatch(&mut self, entries: Vec<ListingEntry>, report: &mut WalkReport) -> WalkState {
        for entry in entries {
            let link = entry.link.to_string();
            if !self.seen.insert(link.clone()) {
                tracing::trace!("Already seen {}", link);
                continue;
            }

            if self.cancel.is_active() {
                return WalkState::Cancelled;
            }

            let body = match fetch_page(&self.client, &link).await {
                FetchResult::Success { body, .. } => body,
                FetchResult::HttpError { status_code } => {
                    tracing::warn!("Skipping {}: HTTP {}", link, status_code);
                    report.failed += 1;
                    continue;
                }
                FetchResult::NetworkError { error, .. } => {
                    tracing::warn!("Skipping {}: {}", link, error);
                    report.failed += 1;
                    continue;
                }
            };
            report.detail_pages += 1;

            let mut product = extract_product(&body, &link);
            if product.name.is_empty() {
                product.name = entry.title;
            }

            if !is_valid(&product, &self.options) {
                tracing::debug!("Rejected {}", link);
                report.rejected += 1;
                continue;
            }

            match self.sender.emit(product, &self.cancel).await {
                EmitOutcome::Delivered => report.accepted += 1,
                EmitOutcome::Cancelled => return WalkState::Cancelled,
                EmitOutcome::Closed => {
                    tracing::info!("Consumer went away, stopping {}", self.link);
                    return WalkState::Cancelled;
                }
            }
        }

        WalkState::NextPage
    }

    async fn next_page(&mut self) -> WalkState {
        if self.cancel.is_active() {
            return WalkState::Cancelled;
        }

        if self.max_pages > 0 && self.page >= self.max_pages {
            tracing::debug!("Page limit reached for {}", self.link);
            return WalkState::Exhausted;
        }

        self.page += 1;
        if self.politeness.pause(&self.cancel).await {
            WalkState::Fetching
        } else {
            WalkState::Cancelled
        }
    }
}
