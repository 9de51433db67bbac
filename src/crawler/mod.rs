//! Crawler module for listing walks and run coordination
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching of listing and detail pages
//! - Per-link pagination with deduplication and filtering
//! - Randomized politeness pauses
//! - The unbuffered product stream and run cancellation
//! - Overall run coordination

mod cancel;
mod coordinator;
mod fetcher;
mod politeness;
mod stream;
mod summary;
mod walker;

pub use cancel::CancelSignal;
pub use coordinator::Coordinator;
pub use fetcher::{build_http_client, fetch_page, listing_page_url, FetchResult};
pub use politeness::Politeness;
pub use stream::{EmitOutcome, ProductSender, ProductStream};
pub use summary::{RunSummary, RunTotals};
pub use walker::{PageWalker, WalkOutcome, WalkReport, WalkState};
