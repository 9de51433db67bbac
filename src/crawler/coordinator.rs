//! Crawl orchestration
//!
//! The coordinator turns a set of crawl options into one walker per listing
//! link and wires them to a single product stream. It owns the state of at
//! most one active run:
//! - a fresh cancel signal, activated by [`Coordinator::stop`]
//! - a task tracker acting as the completion barrier for the walkers
//! - a waiting task that closes the stream once every walker has finished

use super::stream::{self, ProductStream};
use super::summary::RunSummary;
use super::walker::{PageWalker, WalkReport};
use super::{build_http_client, CancelSignal, Politeness};
use crate::catalog::Catalog;
use crate::config::Config;
use crate::filter::CrawlOptions;
use crate::{Result, SurferError};
use chrono::Utc;
use reqwest::Client;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use url::Url;

/// Bookkeeping of the current (or last) run
struct RunState {
    cancel: CancelSignal,
    /// Cancelled by the waiting task once the run is over
    done: CancellationToken,
    waiter: Option<JoinHandle<RunSummary>>,
}

impl RunState {
    fn is_active(&self) -> bool {
        !self.done.is_cancelled()
    }
}

/// Main crawler coordinator structure
///
/// Build one per process and share it; `start` and `stop` take `&self`.
pub struct Coordinator {
    catalog: Arc<Catalog>,
    client: Client,
    politeness: Politeness,
    max_pages: u32,
    run: Mutex<Option<RunState>>,
}

impl Coordinator {
    /// Creates a coordinator with the catalog described by `config`
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to start runs
    /// * `Err(SurferError)` - Invalid catalog extras or HTTP client setup failure
    pub fn new(config: &Config) -> Result<Self> {
        let catalog = Catalog::from_config(config)?;
        Self::with_catalog(config, catalog)
    }

    /// Creates a coordinator over an explicit catalog
    pub fn with_catalog(config: &Config, catalog: Catalog) -> Result<Self> {
        let client = build_http_client(config)?;

        Ok(Self {
            catalog: Arc::new(catalog),
            client,
            politeness: Politeness::from_config(&config.crawler),
            max_pages: config.crawler.max_pages,
            run: Mutex::new(None),
        })
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Category ids mapped to their display names
    pub fn list_categories(&self) -> BTreeMap<u8, String> {
        self.catalog.list_categories()
    }

    /// Expands the selected categories into the listing links a run would walk
    pub fn plan(&self, options: &CrawlOptions) -> Result<Vec<Url>> {
        let categories = self.catalog.select(&options.categories)?;
        Ok(self.catalog.expand_to_links(&categories))
    }

    /// Starts a run and returns the stream of accepted products
    ///
    /// The stream yields `None` once every walker of the run has terminated.
    /// At most one run is active at a time.
    ///
    /// # Returns
    ///
    /// * `Ok(ProductStream)` - The run is underway
    /// * `Err(SurferError::RunActive)` - Another run has not finished yet
    /// * `Err(SurferError::Options)` - The options name no or unknown categories
    pub fn start(&self, options: CrawlOptions) -> Result<ProductStream> {
        let mut run = self.lock_run();
        if run.as_ref().is_some_and(RunState::is_active) {
            return Err(SurferError::RunActive);
        }

        let links = self.plan(&options)?;
        tracing::info!(
            "Starting run over {} listing links (categories {:?})",
            links.len(),
            options.categories
        );

        let cancel = CancelSignal::new();
        let (sender, stream) = stream::channel(cancel.clone());
        let tracker = TaskTracker::new();
        let done = CancellationToken::new();
        let (report_tx, mut report_rx) = mpsc::unbounded_channel::<WalkReport>();
        let started_at = Utc::now();
        let link_count = links.len();

        let launcher = {
            let tracker = tracker.clone();
            let cancel = cancel.clone();
            let sender = sender.clone();
            let client = self.client.clone();
            let options = Arc::new(options);
            let politeness = self.politeness;
            let max_pages = self.max_pages;

            tokio::spawn(async move {
                for (index, link) in links.into_iter().enumerate() {
                    if cancel.is_active() {
                        tracing::debug!("Run stopped, not launching {}", link);
                        break;
                    }
                    if index > 0 && !politeness.pause(&cancel).await {
                        break;
                    }

                    let walker = PageWalker::new(
                        link,
                        client.clone(),
                        Arc::clone(&options),
                        sender.clone(),
                        cancel.clone(),
                        politeness,
                        max_pages,
                    );
                    let report_tx = report_tx.clone();
                    tracker.spawn(async move {
                        // Receiver lives until the tracker drains
                        let _ = report_tx.send(walker.run().await);
                    });
                }
                tracker.close();
            })
        };

        let waiter = {
            let cancel = cancel.clone();
            let guard = done.clone().drop_guard();

            tokio::spawn(async move {
                if let Err(e) = launcher.await {
                    tracing::error!("Walker launcher failed: {}", e);
                }
                tracker.close();
                tracker.wait().await;

                let mut reports = Vec::new();
                while let Ok(report) = report_rx.try_recv() {
                    reports.push(report);
                }

                let summary = RunSummary {
                    started_at,
                    finished_at: Utc::now(),
                    links: link_count,
                    cancelled: cancel.is_active(),
                    reports,
                };

                tracing::info!(
                    "Run finished: {} accepted, {} rejected, {} failed across {} pages",
                    summary.accepted(),
                    summary.rejected(),
                    summary.failed(),
                    summary.pages()
                );

                // Mark the run inactive before the consumer can observe the end
                drop(guard);
                drop(sender);
                summary
            })
        };

        *run = Some(RunState {
            cancel,
            done,
            waiter: Some(waiter),
        });

        Ok(stream)
    }

    /// Stops the active run; no-op when nothing is running
    ///
    /// Walkers observe the signal at their next checkpoint, or immediately if
    /// they are pausing or waiting on the consumer.
    pub fn stop(&self) {
        if let Some(run) = self.lock_run().as_ref().filter(|run| run.is_active()) {
            tracing::info!("Stopping active run");
            run.cancel.activate();
        }
    }

    /// Whether a run is currently active
    pub fn is_running(&self) -> bool {
        self.lock_run().as_ref().is_some_and(RunState::is_active)
    }

    /// Waits for the last started run to finish and returns its summary
    ///
    /// Returns `None` if no run was started or its summary was already taken.
    /// The product stream must be drained (or the run stopped) for this to
    /// complete.
    pub async fn wait(&self) -> Option<RunSummary> {
        let waiter = self.lock_run().as_mut()?.waiter.take()?;

        match waiter.await {
            Ok(summary) => Some(summary),
            Err(e) => {
                tracing::error!("Run waiter failed: {}", e);
                None
            }
        }
    }

    fn lock_run(&self) -> MutexGuard<'_, Option<RunState>> {
        self.run.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
