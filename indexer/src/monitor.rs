// Bountyhub
// Copyright (C) 2026 The Bountyhub developers
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License version 3 as
// published by the Free Software Foundation.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Provides [EventMonitor] which polls the chain for marketplace events.
//!
//! Every poll cycle fetches the latest block number. If the chain advanced past the checkpoint,
//! the events of every [EventCategory] in the blocks `[checkpoint, latest]` are fetched and fed
//! to the [EventIndex]. The checkpoint only advances if all categories were fetched. A failed
//! category makes the next cycle fetch the whole range again. The index ignores events it has
//! already seen. Once the checkpoint advances, the index forgets the dedup state of blocks
//! before it.
//!
//! Only the first page of at most `chunk_size` events is fetched per category and cycle. A
//! category with more matching events is reported as truncated. The remaining events are not
//! fetched.
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

use bountyhub_client::{Backend, BlockNumber, ContractAddresses, EventQuery};
use bountyhub_core::{EventCategory, MarketEvent};

use crate::checkpoint::{CheckpointError, CheckpointStore};
use crate::index::{EventIndex, IndexedEvent};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);
pub const DEFAULT_CHUNK_SIZE: u64 = 100;

#[derive(Clone, Debug)]
pub struct MonitorConfig {
    pub poll_interval: Duration,
    /// Maximum number of events fetched per category and cycle.
    pub chunk_size: u64,
    /// Checkpoint to start from if the checkpoint store is empty.
    pub start_block: BlockNumber,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        MonitorConfig {
            poll_interval: DEFAULT_POLL_INTERVAL,
            chunk_size: DEFAULT_CHUNK_SIZE,
            start_block: 0,
        }
    }
}

/// Result of [EventMonitor::process_events].
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum CycleOutcome {
    /// Another cycle was in flight. Nothing was done.
    Skipped,
    /// The latest block could not be fetched.
    Failed { error: String },
    /// No blocks after the checkpoint.
    UpToDate { last_processed_block: BlockNumber },
    Processed(CycleReport),
}

/// Events fetched in one cycle.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CycleReport {
    pub from_block: BlockNumber,
    pub to_block: BlockNumber,
    pub categories: Vec<CategoryReport>,
    /// True if the checkpoint moved to `to_block`.
    pub advanced: bool,
}

impl CycleReport {
    /// Categories with more matching events than fit in one chunk.
    pub fn truncated(&self) -> Vec<EventCategory> {
        self.categories
            .iter()
            .filter(|report| report.truncated)
            .map(|report| report.category)
            .collect()
    }

    pub fn failed(&self) -> Vec<EventCategory> {
        self.categories
            .iter()
            .filter(|report| report.error.is_some())
            .map(|report| report.category)
            .collect()
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CategoryReport {
    pub category: EventCategory,
    /// Number of events returned by the node.
    pub fetched: usize,
    /// Number of events that were not in the index before.
    pub indexed: usize,
    pub truncated: bool,
    pub error: Option<String>,
}

/// Polls the chain for marketplace events.
///
/// The monitor is either stopped or running. While running, a background task calls
/// [EventMonitor::process_events] every poll interval. Cycles never overlap: a cycle that
/// starts while another is in flight is skipped.
pub struct EventMonitor {
    inner: Arc<MonitorInner>,
    task: Mutex<Option<PollTask>>,
}

struct MonitorInner {
    backend: Arc<dyn Backend>,
    contracts: ContractAddresses,
    config: MonitorConfig,
    index: Arc<EventIndex>,
    checkpoint: Arc<dyn CheckpointStore>,
    last_processed_block: AtomicU64,
    in_flight: AtomicBool,
}

struct PollTask {
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

/// Clears the in-flight flag when the cycle ends.
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl EventMonitor {
    /// Create a stopped monitor. The checkpoint is loaded from `checkpoint`.
    pub fn new(
        backend: Arc<dyn Backend>,
        contracts: ContractAddresses,
        config: MonitorConfig,
        index: Arc<EventIndex>,
        checkpoint: Arc<dyn CheckpointStore>,
    ) -> Result<Self, CheckpointError> {
        let last_processed_block = checkpoint.load()?.unwrap_or(config.start_block);
        log::info!("event monitor starts after block {}", last_processed_block);
        Ok(EventMonitor {
            inner: Arc::new(MonitorInner {
                backend,
                contracts,
                config,
                index,
                checkpoint,
                last_processed_block: AtomicU64::new(last_processed_block),
                in_flight: AtomicBool::new(false),
            }),
            task: Mutex::new(None),
        })
    }

    pub fn last_processed_block(&self) -> BlockNumber {
        self.inner.last_processed_block.load(Ordering::Acquire)
    }

    pub fn index(&self) -> &Arc<EventIndex> {
        &self.inner.index
    }

    pub fn is_running(&self) -> bool {
        self.task.lock().is_some()
    }

    /// Run one poll cycle.
    pub async fn process_events(&self) -> CycleOutcome {
        self.inner.process_events().await
    }

    /// Start polling in a background task. The first cycle runs immediately.
    ///
    /// Returns `false` if the monitor is already running.
    pub fn start(&self) -> bool {
        let mut task = self.task.lock();
        if task.is_some() {
            return false;
        }
        let (shutdown, mut shutdown_rx) = watch::channel(false);
        let inner = self.inner.clone();
        let handle = tokio::spawn(async move {
            let mut ticker = time::interval(inner.config.poll_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        inner.process_events().await;
                    }
                    changed = shutdown_rx.changed() => {
                        if changed.is_err() || *shutdown_rx.borrow() {
                            break;
                        }
                    }
                }
            }
            log::debug!("event monitor task finished");
        });
        *task = Some(PollTask { shutdown, handle });
        log::info!(
            "event monitor started, polling every {:?}",
            self.inner.config.poll_interval
        );
        true
    }

    /// Stop polling. Waits for an in-flight cycle to finish.
    ///
    /// Returns `false` if the monitor was not running.
    pub async fn stop(&self) -> bool {
        let task = self.task.lock().take();
        let PollTask { shutdown, handle } = match task {
            Some(task) => task,
            None => return false,
        };
        let _ = shutdown.send(true);
        if let Err(error) = handle.await {
            log::error!("event monitor task failed: {}", error);
        }
        log::info!(
            "event monitor stopped at block {}",
            self.last_processed_block()
        );
        true
    }
}

impl MonitorInner {
    async fn process_events(&self) -> CycleOutcome {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            log::debug!("poll cycle skipped, previous cycle still in flight");
            return CycleOutcome::Skipped;
        }
        let _in_flight = InFlight(&self.in_flight);

        let current_block = match self.backend.block_number().await {
            Ok(block_number) => block_number,
            Err(error) => {
                log::error!("failed to fetch latest block number: {}", error);
                return CycleOutcome::Failed {
                    error: error.to_string(),
                };
            }
        };
        let last_processed_block = self.last_processed_block.load(Ordering::Acquire);
        if current_block <= last_processed_block {
            log::trace!("no new blocks after {}", last_processed_block);
            return CycleOutcome::UpToDate {
                last_processed_block,
            };
        }

        let mut categories = Vec::with_capacity(EventCategory::ALL.len());
        for category in EventCategory::ALL.iter() {
            categories.push(
                self.process_category(*category, last_processed_block, current_block)
                    .await,
            );
        }

        let advanced = categories.iter().all(|report| report.error.is_none());
        if advanced {
            if let Err(error) = self.checkpoint.save(current_block) {
                log::error!("failed to persist checkpoint {}: {}", current_block, error);
            }
            self.last_processed_block
                .store(current_block, Ordering::Release);
            self.index.prune(current_block);
            log::debug!("processed blocks {}..={}", last_processed_block, current_block);
        } else {
            log::warn!(
                "checkpoint stays at block {}, blocks {}..={} will be fetched again",
                last_processed_block,
                last_processed_block,
                current_block
            );
        }

        CycleOutcome::Processed(CycleReport {
            from_block: last_processed_block,
            to_block: current_block,
            categories,
            advanced,
        })
    }

    async fn process_category(
        &self,
        category: EventCategory,
        from_block: BlockNumber,
        to_block: BlockNumber,
    ) -> CategoryReport {
        let mut report = CategoryReport {
            category,
            fetched: 0,
            indexed: 0,
            truncated: false,
            error: None,
        };
        let query = EventQuery {
            from_block,
            to_block,
            address: self.contracts.emitter(category.emitter()),
            keys: category.key_filter(),
            chunk_size: self.config.chunk_size,
            continuation_token: None,
        };
        let page = match self.backend.get_events(query).await {
            Ok(page) => page,
            Err(error) => {
                log::error!(
                    "failed to fetch {} events for blocks {}..={}: {}",
                    category,
                    from_block,
                    to_block,
                    error
                );
                report.error = Some(error.to_string());
                return report;
            }
        };

        report.fetched = page.events.len();
        if page.continuation_token.is_some() {
            report.truncated = true;
            log::warn!(
                "more than {} {} events in blocks {}..={}, events past the first chunk are not fetched",
                self.config.chunk_size,
                category,
                from_block,
                to_block
            );
        }
        let results = self.index.record_page(&page.events);
        for (event, result) in page.events.iter().zip(results) {
            match result {
                Ok(Some(indexed)) => {
                    report.indexed += 1;
                    log_event(&indexed);
                }
                Ok(None) => log::trace!("event already indexed"),
                Err(error) => log::warn!(
                    "skipping event of transaction {:#x}: {}",
                    event.transaction_hash,
                    error
                ),
            }
        }
        report
    }
}

fn log_event(indexed: &IndexedEvent) {
    let block = indexed
        .block_number
        .map_or_else(|| "pending".to_string(), |block| block.to_string());
    match &indexed.event {
        MarketEvent::BountyCreated {
            bounty_id,
            creator,
            reward,
            ..
        } => log::info!(
            "block {}: bounty {} created by {} with reward {}",
            block,
            bounty_id,
            creator,
            reward
        ),
        MarketEvent::PaymentProcessed {
            bounty_id,
            recipient,
            amount,
        } => log::info!(
            "block {}: bounty {} paid {} to {}",
            block,
            bounty_id,
            amount,
            recipient
        ),
        MarketEvent::RefundProcessed {
            bounty_id,
            recipient,
            amount,
        } => log::info!(
            "block {}: bounty {} refunded {} to {}",
            block,
            bounty_id,
            amount,
            recipient
        ),
        MarketEvent::FeeCollected { bounty_id, amount } => log::info!(
            "block {}: fee of {} collected for bounty {}",
            block,
            amount,
            bounty_id
        ),
    }
}
