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

//! Test the event monitor against the emulator.
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;

use bountyhub_client::*;
use bountyhub_indexer::checkpoint::{CheckpointStore, FileCheckpoint, MemoryCheckpoint};
use bountyhub_indexer::index::EventIndex;
use bountyhub_indexer::monitor::*;
use bountyhub_test_utils::*;

fn monitor_with(
    backend: Arc<dyn Backend>,
    contracts: ContractAddresses,
    config: MonitorConfig,
    checkpoint: Arc<dyn CheckpointStore>,
) -> EventMonitor {
    EventMonitor::new(
        backend,
        contracts,
        config,
        Arc::new(EventIndex::new()),
        checkpoint,
    )
    .unwrap()
}

fn monitor(emulator: &Emulator) -> EventMonitor {
    monitor_with(
        Arc::new(emulator.clone()),
        emulator.deployment().contracts,
        MonitorConfig::default(),
        Arc::new(MemoryCheckpoint::new()),
    )
}

fn report(outcome: CycleOutcome) -> CycleReport {
    match outcome {
        CycleOutcome::Processed(report) => report,
        other => panic!("unexpected outcome {:?}", other),
    }
}

fn bounty_created(id: u64) -> MarketEvent {
    MarketEvent::BountyCreated {
        bounty_id: BountyId(id),
        creator: random_address(),
        reward: random_reward(),
        deadline: FAR_DEADLINE,
    }
}

#[tokio::test]
async fn first_cycle_fetches_every_category() {
    let _ = env_logger::try_init();
    let emulator = Emulator::new();
    emulator.set_block_number(100);
    let checkpoint = Arc::new(MemoryCheckpoint::new());
    let monitor = monitor_with(
        Arc::new(emulator.clone()),
        emulator.deployment().contracts,
        MonitorConfig::default(),
        checkpoint.clone(),
    );
    assert_eq!(monitor.last_processed_block(), 0);

    let report = report(monitor.process_events().await);

    let contracts = emulator.deployment().contracts;
    let queries = emulator.event_queries();
    assert_eq!(queries.len(), 3);
    for query in &queries {
        assert_eq!((query.from_block, query.to_block), (0, 100));
        assert_eq!(query.chunk_size, DEFAULT_CHUNK_SIZE);
        assert_eq!(query.continuation_token, None);
    }
    let addresses: Vec<_> = queries.iter().map(|query| query.address).collect();
    assert_eq!(
        addresses,
        vec![
            contracts.bounty_platform,
            contracts.payment_processor,
            contracts.payment_processor
        ]
    );
    assert_eq!(queries[2].keys.len(), 1);
    assert_eq!(queries[2].keys[0].len(), 2);

    assert!(report.advanced);
    assert_eq!(monitor.last_processed_block(), 100);
    assert_eq!(checkpoint.load().unwrap(), Some(100));
}

#[tokio::test]
async fn no_fetch_without_new_blocks() {
    let emulator = Emulator::new();
    emulator.set_block_number(100);
    let monitor = monitor(&emulator);

    report(monitor.process_events().await);
    let outcome = monitor.process_events().await;

    assert_eq!(
        outcome,
        CycleOutcome::UpToDate {
            last_processed_block: 100
        }
    );
    assert_eq!(emulator.event_queries().len(), 3);
    assert_eq!(monitor.last_processed_block(), 100);
}

#[tokio::test]
async fn indexes_marketplace_events() {
    let emulator = Emulator::new();
    let creator = connected_client(&emulator).await;
    let bounty = create_random_bounty(&creator).await;
    creator.cancel_bounty(bounty.id).await.unwrap();
    let monitor = monitor(&emulator);

    let report = report(monitor.process_events().await);

    let indexed: Vec<_> = report
        .categories
        .iter()
        .map(|category| (category.category, category.indexed))
        .collect();
    assert_eq!(
        indexed,
        vec![
            (EventCategory::Bounty, 1),
            (EventCategory::Payment, 0),
            (EventCategory::RefundAndFee, 1),
        ]
    );
    let events: Vec<_> = monitor
        .index()
        .events_for_bounty(bounty.id)
        .into_iter()
        .map(|indexed| indexed.event.kind())
        .collect();
    assert_eq!(
        events,
        vec![EventKind::BountyCreated, EventKind::RefundProcessed]
    );
}

#[tokio::test]
async fn dedup_state_is_pruned_after_advance() {
    let emulator = Emulator::new();
    let platform = emulator.deployment().contracts.bounty_platform;
    for id in 1..=3 {
        emulator.emit(platform, &bounty_created(id));
    }
    let monitor = monitor(&emulator);

    report(monitor.process_events().await);
    assert_eq!(monitor.last_processed_block(), 3);
    assert_eq!(monitor.index().len(), 3);
    assert_eq!(monitor.index().tracked(), 1);

    emulator.emit(platform, &bounty_created(4));
    let report = report(monitor.process_events().await);

    assert_eq!((report.from_block, report.to_block), (3, 4));
    assert_eq!(report.categories[0].fetched, 2);
    assert_eq!(report.categories[0].indexed, 1);
    assert_eq!(monitor.index().len(), 4);
    assert_eq!(monitor.index().tracked(), 1);
}

#[tokio::test]
async fn failed_category_keeps_checkpoint() {
    let emulator = Emulator::new();
    let contracts = emulator.deployment().contracts;
    let creator = connected_client(&emulator).await;
    create_random_bounty(&creator).await;
    let current_block = emulator.block_number().await.unwrap();
    let monitor = monitor(&emulator);

    emulator.fail_events_from(contracts.payment_processor, true);
    let failed = report(monitor.process_events().await);
    assert!(!failed.advanced);
    assert_eq!(
        failed.failed(),
        vec![EventCategory::Payment, EventCategory::RefundAndFee]
    );
    assert_eq!(monitor.last_processed_block(), 0);
    assert_eq!(monitor.index().len(), 1);

    emulator.fail_events_from(contracts.payment_processor, false);
    let replayed = report(monitor.process_events().await);
    assert!(replayed.advanced);
    assert_eq!(replayed.from_block, 0);
    assert_eq!(replayed.categories[0].fetched, 1);
    assert_eq!(replayed.categories[0].indexed, 0);
    assert_eq!(monitor.last_processed_block(), current_block);
    assert_eq!(monitor.index().len(), 1);
}

#[tokio::test]
async fn block_number_failure() {
    let emulator = Emulator::new();
    emulator.set_block_number(10);
    emulator.fail_block_number(true);
    let monitor = monitor(&emulator);

    match monitor.process_events().await {
        CycleOutcome::Failed { .. } => (),
        other => panic!("unexpected outcome {:?}", other),
    }
    assert!(emulator.event_queries().is_empty());
    assert_eq!(monitor.last_processed_block(), 0);
}

#[tokio::test]
async fn truncated_category_is_reported() {
    let emulator = Emulator::new();
    let contracts = emulator.deployment().contracts;
    for id in 1..=5 {
        emulator.emit(contracts.bounty_platform, &bounty_created(id));
    }
    let monitor = monitor_with(
        Arc::new(emulator.clone()),
        contracts,
        MonitorConfig {
            chunk_size: 2,
            ..MonitorConfig::default()
        },
        Arc::new(MemoryCheckpoint::new()),
    );

    let report = report(monitor.process_events().await);

    assert_eq!(report.truncated(), vec![EventCategory::Bounty]);
    assert_eq!(report.categories[0].fetched, 2);
    assert!(report.advanced);
    assert_eq!(monitor.index().len(), 2);
    assert_eq!(emulator.event_queries().len(), 3);
}

#[tokio::test]
async fn resume_from_file_checkpoint() {
    let path = std::env::temp_dir().join(format!(
        "bountyhub-monitor-{}.json",
        rand::random::<u64>()
    ));
    FileCheckpoint::new(&path).save(50).unwrap();
    let emulator = Emulator::new();
    emulator.set_block_number(60);
    let monitor = monitor_with(
        Arc::new(emulator.clone()),
        emulator.deployment().contracts,
        MonitorConfig::default(),
        Arc::new(FileCheckpoint::new(&path)),
    );
    assert_eq!(monitor.last_processed_block(), 50);

    let report = report(monitor.process_events().await);
    assert_eq!((report.from_block, report.to_block), (50, 60));
    assert_eq!(FileCheckpoint::new(&path).load().unwrap(), Some(60));
    std::fs::remove_file(path).unwrap();
}

/// Backend whose `block_number` call blocks until released.
struct GatedBackend {
    emulator: Emulator,
    entered: Arc<Notify>,
    release: Arc<Notify>,
}

#[async_trait::async_trait]
impl Backend for GatedBackend {
    async fn block_number(&self) -> Result<BlockNumber, Error> {
        self.entered.notify_one();
        self.release.notified().await;
        self.emulator.block_number().await
    }

    async fn get_events(&self, query: EventQuery) -> Result<EventsPage, Error> {
        self.emulator.get_events(query).await
    }

    async fn call(&self, call: ContractCall) -> Result<Vec<Felt>, Error> {
        self.emulator.call(call).await
    }

    async fn class_hash_at(&self, address: ContractAddress) -> Result<Felt, Error> {
        self.emulator.class_hash_at(address).await
    }

    async fn chain_id(&self) -> Result<Felt, Error> {
        self.emulator.chain_id().await
    }
}

#[tokio::test]
async fn overlapping_cycle_is_skipped() {
    let emulator = Emulator::new();
    emulator.set_block_number(5);
    let entered = Arc::new(Notify::new());
    let release = Arc::new(Notify::new());
    let backend = GatedBackend {
        emulator: emulator.clone(),
        entered: entered.clone(),
        release: release.clone(),
    };
    let monitor = Arc::new(monitor_with(
        Arc::new(backend),
        emulator.deployment().contracts,
        MonitorConfig::default(),
        Arc::new(MemoryCheckpoint::new()),
    ));

    let first = {
        let monitor = monitor.clone();
        tokio::spawn(async move { monitor.process_events().await })
    };
    entered.notified().await;

    assert_eq!(monitor.process_events().await, CycleOutcome::Skipped);
    assert!(emulator.event_queries().is_empty());

    release.notify_one();
    let report = report(first.await.unwrap());
    assert!(report.advanced);
    assert_eq!(emulator.event_queries().len(), 3);
}

#[tokio::test]
async fn start_and_stop() {
    let emulator = Emulator::new();
    emulator.set_block_number(7);
    let monitor = monitor_with(
        Arc::new(emulator.clone()),
        emulator.deployment().contracts,
        MonitorConfig {
            poll_interval: Duration::from_millis(20),
            ..MonitorConfig::default()
        },
        Arc::new(MemoryCheckpoint::new()),
    );

    assert!(monitor.start());
    assert!(!monitor.start());
    assert!(monitor.is_running());

    let mut attempts = 0;
    while monitor.last_processed_block() != 7 {
        attempts += 1;
        assert!(attempts < 500, "monitor did not process blocks");
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    emulator.set_block_number(9);
    while monitor.last_processed_block() != 9 {
        attempts += 1;
        assert!(attempts < 500, "monitor did not process new blocks");
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    assert!(monitor.stop().await);
    assert!(!monitor.stop().await);
    assert!(!monitor.is_running());

    let queries = emulator.event_queries().len();
    emulator.set_block_number(12);
    tokio::time::sleep(Duration::from_millis(60)).await;
    assert_eq!(emulator.event_queries().len(), queries);
}
