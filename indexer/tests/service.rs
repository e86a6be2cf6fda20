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

//! Test the backend service against the emulator.
use std::sync::Arc;
use std::time::Duration;

use bountyhub_client::*;
use bountyhub_indexer::checkpoint::MemoryCheckpoint;
use bountyhub_indexer::monitor::MonitorConfig;
use bountyhub_indexer::service::*;

fn service(emulator: &Emulator) -> BackendService {
    BackendService::new(
        Arc::new(emulator.clone()),
        emulator.deployment(),
        MonitorConfig {
            poll_interval: Duration::from_millis(20),
            ..MonitorConfig::default()
        },
        Arc::new(MemoryCheckpoint::new()),
    )
    .unwrap()
}

#[tokio::test]
async fn start_is_idempotent() {
    let _ = env_logger::try_init();
    let emulator = Emulator::new();
    emulator.set_block_number(3);
    let service = service(&emulator);
    assert_eq!(service.health_check().status, "stopped");

    service.start().await.unwrap();
    service.start().await.unwrap();
    let health = service.health_check();
    assert_eq!(health.status, "healthy");
    assert!(health.running);

    let mut attempts = 0;
    while service.health_check().last_processed_block != 3 {
        attempts += 1;
        assert!(attempts < 500, "service did not process blocks");
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    service.stop().await;
    service.stop().await;
    let health = service.health_check();
    assert!(!health.running);
    assert_eq!(health.status, "stopped");
    assert_eq!(health.last_processed_block, 3);
}

#[tokio::test]
async fn start_fails_without_contract() {
    let emulator = Emulator::new();
    let escrow = emulator.deployment().contracts.escrow;
    emulator.remove_contract(escrow);
    let service = service(&emulator);

    match service.start().await {
        Err(ServiceError::ContractInit { name, address, .. }) => {
            assert_eq!(name, "escrow");
            assert_eq!(address, escrow);
        }
        other => panic!("unexpected result {:?}", other),
    }
    assert!(!service.health_check().running);
    assert!(emulator.event_queries().is_empty());
}

#[tokio::test]
async fn health_status_json() {
    let emulator = Emulator::new();
    let health = service(&emulator).health_check();
    let json = serde_json::to_value(&health).unwrap();

    assert_eq!(json["status"], "stopped");
    assert_eq!(json["running"], false);
    assert_eq!(json["lastProcessedBlock"], 0);
    assert_eq!(json["indexedEvents"], 0);
    assert!(json["timestamp"].as_u64().unwrap() > 0);
}
