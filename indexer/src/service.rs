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

//! Provides [BackendService] which runs the event monitor for a deployment.
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;
use thiserror::Error as ThisError;

use bountyhub_client::{Backend, BlockNumber, ConfigError, ContractAddress, DeploymentConfig};

use crate::checkpoint::{CheckpointError, CheckpointStore};
use crate::index::EventIndex;
use crate::monitor::{EventMonitor, MonitorConfig};

#[derive(Debug, ThisError)]
pub enum ServiceError {
    #[error("Failed to initialize {name} contract at {address}")]
    ContractInit {
        name: &'static str,
        address: ContractAddress,
        #[source]
        error: bountyhub_client::Error,
    },

    #[error(transparent)]
    Checkpoint(#[from] CheckpointError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Answer of [BackendService::health_check].
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatus {
    /// `healthy` while the monitor is running, `stopped` otherwise.
    pub status: &'static str,
    pub running: bool,
    pub last_processed_block: BlockNumber,
    pub indexed_events: usize,
    /// Unix time in seconds.
    pub timestamp: u64,
}

pub struct BackendService {
    backend: Arc<dyn Backend>,
    deployment: DeploymentConfig,
    monitor: EventMonitor,
}

impl BackendService {
    pub fn new(
        backend: Arc<dyn Backend>,
        deployment: DeploymentConfig,
        monitor_config: MonitorConfig,
        checkpoint: Arc<dyn CheckpointStore>,
    ) -> Result<Self, ServiceError> {
        let monitor = EventMonitor::new(
            backend.clone(),
            deployment.contracts,
            monitor_config,
            Arc::new(EventIndex::new()),
            checkpoint,
        )?;
        Ok(BackendService {
            backend,
            deployment,
            monitor,
        })
    }

    pub fn monitor(&self) -> &EventMonitor {
        &self.monitor
    }

    /// Check the contracts and start the event monitor. Does nothing if already running.
    ///
    /// Fails if no contract is deployed at one of the configured addresses.
    pub async fn start(&self) -> Result<(), ServiceError> {
        if self.monitor.is_running() {
            log::info!("backend service already running");
            return Ok(());
        }
        log::info!("starting backend service for {}", self.deployment.network);
        self.initialize_contracts().await?;
        self.monitor.start();
        Ok(())
    }

    async fn initialize_contracts(&self) -> Result<(), ServiceError> {
        for (name, address) in self.deployment.contracts.named() {
            let class_hash = self
                .backend
                .class_hash_at(address)
                .await
                .map_err(|error| ServiceError::ContractInit {
                    name,
                    address,
                    error,
                })?;
            log::info!("{} contract at {} (class {:#x})", name, address, class_hash);
        }
        Ok(())
    }

    /// Stop the event monitor. Does nothing if not running.
    pub async fn stop(&self) {
        if self.monitor.stop().await {
            log::info!("backend service stopped");
        }
    }

    pub fn health_check(&self) -> HealthStatus {
        let running = self.monitor.is_running();
        HealthStatus {
            status: if running { "healthy" } else { "stopped" },
            running,
            last_processed_block: self.monitor.last_processed_block(),
            indexed_events: self.monitor.index().len(),
            timestamp: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map_or(0, |elapsed| elapsed.as_secs()),
        }
    }
}
