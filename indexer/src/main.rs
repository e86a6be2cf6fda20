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

//! Bountyhub event indexer.
//!
//! Checks that the contracts of the deployment config exist, polls their events until ctrl-c
//! is pressed and exits with a non-zero code if startup fails.
use std::error::Error as _;
use std::sync::Arc;

use structopt::StructOpt;

use bountyhub_client::{DeploymentConfig, RemoteNode};
use bountyhub_indexer::checkpoint::{CheckpointStore, FileCheckpoint, MemoryCheckpoint};
use bountyhub_indexer::service::{BackendService, ServiceError};

mod cli;
mod logger;

#[tokio::main]
async fn main() {
    let options = cli::Options::from_args();
    logger::init();
    if let Err(error) = run(options).await {
        log::error!("{}", error);
        let mut source = error.source();
        while let Some(cause) = source {
            log::error!("  caused by: {}", cause);
            source = cause.source();
        }
        std::process::exit(1);
    }
}

async fn run(options: cli::Options) -> Result<(), ServiceError> {
    let deployment = DeploymentConfig::load(&options.config)?;
    let backend = Arc::new(RemoteNode::new(options.rpc_url.clone()));
    let checkpoint: Arc<dyn CheckpointStore> = match &options.checkpoint_file {
        Some(path) => Arc::new(FileCheckpoint::new(path.clone())),
        None => Arc::new(MemoryCheckpoint::new()),
    };
    let service = BackendService::new(backend, deployment, options.monitor_config(), checkpoint)?;

    service.start().await?;
    if let Err(error) = tokio::signal::ctrl_c().await {
        log::error!("failed to listen for ctrl-c: {}", error);
    }
    log::info!("shutting down");
    service.stop().await;
    match serde_json::to_string(&service.health_check()) {
        Ok(health) => log::info!("final status: {}", health),
        Err(error) => log::warn!("failed to serialize status: {}", error),
    }
    Ok(())
}
