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

//! Command line options of the indexer.
use std::path::PathBuf;
use std::time::Duration;

use structopt::StructOpt;

use bountyhub_client::DEFAULT_CONFIG_FILE;
use bountyhub_indexer::monitor::MonitorConfig;

/// Watch the marketplace contracts and index their events.
#[derive(StructOpt, Clone, Debug)]
#[structopt(name = "bountyhub-indexer", max_term_width = 80)]
pub struct Options {
    /// JSON-RPC endpoint of the Starknet node
    #[structopt(
        long,
        env = "STARKNET_RPC_URL",
        default_value = "http://127.0.0.1:5050/rpc",
        parse(try_from_str = url::Url::parse),
    )]
    pub rpc_url: url::Url,

    /// Deployment config file with the contract addresses
    #[structopt(
        long,
        env = "BOUNTYHUB_CONFIG",
        default_value = DEFAULT_CONFIG_FILE,
        parse(from_os_str),
    )]
    pub config: PathBuf,

    /// Seconds between two poll cycles
    #[structopt(long, env = "BOUNTYHUB_POLL_INTERVAL", default_value = "10")]
    pub poll_interval_secs: u64,

    /// Maximum number of events fetched per event category and poll cycle
    #[structopt(long, env = "BOUNTYHUB_CHUNK_SIZE", default_value = "100")]
    pub chunk_size: u64,

    /// Block to start from if there is no checkpoint
    #[structopt(long, default_value = "0")]
    pub start_block: u64,

    /// File to persist the last processed block in. The checkpoint is kept in memory if
    /// omitted.
    #[structopt(long, env = "BOUNTYHUB_CHECKPOINT_FILE", parse(from_os_str))]
    pub checkpoint_file: Option<PathBuf>,
}

impl Options {
    pub fn monitor_config(&self) -> MonitorConfig {
        MonitorConfig {
            poll_interval: Duration::from_secs(self.poll_interval_secs.max(1)),
            chunk_size: self.chunk_size,
            start_block: self.start_block,
        }
    }
}
