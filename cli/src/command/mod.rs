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

//! Define the commands supported by the CLI.

use crate::{CommandContext, CommandError, CommandT};
use bountyhub_client::*;

use structopt::StructOpt;

pub mod application;
pub mod bounty;
pub mod deploy;
pub mod escrow;
pub mod other;
pub mod reputation;
pub mod wallet;
pub mod work;

fn announce_tx(msg: &str) {
    println!("{}", msg);
    println!("⏳ Transactions might take a while to be processed. Please wait...");
}

fn print_tx(tx_hash: TxHash) {
    println!("Transaction hash: {:#x}", tx_hash);
}

fn unix_now() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_secs())
}

fn parse_wallet_kind(name: &str) -> Result<WalletKind, String> {
    WalletKind::ALL
        .iter()
        .copied()
        .find(|kind| kind.name().eq_ignore_ascii_case(name))
        .ok_or_else(|| format!("unknown wallet {}, expected argentx or braavos", name))
}
