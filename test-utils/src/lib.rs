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

//! Miscellaneous helpers used throughout Bountyhub tests.
use std::sync::Arc;

use rand::distributions::Alphanumeric;
use rand::Rng;

use bountyhub_client::wallet::{AccountWallet, MemoryWalletHost};
use bountyhub_client::*;
use bountyhub_core::NewBounty;

/// Deadline far enough in the future for every test.
pub const FAR_DEADLINE: u64 = 4_000_000_000;

/// Returns a random address that is not one of the emulated contracts.
pub fn random_address() -> ContractAddress {
    let n = rand::thread_rng().gen_range(0x10_0000u64, u64::MAX);
    ContractAddress::from_felt(Felt::from(n))
}

pub fn random_alnum_string(size: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(size)
        .collect::<String>()
}

/// Returns a random valid bounty title.
pub fn random_title() -> BountyTitle {
    let size = rand::thread_rng().gen_range(1, 32);
    BountyTitle::from_string(random_alnum_string(size)).unwrap()
}

pub fn random_reward() -> Amount {
    Amount(rand::thread_rng().gen_range(1_000, 1_000_000))
}

/// Wallet host with an enabled-on-request wallet of `kind` for `address` on `emulator`.
pub fn wallet_host(
    emulator: &Emulator,
    kind: WalletKind,
    address: ContractAddress,
) -> MemoryWalletHost {
    let wallet = AccountWallet::new(Arc::new(emulator.account(address)));
    MemoryWalletHost::new().with(kind, Arc::new(wallet))
}

/// Returns a client for `emulator` with a connected account for a random address.
pub async fn connected_client(emulator: &Emulator) -> BountyClient {
    let mut client = BountyClient::new(Arc::new(emulator.clone()), emulator.deployment());
    let host = wallet_host(emulator, WalletKind::ArgentX, random_address());
    client.connect_wallet(&host).await.unwrap();
    client
}

/// Create a [NewBounty] with random parameters paid in the emulated reward token.
pub fn random_new_bounty(client: &BountyClient) -> NewBounty {
    BountyDraft {
        title: random_title().to_string(),
        description: format!("Task {}", random_alnum_string(40)),
        reward: random_reward(),
        reward_token: Some(client.contracts().reward_token),
        deadline: FAR_DEADLINE,
    }
    .validate(0)
    .unwrap()
}

/// Create a random bounty with `client` and return it.
pub async fn create_random_bounty(client: &BountyClient) -> Bounty {
    let new_bounty = random_new_bounty(client);
    client.create_bounty(new_bounty).await.unwrap();
    let count = client.get_bounty_count().await.unwrap();
    client.get_bounty_by_id(BountyId(count)).await.unwrap()
}
