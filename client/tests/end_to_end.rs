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

//! Run complete marketplace scenarios against the emulator.
use std::sync::Arc;

use bountyhub_client::wallet::MemoryWalletHost;
use bountyhub_client::*;
use bountyhub_core::NewBounty;
use bountyhub_test_utils::*;

async fn events(emulator: &Emulator, emitter: ContractAddress) -> Vec<MarketEvent> {
    let page = emulator
        .get_events(EventQuery {
            from_block: 0,
            to_block: emulator.block_number().await.unwrap(),
            address: emitter,
            keys: vec![],
            chunk_size: 100,
            continuation_token: None,
        })
        .await
        .unwrap();
    page.events
        .iter()
        .map(|event| MarketEvent::decode(&event.keys, &event.data).unwrap())
        .collect()
}

#[tokio::test]
async fn connect_without_wallet() {
    let (mut client, _) = BountyClient::new_emulator();
    let error = client
        .connect_wallet(&MemoryWalletHost::new())
        .await
        .err()
        .unwrap();
    assert!(error.to_string().contains("not found"));
    assert_eq!(client.connected_address(), None);
}

#[tokio::test]
async fn create_bounty_requires_wallet() {
    let (client, emulator) = BountyClient::new_emulator();
    let error = client
        .create_bounty(random_new_bounty(&client))
        .await
        .err()
        .unwrap();
    assert_eq!(error.to_string(), "Wallet not connected");
    assert_eq!(emulator.transaction_count(), 0);
}

#[tokio::test]
async fn connect_and_disconnect() {
    let emulator = Emulator::new();
    let mut client = BountyClient::new(Arc::new(emulator.clone()), emulator.deployment());
    let address = random_address();
    let host = wallet_host(&emulator, WalletKind::Braavos, address);

    assert_eq!(client.connect_wallet(&host).await.unwrap(), address);
    assert_eq!(client.connected_wallet(), Some(WalletKind::Braavos));

    client.disconnect();
    assert_eq!(client.connected_address(), None);
    let error = client.cancel_bounty(BountyId(1)).await.err().unwrap();
    assert_eq!(error.to_string(), "Wallet not connected");
}

#[tokio::test]
async fn create_bounty() {
    let _ = env_logger::try_init();
    let emulator = Emulator::new();
    let client = connected_client(&emulator).await;
    let new_bounty = random_new_bounty(&client);

    client.create_bounty(new_bounty.clone()).await.unwrap();

    let bounty = client.get_bounty_by_id(BountyId(1)).await.unwrap();
    assert_eq!(bounty.title, new_bounty.title);
    assert_eq!(bounty.description, new_bounty.description);
    assert_eq!(bounty.reward, new_bounty.reward);
    assert_eq!(bounty.status, BountyStatus::Open);
    assert_eq!(Some(bounty.creator), client.connected_address());

    let escrow = client.get_escrow_balance(bounty.id).await.unwrap();
    assert_eq!(escrow.amount, new_bounty.reward);

    let created = events(&emulator, client.contracts().bounty_platform).await;
    assert_eq!(
        created,
        vec![MarketEvent::BountyCreated {
            bounty_id: bounty.id,
            creator: bounty.creator,
            reward: bounty.reward,
            deadline: new_bounty.deadline,
        }]
    );
}

#[tokio::test]
async fn list_bounties() {
    let emulator = Emulator::new();
    let client = connected_client(&emulator).await;
    let first = create_random_bounty(&client).await;
    let second = create_random_bounty(&client).await;

    assert_eq!(client.get_bounty_count().await.unwrap(), 2);
    assert_eq!(client.list_bounties().await.unwrap(), vec![first, second]);
}

#[tokio::test]
async fn complete_bounty() {
    let emulator = Emulator::new();
    let creator = connected_client(&emulator).await;
    let worker = connected_client(&emulator).await;
    let other = connected_client(&emulator).await;
    let bounty = create_random_bounty(&creator).await;

    worker
        .submit_application(bounty.id, "I have done this before")
        .await
        .unwrap();
    other
        .submit_application(bounty.id, "Pick me")
        .await
        .unwrap();
    let applications = creator.get_applications_for_bounty(bounty.id).await.unwrap();
    assert_eq!(applications.len(), 2);
    assert_eq!(applications[0].applicant, worker.connected_address().unwrap());
    assert_eq!(applications[0].status, ApplicationStatus::Pending);

    creator.accept_application(applications[0].id).await.unwrap();
    let accepted = creator.get_application(applications[0].id).await.unwrap();
    assert_eq!(accepted.status, ApplicationStatus::Accepted);
    let rejected = creator.get_application(applications[1].id).await.unwrap();
    assert_eq!(rejected.status, ApplicationStatus::Rejected);
    assert_eq!(
        creator.get_bounty_by_id(bounty.id).await.unwrap().status,
        BountyStatus::InProgress
    );

    let error = other.submit_work(bounty.id, "not accepted").await.err().unwrap();
    assert!(error.to_string().starts_with("Failed to submit work"));

    worker
        .submit_work(bounty.id, "https://example.com/pull/1")
        .await
        .unwrap();
    let submission = creator.get_submission(SubmissionId(1)).await.unwrap();
    assert_eq!(submission.status, SubmissionStatus::Pending);

    creator.approve_submission(submission.id).await.unwrap();

    assert_eq!(
        creator.get_submission(submission.id).await.unwrap().status,
        SubmissionStatus::Approved
    );
    assert_eq!(
        creator.get_bounty_by_id(bounty.id).await.unwrap().status,
        BountyStatus::Completed
    );
    assert_eq!(
        creator.get_escrow_balance(bounty.id).await.unwrap().amount,
        Amount(0)
    );
    let worker_address = worker.connected_address().unwrap();
    assert_eq!(
        creator.get_reputation(worker_address).await.unwrap().score,
        10
    );

    let fee = bounty.reward.0 * PLATFORM_FEE_BASIS_POINTS / 10_000;
    let payments = events(&emulator, creator.contracts().payment_processor).await;
    assert_eq!(
        payments,
        vec![
            MarketEvent::PaymentProcessed {
                bounty_id: bounty.id,
                recipient: worker_address,
                amount: Amount(bounty.reward.0 - fee),
            },
            MarketEvent::FeeCollected {
                bounty_id: bounty.id,
                amount: Amount(fee),
            },
        ]
    );
}

#[tokio::test]
async fn cancel_bounty_refunds_creator() {
    let emulator = Emulator::new();
    let creator = connected_client(&emulator).await;
    let bounty = create_random_bounty(&creator).await;

    creator.cancel_bounty(bounty.id).await.unwrap();

    assert_eq!(
        creator.get_bounty_by_id(bounty.id).await.unwrap().status,
        BountyStatus::Cancelled
    );
    let refunds = events(&emulator, creator.contracts().payment_processor).await;
    assert_eq!(
        refunds,
        vec![MarketEvent::RefundProcessed {
            bounty_id: bounty.id,
            recipient: bounty.creator,
            amount: bounty.reward,
        }]
    );

    let error = creator.cancel_bounty(bounty.id).await.err().unwrap();
    assert!(error.to_string().starts_with("Failed to cancel bounty"));
}

#[tokio::test]
async fn update_reputation_owner_only() {
    let emulator = Emulator::new();
    let user = random_address();
    let mut owner = BountyClient::new(Arc::new(emulator.clone()), emulator.deployment());
    owner.connect_account(Arc::new(emulator.account(*EMULATOR_OWNER)));
    let stranger = connected_client(&emulator).await;

    owner.update_reputation(user, 25).await.unwrap();
    assert_eq!(owner.get_reputation(user).await.unwrap().score, 25);

    let error = stranger.update_reputation(user, 25).await.err().unwrap();
    match error {
        Error::Contract { operation, .. } => assert_eq!(operation, "update reputation"),
        other => panic!("unexpected error {}", other),
    }
    assert_eq!(owner.get_reputation(user).await.unwrap().score, 25);
}

#[tokio::test]
async fn get_missing_bounty() {
    let (client, _) = BountyClient::new_emulator();
    let error = client.get_bounty_by_id(BountyId(42)).await.err().unwrap();
    assert!(error.to_string().starts_with("Failed to get bounty"));
}

#[tokio::test]
async fn complete_bounty_with_maximum_reward() {
    let emulator = Emulator::new();
    let creator = connected_client(&emulator).await;
    let worker = connected_client(&emulator).await;
    let reward = Amount(u128::MAX);
    creator
        .create_bounty(NewBounty {
            reward,
            ..random_new_bounty(&creator)
        })
        .await
        .unwrap();
    let bounty_id = BountyId(1);
    assert_eq!(creator.get_escrow_balance(bounty_id).await.unwrap().amount, reward);

    worker.submit_application(bounty_id, "On it").await.unwrap();
    creator.accept_application(ApplicationId(1)).await.unwrap();
    worker.submit_work(bounty_id, "Done").await.unwrap();
    creator.approve_submission(SubmissionId(1)).await.unwrap();

    let fee = Amount(u128::MAX / 20);
    let payments = events(&emulator, creator.contracts().payment_processor).await;
    assert_eq!(
        payments,
        vec![
            MarketEvent::PaymentProcessed {
                bounty_id,
                recipient: worker.connected_address().unwrap(),
                amount: Amount(reward.0 - fee.0),
            },
            MarketEvent::FeeCollected {
                bounty_id,
                amount: fee,
            },
        ]
    );
}

#[tokio::test]
async fn cancel_bounty_in_progress() {
    let emulator = Emulator::new();
    let creator = connected_client(&emulator).await;
    let worker = connected_client(&emulator).await;
    let bounty = create_random_bounty(&creator).await;
    worker.submit_application(bounty.id, "On it").await.unwrap();
    creator.accept_application(ApplicationId(1)).await.unwrap();

    let error = creator.cancel_bounty(bounty.id).await.err().unwrap();
    assert!(error.to_string().starts_with("Failed to cancel bounty"));
    let bounty = creator.get_bounty_by_id(bounty.id).await.unwrap();
    assert_eq!(bounty.status, BountyStatus::InProgress);
    assert_eq!(
        creator.get_escrow_balance(bounty.id).await.unwrap().amount,
        bounty.reward
    );
}

/// Emulator whose bounty count getter answers with an absurd value.
struct InflatedCount(Emulator);

#[async_trait::async_trait]
impl Backend for InflatedCount {
    async fn block_number(&self) -> Result<BlockNumber, Error> {
        self.0.block_number().await
    }

    async fn get_events(&self, query: EventQuery) -> Result<EventsPage, Error> {
        self.0.get_events(query).await
    }

    async fn call(&self, call: ContractCall) -> Result<Vec<Felt>, Error> {
        if call.selector == Entrypoint::GetBountyCount.selector() {
            return Ok(vec![Felt::from(u64::MAX)]);
        }
        self.0.call(call).await
    }

    async fn class_hash_at(&self, address: ContractAddress) -> Result<Felt, Error> {
        self.0.class_hash_at(address).await
    }

    async fn chain_id(&self) -> Result<Felt, Error> {
        self.0.chain_id().await
    }
}

#[tokio::test]
async fn list_bounties_with_inflated_count() {
    let emulator = Emulator::new();
    let client = BountyClient::new(
        Arc::new(InflatedCount(emulator.clone())),
        emulator.deployment(),
    );
    assert_eq!(client.get_bounty_count().await.unwrap(), u64::MAX);

    let error = client.list_bounties().await.err().unwrap();
    assert!(error.to_string().starts_with("Failed to get bounty"));
}
