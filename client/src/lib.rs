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

//! Client for the Bountyhub marketplace contracts.
//!
//! [BountyClient] wraps every contract entrypoint of the marketplace. It talks to the chain
//! through a [Backend]: either a [RemoteNode] or the in-memory [Emulator]. Transactions are
//! signed by the [Account] of a wallet connected with [BountyClient::connect_wallet].
//!
//! ```no_run
//! # async fn example() -> Result<(), bountyhub_client::Error> {
//! use bountyhub_client::*;
//!
//! let config = DeploymentConfig::load(DEFAULT_CONFIG_FILE)?;
//! let rpc_url = config.rpc_url.parse().map_err(|_| Error::from("invalid RPC URL"))?;
//! let client = BountyClient::create_with_remote_node(&rpc_url, config);
//! println!("{} bounties", client.get_bounty_count().await?);
//! # Ok(())
//! # }
//! ```
use std::sync::Arc;

use bountyhub_core::cairo::{Decode, Encode};
use bountyhub_core::form::NewBounty;

mod backend;
mod config;
pub mod deploy;
mod entrypoint;
mod error;
mod interface;
pub mod wallet;

pub use crate::backend::{
    Emulator, EmulatorAccount, RemoteAccount, RemoteNode, EMULATOR_OWNER,
    PLATFORM_FEE_BASIS_POINTS,
};
pub use crate::config::{ConfigError, ContractAddresses, DeploymentConfig, DEFAULT_CONFIG_FILE};
pub use crate::entrypoint::Entrypoint;
pub use crate::interface::*;
pub use crate::wallet::{WalletHost, WalletKind, WalletProvider};

/// Connected wallet account and the kind of wallet it came from.
#[derive(Clone)]
struct Connection {
    account: Arc<dyn Account>,
    wallet: Option<WalletKind>,
}

/// Client to interact with the marketplace contracts.
///
/// The client is an explicit context: it holds the backend, the contract addresses and the
/// connected account. Writes fail with [Error::WalletNotConnected] until a wallet is connected.
#[derive(Clone)]
pub struct BountyClient {
    backend: Arc<dyn Backend>,
    config: DeploymentConfig,
    connection: Option<Connection>,
}

impl BountyClient {
    pub fn new(backend: Arc<dyn Backend>, config: DeploymentConfig) -> Self {
        BountyClient {
            backend,
            config,
            connection: None,
        }
    }

    /// Create a client that talks to the node at `rpc_url`.
    pub fn create_with_remote_node(rpc_url: &url::Url, config: DeploymentConfig) -> Self {
        let node = RemoteNode::new(rpc_url.clone());
        Self::new(Arc::new(node), config)
    }

    /// Create a client with a fresh [Emulator] backend.
    pub fn new_emulator() -> (Self, Emulator) {
        let emulator = Emulator::new();
        let client = Self::new(Arc::new(emulator.clone()), emulator.deployment());
        (client, emulator)
    }

    pub fn backend(&self) -> &Arc<dyn Backend> {
        &self.backend
    }

    pub fn config(&self) -> &DeploymentConfig {
        &self.config
    }

    pub fn contracts(&self) -> &ContractAddresses {
        &self.config.contracts
    }

    /// Detect a wallet in `host`, enable it and use its account for all further writes.
    pub async fn connect_wallet(
        &mut self,
        host: &dyn WalletHost,
    ) -> Result<ContractAddress, Error> {
        let provider = WalletProvider::detect(host)?;
        let account = provider.connect().await?;
        let address = account.address();
        log::info!("connected {} wallet {}", provider.kind(), address);
        self.connection = Some(Connection {
            account,
            wallet: Some(provider.kind()),
        });
        Ok(address)
    }

    /// Use `account` for all further writes.
    pub fn connect_account(&mut self, account: Arc<dyn Account>) -> ContractAddress {
        let address = account.address();
        self.connection = Some(Connection {
            account,
            wallet: None,
        });
        address
    }

    pub fn disconnect(&mut self) {
        self.connection = None;
    }

    pub fn connected_address(&self) -> Option<ContractAddress> {
        self.connection
            .as_ref()
            .map(|connection| connection.account.address())
    }

    /// Kind of the wallet the account was connected through. `None` for accounts connected
    /// with [BountyClient::connect_account].
    pub fn connected_wallet(&self) -> Option<WalletKind> {
        self.connection
            .as_ref()
            .and_then(|connection| connection.wallet)
    }

    fn account(&self) -> Result<&Arc<dyn Account>, Error> {
        self.connection
            .as_ref()
            .map(|connection| &connection.account)
            .ok_or(Error::WalletNotConnected)
    }

    async fn execute(
        &self,
        operation: &'static str,
        calls: Vec<ContractCall>,
    ) -> Result<TxHash, Error> {
        let account = self.account()?;
        let tx_hash = account
            .execute(calls)
            .await
            .map_err(|error| Error::contract(operation, error))?;
        log::debug!("{}: submitted transaction {:#x}", operation, tx_hash);
        Ok(tx_hash)
    }

    async fn view<T: Decode>(
        &self,
        operation: &'static str,
        to: ContractAddress,
        entrypoint: Entrypoint,
        calldata: Vec<Felt>,
    ) -> Result<T, Error> {
        let output = self
            .backend
            .call(entrypoint.call(to, calldata))
            .await
            .map_err(|error| Error::contract(operation, error))?;
        T::decode(&output).map_err(|error| Error::InvalidResponse { operation, error })
    }

    /// Post a bounty and lock its reward in escrow.
    ///
    /// Submits one transaction with two calls: `approve` on the reward token to let the escrow
    /// contract take the reward, then `create_bounty` on the bounty platform.
    pub async fn create_bounty(&self, bounty: NewBounty) -> Result<TxHash, Error> {
        let contracts = self.contracts();
        let mut approve = Vec::new();
        contracts.escrow.encode_to(&mut approve);
        bounty.reward.encode_to(&mut approve);

        let mut create = Vec::new();
        bounty.title.encode_to(&mut create);
        bounty.description.encode_to(&mut create);
        bounty.reward.encode_to(&mut create);
        bounty.reward_token.encode_to(&mut create);
        bounty.deadline.encode_to(&mut create);

        self.execute(
            "create bounty",
            vec![
                Entrypoint::Approve.call(bounty.reward_token, approve),
                Entrypoint::CreateBounty.call(contracts.bounty_platform, create),
            ],
        )
        .await
    }

    pub async fn submit_application(
        &self,
        bounty_id: BountyId,
        proposal: &str,
    ) -> Result<TxHash, Error> {
        let mut calldata = bounty_id.encode();
        proposal.encode_to(&mut calldata);
        self.execute(
            "submit application",
            vec![Entrypoint::SubmitApplication.call(self.contracts().bounty_platform, calldata)],
        )
        .await
    }

    pub async fn accept_application(&self, application_id: ApplicationId) -> Result<TxHash, Error> {
        self.execute(
            "accept application",
            vec![Entrypoint::AcceptApplication
                .call(self.contracts().bounty_platform, application_id.encode())],
        )
        .await
    }

    pub async fn submit_work(&self, bounty_id: BountyId, content: &str) -> Result<TxHash, Error> {
        let mut calldata = bounty_id.encode();
        content.encode_to(&mut calldata);
        self.execute(
            "submit work",
            vec![Entrypoint::SubmitWork.call(self.contracts().bounty_platform, calldata)],
        )
        .await
    }

    /// Approve submitted work. The contracts release the escrowed reward to the submitter.
    pub async fn approve_submission(&self, submission_id: SubmissionId) -> Result<TxHash, Error> {
        self.execute(
            "approve submission",
            vec![Entrypoint::ApproveSubmission
                .call(self.contracts().bounty_platform, submission_id.encode())],
        )
        .await
    }

    /// Cancel an open bounty. The contracts refund the escrowed reward to the creator.
    pub async fn cancel_bounty(&self, bounty_id: BountyId) -> Result<TxHash, Error> {
        self.execute(
            "cancel bounty",
            vec![Entrypoint::CancelBounty.call(
                self.contracts().bounty_platform,
                bounty_id.encode(),
            )],
        )
        .await
    }

    /// Add `points` to the reputation score of `user`.
    pub async fn update_reputation(
        &self,
        user: ContractAddress,
        points: u64,
    ) -> Result<TxHash, Error> {
        let mut calldata = user.encode();
        points.encode_to(&mut calldata);
        self.execute(
            "update reputation",
            vec![Entrypoint::UpdateReputation.call(self.contracts().reputation, calldata)],
        )
        .await
    }

    pub async fn get_bounty_by_id(&self, id: BountyId) -> Result<Bounty, Error> {
        self.view(
            "get bounty",
            self.contracts().bounty_platform,
            Entrypoint::GetBounty,
            id.encode(),
        )
        .await
    }

    pub async fn get_bounty_count(&self) -> Result<u64, Error> {
        self.view(
            "get bounty count",
            self.contracts().bounty_platform,
            Entrypoint::GetBountyCount,
            vec![],
        )
        .await
    }

    /// Fetch all bounties. Bounty ids are assigned sequentially starting at one.
    ///
    /// The count reported by the contract is not used to preallocate. A count larger than the
    /// number of stored bounties fails on the first missing id.
    pub async fn list_bounties(&self) -> Result<Vec<Bounty>, Error> {
        let count = self.get_bounty_count().await?;
        let mut bounties = Vec::new();
        for id in 1..=count {
            bounties.push(self.get_bounty_by_id(BountyId(id)).await?);
        }
        Ok(bounties)
    }

    pub async fn get_application(&self, id: ApplicationId) -> Result<Application, Error> {
        self.view(
            "get application",
            self.contracts().bounty_platform,
            Entrypoint::GetApplication,
            id.encode(),
        )
        .await
    }

    pub async fn get_applications_for_bounty(
        &self,
        bounty_id: BountyId,
    ) -> Result<Vec<Application>, Error> {
        self.view(
            "get applications",
            self.contracts().bounty_platform,
            Entrypoint::GetBountyApplications,
            bounty_id.encode(),
        )
        .await
    }

    pub async fn get_submission(&self, id: SubmissionId) -> Result<Submission, Error> {
        self.view(
            "get submission",
            self.contracts().bounty_platform,
            Entrypoint::GetSubmission,
            id.encode(),
        )
        .await
    }

    pub async fn get_escrow_balance(&self, bounty_id: BountyId) -> Result<EscrowBalance, Error> {
        let amount = self
            .view(
                "get escrow balance",
                self.contracts().escrow,
                Entrypoint::GetEscrowBalance,
                bounty_id.encode(),
            )
            .await?;
        Ok(EscrowBalance { bounty_id, amount })
    }

    pub async fn get_reputation(&self, user: ContractAddress) -> Result<Reputation, Error> {
        let score = self
            .view(
                "get reputation",
                self.contracts().reputation,
                Entrypoint::GetReputation,
                user.encode(),
            )
            .await?;
        Ok(Reputation { user, score })
    }
}
