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

//! Define the command line parser and interface.

#![allow(clippy::large_enum_variant)]

use std::path::PathBuf;
use std::sync::Arc;

use bountyhub_client::deploy::DeployError;
use bountyhub_client::wallet::{KeystoreWallet, MemoryWalletHost};
use bountyhub_client::*;
use structopt::StructOpt;
use thiserror::Error as ThisError;

pub mod account_storage;
use account_storage::{AccountData, AccountStorage};

mod command;
use command::{application, bounty, deploy, escrow, other, reputation, wallet, work};

/// The type that captures the command line.
#[derive(StructOpt, Clone)]
#[structopt(max_term_width = 80)]
pub struct CommandLine {
    #[structopt(flatten)]
    pub network_options: NetworkOptions,

    #[structopt(flatten)]
    pub tx_options: TxOptions,

    #[structopt(subcommand)]
    pub command: Command,
}

impl CommandLine {
    pub async fn run(self) -> Result<(), CommandError> {
        let CommandLine {
            network_options,
            tx_options,
            command,
        } = self;
        let ctx = CommandContext {
            network_options,
            tx_options,
        };
        command.run(&ctx).await
    }
}

/// Network-related command-line options
#[derive(StructOpt, Clone, Debug)]
pub struct NetworkOptions {
    /// URL of the Starknet JSON-RPC endpoint
    #[structopt(
        long,
        default_value = "http://127.0.0.1:5050/rpc",
        env = "STARKNET_RPC_URL",
        global = true
    )]
    pub rpc_url: url::Url,

    /// Deployment config file with the contract addresses
    #[structopt(
        long,
        default_value = DEFAULT_CONFIG_FILE,
        env = "BOUNTYHUB_CONFIG",
        parse(from_os_str),
        global = true
    )]
    pub config: PathBuf,
}

/// Transaction-related command-line options
#[derive(StructOpt, Clone, Debug)]
pub struct TxOptions {
    /// The name of the local account to be used to sign transactions.
    #[structopt(
        long,
        env = "BOUNTYHUB_ACCOUNT",
        value_name = "account_name",
        global = true
    )]
    pub account: Option<String>,

    /// File the local accounts are stored in.
    /// Defaults to `accounts.json` in the user data directory.
    #[structopt(
        long,
        env = "BOUNTYHUB_ACCOUNTS_FILE",
        parse(from_os_str),
        global = true
    )]
    pub accounts_file: Option<PathBuf>,
}

/// Everything a command needs to talk to the marketplace.
pub struct CommandContext {
    pub network_options: NetworkOptions,
    pub tx_options: TxOptions,
}

impl CommandContext {
    pub fn deployment(&self) -> Result<DeploymentConfig, CommandError> {
        Ok(DeploymentConfig::load(&self.network_options.config)?)
    }

    pub fn node(&self) -> RemoteNode {
        RemoteNode::new(self.network_options.rpc_url.clone())
    }

    /// Client without a connected wallet. Only reads contract state.
    pub fn client(&self) -> Result<BountyClient, CommandError> {
        Ok(BountyClient::create_with_remote_node(
            &self.network_options.rpc_url,
            self.deployment()?,
        ))
    }

    pub fn account_storage(&self) -> Result<AccountStorage, CommandError> {
        match &self.tx_options.accounts_file {
            Some(path) => Ok(AccountStorage::at(path.clone())),
            None => Ok(AccountStorage::default_location()?),
        }
    }

    /// The stored account selected with `--account`.
    pub fn account(&self) -> Result<(String, AccountData), CommandError> {
        let name = self
            .tx_options
            .account
            .clone()
            .ok_or(CommandError::NoAccountSelected)?;
        let data = self.account_storage()?.get(&name)?;
        Ok((name, data))
    }

    /// Wallet host that exposes the selected account under the global name of its wallet.
    ///
    /// The host is empty if no account is selected.
    pub fn wallet_host(&self, node: Arc<RemoteNode>) -> Result<MemoryWalletHost, CommandError> {
        let mut host = MemoryWalletHost::new();
        if self.tx_options.account.is_some() {
            let (_, data) = self.account()?;
            let private_key = data.private_key()?;
            host.inject(
                data.wallet,
                Arc::new(KeystoreWallet::new(node, data.address, private_key)),
            );
        }
        Ok(host)
    }

    /// Client with the wallet of the selected account connected.
    pub async fn connected_client(&self) -> Result<BountyClient, CommandError> {
        let node = Arc::new(self.node());
        let mut client = BountyClient::new(node.clone(), self.deployment()?);
        let host = self.wallet_host(node)?;
        client.connect_wallet(&host).await?;
        Ok(client)
    }
}

/// The supported [CommandLine] commands.
/// The commands are grouped by domain.
#[derive(StructOpt, Clone)]
pub enum Command {
    Bounty(bounty::Command),
    Application(application::Command),
    Work(work::Command),
    Escrow(escrow::Command),
    Reputation(reputation::Command),
    Wallet(wallet::Command),
    /// Declare and deploy the marketplace contracts
    Deploy(deploy::Deploy),

    #[structopt(flatten)]
    Other(other::Command),
}

#[async_trait::async_trait]
impl CommandT for Command {
    async fn run(&self, ctx: &CommandContext) -> Result<(), CommandError> {
        match self {
            Command::Bounty(cmd) => cmd.run(ctx).await,
            Command::Application(cmd) => cmd.run(ctx).await,
            Command::Work(cmd) => cmd.run(ctx).await,
            Command::Escrow(cmd) => cmd.run(ctx).await,
            Command::Reputation(cmd) => cmd.run(ctx).await,
            Command::Wallet(cmd) => cmd.run(ctx).await,
            Command::Deploy(cmd) => cmd.run(ctx).await,
            Command::Other(cmd) => cmd.run(ctx).await,
        }
    }
}

/// The trait that every command must implement.
#[async_trait::async_trait]
pub trait CommandT {
    async fn run(&self, ctx: &CommandContext) -> Result<(), CommandError>;
}

/// Error returned by [CommandT::run].
///
/// Implements [From] for client errors and [account_storage] errors.
#[derive(Debug, ThisError)]
pub enum CommandError {
    #[error(transparent)]
    ClientError(#[from] Error),

    #[error(transparent)]
    InvalidForm(#[from] FormError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Deploy(#[from] DeployError),

    #[error(transparent)]
    AccountStorageError(#[from] account_storage::Error),

    #[error("No account selected, pass --account or set BOUNTYHUB_ACCOUNT")]
    NoAccountSelected,
}
