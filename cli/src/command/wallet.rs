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

//! Define the commands supported by the CLI related to local wallet accounts.

use super::*;
use crate::account_storage::AccountData;

/// Wallet account related commands
#[derive(StructOpt, Debug, Clone)]
pub enum Command {
    Add(Add),
    List(List),
    Connect(Connect),
}

#[async_trait::async_trait]
impl CommandT for Command {
    async fn run(&self, ctx: &CommandContext) -> Result<(), CommandError> {
        match self {
            Command::Add(cmd) => cmd.run(ctx).await,
            Command::List(cmd) => cmd.run(ctx).await,
            Command::Connect(cmd) => cmd.run(ctx).await,
        }
    }
}

#[derive(StructOpt, Debug, Clone)]
/// Store an account under a local name.
///
/// Use the name with --account to sign transactions with the account.
pub struct Add {
    /// The name that uniquely identifies the account locally.
    name: String,

    /// Address of the account contract.
    address: ContractAddress,

    /// Hex encoded private key of the account.
    #[structopt(long, env = "BOUNTYHUB_PRIVATE_KEY", hide_env_values = true)]
    private_key: String,

    /// The wallet the account belongs to, argentx or braavos.
    #[structopt(long, default_value = "argentx", parse(try_from_str = parse_wallet_kind))]
    wallet: WalletKind,
}

#[async_trait::async_trait]
impl CommandT for Add {
    async fn run(&self, ctx: &CommandContext) -> Result<(), CommandError> {
        let data = AccountData {
            wallet: self.wallet,
            address: self.address,
            private_key: self.private_key.clone(),
        };
        data.private_key()?;
        ctx.account_storage()?.add(self.name.clone(), data)?;
        println!("✓ Account {} stored as a {} account.", self.name, self.wallet);
        Ok(())
    }
}

#[derive(StructOpt, Debug, Clone)]
/// List all the local accounts.
pub struct List {}

#[async_trait::async_trait]
impl CommandT for List {
    async fn run(&self, ctx: &CommandContext) -> Result<(), CommandError> {
        let mut accounts: Vec<_> = ctx.account_storage()?.list()?.into_iter().collect();
        accounts.sort_by(|(a, _), (b, _)| a.cmp(b));
        println!("ACCOUNTS ({})", accounts.len());
        for (name, data) in accounts {
            println!("{}\t{}\t{}", name, data.wallet, data.address);
        }
        Ok(())
    }
}

#[derive(StructOpt, Debug, Clone)]
/// Connect the wallet of the selected account and show its address.
pub struct Connect {}

#[async_trait::async_trait]
impl CommandT for Connect {
    async fn run(&self, ctx: &CommandContext) -> Result<(), CommandError> {
        let client = ctx.connected_client().await?;
        let connection = (client.connected_address(), client.connected_wallet());
        if let (Some(address), Some(wallet)) = connection {
            println!("Connected {} through {}", address, wallet);
        }
        Ok(())
    }
}
