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

//! Define the commands supported by the CLI related to reputation.

use super::*;

/// Reputation related commands
#[derive(StructOpt, Debug, Clone)]
pub enum Command {
    Show(Show),
    Update(Update),
}

#[async_trait::async_trait]
impl CommandT for Command {
    async fn run(&self, ctx: &CommandContext) -> Result<(), CommandError> {
        match self {
            Command::Show(cmd) => cmd.run(ctx).await,
            Command::Update(cmd) => cmd.run(ctx).await,
        }
    }
}

#[derive(StructOpt, Debug, Clone)]
/// Show the reputation score of a user
pub struct Show {
    /// Account address of the user
    user: ContractAddress,
}

#[async_trait::async_trait]
impl CommandT for Show {
    async fn run(&self, ctx: &CommandContext) -> Result<(), CommandError> {
        let reputation = ctx.client()?.get_reputation(self.user).await?;
        println!("{}: {}", reputation.user, reputation.score);
        Ok(())
    }
}

#[derive(StructOpt, Debug, Clone)]
/// Add points to the reputation of a user. Only the contract owner may do this.
pub struct Update {
    /// Account address of the user
    user: ContractAddress,
    /// Points to add
    points: u64,
}

#[async_trait::async_trait]
impl CommandT for Update {
    async fn run(&self, ctx: &CommandContext) -> Result<(), CommandError> {
        let client = ctx.connected_client().await?;
        announce_tx(&format!("Updating reputation of {}...", self.user));
        let tx_hash = client.update_reputation(self.user, self.points).await?;
        print_tx(tx_hash);
        println!("Reputation updated.");
        Ok(())
    }
}
