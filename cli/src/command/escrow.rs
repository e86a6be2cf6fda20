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

//! Define the commands supported by the CLI related to escrowed rewards.

use super::*;

/// Escrow related commands
#[derive(StructOpt, Debug, Clone)]
pub enum Command {
    Show(Show),
}

#[async_trait::async_trait]
impl CommandT for Command {
    async fn run(&self, ctx: &CommandContext) -> Result<(), CommandError> {
        match self {
            Command::Show(cmd) => cmd.run(ctx).await,
        }
    }
}

#[derive(StructOpt, Debug, Clone)]
/// Show the amount held in escrow for a bounty
pub struct Show {
    /// Id of the bounty
    bounty_id: BountyId,
}

#[async_trait::async_trait]
impl CommandT for Show {
    async fn run(&self, ctx: &CommandContext) -> Result<(), CommandError> {
        let balance = ctx.client()?.get_escrow_balance(self.bounty_id).await?;
        println!("Bounty {} escrow: {}", balance.bounty_id, balance.amount);
        Ok(())
    }
}
