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

//! Define the commands supported by the CLI that
//! are not related to any specific domain.

use super::*;

/// Other commands, not related to any specific domain.
#[derive(StructOpt, Debug, Clone)]
pub enum Command {
    BlockNumber(ShowBlockNumber),
}

#[async_trait::async_trait]
impl CommandT for Command {
    async fn run(&self, ctx: &CommandContext) -> Result<(), CommandError> {
        match self {
            Command::BlockNumber(cmd) => cmd.run(ctx).await,
        }
    }
}

#[derive(StructOpt, Debug, Clone)]
/// Show the number of the latest block
pub struct ShowBlockNumber {}

#[async_trait::async_trait]
impl CommandT for ShowBlockNumber {
    async fn run(&self, ctx: &CommandContext) -> Result<(), CommandError> {
        let block_number = ctx.node().block_number().await?;
        println!("Latest block: {}", block_number);
        Ok(())
    }
}
