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

//! Define the commands supported by the CLI related to applications.

use super::*;

/// Application related commands
#[derive(StructOpt, Debug, Clone)]
pub enum Command {
    Submit(Submit),
    Accept(Accept),
    List(List),
}

#[async_trait::async_trait]
impl CommandT for Command {
    async fn run(&self, ctx: &CommandContext) -> Result<(), CommandError> {
        match self {
            Command::Submit(cmd) => cmd.run(ctx).await,
            Command::Accept(cmd) => cmd.run(ctx).await,
            Command::List(cmd) => cmd.run(ctx).await,
        }
    }
}

#[derive(StructOpt, Debug, Clone)]
/// Apply to work on an open bounty.
pub struct Submit {
    /// Id of the bounty
    bounty_id: BountyId,
    /// How you intend to complete the bounty
    proposal: String,
}

#[async_trait::async_trait]
impl CommandT for Submit {
    async fn run(&self, ctx: &CommandContext) -> Result<(), CommandError> {
        let client = ctx.connected_client().await?;
        announce_tx(&format!("Applying to bounty {}...", self.bounty_id));
        let tx_hash = client
            .submit_application(self.bounty_id, &self.proposal)
            .await?;
        print_tx(tx_hash);
        println!("Application submitted.");
        Ok(())
    }
}

#[derive(StructOpt, Debug, Clone)]
/// Accept an application to one of your bounties.
///
/// All other applications to the bounty are rejected.
pub struct Accept {
    /// Id of the application
    application_id: ApplicationId,
}

#[async_trait::async_trait]
impl CommandT for Accept {
    async fn run(&self, ctx: &CommandContext) -> Result<(), CommandError> {
        let client = ctx.connected_client().await?;
        announce_tx(&format!("Accepting application {}...", self.application_id));
        let tx_hash = client.accept_application(self.application_id).await?;
        print_tx(tx_hash);
        println!("Application {} accepted.", self.application_id);
        Ok(())
    }
}

#[derive(StructOpt, Debug, Clone)]
/// List the applications to a bounty
pub struct List {
    /// Id of the bounty
    bounty_id: BountyId,
}

#[async_trait::async_trait]
impl CommandT for List {
    async fn run(&self, ctx: &CommandContext) -> Result<(), CommandError> {
        let applications = ctx
            .client()?
            .get_applications_for_bounty(self.bounty_id)
            .await?;
        println!("APPLICATIONS ({})", applications.len());
        for application in applications {
            println!(
                "{}\t{:?}\t{}\t{}",
                application.id, application.status, application.applicant, application.proposal
            );
        }
        Ok(())
    }
}
