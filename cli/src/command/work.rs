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

//! Define the commands supported by the CLI related to work submissions.

use super::*;

/// Work submission related commands
#[derive(StructOpt, Debug, Clone)]
pub enum Command {
    Submit(Submit),
    Show(Show),
    Approve(Approve),
}

#[async_trait::async_trait]
impl CommandT for Command {
    async fn run(&self, ctx: &CommandContext) -> Result<(), CommandError> {
        match self {
            Command::Submit(cmd) => cmd.run(ctx).await,
            Command::Show(cmd) => cmd.run(ctx).await,
            Command::Approve(cmd) => cmd.run(ctx).await,
        }
    }
}

#[derive(StructOpt, Debug, Clone)]
/// Submit the work for a bounty you were accepted for.
pub struct Submit {
    /// Id of the bounty
    bounty_id: BountyId,
    /// The delivered work, usually a link
    content: String,
}

#[async_trait::async_trait]
impl CommandT for Submit {
    async fn run(&self, ctx: &CommandContext) -> Result<(), CommandError> {
        let client = ctx.connected_client().await?;
        announce_tx(&format!("Submitting work for bounty {}...", self.bounty_id));
        let tx_hash = client.submit_work(self.bounty_id, &self.content).await?;
        print_tx(tx_hash);
        println!("Work submitted.");
        Ok(())
    }
}

#[derive(StructOpt, Debug, Clone)]
/// Show a work submission
pub struct Show {
    /// Id of the submission
    submission_id: SubmissionId,
}

#[async_trait::async_trait]
impl CommandT for Show {
    async fn run(&self, ctx: &CommandContext) -> Result<(), CommandError> {
        let submission = ctx.client()?.get_submission(self.submission_id).await?;
        println!("id: {}", submission.id);
        println!("bounty: {}", submission.bounty_id);
        println!("submitter: {}", submission.submitter);
        println!("content: {}", submission.content);
        println!("status: {:?}", submission.status);
        Ok(())
    }
}

#[derive(StructOpt, Debug, Clone)]
/// Approve a submission. Pays out the reward and completes the bounty.
pub struct Approve {
    /// Id of the submission
    submission_id: SubmissionId,
}

#[async_trait::async_trait]
impl CommandT for Approve {
    async fn run(&self, ctx: &CommandContext) -> Result<(), CommandError> {
        let client = ctx.connected_client().await?;
        announce_tx(&format!("Approving submission {}...", self.submission_id));
        let tx_hash = client.approve_submission(self.submission_id).await?;
        print_tx(tx_hash);
        println!("Submission {} approved.", self.submission_id);
        Ok(())
    }
}
