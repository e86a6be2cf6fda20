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

//! Define the commands supported by the CLI related to bounties.

use super::*;

const SECONDS_PER_DAY: u64 = 86_400;

/// Bounty related commands
#[derive(StructOpt, Debug, Clone)]
pub enum Command {
    Create(Create),
    Show(Show),
    List(List),
    Cancel(Cancel),
}

#[async_trait::async_trait]
impl CommandT for Command {
    async fn run(&self, ctx: &CommandContext) -> Result<(), CommandError> {
        match self {
            Command::Create(cmd) => cmd.run(ctx).await,
            Command::Show(cmd) => cmd.run(ctx).await,
            Command::List(cmd) => cmd.run(ctx).await,
            Command::Cancel(cmd) => cmd.run(ctx).await,
        }
    }
}

#[derive(StructOpt, Debug, Clone)]
/// Create a bounty and lock its reward in escrow.
///
/// The reward is approved to the escrow contract and the bounty is created in a single
/// transaction.
pub struct Create {
    /// Title of the bounty, at most 31 characters.
    title: String,

    /// Description of the work to be done.
    description: String,

    /// Reward in the smallest unit of the reward token.
    reward: Amount,

    /// ERC20 token the reward is paid in.
    /// Defaults to the reward token of the deployment config.
    #[structopt(long, value_name = "address")]
    token: Option<ContractAddress>,

    /// Deadline as a unix timestamp in seconds. Overrides --days.
    #[structopt(long, value_name = "timestamp")]
    deadline: Option<u64>,

    /// Number of days from now until the deadline.
    #[structopt(long, default_value = "7")]
    days: u64,
}

impl Create {
    fn deadline(&self, now: u64) -> Result<u64, FormError> {
        match self.deadline {
            Some(deadline) => Ok(deadline),
            None => self
                .days
                .checked_mul(SECONDS_PER_DAY)
                .and_then(|seconds| now.checked_add(seconds))
                .ok_or(FormError::DeadlineOutOfRange),
        }
    }

    fn draft(&self, ctx: &CommandContext, now: u64) -> Result<BountyDraft, FormError> {
        let reward_token = self.token.or_else(|| {
            ctx.deployment()
                .ok()
                .map(|config| config.contracts.reward_token)
        });
        Ok(BountyDraft {
            title: self.title.clone(),
            description: self.description.clone(),
            reward: self.reward,
            reward_token,
            deadline: self.deadline(now)?,
        })
    }
}

#[async_trait::async_trait]
impl CommandT for Create {
    async fn run(&self, ctx: &CommandContext) -> Result<(), CommandError> {
        let now = unix_now();
        let new_bounty = self.draft(ctx, now)?.validate(now)?;

        let client = ctx.connected_client().await?;
        announce_tx("Creating bounty...");
        let tx_hash = client.create_bounty(new_bounty).await?;
        print_tx(tx_hash);
        println!("Bounty created.");
        Ok(())
    }
}

#[derive(StructOpt, Debug, Clone)]
/// Show a bounty.
pub struct Show {
    /// Id of the bounty
    bounty_id: BountyId,
}

#[async_trait::async_trait]
impl CommandT for Show {
    async fn run(&self, ctx: &CommandContext) -> Result<(), CommandError> {
        let bounty = ctx.client()?.get_bounty_by_id(self.bounty_id).await?;
        println!("id: {}", bounty.id);
        println!("title: {}", bounty.title);
        println!("description: {}", bounty.description);
        println!("reward: {} (token {})", bounty.reward, bounty.reward_token);
        println!("deadline: {}", bounty.deadline);
        println!("creator: {}", bounty.creator);
        println!("status: {}", bounty.status);
        Ok(())
    }
}

#[derive(StructOpt, Debug, Clone)]
/// List all bounties
pub struct List {}

#[async_trait::async_trait]
impl CommandT for List {
    async fn run(&self, ctx: &CommandContext) -> Result<(), CommandError> {
        let bounties = ctx.client()?.list_bounties().await?;
        println!("BOUNTIES ({})", bounties.len());
        for bounty in bounties {
            println!(
                "{}\t{}\t{}\t{}",
                bounty.id, bounty.status, bounty.reward, bounty.title
            );
        }
        Ok(())
    }
}

#[derive(StructOpt, Debug, Clone)]
/// Cancel an open bounty and refund its reward.
pub struct Cancel {
    /// Id of the bounty
    bounty_id: BountyId,
}

#[async_trait::async_trait]
impl CommandT for Cancel {
    async fn run(&self, ctx: &CommandContext) -> Result<(), CommandError> {
        let client = ctx.connected_client().await?;
        announce_tx(&format!("Cancelling bounty {}...", self.bounty_id));
        let tx_hash = client.cancel_bounty(self.bounty_id).await?;
        print_tx(tx_hash);
        println!("Bounty {} is now cancelled.", self.bounty_id);
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{NetworkOptions, TxOptions};

    /// Context whose node, deployment config and accounts do not exist.
    fn unreachable_context() -> CommandContext {
        let tmp = std::env::temp_dir();
        CommandContext {
            network_options: NetworkOptions {
                rpc_url: "http://127.0.0.1:1/rpc".parse().unwrap(),
                config: tmp.join(format!("missing-{}.json", rand::random::<u64>())),
            },
            tx_options: TxOptions {
                account: Some("nobody".to_string()),
                accounts_file: Some(tmp.join(format!("missing-{}.json", rand::random::<u64>()))),
            },
        }
    }

    #[tokio::test]
    async fn create_rejects_long_title_before_connecting() {
        let ctx = unreachable_context();
        let title = "x".repeat(32);
        let create = Create::from_iter(&["create", title.as_str(), "Fix the bug", "1000"]);

        let error = create.run(&ctx).await.unwrap_err();
        assert!(matches!(error, CommandError::InvalidForm(FormError::Title(_))));
        assert!(error.to_string().contains("too long"));
    }

    #[tokio::test]
    async fn create_without_token_or_config() {
        let ctx = unreachable_context();
        let create = Create::from_iter(&["create", "Fix the bug", "Details", "1000"]);

        let error = create.run(&ctx).await.unwrap_err();
        assert!(matches!(
            error,
            CommandError::InvalidForm(FormError::MissingRewardToken)
        ));
    }

    #[test]
    fn deadline_from_days() {
        let ctx = unreachable_context();
        let token = "0x49d36570d4e46f48e99674bd3fcc84644ddd6b96f7c741b1562b82f9e004dc7";
        let create = Create::from_iter(&[
            "create", "Fix the bug", "Details", "1000", "--token", token, "--days", "2",
        ]);

        let draft = create.draft(&ctx, 1_000).unwrap();
        assert_eq!(draft.deadline, 1_000 + 2 * SECONDS_PER_DAY);
        assert_eq!(draft.reward, Amount(1000));
        assert_eq!(draft.reward_token, Some(token.parse().unwrap()));

        let create = Create::from_iter(&[
            "create", "Fix the bug", "Details", "1000", "--token", token, "--days",
            "300000000000000",
        ]);
        assert_eq!(
            create.draft(&ctx, 1_000).unwrap_err(),
            FormError::DeadlineOutOfRange
        );
    }

    #[tokio::test]
    async fn create_rejects_overflowing_days_before_connecting() {
        let ctx = unreachable_context();
        let days = u64::MAX.to_string();
        let create = Create::from_iter(&[
            "create",
            "Fix the bug",
            "Details",
            "1000",
            "--days",
            days.as_str(),
        ]);

        let error = create.run(&ctx).await.unwrap_err();
        assert!(matches!(
            error,
            CommandError::InvalidForm(FormError::DeadlineOutOfRange)
        ));
    }
}
