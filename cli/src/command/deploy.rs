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

//! Define the command that deploys the marketplace contracts.

use std::path::PathBuf;

use super::*;
use bountyhub_client::deploy::{deploy_all, DeployOptions, RemoteDeclarer, DEFAULT_PACKAGE};

/// STRK token contract, the same on mainnet and sepolia.
const STRK_TOKEN: &str = "0x04718f5a0fc34cc1af16a1cdee98ffb20c31f5cd61d6ab07201858f4287c938d";

#[derive(StructOpt, Debug, Clone)]
/// Declare and deploy the reputation, escrow, payment processor and bounty platform contracts.
///
/// Classes that are already declared are reused. The deployed addresses are written to the
/// deployment config file given by --config. The account selected with --account pays for
/// the deployment and owns the contracts.
pub struct Deploy {
    /// Directory with the compiled contract classes.
    #[structopt(long, default_value = "target/dev", parse(from_os_str))]
    artifacts_dir: PathBuf,

    /// Package name the artifact file names start with.
    #[structopt(long, default_value = DEFAULT_PACKAGE)]
    package: String,

    /// Name of the network recorded in the deployment config.
    #[structopt(long, default_value = "sepolia")]
    network: String,

    /// ERC20 token bounty rewards are paid in.
    #[structopt(long, default_value = STRK_TOKEN, value_name = "address")]
    reward_token: ContractAddress,
}

#[async_trait::async_trait]
impl CommandT for Deploy {
    async fn run(&self, ctx: &CommandContext) -> Result<(), CommandError> {
        let (name, data) = ctx.account()?;
        let node = ctx.node();
        let account = RemoteAccount::connect(&node, data.address, data.private_key()?).await?;
        let declarer = RemoteDeclarer::new(account);
        let options = DeployOptions {
            artifacts_dir: self.artifacts_dir.clone(),
            package: self.package.clone(),
            network: self.network.clone(),
            rpc_url: ctx.network_options.rpc_url.to_string(),
            reward_token: self.reward_token,
            output: ctx.network_options.config.clone(),
        };

        announce_tx(&format!("Deploying contracts with account {}...", name));
        let config = deploy_all(&declarer, &options).await?;
        for (contract, address) in config.contracts.named() {
            println!("{}: {}", contract, address);
        }
        println!(
            "✓ Deployment config written to {}",
            options.output.display()
        );
        Ok(())
    }
}
