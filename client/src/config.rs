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

//! The deployment config file.
//!
//! The deploy command writes the addresses of freshly deployed contracts to a JSON file. The
//! client and the indexer read the file to find the contracts. Addresses in the file must be in
//! canonical form, `0x` followed by 64 hex digits, or loading fails.
use std::io::Error as IOError;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

use bountyhub_core::event::Emitter;
use bountyhub_core::ContractAddress;

/// Default location of the deployment config file.
pub const DEFAULT_CONFIG_FILE: &str = "deployments.json";

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentConfig {
    /// Name of the network the contracts are deployed on, for example `sepolia`.
    pub network: String,
    /// RPC endpoint used for the deployment.
    pub rpc_url: String,
    pub contracts: ContractAddresses,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractAddresses {
    pub bounty_platform: ContractAddress,
    pub payment_processor: ContractAddress,
    pub escrow: ContractAddress,
    pub reputation: ContractAddress,
    /// ERC20 token rewards are paid in by default.
    pub reward_token: ContractAddress,
}

impl ContractAddresses {
    /// All addresses with a human readable contract name.
    pub fn named(&self) -> Vec<(&'static str, ContractAddress)> {
        vec![
            ("bounty platform", self.bounty_platform),
            ("payment processor", self.payment_processor),
            ("escrow", self.escrow),
            ("reputation", self.reputation),
            ("reward token", self.reward_token),
        ]
    }

    pub fn emitter(&self, emitter: Emitter) -> ContractAddress {
        match emitter {
            Emitter::BountyPlatform => self.bounty_platform,
            Emitter::PaymentProcessor => self.payment_processor,
        }
    }
}

#[derive(Debug, ThisError)]
pub enum ConfigError {
    #[error("Failed to read deployment config {path}")]
    Read {
        path: PathBuf,
        #[source]
        error: IOError,
    },

    #[error("Failed to write deployment config {path}")]
    Write {
        path: PathBuf,
        #[source]
        error: IOError,
    },

    #[error("Invalid deployment config {path}")]
    Invalid {
        path: PathBuf,
        #[source]
        error: serde_json::Error,
    },
}

impl DeploymentConfig {
    /// Read and validate the config file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|error| ConfigError::Read {
            path: path.to_path_buf(),
            error,
        })?;
        serde_json::from_str(&content).map_err(|error| ConfigError::Invalid {
            path: path.to_path_buf(),
            error,
        })
    }

    /// Write the config to `path`, replacing any existing file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let content = serde_json::to_string_pretty(self).map_err(|error| ConfigError::Invalid {
            path: path.to_path_buf(),
            error,
        })?;
        std::fs::write(path, content).map_err(|error| ConfigError::Write {
            path: path.to_path_buf(),
            error,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn address(n: u64) -> ContractAddress {
        ContractAddress::from_felt(n.into())
    }

    fn config() -> DeploymentConfig {
        DeploymentConfig {
            network: "devnet".into(),
            rpc_url: "http://127.0.0.1:5050/rpc".into(),
            contracts: ContractAddresses {
                bounty_platform: address(1),
                payment_processor: address(2),
                escrow: address(3),
                reputation: address(4),
                reward_token: address(5),
            },
        }
    }

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("bountyhub-{}-{}.json", name, rand::random::<u64>()))
    }

    #[test]
    fn saved_addresses_are_canonical() {
        let path = temp_path("config");
        config().save(&path).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        for (_, value) in raw["contracts"].as_object().unwrap() {
            assert!(ContractAddress::is_canonical_hex(value.as_str().unwrap()));
        }
        assert_eq!(DeploymentConfig::load(&path).unwrap(), config());
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn load_rejects_short_address() {
        let path = temp_path("short");
        let mut raw = serde_json::to_value(config()).unwrap();
        raw["contracts"]["escrow"] = serde_json::Value::String("0x3".into());
        std::fs::write(&path, raw.to_string()).unwrap();

        match DeploymentConfig::load(&path) {
            Err(ConfigError::Invalid { .. }) => (),
            other => panic!("unexpected result {:?}", other),
        }
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn load_missing_file() {
        match DeploymentConfig::load(temp_path("missing")) {
            Err(ConfigError::Read { .. }) => (),
            other => panic!("unexpected result {:?}", other),
        }
    }
}
