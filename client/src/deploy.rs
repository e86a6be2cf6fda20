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

//! Declare and deploy the marketplace contracts.
//!
//! Compiled contracts are found in the build output directory by their file names:
//! `<package>_<Contract>.contract_class.json` holds the Sierra class and
//! `<package>_<Contract>.compiled_contract_class.json` the CASM class.
//!
//! Declaring a class that is already declared fails. In that case the class hash is taken from
//! the error message and the class is deployed without declaring it again.
use std::io::Error as IOError;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use lazy_static::lazy_static;
use regex::Regex;
use starknet::accounts::Account as _;
use starknet::contract::ContractFactory;
use starknet::core::types::contract::{CompiledClass, SierraClass};
use thiserror::Error as ThisError;

use crate::backend::RemoteAccount;
use crate::config::{ConfigError, ContractAddresses, DeploymentConfig};
use crate::interface::*;

/// Default Scarb package name of the contracts.
pub const DEFAULT_PACKAGE: &str = "bountyhub";

const SIERRA_SUFFIX: &str = ".contract_class.json";
const CASM_SUFFIX: &str = ".compiled_contract_class.json";

lazy_static! {
    static ref DECLARED_CLASS_HASH: Regex =
        Regex::new(r"Class with hash (0x[0-9a-fA-F]+)").expect("valid regex");
}

/// The marketplace contracts in deployment order.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Contract {
    Reputation,
    Escrow,
    PaymentProcessor,
    BountyPlatform,
}

impl Contract {
    pub const ALL: [Contract; 4] = [
        Contract::Reputation,
        Contract::Escrow,
        Contract::PaymentProcessor,
        Contract::BountyPlatform,
    ];

    /// Name of the contract module, as used in artifact file names.
    pub fn name(self) -> &'static str {
        match self {
            Contract::Reputation => "Reputation",
            Contract::Escrow => "Escrow",
            Contract::PaymentProcessor => "PaymentProcessor",
            Contract::BountyPlatform => "BountyPlatform",
        }
    }
}

#[derive(Debug, ThisError)]
pub enum DeployError {
    #[error("No artifact for contract {contract} in {dir}")]
    ArtifactNotFound { contract: &'static str, dir: PathBuf },

    #[error("Failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        error: IOError,
    },

    #[error("Invalid contract class {path}")]
    InvalidArtifact {
        path: PathBuf,
        #[source]
        error: serde_json::Error,
    },

    #[error("Failed to compute class hash of {contract}: {message}")]
    ClassHash {
        contract: &'static str,
        message: String,
    },

    #[error("Failed to declare {contract}: {message}")]
    Declare {
        contract: &'static str,
        message: String,
    },

    #[error("Failed to deploy {contract}: {message}")]
    Deploy {
        contract: &'static str,
        message: String,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Paths of the compiled classes of a contract.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ContractArtifact {
    pub contract: Contract,
    pub sierra: PathBuf,
    pub casm: PathBuf,
}

impl ContractArtifact {
    /// Find the artifacts of `contract` in `dir`.
    ///
    /// Tries `<package>_<Contract>` first and then any file for `<Contract>` with another
    /// package prefix.
    pub fn find(dir: &Path, package: &str, contract: Contract) -> Result<Self, DeployError> {
        let expected = dir.join(format!("{}_{}{}", package, contract.name(), SIERRA_SUFFIX));
        let sierra = if expected.is_file() {
            expected
        } else {
            find_sierra(dir, contract)?.ok_or_else(|| DeployError::ArtifactNotFound {
                contract: contract.name(),
                dir: dir.to_path_buf(),
            })?
        };
        let casm = sierra_to_casm_path(&sierra).ok_or_else(|| DeployError::ArtifactNotFound {
            contract: contract.name(),
            dir: dir.to_path_buf(),
        })?;
        if !casm.is_file() {
            return Err(DeployError::ArtifactNotFound {
                contract: contract.name(),
                dir: dir.to_path_buf(),
            });
        }
        log::debug!("using {} for {}", sierra.display(), contract.name());
        Ok(ContractArtifact {
            contract,
            sierra,
            casm,
        })
    }
}

fn find_sierra(dir: &Path, contract: Contract) -> Result<Option<PathBuf>, DeployError> {
    let suffix = format!("_{}{}", contract.name(), SIERRA_SUFFIX);
    let entries = std::fs::read_dir(dir).map_err(|error| DeployError::Io {
        path: dir.to_path_buf(),
        error,
    })?;
    let mut candidates = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .map_or(false, |name| name.ends_with(&suffix))
        })
        .collect::<Vec<_>>();
    candidates.sort();
    Ok(candidates.into_iter().next())
}

fn sierra_to_casm_path(sierra: &Path) -> Option<PathBuf> {
    let name = sierra.file_name()?.to_str()?;
    let stem = name.strip_suffix(SIERRA_SUFFIX)?;
    Some(sierra.with_file_name(format!("{}{}", stem, CASM_SUFFIX)))
}

/// Returns the class hash named in an "already declared" error message.
pub fn extract_declared_class_hash(message: &str) -> Option<String> {
    DECLARED_CLASS_HASH
        .captures(message)
        .and_then(|captures| captures.get(1))
        .map(|hash| hash.as_str().to_string())
}

/// Declares classes and deploys contract instances.
#[async_trait::async_trait]
pub trait Declarer: Send + Sync {
    /// Declare the class of `artifact` and return its class hash.
    async fn declare(&self, artifact: &ContractArtifact) -> Result<Felt, DeployError>;

    /// Deploy an instance of the class `class_hash` and return its address.
    async fn deploy(
        &self,
        contract: Contract,
        class_hash: Felt,
        constructor_calldata: Vec<Felt>,
    ) -> Result<ContractAddress, DeployError>;

    /// Address of the account paying for the deployment. Owner of the deployed contracts.
    fn deployer(&self) -> ContractAddress;
}

/// Declare the class of `artifact`, reusing the class hash if it is already declared.
pub async fn declare_or_reuse(
    declarer: &dyn Declarer,
    artifact: &ContractArtifact,
) -> Result<Felt, DeployError> {
    match declarer.declare(artifact).await {
        Ok(class_hash) => {
            log::info!(
                "declared {} with class hash {:#x}",
                artifact.contract.name(),
                class_hash
            );
            Ok(class_hash)
        }
        Err(DeployError::Declare { contract, message }) => {
            let class_hash = extract_declared_class_hash(&message)
                .and_then(|hash| Felt::from_hex(&hash).ok())
                .ok_or(DeployError::Declare { contract, message })?;
            log::info!(
                "{} already declared with class hash {:#x}",
                contract,
                class_hash
            );
            Ok(class_hash)
        }
        Err(error) => Err(error),
    }
}

/// Parameters of a full deployment.
#[derive(Clone, Debug)]
pub struct DeployOptions {
    /// Directory with the compiled contract classes.
    pub artifacts_dir: PathBuf,
    pub package: String,
    pub network: String,
    pub rpc_url: String,
    /// ERC20 token bounty rewards are paid in. Not deployed.
    pub reward_token: ContractAddress,
    /// Where to write the resulting [DeploymentConfig].
    pub output: PathBuf,
}

/// Declare and deploy all marketplace contracts and write their addresses to
/// [DeployOptions::output].
pub async fn deploy_all(
    declarer: &dyn Declarer,
    options: &DeployOptions,
) -> Result<DeploymentConfig, DeployError> {
    let owner = declarer.deployer().felt();

    let artifacts = Contract::ALL
        .iter()
        .map(|contract| ContractArtifact::find(&options.artifacts_dir, &options.package, *contract))
        .collect::<Result<Vec<_>, _>>()?;
    let mut class_hashes = Vec::with_capacity(artifacts.len());
    for artifact in &artifacts {
        class_hashes.push(declare_or_reuse(declarer, artifact).await?);
    }

    let reputation = declarer
        .deploy(Contract::Reputation, class_hashes[0], vec![owner])
        .await?;
    let escrow = declarer
        .deploy(Contract::Escrow, class_hashes[1], vec![owner])
        .await?;
    let payment_processor = declarer
        .deploy(
            Contract::PaymentProcessor,
            class_hashes[2],
            vec![owner, escrow.felt()],
        )
        .await?;
    let bounty_platform = declarer
        .deploy(
            Contract::BountyPlatform,
            class_hashes[3],
            vec![
                owner,
                escrow.felt(),
                payment_processor.felt(),
                reputation.felt(),
            ],
        )
        .await?;

    let config = DeploymentConfig {
        network: options.network.clone(),
        rpc_url: options.rpc_url.clone(),
        contracts: ContractAddresses {
            bounty_platform,
            payment_processor,
            escrow,
            reputation,
            reward_token: options.reward_token,
        },
    };
    config.save(&options.output)?;
    log::info!("wrote deployment config to {}", options.output.display());
    Ok(config)
}

/// [Declarer] that submits declare and deploy transactions through a [RemoteAccount].
pub struct RemoteDeclarer {
    account: RemoteAccount,
}

impl RemoteDeclarer {
    pub fn new(account: RemoteAccount) -> Self {
        RemoteDeclarer { account }
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, DeployError> {
    let content = std::fs::read_to_string(path).map_err(|error| DeployError::Io {
        path: path.to_path_buf(),
        error,
    })?;
    serde_json::from_str(&content).map_err(|error| DeployError::InvalidArtifact {
        path: path.to_path_buf(),
        error,
    })
}

#[async_trait::async_trait]
impl Declarer for RemoteDeclarer {
    async fn declare(&self, artifact: &ContractArtifact) -> Result<Felt, DeployError> {
        let contract = artifact.contract.name();
        let class_hash_error = |error: &dyn std::fmt::Display| DeployError::ClassHash {
            contract,
            message: error.to_string(),
        };
        let sierra: SierraClass = read_json(&artifact.sierra)?;
        let casm: CompiledClass = read_json(&artifact.casm)?;
        let flattened = sierra.flatten().map_err(|error| class_hash_error(&error))?;
        let compiled_class_hash = casm.class_hash().map_err(|error| class_hash_error(&error))?;

        let result = self
            .account
            .sdk_account()
            .declare_v3(Arc::new(flattened), compiled_class_hash)
            .send()
            .await
            .map_err(|error| DeployError::Declare {
                contract,
                message: error.to_string(),
            })?;
        log::debug!(
            "declare transaction of {}: {:#x}",
            contract,
            result.transaction_hash
        );
        Ok(result.class_hash)
    }

    async fn deploy(
        &self,
        contract: Contract,
        class_hash: Felt,
        constructor_calldata: Vec<Felt>,
    ) -> Result<ContractAddress, DeployError> {
        let factory = ContractFactory::new(class_hash, self.account.sdk_account());
        let salt = Felt::from(rand::random::<u64>());
        let deployment = factory.deploy_v3(constructor_calldata, salt, false);
        let address = ContractAddress::from_felt(deployment.deployed_address());
        let result = deployment
            .send()
            .await
            .map_err(|error| DeployError::Deploy {
                contract: contract.name(),
                message: error.to_string(),
            })?;
        log::info!(
            "deployed {} at {} in transaction {:#x}",
            contract.name(),
            address,
            result.transaction_hash
        );
        Ok(address)
    }

    fn deployer(&self) -> ContractAddress {
        self.account.address()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeDeclarer {
        declared: Mutex<Vec<Contract>>,
        deployed: Mutex<Vec<(Contract, Felt, Vec<Felt>)>>,
    }

    #[async_trait::async_trait]
    impl Declarer for FakeDeclarer {
        async fn declare(&self, artifact: &ContractArtifact) -> Result<Felt, DeployError> {
            self.declared.lock().unwrap().push(artifact.contract);
            if artifact.contract == Contract::Escrow {
                return Err(DeployError::Declare {
                    contract: artifact.contract.name(),
                    message: "StarknetError: Class with hash 0xDEADBEEF is already declared."
                        .into(),
                });
            }
            Ok(Felt::from(0x100u64 + self.declared.lock().unwrap().len() as u64))
        }

        async fn deploy(
            &self,
            contract: Contract,
            class_hash: Felt,
            constructor_calldata: Vec<Felt>,
        ) -> Result<ContractAddress, DeployError> {
            let mut deployed = self.deployed.lock().unwrap();
            deployed.push((contract, class_hash, constructor_calldata));
            Ok(ContractAddress::from_felt(Felt::from(
                0x2000u64 + deployed.len() as u64,
            )))
        }

        fn deployer(&self) -> ContractAddress {
            ContractAddress::from_felt(Felt::from(0xabcu64))
        }
    }

    fn temp_dir() -> PathBuf {
        let dir =
            std::env::temp_dir().join(format!("bountyhub-artifacts-{}", rand::random::<u64>()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn write_artifacts(dir: &Path, package: &str, contract: Contract) {
        for suffix in [SIERRA_SUFFIX, CASM_SUFFIX].iter() {
            let path = dir.join(format!("{}_{}{}", package, contract.name(), suffix));
            std::fs::write(path, "{}").unwrap();
        }
    }

    #[test]
    fn extract_class_hash() {
        assert_eq!(
            extract_declared_class_hash("Class with hash 0xDEADBEEF is already declared"),
            Some("0xDEADBEEF".to_string())
        );
        assert_eq!(extract_declared_class_hash("Insufficient max fee"), None);
    }

    #[test]
    fn find_artifact_with_other_package() {
        let dir = temp_dir();
        write_artifacts(&dir, "contracts", Contract::Escrow);

        let artifact = ContractArtifact::find(&dir, DEFAULT_PACKAGE, Contract::Escrow).unwrap();
        assert_eq!(
            artifact.casm,
            dir.join("contracts_Escrow.compiled_contract_class.json")
        );
        assert!(ContractArtifact::find(&dir, DEFAULT_PACKAGE, Contract::Reputation).is_err());
        std::fs::remove_dir_all(dir).unwrap();
    }

    #[tokio::test]
    async fn already_declared_class_is_reused() {
        let declarer = FakeDeclarer::default();
        let artifact = ContractArtifact {
            contract: Contract::Escrow,
            sierra: PathBuf::from("escrow.contract_class.json"),
            casm: PathBuf::from("escrow.compiled_contract_class.json"),
        };

        let class_hash = declare_or_reuse(&declarer, &artifact).await.unwrap();
        assert_eq!(class_hash, Felt::from(0xdeadbeefu64));
        assert_eq!(*declarer.declared.lock().unwrap(), vec![Contract::Escrow]);
    }

    #[tokio::test]
    async fn deploy_all_writes_config() {
        let _ = env_logger::try_init();
        let dir = temp_dir();
        for contract in Contract::ALL.iter() {
            write_artifacts(&dir, DEFAULT_PACKAGE, *contract);
        }
        let options = DeployOptions {
            artifacts_dir: dir.clone(),
            package: DEFAULT_PACKAGE.into(),
            network: "devnet".into(),
            rpc_url: "http://127.0.0.1:5050/rpc".into(),
            reward_token: ContractAddress::from_felt(Felt::from(0x49du64)),
            output: dir.join("deployments.json"),
        };
        let declarer = FakeDeclarer::default();

        let config = deploy_all(&declarer, &options).await.unwrap();

        assert_eq!(declarer.declared.lock().unwrap().len(), 4);
        let deployed = declarer.deployed.lock().unwrap();
        let (contract, class_hash, _) = &deployed[1];
        assert_eq!(*contract, Contract::Escrow);
        assert_eq!(*class_hash, Felt::from(0xdeadbeefu64));
        let (_, _, platform_calldata) = &deployed[3];
        assert_eq!(platform_calldata[1], config.contracts.escrow.felt());
        assert_eq!(DeploymentConfig::load(&options.output).unwrap(), config);
        std::fs::remove_dir_all(dir).unwrap();
    }
}
