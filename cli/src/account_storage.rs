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

//! Manages accounts stored in the filesystem,
//! providing ways to store and retrieve them.

use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use thiserror::Error as ThisError;

use std::io::Error as IOError;
use std::path::PathBuf;

use bountyhub_client::{ContractAddress, Felt, WalletKind};

/// The data that is stored in the filesystem relative
/// to an account. The account name is used as the key
/// to this value, therefore not included here.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AccountData {
    /// Wallet the account is exposed as.
    pub wallet: WalletKind,
    pub address: ContractAddress,
    /// Hex encoded signing key of the account contract.
    pub private_key: String,
}

impl AccountData {
    pub fn private_key(&self) -> Result<Felt, Error> {
        Felt::from_hex(&self.private_key).map_err(|_| Error::InvalidKey {
            address: self.address,
        })
    }
}

#[derive(Debug, ThisError)]
pub enum Error {
    /// An account with the given name already exists
    #[error("An account named {0} already exists")]
    AlreadyExists(String),

    #[error("No account named {0}")]
    NotFound(String),

    #[error("Invalid private key stored for account {address}")]
    InvalidKey { address: ContractAddress },

    #[error("Cannot determine the user data directory")]
    NoDataDir,

    /// Failed to write to the accounts file
    #[error("Failed to write to the accounts file: {0}")]
    FailedWrite(#[from] WritingError),

    /// Failed to read the accounts file
    #[error("Failed to read the accounts file: {0}")]
    FailedRead(#[from] ReadingError),
}

/// Possible errors when writing to the accounts file.
#[derive(Debug, ThisError)]
pub enum WritingError {
    #[error(transparent)]
    IO(IOError),

    #[error(transparent)]
    Serialization(serde_json::Error),
}

/// Possible errors when reading the accounts file.
#[derive(Debug, ThisError)]
pub enum ReadingError {
    #[error(transparent)]
    IO(IOError),

    #[error(transparent)]
    Deserialization(serde_json::Error),
}

const FILE: &str = "accounts.json";

/// Accounts stored as a JSON object in a single file.
pub struct AccountStorage {
    path: PathBuf,
}

impl AccountStorage {
    /// Storage at `accounts.json` in the user data directory.
    pub fn default_location() -> Result<Self, Error> {
        let dir = BaseDirs::new()
            .ok_or(Error::NoDataDir)?
            .data_dir()
            .join("bountyhub-cli");
        std::fs::create_dir_all(&dir).map_err(ReadingError::IO)?;
        Ok(AccountStorage {
            path: dir.join(FILE),
        })
    }

    pub fn at(path: PathBuf) -> Self {
        AccountStorage { path }
    }

    /// Add an account to the storage.
    ///
    /// Fails if an account with the given `name` already exists.
    /// It can also fail from IO and Serde Json errors.
    pub fn add(&self, name: String, data: AccountData) -> Result<(), Error> {
        let mut accounts = self.list()?;
        if accounts.contains_key(&name) {
            return Err(Error::AlreadyExists(name));
        }

        accounts.insert(name, data);
        self.update(accounts)
    }

    /// List all the stored accounts.
    ///
    /// It can fail from IO and Serde Json errors.
    pub fn list(&self) -> Result<HashMap<String, AccountData>, Error> {
        self.create_if_missing()?;
        let file = File::open(&self.path).map_err(ReadingError::IO)?;
        let accounts: HashMap<String, AccountData> =
            serde_json::from_reader(&file).map_err(ReadingError::Deserialization)?;
        Ok(accounts)
    }

    pub fn get(&self, name: &str) -> Result<AccountData, Error> {
        self.list()?
            .remove(name)
            .ok_or_else(|| Error::NotFound(name.to_string()))
    }

    fn update(&self, accounts: HashMap<String, AccountData>) -> Result<(), Error> {
        let new_content =
            serde_json::to_string_pretty(&accounts).map_err(WritingError::Serialization)?;
        std::fs::write(&self.path, new_content.as_bytes()).map_err(WritingError::IO)?;
        Ok(())
    }

    // If the file does not yet exist, create it and initialize
    // it with an empty object so that it can be deserialized
    // as an empty HashMap<String, AccountData>.
    fn create_if_missing(&self) -> Result<(), Error> {
        if !self.path.exists() {
            std::fs::write(&self.path, b"{}").map_err(WritingError::IO)?;
        }
        Ok(())
    }
}
