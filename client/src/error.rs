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

use bountyhub_core::cairo::DecodeError;

use crate::config::ConfigError;

/// Error that may be returned by any of the [crate::BountyClient] methods and the backends.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A write was attempted before a wallet was connected.
    #[error("Wallet not connected")]
    WalletNotConnected,

    /// None of the supported wallets is available.
    #[error("No Starknet wallet found: neither ArgentX nor Braavos is installed (wallet not found)")]
    WalletNotFound,

    /// The wallet did not grant access to an account.
    #[error("Failed to connect to {wallet}: {message}")]
    WalletRejected {
        wallet: &'static str,
        message: String,
    },

    /// A contract call or transaction failed. `operation` describes what was attempted.
    #[error("Failed to {operation}: {message}")]
    Contract {
        operation: &'static str,
        message: String,
    },

    /// Error from the underlying RPC connection
    #[error("RPC error: {0}")]
    Rpc(String),

    /// Decoding the output of a contract getter failed
    #[error("Invalid response to {operation}")]
    InvalidResponse {
        operation: &'static str,
        #[source]
        error: DecodeError,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Other error
    #[error("Other error: {0}")]
    Other(String),
}

impl Error {
    /// Wrap an error of the underlying SDK with a description of the attempted operation.
    pub fn contract(operation: &'static str, error: impl core::fmt::Display) -> Self {
        Error::Contract {
            operation,
            message: error.to_string(),
        }
    }
}

impl From<String> for Error {
    fn from(error: String) -> Self {
        Error::Other(error)
    }
}

impl From<&str> for Error {
    fn from(error: &str) -> Self {
        Error::Other(error.into())
    }
}
