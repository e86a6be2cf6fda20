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

//! `ContractAddress` identifies accounts and contracts on the chain.
use core::convert::TryFrom;

use crate::cairo::{Decode, DecodeError, Encode, Input};
use crate::Felt;

/// Address of an account or a contract.
///
/// Parsing with [core::str::FromStr] accepts any `0x` prefixed hex string that fits into a
/// felt. Deserialization is strict and only accepts the canonical form produced by
/// [ContractAddress::to_fixed_hex]: `0x` followed by exactly 64 hex digits.
///
/// ```rust
/// # use bountyhub_core::ContractAddress;
/// let address: ContractAddress = "0x1234".parse().unwrap();
/// assert!(ContractAddress::is_canonical_hex(&address.to_fixed_hex()));
/// assert!(!ContractAddress::is_canonical_hex("0x1234"));
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ContractAddress(Felt);

impl ContractAddress {
    pub const fn from_felt(felt: Felt) -> Self {
        ContractAddress(felt)
    }

    pub fn felt(&self) -> Felt {
        self.0
    }

    /// The `0x` prefixed, zero padded, 64 digit hex representation.
    pub fn to_fixed_hex(&self) -> String {
        self.0.to_fixed_hex_string()
    }

    /// Returns `true` if `s` is `0x` followed by exactly 64 hex digits.
    pub fn is_canonical_hex(s: &str) -> bool {
        match s.strip_prefix("0x") {
            Some(digits) => digits.len() == 64 && digits.chars().all(|c| c.is_ascii_hexdigit()),
            None => false,
        }
    }

    /// Parse the canonical representation. See [ContractAddress::is_canonical_hex].
    pub fn from_canonical_hex(s: &str) -> Result<Self, InvalidAddressError> {
        if !Self::is_canonical_hex(s) {
            return Err(InvalidAddressError::NotCanonical(s.to_string()));
        }
        s.parse()
    }
}

/// Error returned when a string is not a valid [ContractAddress].
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum InvalidAddressError {
    #[error("address {0:?} must start with 0x")]
    MissingPrefix(String),

    #[error("address {0:?} is not a hex encoded felt")]
    NotAFelt(String),

    #[error("address {0:?} must be 0x followed by 64 hex digits")]
    NotCanonical(String),
}

impl core::str::FromStr for ContractAddress {
    type Err = InvalidAddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix("0x")
            .ok_or_else(|| InvalidAddressError::MissingPrefix(s.to_string()))?;
        if digits.is_empty() || digits.len() > 64 || !digits.chars().all(|c| c.is_ascii_hexdigit())
        {
            return Err(InvalidAddressError::NotAFelt(s.to_string()));
        }
        Felt::from_hex(s)
            .map(ContractAddress)
            .map_err(|_| InvalidAddressError::NotAFelt(s.to_string()))
    }
}

impl TryFrom<String> for ContractAddress {
    type Error = InvalidAddressError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::from_canonical_hex(&s)
    }
}

impl From<ContractAddress> for String {
    fn from(address: ContractAddress) -> String {
        address.to_fixed_hex()
    }
}

impl From<ContractAddress> for Felt {
    fn from(address: ContractAddress) -> Felt {
        address.0
    }
}

impl core::fmt::Display for ContractAddress {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "{}", self.to_fixed_hex())
    }
}

impl Encode for ContractAddress {
    fn encode_to(&self, out: &mut Vec<Felt>) {
        out.push(self.0)
    }
}

impl Decode for ContractAddress {
    fn decode_from(input: &mut Input<'_>) -> Result<Self, DecodeError> {
        input.next_felt().map(ContractAddress)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parse_short_hex() {
        let address: ContractAddress = "0xdeadbeef".parse().unwrap();
        assert_eq!(address.felt(), Felt::from(0xdead_beefu64));
        assert_eq!(
            address.to_fixed_hex(),
            format!("0x{}deadbeef", "0".repeat(56))
        );
    }

    #[test]
    fn reject_invalid() {
        assert!("deadbeef".parse::<ContractAddress>().is_err());
        assert!("0x".parse::<ContractAddress>().is_err());
        assert!("0xnothex".parse::<ContractAddress>().is_err());
        assert!(format!("0x{}", "1".repeat(65))
            .parse::<ContractAddress>()
            .is_err());
    }

    #[test]
    fn deserialize_requires_canonical_form() {
        let short = serde_json::from_str::<ContractAddress>("\"0x1\"");
        assert!(short.is_err());

        let canonical = format!("\"0x{}1\"", "0".repeat(63));
        let address = serde_json::from_str::<ContractAddress>(&canonical).unwrap();
        assert_eq!(address.felt(), Felt::ONE);
        assert_eq!(serde_json::to_string(&address).unwrap(), canonical);
    }
}
