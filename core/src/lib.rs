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

//! Basic types used by the Bountyhub marketplace.
//!
//! All entities are owned by the on-chain contracts. The types in this crate are read-only
//! snapshots decoded from contract getters and events, plus the validated input for the
//! transactions that mutate them.

pub use starknet_core::types::Felt;

pub mod cairo;
pub mod event;
pub mod form;
pub mod state;

pub use event::{EventCategory, EventKind, MarketEvent};
pub use form::{BountyDraft, FormError, NewBounty};
pub use state::{
    Application, ApplicationStatus, Bounty, BountyStatus, EscrowBalance, Reputation, Submission,
    SubmissionStatus,
};

mod address;
pub use address::{ContractAddress, InvalidAddressError};

pub mod title;
pub use title::BountyTitle;

/// The hash of a transaction. Uniquely identifies a transaction.
pub type TxHash = Felt;

/// Height of a block on the chain.
pub type BlockNumber = u64;

/// Sequential bounty identifier assigned by the bounty platform contract.
#[derive(
    Clone,
    Copy,
    Debug,
    Eq,
    PartialEq,
    Hash,
    Ord,
    PartialOrd,
    derive_more::Display,
    derive_more::From,
    derive_more::FromStr,
    serde::Serialize,
    serde::Deserialize,
)]
pub struct BountyId(pub u64);

/// Sequential application identifier assigned by the bounty platform contract.
#[derive(
    Clone,
    Copy,
    Debug,
    Eq,
    PartialEq,
    Hash,
    Ord,
    PartialOrd,
    derive_more::Display,
    derive_more::From,
    derive_more::FromStr,
    serde::Serialize,
    serde::Deserialize,
)]
pub struct ApplicationId(pub u64);

/// Sequential work submission identifier assigned by the bounty platform contract.
#[derive(
    Clone,
    Copy,
    Debug,
    Eq,
    PartialEq,
    Hash,
    Ord,
    PartialOrd,
    derive_more::Display,
    derive_more::From,
    derive_more::FromStr,
    serde::Serialize,
    serde::Deserialize,
)]
pub struct SubmissionId(pub u64);

/// Token amount in the smallest unit of the reward token.
///
/// Contracts take amounts as `u256`. Amounts above `u128::MAX` are not supported.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Eq,
    PartialEq,
    Ord,
    PartialOrd,
    derive_more::Display,
    derive_more::From,
    derive_more::FromStr,
    serde::Serialize,
    serde::Deserialize,
)]
pub struct Amount(pub u128);

impl Amount {
    pub fn is_zero(self) -> bool {
        self.0 == 0
    }
}
