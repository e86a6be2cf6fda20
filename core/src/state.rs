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

//! Type definitions for all entities held by the marketplace contracts.
//!
//! Values of these types are snapshots returned by the contract getters. They are never
//! mutated locally. All mutation goes through signed transactions.

use serde::{Deserialize, Serialize};

use crate::cairo::{Decode, DecodeError, Encode, Input};
use crate::{Amount, ApplicationId, BountyId, BountyTitle, ContractAddress, Felt, SubmissionId};

/// Defines a fieldless enum with a `u64` code used in contract storage.
macro_rules! status_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident = $code:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "kebab-case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn code(self) -> u64 {
                match self {
                    $($name::$variant => $code),+
                }
            }

            pub fn from_code(code: u64) -> Result<Self, DecodeError> {
                match code {
                    $($code => Ok($name::$variant),)+
                    _ => Err(DecodeError::UnknownVariant {
                        kind: stringify!($name),
                        code,
                    }),
                }
            }
        }

        impl Encode for $name {
            fn encode_to(&self, out: &mut Vec<Felt>) {
                self.code().encode_to(out)
            }
        }

        impl Decode for $name {
            fn decode_from(input: &mut Input<'_>) -> Result<Self, DecodeError> {
                u64::decode_from(input).and_then($name::from_code)
            }
        }
    };
}

status_enum! {
    /// Lifecycle of a bounty. Bounties are never deleted, only transitioned.
    ///
    /// `Open` -> `InProgress` when an application is accepted, `InProgress` -> `Completed` when a
    /// submission is approved. Only `Open` bounties can be `Cancelled`.
    BountyStatus {
        Open = 0,
        InProgress = 1,
        Completed = 2,
        Cancelled = 3,
    }
}

status_enum! {
    ApplicationStatus {
        Pending = 0,
        Accepted = 1,
        Rejected = 2,
    }
}

status_enum! {
    SubmissionStatus {
        Pending = 0,
        Approved = 1,
        Rejected = 2,
    }
}

impl core::fmt::Display for BountyStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        let name = match self {
            BountyStatus::Open => "open",
            BountyStatus::InProgress => "in-progress",
            BountyStatus::Completed => "completed",
            BountyStatus::Cancelled => "cancelled",
        };
        f.write_str(name)
    }
}

/// A task posting with an attached token reward held in escrow.
///
/// # Relevant entrypoints
///
/// * `create_bounty`
/// * `cancel_bounty`
/// * `accept_application`
/// * `approve_submission`
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Bounty {
    pub id: BountyId,
    pub title: BountyTitle,
    pub description: String,
    pub reward: Amount,
    /// ERC20 token the reward is paid in.
    pub reward_token: ContractAddress,
    /// Unix timestamp in seconds.
    pub deadline: u64,
    pub creator: ContractAddress,
    pub status: BountyStatus,
}

/// An application of a worker to a bounty.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Application {
    pub id: ApplicationId,
    pub bounty_id: BountyId,
    pub applicant: ContractAddress,
    pub proposal: String,
    pub status: ApplicationStatus,
}

/// Work submitted for a bounty by the accepted applicant.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    pub id: SubmissionId,
    pub bounty_id: BountyId,
    pub submitter: ContractAddress,
    pub content: String,
    pub status: SubmissionStatus,
}

/// Reward funds held by the escrow contract until release or refund.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct EscrowBalance {
    pub bounty_id: BountyId,
    pub amount: Amount,
}

/// Aggregate reputation score of an address.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Reputation {
    pub user: ContractAddress,
    pub score: u64,
}

impl Encode for Bounty {
    fn encode_to(&self, out: &mut Vec<Felt>) {
        self.id.encode_to(out);
        self.title.encode_to(out);
        self.description.encode_to(out);
        self.reward.encode_to(out);
        self.reward_token.encode_to(out);
        self.deadline.encode_to(out);
        self.creator.encode_to(out);
        self.status.encode_to(out);
    }
}

impl Decode for Bounty {
    fn decode_from(input: &mut Input<'_>) -> Result<Self, DecodeError> {
        Ok(Bounty {
            id: Decode::decode_from(input)?,
            title: Decode::decode_from(input)?,
            description: Decode::decode_from(input)?,
            reward: Decode::decode_from(input)?,
            reward_token: Decode::decode_from(input)?,
            deadline: Decode::decode_from(input)?,
            creator: Decode::decode_from(input)?,
            status: Decode::decode_from(input)?,
        })
    }
}

impl Encode for Application {
    fn encode_to(&self, out: &mut Vec<Felt>) {
        self.id.encode_to(out);
        self.bounty_id.encode_to(out);
        self.applicant.encode_to(out);
        self.proposal.encode_to(out);
        self.status.encode_to(out);
    }
}

impl Decode for Application {
    fn decode_from(input: &mut Input<'_>) -> Result<Self, DecodeError> {
        Ok(Application {
            id: Decode::decode_from(input)?,
            bounty_id: Decode::decode_from(input)?,
            applicant: Decode::decode_from(input)?,
            proposal: Decode::decode_from(input)?,
            status: Decode::decode_from(input)?,
        })
    }
}

impl Encode for Submission {
    fn encode_to(&self, out: &mut Vec<Felt>) {
        self.id.encode_to(out);
        self.bounty_id.encode_to(out);
        self.submitter.encode_to(out);
        self.content.encode_to(out);
        self.status.encode_to(out);
    }
}

impl Decode for Submission {
    fn decode_from(input: &mut Input<'_>) -> Result<Self, DecodeError> {
        Ok(Submission {
            id: Decode::decode_from(input)?,
            bounty_id: Decode::decode_from(input)?,
            submitter: Decode::decode_from(input)?,
            content: Decode::decode_from(input)?,
            status: Decode::decode_from(input)?,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn bounty_getter_output() {
        let bounty = Bounty {
            id: BountyId(7),
            title: "Write docs".parse().unwrap(),
            description: "Document every entrypoint of the platform contract".into(),
            reward: Amount(5_000),
            reward_token: "0x49d".parse().unwrap(),
            deadline: 1_800_000_000,
            creator: "0xabc".parse().unwrap(),
            status: BountyStatus::InProgress,
        };
        let felts = bounty.encode();
        assert_eq!(felts[0], Felt::from(7u64));
        assert_eq!(felts.last(), Some(&Felt::ONE));
        assert_eq!(Bounty::decode(&felts).unwrap(), bounty);
    }

    #[test]
    fn unknown_status_code() {
        let felts = vec![Felt::from(9u64)];
        assert_eq!(
            BountyStatus::decode(&felts),
            Err(DecodeError::UnknownVariant {
                kind: "BountyStatus",
                code: 9
            })
        );
    }
}
