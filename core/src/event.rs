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

//! Contract events observed by the indexer.
//!
//! Every event is emitted with the selector of its name as the first key and the bounty id as
//! the second key. The remaining payload is in the event data:
//!
//! | event              | emitter           | data                              |
//! |--------------------|-------------------|-----------------------------------|
//! | `BountyCreated`    | bounty platform   | creator, reward (u256), deadline  |
//! | `PaymentProcessed` | payment processor | recipient, amount (u256)          |
//! | `RefundProcessed`  | payment processor | recipient, amount (u256)          |
//! | `FeeCollected`     | payment processor | amount (u256)                     |
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use starknet_core::utils::get_selector_from_name;

use crate::cairo::{Decode, DecodeError, Encode, Input};
use crate::{Amount, BountyId, ContractAddress, Felt};

lazy_static! {
    static ref BOUNTY_CREATED_KEY: Felt = selector("BountyCreated");
    static ref PAYMENT_PROCESSED_KEY: Felt = selector("PaymentProcessed");
    static ref REFUND_PROCESSED_KEY: Felt = selector("RefundProcessed");
    static ref FEE_COLLECTED_KEY: Felt = selector("FeeCollected");
}

fn selector(name: &str) -> Felt {
    get_selector_from_name(name).expect("event names are ASCII")
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    BountyCreated,
    PaymentProcessed,
    RefundProcessed,
    FeeCollected,
}

impl EventKind {
    pub const ALL: [EventKind; 4] = [
        EventKind::BountyCreated,
        EventKind::PaymentProcessed,
        EventKind::RefundProcessed,
        EventKind::FeeCollected,
    ];

    pub fn name(self) -> &'static str {
        match self {
            EventKind::BountyCreated => "BountyCreated",
            EventKind::PaymentProcessed => "PaymentProcessed",
            EventKind::RefundProcessed => "RefundProcessed",
            EventKind::FeeCollected => "FeeCollected",
        }
    }

    /// The first event key: the selector of the event name.
    pub fn key(self) -> Felt {
        match self {
            EventKind::BountyCreated => *BOUNTY_CREATED_KEY,
            EventKind::PaymentProcessed => *PAYMENT_PROCESSED_KEY,
            EventKind::RefundProcessed => *REFUND_PROCESSED_KEY,
            EventKind::FeeCollected => *FEE_COLLECTED_KEY,
        }
    }

    pub fn from_key(key: &Felt) -> Option<Self> {
        EventKind::ALL.iter().copied().find(|kind| kind.key() == *key)
    }
}

impl core::fmt::Display for EventKind {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// The contract that emits the events of an [EventCategory].
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Emitter {
    BountyPlatform,
    PaymentProcessor,
}

/// Events are fetched per category. Each category is one `getEvents` query.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum EventCategory {
    Bounty,
    Payment,
    RefundAndFee,
}

impl EventCategory {
    pub const ALL: [EventCategory; 3] = [
        EventCategory::Bounty,
        EventCategory::Payment,
        EventCategory::RefundAndFee,
    ];

    pub fn kinds(self) -> &'static [EventKind] {
        match self {
            EventCategory::Bounty => &[EventKind::BountyCreated],
            EventCategory::Payment => &[EventKind::PaymentProcessed],
            EventCategory::RefundAndFee => &[EventKind::RefundProcessed, EventKind::FeeCollected],
        }
    }

    pub fn emitter(self) -> Emitter {
        match self {
            EventCategory::Bounty => Emitter::BountyPlatform,
            EventCategory::Payment | EventCategory::RefundAndFee => Emitter::PaymentProcessor,
        }
    }

    /// Key filter for the category: any of the category's event selectors in the first key
    /// position.
    pub fn key_filter(self) -> Vec<Vec<Felt>> {
        vec![self.kinds().iter().map(|kind| kind.key()).collect()]
    }
}

impl core::fmt::Display for EventCategory {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        let name = match self {
            EventCategory::Bounty => "bounty",
            EventCategory::Payment => "payment",
            EventCategory::RefundAndFee => "refund/fee",
        };
        f.write_str(name)
    }
}

/// A decoded marketplace event.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum MarketEvent {
    BountyCreated {
        bounty_id: BountyId,
        creator: ContractAddress,
        reward: Amount,
        deadline: u64,
    },
    PaymentProcessed {
        bounty_id: BountyId,
        recipient: ContractAddress,
        amount: Amount,
    },
    RefundProcessed {
        bounty_id: BountyId,
        recipient: ContractAddress,
        amount: Amount,
    },
    FeeCollected {
        bounty_id: BountyId,
        amount: Amount,
    },
}

impl MarketEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            MarketEvent::BountyCreated { .. } => EventKind::BountyCreated,
            MarketEvent::PaymentProcessed { .. } => EventKind::PaymentProcessed,
            MarketEvent::RefundProcessed { .. } => EventKind::RefundProcessed,
            MarketEvent::FeeCollected { .. } => EventKind::FeeCollected,
        }
    }

    pub fn bounty_id(&self) -> BountyId {
        match self {
            MarketEvent::BountyCreated { bounty_id, .. }
            | MarketEvent::PaymentProcessed { bounty_id, .. }
            | MarketEvent::RefundProcessed { bounty_id, .. }
            | MarketEvent::FeeCollected { bounty_id, .. } => *bounty_id,
        }
    }

    /// Decode an event from its keys and data.
    pub fn decode(keys: &[Felt], data: &[Felt]) -> Result<Self, EventDecodeError> {
        let selector = keys.first().ok_or(EventDecodeError::MissingSelector)?;
        let kind =
            EventKind::from_key(selector).ok_or(EventDecodeError::UnknownSelector(*selector))?;
        let bounty_id = BountyId::decode(&keys[1..])?;
        let mut data = Input::new(data);
        let event = match kind {
            EventKind::BountyCreated => MarketEvent::BountyCreated {
                bounty_id,
                creator: Decode::decode_from(&mut data)?,
                reward: Decode::decode_from(&mut data)?,
                deadline: Decode::decode_from(&mut data)?,
            },
            EventKind::PaymentProcessed => MarketEvent::PaymentProcessed {
                bounty_id,
                recipient: Decode::decode_from(&mut data)?,
                amount: Decode::decode_from(&mut data)?,
            },
            EventKind::RefundProcessed => MarketEvent::RefundProcessed {
                bounty_id,
                recipient: Decode::decode_from(&mut data)?,
                amount: Decode::decode_from(&mut data)?,
            },
            EventKind::FeeCollected => MarketEvent::FeeCollected {
                bounty_id,
                amount: Decode::decode_from(&mut data)?,
            },
        };
        Ok(event)
    }

    /// Returns the keys and data the contracts emit for this event.
    pub fn encode(&self) -> (Vec<Felt>, Vec<Felt>) {
        let mut keys = vec![self.kind().key()];
        self.bounty_id().encode_to(&mut keys);
        let mut data = Vec::new();
        match self {
            MarketEvent::BountyCreated {
                creator,
                reward,
                deadline,
                ..
            } => {
                creator.encode_to(&mut data);
                reward.encode_to(&mut data);
                deadline.encode_to(&mut data);
            }
            MarketEvent::PaymentProcessed {
                recipient, amount, ..
            }
            | MarketEvent::RefundProcessed {
                recipient, amount, ..
            } => {
                recipient.encode_to(&mut data);
                amount.encode_to(&mut data);
            }
            MarketEvent::FeeCollected { amount, .. } => amount.encode_to(&mut data),
        }
        (keys, data)
    }
}

#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum EventDecodeError {
    #[error("event has no keys")]
    MissingSelector,

    #[error("unknown event selector {0:#x}")]
    UnknownSelector(Felt),

    #[error(transparent)]
    Payload(#[from] DecodeError),
}
