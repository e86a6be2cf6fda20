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

//! In-memory index of marketplace events.
use std::collections::HashMap;

use parking_lot::Mutex;

use bountyhub_client::{BlockNumber, ChainEvent, ContractAddress, Felt, TxHash};
use bountyhub_core::event::EventDecodeError;
use bountyhub_core::{BountyId, MarketEvent};

/// An event recorded by the index.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct IndexedEvent {
    pub block_number: Option<BlockNumber>,
    pub transaction_hash: TxHash,
    pub emitter: ContractAddress,
    pub event: MarketEvent,
}

/// Identity of an emitted event: transaction hash, emitter, keys, data and the number of
/// identical events that precede it in the same transaction.
type EventKey = (TxHash, ContractAddress, Vec<Felt>, Vec<Felt>, usize);

/// Records every distinct event once.
///
/// Nodes do not report the position of an event within its transaction. Identical events of
/// one transaction are told apart by their order within a fetched page, so a transaction's
/// events must be fed in a single [EventIndex::record_page] call.
///
/// Recording an event again has no effect, so overlapping or repeated block ranges can be fed
/// to the index safely. Dedup state for blocks that will not be fetched again is dropped with
/// [EventIndex::prune]. Recorded events are kept for the lifetime of the index.
#[derive(Default)]
pub struct EventIndex {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    /// Block of every seen event, `None` for pending blocks.
    seen: HashMap<EventKey, Option<BlockNumber>>,
    events: Vec<IndexedEvent>,
}

impl EventIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode and record the events of one page. Returns for every event the decoded event if
    /// it was not recorded before.
    pub fn record_page(
        &self,
        events: &[ChainEvent],
    ) -> Vec<Result<Option<IndexedEvent>, EventDecodeError>> {
        let mut occurrences: HashMap<(TxHash, ContractAddress, &[Felt], &[Felt]), usize> =
            HashMap::new();
        let mut inner = self.inner.lock();
        events
            .iter()
            .map(|event| {
                let occurrence = occurrences
                    .entry((
                        event.transaction_hash,
                        event.from_address,
                        &event.keys[..],
                        &event.data[..],
                    ))
                    .or_insert(0);
                let key = (
                    event.transaction_hash,
                    event.from_address,
                    event.keys.clone(),
                    event.data.clone(),
                    *occurrence,
                );
                *occurrence += 1;
                inner.record(key, event)
            })
            .collect()
    }

    /// Forget the dedup state of events in blocks before `block_number`.
    pub fn prune(&self, block_number: BlockNumber) {
        self.inner
            .lock()
            .seen
            .retain(|_, block| block.map_or(true, |block| block >= block_number));
    }

    /// Number of events remembered for dedup.
    pub fn tracked(&self) -> usize {
        self.inner.lock().seen.len()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All recorded events in the order they were recorded.
    pub fn events(&self) -> Vec<IndexedEvent> {
        self.inner.lock().events.clone()
    }

    pub fn events_for_bounty(&self, bounty_id: BountyId) -> Vec<IndexedEvent> {
        self.inner
            .lock()
            .events
            .iter()
            .filter(|indexed| indexed.event.bounty_id() == bounty_id)
            .cloned()
            .collect()
    }
}

impl Inner {
    fn record(
        &mut self,
        key: EventKey,
        event: &ChainEvent,
    ) -> Result<Option<IndexedEvent>, EventDecodeError> {
        if self.seen.contains_key(&key) {
            return Ok(None);
        }
        let indexed = IndexedEvent {
            block_number: event.block_number,
            transaction_hash: event.transaction_hash,
            emitter: event.from_address,
            event: MarketEvent::decode(&event.keys, &event.data)?,
        };
        self.seen.insert(key, event.block_number);
        self.events.push(indexed.clone());
        Ok(Some(indexed))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use bountyhub_core::Amount;

    fn chain_event(block: BlockNumber, tx: u64, event: &MarketEvent) -> ChainEvent {
        let (keys, data) = event.encode();
        ChainEvent {
            from_address: ContractAddress::from_felt(Felt::from(0x1002u64)),
            keys,
            data,
            block_number: Some(block),
            transaction_hash: Felt::from(tx),
        }
    }

    fn fee(bounty_id: u64) -> MarketEvent {
        MarketEvent::FeeCollected {
            bounty_id: BountyId(bounty_id),
            amount: Amount(50),
        }
    }

    fn recorded(results: Vec<Result<Option<IndexedEvent>, EventDecodeError>>) -> usize {
        results
            .into_iter()
            .filter(|result| matches!(result, Ok(Some(_))))
            .count()
    }

    #[test]
    fn record_once() {
        let index = EventIndex::new();

        assert_eq!(recorded(index.record_page(&[chain_event(1, 1, &fee(3))])), 1);
        assert_eq!(recorded(index.record_page(&[chain_event(1, 1, &fee(3))])), 0);
        assert_eq!(recorded(index.record_page(&[chain_event(2, 2, &fee(3))])), 1);
        assert_eq!(index.len(), 2);
        assert_eq!(index.events_for_bounty(BountyId(3)).len(), 2);
        assert!(index.events_for_bounty(BountyId(4)).is_empty());
    }

    #[test]
    fn identical_events_of_one_transaction() {
        let index = EventIndex::new();
        let page = vec![chain_event(1, 1, &fee(3)), chain_event(1, 1, &fee(3))];

        assert_eq!(recorded(index.record_page(&page)), 2);
        assert_eq!(recorded(index.record_page(&page)), 0);
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn prune_keeps_checkpoint_block() {
        let index = EventIndex::new();
        let mut pending = chain_event(0, 9, &fee(1));
        pending.block_number = None;
        index.record_page(&[
            chain_event(1, 1, &fee(1)),
            chain_event(2, 2, &fee(2)),
            chain_event(3, 3, &fee(3)),
            pending,
        ]);
        assert_eq!(index.tracked(), 4);

        index.prune(2);
        assert_eq!(index.tracked(), 3);
        assert_eq!(index.len(), 4);
        assert_eq!(recorded(index.record_page(&[chain_event(2, 2, &fee(2))])), 0);
    }

    #[test]
    fn undecodable_event_is_not_recorded() {
        let index = EventIndex::new();
        let mut event = chain_event(1, 1, &fee(3));
        event.keys[0] = Felt::from(12345u64);

        let results = index.record_page(&[event]);
        assert!(results[0].is_err());
        assert!(index.is_empty());
        assert_eq!(index.tracked(), 0);
    }
}
