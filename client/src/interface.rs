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

//! Provide the abstract traits for talking to the chain and the types they exchange.
//!
//! [Backend] covers reads: block height, event logs and contract calls. [Account] covers writes:
//! signing and submitting transactions on behalf of a connected wallet.
pub use bountyhub_core::*;

pub use crate::error::Error;

/// A single contract entrypoint invocation: target contract, entrypoint selector and Cairo
/// serialized arguments.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ContractCall {
    pub to: ContractAddress,
    pub selector: Felt,
    pub calldata: Vec<Felt>,
}

/// An event log entry as returned by the node.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ChainEvent {
    pub from_address: ContractAddress,
    pub keys: Vec<Felt>,
    pub data: Vec<Felt>,
    /// `None` for events of pending blocks.
    pub block_number: Option<BlockNumber>,
    pub transaction_hash: TxHash,
}

/// Parameters of an event log query.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EventQuery {
    /// First block to include.
    pub from_block: BlockNumber,
    /// Last block to include.
    pub to_block: BlockNumber,
    pub address: ContractAddress,
    /// Allowed values per key position. An empty list at a position matches any key.
    pub keys: Vec<Vec<Felt>>,
    /// Maximum number of events returned in one page.
    pub chunk_size: u64,
    /// Token of the page to fetch. `None` for the first page.
    pub continuation_token: Option<String>,
}

/// One page of events matching an [EventQuery].
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct EventsPage {
    pub events: Vec<ChainEvent>,
    /// Present if more events match the query than fit into the page.
    pub continuation_token: Option<String>,
}

/// Read access to the chain.
#[async_trait::async_trait]
pub trait Backend: Send + Sync {
    /// Number of the latest accepted block.
    async fn block_number(&self) -> Result<BlockNumber, Error>;

    /// Fetch one page of events.
    async fn get_events(&self, query: EventQuery) -> Result<EventsPage, Error>;

    /// Call a view entrypoint against the latest state and return its serialized output.
    async fn call(&self, call: ContractCall) -> Result<Vec<Felt>, Error>;

    /// Class hash of the contract deployed at `address`. Fails if there is none.
    async fn class_hash_at(&self, address: ContractAddress) -> Result<Felt, Error>;

    /// Identifier of the chain the backend talks to.
    async fn chain_id(&self) -> Result<Felt, Error>;
}

/// A connected wallet account that signs and submits transactions.
#[async_trait::async_trait]
pub trait Account: Send + Sync {
    fn address(&self) -> ContractAddress;

    /// Sign and submit all `calls` as one transaction and return its hash.
    ///
    /// Returns once the node accepted the transaction. It does not wait for the transaction to
    /// be included in a block.
    async fn execute(&self, calls: Vec<ContractCall>) -> Result<TxHash, Error>;
}
