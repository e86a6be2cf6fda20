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

//! [Backend] and [Account] implementations for a Starknet JSON-RPC node.
use starknet::accounts::{Account as _, ExecutionEncoding, SingleOwnerAccount};
use starknet::core::types::{BlockId, BlockTag, Call, EventFilter, FunctionCall};
use starknet::providers::jsonrpc::{HttpTransport, JsonRpcClient};
use starknet::providers::{Provider, ProviderError};
use starknet::signers::{LocalWallet, SigningKey};
use url::Url;

use crate::interface::*;

/// Talks to a node through its JSON-RPC endpoint.
pub struct RemoteNode {
    provider: JsonRpcClient<HttpTransport>,
    rpc_url: Url,
}

impl RemoteNode {
    pub fn new(rpc_url: Url) -> Self {
        log::debug!("using RPC endpoint {}", rpc_url);
        RemoteNode {
            provider: JsonRpcClient::new(HttpTransport::new(rpc_url.clone())),
            rpc_url,
        }
    }

    pub fn rpc_url(&self) -> &Url {
        &self.rpc_url
    }
}

fn rpc_error(error: ProviderError) -> Error {
    Error::Rpc(error.to_string())
}

#[async_trait::async_trait]
impl Backend for RemoteNode {
    async fn block_number(&self) -> Result<BlockNumber, Error> {
        self.provider.block_number().await.map_err(rpc_error)
    }

    async fn get_events(&self, query: EventQuery) -> Result<EventsPage, Error> {
        let keys = if query.keys.is_empty() {
            None
        } else {
            Some(query.keys)
        };
        let filter = EventFilter {
            from_block: Some(BlockId::Number(query.from_block)),
            to_block: Some(BlockId::Number(query.to_block)),
            address: Some(query.address.felt()),
            keys,
        };
        let page = self
            .provider
            .get_events(filter, query.continuation_token, query.chunk_size)
            .await
            .map_err(rpc_error)?;
        let events = page
            .events
            .into_iter()
            .map(|event| ChainEvent {
                from_address: ContractAddress::from_felt(event.from_address),
                keys: event.keys,
                data: event.data,
                block_number: event.block_number,
                transaction_hash: event.transaction_hash,
            })
            .collect();
        Ok(EventsPage {
            events,
            continuation_token: page.continuation_token,
        })
    }

    async fn call(&self, call: ContractCall) -> Result<Vec<Felt>, Error> {
        let request = FunctionCall {
            contract_address: call.to.felt(),
            entry_point_selector: call.selector,
            calldata: call.calldata,
        };
        self.provider
            .call(request, BlockId::Tag(BlockTag::Latest))
            .await
            .map_err(rpc_error)
    }

    async fn class_hash_at(&self, address: ContractAddress) -> Result<Felt, Error> {
        self.provider
            .get_class_hash_at(BlockId::Tag(BlockTag::Latest), address.felt())
            .await
            .map_err(rpc_error)
    }

    async fn chain_id(&self) -> Result<Felt, Error> {
        self.provider.chain_id().await.map_err(rpc_error)
    }
}

/// Account contract controlled by a local private key.
///
/// Both supported wallet brands deploy account contracts that use the Cairo 1 execution
/// encoding, so a single implementation serves both.
pub struct RemoteAccount {
    account: SingleOwnerAccount<JsonRpcClient<HttpTransport>, LocalWallet>,
    address: ContractAddress,
}

impl RemoteAccount {
    /// Create an account handle for `address` on the chain `node` is connected to.
    ///
    /// Fails if the chain id cannot be fetched from the node.
    pub async fn connect(
        node: &RemoteNode,
        address: ContractAddress,
        private_key: Felt,
    ) -> Result<Self, Error> {
        let chain_id = node.chain_id().await?;
        let signer = LocalWallet::from(SigningKey::from_secret_scalar(private_key));
        let provider = JsonRpcClient::new(HttpTransport::new(node.rpc_url().clone()));
        let mut account = SingleOwnerAccount::new(
            provider,
            signer,
            address.felt(),
            chain_id,
            ExecutionEncoding::New,
        );
        account.set_block_id(BlockId::Tag(BlockTag::Pending));
        Ok(RemoteAccount { account, address })
    }

    /// The underlying SDK account, used to declare and deploy contracts.
    pub fn sdk_account(&self) -> &SingleOwnerAccount<JsonRpcClient<HttpTransport>, LocalWallet> {
        &self.account
    }
}

#[async_trait::async_trait]
impl Account for RemoteAccount {
    fn address(&self) -> ContractAddress {
        self.address
    }

    async fn execute(&self, calls: Vec<ContractCall>) -> Result<TxHash, Error> {
        let calls = calls
            .into_iter()
            .map(|call| Call {
                to: call.to.felt(),
                selector: call.selector,
                calldata: call.calldata,
            })
            .collect();
        let result = self
            .account
            .execute_v3(calls)
            .send()
            .await
            .map_err(|error| Error::Rpc(error.to_string()))?;
        log::debug!("submitted transaction {:#x}", result.transaction_hash);
        Ok(result.transaction_hash)
    }
}
