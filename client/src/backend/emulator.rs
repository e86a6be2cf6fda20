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

//! Provides [Emulator] backend to run the marketplace contracts in memory.
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use lazy_static::lazy_static;

use bountyhub_core::cairo::{Decode, Encode, Input};
use bountyhub_core::event::MarketEvent;
use bountyhub_core::state::{ApplicationStatus, BountyStatus, SubmissionStatus};

use crate::config::{ContractAddresses, DeploymentConfig};
use crate::entrypoint::Entrypoint;
use crate::interface::*;

/// Share of a released reward kept by the payment processor, in basis points.
pub const PLATFORM_FEE_BASIS_POINTS: u128 = 500;

/// Reputation points credited to the submitter of approved work.
const COMPLETION_REPUTATION: u64 = 10;

lazy_static! {
    /// Owner of the emulated contracts. Only the owner may call `update_reputation`.
    pub static ref EMULATOR_OWNER: ContractAddress = address(0x0b0b);
    static ref CONTRACTS: ContractAddresses = ContractAddresses {
        bounty_platform: address(0x1001),
        payment_processor: address(0x1002),
        escrow: address(0x1003),
        reputation: address(0x1004),
        reward_token: address(0x1005),
    };
}

fn address(n: u64) -> ContractAddress {
    ContractAddress::from_felt(Felt::from(n))
}

/// [Backend] implementation that plays the marketplace contracts with in-memory state.
///
/// # Differences with real backend
///
/// * Every executed transaction creates a new block that only contains the events of that
///   transaction.
///
/// * Only the contracts of [Emulator::deployment] exist. Calls to other addresses fail.
///
/// * Token balances are not tracked. Only allowances to the escrow contract are checked.
///
/// * Failures can be injected with [Emulator::fail_events_from] and
///   [Emulator::fail_block_number].
#[derive(Clone)]
pub struct Emulator {
    state: Arc<Mutex<EmulatorState>>,
    chain_id: Felt,
}

/// Mutable state of the emulator.
#[derive(Clone, Default)]
struct EmulatorState {
    block_number: BlockNumber,
    tx_count: u64,
    events: Vec<ChainEvent>,
    deployed: HashMap<ContractAddress, Felt>,
    allowances: HashMap<(ContractAddress, ContractAddress), Amount>,
    bounties: Vec<Bounty>,
    applications: Vec<Application>,
    submissions: Vec<Submission>,
    escrow: HashMap<BountyId, Amount>,
    reputation: HashMap<ContractAddress, u64>,
    event_queries: Vec<EventQuery>,
    failing_emitters: HashSet<ContractAddress>,
    fail_block_number: bool,
}

impl Emulator {
    pub fn new() -> Self {
        let deployed = CONTRACTS
            .named()
            .into_iter()
            .enumerate()
            .map(|(index, (_, address))| (address, Felt::from(0xc1a55_u64 + index as u64)))
            .collect();
        Emulator {
            state: Arc::new(Mutex::new(EmulatorState {
                deployed,
                ..EmulatorState::default()
            })),
            chain_id: Felt::from_hex_unchecked("0x424f554e54594855425f454d554c41544f52"),
        }
    }

    /// Deployment config pointing at the emulated contracts.
    pub fn deployment(&self) -> DeploymentConfig {
        DeploymentConfig {
            network: "emulator".into(),
            rpc_url: "memory".into(),
            contracts: *CONTRACTS,
        }
    }

    /// Returns an account that submits transactions to this emulator.
    pub fn account(&self, address: ContractAddress) -> EmulatorAccount {
        EmulatorAccount {
            emulator: self.clone(),
            address,
        }
    }

    /// Move the chain tip to `block_number` without producing events.
    pub fn set_block_number(&self, block_number: BlockNumber) {
        self.lock().block_number = block_number;
    }

    /// All queries received by [Backend::get_events], oldest first.
    pub fn event_queries(&self) -> Vec<EventQuery> {
        self.lock().event_queries.clone()
    }

    /// Number of transactions executed so far.
    pub fn transaction_count(&self) -> u64 {
        self.lock().tx_count
    }

    /// Make [Backend::get_events] fail for events emitted by `address`.
    pub fn fail_events_from(&self, address: ContractAddress, fail: bool) {
        let mut state = self.lock();
        if fail {
            state.failing_emitters.insert(address);
        } else {
            state.failing_emitters.remove(&address);
        }
    }

    /// Make [Backend::block_number] fail.
    pub fn fail_block_number(&self, fail: bool) {
        self.lock().fail_block_number = fail;
    }

    /// Forget the contract deployed at `address` so that [Backend::class_hash_at] fails for it.
    pub fn remove_contract(&self, address: ContractAddress) {
        self.lock().deployed.remove(&address);
    }

    /// Append `event` as if `emitter` emitted it in a new block. Does not touch contract state.
    pub fn emit(&self, emitter: ContractAddress, event: &MarketEvent) {
        let mut state = self.lock();
        state.block_number += 1;
        state.tx_count += 1;
        let tx_hash = tx_hash(state.tx_count);
        state.push_event(emitter, event, tx_hash);
    }

    fn lock(&self) -> MutexGuard<EmulatorState> {
        // Only poisoned if a thread panicked while holding the lock.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Apply all `calls` from `caller` in one transaction. Nothing changes if any call fails.
    fn execute(&self, caller: ContractAddress, calls: Vec<ContractCall>) -> Result<TxHash, Error> {
        let mut state = self.lock();
        let mut next = state.clone();
        next.block_number += 1;
        next.tx_count += 1;
        let tx_hash = tx_hash(next.tx_count);
        for call in calls {
            next.invoke(caller, &call, tx_hash)
                .map_err(|reason| Error::Rpc(format!("Transaction reverted: {}", reason)))?;
        }
        *state = next;
        Ok(tx_hash)
    }
}

impl Default for Emulator {
    fn default() -> Self {
        Self::new()
    }
}

fn tx_hash(n: u64) -> TxHash {
    Felt::from(0x7a_0000_0000_u64 + n)
}

/// Part of `amount` kept as platform fee, rounded down.
fn platform_fee(amount: Amount) -> Amount {
    // Split the multiplication so that no reward can overflow.
    let fee = amount.0 / 10_000 * PLATFORM_FEE_BASIS_POINTS
        + amount.0 % 10_000 * PLATFORM_FEE_BASIS_POINTS / 10_000;
    Amount(fee)
}

fn arg<T: Decode>(input: &mut Input<'_>) -> Result<T, String> {
    T::decode_from(input).map_err(|error| format!("invalid calldata: {}", error))
}

impl EmulatorState {
    fn push_event(&mut self, emitter: ContractAddress, event: &MarketEvent, tx_hash: TxHash) {
        let (keys, data) = event.encode();
        self.events.push(ChainEvent {
            from_address: emitter,
            keys,
            data,
            block_number: Some(self.block_number),
            transaction_hash: tx_hash,
        });
    }

    fn bounty_mut(&mut self, id: BountyId) -> Result<&mut Bounty, String> {
        self.bounties
            .iter_mut()
            .find(|bounty| bounty.id == id)
            .ok_or_else(|| format!("bounty {} does not exist", id))
    }

    fn entrypoint(&self, call: &ContractCall) -> Result<Entrypoint, String> {
        if !self.deployed.contains_key(&call.to) {
            return Err(format!("no contract deployed at {}", call.to));
        }
        Entrypoint::from_selector(&call.selector)
            .ok_or_else(|| format!("unknown entrypoint {:#x}", call.selector))
    }

    fn invoke(
        &mut self,
        caller: ContractAddress,
        call: &ContractCall,
        tx_hash: TxHash,
    ) -> Result<(), String> {
        let entrypoint = self.entrypoint(call)?;
        let input = &mut Input::new(&call.calldata);
        match (entrypoint, call.to) {
            (Entrypoint::Approve, token) if token == CONTRACTS.reward_token => {
                let spender: ContractAddress = arg(input)?;
                let amount: Amount = arg(input)?;
                self.allowances.insert((caller, spender), amount);
            }
            (Entrypoint::CreateBounty, to) if to == CONTRACTS.bounty_platform => {
                let title: BountyTitle = arg(input)?;
                let description: String = arg(input)?;
                let reward: Amount = arg(input)?;
                let reward_token: ContractAddress = arg(input)?;
                let deadline: u64 = arg(input)?;
                if reward.is_zero() {
                    return Err("reward must be positive".into());
                }
                let allowance = self
                    .allowances
                    .get(&(caller, CONTRACTS.escrow))
                    .copied()
                    .unwrap_or_default();
                if allowance < reward {
                    return Err(format!(
                        "insufficient allowance: {} approved, {} required",
                        allowance, reward
                    ));
                }
                self.allowances
                    .insert((caller, CONTRACTS.escrow), Amount(allowance.0 - reward.0));
                let id = BountyId(self.bounties.len() as u64 + 1);
                self.bounties.push(Bounty {
                    id,
                    title,
                    description,
                    reward,
                    reward_token,
                    deadline,
                    creator: caller,
                    status: BountyStatus::Open,
                });
                self.escrow.insert(id, reward);
                let event = MarketEvent::BountyCreated {
                    bounty_id: id,
                    creator: caller,
                    reward,
                    deadline,
                };
                self.push_event(CONTRACTS.bounty_platform, &event, tx_hash);
            }
            (Entrypoint::SubmitApplication, to) if to == CONTRACTS.bounty_platform => {
                let bounty_id: BountyId = arg(input)?;
                let proposal: String = arg(input)?;
                let bounty = self.bounty_mut(bounty_id)?;
                if bounty.status != BountyStatus::Open {
                    return Err(format!("bounty {} is {}", bounty_id, bounty.status));
                }
                if bounty.creator == caller {
                    return Err("creator cannot apply to own bounty".into());
                }
                let id = ApplicationId(self.applications.len() as u64 + 1);
                self.applications.push(Application {
                    id,
                    bounty_id,
                    applicant: caller,
                    proposal,
                    status: ApplicationStatus::Pending,
                });
            }
            (Entrypoint::AcceptApplication, to) if to == CONTRACTS.bounty_platform => {
                let application_id: ApplicationId = arg(input)?;
                let bounty_id = self
                    .applications
                    .iter()
                    .find(|application| application.id == application_id)
                    .filter(|application| application.status == ApplicationStatus::Pending)
                    .map(|application| application.bounty_id)
                    .ok_or_else(|| format!("no pending application {}", application_id))?;
                let bounty = self.bounty_mut(bounty_id)?;
                if bounty.creator != caller {
                    return Err("only the bounty creator can accept applications".into());
                }
                if bounty.status != BountyStatus::Open {
                    return Err(format!("bounty {} is {}", bounty_id, bounty.status));
                }
                bounty.status = BountyStatus::InProgress;
                for application in &mut self.applications {
                    if application.bounty_id == bounty_id {
                        application.status = if application.id == application_id {
                            ApplicationStatus::Accepted
                        } else {
                            ApplicationStatus::Rejected
                        };
                    }
                }
            }
            (Entrypoint::SubmitWork, to) if to == CONTRACTS.bounty_platform => {
                let bounty_id: BountyId = arg(input)?;
                let content: String = arg(input)?;
                let status = self.bounty_mut(bounty_id)?.status;
                if status != BountyStatus::InProgress {
                    return Err(format!("bounty {} is {}", bounty_id, status));
                }
                let accepted = self.applications.iter().any(|application| {
                    application.bounty_id == bounty_id
                        && application.applicant == caller
                        && application.status == ApplicationStatus::Accepted
                });
                if !accepted {
                    return Err("only the accepted applicant can submit work".into());
                }
                let id = SubmissionId(self.submissions.len() as u64 + 1);
                self.submissions.push(Submission {
                    id,
                    bounty_id,
                    submitter: caller,
                    content,
                    status: SubmissionStatus::Pending,
                });
            }
            (Entrypoint::ApproveSubmission, to) if to == CONTRACTS.bounty_platform => {
                let submission_id: SubmissionId = arg(input)?;
                let (bounty_id, submitter) = self
                    .submissions
                    .iter()
                    .find(|submission| submission.id == submission_id)
                    .filter(|submission| submission.status == SubmissionStatus::Pending)
                    .map(|submission| (submission.bounty_id, submission.submitter))
                    .ok_or_else(|| format!("no pending submission {}", submission_id))?;
                let bounty = self.bounty_mut(bounty_id)?;
                if bounty.creator != caller {
                    return Err("only the bounty creator can approve work".into());
                }
                bounty.status = BountyStatus::Completed;
                for submission in &mut self.submissions {
                    if submission.id == submission_id {
                        submission.status = SubmissionStatus::Approved;
                    }
                }
                let held = self.escrow.insert(bounty_id, Amount(0)).unwrap_or_default();
                let fee = platform_fee(held);
                let payment = MarketEvent::PaymentProcessed {
                    bounty_id,
                    recipient: submitter,
                    amount: Amount(held.0 - fee.0),
                };
                self.push_event(CONTRACTS.payment_processor, &payment, tx_hash);
                let fee = MarketEvent::FeeCollected {
                    bounty_id,
                    amount: fee,
                };
                self.push_event(CONTRACTS.payment_processor, &fee, tx_hash);
                let score = self.reputation.entry(submitter).or_default();
                *score = score.saturating_add(COMPLETION_REPUTATION);
            }
            (Entrypoint::CancelBounty, to) if to == CONTRACTS.bounty_platform => {
                let bounty_id: BountyId = arg(input)?;
                let bounty = self.bounty_mut(bounty_id)?;
                if bounty.creator != caller {
                    return Err("only the bounty creator can cancel".into());
                }
                if bounty.status != BountyStatus::Open {
                    return Err(format!("bounty {} is {}", bounty_id, bounty.status));
                }
                bounty.status = BountyStatus::Cancelled;
                let creator = bounty.creator;
                let held = self.escrow.insert(bounty_id, Amount(0)).unwrap_or_default();
                let refund = MarketEvent::RefundProcessed {
                    bounty_id,
                    recipient: creator,
                    amount: held,
                };
                self.push_event(CONTRACTS.payment_processor, &refund, tx_hash);
            }
            (Entrypoint::UpdateReputation, to) if to == CONTRACTS.reputation => {
                let user: ContractAddress = arg(input)?;
                let points: u64 = arg(input)?;
                if caller != *EMULATOR_OWNER {
                    return Err("only the owner can update reputation".into());
                }
                let score = self.reputation.entry(user).or_default();
                *score = score.saturating_add(points);
            }
            (entrypoint, to) => {
                return Err(format!("{} cannot be invoked on {}", entrypoint, to));
            }
        }
        Ok(())
    }

    fn view(&self, call: &ContractCall) -> Result<Vec<Felt>, String> {
        let entrypoint = self.entrypoint(call)?;
        let input = &mut Input::new(&call.calldata);
        let output = match (entrypoint, call.to) {
            (Entrypoint::GetBounty, to) if to == CONTRACTS.bounty_platform => {
                let id: BountyId = arg(input)?;
                self.bounties
                    .iter()
                    .find(|bounty| bounty.id == id)
                    .ok_or_else(|| format!("bounty {} does not exist", id))?
                    .encode()
            }
            (Entrypoint::GetBountyCount, to) if to == CONTRACTS.bounty_platform => {
                (self.bounties.len() as u64).encode()
            }
            (Entrypoint::GetApplication, to) if to == CONTRACTS.bounty_platform => {
                let id: ApplicationId = arg(input)?;
                self.applications
                    .iter()
                    .find(|application| application.id == id)
                    .ok_or_else(|| format!("application {} does not exist", id))?
                    .encode()
            }
            (Entrypoint::GetBountyApplications, to) if to == CONTRACTS.bounty_platform => {
                let bounty_id: BountyId = arg(input)?;
                self.applications
                    .iter()
                    .filter(|application| application.bounty_id == bounty_id)
                    .cloned()
                    .collect::<Vec<_>>()
                    .encode()
            }
            (Entrypoint::GetSubmission, to) if to == CONTRACTS.bounty_platform => {
                let id: SubmissionId = arg(input)?;
                self.submissions
                    .iter()
                    .find(|submission| submission.id == id)
                    .ok_or_else(|| format!("submission {} does not exist", id))?
                    .encode()
            }
            (Entrypoint::GetEscrowBalance, to) if to == CONTRACTS.escrow => {
                let bounty_id: BountyId = arg(input)?;
                self.escrow
                    .get(&bounty_id)
                    .copied()
                    .unwrap_or_default()
                    .encode()
            }
            (Entrypoint::GetReputation, to) if to == CONTRACTS.reputation => {
                let user: ContractAddress = arg(input)?;
                self.reputation
                    .get(&user)
                    .copied()
                    .unwrap_or_default()
                    .encode()
            }
            (entrypoint, to) => {
                return Err(format!("{} is not a view of {}", entrypoint, to));
            }
        };
        Ok(output)
    }
}

fn keys_match(filter: &[Vec<Felt>], keys: &[Felt]) -> bool {
    filter.iter().enumerate().all(|(position, allowed)| {
        allowed.is_empty()
            || keys
                .get(position)
                .map_or(false, |key| allowed.contains(key))
    })
}

#[async_trait::async_trait]
impl Backend for Emulator {
    async fn block_number(&self) -> Result<BlockNumber, Error> {
        let state = self.lock();
        if state.fail_block_number {
            return Err(Error::Rpc("block number unavailable".into()));
        }
        Ok(state.block_number)
    }

    async fn get_events(&self, query: EventQuery) -> Result<EventsPage, Error> {
        let mut state = self.lock();
        state.event_queries.push(query.clone());
        if state.failing_emitters.contains(&query.address) {
            return Err(Error::Rpc(format!(
                "events of {} unavailable",
                query.address
            )));
        }
        let offset = match &query.continuation_token {
            Some(token) => token
                .parse::<usize>()
                .map_err(|_| Error::Rpc(format!("invalid continuation token {}", token)))?,
            None => 0,
        };
        let matching: Vec<&ChainEvent> = state
            .events
            .iter()
            .filter(|event| event.from_address == query.address)
            .filter(|event| {
                event.block_number.map_or(false, |block| {
                    query.from_block <= block && block <= query.to_block
                })
            })
            .filter(|event| keys_match(&query.keys, &event.keys))
            .collect();
        let end = offset.saturating_add(query.chunk_size as usize);
        let events = matching
            .iter()
            .skip(offset)
            .take(query.chunk_size as usize)
            .map(|event| (*event).clone())
            .collect();
        let continuation_token = if end < matching.len() {
            Some(end.to_string())
        } else {
            None
        };
        Ok(EventsPage {
            events,
            continuation_token,
        })
    }

    async fn call(&self, call: ContractCall) -> Result<Vec<Felt>, Error> {
        self.lock().view(&call).map_err(Error::Rpc)
    }

    async fn class_hash_at(&self, address: ContractAddress) -> Result<Felt, Error> {
        self.lock()
            .deployed
            .get(&address)
            .copied()
            .ok_or_else(|| Error::Rpc(format!("Contract not found: {}", address)))
    }

    async fn chain_id(&self) -> Result<Felt, Error> {
        Ok(self.chain_id)
    }
}

/// [Account] that executes transactions on an [Emulator]. No signatures are involved.
#[derive(Clone)]
pub struct EmulatorAccount {
    emulator: Emulator,
    address: ContractAddress,
}

#[async_trait::async_trait]
impl Account for EmulatorAccount {
    fn address(&self) -> ContractAddress {
        self.address
    }

    async fn execute(&self, calls: Vec<ContractCall>) -> Result<TxHash, Error> {
        self.emulator.execute(self.address, calls)
    }
}
