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

//! Defines [Entrypoint] for every contract entrypoint the client invokes.
use std::collections::HashMap;

use lazy_static::lazy_static;
use starknet::core::utils::get_selector_from_name;

use crate::interface::*;

/// Contract entrypoints used by the client.
///
/// The bounty platform contract owns bounties, applications and submissions. The escrow and
/// reputation contracts expose getters. `approve` belongs to the ERC20 reward token.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Entrypoint {
    CreateBounty,
    SubmitApplication,
    AcceptApplication,
    SubmitWork,
    ApproveSubmission,
    CancelBounty,
    UpdateReputation,
    Approve,
    GetBounty,
    GetBountyCount,
    GetApplication,
    GetBountyApplications,
    GetSubmission,
    GetEscrowBalance,
    GetReputation,
}

lazy_static! {
    static ref SELECTORS: HashMap<Entrypoint, Felt> = Entrypoint::ALL
        .iter()
        .map(|entrypoint| {
            let selector =
                get_selector_from_name(entrypoint.name()).expect("entrypoint names are ASCII");
            (*entrypoint, selector)
        })
        .collect();
}

impl Entrypoint {
    pub const ALL: [Entrypoint; 15] = [
        Entrypoint::CreateBounty,
        Entrypoint::SubmitApplication,
        Entrypoint::AcceptApplication,
        Entrypoint::SubmitWork,
        Entrypoint::ApproveSubmission,
        Entrypoint::CancelBounty,
        Entrypoint::UpdateReputation,
        Entrypoint::Approve,
        Entrypoint::GetBounty,
        Entrypoint::GetBountyCount,
        Entrypoint::GetApplication,
        Entrypoint::GetBountyApplications,
        Entrypoint::GetSubmission,
        Entrypoint::GetEscrowBalance,
        Entrypoint::GetReputation,
    ];

    /// The Cairo function name.
    pub fn name(self) -> &'static str {
        match self {
            Entrypoint::CreateBounty => "create_bounty",
            Entrypoint::SubmitApplication => "submit_application",
            Entrypoint::AcceptApplication => "accept_application",
            Entrypoint::SubmitWork => "submit_work",
            Entrypoint::ApproveSubmission => "approve_submission",
            Entrypoint::CancelBounty => "cancel_bounty",
            Entrypoint::UpdateReputation => "update_reputation",
            Entrypoint::Approve => "approve",
            Entrypoint::GetBounty => "get_bounty",
            Entrypoint::GetBountyCount => "get_bounty_count",
            Entrypoint::GetApplication => "get_application",
            Entrypoint::GetBountyApplications => "get_bounty_applications",
            Entrypoint::GetSubmission => "get_submission",
            Entrypoint::GetEscrowBalance => "get_escrow_balance",
            Entrypoint::GetReputation => "get_reputation",
        }
    }

    pub fn selector(self) -> Felt {
        SELECTORS[&self]
    }

    pub fn from_selector(selector: &Felt) -> Option<Self> {
        SELECTORS
            .iter()
            .find_map(|(entrypoint, s)| if s == selector { Some(*entrypoint) } else { None })
    }

    /// Build a call of this entrypoint on the contract at `to`.
    pub fn call(self, to: ContractAddress, calldata: Vec<Felt>) -> ContractCall {
        ContractCall {
            to,
            selector: self.selector(),
            calldata,
        }
    }
}

impl core::fmt::Display for Entrypoint {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.write_str(self.name())
    }
}
