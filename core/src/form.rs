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

//! Validation of user input for new bounties.
//!
//! [BountyDraft] holds raw form input. [BountyDraft::validate] must succeed before any wallet or
//! network call is made with it.
use crate::title::TitleError;
use crate::{Amount, BountyTitle, ContractAddress};

/// Unvalidated input of the bounty creation form.
#[derive(Clone, Debug, Default)]
pub struct BountyDraft {
    pub title: String,
    pub description: String,
    pub reward: Amount,
    pub reward_token: Option<ContractAddress>,
    /// Unix timestamp in seconds.
    pub deadline: u64,
}

/// Validated parameters of the `create_bounty` entrypoint.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NewBounty {
    pub title: BountyTitle,
    pub description: String,
    pub reward: Amount,
    pub reward_token: ContractAddress,
    pub deadline: u64,
}

#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum FormError {
    #[error(transparent)]
    Title(#[from] TitleError),

    #[error("Description must not be empty")]
    EmptyDescription,

    #[error("Reward must be greater than zero")]
    ZeroReward,

    #[error("No reward token selected")]
    MissingRewardToken,

    #[error("Deadline {deadline} is not in the future")]
    DeadlineInPast { deadline: u64 },

    #[error("Deadline is too far in the future")]
    DeadlineOutOfRange,
}

impl BountyDraft {
    /// Check the form input. `now` is the current unix time in seconds.
    ///
    /// The title is checked first so that an overlong title is always reported as such.
    pub fn validate(self, now: u64) -> Result<NewBounty, FormError> {
        let title = BountyTitle::from_string(self.title)?;
        if self.description.trim().is_empty() {
            return Err(FormError::EmptyDescription);
        }
        if self.reward.is_zero() {
            return Err(FormError::ZeroReward);
        }
        let reward_token = self.reward_token.ok_or(FormError::MissingRewardToken)?;
        if self.deadline <= now {
            return Err(FormError::DeadlineInPast {
                deadline: self.deadline,
            });
        }
        Ok(NewBounty {
            title,
            description: self.description,
            reward: self.reward,
            reward_token,
            deadline: self.deadline,
        })
    }
}
