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

/// `BountyTitle` type, and its validation tests.
use core::convert::TryFrom;

use starknet_core::utils::{
    cairo_short_string_to_felt, parse_cairo_short_string, CairoShortStringToFeltError,
};

use crate::cairo::{Decode, DecodeError, Encode, Input};
use crate::Felt;

/// Maximum length of a Cairo short string in bytes.
pub const MAX_TITLE_LEN: usize = 31;

/// A bounty title. The contract stores it as a single felt, so it is limited to 31 ASCII
/// characters.
///
/// ```rust
/// # use bountyhub_core::BountyTitle;
/// assert!(BountyTitle::from_string("Fix the indexer".to_string()).is_ok());
/// let long_title = "this title has more than 31 chars".to_string();
/// assert!(BountyTitle::from_string(long_title).is_err());
/// ```
#[derive(Clone, Debug, Eq, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BountyTitle {
    text: String,
    felt: Felt,
}

#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum TitleError {
    #[error("Title must not be empty")]
    Empty,

    #[error("Title is too long: {len} characters, at most {} are allowed", MAX_TITLE_LEN)]
    TooLong { len: usize },

    #[error("Title must only contain ASCII characters")]
    NotAscii,
}

impl BountyTitle {
    pub fn from_string(text: String) -> Result<Self, TitleError> {
        if text.trim().is_empty() {
            return Err(TitleError::Empty);
        }
        if text.chars().count() > MAX_TITLE_LEN {
            return Err(TitleError::TooLong {
                len: text.chars().count(),
            });
        }
        let felt = cairo_short_string_to_felt(&text).map_err(|error| match error {
            CairoShortStringToFeltError::NonAsciiCharacter => TitleError::NotAscii,
            _ => TitleError::TooLong { len: text.len() },
        })?;
        Ok(BountyTitle { text, felt })
    }

    /// Decode a title from its short string felt.
    pub fn from_felt(felt: Felt) -> Result<Self, TitleError> {
        let text = parse_cairo_short_string(&felt).map_err(|_| TitleError::NotAscii)?;
        Self::from_string(text)
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn to_felt(&self) -> Felt {
        self.felt
    }
}

impl From<BountyTitle> for String {
    fn from(title: BountyTitle) -> String {
        title.text
    }
}

impl TryFrom<String> for BountyTitle {
    type Error = TitleError;

    fn try_from(text: String) -> Result<Self, Self::Error> {
        Self::from_string(text)
    }
}

impl core::str::FromStr for BountyTitle {
    type Err = TitleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_string(s.to_string())
    }
}

impl core::fmt::Display for BountyTitle {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "{}", self.text)
    }
}

impl Encode for BountyTitle {
    fn encode_to(&self, out: &mut Vec<Felt>) {
        out.push(self.felt)
    }
}

impl Decode for BountyTitle {
    fn decode_from(input: &mut Input<'_>) -> Result<Self, DecodeError> {
        let felt = input.next_felt()?;
        Self::from_felt(felt).map_err(|error| DecodeError::ShortString(error.to_string()))
    }
}
