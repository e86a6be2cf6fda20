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

//! Cairo serialization of the values exchanged with the contracts.
//!
//! Contract calldata, getter results and event payloads are flat sequences of [Felt]s. [Encode]
//! appends the Cairo representation of a value to such a sequence and [Decode] reads it back
//! from an [Input].
//!
//! * `u64`, `bool` and addresses take one felt.
//! * [Amount] is a `u256`: low and high 128 bit halves.
//! * [String] is a Cairo `ByteArray`: the number of full 31 byte words, the words, the pending
//!   word and the number of bytes in the pending word.
//! * `Vec<T>` is the length followed by the elements.
use core::convert::TryInto as _;

use crate::{Amount, ApplicationId, BountyId, Felt, SubmissionId};

/// Number of bytes stored in one `ByteArray` word.
pub const BYTES_PER_WORD: usize = 31;

#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum DecodeError {
    #[error("unexpected end of input after {0} felts")]
    EndOfInput(usize),

    #[error("felt {value:#x} does not fit into {target}")]
    Overflow { value: Felt, target: &'static str },

    #[error("invalid short string: {0}")]
    ShortString(String),

    #[error("invalid byte array: {0}")]
    ByteArray(&'static str),

    #[error("unknown {kind} code {code}")]
    UnknownVariant { kind: &'static str, code: u64 },
}

/// Cursor over a felt sequence.
pub struct Input<'a> {
    felts: &'a [Felt],
    position: usize,
}

impl<'a> Input<'a> {
    pub fn new(felts: &'a [Felt]) -> Self {
        Input { felts, position: 0 }
    }

    /// Returns the next felt and advances the cursor.
    pub fn next_felt(&mut self) -> Result<Felt, DecodeError> {
        let felt = self
            .felts
            .get(self.position)
            .copied()
            .ok_or(DecodeError::EndOfInput(self.position))?;
        self.position += 1;
        Ok(felt)
    }

    pub fn remaining(&self) -> usize {
        self.felts.len().saturating_sub(self.position)
    }
}

pub trait Encode {
    fn encode_to(&self, out: &mut Vec<Felt>);

    fn encode(&self) -> Vec<Felt> {
        let mut out = Vec::new();
        self.encode_to(&mut out);
        out
    }
}

pub trait Decode: Sized {
    fn decode_from(input: &mut Input<'_>) -> Result<Self, DecodeError>;

    /// Decode a value from the start of `felts`. Trailing felts are ignored.
    fn decode(felts: &[Felt]) -> Result<Self, DecodeError> {
        Self::decode_from(&mut Input::new(felts))
    }
}

/// Returns the value of `felt` if it fits into a `u128`.
pub fn felt_to_u128(felt: &Felt) -> Option<u128> {
    let bytes = felt.to_bytes_be();
    if bytes[..16].iter().any(|byte| *byte != 0) {
        return None;
    }
    let low: [u8; 16] = bytes[16..].try_into().ok()?;
    Some(u128::from_be_bytes(low))
}

/// Returns the value of `felt` if it fits into a `u64`.
pub fn felt_to_u64(felt: &Felt) -> Option<u64> {
    felt_to_u128(felt).and_then(|value| value.try_into().ok())
}

impl Encode for Felt {
    fn encode_to(&self, out: &mut Vec<Felt>) {
        out.push(*self);
    }
}

impl Decode for Felt {
    fn decode_from(input: &mut Input<'_>) -> Result<Self, DecodeError> {
        input.next_felt()
    }
}

impl Encode for u64 {
    fn encode_to(&self, out: &mut Vec<Felt>) {
        out.push(Felt::from(*self));
    }
}

impl Decode for u64 {
    fn decode_from(input: &mut Input<'_>) -> Result<Self, DecodeError> {
        let value = input.next_felt()?;
        felt_to_u64(&value).ok_or(DecodeError::Overflow {
            value,
            target: "u64",
        })
    }
}

impl Encode for bool {
    fn encode_to(&self, out: &mut Vec<Felt>) {
        out.push(if *self { Felt::ONE } else { Felt::ZERO });
    }
}

impl Decode for bool {
    fn decode_from(input: &mut Input<'_>) -> Result<Self, DecodeError> {
        match u64::decode_from(input)? {
            0 => Ok(false),
            1 => Ok(true),
            code => Err(DecodeError::UnknownVariant { kind: "bool", code }),
        }
    }
}

impl Encode for Amount {
    fn encode_to(&self, out: &mut Vec<Felt>) {
        out.push(Felt::from(self.0));
        out.push(Felt::ZERO);
    }
}

impl Decode for Amount {
    fn decode_from(input: &mut Input<'_>) -> Result<Self, DecodeError> {
        let low = input.next_felt()?;
        let high = input.next_felt()?;
        if high != Felt::ZERO {
            return Err(DecodeError::Overflow {
                value: high,
                target: "u128 amount",
            });
        }
        felt_to_u128(&low)
            .map(Amount)
            .ok_or(DecodeError::Overflow {
                value: low,
                target: "u128 low word",
            })
    }
}

macro_rules! impl_id_codec {
    ($id:ident) => {
        impl Encode for $id {
            fn encode_to(&self, out: &mut Vec<Felt>) {
                self.0.encode_to(out)
            }
        }

        impl Decode for $id {
            fn decode_from(input: &mut Input<'_>) -> Result<Self, DecodeError> {
                u64::decode_from(input).map($id)
            }
        }
    };
}

impl_id_codec!(BountyId);
impl_id_codec!(ApplicationId);
impl_id_codec!(SubmissionId);

impl Encode for str {
    fn encode_to(&self, out: &mut Vec<Felt>) {
        let bytes = self.as_bytes();
        let mut words = bytes.chunks_exact(BYTES_PER_WORD);
        out.push(Felt::from((bytes.len() / BYTES_PER_WORD) as u64));
        for word in &mut words {
            out.push(felt_from_be_slice(word));
        }
        let pending = words.remainder();
        out.push(felt_from_be_slice(pending));
        out.push(Felt::from(pending.len() as u64));
    }
}

impl Encode for String {
    fn encode_to(&self, out: &mut Vec<Felt>) {
        self.as_str().encode_to(out)
    }
}

impl Decode for String {
    fn decode_from(input: &mut Input<'_>) -> Result<Self, DecodeError> {
        let word_count = u64::decode_from(input)?;
        if word_count as usize > input.remaining() {
            return Err(DecodeError::ByteArray("word count exceeds input"));
        }
        let mut bytes = Vec::with_capacity(word_count as usize * BYTES_PER_WORD);
        for _ in 0..word_count {
            let word = input.next_felt()?.to_bytes_be();
            if word[0] != 0 {
                return Err(DecodeError::ByteArray("word wider than 31 bytes"));
            }
            bytes.extend_from_slice(&word[1..]);
        }
        let pending_word = input.next_felt()?.to_bytes_be();
        let pending_len = u64::decode_from(input)? as usize;
        if pending_len >= BYTES_PER_WORD {
            return Err(DecodeError::ByteArray("pending word too long"));
        }
        let (padding, pending) = pending_word.split_at(32 - pending_len);
        if padding.iter().any(|byte| *byte != 0) {
            return Err(DecodeError::ByteArray("pending word wider than its length"));
        }
        bytes.extend_from_slice(pending);
        String::from_utf8(bytes).map_err(|_| DecodeError::ByteArray("invalid utf-8"))
    }
}

impl<T: Encode> Encode for Vec<T> {
    fn encode_to(&self, out: &mut Vec<Felt>) {
        out.push(Felt::from(self.len() as u64));
        for item in self {
            item.encode_to(out);
        }
    }
}

impl<T: Decode> Decode for Vec<T> {
    fn decode_from(input: &mut Input<'_>) -> Result<Self, DecodeError> {
        let len = u64::decode_from(input)? as usize;
        if len > input.remaining() {
            return Err(DecodeError::EndOfInput(len));
        }
        (0..len).map(|_| T::decode_from(input)).collect()
    }
}

/// Interpret up to 31 bytes as a big endian felt.
fn felt_from_be_slice(bytes: &[u8]) -> Felt {
    let mut buffer = [0u8; 32];
    buffer[32 - bytes.len()..].copy_from_slice(bytes);
    Felt::from_bytes_be(&buffer)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn byte_array_layout() {
        let text = "a".repeat(40);
        let encoded = text.encode();
        // one full word, the pending word and its length
        assert_eq!(encoded.len(), 4);
        assert_eq!(encoded[0], Felt::ONE);
        assert_eq!(encoded[3], Felt::from(9u64));
        assert_eq!(String::decode(&encoded).unwrap(), text);
    }

    #[test]
    fn byte_array_exact_word() {
        let text = "b".repeat(31);
        let encoded = text.encode();
        assert_eq!(encoded[0], Felt::ONE);
        assert_eq!(encoded[2], Felt::ZERO);
        assert_eq!(encoded[3], Felt::ZERO);
        assert_eq!(String::decode(&encoded).unwrap(), text);
    }

    #[test]
    fn byte_array_rejects_bad_pending_len() {
        let felts = vec![Felt::ZERO, Felt::from(0x6869u64), Felt::from(31u64)];
        assert!(String::decode(&felts).is_err());
    }

    #[test]
    fn amount_with_high_word_overflows() {
        let felts = vec![Felt::ONE, Felt::ONE];
        match Amount::decode(&felts) {
            Err(DecodeError::Overflow { .. }) => (),
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn u64_overflow() {
        let felts = vec![Felt::from(u128::from(u64::MAX) + 1)];
        assert!(u64::decode(&felts).is_err());
    }

    #[test]
    fn truncated_input() {
        let felts = vec![Felt::from(3u64), Felt::ONE];
        assert_eq!(
            Vec::<u64>::decode(&felts),
            Err(DecodeError::EndOfInput(3))
        );
    }

    #[test]
    fn unicode_text() {
        let text = String::from("ôítÏйгますいщαφδвы and some more text to span words");
        assert_eq!(String::decode(&text.encode()).unwrap(), text);
    }
}
