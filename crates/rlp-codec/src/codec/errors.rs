// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Errors raised while running generated codecs.

use super::EntryState;

/// Errors for decode operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    // ------------------------------------------------------------------
    // Framing
    // ------------------------------------------------------------------
    #[error("rlp: unexpected end of input")]
    Eof,
    /// Read past the end of the innermost open list.
    #[error("rlp: end of list")]
    EndOfList,
    #[error("rlp: expected input string or byte")]
    ExpectedString,
    #[error("rlp: expected input list")]
    ExpectedList,
    #[error("rlp: non-canonical size information")]
    CanonSize,
    #[error("rlp: non-canonical integer (leading zero bytes)")]
    CanonInt,
    #[error("rlp: element is larger than containing list")]
    ElemTooLarge,
    #[error("rlp: value size exceeds available input length")]
    ValueTooLarge,
    #[error("rlp: input contains more than one value")]
    MoreThanOneValue,
    #[error("rlp: list_end called before the end of the list")]
    NotAtEndOfList,
    #[error("rlp: list_end called outside of any list")]
    NotInList,
    #[error("rlp: lists nested deeper than {max}")]
    DepthExceeded { max: usize },

    // ------------------------------------------------------------------
    // Values
    // ------------------------------------------------------------------
    #[error("rlp: input string too long for uint{bits}")]
    UintOverflow { bits: u32 },
    #[error("rlp: invalid boolean value: {0}")]
    InvalidBool(u64),
    #[error("rlp: input string is not valid UTF-8")]
    InvalidUtf8,
    #[error("rlp: input string has {got} bytes, {ty} needs {want}")]
    ByteArrayLength {
        ty: &'static str,
        want: usize,
        got: usize,
    },
    #[error("rlp: input list has too few elements for {ty}")]
    TooFewElements { ty: &'static str },
    #[error("rlp: input list has too many elements for {ty}")]
    TooManyElements { ty: &'static str },

    // ------------------------------------------------------------------
    // Cache
    // ------------------------------------------------------------------
    /// A nested codec was used before (or after failing) generation.
    #[error("rlp: codec for {ty} is not ready ({state:?})")]
    CodecUnavailable { ty: &'static str, state: EntryState },

    #[error("{source}, decoding {owner}.{field}")]
    InField {
        owner: &'static str,
        field: &'static str,
        source: Box<DecodeError>,
    },
}

impl DecodeError {
    /// Attach the struct field being decoded.
    #[must_use]
    pub fn in_field(self, owner: &'static str, field: &'static str) -> Self {
        Self::InField {
            owner,
            field,
            source: Box::new(self),
        }
    }

    /// Innermost error, with field context stripped.
    pub fn root(&self) -> &DecodeError {
        match self {
            Self::InField { source, .. } => source.root(),
            other => other,
        }
    }
}

/// Errors for encode operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncodeError {
    #[error("rlp: cannot encode {found} value as {ty}")]
    TypeMismatch {
        ty: &'static str,
        found: &'static str,
    },
    #[error("rlp: {ty} takes exactly {want} elements, got {got}")]
    ArrayLength {
        ty: &'static str,
        want: usize,
        got: usize,
    },
    #[error("rlp: value {value} overflows {ty}")]
    UintOverflow { ty: &'static str, value: u64 },
    #[error("rlp: struct value for {ty} has no slot for field {field}")]
    MissingField {
        ty: &'static str,
        field: &'static str,
    },
    #[error("rlp: raw value is not a single RLP item")]
    InvalidRaw,
    #[error("rlp: codec for {ty} is not ready ({state:?})")]
    CodecUnavailable { ty: &'static str, state: EntryState },

    #[error("{source}, encoding {owner}.{field}")]
    InField {
        owner: &'static str,
        field: &'static str,
        source: Box<EncodeError>,
    },
}

impl EncodeError {
    #[must_use]
    pub fn in_field(self, owner: &'static str, field: &'static str) -> Self {
        Self::InField {
            owner,
            field,
            source: Box::new(self),
        }
    }

    pub fn root(&self) -> &EncodeError {
        match self {
            Self::InField { source, .. } => source.root(),
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_context_display() {
        let err = DecodeError::CanonInt
            .in_field("Inner", "Value")
            .in_field("Outer", "Inner");
        assert_eq!(
            err.to_string(),
            "rlp: non-canonical integer (leading zero bytes), decoding Inner.Value, decoding Outer.Inner"
        );
        assert_eq!(err.root(), &DecodeError::CanonInt);
    }

    #[test]
    fn test_encode_root() {
        let err = EncodeError::InvalidRaw.in_field("Envelope", "Payload");
        assert_eq!(err.root(), &EncodeError::InvalidRaw);
        assert_eq!(
            err.to_string(),
            "rlp: raw value is not a single RLP item, encoding Envelope.Payload"
        );
    }
}
