// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Crate-level error type.
//!
//! Tag and generation errors come out of [`CodecCache::resolve`]; decode and
//! encode errors come out of running a finished codec.
//!
//! [`CodecCache::resolve`]: crate::CodecCache::resolve

use crate::codec::{DecodeError, EncodeError};
use crate::types::TypeHandle;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    // ========================================================================
    // Tag errors (fatal to the enclosing type's generation)
    // ========================================================================
    /// Unrecognized tag token.
    #[error("rlp: unknown struct tag {token:?} on {owner}.{field}")]
    TagSyntax {
        owner: &'static str,
        field: &'static str,
        token: String,
    },
    /// `tail` on a field that is not the last one.
    #[error(r#"rlp: invalid struct tag "tail" for {owner}.{field} (must be on last field)"#)]
    TagPosition {
        owner: &'static str,
        field: &'static str,
    },
    /// `tail` on a last field whose type is not a sequence.
    #[error(r#"rlp: invalid struct tag "tail" for {owner}.{field} (field type is not a sequence)"#)]
    TagType {
        owner: &'static str,
        field: &'static str,
    },

    // ========================================================================
    // Generation errors
    // ========================================================================
    /// The codec generator could not produce a codec for this type.
    #[error("rlp: cannot generate codec for {ty}: {reason}")]
    Generation { ty: &'static str, reason: String },

    // ========================================================================
    // Wire errors
    // ========================================================================
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Encode(#[from] EncodeError),
}

impl Error {
    pub fn generation(ty: TypeHandle, reason: impl Into<String>) -> Self {
        Self::Generation {
            ty: ty.name(),
            reason: reason.into(),
        }
    }

    /// Type kinds the wire format has no representation for.
    pub fn unsupported(ty: TypeHandle) -> Self {
        Self::generation(
            ty,
            format!("{} type is not RLP-serializable", ty.kind().name()),
        )
    }

    /// True for the three struct tag violations.
    pub fn is_tag_error(&self) -> bool {
        matches!(
            self,
            Self::TagSyntax { .. } | Self::TagPosition { .. } | Self::TagType { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
