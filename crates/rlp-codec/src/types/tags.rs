// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Struct field tags.
//!
//! A tag is a comma-separated token list attached to a field:
//!
//! | token  | effect |
//! |--------|--------|
//! | `-`    | field is not serialized |
//! | `nil`  | empty input decodes to a null pointer |
//! | `tail` | last field swallows the remaining list elements |

use super::{TypeHandle, TypeKind};
use crate::error::{Error, Result};

/// Parsed serialization modifiers of one field.
///
/// Part of the cache key: the same type with different tags gets its own
/// codec.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Tags {
    /// Empty input decodes to a null pointer instead of failing.
    pub nil_ok: bool,
    /// Field takes all remaining list elements instead of exactly one.
    pub tail: bool,
    /// Field is excluded from serialization.
    pub ignored: bool,
}

impl Tags {
    pub const NONE: Tags = Tags {
        nil_ok: false,
        tail: false,
        ignored: false,
    };

    pub const NIL_OK: Tags = Tags {
        nil_ok: true,
        tail: false,
        ignored: false,
    };

    pub const TAIL: Tags = Tags {
        nil_ok: false,
        tail: true,
        ignored: false,
    };
}

/// Tag violation, before the owning type and field are attached.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TagError {
    #[error("unknown struct tag {0:?}")]
    Syntax(String),
    #[error(r#"invalid struct tag "tail" (must be on last field)"#)]
    Position,
    #[error(r#"invalid struct tag "tail" (field type is not a sequence)"#)]
    NotSequence,
}

impl TagError {
    /// Attach the owning type and field name.
    pub fn at(self, owner: TypeHandle, field: &'static str) -> Error {
        let owner = owner.name();
        match self {
            Self::Syntax(token) => Error::TagSyntax {
                owner,
                field,
                token,
            },
            Self::Position => Error::TagPosition { owner, field },
            Self::NotSequence => Error::TagType { owner, field },
        }
    }
}

/// Parse a raw tag string for the field at `field_index` of `field_count`.
///
/// `tail` checks position before the field kind, so a misplaced `tail` on a
/// non-sequence reports [`TagError::Position`]. Byte strings accept `tail`
/// and keep their usual encoding.
pub fn parse(
    raw: &str,
    field_index: usize,
    field_count: usize,
    field_kind: &TypeKind,
) -> std::result::Result<Tags, TagError> {
    let mut tags = Tags::NONE;
    for token in raw.split(',') {
        match token.trim() {
            "" => {}
            "-" => tags.ignored = true,
            "nil" => tags.nil_ok = true,
            "tail" => {
                tags.tail = true;
                if field_index + 1 != field_count {
                    return Err(TagError::Position);
                }
                if !field_kind.is_slice() {
                    return Err(TagError::NotSequence);
                }
            }
            other => return Err(TagError::Syntax(other.to_owned())),
        }
    }
    Ok(tags)
}

/// Parse the tag of field `field_index` declared on struct `owner`.
///
/// Position is counted over all declared fields, exported or not.
pub fn parse_field(owner: TypeHandle, field_index: usize) -> Result<Tags> {
    let fields = owner
        .descriptor()
        .fields()
        .ok_or_else(|| Error::generation(owner, "tags are only defined on struct fields"))?;
    let field = fields
        .get(field_index)
        .ok_or_else(|| Error::generation(owner, format!("no field at index {field_index}")))?;

    parse(field.tag, field_index, fields.len(), &field.ty.kind).map_err(|e| e.at(owner, field.name))
}
