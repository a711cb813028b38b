// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Cache key: a type together with the tags it is used under.

use super::{Tags, TypeHandle};
use std::fmt;

/// Identifies a codec uniquely.
///
/// The tags are part of the key because they change the generated codec:
/// `*T` with `nil` decodes empty input differently from plain `*T`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeKey {
    pub ty: TypeHandle,
    pub tags: Tags,
}

impl TypeKey {
    pub fn new(ty: impl Into<TypeHandle>, tags: Tags) -> Self {
        Self {
            ty: ty.into(),
            tags,
        }
    }
}

impl fmt::Debug for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.ty)?;
        if self.tags != Tags::NONE {
            let mut sep = " [";
            for (set, token) in [
                (self.tags.ignored, "-"),
                (self.tags.nil_ok, "nil"),
                (self.tags.tail, "tail"),
            ] {
                if set {
                    write!(f, "{sep}{token}")?;
                    sep = ",";
                }
            }
            f.write_str("]")?;
        }
        Ok(())
    }
}
