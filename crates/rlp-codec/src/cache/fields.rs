// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Struct field enumeration.

use std::sync::Arc;

use super::Resolver;
use crate::codec::CodecInfo;
use crate::error::{Error, Result};
use crate::types::{tags, Tags, TypeHandle};

/// A serialized struct field with its resolved codec.
#[derive(Debug, Clone)]
pub struct Field {
    /// Position among all declared fields, also the slot in `Value::Struct`.
    pub index: usize,
    pub name: &'static str,
    pub tags: Tags,
    pub info: Arc<CodecInfo>,
}

impl Resolver<'_> {
    /// Serialized fields of struct `ty`, in declaration order.
    ///
    /// Unexported and `-` fields are skipped. Every other field's
    /// `(type, tags)` is resolved through this resolver, so a field whose type
    /// is the struct being built gets the struct's placeholder.
    pub fn struct_fields(&mut self, ty: TypeHandle) -> Result<Vec<Field>> {
        let layout = ty
            .descriptor()
            .fields()
            .ok_or_else(|| Error::generation(ty, "not a struct type"))?;

        let mut fields = Vec::with_capacity(layout.len());
        for (index, field) in layout.iter().enumerate() {
            if !field.exported {
                continue;
            }
            let tags = tags::parse_field(ty, index)?;
            if tags.ignored {
                continue;
            }
            let info = self.resolve(field.ty, tags)?;
            fields.push(Field {
                index,
                name: field.name,
                tags,
                info,
            });
        }
        Ok(fields)
    }
}
