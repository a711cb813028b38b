// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Dynamic value model.

use crate::config::EMPTY_STRING;
use crate::types::{TypeDescriptor, TypeKind};

/// A dynamic value that can hold any serializable type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Value {
    /// Null pointer, or the value of a kind with no representation.
    #[default]
    Null,
    Bool(bool),
    Uint(u64),
    String(String),
    /// Byte string, also used for fixed-length byte arrays.
    Bytes(Vec<u8>),
    /// Pre-encoded RLP item.
    Raw(Vec<u8>),
    /// Sequence or array elements.
    List(Vec<Value>),
    /// Struct fields, one slot per declared field in declaration order.
    Struct(Vec<Value>),
}

impl Value {
    /// Zero value of a type.
    ///
    /// Pointers are null, byte arrays are zero-filled, structs carry the zero
    /// value of every declared field.
    pub fn zero(ty: &TypeDescriptor) -> Value {
        match ty.kind {
            TypeKind::Bool => Self::Bool(false),
            TypeKind::Uint { .. } => Self::Uint(0),
            TypeKind::Int { .. } | TypeKind::Float { .. } | TypeKind::Pointer(_) => Self::Null,
            TypeKind::String => Self::String(String::new()),
            TypeKind::Bytes => Self::Bytes(Vec::new()),
            TypeKind::ByteArray { len } => Self::Bytes(vec![0; len]),
            TypeKind::Raw => Self::Raw(vec![EMPTY_STRING]),
            TypeKind::Sequence(_) => Self::List(Vec::new()),
            TypeKind::Array { elem, len } => Self::List(vec![Self::zero(elem); len]),
            TypeKind::Struct(fields) => {
                Self::Struct(fields.iter().map(|f| Self::zero(f.ty)).collect())
            }
        }
    }

    /// Short name of the variant, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Uint(_) => "uint",
            Self::String(_) => "string",
            Self::Bytes(_) => "bytes",
            Self::Raw(_) => "raw",
            Self::List(_) => "list",
            Self::Struct(_) => "struct",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_uint(&self) -> Option<u64> {
        match self {
            Self::Uint(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }

    /// Byte payload of a `Bytes` or `Raw` value.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(v) | Self::Raw(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(v) => Some(v),
            _ => None,
        }
    }

    /// Field slot of a struct value.
    pub fn field(&self, index: usize) -> Option<&Value> {
        match self {
            Self::Struct(fields) => fields.get(index),
            _ => None,
        }
    }

    /// Struct field by declared name.
    pub fn field_by_name(&self, ty: &TypeDescriptor, name: &str) -> Option<&Value> {
        let index = ty.fields()?.iter().position(|f| f.name == name)?;
        self.field(index)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<u8> for Value {
    fn from(v: u8) -> Self {
        Self::Uint(u64::from(v))
    }
}

impl From<u16> for Value {
    fn from(v: u16) -> Self {
        Self::Uint(u64::from(v))
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Self::Uint(u64::from(v))
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Self::Uint(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_owned())
    }
}

impl From<&[u8]> for Value {
    fn from(v: &[u8]) -> Self {
        Self::Bytes(v.to_vec())
    }
}

impl<const N: usize> From<[u8; N]> for Value {
    fn from(v: [u8; N]) -> Self {
        Self::Bytes(v.to_vec())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Self::List(v.into_iter().map(Into::into).collect())
    }
}
