// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type descriptors for codec generation.
//!
//! Descriptors are declared once as `static` items and referenced by address.
//! Statics may point at each other, which is how self-referential types
//! (`Node { next: *Node }`) are written down:
//!
//! ```rust
//! use rlp_codec::types::{builtin, FieldLayout, TypeDescriptor, TypeKind};
//!
//! static NODE_FIELDS: [FieldLayout; 2] = [
//!     FieldLayout::new("value", &builtin::U64),
//!     FieldLayout::new("next", &NODE_PTR).tagged("nil"),
//! ];
//! static NODE: TypeDescriptor = TypeDescriptor::new("Node", TypeKind::Struct(&NODE_FIELDS));
//! static NODE_PTR: TypeDescriptor = TypeDescriptor::new("*Node", TypeKind::Pointer(&NODE));
//!
//! assert_eq!(NODE.fields().map(<[_]>::len), Some(2));
//! ```

use std::fmt;
use std::hash::{Hash, Hasher};
use std::ptr;

/// Structural kind of a described type.
///
/// References to other descriptors are `&'static` so a type graph can be
/// cyclic without any allocation.
#[derive(Clone, Copy)]
pub enum TypeKind {
    Bool,
    /// Unsigned integer of the given width in bits.
    Uint {
        bits: u32,
    },
    /// Signed integer. Describable, but not serializable by RLP.
    Int {
        bits: u32,
    },
    /// Floating point. Describable, but not serializable by RLP.
    Float {
        bits: u32,
    },
    /// UTF-8 text, encoded as an RLP string.
    String,
    /// Variable-length byte string.
    Bytes,
    /// Fixed-length byte string.
    ByteArray {
        len: usize,
    },
    /// Pre-encoded RLP item, copied verbatim.
    Raw,
    /// Variable-length ordered collection.
    Sequence(&'static TypeDescriptor),
    /// Fixed-length ordered collection.
    Array {
        elem: &'static TypeDescriptor,
        len: usize,
    },
    /// Optional indirection to another type.
    Pointer(&'static TypeDescriptor),
    /// Struct with fields in declaration order.
    Struct(&'static [FieldLayout]),
}

impl TypeKind {
    /// Short name of the kind, used in error messages.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Uint { .. } => "uint",
            Self::Int { .. } => "int",
            Self::Float { .. } => "float",
            Self::String => "string",
            Self::Bytes => "bytes",
            Self::ByteArray { .. } => "byte array",
            Self::Raw => "raw",
            Self::Sequence(_) => "sequence",
            Self::Array { .. } => "array",
            Self::Pointer(_) => "pointer",
            Self::Struct(_) => "struct",
        }
    }

    /// Check if this is a variable-length sequence.
    pub fn is_sequence(&self) -> bool {
        matches!(self, Self::Sequence(_))
    }

    /// Variable-length kinds: sequences and byte strings.
    pub fn is_slice(&self) -> bool {
        matches!(self, Self::Sequence(_) | Self::Bytes)
    }

    /// Kinds whose values are RLP lists.
    pub fn is_list_like(&self) -> bool {
        matches!(self, Self::Sequence(_) | Self::Array { .. } | Self::Struct(_))
    }
}

// Derived Debug would recurse forever on cyclic graphs; print names only.
impl fmt::Debug for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uint { bits } => write!(f, "Uint({bits})"),
            Self::Int { bits } => write!(f, "Int({bits})"),
            Self::Float { bits } => write!(f, "Float({bits})"),
            Self::ByteArray { len } => write!(f, "ByteArray({len})"),
            Self::Sequence(elem) => write!(f, "Sequence({})", elem.name),
            Self::Array { elem, len } => write!(f, "Array({}, {len})", elem.name),
            Self::Pointer(elem) => write!(f, "Pointer({})", elem.name),
            Self::Struct(fields) => {
                f.debug_list()
                    .entries(fields.iter().map(|field| field.name))
                    .finish()
            }
            other => f.write_str(other.name()),
        }
    }
}

/// Layout of a single struct field.
#[derive(Clone, Copy)]
pub struct FieldLayout {
    pub name: &'static str,
    pub ty: &'static TypeDescriptor,
    /// Raw serialization tag, e.g. `"nil"`, `"tail"`, `"-"`.
    pub tag: &'static str,
    /// Unexported fields are never serialized.
    pub exported: bool,
}

impl FieldLayout {
    pub const fn new(name: &'static str, ty: &'static TypeDescriptor) -> Self {
        Self {
            name,
            ty,
            tag: "",
            exported: true,
        }
    }

    /// Attach a serialization tag.
    pub const fn tagged(mut self, tag: &'static str) -> Self {
        self.tag = tag;
        self
    }

    /// Mark the field as not externally visible.
    pub const fn private(mut self) -> Self {
        self.exported = false;
        self
    }
}

impl fmt::Debug for FieldLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldLayout")
            .field("name", &self.name)
            .field("ty", &self.ty.name)
            .field("tag", &self.tag)
            .field("exported", &self.exported)
            .finish()
    }
}

/// Static description of a type.
///
/// Declare descriptors as `static` items, never `const`: a descriptor's
/// identity is its address, and every use of a `const` is a fresh copy.
#[derive(Debug)]
pub struct TypeDescriptor {
    pub name: &'static str,
    pub kind: TypeKind,
}

impl TypeDescriptor {
    pub const fn new(name: &'static str, kind: TypeKind) -> Self {
        Self { name, kind }
    }

    /// Promote a runtime-built descriptor to `'static`.
    ///
    /// The memory is never reclaimed; use for types created once per process.
    pub fn leak(self) -> &'static TypeDescriptor {
        Box::leak(Box::new(self))
    }

    /// Get fields if this is a struct.
    pub fn fields(&self) -> Option<&'static [FieldLayout]> {
        match self.kind {
            TypeKind::Struct(fields) => Some(fields),
            _ => None,
        }
    }

    /// Get field by name.
    pub fn field(&self, name: &str) -> Option<&'static FieldLayout> {
        self.fields()?.iter().find(|f| f.name == name)
    }
}

/// Identity handle for a [`TypeDescriptor`].
///
/// Equality and hashing use the descriptor's address, never its structure:
/// two descriptors with identical shape are still different types.
#[derive(Clone, Copy)]
pub struct TypeHandle(&'static TypeDescriptor);

impl TypeHandle {
    pub const fn of(descriptor: &'static TypeDescriptor) -> Self {
        Self(descriptor)
    }

    pub fn descriptor(self) -> &'static TypeDescriptor {
        self.0
    }

    pub fn name(self) -> &'static str {
        self.0.name
    }

    pub fn kind(self) -> TypeKind {
        self.0.kind
    }
}

impl From<&'static TypeDescriptor> for TypeHandle {
    fn from(descriptor: &'static TypeDescriptor) -> Self {
        Self(descriptor)
    }
}

impl PartialEq for TypeHandle {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.0, other.0)
    }
}

impl Eq for TypeHandle {}

impl Hash for TypeHandle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        ptr::from_ref(self.0).hash(state);
    }
}

impl fmt::Debug for TypeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.name)
    }
}

impl fmt::Display for TypeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.name)
    }
}
