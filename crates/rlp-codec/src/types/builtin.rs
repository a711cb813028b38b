// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Descriptors for the primitive types, shared by every user-declared type.

use super::{TypeDescriptor, TypeKind};

pub static BOOL: TypeDescriptor = TypeDescriptor::new("bool", TypeKind::Bool);
pub static U8: TypeDescriptor = TypeDescriptor::new("uint8", TypeKind::Uint { bits: 8 });
pub static U16: TypeDescriptor = TypeDescriptor::new("uint16", TypeKind::Uint { bits: 16 });
pub static U32: TypeDescriptor = TypeDescriptor::new("uint32", TypeKind::Uint { bits: 32 });
pub static U64: TypeDescriptor = TypeDescriptor::new("uint64", TypeKind::Uint { bits: 64 });
pub static I32: TypeDescriptor = TypeDescriptor::new("int32", TypeKind::Int { bits: 32 });
pub static I64: TypeDescriptor = TypeDescriptor::new("int64", TypeKind::Int { bits: 64 });
pub static F64: TypeDescriptor = TypeDescriptor::new("float64", TypeKind::Float { bits: 64 });
pub static STRING: TypeDescriptor = TypeDescriptor::new("string", TypeKind::String);
pub static BYTES: TypeDescriptor = TypeDescriptor::new("[]byte", TypeKind::Bytes);
pub static HASH: TypeDescriptor = TypeDescriptor::new("[32]byte", TypeKind::ByteArray { len: 32 });
pub static ADDRESS: TypeDescriptor =
    TypeDescriptor::new("[20]byte", TypeKind::ByteArray { len: 20 });
pub static RAW: TypeDescriptor = TypeDescriptor::new("RawValue", TypeKind::Raw);

pub static U64_SEQ: TypeDescriptor = TypeDescriptor::new("[]uint64", TypeKind::Sequence(&U64));
pub static STRING_SEQ: TypeDescriptor =
    TypeDescriptor::new("[]string", TypeKind::Sequence(&STRING));
pub static BYTES_SEQ: TypeDescriptor = TypeDescriptor::new("[][]byte", TypeKind::Sequence(&BYTES));
