// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Codec generation.
//!
//! A [`CodecGenerator`] turns one `(type, tags)` pair into a [`Codec`]. It is
//! called by the cache with the cache's build lock held; nested types must be
//! resolved through the [`Resolver`] it is handed, never through
//! [`CodecCache::resolve`](crate::CodecCache::resolve), which would deadlock.

use std::sync::Arc;

use super::{Codec, CodecInfo, DecodeError, EncBuffer, EncodeError, Kind, Stream, Value};
use crate::cache::{Field, Resolver};
use crate::config::{EMPTY_LIST, EMPTY_STRING};
use crate::error::{Error, Result};
use crate::types::{Tags, TypeHandle, TypeKind};

/// Produces codecs for the cache.
pub trait CodecGenerator: Send + Sync {
    /// Generate the codec of `ty` used under `tags`.
    ///
    /// When this runs, a placeholder for `(ty, tags)` is already installed, so
    /// resolving the same key again through `resolver` returns it instead of
    /// recursing.
    fn generate(&self, ty: TypeHandle, tags: Tags, resolver: &mut Resolver<'_>) -> Result<Codec>;
}

/// Default generator for the RLP wire format.
#[derive(Debug, Clone, Copy, Default)]
pub struct RlpGenerator;

impl CodecGenerator for RlpGenerator {
    fn generate(&self, ty: TypeHandle, tags: Tags, resolver: &mut Resolver<'_>) -> Result<Codec> {
        match ty.kind() {
            TypeKind::Bool => Ok(bool_codec(ty.name())),
            TypeKind::Uint { bits } => uint_codec(ty, bits),
            TypeKind::Int { .. } | TypeKind::Float { .. } => Err(Error::unsupported(ty)),
            TypeKind::String => Ok(string_codec(ty.name())),
            TypeKind::Bytes => Ok(bytes_codec(ty.name())),
            TypeKind::ByteArray { len } => Ok(byte_array_codec(ty.name(), len)),
            TypeKind::Raw => Ok(raw_codec(ty.name())),
            TypeKind::Sequence(elem) => {
                let elem = resolver.resolve(TypeHandle::of(elem), Tags::NONE)?;
                Ok(sequence_codec(ty.name(), elem, tags.tail))
            }
            TypeKind::Array { elem, len } => {
                let elem = resolver.resolve(TypeHandle::of(elem), Tags::NONE)?;
                Ok(array_codec(ty.name(), elem, len))
            }
            TypeKind::Pointer(elem) => {
                let nil_encoding = nil_encoding(&elem.kind);
                let elem = resolver.resolve(TypeHandle::of(elem), Tags::NONE)?;
                Ok(pointer_codec(elem, nil_encoding, tags.nil_ok))
            }
            TypeKind::Struct(layout) => {
                let fields = resolver.struct_fields(ty)?;
                let zero = layout.iter().map(|f| Value::zero(f.ty)).collect();
                Ok(struct_codec(ty.name(), fields, zero))
            }
        }
    }
}

fn mismatch(ty: &'static str, found: &Value) -> EncodeError {
    EncodeError::TypeMismatch {
        ty,
        found: found.kind_name(),
    }
}

// ============================================================================
// Scalars
// ============================================================================

fn bool_codec(name: &'static str) -> Codec {
    Codec::new(
        |s: &mut Stream<'_>| s.bool().map(Value::Bool),
        move |v: &Value, out: &mut EncBuffer| match v {
            Value::Bool(b) => {
                out.write_bool(*b);
                Ok(())
            }
            other => Err(mismatch(name, other)),
        },
    )
}

fn uint_codec(ty: TypeHandle, bits: u32) -> Result<Codec> {
    if !matches!(bits, 8 | 16 | 32 | 64) {
        return Err(Error::generation(ty, format!("unsupported integer width {bits}")));
    }
    let name = ty.name();
    let max = u64::MAX >> (64 - bits);
    Ok(Codec::new(
        move |s: &mut Stream<'_>| s.uint(bits).map(Value::Uint),
        move |v: &Value, out: &mut EncBuffer| match v {
            Value::Uint(n) if *n > max => Err(EncodeError::UintOverflow { ty: name, value: *n }),
            Value::Uint(n) => {
                out.write_uint(*n);
                Ok(())
            }
            other => Err(mismatch(name, other)),
        },
    ))
}

fn string_codec(name: &'static str) -> Codec {
    Codec::new(
        |s: &mut Stream<'_>| {
            let bytes = s.bytes()?;
            let text = std::str::from_utf8(bytes).map_err(|_| DecodeError::InvalidUtf8)?;
            Ok(Value::String(text.to_owned()))
        },
        move |v: &Value, out: &mut EncBuffer| match v {
            Value::String(text) => {
                out.write_bytes(text.as_bytes());
                Ok(())
            }
            other => Err(mismatch(name, other)),
        },
    )
}

fn bytes_codec(name: &'static str) -> Codec {
    Codec::new(
        |s: &mut Stream<'_>| s.bytes().map(|b| Value::Bytes(b.to_vec())),
        move |v: &Value, out: &mut EncBuffer| match v {
            Value::Bytes(bytes) => {
                out.write_bytes(bytes);
                Ok(())
            }
            other => Err(mismatch(name, other)),
        },
    )
}

fn byte_array_codec(name: &'static str, len: usize) -> Codec {
    Codec::new(
        move |s: &mut Stream<'_>| {
            let bytes = s.bytes()?;
            if bytes.len() != len {
                return Err(DecodeError::ByteArrayLength {
                    ty: name,
                    want: len,
                    got: bytes.len(),
                });
            }
            Ok(Value::Bytes(bytes.to_vec()))
        },
        move |v: &Value, out: &mut EncBuffer| match v {
            Value::Bytes(bytes) if bytes.len() != len => Err(EncodeError::ArrayLength {
                ty: name,
                want: len,
                got: bytes.len(),
            }),
            Value::Bytes(bytes) => {
                out.write_bytes(bytes);
                Ok(())
            }
            other => Err(mismatch(name, other)),
        },
    )
}

fn raw_codec(name: &'static str) -> Codec {
    Codec::new(
        |s: &mut Stream<'_>| s.raw().map(|b| Value::Raw(b.to_vec())),
        move |v: &Value, out: &mut EncBuffer| match v {
            Value::Raw(encoded) => {
                let mut check = Stream::new(encoded);
                if check.skip().is_err() || !check.is_finished() {
                    return Err(EncodeError::InvalidRaw);
                }
                out.write_raw(encoded);
                Ok(())
            }
            other => Err(mismatch(name, other)),
        },
    )
}

// ============================================================================
// Collections
// ============================================================================

fn sequence_codec(name: &'static str, elem: Arc<CodecInfo>, tail: bool) -> Codec {
    let write_elem = Arc::clone(&elem);
    Codec::new(
        move |s: &mut Stream<'_>| {
            // A tail sequence reads the rest of the enclosing struct's list.
            if !tail {
                s.list()?;
            }
            let mut items = Vec::new();
            while !s.at_list_end() {
                items.push(elem.decode(s)?);
            }
            if !tail {
                s.list_end()?;
            }
            Ok(Value::List(items))
        },
        move |v: &Value, out: &mut EncBuffer| {
            let Value::List(items) = v else {
                return Err(mismatch(name, v));
            };
            let start = (!tail).then(|| out.list_start());
            for item in items {
                write_elem.write(item, out)?;
            }
            if let Some(start) = start {
                out.list_end(start);
            }
            Ok(())
        },
    )
}

fn array_codec(name: &'static str, elem: Arc<CodecInfo>, len: usize) -> Codec {
    let write_elem = Arc::clone(&elem);
    Codec::new(
        move |s: &mut Stream<'_>| {
            s.list()?;
            let mut items = Vec::with_capacity(len);
            for _ in 0..len {
                if s.at_list_end() {
                    return Err(DecodeError::TooFewElements { ty: name });
                }
                items.push(elem.decode(s)?);
            }
            s.list_end().map_err(|e| match e {
                DecodeError::NotAtEndOfList => DecodeError::TooManyElements { ty: name },
                other => other,
            })?;
            Ok(Value::List(items))
        },
        move |v: &Value, out: &mut EncBuffer| {
            let Value::List(items) = v else {
                return Err(mismatch(name, v));
            };
            if items.len() != len {
                return Err(EncodeError::ArrayLength {
                    ty: name,
                    want: len,
                    got: items.len(),
                });
            }
            let start = out.list_start();
            for item in items {
                write_elem.write(item, out)?;
            }
            out.list_end(start);
            Ok(())
        },
    )
}

// ============================================================================
// Pointers
// ============================================================================

/// How a null pointer to `kind` is written.
#[derive(Clone, Copy)]
enum NilEncoding {
    String,
    List,
    /// Pointer to pointer: ask the element.
    Delegate,
}

fn nil_encoding(kind: &TypeKind) -> NilEncoding {
    match kind {
        TypeKind::Pointer(_) => NilEncoding::Delegate,
        k if k.is_list_like() => NilEncoding::List,
        _ => NilEncoding::String,
    }
}

fn pointer_codec(elem: Arc<CodecInfo>, nil: NilEncoding, nil_ok: bool) -> Codec {
    let write_elem = Arc::clone(&elem);
    Codec::new(
        move |s: &mut Stream<'_>| {
            if nil_ok {
                match s.kind()? {
                    (Kind::String, 0) => {
                        s.bytes()?;
                        return Ok(Value::Null);
                    }
                    (Kind::List, 0) => {
                        s.list()?;
                        s.list_end()?;
                        return Ok(Value::Null);
                    }
                    _ => {}
                }
            }
            elem.decode(s)
        },
        move |v: &Value, out: &mut EncBuffer| match (v, nil) {
            (Value::Null, NilEncoding::String) => {
                out.write_raw(&[EMPTY_STRING]);
                Ok(())
            }
            (Value::Null, NilEncoding::List) => {
                out.write_raw(&[EMPTY_LIST]);
                Ok(())
            }
            _ => write_elem.write(v, out),
        },
    )
}

// ============================================================================
// Structs
// ============================================================================

fn struct_codec(name: &'static str, fields: Vec<Field>, zero: Vec<Value>) -> Codec {
    let fields: Arc<[Field]> = fields.into();
    let write_fields = Arc::clone(&fields);
    Codec::new(
        move |s: &mut Stream<'_>| {
            s.list()?;
            let mut slots = zero.clone();
            for field in fields.iter() {
                match field.info.decode(s) {
                    Ok(value) => slots[field.index] = value,
                    Err(DecodeError::EndOfList) => {
                        return Err(DecodeError::TooFewElements { ty: name })
                    }
                    Err(e) => return Err(e.in_field(name, field.name)),
                }
            }
            s.list_end().map_err(|e| match e {
                DecodeError::NotAtEndOfList => DecodeError::TooManyElements { ty: name },
                other => other,
            })?;
            Ok(Value::Struct(slots))
        },
        move |v: &Value, out: &mut EncBuffer| {
            let Value::Struct(slots) = v else {
                return Err(mismatch(name, v));
            };
            let start = out.list_start();
            for field in write_fields.iter() {
                let slot = slots.get(field.index).ok_or(EncodeError::MissingField {
                    ty: name,
                    field: field.name,
                })?;
                field
                    .info
                    .write(slot, out)
                    .map_err(|e| e.in_field(name, field.name))?;
            }
            out.list_end(start);
            Ok(())
        },
    )
}
