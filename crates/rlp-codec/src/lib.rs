// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # rlp-codec - type-directed RLP codecs
//!
//! Encodes and decodes RLP (Recursive Length Prefix) values according to a
//! static type description. The codec for each `(type, tags)` pair is
//! generated once and memoized in a concurrent cache, so repeated encode and
//! decode calls never re-derive field layout or tag semantics.
//!
//! ## Quick Start
//!
//! ```rust
//! use rlp_codec::types::{builtin, FieldLayout, TypeDescriptor, TypeKind};
//! use rlp_codec::{decode_bytes, encode_to_vec, Value};
//!
//! static HEADER_FIELDS: [FieldLayout; 3] = [
//!     FieldLayout::new("Number", &builtin::U64),
//!     FieldLayout::new("Coinbase", &builtin::ADDRESS),
//!     FieldLayout::new("Extra", &builtin::BYTES_SEQ).tagged("tail"),
//! ];
//! static HEADER: TypeDescriptor = TypeDescriptor::new("Header", TypeKind::Struct(&HEADER_FIELDS));
//!
//! let header = Value::Struct(vec![
//!     Value::Uint(1024),
//!     Value::from([0x11u8; 20]),
//!     Value::List(vec![Value::from(&b"a"[..]), Value::from(&b"bc"[..])]),
//! ]);
//!
//! let bytes = encode_to_vec(&HEADER, &header)?;
//! assert_eq!(decode_bytes(&HEADER, &bytes)?, header);
//! # Ok::<(), rlp_codec::Error>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! +---------------------------------------------------------------+
//! |  encode_to_vec / decode_bytes          (process-wide cache)   |
//! +---------------------------------------------------------------+
//! |  CodecCache      RwLock<HashMap<TypeKey, Arc<CodecInfo>>>     |
//! |    resolve -> placeholder -> CodecGenerator -> Resolver ...   |
//! +---------------------------------------------------------------+
//! |  RlpGenerator    Stream (decode) | EncBuffer (encode) | Value |
//! +---------------------------------------------------------------+
//! |  types           TypeDescriptor | Tags | TypeKey              |
//! +---------------------------------------------------------------+
//! ```
//!
//! ## Struct tags
//!
//! | tag    | effect |
//! |--------|--------|
//! | `-`    | field is skipped |
//! | `nil`  | empty input decodes a pointer field to `Value::Null` |
//! | `tail` | last field; a sequence takes the remaining list elements, a byte string encodes as usual |
//!
//! Unexported fields ([`FieldLayout::private`](types::FieldLayout::private))
//! are never serialized.

pub mod cache;
pub mod codec;
pub mod config;
pub mod error;
pub mod types;

pub use cache::{CacheStats, CodecCache, Field, Resolver};
pub use codec::{
    Codec, CodecGenerator, CodecInfo, DecodeError, EncBuffer, EncodeError, EntryState,
    RlpGenerator, Stream, Value,
};
pub use config::CacheConfig;
pub use error::{Error, Result};
pub use types::{Tags, TypeDescriptor, TypeHandle, TypeKey};

/// Encode `value` as `ty` using the process-wide cache.
pub fn encode_to_vec(ty: impl Into<TypeHandle>, value: &Value) -> Result<Vec<u8>> {
    CodecCache::global().encode(ty, value)
}

/// Encode `value` as `ty`, appending to `out`.
pub fn encode_into(ty: impl Into<TypeHandle>, value: &Value, out: &mut Vec<u8>) -> Result<()> {
    CodecCache::global().encode_into(ty, value, out)
}

/// Decode exactly one `ty` from `input` using the process-wide cache.
///
/// Trailing bytes after the value are an error.
pub fn decode_bytes(ty: impl Into<TypeHandle>, input: &[u8]) -> Result<Value> {
    CodecCache::global().decode(ty, input)
}
