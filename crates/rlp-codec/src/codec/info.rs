// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Cache entries.

use std::fmt;
use std::sync::{Arc, OnceLock};

use super::{DecodeError, EncBuffer, EncodeError, Stream, Value};
use crate::types::TypeKey;

/// Decoder half of a codec.
pub type Decoder = Arc<dyn Fn(&mut Stream<'_>) -> Result<Value, DecodeError> + Send + Sync>;

/// Writer half of a codec.
pub type Writer = Arc<dyn Fn(&Value, &mut EncBuffer) -> Result<(), EncodeError> + Send + Sync>;

/// Immutable decoder/writer pair for one type key.
#[derive(Clone)]
pub struct Codec {
    decoder: Decoder,
    writer: Writer,
}

impl Codec {
    pub fn new<D, W>(decoder: D, writer: W) -> Self
    where
        D: Fn(&mut Stream<'_>) -> Result<Value, DecodeError> + Send + Sync + 'static,
        W: Fn(&Value, &mut EncBuffer) -> Result<(), EncodeError> + Send + Sync + 'static,
    {
        Self {
            decoder: Arc::new(decoder),
            writer: Arc::new(writer),
        }
    }

    pub fn decode(&self, stream: &mut Stream<'_>) -> Result<Value, DecodeError> {
        (self.decoder)(stream)
    }

    pub fn write(&self, value: &Value, out: &mut EncBuffer) -> Result<(), EncodeError> {
        (self.writer)(value, out)
    }
}

impl fmt::Debug for Codec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Codec { .. }")
    }
}

/// Observable state of a type key in the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryState {
    /// No entry for the key.
    Absent,
    /// Placeholder installed, generation in progress.
    Building,
    Ready,
    /// Generation failed. Only seen through an `Arc` captured before removal.
    Failed,
}

/// Shared cache entry.
///
/// Created as a placeholder before generation starts and filled in place
/// exactly once, so an `Arc` captured while the type was still building sees
/// the finished codec afterwards.
pub struct CodecInfo {
    key: TypeKey,
    /// Unset while building; `Some` once ready, `None` once failed.
    slot: OnceLock<Option<Codec>>,
}

impl CodecInfo {
    pub(crate) fn placeholder(key: TypeKey) -> Self {
        Self {
            key,
            slot: OnceLock::new(),
        }
    }

    pub fn key(&self) -> TypeKey {
        self.key
    }

    pub fn state(&self) -> EntryState {
        match self.slot.get() {
            None => EntryState::Building,
            Some(Some(_)) => EntryState::Ready,
            Some(None) => EntryState::Failed,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.state() == EntryState::Ready
    }

    pub fn codec(&self) -> Option<&Codec> {
        self.slot.get().and_then(Option::as_ref)
    }

    pub(crate) fn complete(&self, codec: Codec) {
        let filled = self.slot.set(Some(codec)).is_ok();
        debug_assert!(filled, "codec entry {:?} completed twice", self.key);
    }

    pub(crate) fn fail(&self) {
        let _ = self.slot.set(None);
    }

    /// Decode one value with this entry's codec.
    pub fn decode(&self, stream: &mut Stream<'_>) -> Result<Value, DecodeError> {
        match self.codec() {
            Some(codec) => codec.decode(stream),
            None => Err(DecodeError::CodecUnavailable {
                ty: self.key.ty.name(),
                state: self.state(),
            }),
        }
    }

    /// Write one value with this entry's codec.
    pub fn write(&self, value: &Value, out: &mut EncBuffer) -> Result<(), EncodeError> {
        match self.codec() {
            Some(codec) => codec.write(value, out),
            None => Err(EncodeError::CodecUnavailable {
                ty: self.key.ty.name(),
                state: self.state(),
            }),
        }
    }
}

impl fmt::Debug for CodecInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CodecInfo")
            .field("key", &self.key)
            .field("state", &self.state())
            .finish()
    }
}
