// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Codec configuration - single source of truth for framing constants.
//!
//! - **Level 1 (Static)**: RLP prefix bytes and size thresholds.
//! - **Level 2 (Runtime)**: `CacheConfig` for cache sizing and decode limits.

// =======================================================================
// RLP framing
// =======================================================================

/// Prefix of a string whose payload is 0..=55 bytes (`0x80 + len`).
pub const STRING_SHORT_BASE: u8 = 0x80;

/// Prefix of a string with a long payload (`0xB7 + len(len)`).
pub const STRING_LONG_BASE: u8 = 0xB7;

/// Prefix of a list whose payload is 0..=55 bytes (`0xC0 + len`).
pub const LIST_SHORT_BASE: u8 = 0xC0;

/// Prefix of a list with a long payload (`0xF7 + len(len)`).
pub const LIST_LONG_BASE: u8 = 0xF7;

/// Largest payload that fits the single-byte header form.
pub const SHORT_PAYLOAD_MAX: usize = 55;

/// Encoding of an empty string, also the encoding of integer zero and `false`.
pub const EMPTY_STRING: u8 = STRING_SHORT_BASE;

/// Encoding of an empty list.
pub const EMPTY_LIST: u8 = LIST_SHORT_BASE;

// =======================================================================
// Runtime defaults
// =======================================================================

/// Initial bucket count of the codec cache.
pub const DEFAULT_CACHE_CAPACITY: usize = 64;

/// Deepest list nesting a decode stream accepts.
///
/// Decoders recurse once per nesting level; the bound keeps hostile input
/// from exhausting the stack.
pub const DEFAULT_MAX_LIST_DEPTH: usize = 1024;

/// Runtime configuration of a [`CodecCache`](crate::CodecCache).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    /// Entries reserved up front.
    pub initial_capacity: usize,
    /// List nesting limit for streams created by the cache's decode helpers.
    pub max_list_depth: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_CACHE_CAPACITY,
            max_list_depth: DEFAULT_MAX_LIST_DEPTH,
        }
    }
}

impl CacheConfig {
    #[must_use]
    pub fn initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    #[must_use]
    pub fn max_list_depth(mut self, depth: usize) -> Self {
        self.max_list_depth = depth;
        self
    }
}
