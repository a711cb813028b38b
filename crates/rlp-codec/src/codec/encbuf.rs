// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Encoding buffer.
//!
//! List headers depend on the payload size, which is only known once the list
//! is complete. The buffer keeps payload bytes and list headers apart: each
//! list records where its payload starts, and headers are interleaved with
//! the payload once, when the output is produced.

use crate::config::{
    LIST_LONG_BASE, LIST_SHORT_BASE, SHORT_PAYLOAD_MAX, STRING_LONG_BASE, STRING_SHORT_BASE,
};

/// Pending list header.
#[derive(Debug, Clone, Copy)]
struct ListHead {
    /// Payload offset where the header goes.
    offset: usize,
    /// Header bytes written before the list started, then the payload size
    /// once the list is ended.
    size: usize,
}

/// Growable output buffer for RLP encoding.
#[derive(Debug, Default, Clone)]
pub struct EncBuffer {
    /// Everything except list headers.
    payload: Vec<u8>,
    heads: Vec<ListHead>,
    /// Total size of the list headers ended so far.
    heads_size: usize,
}

impl EncBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            payload: Vec::with_capacity(capacity),
            ..Self::default()
        }
    }

    /// Encoded size, headers included.
    pub fn len(&self) -> usize {
        self.payload.len() + self.heads_size
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Append the encoding to `out`. Every started list must have been ended.
    pub fn write_to(&self, out: &mut Vec<u8>) {
        out.reserve(self.len());
        let mut pos = 0;
        for head in &self.heads {
            out.extend_from_slice(&self.payload[pos..head.offset]);
            push_header(out, LIST_SHORT_BASE, LIST_LONG_BASE, head.size);
            pos = head.offset;
        }
        out.extend_from_slice(&self.payload[pos..]);
    }

    pub fn into_vec(self) -> Vec<u8> {
        if self.heads.is_empty() {
            return self.payload;
        }
        let mut out = Vec::with_capacity(self.len());
        self.write_to(&mut out);
        out
    }

    /// Write a byte string. A single byte below `0x80` is its own encoding.
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        if let [b] = bytes {
            if *b < STRING_SHORT_BASE {
                self.payload.push(*b);
                return;
            }
        }
        push_header(&mut self.payload, STRING_SHORT_BASE, STRING_LONG_BASE, bytes.len());
        self.payload.extend_from_slice(bytes);
    }

    /// Write an unsigned integer as its minimal big-endian byte string.
    pub fn write_uint(&mut self, value: u64) {
        let be = value.to_be_bytes();
        let skip = be.iter().take_while(|b| **b == 0).count();
        self.write_bytes(&be[skip..]);
    }

    pub fn write_bool(&mut self, value: bool) {
        self.write_uint(u64::from(value));
    }

    /// Append already-encoded bytes verbatim.
    pub fn write_raw(&mut self, encoded: &[u8]) {
        self.payload.extend_from_slice(encoded);
    }

    /// Begin a list. Pass the returned index to [`list_end`](Self::list_end).
    pub fn list_start(&mut self) -> usize {
        self.heads.push(ListHead {
            offset: self.payload.len(),
            size: self.heads_size,
        });
        self.heads.len() - 1
    }

    /// Finish the list begun by the `list_start` call that returned `index`.
    pub fn list_end(&mut self, index: usize) {
        let head = &mut self.heads[index];
        // headers of nested lists ended since the start count as payload
        head.size = self.payload.len() + self.heads_size - head.offset - head.size;
        self.heads_size += header_len(head.size);
    }
}

fn header_len(size: usize) -> usize {
    if size <= SHORT_PAYLOAD_MAX {
        1
    } else {
        1 + size_bytes(size).len()
    }
}

fn size_bytes(size: usize) -> Vec<u8> {
    let be = (size as u64).to_be_bytes();
    let skip = be.iter().take_while(|b| **b == 0).count();
    be[skip..].to_vec()
}

/// Write the header for a payload of `size` bytes.
fn push_header(out: &mut Vec<u8>, short_base: u8, long_base: u8, size: usize) {
    if size <= SHORT_PAYLOAD_MAX {
        // size <= 55 fits below the long base
        out.push(short_base + size as u8);
        return;
    }
    let size_bytes = size_bytes(size);
    out.push(long_base + size_bytes.len() as u8);
    out.extend_from_slice(&size_bytes);
}
