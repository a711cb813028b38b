// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Decoding cursor over RLP input.
//!
//! The stream is bounds-checked and zero-copy: string payloads are returned as
//! slices of the input. Open lists are tracked on a stack of end offsets so
//! reads cannot run past the list they belong to.

use super::DecodeError;
use crate::config::{
    DEFAULT_MAX_LIST_DEPTH, LIST_LONG_BASE, LIST_SHORT_BASE, SHORT_PAYLOAD_MAX, STRING_LONG_BASE,
    STRING_SHORT_BASE,
};

/// Kind of the next RLP item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// Single byte below `0x80`, encoded as itself.
    Byte,
    String,
    List,
}

/// Parsed item header.
#[derive(Debug, Clone, Copy)]
struct Header {
    kind: Kind,
    /// Offset of the first payload byte.
    content: usize,
    /// Payload length in bytes.
    size: usize,
}

/// Decoding stream.
pub struct Stream<'a> {
    input: &'a [u8],
    pos: usize,
    /// End offsets of the open lists, innermost last.
    stack: Vec<usize>,
    max_depth: usize,
}

impl<'a> Stream<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        Self::with_max_depth(input, DEFAULT_MAX_LIST_DEPTH)
    }

    pub fn with_max_depth(input: &'a [u8], max_depth: usize) -> Self {
        Self {
            input,
            pos: 0,
            stack: Vec::new(),
            max_depth,
        }
    }

    pub fn offset(&self) -> usize {
        self.pos
    }

    /// True once all input is consumed and no list is open.
    pub fn is_finished(&self) -> bool {
        self.stack.is_empty() && self.pos >= self.input.len()
    }

    /// True when the innermost open list (or the input) has no more items.
    pub fn at_list_end(&self) -> bool {
        self.pos >= self.limit()
    }

    /// Kind and payload size of the next item, without consuming it.
    pub fn kind(&self) -> Result<(Kind, usize), DecodeError> {
        let header = self.header()?;
        Ok((header.kind, header.size))
    }

    /// Read a string or single byte, returning its payload.
    pub fn bytes(&mut self) -> Result<&'a [u8], DecodeError> {
        let header = self.header()?;
        if header.kind == Kind::List {
            return Err(DecodeError::ExpectedString);
        }
        let end = header.content + header.size;
        let payload = &self.input[header.content..end];
        self.pos = end;
        Ok(payload)
    }

    /// Read an unsigned integer of at most `bits` bits.
    pub fn uint(&mut self, bits: u32) -> Result<u64, DecodeError> {
        let header = self.header()?;
        match header.kind {
            Kind::Byte => {
                let byte = self.input[header.content];
                if byte == 0 {
                    return Err(DecodeError::CanonInt);
                }
                self.pos = header.content + 1;
                Ok(u64::from(byte))
            }
            Kind::String => {
                if header.size > (bits / 8) as usize {
                    return Err(DecodeError::UintOverflow { bits });
                }
                let end = header.content + header.size;
                let payload = &self.input[header.content..end];
                if payload.first() == Some(&0) {
                    return Err(DecodeError::CanonInt);
                }
                self.pos = end;
                Ok(payload
                    .iter()
                    .fold(0u64, |acc, b| (acc << 8) | u64::from(*b)))
            }
            Kind::List => Err(DecodeError::ExpectedString),
        }
    }

    /// Read a boolean, encoded as the integer 0 or 1.
    pub fn bool(&mut self) -> Result<bool, DecodeError> {
        match self.uint(8)? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(DecodeError::InvalidBool(other)),
        }
    }

    /// Enter a list, returning its payload size.
    pub fn list(&mut self) -> Result<usize, DecodeError> {
        let header = self.header()?;
        if header.kind != Kind::List {
            return Err(DecodeError::ExpectedList);
        }
        if self.stack.len() >= self.max_depth {
            return Err(DecodeError::DepthExceeded {
                max: self.max_depth,
            });
        }
        self.stack.push(header.content + header.size);
        self.pos = header.content;
        Ok(header.size)
    }

    /// Leave the innermost list. All of its items must have been read.
    pub fn list_end(&mut self) -> Result<(), DecodeError> {
        let end = *self.stack.last().ok_or(DecodeError::NotInList)?;
        if self.pos != end {
            return Err(DecodeError::NotAtEndOfList);
        }
        self.stack.pop();
        Ok(())
    }

    /// Read the next item verbatim, header included.
    pub fn raw(&mut self) -> Result<&'a [u8], DecodeError> {
        let header = self.header()?;
        let start = self.pos;
        let end = header.content + header.size;
        self.pos = end;
        Ok(&self.input[start..end])
    }

    /// Skip the next item.
    pub fn skip(&mut self) -> Result<(), DecodeError> {
        self.raw().map(|_| ())
    }

    fn limit(&self) -> usize {
        self.stack.last().copied().unwrap_or(self.input.len())
    }

    fn too_large(&self) -> DecodeError {
        if self.stack.is_empty() {
            DecodeError::ValueTooLarge
        } else {
            DecodeError::ElemTooLarge
        }
    }

    fn header(&self) -> Result<Header, DecodeError> {
        let limit = self.limit();
        if self.pos >= limit {
            return Err(if self.stack.is_empty() {
                DecodeError::Eof
            } else {
                DecodeError::EndOfList
            });
        }

        let prefix = self.input[self.pos];
        let header = match prefix {
            0x00..=0x7F => Header {
                kind: Kind::Byte,
                content: self.pos,
                size: 1,
            },
            _ if prefix <= STRING_LONG_BASE => {
                let size = usize::from(prefix - STRING_SHORT_BASE);
                let content = self.pos + 1;
                // A single byte below 0x80 must be encoded as itself.
                if size == 1 && content < limit && self.input[content] < STRING_SHORT_BASE {
                    return Err(DecodeError::CanonSize);
                }
                Header {
                    kind: Kind::String,
                    content,
                    size,
                }
            }
            _ if prefix < LIST_SHORT_BASE => {
                self.long_header(Kind::String, usize::from(prefix - STRING_LONG_BASE))?
            }
            _ if prefix <= LIST_LONG_BASE => Header {
                kind: Kind::List,
                content: self.pos + 1,
                size: usize::from(prefix - LIST_SHORT_BASE),
            },
            _ => self.long_header(Kind::List, usize::from(prefix - LIST_LONG_BASE))?,
        };

        match header.content.checked_add(header.size) {
            Some(end) if end <= limit => Ok(header),
            _ => Err(self.too_large()),
        }
    }

    fn long_header(&self, kind: Kind, size_len: usize) -> Result<Header, DecodeError> {
        let start = self.pos + 1;
        let content = start + size_len;
        if content > self.limit() {
            return Err(self.too_large());
        }
        let size_bytes = &self.input[start..content];
        if size_bytes.first() == Some(&0) {
            return Err(DecodeError::CanonSize);
        }
        let size = size_bytes
            .iter()
            .try_fold(0usize, |acc, b| {
                acc.checked_mul(256)
                    .and_then(|shifted| shifted.checked_add(usize::from(*b)))
            })
            .ok_or(DecodeError::ValueTooLarge)?;
        if size <= SHORT_PAYLOAD_MAX {
            return Err(DecodeError::CanonSize);
        }
        Ok(Header {
            kind,
            content,
            size,
        })
    }
}
