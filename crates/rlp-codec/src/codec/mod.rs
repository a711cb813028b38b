// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! RLP codecs.
//!
//! A [`Codec`] is the decoder/writer pair generated for one
//! [`TypeKey`](crate::types::TypeKey). Codecs work on the dynamic [`Value`]
//! model and read from a [`Stream`] or write into an [`EncBuffer`].
//!
//! ```text
//! "dog"          -> 83 64 6f 67
//! ["cat", "dog"] -> c8 83 63 61 74 83 64 6f 67
//! 0              -> 80
//! 1024           -> 82 04 00
//! ```

mod encbuf;
mod errors;
pub mod generator;
mod info;
mod stream;
mod value;

pub use encbuf::EncBuffer;
pub use errors::{DecodeError, EncodeError};
pub use generator::{CodecGenerator, RlpGenerator};
pub use info::{Codec, CodecInfo, Decoder, EntryState, Writer};
pub use stream::{Kind, Stream};
pub use value::Value;
