// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Static type system driving codec generation.
//!
//! Provides `TypeDescriptor` for field layout metadata, `Tags` for per-field
//! serialization modifiers, and `TypeKey` for addressing the codec cache.

pub mod builtin;
pub mod descriptor;
pub mod key;
pub mod tags;

pub use descriptor::{FieldLayout, TypeDescriptor, TypeHandle, TypeKind};
pub use key::TypeKey;
pub use tags::{TagError, Tags};
