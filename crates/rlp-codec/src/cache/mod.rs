// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Concurrent codec cache.
//!
//! Codec generation happens only once per [`TypeKey`]. Lookups of finished
//! entries take the read lock; a first-time build takes the write lock and
//! holds it until the whole type graph below the key is generated.
//!
//! # Recursive types
//!
//! Before a key's generator runs, a placeholder [`CodecInfo`] is inserted for
//! it. Nested resolutions go through the [`Resolver`] handed to the generator,
//! which works on the already-locked map. When a type reaches itself again
//! (`Node { next: *Node }`), the inner resolution finds the placeholder and
//! returns it; the finished codec is later written into that same placeholder,
//! so every `Arc` handed out during the build ends up pointing at it.
//!
//! # Failure
//!
//! A failed generation removes every entry inserted since it started, its own
//! placeholder included, and marks them failed: finished nested codecs may
//! hold the failed placeholder. This happens per generation, so a generator
//! that recovers from a nested error keeps no entry built on top of it. A
//! generator that panics is rolled back the same way while unwinding.

mod fields;
mod stats;

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};
use std::time::Instant;

use parking_lot::RwLock;

use crate::codec::{
    CodecGenerator, CodecInfo, DecodeError, EncBuffer, EntryState, RlpGenerator, Stream, Value,
};
use crate::config::CacheConfig;
use crate::error::Result;
use crate::types::{Tags, TypeHandle, TypeKey};

pub use fields::Field;
pub use stats::CacheStats;
use stats::Counters;

static GLOBAL_CACHE: OnceLock<CodecCache> = OnceLock::new();

/// Concurrent cache from `(type, tags)` to generated codecs.
pub struct CodecCache {
    entries: RwLock<HashMap<TypeKey, Arc<CodecInfo>>>,
    generator: Box<dyn CodecGenerator>,
    config: CacheConfig,
    counters: Counters,
}

impl CodecCache {
    #[must_use]
    pub fn new(generator: impl CodecGenerator + 'static) -> Self {
        Self::with_config(generator, CacheConfig::default())
    }

    #[must_use]
    pub fn with_config(generator: impl CodecGenerator + 'static, config: CacheConfig) -> Self {
        Self {
            entries: RwLock::new(HashMap::with_capacity(config.initial_capacity)),
            generator: Box::new(generator),
            config,
            counters: Counters::default(),
        }
    }

    /// Process-wide cache using [`RlpGenerator`].
    pub fn global() -> &'static CodecCache {
        GLOBAL_CACHE.get_or_init(|| {
            log::debug!("[typecache] global cache initialised");
            CodecCache::new(RlpGenerator)
        })
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Entry for `(ty, tags)` if one exists. Never builds.
    pub fn lookup(&self, ty: impl Into<TypeHandle>, tags: Tags) -> Option<Arc<CodecInfo>> {
        self.try_peek(&TypeKey::new(ty, tags))
    }

    /// Codec info for `(ty, tags)`, generating it on first use.
    ///
    /// Concurrent first-time callers for the same key block on the build lock
    /// and then observe the entry built by whichever caller got there first.
    pub fn resolve(&self, ty: impl Into<TypeHandle>, tags: Tags) -> Result<Arc<CodecInfo>> {
        let key = TypeKey::new(ty, tags);

        if let Some(hit) = self.try_peek(&key) {
            self.counters.record_hit();
            return Ok(hit);
        }

        let mut entries = self.entries.write();
        if let Some(hit) = entries.get(&key) {
            self.counters.record_hit();
            return Ok(Arc::clone(hit));
        }

        self.counters.record_miss();
        let mut resolver = Resolver {
            entries: &mut *entries,
            generator: self.generator.as_ref(),
            counters: &self.counters,
            depth: 0,
            journal: Vec::new(),
        };
        resolver.build(key)
    }

    /// Observable state of `(ty, tags)`.
    pub fn state(&self, ty: impl Into<TypeHandle>, tags: Tags) -> EntryState {
        self.lookup(ty, tags)
            .map_or(EntryState::Absent, |info| info.state())
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    #[must_use]
    pub fn stats(&self) -> CacheStats {
        self.counters.snapshot()
    }

    /// Encode `value` as an untagged `ty`.
    pub fn encode(&self, ty: impl Into<TypeHandle>, value: &Value) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        self.encode_into(ty, value, &mut out)?;
        Ok(out)
    }

    /// Encode `value` as an untagged `ty`, appending to `out`.
    ///
    /// `out` is left untouched on error.
    pub fn encode_into(
        &self,
        ty: impl Into<TypeHandle>,
        value: &Value,
        out: &mut Vec<u8>,
    ) -> Result<()> {
        let info = self.resolve(ty, Tags::NONE)?;
        let mut buf = EncBuffer::new();
        info.write(value, &mut buf)?;
        buf.write_to(out);
        Ok(())
    }

    /// Decode exactly one untagged `ty` from `input`.
    pub fn decode(&self, ty: impl Into<TypeHandle>, input: &[u8]) -> Result<Value> {
        let info = self.resolve(ty, Tags::NONE)?;
        let mut stream = Stream::with_max_depth(input, self.config.max_list_depth);
        let value = info.decode(&mut stream)?;
        if !stream.is_finished() {
            return Err(DecodeError::MoreThanOneValue.into());
        }
        Ok(value)
    }

    fn try_peek(&self, key: &TypeKey) -> Option<Arc<CodecInfo>> {
        self.entries.read().get(key).map(Arc::clone)
    }
}

impl Default for CodecCache {
    fn default() -> Self {
        Self::new(RlpGenerator)
    }
}

impl std::fmt::Debug for CodecCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CodecCache")
            .field("entries", &self.len())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Access to the locked cache during a build.
///
/// Handed to [`CodecGenerator::generate`]; nested types are resolved through
/// it without taking the lock again.
pub struct Resolver<'a> {
    entries: &'a mut HashMap<TypeKey, Arc<CodecInfo>>,
    generator: &'a dyn CodecGenerator,
    counters: &'a Counters,
    depth: usize,
    /// Keys inserted by this build, for rollback.
    journal: Vec<TypeKey>,
}

impl Resolver<'_> {
    /// Codec info for `(ty, tags)`: the existing entry, the in-progress
    /// placeholder, or a freshly generated entry.
    pub fn resolve(&mut self, ty: impl Into<TypeHandle>, tags: Tags) -> Result<Arc<CodecInfo>> {
        let key = TypeKey::new(ty, tags);
        if let Some(hit) = self.entries.get(&key) {
            if hit.state() == EntryState::Building {
                log::trace!("[typecache] {key:?} is building, returning placeholder");
            }
            self.counters.record_hit();
            return Ok(Arc::clone(hit));
        }
        self.build(key)
    }

    /// Observable state of `(ty, tags)` as seen by this build.
    pub fn state(&self, ty: impl Into<TypeHandle>, tags: Tags) -> EntryState {
        self.entries
            .get(&TypeKey::new(ty, tags))
            .map_or(EntryState::Absent, |info| info.state())
    }

    /// Generations currently in progress on this build's stack.
    pub fn depth(&self) -> usize {
        self.depth
    }

    fn build(&mut self, key: TypeKey) -> Result<Arc<CodecInfo>> {
        let mark = self.journal.len();
        let info = Arc::new(CodecInfo::placeholder(key));
        self.entries.insert(key, Arc::clone(&info));
        self.journal.push(key);

        let start = Instant::now();
        let generator = self.generator;
        let mut guard = BuildGuard {
            depth: self.depth,
            resolver: self,
            mark,
            committed: false,
        };
        guard.resolver.depth += 1;
        let generated = generator.generate(key.ty, key.tags, &mut *guard.resolver);

        match generated {
            Ok(codec) => {
                guard.committed = true;
                drop(guard);
                info.complete(codec);
                let ns = self.counters.record_build(start);
                log::debug!("[typecache] built {key:?} in {ns}ns (depth {})", self.depth);
                Ok(info)
            }
            Err(err) => {
                drop(guard);
                self.counters.record_failure();
                Err(err)
            }
        }
    }

    /// Remove and fail every entry inserted since `mark`.
    fn rollback(&mut self, mark: usize) {
        for key in self.journal.drain(mark..) {
            if let Some(stale) = self.entries.remove(&key) {
                stale.fail();
                log::trace!("[typecache] discarding {key:?} ({:?})", stale.state());
            }
        }
    }
}

/// Restores the resolver after one generation. Unless committed, the entries
/// inserted by that generation are rolled back, including on unwind.
struct BuildGuard<'r, 'a> {
    resolver: &'r mut Resolver<'a>,
    mark: usize,
    depth: usize,
    committed: bool,
}

impl Drop for BuildGuard<'_, '_> {
    fn drop(&mut self) {
        self.resolver.depth = self.depth;
        if !self.committed {
            self.resolver.rollback(self.mark);
        }
    }
}
