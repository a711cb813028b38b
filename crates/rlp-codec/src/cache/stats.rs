// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Cache hit/miss statistics.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Snapshot of cache counters.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    /// Resolutions answered by an existing entry (finished or placeholder).
    pub hits: u64,
    /// Top-level resolutions that had to build.
    pub misses: u64,
    /// Successful generations, nested ones included.
    pub builds: u64,
    /// Failed generations, nested ones included.
    pub failures: u64,
    /// Duration of the most recent successful generation.
    pub last_build_ns: u64,
}

#[derive(Debug, Default)]
pub(crate) struct Counters {
    hits: AtomicU64,
    misses: AtomicU64,
    builds: AtomicU64,
    failures: AtomicU64,
    last_build_ns: AtomicU64,
}

impl Counters {
    pub(crate) fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_build(&self, start: Instant) -> u64 {
        let ns = u64::try_from(start.elapsed().as_nanos()).unwrap_or(u64::MAX);
        self.builds.fetch_add(1, Ordering::Relaxed);
        self.last_build_ns.store(ns, Ordering::Relaxed);
        ns
    }

    pub(crate) fn record_failure(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            builds: self.builds.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
            last_build_ns: self.last_build_ns.load(Ordering::Relaxed),
        }
    }
}
