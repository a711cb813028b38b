// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Codec cache behaviour: memoization, concurrency, recursion, failure cleanup.

use parking_lot::Mutex;
use rlp_codec::types::{builtin, FieldLayout, TypeDescriptor, TypeKind};
use rlp_codec::{
    Codec, CodecCache, CodecGenerator, CodecInfo, EntryState, Error, Resolver, Result,
    RlpGenerator, Tags, TypeHandle, Value,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

// ============================================================================
// Types
// ============================================================================

static SIMPLE_FIELDS: [FieldLayout; 1] = [FieldLayout::new("X", &builtin::U64)];
static SIMPLE: TypeDescriptor = TypeDescriptor::new("Simple", TypeKind::Struct(&SIMPLE_FIELDS));

static NODE_FIELDS: [FieldLayout; 2] = [
    FieldLayout::new("Value", &builtin::U64),
    FieldLayout::new("Next", &NODE_PTR).tagged("nil"),
];
static NODE: TypeDescriptor = TypeDescriptor::new("Node", TypeKind::Struct(&NODE_FIELDS));
static NODE_PTR: TypeDescriptor = TypeDescriptor::new("*Node", TypeKind::Pointer(&NODE));

static TREE_FIELDS: [FieldLayout; 2] = [
    FieldLayout::new("Label", &builtin::STRING),
    FieldLayout::new("Children", &TREE_SEQ),
];
static TREE: TypeDescriptor = TypeDescriptor::new("Tree", TypeKind::Struct(&TREE_FIELDS));
static TREE_SEQ: TypeDescriptor = TypeDescriptor::new("[]Tree", TypeKind::Sequence(&TREE));

static MISPLACED_FIELDS: [FieldLayout; 2] = [
    FieldLayout::new("Count", &builtin::U32).tagged("tail"),
    FieldLayout::new("Name", &builtin::STRING),
];
static MISPLACED: TypeDescriptor =
    TypeDescriptor::new("Misplaced", TypeKind::Struct(&MISPLACED_FIELDS));

static NOT_SEQ_FIELDS: [FieldLayout; 2] = [
    FieldLayout::new("Count", &builtin::U32),
    FieldLayout::new("Name", &builtin::STRING).tagged("tail"),
];
static NOT_SEQ: TypeDescriptor = TypeDescriptor::new("NotSeq", TypeKind::Struct(&NOT_SEQ_FIELDS));

static UNKNOWN_FIELDS: [FieldLayout; 2] = [
    FieldLayout::new("Count", &builtin::U32),
    FieldLayout::new("Name", &builtin::STRING).tagged("nil, optional"),
];
static UNKNOWN: TypeDescriptor = TypeDescriptor::new("Unknown", TypeKind::Struct(&UNKNOWN_FIELDS));

static OUTER_FIELDS: [FieldLayout; 2] = [
    FieldLayout::new("Id", &builtin::U64),
    FieldLayout::new("Inner", &MISPLACED),
];
static OUTER: TypeDescriptor = TypeDescriptor::new("Outer", TypeKind::Struct(&OUTER_FIELDS));

static BROKEN_FIELDS: [FieldLayout; 2] = [
    FieldLayout::new("Next", &BROKEN_PTR),
    FieldLayout::new("Ratio", &builtin::F64),
];
static BROKEN: TypeDescriptor = TypeDescriptor::new("Broken", TypeKind::Struct(&BROKEN_FIELDS));
static BROKEN_PTR: TypeDescriptor = TypeDescriptor::new("*Broken", TypeKind::Pointer(&BROKEN));

static FRESH_FIELDS: [FieldLayout; 3] = [
    FieldLayout::new("A", &builtin::U16),
    FieldLayout::new("B", &builtin::BYTES),
    FieldLayout::new("C", &builtin::STRING_SEQ).tagged("tail"),
];
static FRESH: TypeDescriptor = TypeDescriptor::new("Fresh", TypeKind::Struct(&FRESH_FIELDS));

static WRAP: TypeDescriptor = TypeDescriptor::new("Wrap", TypeKind::Raw);

// ============================================================================
// Generators
// ============================================================================

/// Wraps `RlpGenerator`, counting calls per type and failing on demand.
#[derive(Default)]
struct Instrumented {
    calls: Arc<Mutex<HashMap<&'static str, usize>>>,
    fail_on: Option<(&'static str, Arc<AtomicBool>)>,
    delay: Option<Duration>,
}

impl Instrumented {
    fn failing(name: &'static str, armed: &Arc<AtomicBool>) -> Self {
        Self {
            fail_on: Some((name, Arc::clone(armed))),
            ..Self::default()
        }
    }

    fn slow(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }
}

impl CodecGenerator for Instrumented {
    fn generate(&self, ty: TypeHandle, tags: Tags, resolver: &mut Resolver<'_>) -> Result<Codec> {
        *self.calls.lock().entry(ty.name()).or_default() += 1;
        if let Some(delay) = self.delay {
            thread::sleep(delay);
        }
        if let Some((name, armed)) = &self.fail_on {
            if *name == ty.name() && armed.load(Ordering::SeqCst) {
                return Err(Error::generation(ty, "injected failure"));
            }
        }
        RlpGenerator.generate(ty, tags, resolver)
    }
}

type Captured = Arc<Mutex<Vec<(&'static str, Arc<CodecInfo>, EntryState)>>>;

/// Records the element entry seen by every pointer and sequence generation.
#[derive(Default)]
struct Capturing {
    seen: Captured,
}

impl CodecGenerator for Capturing {
    fn generate(&self, ty: TypeHandle, tags: Tags, resolver: &mut Resolver<'_>) -> Result<Codec> {
        if let TypeKind::Pointer(elem) | TypeKind::Sequence(elem) = ty.kind() {
            let info = resolver.resolve(elem, Tags::NONE)?;
            let state = info.state();
            self.seen.lock().push((ty.name(), info, state));
        }
        RlpGenerator.generate(ty, tags, resolver)
    }
}

/// Generates `Wrap` by trying `Broken` first and falling back to raw on error.
struct Fallback;

impl CodecGenerator for Fallback {
    fn generate(&self, ty: TypeHandle, tags: Tags, resolver: &mut Resolver<'_>) -> Result<Codec> {
        if ty.name() == "Wrap" {
            if let Err(err) = resolver.resolve(&BROKEN, Tags::NONE) {
                log::debug!("falling back for {}: {err}", ty.name());
            }
        }
        RlpGenerator.generate(ty, tags, resolver)
    }
}

fn calls_for(calls: &Mutex<HashMap<&'static str, usize>>, name: &str) -> usize {
    calls.lock().get(name).copied().unwrap_or(0)
}

// ============================================================================
// Memoization
// ============================================================================

#[test]
fn test_second_resolve_is_pure_hit() {
    let generator = Instrumented::default();
    let calls = Arc::clone(&generator.calls);
    let cache = CodecCache::new(generator);

    let first = cache.resolve(&SIMPLE, Tags::NONE).expect("Simple");
    let after_first: usize = calls.lock().values().sum();
    assert_eq!(after_first, 2, "Simple and uint64");

    let second = cache.resolve(&SIMPLE, Tags::NONE).expect("Simple");
    assert_eq!(calls.lock().values().sum::<usize>(), after_first);
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(cache.state(&SIMPLE, Tags::NONE), EntryState::Ready);
}

#[test]
fn test_distinct_tags_are_independent_entries() {
    let generator = Instrumented::default();
    let calls = Arc::clone(&generator.calls);
    let cache = CodecCache::new(generator);

    let plain = cache.resolve(&builtin::U64_SEQ, Tags::NONE).expect("plain");
    let tail = cache.resolve(&builtin::U64_SEQ, Tags::TAIL).expect("tail");

    assert!(!Arc::ptr_eq(&plain, &tail));
    assert_eq!(calls_for(&calls, "[]uint64"), 2);
    assert_eq!(plain.key().tags, Tags::NONE);
    assert_eq!(tail.key().tags, Tags::TAIL);

    let items = Value::from(vec![1u64, 2]);
    let mut out = rlp_codec::EncBuffer::new();
    plain.write(&items, &mut out).expect("plain write");
    assert_eq!(out.into_vec(), [0xC2, 0x01, 0x02]);

    let mut out = rlp_codec::EncBuffer::new();
    tail.write(&items, &mut out).expect("tail write");
    assert_eq!(out.into_vec(), [0x01, 0x02]);

    // re-resolving either key touches only its own entry
    assert!(Arc::ptr_eq(
        &cache.resolve(&builtin::U64_SEQ, Tags::TAIL).expect("tail"),
        &tail
    ));
    assert_eq!(calls_for(&calls, "[]uint64"), 2);
}

// ============================================================================
// Concurrency
// ============================================================================

#[test]
fn test_fifty_concurrent_first_resolves_build_once() {
    let generator = Instrumented::slow(Duration::from_millis(5));
    let calls = Arc::clone(&generator.calls);
    let cache = Arc::new(CodecCache::new(generator));
    let threads = 50;
    let barrier = Arc::new(Barrier::new(threads));

    let handles: Vec<_> = (0..threads)
        .map(|_| {
            let cache = Arc::clone(&cache);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                cache.resolve(&FRESH, Tags::NONE).expect("Fresh")
            })
        })
        .collect();

    let results: Vec<Arc<CodecInfo>> = handles
        .into_iter()
        .map(|h| h.join().expect("resolver thread panicked"))
        .collect();

    assert_eq!(calls_for(&calls, "Fresh"), 1);
    assert_eq!(calls_for(&calls, "[]string"), 1);
    for info in &results {
        assert_eq!(info.state(), EntryState::Ready);
        assert!(Arc::ptr_eq(info, &results[0]));
    }
    assert_eq!(cache.stats().misses, 1);
}

#[test]
fn test_random_concurrent_access_builds_each_key_once() {
    let generator = Instrumented::default();
    let calls = Arc::clone(&generator.calls);
    let cache = Arc::new(CodecCache::new(generator));
    let types: [&'static TypeDescriptor; 5] = [&SIMPLE, &NODE, &TREE, &FRESH, &builtin::HASH];
    let threads = 8;
    let barrier = Arc::new(Barrier::new(threads));

    let handles: Vec<_> = (0..threads)
        .map(|seed| {
            let cache = Arc::clone(&cache);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                let mut rng = fastrand::Rng::with_seed(seed as u64);
                barrier.wait();
                for _ in 0..200 {
                    let ty = types[rng.usize(..types.len())];
                    let info = cache.resolve(ty, Tags::NONE).expect("resolve");
                    assert!(info.is_ready());
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("resolver thread panicked");
    }

    let calls = calls.lock();
    assert!(calls.values().all(|n| *n == 1), "duplicate builds: {calls:?}");
}

// ============================================================================
// Recursion
// ============================================================================

#[test]
fn test_self_referential_pointer_shares_outer_entry() {
    let generator = Capturing::default();
    let seen = Arc::clone(&generator.seen);
    let cache = CodecCache::new(generator);

    let node = cache.resolve(&NODE, Tags::NONE).expect("Node");
    assert!(node.is_ready());

    let seen = seen.lock();
    let (_, inner, state_during_build) = seen
        .iter()
        .find(|(name, _, _)| *name == "*Node")
        .expect("*Node was generated");
    assert_eq!(*state_during_build, EntryState::Building);
    assert!(Arc::ptr_eq(inner, &node));
    // the placeholder handed out during the build is now the finished entry
    assert!(inner.is_ready());
}

#[test]
fn test_self_referential_sequence_shares_outer_entry() {
    let generator = Capturing::default();
    let seen = Arc::clone(&generator.seen);
    let cache = CodecCache::new(generator);

    let tree = cache.resolve(&TREE, Tags::NONE).expect("Tree");

    let seen = seen.lock();
    let (_, inner, state_during_build) = seen
        .iter()
        .find(|(name, _, _)| *name == "[]Tree")
        .expect("[]Tree was generated");
    assert_eq!(*state_during_build, EntryState::Building);
    assert!(Arc::ptr_eq(inner, &tree));
}

#[test]
fn test_linked_list_round_trip() {
    let cache = CodecCache::default();
    let list = Value::Struct(vec![
        Value::Uint(1),
        Value::Struct(vec![
            Value::Uint(2),
            Value::Struct(vec![Value::Uint(3), Value::Null]),
        ]),
    ]);

    let bytes = cache.encode(&NODE, &list).expect("encode");
    assert_eq!(bytes, [0xC6, 0x01, 0xC4, 0x02, 0xC2, 0x03, 0xC0]);
    assert_eq!(cache.decode(&NODE, &bytes).expect("decode"), list);
}

#[test]
fn test_tree_round_trip() {
    let cache = CodecCache::default();
    let leaf = |label: &str| Value::Struct(vec![Value::from(label), Value::List(vec![])]);
    let tree = Value::Struct(vec![
        Value::from("root"),
        Value::List(vec![leaf("a"), leaf("b")]),
    ]);

    let bytes = cache.encode(&TREE, &tree).expect("encode");
    assert_eq!(cache.decode(&TREE, &bytes).expect("decode"), tree);
}

// ============================================================================
// Tag validation
// ============================================================================

#[test]
fn test_tail_on_non_last_field_reports_position() {
    let cache = CodecCache::default();
    let err = cache.resolve(&MISPLACED, Tags::NONE).expect_err("misplaced tail");
    assert!(
        matches!(err, Error::TagPosition { owner: "Misplaced", field: "Count" }),
        "unexpected {err:?}"
    );
    assert!(cache.is_empty());
}

#[test]
fn test_tail_on_non_sequence_reports_type() {
    let cache = CodecCache::default();
    let err = cache.resolve(&NOT_SEQ, Tags::NONE).expect_err("tail on string");
    assert!(
        matches!(err, Error::TagType { owner: "NotSeq", field: "Name" }),
        "unexpected {err:?}"
    );
    // Count resolved before Name failed; the rollback removed it
    assert!(cache.is_empty());
    assert_eq!(cache.state(&builtin::U32, Tags::NONE), EntryState::Absent);
}

#[test]
fn test_unknown_tag_reports_syntax() {
    let cache = CodecCache::default();
    let err = cache.resolve(&UNKNOWN, Tags::NONE).expect_err("unknown tag");
    match &err {
        Error::TagSyntax { owner, field, token } => {
            assert_eq!((*owner, *field, token.as_str()), ("Unknown", "Name", "optional"));
        }
        other => panic!("unexpected {other:?}"),
    }
    assert_eq!(
        err.to_string(),
        r#"rlp: unknown struct tag "optional" on Unknown.Name"#
    );
    assert!(cache.is_empty());
}

#[test]
fn test_nested_tag_error_fails_enclosing_type() {
    let cache = CodecCache::default();
    let err = cache.resolve(&OUTER, Tags::NONE).expect_err("inner tag error");
    assert!(matches!(err, Error::TagPosition { owner: "Misplaced", .. }));
    assert_eq!(cache.state(&OUTER, Tags::NONE), EntryState::Absent);
    assert!(cache.is_empty());

    // deterministic: a retry fails the same way
    assert!(cache.resolve(&OUTER, Tags::NONE).is_err_and(|e| e.is_tag_error()));
}

// ============================================================================
// Failure cleanup
// ============================================================================

#[test]
fn test_failed_generation_is_retried() {
    let armed = Arc::new(AtomicBool::new(true));
    let generator = Instrumented::failing("Simple", &armed);
    let calls = Arc::clone(&generator.calls);
    let cache = CodecCache::new(generator);

    let err = cache.resolve(&SIMPLE, Tags::NONE).expect_err("armed");
    assert!(matches!(err, Error::Generation { ty: "Simple", .. }));
    assert_eq!(cache.state(&SIMPLE, Tags::NONE), EntryState::Absent);
    assert_eq!(calls_for(&calls, "Simple"), 1);

    armed.store(false, Ordering::SeqCst);
    let info = cache.resolve(&SIMPLE, Tags::NONE).expect("disarmed");
    assert!(info.is_ready());
    assert_eq!(calls_for(&calls, "Simple"), 2);
}

#[test]
fn test_failed_placeholder_is_marked_for_holders() {
    let generator = Capturing::default();
    let seen = Arc::clone(&generator.seen);
    let cache = CodecCache::new(generator);

    let err = cache.resolve(&BROKEN, Tags::NONE).expect_err("float field");
    assert!(matches!(err, Error::Generation { ty: "float64", .. }));

    let seen = seen.lock();
    let (_, held, state_during_build) = seen
        .iter()
        .find(|(name, _, _)| *name == "*Broken")
        .expect("*Broken was generated");
    assert_eq!(*state_during_build, EntryState::Building);
    assert_eq!(held.state(), EntryState::Failed);
    assert!(cache.is_empty());

    let mut out = rlp_codec::EncBuffer::new();
    assert!(held.write(&Value::Null, &mut out).is_err());
}

#[test]
fn test_recovered_nested_failure_leaves_no_stale_entries() {
    let cache = CodecCache::new(Fallback);

    let wrap = cache.resolve(&WRAP, Tags::NONE).expect("fallback");
    assert!(wrap.is_ready());

    // *Broken finished before Broken failed, so it goes too
    assert_eq!(cache.state(&BROKEN, Tags::NONE), EntryState::Absent);
    assert_eq!(cache.state(&BROKEN_PTR, Tags::NONE), EntryState::Absent);
    assert_eq!(cache.state(&builtin::F64, Tags::NONE), EntryState::Absent);
    assert_eq!(cache.len(), 1);

    let err = cache.resolve(&BROKEN, Tags::NONE).expect_err("float field");
    assert!(matches!(err, Error::Generation { ty: "float64", .. }));
    assert_eq!(cache.len(), 1);
}
