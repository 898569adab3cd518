//! Property-based test generators using proptest.
//!
//! Provides strategies for generating session records and their entries,
//! plus helpers for reasoning about field boundaries in encoded records.

use levelmeta_codec::{
    CompactPointer, DeletedTable, InternalKey, Level, NewTable, SessionRecord,
};
use proptest::prelude::*;

/// Strategy for levels, biased towards the small values real trees use.
pub fn level_strategy() -> impl Strategy<Value = Level> {
    prop_oneof![
        4 => 0u64..7,
        1 => any::<u64>(),
    ]
}

/// Strategy for file numbers, sizes and sequence numbers across varint widths.
pub fn counter_strategy() -> impl Strategy<Value = u64> {
    prop_oneof![
        2 => 0u64..128,
        2 => 128u64..1 << 21,
        1 => any::<u64>(),
    ]
}

/// Strategy for opaque internal keys (arbitrary bytes, possibly empty).
pub fn internal_key_strategy() -> impl Strategy<Value = InternalKey> {
    prop::collection::vec(any::<u8>(), 0..48).prop_map(InternalKey::from)
}

/// Strategy for comparator names: the bytewise name, short text, or raw
/// bytes that need not be UTF-8.
pub fn comparator_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop_oneof![
        Just(b"leveldb.BytewiseComparator".to_vec()),
        ".{0,40}".prop_map(String::into_bytes),
        prop::collection::vec(any::<u8>(), 0..40),
    ]
}

/// Strategy for compaction pointers.
pub fn compact_pointer_strategy() -> impl Strategy<Value = CompactPointer> {
    (level_strategy(), internal_key_strategy()).prop_map(|(level, key)| CompactPointer { level, key })
}

/// Strategy for new-table entries.
pub fn new_table_strategy() -> impl Strategy<Value = NewTable> {
    (
        level_strategy(),
        counter_strategy(),
        counter_strategy(),
        internal_key_strategy(),
        internal_key_strategy(),
    )
        .prop_map(|(level, number, size, smallest, largest)| NewTable {
            level,
            number,
            size,
            smallest,
            largest,
        })
}

/// Strategy for deleted-table entries.
pub fn deleted_table_strategy() -> impl Strategy<Value = DeletedTable> {
    (level_strategy(), counter_strategy()).prop_map(|(level, number)| DeletedTable { level, number })
}

/// Strategy for session records with any mix of present and absent fields.
pub fn session_record_strategy() -> impl Strategy<Value = SessionRecord> {
    (
        proptest::option::of(comparator_strategy()),
        proptest::option::of(counter_strategy()),
        proptest::option::of(counter_strategy()),
        proptest::option::of(counter_strategy()),
        prop::collection::vec(compact_pointer_strategy(), 0..4),
        prop::collection::vec(deleted_table_strategy(), 0..6),
        prop::collection::vec(new_table_strategy(), 0..6),
    )
        .prop_map(
            |(comparator, log_num, next_num, sequence, pointers, deleted, added)| {
                let mut record = SessionRecord::new();
                if let Some(name) = comparator {
                    record.set_comparator(name);
                }
                if let Some(num) = log_num {
                    record.set_log_num(num);
                }
                if let Some(num) = next_num {
                    record.set_next_num(num);
                }
                if let Some(seq) = sequence {
                    record.set_sequence(seq);
                }
                for cp in pointers {
                    record.add_compact_pointer(cp.level, cp.key);
                }
                for dt in deleted {
                    record.delete_table(dt.level, dt.number);
                }
                for nt in added {
                    record.add_table(nt.level, nt.number, nt.size, nt.smallest, nt.largest);
                }
                record
            },
        )
}

/// Split a record into single-field records, in wire order.
///
/// Encoding each part and concatenating the results yields the encoding of
/// the whole record.
pub fn split_fields(record: &SessionRecord) -> Vec<SessionRecord> {
    fn part(fill: impl FnOnce(&mut SessionRecord)) -> SessionRecord {
        let mut record = SessionRecord::new();
        fill(&mut record);
        record
    }

    let mut parts = Vec::new();
    if let Some(name) = record.comparator() {
        parts.push(part(|r| r.set_comparator(name.to_vec())));
    }
    if let Some(num) = record.log_num() {
        parts.push(part(|r| r.set_log_num(num)));
    }
    if let Some(num) = record.next_num() {
        parts.push(part(|r| r.set_next_num(num)));
    }
    if let Some(seq) = record.sequence() {
        parts.push(part(|r| r.set_sequence(seq)));
    }
    for cp in record.compact_pointers() {
        parts.push(part(|r| r.add_compact_pointer(cp.level, cp.key.clone())));
    }
    for dt in record.deleted_tables() {
        parts.push(part(|r| r.delete_table(dt.level, dt.number)));
    }
    for nt in record.new_tables() {
        parts.push(part(|r| {
            r.add_table(
                nt.level,
                nt.number,
                nt.size,
                nt.smallest.clone(),
                nt.largest.clone(),
            );
        }));
    }
    parts
}

/// Byte offsets at which an encoded record can be cut cleanly, including
/// `0` and the full length.
pub fn field_boundaries(record: &SessionRecord) -> Vec<usize> {
    let mut offsets = vec![0];
    let mut end = 0;
    for part in split_fields(record) {
        end += part.encoded_len();
        offsets.push(end);
    }
    offsets
}

/// Configuration for property tests.
#[derive(Debug, Clone)]
pub struct PropTestConfig {
    /// Number of test cases to run.
    pub cases: u32,
    /// Maximum shrink iterations.
    pub max_shrink_iters: u32,
}

impl Default for PropTestConfig {
    fn default() -> Self {
        Self {
            cases: 256,
            max_shrink_iters: 1000,
        }
    }
}

impl PropTestConfig {
    /// Creates a configuration for quick tests.
    #[must_use]
    pub fn quick() -> Self {
        Self {
            cases: 32,
            max_shrink_iters: 100,
        }
    }

    /// Creates a configuration for thorough tests.
    #[must_use]
    pub fn thorough() -> Self {
        Self {
            cases: 1024,
            max_shrink_iters: 10000,
        }
    }

    /// Converts to proptest config.
    #[must_use]
    pub fn to_proptest_config(&self) -> ProptestConfig {
        ProptestConfig {
            cases: self.cases,
            max_shrink_iters: self.max_shrink_iters,
            ..ProptestConfig::default()
        }
    }
}
