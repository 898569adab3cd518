//! Benchmark utilities.

use levelmeta_codec::SessionRecord;
use rand::Rng;

/// Generate a random key of the specified size.
pub fn random_key(size: usize) -> Vec<u8> {
    let mut rng = rand::thread_rng();
    (0..size).map(|_| rng.gen()).collect()
}

/// Generate a record that adds and deletes `tables` tables with keys of
/// `key_size` bytes, the shape a large compaction produces.
pub fn random_record(tables: usize, key_size: usize) -> SessionRecord {
    let mut rng = rand::thread_rng();
    let mut record = SessionRecord::new();
    record.set_comparator("leveldb.BytewiseComparator");
    record.set_log_num(rng.gen_range(1..1 << 20));
    record.set_next_num(rng.gen_range(1..1 << 20));
    record.set_sequence(rng.gen());
    record.add_compact_pointer(rng.gen_range(0..7), random_key(key_size));
    for _ in 0..tables {
        record.delete_table(rng.gen_range(0..7), rng.gen_range(1..1 << 20));
        record.add_table(
            rng.gen_range(0..7),
            rng.gen_range(1..1 << 20),
            rng.gen_range(1..1 << 26),
            random_key(key_size),
            random_key(key_size),
        );
    }
    record
}
