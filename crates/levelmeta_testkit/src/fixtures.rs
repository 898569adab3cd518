//! Test fixtures and file helpers.
//!
//! Provides sample records for common scenarios and a temporary file that
//! exercises the codec against real `File` sinks and sources.

use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Once;

use levelmeta_codec::{CodecResult, SessionRecord};
use tempfile::TempDir;

static TRACING: Once = Once::new();

/// Install a `tracing` subscriber for tests, filtered by `RUST_LOG`.
///
/// Safe to call from every test; only the first call installs anything.
pub fn init_test_tracing() {
    TRACING.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}

/// A single encoded record stored in a temporary file.
pub struct TempManifest {
    path: PathBuf,
    _temp_dir: TempDir,
}

impl TempManifest {
    /// Creates an empty manifest file in a fresh temporary directory.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("MANIFEST-000001");
        File::create(&path).expect("Failed to create manifest file");
        Self {
            path,
            _temp_dir: temp_dir,
        }
    }

    /// Path of the manifest file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replace the file contents with the encoding of `record`.
    ///
    /// # Errors
    ///
    /// Returns the codec error for any failed write.
    pub fn write_record(&self, record: &SessionRecord) -> CodecResult<()> {
        let file = OpenOptions::new()
            .write(true)
            .truncate(true)
            .open(&self.path)?;
        let mut writer = BufWriter::new(file);
        record.encode_to(&mut writer)?;
        writer.flush()?;
        writer.get_ref().sync_all()?;
        Ok(())
    }

    /// Append the encoding of `record` after whatever the file holds.
    ///
    /// Records carry no framing, so reading the file back yields one record
    /// with later scalars winning and entry lists concatenated.
    ///
    /// # Errors
    ///
    /// Returns the codec error for any failed write.
    pub fn append_record(&self, record: &SessionRecord) -> CodecResult<()> {
        let file = OpenOptions::new().append(true).open(&self.path)?;
        let mut writer = BufWriter::new(file);
        record.encode_to(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    /// Append raw bytes, e.g. to simulate a torn or foreign write.
    pub fn append_raw(&self, bytes: &[u8]) {
        let mut file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .expect("Failed to open manifest for append");
        file.write_all(bytes).expect("Failed to append to manifest");
    }

    /// Cut the file down to `len` bytes.
    pub fn truncate(&self, len: u64) {
        let file = OpenOptions::new()
            .write(true)
            .open(&self.path)
            .expect("Failed to open manifest for truncation");
        file.set_len(len).expect("Failed to truncate manifest");
    }

    /// Decode the file contents through a buffered reader.
    ///
    /// # Errors
    ///
    /// Returns the codec error reported while decoding.
    pub fn read_record(&self) -> CodecResult<SessionRecord> {
        let file = File::open(&self.path)?;
        let mut record = SessionRecord::new();
        record.decode_from(BufReader::new(file))?;
        Ok(record)
    }

    /// Current file length in bytes.
    pub fn len(&self) -> u64 {
        std::fs::metadata(&self.path)
            .expect("Failed to stat manifest")
            .len()
    }

    /// Returns true if the file is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for TempManifest {
    fn default() -> Self {
        Self::new()
    }
}

/// Sample records for common manifest scenarios.
pub mod scenarios {
    use levelmeta_codec::{Level, SessionRecord};

    /// The first record of a new database: comparator and counters.
    pub fn new_database() -> SessionRecord {
        let mut record = SessionRecord::new();
        record.set_comparator("leveldb.BytewiseComparator");
        record.set_log_num(0);
        record.set_next_num(2);
        record.set_sequence(0);
        record
    }

    /// A memtable flush: new log number, one level-0 table.
    pub fn memtable_flush() -> SessionRecord {
        let mut record = SessionRecord::new();
        record.set_log_num(7);
        record.set_sequence(42);
        record.add_table(1, 3, 1024, "a", "z");
        record
    }

    /// A compaction of `inputs` level-`level` tables into `outputs` tables
    /// one level down, advancing the compaction pointer.
    pub fn compaction(level: Level, inputs: u64, outputs: u64) -> SessionRecord {
        let mut record = SessionRecord::new();
        record.set_next_num(100 + inputs + outputs);
        record.add_compact_pointer(level, format!("key{:04}", inputs).into_bytes());
        for num in 0..inputs {
            record.delete_table(level, 10 + num);
        }
        for num in 0..outputs {
            record.add_table(
                level + 1,
                100 + num,
                2 * 1024 * 1024,
                format!("key{:04}", num * 10).into_bytes(),
                format!("key{:04}", num * 10 + 9).into_bytes(),
            );
        }
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temp_manifest_roundtrip() {
        init_test_tracing();
        let manifest = TempManifest::new();
        assert!(manifest.is_empty());
        let record = scenarios::compaction(2, 3, 4);
        manifest.write_record(&record).unwrap();
        assert_eq!(manifest.len(), record.encoded_len() as u64);
        assert_eq!(manifest.read_record().unwrap(), record);
    }

    #[test]
    fn rewrite_replaces_previous_record() {
        let manifest = TempManifest::new();
        manifest.write_record(&scenarios::compaction(1, 5, 5)).unwrap();
        manifest.write_record(&scenarios::memtable_flush()).unwrap();
        assert_eq!(manifest.read_record().unwrap(), scenarios::memtable_flush());
    }

    #[test]
    fn appended_records_merge_on_read() {
        let manifest = TempManifest::new();
        manifest.append_record(&scenarios::new_database()).unwrap();
        manifest.append_record(&scenarios::memtable_flush()).unwrap();
        manifest.append_record(&scenarios::compaction(1, 2, 1)).unwrap();

        let merged = manifest.read_record().unwrap();
        assert_eq!(merged.comparator(), Some(&b"leveldb.BytewiseComparator"[..]));
        assert_eq!(merged.log_num(), Some(7));
        assert_eq!(merged.next_num(), Some(103));
        assert_eq!(merged.sequence(), Some(42));
        assert_eq!(merged.new_tables().len(), 2);
        assert_eq!(merged.deleted_tables().len(), 2);
    }

    #[test]
    fn scenarios_are_populated() {
        assert_eq!(
            scenarios::new_database().comparator_str(),
            Some(Ok("leveldb.BytewiseComparator"))
        );
        let compaction = scenarios::compaction(0, 2, 1);
        assert_eq!(compaction.deleted_tables().len(), 2);
        assert_eq!(compaction.new_tables().len(), 1);
    }
}
