//! # levelmeta codec
//!
//! Session-record encoding/decoding for the manifest of a leveled
//! log-structured key-value store.
//!
//! Every structural change to the table hierarchy (comparator, log number,
//! file-number counter, last sequence, added and removed tables, compaction
//! pointers) is captured as a [`SessionRecord`] and appended to the manifest.
//! On recovery each logged record is decoded and replayed.
//!
//! ## Wire format
//!
//! A record is a flat run of `tag payload` groups. All integers are unsigned
//! LEB128 varints; byte strings are a varint length followed by the bytes.
//!
//! | Tag | Field | Payload |
//! |-----|-------|---------|
//! | 1 | comparator | bytes |
//! | 2 | log number | varint |
//! | 3 | next file number | varint |
//! | 4 | last sequence | varint |
//! | 5 | compaction pointer | level, key |
//! | 6 | deleted table | level, number |
//! | 7 | new table | level, number, size, smallest, largest |
//! | 9 | previous log number | refused |
//!
//! Unassigned tags are skipped; tag 9 fails with
//! [`CodecError::UnsupportedFormat`].
//!
//! ## Usage
//!
//! ```
//! use levelmeta_codec::SessionRecord;
//!
//! let mut record = SessionRecord::new();
//! record.set_log_num(7);
//! record.set_sequence(42);
//! record.add_table(1, 3, 1024, "a", "z");
//!
//! let bytes = record.encode();
//! let decoded = SessionRecord::from_bytes(&bytes).unwrap();
//! assert_eq!(record, decoded);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod decoder;
mod encoder;
mod entry;
mod error;
mod record;
pub mod tag;
pub mod varint;

pub use config::{DecodeConfig, DEFAULT_MAX_BYTES_LEN};
pub use decoder::{decode_record, RecordDecoder};
pub use encoder::encode_record;
pub use entry::{
    CompactPointer, DeletedTable, InternalKey, Level, NewTable, TableFile, TableOpener,
};
pub use error::{CodecError, CodecResult};
pub use record::SessionRecord;
pub use tag::Tag;
