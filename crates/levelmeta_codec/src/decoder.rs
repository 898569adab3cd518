//! Session record decoder.
//!
//! Reads tag after tag until the source is exhausted exactly at a tag
//! boundary, which is the normal end of a record. Running out of data
//! anywhere else is an error.
//!
//! Tags this reader does not know are skipped, but no payload is consumed
//! for them: the format has no per-field length. A future field with a
//! payload would therefore desynchronise an old reader. The one retired tag
//! that did carry data ([`Tag::PrevLogNum`]) is refused outright.

use std::io::Read;

use tracing::{debug, trace};

use crate::config::DecodeConfig;
use crate::entry::Level;
use crate::error::{CodecError, CodecResult};
use crate::record::SessionRecord;
use crate::tag::Tag;
use crate::varint::{read_length_prefixed, read_uvarint, read_uvarint_field};

/// Decode a complete in-memory record.
///
/// # Errors
///
/// See [`RecordDecoder::decode_into`].
pub fn decode_record(bytes: &[u8]) -> CodecResult<SessionRecord> {
    let mut record = SessionRecord::new();
    record.decode(bytes)?;
    Ok(record)
}

/// Decodes session records from a byte source.
///
/// The source is read one byte at a time while parsing varints; wrap
/// unbuffered sources in a `BufReader`.
pub struct RecordDecoder<R> {
    reader: R,
    config: DecodeConfig,
}

impl<R: Read> RecordDecoder<R> {
    /// Create a decoder with default limits.
    pub fn new(reader: R) -> Self {
        Self::with_config(reader, DecodeConfig::default())
    }

    /// Create a decoder with explicit limits.
    pub fn with_config(reader: R, config: DecodeConfig) -> Self {
        Self { reader, config }
    }

    /// Consume the decoder, returning the source.
    pub fn into_inner(self) -> R {
        self.reader
    }

    /// Decode fields into `record` until the source is exhausted.
    ///
    /// Scalar fields are only set once their value has been read in full.
    /// On error the record may already hold earlier fields and must be
    /// treated as unreliable as a whole.
    ///
    /// # Errors
    ///
    /// - [`CodecError::UnsupportedFormat`] if the retired previous-log-number
    ///   tag appears.
    /// - [`CodecError::UnexpectedEof`] if the input ends inside a field.
    /// - [`CodecError::VarintOverflow`] or [`CodecError::SizeLimitExceeded`]
    ///   for malformed fields.
    /// - [`CodecError::Io`] for source failures.
    pub fn decode_into(&mut self, record: &mut SessionRecord) -> CodecResult<()> {
        while let Some(value) = read_uvarint(&mut self.reader)? {
            let Some(tag) = Tag::from_u64(value) else {
                debug!(tag = value, "skipping unknown session record tag");
                continue;
            };
            self.decode_field(tag, record)?;
        }
        trace!(
            compact_pointers = record.compact_pointers.len(),
            new_tables = record.new_tables.len(),
            deleted_tables = record.deleted_tables.len(),
            "decoded session record"
        );
        Ok(())
    }

    fn decode_field(&mut self, tag: Tag, record: &mut SessionRecord) -> CodecResult<()> {
        match tag {
            Tag::Comparator => {
                let name = self.read_bytes("comparator")?;
                record.set_comparator(name);
            }
            Tag::LogNum => {
                let num = read_uvarint_field(&mut self.reader, "log number")?;
                record.set_log_num(num);
            }
            Tag::NextNum => {
                let num = read_uvarint_field(&mut self.reader, "next file number")?;
                record.set_next_num(num);
            }
            Tag::Sequence => {
                let seq = read_uvarint_field(&mut self.reader, "last sequence")?;
                record.set_sequence(seq);
            }
            Tag::PrevLogNum => {
                return Err(CodecError::unsupported_format(
                    "previous log number is no longer supported",
                ));
            }
            Tag::CompactPointer => {
                let level = self.read_level("compact pointer level")?;
                let key = self.read_bytes("compact pointer key")?;
                record.add_compact_pointer(level, key);
            }
            Tag::DeletedTable => {
                let level = self.read_level("deleted table level")?;
                let number = read_uvarint_field(&mut self.reader, "deleted table number")?;
                record.delete_table(level, number);
            }
            Tag::NewTable => {
                let level = self.read_level("new table level")?;
                let number = read_uvarint_field(&mut self.reader, "new table number")?;
                let size = read_uvarint_field(&mut self.reader, "new table size")?;
                let smallest = self.read_bytes("new table smallest key")?;
                let largest = self.read_bytes("new table largest key")?;
                record.add_table(level, number, size, smallest, largest);
            }
        }
        Ok(())
    }

    fn read_level(&mut self, field: &'static str) -> CodecResult<Level> {
        read_uvarint_field(&mut self.reader, field)
    }

    fn read_bytes(&mut self, field: &'static str) -> CodecResult<Vec<u8>> {
        read_length_prefixed(&mut self.reader, self.config.max_bytes_len, field)
    }
}

impl SessionRecord {
    /// Decode fields from `r` into this record.
    ///
    /// # Errors
    ///
    /// See [`RecordDecoder::decode_into`].
    pub fn decode_from<R: Read>(&mut self, r: R) -> CodecResult<()> {
        RecordDecoder::new(r).decode_into(self)
    }

    /// Decode fields from an in-memory buffer into this record.
    ///
    /// # Errors
    ///
    /// See [`RecordDecoder::decode_into`].
    pub fn decode(&mut self, bytes: &[u8]) -> CodecResult<()> {
        self.decode_from(bytes)
    }

    /// Decode a fresh record from an in-memory buffer.
    ///
    /// # Errors
    ///
    /// See [`RecordDecoder::decode_into`].
    pub fn from_bytes(bytes: &[u8]) -> CodecResult<Self> {
        decode_record(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::{DeletedTable, InternalKey, NewTable};

    fn concrete() -> Vec<u8> {
        vec![0x02, 0x07, 0x04, 0x2a, 0x07, 0x01, 0x03, 0x80, 0x08, 0x01, b'a', 0x01, b'z']
    }

    #[test]
    fn empty_input_is_empty_record() {
        let record = decode_record(&[]).unwrap();
        assert!(record.is_empty());
    }

    #[test]
    fn concrete_scenario() {
        let record = decode_record(&concrete()).unwrap();
        assert_eq!(record.log_num(), Some(7));
        assert_eq!(record.sequence(), Some(42));
        assert_eq!(record.comparator(), None);
        assert_eq!(record.next_num(), None);
        assert!(record.compact_pointers().is_empty());
        assert!(record.deleted_tables().is_empty());
        assert_eq!(
            record.new_tables(),
            &[NewTable {
                level: 1,
                number: 3,
                size: 1024,
                smallest: InternalKey::from("a"),
                largest: InternalKey::from("z"),
            }]
        );
    }

    #[test]
    fn reserved_tag_fails_regardless_of_payload() {
        for bytes in [vec![0x09], vec![0x09, 0x05], vec![0x02, 0x01, 0x09, 0x02, 0x03]] {
            let err = decode_record(&bytes).unwrap_err();
            assert!(err.is_unsupported_format(), "{bytes:?}: {err}");
        }
    }

    #[test]
    fn unknown_tags_are_skipped() {
        // 100, 0 and 8 are all unassigned.
        let bytes = [0x64, 0x02, 0x05, 0x00, 0x08, 0x06, 0x01, 0x02];
        let record = decode_record(&bytes).unwrap();
        assert_eq!(record.log_num(), Some(5));
        assert_eq!(
            record.deleted_tables(),
            &[DeletedTable {
                level: 1,
                number: 2
            }]
        );
    }

    #[test]
    fn multi_byte_unknown_tag_is_skipped() {
        // 300 as a two-byte varint.
        let bytes = [0xac, 0x02, 0x03, 0x11];
        let record = decode_record(&bytes).unwrap();
        assert_eq!(record.next_num(), Some(0x11));
    }

    #[test]
    fn truncated_scalar_leaves_field_absent() {
        let mut record = SessionRecord::new();
        let err = record.decode(&[0x04, 0x80]).unwrap_err();
        assert!(err.is_truncation());
        assert_eq!(record.sequence(), None);
    }

    #[test]
    fn missing_scalar_value_is_truncation() {
        let err = decode_record(&[0x02]).unwrap_err();
        assert!(matches!(
            err,
            CodecError::UnexpectedEof {
                field: "log number"
            }
        ));
    }

    #[test]
    fn every_mid_field_cut_fails() {
        let bytes = concrete();
        let boundaries = [0, 2, 4, bytes.len()];
        for cut in 0..=bytes.len() {
            let result = decode_record(&bytes[..cut]);
            if boundaries.contains(&cut) {
                assert!(result.is_ok(), "cut at {cut} should decode");
            } else {
                assert!(result.unwrap_err().is_truncation(), "cut at {cut}");
            }
        }
    }

    #[test]
    fn non_utf8_comparator_is_kept_as_bytes() {
        let bytes = [0x01, 0x02, 0xff, 0xfe];
        let record = decode_record(&bytes).unwrap();
        assert_eq!(record.comparator(), Some(&[0xff, 0xfe][..]));
        assert!(matches!(record.comparator_str(), Some(Err(_))));
        assert_eq!(&record.encode()[..], &bytes[..]);
    }

    #[test]
    fn wide_levels_decode() {
        // level = 2^32
        let bytes = [0x06, 0x80, 0x80, 0x80, 0x80, 0x10, 0x01];
        let record = decode_record(&bytes).unwrap();
        assert_eq!(
            record.deleted_tables(),
            &[DeletedTable {
                level: 1 << 32,
                number: 1
            }]
        );
        assert_eq!(&record.encode()[..], &bytes[..]);
    }

    #[test]
    fn oversized_key_rejected_by_config() {
        let bytes = [0x05, 0x00, 0x04, b'a', b'b', b'c', b'd'];
        let mut record = SessionRecord::new();
        let err = RecordDecoder::with_config(&bytes[..], DecodeConfig::new().max_bytes_len(3))
            .decode_into(&mut record)
            .unwrap_err();
        assert!(matches!(
            err,
            CodecError::SizeLimitExceeded {
                claimed: 4,
                max_allowed: 3
            }
        ));
        assert!(record.compact_pointers().is_empty());
    }

    #[test]
    fn decode_appends_to_existing_record() {
        let mut record = SessionRecord::new();
        record.delete_table(0, 1);
        record.set_log_num(99);
        record.decode(&[0x02, 0x03, 0x06, 0x00, 0x02]).unwrap();
        assert_eq!(record.log_num(), Some(3));
        assert_eq!(record.deleted_tables().len(), 2);
    }

    #[test]
    fn roundtrip_preserves_everything() {
        let mut record = SessionRecord::new();
        record.set_comparator("leveldb.BytewiseComparator");
        record.set_log_num(0);
        record.set_next_num(u64::MAX);
        record.add_compact_pointer(3, vec![0x00, 0xff, 0x80]);
        record.add_compact_pointer(1, "");
        record.delete_table(2, 17);
        record.add_table(0, 5, 0, "", "");
        record.add_table(Level::MAX, 6, 1 << 50, "k1", "k9");
        let decoded = decode_record(&record.encode()).unwrap();
        assert_eq!(decoded, record);
    }

    #[test]
    fn into_inner_returns_unread_source() {
        let bytes = [0x02, 0x01];
        let mut decoder = RecordDecoder::new(&bytes[..]);
        let mut record = SessionRecord::new();
        decoder.decode_into(&mut record).unwrap();
        assert!(decoder.into_inner().is_empty());
    }
}
