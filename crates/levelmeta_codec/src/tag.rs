//! Field tags of the session-record wire format.
//!
//! Tag values are written to disk and must never change or be reused.

use crate::varint::{encode_uvarint, MAX_VARINT_LEN64};

/// Identifies which field the following payload encodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u64)]
pub enum Tag {
    /// Name of the user-key comparator.
    Comparator = 1,
    /// Current write-ahead log file number.
    LogNum = 2,
    /// Next file number to allocate.
    NextNum = 3,
    /// Last sequence number written.
    Sequence = 4,
    /// Key at which the next compaction of a level resumes.
    CompactPointer = 5,
    /// Table file removed from a level.
    DeletedTable = 6,
    /// Table file added to a level.
    NewTable = 7,
    // 8 was used for large value refs.
    /// Previous log number. Reserved: readers refuse records containing it.
    PrevLogNum = 9,
}

/// Highest tag value in the registry.
pub const TAG_MAX: u64 = Tag::PrevLogNum as u64;

impl Tag {
    /// Look up a tag by its wire value. Unassigned values return `None`.
    #[must_use]
    pub const fn from_u64(value: u64) -> Option<Self> {
        match value {
            1 => Some(Self::Comparator),
            2 => Some(Self::LogNum),
            3 => Some(Self::NextNum),
            4 => Some(Self::Sequence),
            5 => Some(Self::CompactPointer),
            6 => Some(Self::DeletedTable),
            7 => Some(Self::NewTable),
            9 => Some(Self::PrevLogNum),
            _ => None,
        }
    }

    /// The wire value of this tag.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self as u64
    }

    /// The pre-encoded varint form of this tag.
    #[must_use]
    pub fn bytes(self) -> &'static [u8] {
        TAG_BYTES[self as usize].as_slice()
    }
}

/// Pre-encoded varint bytes for `value`, for every value up to [`TAG_MAX`].
#[must_use]
pub fn tag_bytes(value: u64) -> Option<&'static [u8]> {
    usize::try_from(value)
        .ok()
        .and_then(|i| TAG_BYTES.get(i))
        .map(EncodedTag::as_slice)
}

#[derive(Clone, Copy)]
struct EncodedTag {
    buf: [u8; MAX_VARINT_LEN64],
    len: usize,
}

impl EncodedTag {
    fn as_slice(&self) -> &[u8] {
        &self.buf[..self.len]
    }
}

#[allow(clippy::cast_possible_truncation)]
const TAG_TABLE_LEN: usize = TAG_MAX as usize + 1;

static TAG_BYTES: [EncodedTag; TAG_TABLE_LEN] = build_tag_table();

const fn build_tag_table() -> [EncodedTag; TAG_TABLE_LEN] {
    let mut table = [EncodedTag {
        buf: [0u8; MAX_VARINT_LEN64],
        len: 0,
    }; TAG_TABLE_LEN];
    let mut i = 0;
    while i < TAG_TABLE_LEN {
        let (buf, len) = encode_uvarint(i as u64);
        table[i] = EncodedTag { buf, len };
        i += 1;
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_values_are_frozen() {
        assert_eq!(Tag::Comparator.as_u64(), 1);
        assert_eq!(Tag::LogNum.as_u64(), 2);
        assert_eq!(Tag::NextNum.as_u64(), 3);
        assert_eq!(Tag::Sequence.as_u64(), 4);
        assert_eq!(Tag::CompactPointer.as_u64(), 5);
        assert_eq!(Tag::DeletedTable.as_u64(), 6);
        assert_eq!(Tag::NewTable.as_u64(), 7);
        assert_eq!(Tag::PrevLogNum.as_u64(), 9);
    }

    #[test]
    fn unassigned_values_are_unknown() {
        assert_eq!(Tag::from_u64(0), None);
        assert_eq!(Tag::from_u64(8), None);
        assert_eq!(Tag::from_u64(10), None);
        assert_eq!(Tag::from_u64(100), None);
        assert_eq!(Tag::from_u64(9), Some(Tag::PrevLogNum));
    }

    #[test]
    fn cached_bytes_match_varint() {
        for value in 0..=TAG_MAX {
            let (buf, len) = encode_uvarint(value);
            assert_eq!(tag_bytes(value), Some(&buf[..len]));
        }
        assert_eq!(Tag::NewTable.bytes(), &[0x07]);
        assert_eq!(tag_bytes(TAG_MAX + 1), None);
    }
}
