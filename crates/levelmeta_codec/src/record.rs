//! The session record: one atomic set of manifest changes.

use std::fmt;
use std::str::Utf8Error;

use bytes::Bytes;

use crate::entry::{CompactPointer, DeletedTable, InternalKey, Level, NewTable, TableFile};

/// A set of structural changes to the table hierarchy.
///
/// Built incrementally by one producer through the mutators, then encoded
/// once and appended to the manifest. Scalar fields are absent until set;
/// entry lists keep append order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionRecord {
    pub(crate) comparator: Option<Bytes>,
    pub(crate) log_num: Option<u64>,
    pub(crate) next_num: Option<u64>,
    pub(crate) sequence: Option<u64>,
    pub(crate) compact_pointers: Vec<CompactPointer>,
    pub(crate) new_tables: Vec<NewTable>,
    pub(crate) deleted_tables: Vec<DeletedTable>,
}

impl SessionRecord {
    /// Creates an empty record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the comparator name.
    ///
    /// Names are opaque bytes on the wire; any `String`, `&'static str`,
    /// `Vec<u8>` or `Bytes` is accepted.
    pub fn set_comparator(&mut self, name: impl Into<Bytes>) {
        self.comparator = Some(name.into());
    }

    /// Sets the current log file number.
    pub fn set_log_num(&mut self, num: u64) {
        self.log_num = Some(num);
    }

    /// Sets the next file number to allocate.
    pub fn set_next_num(&mut self, num: u64) {
        self.next_num = Some(num);
    }

    /// Sets the last sequence number.
    pub fn set_sequence(&mut self, seq: u64) {
        self.sequence = Some(seq);
    }

    /// Appends a compaction pointer.
    pub fn add_compact_pointer(&mut self, level: Level, key: impl Into<InternalKey>) {
        self.compact_pointers.push(CompactPointer {
            level,
            key: key.into(),
        });
    }

    /// Appends a new table. Bounds ordering is the caller's concern.
    pub fn add_table(
        &mut self,
        level: Level,
        number: u64,
        size: u64,
        smallest: impl Into<InternalKey>,
        largest: impl Into<InternalKey>,
    ) {
        self.new_tables.push(NewTable {
            level,
            number,
            size,
            smallest: smallest.into(),
            largest: largest.into(),
        });
    }

    /// Appends a new table described by an open table handle.
    pub fn add_table_file<T: TableFile + ?Sized>(&mut self, level: Level, table: &T) {
        self.add_table(
            level,
            table.number(),
            table.size(),
            table.smallest().clone(),
            table.largest().clone(),
        );
    }

    /// Appends a deleted table.
    pub fn delete_table(&mut self, level: Level, number: u64) {
        self.deleted_tables.push(DeletedTable { level, number });
    }

    /// Comparator name bytes, if set.
    #[must_use]
    pub fn comparator(&self) -> Option<&[u8]> {
        self.comparator.as_deref()
    }

    /// Comparator name as text, if set. The inner result fails for names
    /// that are not UTF-8.
    #[must_use]
    pub fn comparator_str(&self) -> Option<Result<&str, Utf8Error>> {
        self.comparator().map(std::str::from_utf8)
    }

    /// Log file number, if set.
    #[must_use]
    pub fn log_num(&self) -> Option<u64> {
        self.log_num
    }

    /// Next file number, if set.
    #[must_use]
    pub fn next_num(&self) -> Option<u64> {
        self.next_num
    }

    /// Last sequence number, if set.
    #[must_use]
    pub fn sequence(&self) -> Option<u64> {
        self.sequence
    }

    /// Compaction pointers in append order.
    #[must_use]
    pub fn compact_pointers(&self) -> &[CompactPointer] {
        &self.compact_pointers
    }

    /// New tables in append order.
    #[must_use]
    pub fn new_tables(&self) -> &[NewTable] {
        &self.new_tables
    }

    /// Deleted tables in append order.
    #[must_use]
    pub fn deleted_tables(&self) -> &[DeletedTable] {
        &self.deleted_tables
    }

    /// Returns true if no field is set and every entry list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.comparator.is_none()
            && self.log_num.is_none()
            && self.next_num.is_none()
            && self.sequence.is_none()
            && self.compact_pointers.is_empty()
            && self.new_tables.is_empty()
            && self.deleted_tables.is_empty()
    }

    /// Resets every field, keeping list allocations for reuse.
    pub fn clear(&mut self) {
        self.comparator = None;
        self.log_num = None;
        self.next_num = None;
        self.sequence = None;
        self.compact_pointers.clear();
        self.new_tables.clear();
        self.deleted_tables.clear();
    }
}

impl fmt::Display for SessionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "SessionRecord {{")?;
        if let Some(name) = &self.comparator {
            writeln!(f, "  Comparator: {}", name.escape_ascii())?;
        }
        if let Some(num) = self.log_num {
            writeln!(f, "  LogNumber: {num}")?;
        }
        if let Some(num) = self.next_num {
            writeln!(f, "  NextFile: {num}")?;
        }
        if let Some(seq) = self.sequence {
            writeln!(f, "  LastSeq: {seq}")?;
        }
        for cp in &self.compact_pointers {
            writeln!(f, "  CompactPointer: {} {}", cp.level, cp.key)?;
        }
        for dt in &self.deleted_tables {
            writeln!(f, "  DeleteFile: {} {}", dt.level, dt.number)?;
        }
        for nt in &self.new_tables {
            writeln!(
                f,
                "  AddFile: {} {} {} {} .. {}",
                nt.level, nt.number, nt.size, nt.smallest, nt.largest
            )?;
        }
        write!(f, "}}")
    }
}
