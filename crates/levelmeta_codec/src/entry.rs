//! Entry types carried by a session record.

use std::fmt;

use bytes::Bytes;

/// Index of a level in the leveled table hierarchy.
pub type Level = u64;

/// An internal key: user key plus sequence number and value type.
///
/// The layout is owned by the engine's comparator; this crate only moves the
/// bytes around.
#[derive(Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InternalKey(Bytes);

impl InternalKey {
    /// Wrap raw key bytes.
    #[must_use]
    pub fn new(bytes: impl Into<Bytes>) -> Self {
        Self(bytes.into())
    }

    /// The raw key bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the key has no bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consume the key, returning the underlying buffer.
    #[must_use]
    pub fn into_bytes(self) -> Bytes {
        self.0
    }
}

impl AsRef<[u8]> for InternalKey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for InternalKey {
    fn from(bytes: Vec<u8>) -> Self {
        Self(Bytes::from(bytes))
    }
}

impl From<&[u8]> for InternalKey {
    fn from(bytes: &[u8]) -> Self {
        Self(Bytes::copy_from_slice(bytes))
    }
}

impl From<&'static str> for InternalKey {
    fn from(s: &'static str) -> Self {
        Self(Bytes::from_static(s.as_bytes()))
    }
}

impl From<Bytes> for InternalKey {
    fn from(bytes: Bytes) -> Self {
        Self(bytes)
    }
}

impl fmt::Debug for InternalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "InternalKey(\"{}\")", self.0.escape_ascii())
    }
}

impl fmt::Display for InternalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.escape_ascii())
    }
}

/// Where the next compaction of `level` resumes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompactPointer {
    /// Level the pointer applies to.
    pub level: Level,
    /// Smallest key the next compaction starts from.
    pub key: InternalKey,
}

/// A table file added to a level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTable {
    /// Level the table is added to.
    pub level: Level,
    /// File number of the table.
    pub number: u64,
    /// File size in bytes.
    pub size: u64,
    /// Smallest internal key in the table.
    pub smallest: InternalKey,
    /// Largest internal key in the table.
    pub largest: InternalKey,
}

impl NewTable {
    /// Turn this entry into a live table handle through `opener`.
    pub fn open_with<O: TableOpener + ?Sized>(&self, opener: &O) -> O::Table {
        opener.open_table(self.number, self.size, &self.smallest, &self.largest)
    }
}

/// A table file removed from a level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeletedTable {
    /// Level the table is removed from.
    pub level: Level,
    /// File number of the table.
    pub number: u64,
}

/// A table file handle a new-table entry can be built from.
pub trait TableFile {
    /// File number.
    fn number(&self) -> u64;
    /// File size in bytes.
    fn size(&self) -> u64;
    /// Smallest internal key.
    fn smallest(&self) -> &InternalKey;
    /// Largest internal key.
    fn largest(&self) -> &InternalKey;
}

/// Builds table handles from decoded new-table entries during replay.
pub trait TableOpener {
    /// Handle type produced for the caller's version state.
    type Table;

    /// Produce a handle for the table with the given number, size and bounds.
    fn open_table(
        &self,
        number: u64,
        size: u64,
        smallest: &InternalKey,
        largest: &InternalKey,
    ) -> Self::Table;
}
