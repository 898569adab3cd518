//! Session record encoder.
//!
//! Fields are written tag-first in a fixed order: comparator, log number,
//! next file number, last sequence, then every compaction pointer, deleted
//! table and new table in append order. There is no record-level length or
//! checksum; the enclosing log format frames the record.

use std::convert::Infallible;
use std::io::{self, Write};

use bytes::{Bytes, BytesMut};

use crate::error::CodecResult;
use crate::record::SessionRecord;
use crate::tag::Tag;
use crate::varint::{encode_uvarint, uvarint_len, write_length_prefixed, write_uvarint};

/// Encode a record into a fresh buffer.
#[must_use]
pub fn encode_record(record: &SessionRecord) -> Bytes {
    record.encode()
}

/// Destination for encoded bytes. Lets the in-memory path stay infallible
/// while sharing the field walk with the I/O path.
trait Sink {
    type Error;

    fn put(&mut self, bytes: &[u8]) -> Result<(), Self::Error>;

    fn put_tag(&mut self, tag: Tag) -> Result<(), Self::Error> {
        self.put(tag.bytes())
    }

    fn put_uvarint(&mut self, value: u64) -> Result<(), Self::Error> {
        let (buf, len) = encode_uvarint(value);
        self.put(&buf[..len])
    }

    fn put_length_prefixed(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        self.put_uvarint(bytes.len() as u64)?;
        self.put(bytes)
    }
}

struct IoSink<'a, W: ?Sized>(&'a mut W);

impl<W: Write + ?Sized> Sink for IoSink<'_, W> {
    type Error = io::Error;

    fn put(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.0.write_all(bytes)
    }

    fn put_uvarint(&mut self, value: u64) -> io::Result<()> {
        write_uvarint(&mut *self.0, value)
    }

    fn put_length_prefixed(&mut self, bytes: &[u8]) -> io::Result<()> {
        write_length_prefixed(&mut *self.0, bytes)
    }
}

impl Sink for BytesMut {
    type Error = Infallible;

    fn put(&mut self, bytes: &[u8]) -> Result<(), Infallible> {
        self.extend_from_slice(bytes);
        Ok(())
    }
}

fn write_fields<S: Sink>(record: &SessionRecord, sink: &mut S) -> Result<(), S::Error> {
    if let Some(name) = &record.comparator {
        sink.put_tag(Tag::Comparator)?;
        sink.put_length_prefixed(name)?;
    }
    if let Some(num) = record.log_num {
        sink.put_tag(Tag::LogNum)?;
        sink.put_uvarint(num)?;
    }
    if let Some(num) = record.next_num {
        sink.put_tag(Tag::NextNum)?;
        sink.put_uvarint(num)?;
    }
    if let Some(seq) = record.sequence {
        sink.put_tag(Tag::Sequence)?;
        sink.put_uvarint(seq)?;
    }
    for cp in &record.compact_pointers {
        sink.put_tag(Tag::CompactPointer)?;
        sink.put_uvarint(cp.level)?;
        sink.put_length_prefixed(cp.key.as_bytes())?;
    }
    for dt in &record.deleted_tables {
        sink.put_tag(Tag::DeletedTable)?;
        sink.put_uvarint(dt.level)?;
        sink.put_uvarint(dt.number)?;
    }
    for nt in &record.new_tables {
        sink.put_tag(Tag::NewTable)?;
        sink.put_uvarint(nt.level)?;
        sink.put_uvarint(nt.number)?;
        sink.put_uvarint(nt.size)?;
        sink.put_length_prefixed(nt.smallest.as_bytes())?;
        sink.put_length_prefixed(nt.largest.as_bytes())?;
    }
    Ok(())
}

fn prefixed_len(len: usize) -> usize {
    uvarint_len(len as u64) + len
}

impl SessionRecord {
    /// Write the encoded record to `w`.
    ///
    /// The record is not modified. On failure the sink may hold a partial
    /// record; discarding it is the caller's job.
    ///
    /// # Errors
    ///
    /// Returns the first write error reported by `w`.
    pub fn encode_to<W: Write + ?Sized>(&self, w: &mut W) -> CodecResult<()> {
        write_fields(self, &mut IoSink(w))?;
        Ok(())
    }

    /// Encode the record into a fresh buffer.
    #[must_use]
    pub fn encode(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(self.encoded_len());
        match write_fields(self, &mut buf) {
            Ok(()) => buf.freeze(),
            Err(never) => match never {},
        }
    }

    /// Exact number of bytes [`encode`](Self::encode) produces.
    #[must_use]
    pub fn encoded_len(&self) -> usize {
        // Every tag is a single byte.
        let mut len = 0;
        if let Some(name) = &self.comparator {
            len += 1 + prefixed_len(name.len());
        }
        for num in [self.log_num, self.next_num, self.sequence].into_iter().flatten() {
            len += 1 + uvarint_len(num);
        }
        for cp in &self.compact_pointers {
            len += 1 + uvarint_len(cp.level) + prefixed_len(cp.key.len());
        }
        for dt in &self.deleted_tables {
            len += 1 + uvarint_len(dt.level) + uvarint_len(dt.number);
        }
        for nt in &self.new_tables {
            len += 1
                + uvarint_len(nt.level)
                + uvarint_len(nt.number)
                + uvarint_len(nt.size)
                + prefixed_len(nt.smallest.len())
                + prefixed_len(nt.largest.len());
        }
        len
    }
}
