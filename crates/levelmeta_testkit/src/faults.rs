//! Fault-injecting byte sinks and sources.
//!
//! These stand in for a manifest file that fills up, a stream that hands out
//! one byte at a time, or a device that fails mid-read, so encoder and
//! decoder failure paths can be tested without touching the disk.

use std::io::{self, Read, Write};

/// A sink that accepts `budget` bytes, then rejects every write.
#[derive(Debug)]
pub struct FailingWriter {
    accepted: Vec<u8>,
    budget: usize,
    kind: io::ErrorKind,
    rejected_writes: usize,
}

impl FailingWriter {
    /// Accept up to `budget` bytes, then fail with `WriteZero` errors.
    #[must_use]
    pub fn new(budget: usize) -> Self {
        Self::with_kind(budget, io::ErrorKind::WriteZero)
    }

    /// Accept up to `budget` bytes, then fail with `kind`.
    #[must_use]
    pub fn with_kind(budget: usize, kind: io::ErrorKind) -> Self {
        Self {
            accepted: Vec::new(),
            budget,
            kind,
            rejected_writes: 0,
        }
    }

    /// Bytes accepted before the failure.
    #[must_use]
    pub fn accepted(&self) -> &[u8] {
        &self.accepted
    }

    /// Number of writes rejected so far.
    #[must_use]
    pub fn rejected_writes(&self) -> usize {
        self.rejected_writes
    }
}

impl Write for FailingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let room = self.budget - self.accepted.len();
        if room == 0 && !buf.is_empty() {
            self.rejected_writes += 1;
            return Err(io::Error::new(self.kind, "injected write failure"));
        }
        let n = room.min(buf.len());
        self.accepted.extend_from_slice(&buf[..n]);
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// A source that returns at most one byte per `read` call.
#[derive(Debug)]
pub struct ByteAtATimeReader<'a> {
    data: &'a [u8],
    reads: usize,
}

impl<'a> ByteAtATimeReader<'a> {
    /// Wrap `data`.
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, reads: 0 }
    }

    /// Number of `read` calls made.
    #[must_use]
    pub fn reads(&self) -> usize {
        self.reads
    }
}

impl Read for ByteAtATimeReader<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.reads += 1;
        match (self.data.split_first(), buf.first_mut()) {
            (Some((&byte, rest)), Some(slot)) => {
                *slot = byte;
                self.data = rest;
                Ok(1)
            }
            _ => Ok(0),
        }
    }
}

/// A source that reports `Interrupted` before every successful read.
#[derive(Debug)]
pub struct InterruptingReader<'a> {
    data: &'a [u8],
    interrupt_next: bool,
}

impl<'a> InterruptingReader<'a> {
    /// Wrap `data`.
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            interrupt_next: true,
        }
    }
}

impl Read for InterruptingReader<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.interrupt_next {
            self.interrupt_next = false;
            return Err(io::Error::from(io::ErrorKind::Interrupted));
        }
        self.interrupt_next = true;
        let n = self.data.len().min(buf.len()).min(1);
        buf[..n].copy_from_slice(&self.data[..n]);
        self.data = &self.data[n..];
        Ok(n)
    }
}

/// A source that yields `limit` bytes of `data`, then fails with `kind`.
#[derive(Debug)]
pub struct ErrorReader<'a> {
    data: &'a [u8],
    limit: usize,
    kind: io::ErrorKind,
}

impl<'a> ErrorReader<'a> {
    /// Serve the first `limit` bytes of `data`, then fail.
    #[must_use]
    pub fn new(data: &'a [u8], limit: usize, kind: io::ErrorKind) -> Self {
        Self { data, limit, kind }
    }
}

impl Read for ErrorReader<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.limit == 0 {
            return Err(io::Error::new(self.kind, "injected read failure"));
        }
        let n = self.limit.min(self.data.len()).min(buf.len());
        buf[..n].copy_from_slice(&self.data[..n]);
        self.data = &self.data[n..];
        self.limit -= n;
        Ok(n)
    }
}
