//! Unsigned LEB128 varints and length-prefixed byte strings.
//!
//! Seven payload bits per byte, least significant group first. Every byte
//! except the last has the continuation bit (`0x80`) set.

use std::io::{self, Read, Write};

use crate::error::{CodecError, CodecResult};

/// Maximum encoded width of a `u64`.
pub const MAX_VARINT_LEN64: usize = 10;

/// Encode `value` into a fixed buffer, returning the buffer and the number
/// of bytes used.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub const fn encode_uvarint(mut value: u64) -> ([u8; MAX_VARINT_LEN64], usize) {
    let mut buf = [0u8; MAX_VARINT_LEN64];
    let mut i = 0;
    while value >= 0x80 {
        buf[i] = (value as u8) | 0x80;
        value >>= 7;
        i += 1;
    }
    buf[i] = value as u8;
    (buf, i + 1)
}

/// Number of bytes `value` occupies once encoded.
#[must_use]
pub const fn uvarint_len(mut value: u64) -> usize {
    let mut len = 1;
    while value >= 0x80 {
        value >>= 7;
        len += 1;
    }
    len
}

/// Write `value` as a varint.
pub fn write_uvarint<W: Write + ?Sized>(w: &mut W, value: u64) -> io::Result<()> {
    let (buf, len) = encode_uvarint(value);
    w.write_all(&buf[..len])
}

/// Read a single byte, retrying on `Interrupted`. `None` means the source
/// is exhausted.
pub(crate) fn read_byte<R: Read + ?Sized>(r: &mut R) -> io::Result<Option<u8>> {
    let mut buf = [0u8; 1];
    loop {
        match r.read(&mut buf) {
            Ok(0) => return Ok(None),
            Ok(_) => return Ok(Some(buf[0])),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
}

/// Read a varint one byte at a time.
///
/// Returns `Ok(None)` only when the source is exhausted before the first
/// byte. Running out after that is [`CodecError::UnexpectedEof`].
///
/// # Errors
///
/// Fails on I/O errors, truncation inside the varint, or encodings that do
/// not fit in 64 bits.
pub fn read_uvarint<R: Read + ?Sized>(r: &mut R) -> CodecResult<Option<u64>> {
    let mut value = 0u64;
    let mut shift = 0u32;
    for i in 0..MAX_VARINT_LEN64 {
        let Some(byte) = read_byte(r)? else {
            if i == 0 {
                return Ok(None);
            }
            return Err(CodecError::unexpected_eof("varint"));
        };
        if byte < 0x80 {
            if i == MAX_VARINT_LEN64 - 1 && byte > 1 {
                return Err(CodecError::VarintOverflow);
            }
            return Ok(Some(value | (u64::from(byte) << shift)));
        }
        value |= u64::from(byte & 0x7f) << shift;
        shift += 7;
    }
    Err(CodecError::VarintOverflow)
}

/// Read a varint that must be present; exhaustion is reported against `field`.
///
/// # Errors
///
/// As [`read_uvarint`], with a clean end of input also treated as truncation.
pub fn read_uvarint_field<R: Read + ?Sized>(r: &mut R, field: &'static str) -> CodecResult<u64> {
    read_uvarint(r)?.ok_or(CodecError::UnexpectedEof { field })
}

/// Write a varint length followed by the raw bytes.
pub fn write_length_prefixed<W: Write + ?Sized>(w: &mut W, bytes: &[u8]) -> io::Result<()> {
    write_uvarint(w, bytes.len() as u64)?;
    w.write_all(bytes)
}

/// Read a varint length followed by exactly that many bytes.
///
/// The payload is read through a bounded reader, so a hostile length cannot
/// force a large allocation before the bytes actually arrive.
///
/// # Errors
///
/// Fails with [`CodecError::SizeLimitExceeded`] if the length is above
/// `max_len`, and [`CodecError::UnexpectedEof`] if fewer bytes follow.
pub fn read_length_prefixed<R: Read + ?Sized>(
    r: &mut R,
    max_len: u64,
    field: &'static str,
) -> CodecResult<Vec<u8>> {
    let len = read_uvarint_field(r, field)?;
    if len > max_len {
        return Err(CodecError::SizeLimitExceeded {
            claimed: len,
            max_allowed: max_len,
        });
    }
    let mut buf = Vec::new();
    (&mut *r).take(len).read_to_end(&mut buf)?;
    if buf.len() as u64 != len {
        return Err(CodecError::UnexpectedEof { field });
    }
    Ok(buf)
}
