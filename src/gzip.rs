//! gzip member framing (RFC 1952).
//!
//! A gzip file is a sequence of members, each a header, a deflate stream
//! and an 8-byte trailer. Members are decompressed in order until the
//! input is exhausted; each gets a fresh sliding window, so a
//! back-reference can never reach into the previous member's output.

use std::io::Write;

use log::debug;

use crate::error::{Error, ErrorKind};
use crate::inflate::bit_reader::BitReader;
use crate::inflate::core;
use crate::inflate::output_buffer::OutputBuffer;

const MAGIC: [u8; 2] = [0x1f, 0x8b];
/// The only compression method RFC 1952 defines.
const METHOD_DEFLATE: u8 = 8;

// Header flag bits. FTEXT (bit 0) is a hint and needs no handling.
const FHCRC: u8 = 1 << 1;
const FEXTRA: u8 = 1 << 2;
const FNAME: u8 = 1 << 3;
const FCOMMENT: u8 = 1 << 4;
const RESERVED_FLAGS: u8 = 0b1110_0000;

/// Decompress every member of `input`, appending the output to `sink`.
///
/// On failure nothing is retried and the sink may hold a partial prefix of
/// the output; discarding it is the caller's responsibility.
pub fn decompress<W: Write>(input: &[u8], sink: &mut W) -> Result<(), Error> {
    let mut reader = BitReader::new(input);
    loop {
        read_header(&mut reader)?;
        let mut out = OutputBuffer::new(sink);
        core::decompress(&mut reader, &mut out)?;
        out.flush().map_err(|kind| reader.error(kind))?;
        read_trailer(&mut reader, out.checksum(), out.total_out())?;
        debug!("member done, {} bytes out", out.total_out());
        if reader.is_empty() {
            return Ok(());
        }
    }
}

/// Decompress every member of `input` into a freshly allocated vector.
pub fn decompress_to_vec(input: &[u8]) -> Result<Vec<u8>, Error> {
    let mut out = Vec::with_capacity(input.len() * 2);
    decompress(input, &mut out)?;
    Ok(out)
}

/// Parse one member header, leaving the reader at the first deflate block.
fn read_header(reader: &mut BitReader) -> Result<(), Error> {
    if reader.read_bytes(2)? != MAGIC {
        return Err(reader.error(ErrorKind::BadMagic));
    }
    if reader.read_u8()? != METHOD_DEFLATE {
        return Err(reader.error(ErrorKind::UnsupportedMethod));
    }
    let flags = reader.read_u8()?;
    if flags & RESERVED_FLAGS != 0 {
        return Err(reader.error(ErrorKind::ReservedFlagBits));
    }
    // MTIME (4), XFL, OS: parsed and ignored.
    reader.skip_bytes(6)?;
    if flags & FEXTRA != 0 {
        let xlen = reader.read_u16_le()?;
        reader.skip_bytes(usize::from(xlen))?;
    }
    if flags & FNAME != 0 {
        skip_zero_terminated(reader)?;
    }
    if flags & FCOMMENT != 0 {
        skip_zero_terminated(reader)?;
    }
    if flags & FHCRC != 0 {
        reader.skip_bytes(2)?;
    }
    debug!("member header parsed, flags {flags:#04x}");
    Ok(())
}

fn skip_zero_terminated(reader: &mut BitReader) -> Result<(), Error> {
    while reader.read_u8()? != 0 {}
    Ok(())
}

/// Check the member trailer against what was actually emitted.
fn read_trailer(reader: &mut BitReader, crc: u32, total_out: u64) -> Result<(), Error> {
    if reader.read_u32_le()? != crc {
        return Err(reader.error(ErrorKind::ChecksumMismatch));
    }
    // ISIZE is the uncompressed length modulo 2^32.
    if reader.read_u32_le()? != total_out as u32 {
        return Err(reader.error(ErrorKind::SizeMismatch));
    }
    Ok(())
}
