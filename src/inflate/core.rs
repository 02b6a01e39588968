//! The deflate block decoders and the literal/length symbol loop.

use std::io::Write;

use log::{debug, trace};

use crate::error::{Error, ErrorKind};
use crate::inflate::bit_reader::BitReader;
use crate::inflate::huffman::{DecodeTree, MAX_CODE_LENGTH};
use crate::inflate::output_buffer::OutputBuffer;
use crate::inflate::window::{Window, MAX_MATCH_LEN};
use crate::shared::HUFFMAN_LENGTH_ORDER;

/// Number of symbols in the literal/length alphabet.
const LITLEN_SYMBOLS: usize = 288;
/// Number of symbols in the distance alphabet.
const DIST_SYMBOLS: usize = 32;
/// The longest codeword of the code-length alphabet.
const MAX_CL_CODE_LENGTH: u8 = 7;

/// Literal/length symbol that terminates a block.
const END_OF_BLOCK: u16 = 256;
/// Largest distance symbol with a defined base; 30 and 31 exist in the
/// fixed code but never in valid data.
const MAX_DIST_SYMBOL: u16 = 29;

/// Base value for each length code, indexed by `symbol - 257`.
///
/// The base plus the value of the code's extra bits gives the match length.
#[rustfmt::skip]
const LENGTH_BASE: [u16; 29] = [
    3,  4,  5,  6,  7,  8,  9,  10,  11,  13,  15,  17,  19,  23, 27, 31,
    35, 43, 51, 59, 67, 83, 99, 115, 131, 163, 195, 227, 258,
];

/// Number of extra bits for each length code.
#[rustfmt::skip]
const LENGTH_EXTRA: [u8; 29] = [
    0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 1, 1, 2, 2, 2, 2,
    3, 3, 3, 3, 4, 4, 4, 4, 5, 5, 5, 5, 0,
];

/// Base value for each distance code.
#[rustfmt::skip]
const DIST_BASE: [u16; 30] = [
    1,    2,    3,    4,    5,    7,    9,     13,    17,    25,
    33,   49,   65,   97,   129,  193,  257,   385,   513,   769,
    1025, 1537, 2049, 3073, 4097, 6145, 8193, 12_289, 16_385, 24_577,
];

/// Number of extra bits for each distance code.
#[rustfmt::skip]
const DIST_EXTRA: [u8; 30] = [
    0, 0, 0, 0, 1, 1, 2, 2, 3, 3, 4, 4, 5, 5, 6, 6,
    7, 7, 8, 8, 9, 9, 10, 10, 11, 11, 12, 12, 13, 13,
];

/// Decode one member's sequence of deflate blocks, leaving the reader
/// aligned on the byte boundary where the trailer begins.
///
/// The window is created here and dropped here: back-references resolve
/// only against bytes emitted within the current member.
pub fn decompress<W: Write>(
    reader: &mut BitReader,
    out: &mut OutputBuffer<W>,
) -> Result<(), Error> {
    let mut window = Window::new();
    loop {
        let bfinal = reader.read_bits(1)?;
        let block_type = reader.read_bits(2)?;
        trace!("block type {block_type}, final {bfinal}");
        match block_type {
            0b00 => stored_block(reader, &mut window, out)?,
            0b01 => fixed_block(reader, &mut window, out)?,
            0b10 => dynamic_block(reader, &mut window, out)?,
            _ => return Err(reader.error(ErrorKind::ReservedBlockType)),
        }
        if bfinal == 1 {
            break;
        }
    }
    // The trailer starts at the next byte boundary.
    reader.align_to_byte();
    Ok(())
}

/// Append one decoded byte to the window, then to the output buffer.
#[inline]
fn emit<W: Write>(
    reader: &BitReader,
    window: &mut Window,
    out: &mut OutputBuffer<W>,
    byte: u8,
) -> Result<(), Error> {
    window.push(byte);
    out.append(byte).map_err(|kind| reader.error(kind))
}

/// An uncompressed block: byte-aligned length-prefixed literals.
fn stored_block<W: Write>(
    reader: &mut BitReader,
    window: &mut Window,
    out: &mut OutputBuffer<W>,
) -> Result<(), Error> {
    reader.align_to_byte();
    let len = reader.read_u16_le()?;
    let nlen = reader.read_u16_le()?;
    if len != !nlen {
        return Err(reader.error(ErrorKind::StoredLengthMismatch));
    }
    debug!("stored block, {len} bytes");
    let payload = reader.read_bytes(usize::from(len))?;
    for &byte in payload {
        emit(reader, window, out, byte)?;
    }
    Ok(())
}

/// A block coded with the fixed tables of RFC 1951, 3.2.6.
fn fixed_block<W: Write>(
    reader: &mut BitReader,
    window: &mut Window,
    out: &mut OutputBuffer<W>,
) -> Result<(), Error> {
    let mut litlen_lengths = [8u8; LITLEN_SYMBOLS];
    litlen_lengths[144..256].fill(9);
    litlen_lengths[256..280].fill(7);
    let litlen = DecodeTree::from_lengths(&litlen_lengths, MAX_CODE_LENGTH)
        .map_err(|kind| reader.error(kind))?;

    // All 32 distance codes are 5 bits wide; decoding through a tree keeps
    // the MSB-first codeword order, same as the dynamic path.
    let dist_lengths = [5u8; DIST_SYMBOLS];
    let dist = DecodeTree::from_lengths(&dist_lengths, MAX_CODE_LENGTH)
        .map_err(|kind| reader.error(kind))?;

    symbol_loop(reader, window, out, &litlen, &dist)
}

/// A block carrying its own huffman tables, themselves compressed with the
/// code-length alphabet.
fn dynamic_block<W: Write>(
    reader: &mut BitReader,
    window: &mut Window,
    out: &mut OutputBuffer<W>,
) -> Result<(), Error> {
    let hlit = reader.read_bits(5)?;
    let hdist = reader.read_bits(5)?;
    let hclen = reader.read_bits(4)?;
    let litlen_count = usize::from(hlit) + 257;
    let dist_count = usize::from(hdist) + 1;
    let code_length_count = usize::from(hclen) + 4;
    if litlen_count > 286 || dist_count > 32 || code_length_count > 19 {
        return Err(reader.error(ErrorKind::DynamicHeader));
    }
    debug!(
        "dynamic block: {litlen_count} literal/length, {dist_count} distance, \
         {code_length_count} code-length codes"
    );

    let mut code_length_lengths = [0u8; 19];
    for &slot in &HUFFMAN_LENGTH_ORDER[..code_length_count] {
        code_length_lengths[slot] = reader.read_bits(3)? as u8;
    }
    let code_length_tree = DecodeTree::from_lengths(&code_length_lengths, MAX_CL_CODE_LENGTH)
        .map_err(|kind| reader.error(kind))?;

    // Both length vectors are decoded as one flat sequence; repeats may
    // straddle the literal/length-to-distance boundary, so the split at
    // `litlen_count` happens only after the whole sequence exists.
    let total = litlen_count + dist_count;
    let mut lengths = [0u8; 286 + 32];
    let mut filled = 0usize;
    let mut previous: Option<u8> = None;
    while filled < total {
        let symbol = code_length_tree.decode(reader)?;
        match symbol {
            0..=15 => {
                lengths[filled] = symbol as u8;
                filled += 1;
                previous = Some(symbol as u8);
            }
            16 => {
                let Some(prev) = previous else {
                    return Err(reader.error(ErrorKind::NoPreviousLength));
                };
                let repeat = 3 + usize::from(reader.read_bits(2)?);
                repeat_length(&mut lengths, &mut filled, total, prev, repeat)
                    .map_err(|kind| reader.error(kind))?;
            }
            17 => {
                let repeat = 3 + usize::from(reader.read_bits(3)?);
                repeat_length(&mut lengths, &mut filled, total, 0, repeat)
                    .map_err(|kind| reader.error(kind))?;
                previous = Some(0);
            }
            18 => {
                let repeat = 11 + usize::from(reader.read_bits(7)?);
                repeat_length(&mut lengths, &mut filled, total, 0, repeat)
                    .map_err(|kind| reader.error(kind))?;
                previous = Some(0);
            }
            _ => return Err(reader.error(ErrorKind::MalformedCodes)),
        }
    }

    let litlen = DecodeTree::from_lengths(&lengths[..litlen_count], MAX_CODE_LENGTH)
        .map_err(|kind| reader.error(kind))?;
    let dist = DecodeTree::from_lengths(&lengths[litlen_count..total], MAX_CODE_LENGTH)
        .map_err(|kind| reader.error(kind))?;

    symbol_loop(reader, window, out, &litlen, &dist)
}

/// Write `count` copies of `value` into the length sequence.
fn repeat_length(
    lengths: &mut [u8],
    filled: &mut usize,
    total: usize,
    value: u8,
    count: usize,
) -> Result<(), ErrorKind> {
    if *filled + count > total {
        return Err(ErrorKind::RepeatOverflow);
    }
    lengths[*filled..*filled + count].fill(value);
    *filled += count;
    Ok(())
}

/// Decode literal/length symbols until the end-of-block marker.
fn symbol_loop<W: Write>(
    reader: &mut BitReader,
    window: &mut Window,
    out: &mut OutputBuffer<W>,
    litlen: &DecodeTree,
    dist: &DecodeTree,
) -> Result<(), Error> {
    let mut scratch = [0u8; MAX_MATCH_LEN];
    loop {
        let symbol = litlen.decode(reader)?;
        match symbol {
            0..=255 => emit(reader, window, out, symbol as u8)?,
            END_OF_BLOCK => return Ok(()),
            257..=285 => {
                let length = decode_length(reader, symbol)?;
                let dist_symbol = dist.decode(reader)?;
                let distance = decode_distance(reader, dist_symbol)?;
                copy_match(reader, window, out, length, distance, &mut scratch)?;
            }
            _ => return Err(reader.error(ErrorKind::InvalidSymbol)),
        }
    }
}

/// Resolve a length code (257..=285) against its base and extra bits.
fn decode_length(reader: &mut BitReader, symbol: u16) -> Result<usize, Error> {
    let index = usize::from(symbol - 257);
    let extra = reader.read_bits(u32::from(LENGTH_EXTRA[index]))?;
    // 227 + 31 would be 258, which has its own code (285).
    if symbol == 284 && extra == 31 {
        return Err(reader.error(ErrorKind::InvalidLengthExtra));
    }
    Ok(usize::from(LENGTH_BASE[index]) + usize::from(extra))
}

/// Resolve a distance code (0..=29) against its base and extra bits.
fn decode_distance(reader: &mut BitReader, symbol: u16) -> Result<usize, Error> {
    if symbol > MAX_DIST_SYMBOL {
        return Err(reader.error(ErrorKind::InvalidDistance));
    }
    let index = usize::from(symbol);
    let extra = reader.read_bits(u32::from(DIST_EXTRA[index]))?;
    Ok(usize::from(DIST_BASE[index]) + usize::from(extra))
}

/// Emit a back-reference copy through the window.
fn copy_match<W: Write>(
    reader: &BitReader,
    window: &mut Window,
    out: &mut OutputBuffer<W>,
    length: usize,
    distance: usize,
    scratch: &mut [u8; MAX_MATCH_LEN],
) -> Result<(), Error> {
    if !window.has_distance(distance) {
        return Err(reader.error(ErrorKind::InvalidDistance));
    }
    window.read_match(length, distance, scratch);
    for i in 0..length {
        emit(reader, window, out, scratch[i])?;
    }
    Ok(())
}
