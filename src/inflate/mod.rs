//! The deflate decompression core.
//!
//! `core::decompress` drives one member's block sequence; the sibling
//! modules hold the pieces it is built from: bit-level input, huffman
//! tables, the sliding window and the buffered output page.

pub(crate) mod bit_reader;
pub(crate) mod core;
mod huffman;
pub(crate) mod output_buffer;
mod window;
