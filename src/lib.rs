//! A pure Rust decompressor for the gzip file format.
//!
//! Implements the deflate compressed data format (RFC 1951) and the gzip
//! container around it (RFC 1952): canonical huffman decoding, the 32 KiB
//! sliding window, all three block types and multi-member files. Member
//! trailers are verified against the decompressed output.
//!
//! The whole compressed input is taken as one in-memory slice; output goes
//! to any [`std::io::Write`] sink.
//!
//! # Usage
//! ```
//! // A single-member file holding one stored block with the text "hello".
//! let data = [
//!     0x1f, 0x8b, 0x08, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x03,
//!     0x01, 0x05, 0x00, 0xfa, 0xff, b'h', b'e', b'l', b'l', b'o',
//!     0x86, 0xa6, 0x10, 0x36, 0x05, 0x00, 0x00, 0x00,
//! ];
//! let decoded = ungzip::gzip::decompress_to_vec(&data).unwrap();
//! assert_eq!(decoded, b"hello");
//! ```

mod error;
pub mod gzip;
mod inflate;
mod shared;

pub use error::{Error, ErrorKind};
