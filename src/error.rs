//! Error types returned by the decompression entry points.

/// The reason a decompression failed.
///
/// Every variant is fatal to the decompression that produced it; nothing is
/// retried and no partial success is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
pub enum ErrorKind {
    /// The input ended before a required field was fully read.
    #[error("input ended before a required field was fully read")]
    Truncated,
    /// The member does not start with the gzip magic bytes `0x1f 0x8b`.
    #[error("missing gzip magic bytes")]
    BadMagic,
    /// The member header names a compression method other than deflate.
    #[error("unsupported compression method")]
    UnsupportedMethod,
    /// One of the reserved bits 5..7 of the header flag byte is set.
    #[error("reserved header flag bits are set")]
    ReservedFlagBits,
    /// A block header carried the reserved block type `0b11`.
    #[error("reserved block type")]
    ReservedBlockType,
    /// A stored block's `LEN` field is not the complement of `NLEN`.
    #[error("stored block length does not match its complement field")]
    StoredLengthMismatch,
    /// A dynamic block header declared an out-of-range code count.
    #[error("dynamic block header code count out of range")]
    DynamicHeader,
    /// The code-length sequence repeated a previous length before any
    /// length had been decoded.
    #[error("length repeat without a previous code length")]
    NoPreviousLength,
    /// A code-length repeat would overrun the declared number of lengths.
    #[error("code length repeat overruns the declared count")]
    RepeatOverflow,
    /// A code length exceeds the limit of its alphabet.
    #[error("code length exceeds the alphabet limit")]
    InvalidLengths,
    /// The code lengths do not describe a usable prefix code, or the
    /// stream contained a code missing from the table.
    #[error("malformed huffman code set")]
    MalformedCodes,
    /// A decoded literal/length symbol lies outside the alphabet.
    #[error("literal/length symbol out of range")]
    InvalidSymbol,
    /// Length code 284 carried the maximal extra value, which encodes
    /// length 258; that length has its own code.
    #[error("length code 284 with reserved extra bits value")]
    InvalidLengthExtra,
    /// A back-reference reaches behind the bytes emitted so far, or a
    /// decoded distance symbol lies outside the alphabet.
    #[error("back-reference distance out of range")]
    InvalidDistance,
    /// The output sink failed to accept a full page.
    #[error("short write to the output sink")]
    SinkWriteShort,
    /// The trailer CRC-32 does not match the decompressed data.
    #[error("trailer checksum does not match the decompressed data")]
    ChecksumMismatch,
    /// The trailer ISIZE does not match the decompressed length.
    #[error("trailer size field does not match the decompressed length")]
    SizeMismatch,
}

/// A decompression failure, with the input byte offset where it surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("{kind} (input byte {offset})")]
pub struct Error {
    /// What went wrong.
    pub kind: ErrorKind,
    /// Offset of the next unread input byte at the time of failure.
    pub offset: usize,
}

impl Error {
    pub(crate) fn at(kind: ErrorKind, offset: usize) -> Error {
        Error { kind, offset }
    }
}
