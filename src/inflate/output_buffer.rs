//! Page-buffered writes to the output sink.

use std::io::Write;

use crate::error::ErrorKind;
use crate::shared::update_crc32;

/// Bytes collected before the sink sees a write.
pub const PAGE_SIZE: usize = 8192;

/// A fixed page in front of the output sink.
///
/// Every byte the decoder emits passes through here. The buffer also keeps
/// the running CRC-32 and byte count of everything it has flushed, which is
/// what the member trailer is checked against.
pub struct OutputBuffer<'a, W: Write> {
    sink: &'a mut W,
    page: [u8; PAGE_SIZE],
    used: usize,
    crc: u32,
    total_out: u64,
}

impl<'a, W: Write> OutputBuffer<'a, W> {
    pub fn new(sink: &'a mut W) -> OutputBuffer<'a, W> {
        OutputBuffer {
            sink,
            page: [0; PAGE_SIZE],
            used: 0,
            crc: 0,
            total_out: 0,
        }
    }

    /// Store one byte, flushing the page if it is now full.
    #[inline]
    pub fn append(&mut self, byte: u8) -> Result<(), ErrorKind> {
        self.page[self.used] = byte;
        self.used += 1;
        if self.used == PAGE_SIZE {
            self.flush()?;
        }
        Ok(())
    }

    /// Write the buffered page to the sink.
    ///
    /// Must also be called once at end of stream for the residual page.
    pub fn flush(&mut self) -> Result<(), ErrorKind> {
        if self.used == 0 {
            return Ok(());
        }
        let page = &self.page[..self.used];
        self.crc = update_crc32(self.crc, page);
        self.total_out += self.used as u64;
        self.sink
            .write_all(page)
            .map_err(|_| ErrorKind::SinkWriteShort)?;
        self.used = 0;
        Ok(())
    }

    /// CRC-32 of everything flushed so far.
    pub fn checksum(&self) -> u32 {
        self.crc
    }

    /// Number of bytes flushed so far.
    pub fn total_out(&self) -> u64 {
        self.total_out
    }
}
