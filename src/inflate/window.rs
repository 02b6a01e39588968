//! The sliding window of recently emitted bytes.
//!
//! Back-references never read from the output buffer; they resolve against
//! this cyclic record of the last 32 KiB the decoder produced.

/// Window size fixed by the deflate format.
pub const WINDOW_SIZE: usize = 32 * 1024;
/// The longest run a single back-reference can produce.
pub const MAX_MATCH_LEN: usize = 258;

pub struct Window {
    buf: [u8; WINDOW_SIZE],
    /// Slot the next emitted byte lands in.
    pos: usize,
    /// Set once the write index has wrapped, after which every distance
    /// is backed by real history.
    filled: bool,
}

impl Window {
    pub fn new() -> Window {
        Window {
            buf: [0; WINDOW_SIZE],
            pos: 0,
            filled: false,
        }
    }

    /// Record one emitted byte.
    #[inline]
    pub fn push(&mut self, byte: u8) {
        self.buf[self.pos] = byte;
        self.pos = (self.pos + 1) % WINDOW_SIZE;
        if self.pos == 0 {
            self.filled = true;
        }
    }

    /// Whether `distance` bytes of history have been written.
    pub fn has_distance(&self, distance: usize) -> bool {
        self.filled || distance <= self.pos
    }

    /// Read a `length`-byte match starting `distance` bytes back into
    /// `scratch[..length]`.
    ///
    /// When `length > distance` the read cursor wraps back to the start of
    /// the match on reaching the write position, cyclically repeating the
    /// bytes just written; pushing the scratch contents afterwards then
    /// reproduces the overlapping-copy semantics of LZ77.
    pub fn read_match(
        &self,
        length: usize,
        distance: usize,
        scratch: &mut [u8; MAX_MATCH_LEN],
    ) {
        debug_assert!(self.has_distance(distance));
        debug_assert!(length <= MAX_MATCH_LEN);
        let start = (self.pos + WINDOW_SIZE - distance) % WINDOW_SIZE;
        let mut from = start;
        for slot in scratch[..length].iter_mut() {
            *slot = self.buf[from];
            from = (from + 1) % WINDOW_SIZE;
            if from == self.pos {
                from = start;
            }
        }
    }

    #[cfg(test)]
    fn last_emitted(&self) -> u8 {
        self.buf[(self.pos + WINDOW_SIZE - 1) % WINDOW_SIZE]
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn push_records_the_byte_at_the_write_index() {
        let mut window = Window::new();
        for byte in 0..=255u8 {
            window.push(byte);
            assert_eq!(window.last_emitted(), byte);
        }
    }

    #[test]
    fn distances_grow_with_history() {
        let mut window = Window::new();
        assert!(!window.has_distance(1));
        window.push(b'x');
        assert!(window.has_distance(1));
        assert!(!window.has_distance(2));
    }

    #[test]
    fn full_window_accepts_any_distance() {
        let mut window = Window::new();
        for i in 0..WINDOW_SIZE {
            window.push(i as u8);
        }
        assert!(window.has_distance(WINDOW_SIZE));
        // The write index wrapped to 0; history is still complete.
        window.push(0xab);
        assert!(window.has_distance(WINDOW_SIZE));
    }

    #[test]
    fn overlapping_match_repeats_the_pattern() {
        let mut window = Window::new();
        window.push(b'a');
        let mut scratch = [0u8; MAX_MATCH_LEN];
        window.read_match(3, 1, &mut scratch);
        assert_eq!(&scratch[..3], b"aaa");

        window.push(b'b');
        window.push(b'c');
        // distance 2, length 5 cycles over the last two bytes.
        window.read_match(5, 2, &mut scratch);
        assert_eq!(&scratch[..5], b"bcbcb");
    }

    #[test]
    fn match_across_the_wrap_point() {
        let mut window = Window::new();
        for i in 0..WINDOW_SIZE + 2 {
            window.push((i % 251) as u8);
        }
        let mut scratch = [0u8; MAX_MATCH_LEN];
        // Reaches back across slot 0 into the tail of the buffer.
        window.read_match(4, 4, &mut scratch);
        let expect: Vec<u8> = (WINDOW_SIZE - 2..WINDOW_SIZE + 2)
            .map(|i| (i % 251) as u8)
            .collect();
        assert_eq!(&scratch[..4], expect.as_slice());
    }
}
