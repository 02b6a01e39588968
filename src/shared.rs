//! Constants and helpers shared between modules.

/// The order the code-length alphabet's lengths appear in a dynamic block
/// header (RFC 1951, 3.2.7).
pub const HUFFMAN_LENGTH_ORDER: [usize; 19] = [
    16, 17, 18, 0, 8, 7, 9, 6, 10, 5, 11, 4, 12, 3, 13, 2, 14, 1, 15,
];

/// Fold `data` into a running CRC-32 in the polynomial gzip trailers use.
///
/// Pass 0 as the initial value; the return value of one call is the input
/// of the next.
pub fn update_crc32(crc: u32, data: &[u8]) -> u32 {
    let mut hasher = crc32fast::Hasher::new_with_initial(crc);
    hasher.update(data);
    hasher.finalize()
}
