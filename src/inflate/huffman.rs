//! Canonical huffman codes and the tree they are decoded through.
//!
//! A code is described only by the length of each symbol's codeword;
//! the bit patterns follow from the canonical rule of RFC 1951, 3.2.2:
//! shorter codes sort before longer ones, and symbols sharing a length
//! get consecutive patterns in symbol order.

use crate::error::{Error, ErrorKind};
use crate::inflate::bit_reader::BitReader;

/// The largest alphabet a deflate code can cover (literal/length).
pub const MAX_SYMBOLS: usize = 288;
/// The longest codeword any deflate alphabet permits.
pub const MAX_CODE_LENGTH: u8 = 15;

/// A canonical codeword; `len == 0` means the symbol is absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Codeword {
    len: u8,
    bits: u16,
}

/// Assign the canonical bit pattern to every coded symbol.
///
/// Fails with `InvalidLengths` if any length exceeds `limit`. The result is
/// not checked for completeness; an over-subscribed set of lengths produces
/// colliding patterns which tree construction rejects.
fn assign_codewords(
    lengths: &[u8],
    limit: u8,
) -> Result<[Codeword; MAX_SYMBOLS], ErrorKind> {
    debug_assert!(lengths.len() <= MAX_SYMBOLS);
    debug_assert!(limit <= MAX_CODE_LENGTH);

    let mut count = [0u32; MAX_CODE_LENGTH as usize + 1];
    for &len in lengths {
        if len > limit {
            return Err(ErrorKind::InvalidLengths);
        }
        count[usize::from(len)] += 1;
    }
    count[0] = 0;

    // first_code(len) = (first_code(len - 1) + count(len - 1)) << 1
    let mut next_code = [0u32; MAX_CODE_LENGTH as usize + 1];
    let mut code = 0u32;
    for len in 1..=usize::from(limit) {
        code = (code + count[len - 1]) << 1;
        next_code[len] = code;
    }

    let mut codewords = [Codeword::default(); MAX_SYMBOLS];
    for (codeword, &len) in codewords.iter_mut().zip(lengths) {
        if len == 0 {
            continue;
        }
        codeword.len = len;
        codeword.bits = next_code[usize::from(len)] as u16;
        next_code[usize::from(len)] += 1;
    }
    Ok(codewords)
}

/// Arena index of a node's children; 0 marks an absent child, since slot 0
/// is the root and can never be pointed at.
const NO_CHILD: u16 = 0;

#[derive(Clone, Copy, Debug)]
struct Node {
    /// Children for bit 0 and bit 1.
    children: [u16; 2],
    symbol: Option<u16>,
}

const VACANT: Node = Node {
    children: [NO_CHILD; 2],
    symbol: None,
};

/// A binary decode tree stored as an arena of nodes.
///
/// Interior nodes branch on one bit each; leaves carry the decoded symbol.
/// A code of `n` symbols needs at most `2n - 1` nodes.
#[derive(Debug)]
pub struct DecodeTree {
    nodes: Vec<Node>,
}

impl DecodeTree {
    /// Build the tree for a length vector by tracing each canonical
    /// codeword from its most significant bit down.
    ///
    /// Fails with `MalformedCodes` when two codewords collide: a leaf
    /// planted where an interior node already branches, a descent through
    /// an existing leaf, or the same leaf claimed twice. Over-subscribed
    /// length vectors always collide this way.
    pub fn from_lengths(lengths: &[u8], limit: u8) -> Result<DecodeTree, ErrorKind> {
        let codewords = assign_codewords(lengths, limit)?;
        let mut nodes = Vec::with_capacity(2 * lengths.len());
        nodes.push(VACANT);

        for (symbol, codeword) in codewords[..lengths.len()].iter().enumerate() {
            if codeword.len == 0 {
                continue;
            }
            let mut cur = 0usize;
            for depth in (0..codeword.len).rev() {
                if nodes[cur].symbol.is_some() {
                    // A shorter codeword is a prefix of this one.
                    return Err(ErrorKind::MalformedCodes);
                }
                let bit = usize::from((codeword.bits >> depth) & 1);
                cur = match nodes[cur].children[bit] {
                    NO_CHILD => {
                        let next = nodes.len();
                        nodes.push(VACANT);
                        nodes[cur].children[bit] = next as u16;
                        next
                    }
                    next => usize::from(next),
                };
            }
            let leaf = &mut nodes[cur];
            if leaf.symbol.is_some() || leaf.children != [NO_CHILD; 2] {
                return Err(ErrorKind::MalformedCodes);
            }
            leaf.symbol = Some(symbol as u16);
        }
        Ok(DecodeTree { nodes })
    }

    /// Walk the tree one bit at a time until a leaf is reached.
    ///
    /// Fails with `MalformedCodes` if the stream holds a code the table
    /// does not, and propagates `Truncated` when the reader runs dry.
    pub fn decode(&self, reader: &mut BitReader) -> Result<u16, Error> {
        let mut node = &self.nodes[0];
        loop {
            if let Some(symbol) = node.symbol {
                return Ok(symbol);
            }
            let bit = reader.read_bit()?;
            match node.children[usize::from(bit)] {
                NO_CHILD => return Err(reader.error(ErrorKind::MalformedCodes)),
                next => node = &self.nodes[usize::from(next)],
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn fixed_litlen_lengths() -> [u8; 288] {
        let mut lengths = [8u8; 288];
        lengths[144..256].fill(9);
        lengths[256..280].fill(7);
        lengths
    }

    #[test]
    fn fixed_table_canonical_patterns() {
        // The worked example of RFC 1951, 3.2.6.
        let codewords =
            assign_codewords(&fixed_litlen_lengths(), MAX_CODE_LENGTH).unwrap();
        let expect = [
            (0, 8, 0b0011_0000),
            (143, 8, 0b1011_1111),
            (144, 9, 0b1_1001_0000),
            (255, 9, 0b1_1111_1111),
            (256, 7, 0b000_0000),
            (279, 7, 0b001_0111),
            (280, 8, 0b1100_0000),
            (287, 8, 0b1100_0111),
        ];
        for (symbol, len, bits) in expect {
            assert_eq!(codewords[symbol], Codeword { len, bits }, "symbol {symbol}");
        }
    }

    #[test]
    fn shared_length_patterns_are_ordered() {
        let codewords = assign_codewords(&[3, 3, 3, 3, 2], 15).unwrap();
        for pair in codewords[..4].windows(2) {
            assert!(pair[0].bits < pair[1].bits);
        }
    }

    #[test]
    fn overlong_length_is_rejected() {
        assert_eq!(
            assign_codewords(&[8], 7).unwrap_err(),
            ErrorKind::InvalidLengths
        );
    }

    #[test]
    fn decode_walks_to_the_right_leaves() {
        // Canonical patterns: symbol 1 -> 0, symbol 0 -> 10,
        // symbol 2 -> 110, symbol 3 -> 111.
        let tree = DecodeTree::from_lengths(&[2, 1, 3, 3], MAX_CODE_LENGTH).unwrap();
        // Codes 111, 0, 10 packed LSB-first: bits 1,1,1,0,1,0 -> 0x17.
        let mut reader = BitReader::new(&[0x17]);
        assert_eq!(tree.decode(&mut reader).unwrap(), 3);
        assert_eq!(tree.decode(&mut reader).unwrap(), 1);
        assert_eq!(tree.decode(&mut reader).unwrap(), 0);
    }

    #[test]
    fn over_subscribed_lengths_collide() {
        assert_eq!(
            DecodeTree::from_lengths(&[1, 1, 1], MAX_CODE_LENGTH).unwrap_err(),
            ErrorKind::MalformedCodes
        );
        // Kraft-violating mix across lengths.
        assert_eq!(
            DecodeTree::from_lengths(&[2, 1, 1], MAX_CODE_LENGTH).unwrap_err(),
            ErrorKind::MalformedCodes
        );
    }

    #[test]
    fn incomplete_code_fails_only_at_decode_time() {
        // A lone one-bit code leaves the bit-1 branch dangling.
        let tree = DecodeTree::from_lengths(&[1], MAX_CODE_LENGTH).unwrap();
        let mut reader = BitReader::new(&[0b0000_0001]);
        assert_eq!(
            tree.decode(&mut reader).unwrap_err().kind,
            ErrorKind::MalformedCodes
        );
    }

    #[test]
    fn empty_code_decodes_nothing() {
        let tree = DecodeTree::from_lengths(&[0, 0, 0], MAX_CODE_LENGTH).unwrap();
        let mut reader = BitReader::new(&[0xff]);
        assert_eq!(
            tree.decode(&mut reader).unwrap_err().kind,
            ErrorKind::MalformedCodes
        );
    }
}
