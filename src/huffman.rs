//! Canonical Huffman code tables, represented as an arena-addressed
//! binary trie: the tree is strictly acyclic and only ever traversed
//! top-down, so indices into a flat `Vec` suffice and construction
//! needs no smart-pointer bookkeeping.
use crate::errors::DecodeErrors;

/// A single trie node. Interior nodes have `symbol == None` and at
/// least one child; leaves have `symbol == Some(_)` and no children.
#[derive(Debug, Copy, Clone, Default)]
struct HuffNode {
    left: Option<u16>,
    right: Option<u16>,
    symbol: Option<u8>,
}

/// A canonical Huffman code table, built from a (length-count, symbol
/// list) pair as transmitted in a DHT segment.
#[derive(Debug, Clone)]
pub struct HuffmanTable {
    arena: Vec<HuffNode>,
}

impl HuffmanTable {
    /// Build the canonical code assignment described in the baseline
    /// spec: codes are assigned in increasing length order, in symbol
    /// list order within a length, starting at code 0 and shifting
    /// left by one bit whenever the length increases.
    pub fn build(bits: &[u8; 16], symbols: &[u8]) -> Result<Self, DecodeErrors> {
        let total: usize = bits.iter().map(|&b| b as usize).sum();
        if total > 256 {
            return Err(DecodeErrors::HuffmanDecode(format!(
                "table declares {total} codes, maximum is 256"
            )));
        }
        if symbols.len() < total {
            return Err(DecodeErrors::HuffmanDecode(format!(
                "table declares {total} codes but only {} symbols were supplied",
                symbols.len()
            )));
        }

        // Root is always arena[0].
        let mut arena = vec![HuffNode::default()];
        let mut code: u32 = 0;
        let mut k = 0usize;

        for (len_idx, &count) in bits.iter().enumerate() {
            let len = len_idx + 1;
            for _ in 0..count {
                let symbol = symbols[k];
                k += 1;
                Self::insert(&mut arena, code, len as u8, symbol)?;
                code += 1;
            }
            code <<= 1;
        }

        Ok(HuffmanTable { arena })
    }

    /// Walk down from the root, creating interior nodes as needed,
    /// inserting `symbol` as the leaf reached by the `len`-bit `code`
    /// (MSB first).
    fn insert(arena: &mut Vec<HuffNode>, code: u32, len: u8, symbol: u8) -> Result<(), DecodeErrors> {
        let mut node_idx = 0u16;
        for bit_pos in (0..len).rev() {
            let bit = (code >> bit_pos) & 1;
            let child_slot = if bit == 0 {
                arena[node_idx as usize].left
            } else {
                arena[node_idx as usize].right
            };
            let next_idx = match child_slot {
                Some(idx) => idx,
                None => {
                    if arena[node_idx as usize].symbol.is_some() {
                        return Err(DecodeErrors::HuffmanDecode(
                            "canonical code collides with an existing leaf".into(),
                        ));
                    }
                    let new_idx = arena.len() as u16;
                    arena.push(HuffNode::default());
                    if bit == 0 {
                        arena[node_idx as usize].left = Some(new_idx);
                    } else {
                        arena[node_idx as usize].right = Some(new_idx);
                    }
                    new_idx
                }
            };
            node_idx = next_idx;
        }
        if arena[node_idx as usize].left.is_some() || arena[node_idx as usize].right.is_some() {
            return Err(DecodeErrors::HuffmanDecode(
                "canonical code collides with an existing interior node".into(),
            ));
        }
        arena[node_idx as usize].symbol = Some(symbol);
        Ok(())
    }

    /// Step the trie one bit at a time, using `next_bit` as the bit
    /// source. Returns the decoded symbol once a leaf is reached.
    /// `next_bit` returns `Err` when the underlying stream is
    /// exhausted before a leaf is found.
    pub fn decode_symbol<F>(&self, mut next_bit: F) -> Result<u8, DecodeErrors>
    where
        F: FnMut() -> Result<u32, DecodeErrors>,
    {
        let mut node_idx = 0u16;
        loop {
            let node = &self.arena[node_idx as usize];
            if let Some(symbol) = node.symbol {
                return Ok(symbol);
            }
            let bit = next_bit()?;
            let next = if bit == 0 { node.left } else { node.right };
            match next {
                Some(idx) => node_idx = idx,
                None => {
                    return Err(DecodeErrors::CorruptStream(
                        "huffman prefix not present in table".into(),
                    ))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bit_feeder(bits: &'static str) -> impl FnMut() -> Result<u32, DecodeErrors> {
        let mut iter = bits.chars();
        move || match iter.next() {
            Some('0') => Ok(0),
            Some('1') => Ok(1),
            _ => Err(DecodeErrors::CorruptStream("out of bits".into())),
        }
    }

    fn spec_table() -> HuffmanTable {
        let mut bits = [0u8; 16];
        bits[1] = 2;
        bits[2] = 1;
        bits[3] = 3;
        bits[4] = 3;
        bits[5] = 1;
        bits[9] = 3;
        bits[10] = 2;
        bits[12] = 1;
        bits[14] = 2;
        bits[15] = 1;
        let symbols = [
            0x01, 0x02, 0x03, 0x11, 0x04, 0x00, 0x05, 0x21, 0x12, 0x07, 0xA0, 0xA1, 0xA3, 0xC3,
            0x14, 0x27, 0x3A, 0x4A, 0x56,
        ];
        HuffmanTable::build(&bits, &symbols).unwrap()
    }

    #[test]
    fn decodes_known_prefixes() {
        let table = spec_table();
        assert_eq!(table.decode_symbol(bit_feeder("100")).unwrap(), 0x03);
        assert_eq!(
            table.decode_symbol(bit_feeder("1111111111111111")).unwrap(),
            0x56
        );
    }

    #[test]
    fn incomplete_prefix_requests_more_bits() {
        let table = spec_table();
        let err = table.decode_symbol(bit_feeder("1100")).unwrap_err();
        assert!(matches!(err, DecodeErrors::CorruptStream(_)));
    }
}
