use super::FrequencyTable;
use crate::common::{END_OF_BLOCK, MAX_NODE_COUNT, SYMBOL_COUNT};
use crate::decoding::BitReader;
use crate::errors::{Decoded, StreamDefect};
use alloc::vec;
use alloc::vec::Vec;

/// Decoding tree kept in an arena.
///
/// Node indices below [`SYMBOL_COUNT`] are leaves and equal the symbol they stand for.
/// Internal nodes are numbered upwards from there in the order they were merged,
/// so the root is always the last one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanTree {
    /// `[left, right]` of internal node `SYMBOL_COUNT + i`
    children: Vec<[u16; 2]>,
    root: u16,
}

/// A symbol's path through the tree. The bit nearest to the root is the most significant one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Codeword {
    pub bits: u32,
    pub len: u8,
}

impl HuffmanTree {
    /// Builds the tree for `table`, `None` if the table has no symbols at all.
    ///
    /// The end of block symbol always takes part with weight 1. Each step merges the
    /// two live nodes of lowest weight into a new node. Among equal weights the lower
    /// index wins and the lighter node becomes the left child.
    pub fn build(table: &FrequencyTable) -> Option<HuffmanTree> {
        if table.is_empty() {
            return None;
        }

        let mut weights = [0u32; MAX_NODE_COUNT];
        for (weight, freq) in weights.iter_mut().zip(table.frequencies()) {
            *weight = u32::from(*freq);
        }
        weights[usize::from(END_OF_BLOCK)] = 1;

        let mut children = Vec::with_capacity(SYMBOL_COUNT - 1);
        let mut last = usize::from(END_OF_BLOCK);
        while last < MAX_NODE_COUNT - 1 {
            let mut left: Option<usize> = None;
            let mut right: Option<usize> = None;
            for index in 0..=last {
                let weight = weights[index];
                if weight == 0 {
                    continue;
                }
                if left.map_or(true, |l| weight < weights[l]) {
                    right = left;
                    left = Some(index);
                } else if right.map_or(true, |r| weight < weights[r]) {
                    right = Some(index);
                }
            }
            let (Some(left), Some(right)) = (left, right) else {
                break;
            };

            last += 1;
            weights[last] = weights[left] + weights[right];
            weights[left] = 0;
            weights[right] = 0;
            children.push([left as u16, right as u16]);
        }

        Some(HuffmanTree {
            children,
            root: last as u16,
        })
    }

    fn child(&self, node: u16, bit: bool) -> u16 {
        self.children[usize::from(node) - SYMBOL_COUNT][usize::from(bit)]
    }

    /// Follows one codeword from the root. Every internal node owns two children, so
    /// this always ends on a leaf. Past the end of the input the reader supplies zeros.
    fn walk(&self, br: &mut BitReader<'_>) -> u16 {
        let mut node = self.root;
        while usize::from(node) >= SYMBOL_COUNT {
            node = self.child(node, br.next_bit());
        }
        node
    }

    /// Decodes up to `max_symbols` symbols. The end of block symbol stops decoding and is not emitted.
    ///
    /// Running out of input first is not an error: everything decoded so far is
    /// returned together with a [`StreamDefect::HuffmanInputExhausted`].
    pub fn decode(&self, br: &mut BitReader<'_>, max_symbols: usize) -> Decoded<Vec<u16>> {
        let mut decoded = Decoded::clean(Vec::with_capacity(max_symbols.min(br.bits_left())));
        while decoded.value.len() < max_symbols {
            let symbol = if br.is_exhausted() {
                None
            } else {
                Some(self.walk(br)).filter(|_| !br.overran())
            };
            match symbol {
                Some(END_OF_BLOCK) => break,
                Some(symbol) => decoded.value.push(symbol),
                None => {
                    let done = decoded.value.len();
                    decoded.note(StreamDefect::HuffmanInputExhausted {
                        decoded: done,
                        expected: max_symbols,
                    });
                    break;
                }
            }
        }
        decoded
    }

    /// Codeword of every symbol, indexed by symbol. Symbols that are not in the tree get `None`.
    pub fn codes(&self) -> Vec<Option<Codeword>> {
        let mut codes = vec![None; SYMBOL_COUNT];
        let mut stack = vec![(self.root, Codeword { bits: 0, len: 0 })];
        while let Some((node, code)) = stack.pop() {
            if usize::from(node) < SYMBOL_COUNT {
                codes[usize::from(node)] = Some(code);
                continue;
            }
            debug_assert!(code.len < 32, "Huffman codeword longer than 32 bits");
            for bit in [false, true] {
                let next = Codeword {
                    bits: code.bits << 1 | u32::from(bit),
                    len: code.len + 1,
                };
                stack.push((self.child(node, bit), next));
            }
        }
        codes
    }
}

#[cfg(test)]
mod tests {
    use super::{Codeword, HuffmanTree};
    use crate::common::END_OF_BLOCK;
    use crate::decoding::BitReader;
    use crate::encoding::BitWriter;
    use crate::errors::StreamDefect;
    use crate::huffman::FrequencyTable;
    use alloc::vec;
    use alloc::vec::Vec;
    use rand::{rngs::SmallRng, Rng, SeedableRng};

    fn table(entries: &[(u8, u8)]) -> FrequencyTable {
        let mut frequencies = [0u8; 256];
        for (symbol, freq) in entries {
            frequencies[usize::from(*symbol)] = *freq;
        }
        FrequencyTable::new(frequencies)
    }

    #[test]
    fn empty_table_has_no_tree() {
        assert_eq!(HuffmanTree::build(&table(&[])), None);
    }

    #[test]
    fn single_symbol_pairs_with_end_of_block() {
        let tree = HuffmanTree::build(&table(&[(0, 1)])).unwrap();
        assert_eq!(tree.children.len(), 1);
        assert_eq!(tree.root, 257);
        let codes = tree.codes();
        // equal weights, the lower index goes left
        assert_eq!(codes[0], Some(Codeword { bits: 0, len: 1 }));
        assert_eq!(
            codes[usize::from(END_OF_BLOCK)],
            Some(Codeword { bits: 1, len: 1 })
        );
        assert_eq!(codes[1], None);
    }

    #[test]
    fn lighter_node_goes_left() {
        // weights: 'a' 5, 'b' 2, EOB 1
        // first merge: EOB(1) + b(2) -> 257 (3), EOB left
        // second merge: 257(3) + a(5) -> 258, 257 left
        let tree = HuffmanTree::build(&table(&[(b'a', 5), (b'b', 2)])).unwrap();
        assert_eq!(tree.root, 258);
        let codes = tree.codes();
        assert_eq!(codes[usize::from(b'a')], Some(Codeword { bits: 0b1, len: 1 }));
        assert_eq!(codes[usize::from(b'b')], Some(Codeword { bits: 0b01, len: 2 }));
        assert_eq!(
            codes[usize::from(END_OF_BLOCK)],
            Some(Codeword { bits: 0b00, len: 2 })
        );
    }

    #[test]
    fn decode_stops_at_end_of_block() {
        let tree = HuffmanTree::build(&table(&[(b'a', 5), (b'b', 2)])).unwrap();
        // a a b a EOB -> 1 1 01 1 00, padding afterwards
        let data = [0b1101_1000];
        let mut br = BitReader::new(&data);
        let decoded = tree.decode(&mut br, 100);
        assert!(decoded.is_clean());
        assert_eq!(
            decoded.value,
            vec![u16::from(b'a'), u16::from(b'a'), u16::from(b'b'), u16::from(b'a')]
        );
    }

    #[test]
    fn decode_stops_at_max_symbols() {
        let tree = HuffmanTree::build(&table(&[(b'a', 5), (b'b', 2)])).unwrap();
        let data = [0xFF];
        let mut br = BitReader::new(&data);
        let decoded = tree.decode(&mut br, 3);
        assert!(decoded.is_clean());
        assert_eq!(decoded.value.len(), 3);
        assert_eq!(br.bits_read(), 3);
    }

    #[test]
    fn running_dry_is_a_defect() {
        let tree = HuffmanTree::build(&table(&[(b'a', 5), (b'b', 2)])).unwrap();
        // eight 'a' and nothing else
        let data = [0xFF];
        let mut br = BitReader::new(&data);
        let decoded = tree.decode(&mut br, 10);
        assert_eq!(decoded.value.len(), 8);
        assert_eq!(
            decoded.defects,
            vec![StreamDefect::HuffmanInputExhausted {
                decoded: 8,
                expected: 10
            }]
        );

        // a codeword cut in half by the end of the input is dropped
        let data = [0b1111_1110];
        let mut br = BitReader::new(&data);
        let decoded = tree.decode(&mut br, 10);
        assert_eq!(decoded.value.len(), 7);
        assert!(!decoded.is_clean());
    }

    #[test]
    fn every_present_symbol_gets_a_prefix_free_code() {
        let mut frequencies = [0u8; 256];
        for (i, f) in frequencies.iter_mut().enumerate() {
            *f = (i * 7 % 13) as u8;
        }
        let tree = HuffmanTree::build(&FrequencyTable::new(frequencies)).unwrap();
        let codes = tree.codes();
        let present: Vec<_> = codes
            .iter()
            .enumerate()
            .filter_map(|(s, c)| c.map(|c| (s, c)))
            .collect();
        let expected = frequencies.iter().filter(|f| **f != 0).count() + 1;
        assert_eq!(present.len(), expected);
        for (a, ca) in &present {
            for (b, cb) in &present {
                if a == b || ca.len > cb.len {
                    continue;
                }
                let prefix = cb.bits >> (cb.len - ca.len);
                assert_ne!(prefix, ca.bits, "{} is a prefix of {}", a, b);
            }
        }
    }

    #[test]
    fn arbitrary_tables_decode_what_they_encode() {
        let mut rng = SmallRng::seed_from_u64(0xDECAF);
        for _ in 0..50 {
            let mut frequencies = [0u8; 256];
            for freq in frequencies.iter_mut() {
                if rng.gen_bool(0.4) {
                    *freq = rng.gen_range(1..=255);
                }
            }
            let table = FrequencyTable::new(frequencies);
            let Some(tree) = HuffmanTree::build(&table) else {
                assert!(table.is_empty());
                continue;
            };
            let codes = tree.codes();

            // only part of the weighted symbols show up in the message
            let present: Vec<u16> = (0..256u16)
                .filter(|s| frequencies[usize::from(*s)] != 0)
                .collect();
            let used: Vec<u16> = present
                .iter()
                .copied()
                .filter(|_| rng.gen_bool(0.5))
                .collect();
            let message: Vec<u16> = if used.is_empty() {
                Vec::new()
            } else {
                (0..rng.gen_range(0..500))
                    .map(|_| used[rng.gen_range(0..used.len())])
                    .collect()
            };

            let mut bw = BitWriter::new();
            for symbol in message.iter().copied().chain([END_OF_BLOCK]) {
                let code = codes[usize::from(symbol)].unwrap();
                bw.write_code(code.bits, code.len);
            }
            let data = bw.dump();
            let mut br = BitReader::new(&data);
            let decoded = tree.decode(&mut br, message.len() + 1);
            assert!(decoded.is_clean());
            assert_eq!(decoded.value, message);
        }
    }
}
