use alloc::vec::Vec;

/// Writes bits into a growing buffer, filling each byte from its most significant bit.
///
/// This is the inverse of [`BitReader`](crate::decoding::BitReader): whatever
/// [`write_value`](BitWriter::write_value) puts in, `BitReader::next` with the same
/// width returns.
pub struct BitWriter {
    /// The buffer that's filled with bits
    output: Vec<u8>,
    /// The index pointing to the next unoccupied bit. Effectively just
    /// the number of bits that have been written into the buffer so far.
    bit_idx: usize,
}

impl BitWriter {
    pub fn new() -> Self {
        Self {
            output: Vec::new(),
            bit_idx: 0,
        }
    }

    pub fn bits_written(&self) -> usize {
        self.bit_idx
    }

    pub fn write_bit(&mut self, bit: bool) {
        if self.bit_idx % 8 == 0 {
            self.output.push(0);
        }
        if bit {
            let last = self.output.len() - 1;
            self.output[last] |= 0x80 >> (self.bit_idx % 8);
        }
        self.bit_idx += 1;
    }

    /// Writes the lowest `num_bits` of `value`, least significant bit first.
    pub fn write_value(&mut self, value: u32, num_bits: u8) {
        debug_assert!(num_bits <= 32);
        for shift in 0..u32::from(num_bits.min(32)) {
            self.write_bit(value >> shift & 1 == 1);
        }
    }

    /// Writes the lowest `num_bits` of `code`, most significant bit first.
    ///
    /// Huffman codewords are stored this way, the bit closest to the root comes first.
    pub fn write_code(&mut self, code: u32, num_bits: u8) {
        debug_assert!(num_bits <= 32);
        for shift in (0..u32::from(num_bits.min(32))).rev() {
            self.write_bit(code >> shift & 1 == 1);
        }
    }

    /// Returns the populated buffer. A partially filled last byte is padded with zeros.
    pub fn dump(self) -> Vec<u8> {
        self.output
    }
}

impl Default for BitWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::BitWriter;
    use crate::decoding::BitReader;
    use alloc::vec;
    use alloc::vec::Vec;
    use rand::{rngs::SmallRng, Rng, SeedableRng};

    #[test]
    fn codes_are_written_msb_first() {
        let mut bw = BitWriter::new();
        bw.write_code(0b110, 3);
        bw.write_code(0b0_0001, 5);
        assert_eq!(vec![0b1100_0001], bw.dump());
    }

    #[test]
    fn values_are_written_lsb_first() {
        let mut bw = BitWriter::new();
        bw.write_value(0b1011, 4);
        bw.write_value(0b1100, 4);
        assert_eq!(vec![0b1101_0011], bw.dump());
    }

    #[test]
    fn partial_byte_is_zero_padded() {
        let mut bw = BitWriter::new();
        bw.write_bit(true);
        assert_eq!(bw.bits_written(), 1);
        assert_eq!(vec![0b1000_0000], bw.dump());
        assert_eq!(Vec::<u8>::new(), BitWriter::new().dump());
    }

    #[test]
    fn mirrors_the_reader() {
        let mut rng = SmallRng::seed_from_u64(0x5EED);
        let mut expected = Vec::new();
        let mut bw = BitWriter::new();
        for _ in 0..2000 {
            let width: u8 = rng.gen_range(0..=32);
            let value: u32 = if width == 32 {
                rng.gen()
            } else {
                rng.gen_range(0..1u32 << width)
            };
            bw.write_value(value, width);
            expected.push((value, width));
        }
        let written = bw.dump();
        let mut br = BitReader::new(&written);
        for (value, width) in expected {
            assert_eq!(br.next(width), value);
        }
        assert!(!br.overran());
        assert!(br.bits_left() < 8);
    }
}
