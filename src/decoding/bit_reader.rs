/// Sequential bit reader over a fixed buffer.
///
/// Bytes are consumed starting at their most significant bit. Values wider than
/// one bit are assembled in reading order starting at the *least* significant
/// position: the first bit read is bit 0 of the result. Reads past the end of
/// the buffer produce zero bits instead of failing, the reader only remembers
/// that it [`overran`](BitReader::overran).
pub struct BitReader<'s> {
    idx: usize, //index of the byte currently being read
    mask: u8,
    source: &'s [u8],
    overran: bool,
}

impl<'s> BitReader<'s> {
    pub fn new(source: &'s [u8]) -> BitReader<'s> {
        BitReader {
            idx: 0,
            mask: 0x80,
            source,
            overran: false,
        }
    }

    pub fn bits_left(&self) -> usize {
        if self.idx >= self.source.len() {
            return 0;
        }
        (self.source.len() - self.idx - 1) * 8 + (self.mask.trailing_zeros() as usize + 1)
    }

    pub fn bits_read(&self) -> usize {
        self.idx * 8 + self.mask.leading_zeros() as usize
    }

    pub fn is_exhausted(&self) -> bool {
        self.idx >= self.source.len()
    }

    /// True once any read asked for bits beyond the end of the buffer.
    pub fn overran(&self) -> bool {
        self.overran
    }

    pub fn next_bit(&mut self) -> bool {
        let Some(byte) = self.source.get(self.idx) else {
            self.overran = true;
            return false;
        };
        let bit = byte & self.mask != 0;
        self.mask >>= 1;
        if self.mask == 0 {
            self.mask = 0x80;
            self.idx += 1;
        }
        bit
    }

    /// Reads `n` bits, `n <= 32`.
    pub fn next(&mut self, n: u8) -> u32 {
        debug_assert!(n <= 32, "Cant serve this request. The reader is limited to 32bit");
        let mut value = 0;
        for shift in 0..u32::from(n.min(32)) {
            if self.next_bit() {
                value |= 1 << shift;
            }
        }
        value
    }

    pub fn reset(&mut self, new_source: &'s [u8]) {
        self.idx = 0;
        self.mask = 0x80;
        self.source = new_source;
        self.overran = false;
    }
}
