use crate::errors::StructuralError;

/// Reads little-endian fields from a buffer, failing with
/// [`StructuralError::Truncated`] instead of panicking when a field runs off the end.
pub struct ByteCursor<'s> {
    source: &'s [u8],
    offset: usize,
}

impl<'s> ByteCursor<'s> {
    pub fn new(source: &'s [u8]) -> ByteCursor<'s> {
        ByteCursor { source, offset: 0 }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn remaining(&self) -> usize {
        self.source.len() - self.offset
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    pub fn read_bytes(&mut self, n: usize, what: &'static str) -> Result<&'s [u8], StructuralError> {
        if n > self.remaining() {
            return Err(StructuralError::Truncated {
                what,
                offset: self.offset,
                needed: n,
                available: self.remaining(),
            });
        }
        let bytes = &self.source[self.offset..self.offset + n];
        self.offset += n;
        Ok(bytes)
    }

    pub fn read_array<const N: usize>(&mut self, what: &'static str) -> Result<[u8; N], StructuralError> {
        let mut raw = [0; N];
        raw.copy_from_slice(self.read_bytes(N, what)?);
        Ok(raw)
    }

    pub fn read_u8(&mut self, what: &'static str) -> Result<u8, StructuralError> {
        Ok(self.read_array::<1>(what)?[0])
    }

    pub fn read_u32_le(&mut self, what: &'static str) -> Result<u32, StructuralError> {
        Ok(u32::from_le_bytes(self.read_array(what)?))
    }

    /// Reads a `u32` length and then that many bytes.
    pub fn read_sized(&mut self, what: &'static str) -> Result<&'s [u8], StructuralError> {
        let len = self.read_u32_le(what)? as usize;
        self.read_bytes(len, what)
    }
}

#[cfg(test)]
mod tests {
    use super::ByteCursor;
    use crate::errors::StructuralError;

    #[test]
    fn fields_are_little_endian() {
        let data = [0x78, 0x56, 0x34, 0x12, 0xAB];
        let mut cursor = ByteCursor::new(&data);
        assert_eq!(cursor.read_u32_le("field").unwrap(), 0x1234_5678);
        assert_eq!(cursor.read_u8("tail").unwrap(), 0xAB);
        assert!(cursor.is_empty());
    }

    #[test]
    fn running_off_the_end_is_structural() {
        let data = [0x02, 0x00, 0x00, 0x00, 0xFF];
        let mut cursor = ByteCursor::new(&data);
        assert_eq!(
            cursor.read_sized("payload"),
            Err(StructuralError::Truncated {
                what: "payload",
                offset: 4,
                needed: 2,
                available: 1,
            })
        );
        // a failed read does not move the cursor
        assert_eq!(cursor.offset(), 4);
        assert_eq!(cursor.read_bytes(1, "payload").unwrap(), &[0xFF]);
    }
}
