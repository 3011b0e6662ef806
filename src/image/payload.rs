use crate::decoding::ByteCursor;
use crate::errors::StructuralError;
use alloc::vec::Vec;

/// The three streams of a compressed image, borrowed from the caller's buffer.
///
/// Layout, all sizes `u32` little-endian:
///
/// | field                      | size                          |
/// |----------------------------|-------------------------------|
/// | control compressed size    | 4                             |
/// | control uncompressed size  | 4                             |
/// | control stream             | control compressed size       |
/// | AC magnitude size          | 4                             |
/// | AC magnitudes              | AC magnitude size             |
/// | DC size                    | 4                             |
/// | DC values                  | DC size                       |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImagePayload<'a> {
    /// Number of control bytes the Huffman coded control stream expands to.
    pub ac_control_uncompressed_size: u32,
    /// Frequency table followed by the Huffman coded control bytes.
    pub ac_control: &'a [u8],
    pub ac_magnitudes: &'a [u8],
    pub dc: &'a [u8],
}

impl<'a> ImagePayload<'a> {
    /// Parses the payload at the start of `source`. Trailing bytes are ignored.
    pub fn parse(source: &'a [u8]) -> Result<ImagePayload<'a>, StructuralError> {
        let mut cursor = ByteCursor::new(source);
        let compressed_size = cursor.read_u32_le("AC control compressed size")?;
        let ac_control_uncompressed_size = cursor.read_u32_le("AC control uncompressed size")?;
        let ac_control = cursor.read_bytes(compressed_size as usize, "AC control stream")?;
        let ac_magnitudes = cursor.read_sized("AC magnitude stream")?;
        let dc = cursor.read_sized("DC stream")?;

        vprintln!(
            "Image payload: control {} -> {} bytes, AC {} bytes, DC {} bytes",
            ac_control.len(),
            ac_control_uncompressed_size,
            ac_magnitudes.len(),
            dc.len()
        );
        Ok(ImagePayload {
            ac_control_uncompressed_size,
            ac_control,
            ac_magnitudes,
            dc,
        })
    }

    /// Number of bytes [`write_to`](ImagePayload::write_to) produces.
    pub fn encoded_len(&self) -> usize {
        16 + self.ac_control.len() + self.ac_magnitudes.len() + self.dc.len()
    }

    pub fn write_to(&self, output: &mut Vec<u8>) {
        output.reserve(self.encoded_len());
        output.extend_from_slice(&(self.ac_control.len() as u32).to_le_bytes());
        output.extend_from_slice(&self.ac_control_uncompressed_size.to_le_bytes());
        output.extend_from_slice(self.ac_control);
        output.extend_from_slice(&(self.ac_magnitudes.len() as u32).to_le_bytes());
        output.extend_from_slice(self.ac_magnitudes);
        output.extend_from_slice(&(self.dc.len() as u32).to_le_bytes());
        output.extend_from_slice(self.dc);
    }
}
