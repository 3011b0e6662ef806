use super::block::{END_OF_BLOCK, ZERO_RUN};
use super::ImagePayload;
use crate::common::BLOCK_LEN;
use crate::encoding::BitWriter;
use crate::errors::PayloadBuildError;
use alloc::vec::Vec;

const MAX_MAGNITUDE_BITS: u32 = 15;

/// Produces image payloads from quantized coefficient levels.
///
/// Blocks have to be pushed in the order the decoder reads them: macro blocks in
/// raster order and within each one the Y, Cb and Cr block.
pub struct ImagePayloadBuilder {
    control: Vec<u8>,
    ac: BitWriter,
    dc: BitWriter,
    blocks: usize,
}

impl ImagePayloadBuilder {
    pub fn new() -> Self {
        ImagePayloadBuilder {
            control: Vec::new(),
            ac: BitWriter::new(),
            dc: BitWriter::new(),
            blocks: 0,
        }
    }

    pub fn blocks(&self) -> usize {
        self.blocks
    }

    /// Appends one block of levels in zig-zag order. Position 0 is the DC level and has to fit
    /// into 8 unsigned bits, AC levels need to stay within ±32767.
    ///
    /// A rejected block leaves the builder unchanged.
    pub fn push_block(&mut self, levels: &[i32; BLOCK_LEN]) -> Result<(), PayloadBuildError> {
        let dc = u8::try_from(levels[0]).map_err(|_| PayloadBuildError::DcOutOfRange { got: levels[0] })?;
        for (position, level) in levels.iter().enumerate().skip(1) {
            if level.unsigned_abs() >= 1 << MAX_MAGNITUDE_BITS {
                return Err(PayloadBuildError::AcOutOfRange {
                    got: *level,
                    position,
                });
            }
        }

        self.dc.write_value(u32::from(dc), 8);

        let mut index = 1;
        for (position, level) in levels.iter().enumerate().skip(1) {
            if *level == 0 {
                continue;
            }
            let mut run = position - index;
            while run >= 16 {
                self.control.push(ZERO_RUN);
                run -= 16;
            }
            let size = u32::BITS - level.unsigned_abs().leading_zeros();
            let encoded = if *level > 0 {
                *level as u32
            } else {
                (*level + (1 << size) - 1) as u32
            };
            self.control.push(((run as u8) << 4) | size as u8);
            self.ac.write_value(encoded, size as u8);
            index = position + 1;
        }
        if index < BLOCK_LEN {
            self.control.push(END_OF_BLOCK);
        }

        self.blocks += 1;
        Ok(())
    }

    /// Huffman codes the control stream and serializes the payload.
    pub fn finish(self) -> Vec<u8> {
        let ac_control = crate::huffman::compress(&self.control);
        let ac_magnitudes = self.ac.dump();
        let dc = self.dc.dump();
        let payload = ImagePayload {
            ac_control_uncompressed_size: self.control.len() as u32,
            ac_control: &ac_control,
            ac_magnitudes: &ac_magnitudes,
            dc: &dc,
        };
        vprintln!(
            "Built image payload of {} blocks, {} control bytes",
            self.blocks,
            self.control.len()
        );
        let mut output = Vec::with_capacity(payload.encoded_len());
        payload.write_to(&mut output);
        output
    }
}

impl Default for ImagePayloadBuilder {
    fn default() -> Self {
        Self::new()
    }
}
