use super::idct::idct;
use crate::common::{BLOCK_LEN, ZIGZAG};
use crate::decoding::BitReader;
use crate::errors::{note_defect, StreamDefect};
use alloc::vec::Vec;

/// Control byte that ends a block.
pub const END_OF_BLOCK: u8 = 0x00;
/// Control byte that skips sixteen zero coefficients.
pub const ZERO_RUN: u8 = 0xF0;

/// Coefficients of one 8×8 block in natural row-major order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
    pub coefficients: [i32; BLOCK_LEN],
}

impl Block {
    pub fn zeroed() -> Block {
        Block {
            coefficients: [0; BLOCK_LEN],
        }
    }

    /// Turns dequantized coefficients into samples in `-128..=128`.
    pub fn inverse_transform(&mut self) {
        idct(&mut self.coefficients);
    }
}

/// Cursors over the three coefficient streams of an image.
///
/// Blocks are pulled one after another. Damage does not stop unpacking: whatever
/// is missing reads as zero and the problem is recorded in [`defects`](Self::defects).
pub struct CoefficientStreams<'p> {
    control: Vec<u8>,
    control_pos: usize,
    ac: BitReader<'p>,
    dc: BitReader<'p>,
    defects: Vec<StreamDefect>,
}

impl<'p> CoefficientStreams<'p> {
    pub fn new(control: Vec<u8>, ac_magnitudes: &'p [u8], dc: &'p [u8]) -> CoefficientStreams<'p> {
        CoefficientStreams {
            control,
            control_pos: 0,
            ac: BitReader::new(ac_magnitudes),
            dc: BitReader::new(dc),
            defects: Vec::new(),
        }
    }

    pub fn defects(&self) -> &[StreamDefect] {
        &self.defects
    }

    pub(crate) fn defects_mut(&mut self) -> &mut Vec<StreamDefect> {
        &mut self.defects
    }

    pub fn into_defects(self) -> Vec<StreamDefect> {
        self.defects
    }

    fn next_control(&mut self) -> u8 {
        match self.control.get(self.control_pos) {
            Some(code) => {
                self.control_pos += 1;
                *code
            }
            None => {
                note_defect(&mut self.defects, StreamDefect::ControlStreamExhausted);
                END_OF_BLOCK
            }
        }
    }

    fn next_dc(&mut self) -> i32 {
        let value = self.dc.next(8) as i32;
        if self.dc.overran() {
            note_defect(&mut self.defects, StreamDefect::DcExhausted);
        }
        value
    }

    fn next_magnitude(&mut self, size: u8) -> i32 {
        let mut value = self.ac.next(size) as i32;
        if self.ac.overran() {
            note_defect(&mut self.defects, StreamDefect::AcMagnitudesExhausted);
        }
        if value & (1 << (size - 1)) == 0 {
            value += 1 - (1 << size);
        }
        value
    }

    /// Reads the next block and dequantizes it with `quants`. The result is still in the frequency domain.
    pub fn next_block(&mut self, quants: &[i32; BLOCK_LEN]) -> Block {
        let mut block = Block::zeroed();
        block.coefficients[ZIGZAG[0]] = self.next_dc() * quants[ZIGZAG[0]];

        let mut index = 1;
        while index < BLOCK_LEN {
            let code = self.next_control();
            match code {
                END_OF_BLOCK => break,
                ZERO_RUN => index += 16,
                _ => {
                    let run = usize::from(code >> 4);
                    let size = code & 0x0F;
                    if size == 0 {
                        note_defect(&mut self.defects, StreamDefect::ZeroSizedCoefficient { code });
                        break;
                    }
                    let value = self.next_magnitude(size);
                    let position = index + run;
                    if position >= BLOCK_LEN {
                        note_defect(&mut self.defects, StreamDefect::CoefficientOverrun { code });
                        break;
                    }
                    let natural = ZIGZAG[position];
                    block.coefficients[natural] = value * quants[natural];
                    index = position + 1;
                }
            }
        }
        block
    }
}
