use crate::common::{AAN_SCALES, BLOCK_LEN, CHROMA_BASE_QUANT, LUMA_BASE_QUANT};

/// Dequantization factors for one decode, natural order, with the AAN IDCT pre-scale folded in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuantTables {
    pub luma: [i32; BLOCK_LEN],
    pub chroma: [i32; BLOCK_LEN],
}

impl QuantTables {
    /// `quality` is clamped into `1..=100`.
    pub fn new(quality: u32) -> QuantTables {
        let factor = scale_factor(quality);
        QuantTables {
            luma: scale(&LUMA_BASE_QUANT, factor),
            chroma: scale(&CHROMA_BASE_QUANT, factor),
        }
    }
}

fn scale_factor(quality: u32) -> i32 {
    let quality = quality.clamp(1, 100) as i32;
    if quality >= 50 {
        2 * (100 - quality)
    } else {
        5000 / quality
    }
}

fn scale(base: &[i32; BLOCK_LEN], factor: i32) -> [i32; BLOCK_LEN] {
    let mut table = [0; BLOCK_LEN];
    for ((q, base), aan) in table.iter_mut().zip(base).zip(AAN_SCALES) {
        let step = ((base * factor + 50) / 100).clamp(8, 255);
        *q = (step * aan) >> 13;
    }
    table
}
