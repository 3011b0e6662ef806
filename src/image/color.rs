use super::block::Block;
use crate::common::BLOCK_SIZE;
use alloc::vec;
use alloc::vec::Vec;

// Conversion factors scaled by 2^16, then by 10^5 so they stay integral.
const FIXED_SCALE: i64 = 100_000;
const CR_TO_R: i64 = 9_188_147_200;
const CR_TO_G: i64 = 4_680_187_904;
const CB_TO_G: i64 = 2_255_355_904;
const CB_TO_B: i64 = 11_612_979_200;

const CHANNEL_MAX: i32 = 0xFF0000;
const KEEP_5_BITS: i32 = 0xF80000;
const KEEP_6_BITS: i32 = 0xFC0000;

/// Converts one sample to 8.16 fixed point RGB. Results are not clamped yet.
pub fn ycbcr_to_rgb(y: i32, cb: i32, cr: i32) -> (i32, i32, i32) {
    let lum = i64::from(y + 128) << 16;
    let (cb, cr) = (i64::from(cb), i64::from(cr));
    let exact = |scaled: i64| (scaled / FIXED_SCALE) as i32;
    (
        exact(lum * FIXED_SCALE + cr * CR_TO_R),
        exact(lum * FIXED_SCALE - cr * CR_TO_G - cb * CB_TO_G),
        exact(lum * FIXED_SCALE + cb * CB_TO_B),
    )
}

/// Packs clamped 8.16 channels into RGB565.
pub fn pack_rgb565(r: i32, g: i32, b: i32) -> u16 {
    (((r >> 8) & 0xF800) | ((g >> 13) & 0x07E0) | (b >> 19)) as u16
}

/// Working buffer for one 8 row strip of the image.
///
/// Each channel plane is `width × 9` samples. Rows 0 to 7 hold the strip being
/// assembled, row 8 collects the quantization error pushed down from the last row.
/// That error is carried into row 0 of the next strip.
pub struct StripDither {
    width: usize,
    r: Vec<i32>,
    g: Vec<i32>,
    b: Vec<i32>,
}

impl StripDither {
    pub fn new(width: usize) -> StripDither {
        let len = width * (BLOCK_SIZE + 1);
        StripDither {
            width,
            r: vec![0; len],
            g: vec![0; len],
            b: vec![0; len],
        }
    }

    /// Color converts three transformed blocks into the strip at column `x`.
    pub fn store_blocks(&mut self, x: usize, y: &Block, cb: &Block, cr: &Block) {
        for (i, ((y, cb), cr)) in y
            .coefficients
            .iter()
            .zip(cb.coefficients.iter())
            .zip(cr.coefficients.iter())
            .enumerate()
        {
            let index = (i / BLOCK_SIZE) * self.width + x + i % BLOCK_SIZE;
            let (r, g, b) = ycbcr_to_rgb(*y, *cb, *cr);
            self.r[index] = r;
            self.g[index] = g;
            self.b[index] = b;
        }
    }

    /// Packs the finished strip into `output` (`width × 8` pixels), spreading each
    /// pixel's rounding error to its right and lower neighbours.
    pub fn flush(&mut self, output: &mut [u16]) {
        let width = self.width;
        let carry_row = width * BLOCK_SIZE;
        for plane in [&mut self.r, &mut self.g, &mut self.b] {
            let (strip, carry) = plane.split_at_mut(carry_row);
            for (top, carried) in strip[..width].iter_mut().zip(carry.iter_mut()) {
                *top += *carried;
                *carried = 0;
            }
        }

        for (i, pixel) in output.iter_mut().enumerate().take(carry_row) {
            let r = self.r[i].clamp(0, CHANNEL_MAX);
            let g = self.g[i].clamp(0, CHANNEL_MAX);
            let b = self.b[i].clamp(0, CHANNEL_MAX);
            *pixel = pack_rgb565(r, g, b);

            if (i + 1) % width == 0 {
                continue;
            }
            let r_err = (r - (r & KEEP_5_BITS)) >> 1;
            let g_err = (g - (g & KEEP_6_BITS)) >> 1;
            let b_err = (b - (b & KEEP_5_BITS)) >> 1;
            for (plane, err) in [(&mut self.r, r_err), (&mut self.g, g_err), (&mut self.b, b_err)] {
                plane[i + 1] += err;
                plane[i + width] += err;
            }
        }
    }
}
