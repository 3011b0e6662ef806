use crate::common::{BLOCK_LEN, BLOCK_SIZE};

const C_SQRT2: i64 = 92682;
const C_1: i64 = 121095;
const C_2: i64 = -171254;
const C_3: i64 = 70936;

#[inline(always)]
fn mul(a: i64, b: i64) -> i64 {
    (a * b) >> 16
}

/// One 8 point pass. `stride` selects columns (8) or rows (1), `step` moves to the next vector.
fn transform_vectors(block: &mut [i64; BLOCK_LEN], stride: usize, step: usize) {
    for vector in 0..BLOCK_SIZE {
        let base = vector * step;
        let at = |k: usize| base + k * stride;
        let v = |k: usize| block[at(k)];

        let add_0_4 = v(0) + v(4);
        let sub_0_4 = v(0) - v(4);
        let add_1_7 = v(1) + v(7);
        let sub_1_7 = v(1) - v(7);
        let add_2_6 = v(2) + v(6);
        let sub_2_6 = v(2) - v(6);
        let add_5_3 = v(5) + v(3);
        let sub_5_3 = v(5) - v(3);

        let tmp0 = add_1_7 + add_5_3;
        let tmp1 = add_2_6 + add_0_4;
        let tmp2 = add_0_4 - add_2_6;

        let mul1 = mul(C_SQRT2, sub_2_6) - add_2_6;
        let tmp3 = mul1 + sub_0_4;
        let tmp4 = sub_0_4 - mul1;

        let mul2 = mul(C_1, sub_1_7 + sub_5_3);
        let mul3 = mul2 + mul(C_2, sub_5_3) - tmp0;
        let mul4 = mul(C_SQRT2, add_1_7 - add_5_3) - mul3;
        let mul5 = mul4 + mul(C_3, sub_1_7) - mul2;

        block[at(0)] = tmp1 + tmp0;
        block[at(1)] = mul3 + tmp3;
        block[at(2)] = mul4 + tmp4;
        block[at(3)] = tmp2 - mul5;
        block[at(4)] = mul5 + tmp2;
        block[at(5)] = tmp4 - mul4;
        block[at(6)] = tmp3 - mul3;
        block[at(7)] = tmp1 - tmp0;
    }
}

/// Inverse transform of a dequantized block in natural order, in place.
/// Output samples are centered on zero and clamped to `-128..=128`.
pub fn idct(coefficients: &mut [i32; BLOCK_LEN]) {
    let mut wide = [0i64; BLOCK_LEN];
    for (w, c) in wide.iter_mut().zip(coefficients.iter()) {
        *w = i64::from(*c);
    }

    transform_vectors(&mut wide, BLOCK_SIZE, 1);
    transform_vectors(&mut wide, 1, BLOCK_SIZE);

    for (c, w) in coefficients.iter_mut().zip(wide) {
        *c = (w / 16).clamp(-128, 128) as i32;
    }
}

#[cfg(test)]
mod tests {
    use super::idct;

    #[test]
    fn zero_block_stays_zero() {
        let mut block = [0; 64];
        idct(&mut block);
        assert_eq!(block, [0; 64]);
    }

    #[test]
    fn dc_only_block_is_flat() {
        for dc in [-2048, -160, -17, 16, 33, 800, 2048] {
            let mut block = [0; 64];
            block[0] = dc;
            idct(&mut block);
            let expected = (dc / 16).clamp(-128, 128);
            assert!(block.iter().all(|s| *s == expected), "dc {}", dc);
        }
    }

    #[test]
    fn output_is_clamped() {
        let mut block = [i32::MAX / 4; 64];
        idct(&mut block);
        assert!(block.iter().all(|s| (-128..=128).contains(s)));

        let mut block = [0; 64];
        block[0] = -1_000_000;
        idct(&mut block);
        assert!(block.iter().all(|s| *s == -128));
    }

    #[test]
    fn horizontal_frequency_varies_along_rows_only() {
        let mut block = [0; 64];
        block[1] = 400;
        idct(&mut block);
        for row in 1..8 {
            assert_eq!(block[row * 8..row * 8 + 8], block[..8]);
        }
        assert!(block[0] > 0);
        assert!(block[7] < 0);
        assert_ne!(block[0], block[7]);
    }
}
