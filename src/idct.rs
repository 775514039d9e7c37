//! Forward and inverse 8x8 DCT, implemented directly from the
//! separable double-sum definition rather than a fast (AAN-style)
//! integer approximation, so that output matches the reference
//! formula bit-for-bit modulo floating point rounding. The row and
//! column passes are applied separately (rather than the full O(64^2)
//! naive sum) using a shared precomputed cosine basis table.
use std::f32::consts::PI;
use std::sync::OnceLock;

const SQRT1_2: f32 = std::f32::consts::FRAC_1_SQRT_2;

/// `COS[x][k] == cos((2x + 1) * k * PI / 16)`, shared by both the
/// forward and inverse transforms.
fn cos_table() -> &'static [[f32; 8]; 8] {
    static TABLE: OnceLock<[[f32; 8]; 8]> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut table = [[0f32; 8]; 8];
        for (x, row) in table.iter_mut().enumerate() {
            for (k, cell) in row.iter_mut().enumerate() {
                *cell = ((2 * x + 1) as f32 * k as f32 * PI / 16.0).cos();
            }
        }
        table
    })
}

#[inline]
fn c(k: usize) -> f32 {
    if k == 0 {
        SQRT1_2
    } else {
        1.0
    }
}

/// Inverse DCT: `block` holds dequantized coefficients in natural
/// (row = vertical frequency `v`, col = horizontal frequency `u`)
/// order; returns the spatial-domain samples, still centered on zero
/// (level shift happens separately).
#[must_use]
pub fn idct_2d(block: &[i32; 64]) -> [f32; 64] {
    let cos = cos_table();
    // Column pass: temp[v][x] = sum_u C(u) * S[v][u] * cos(x, u)
    let mut temp = [0f32; 64];
    for v in 0..8 {
        for x in 0..8 {
            let mut sum = 0f32;
            for u in 0..8 {
                sum += c(u) * block[v * 8 + u] as f32 * cos[x][u];
            }
            temp[v * 8 + x] = sum;
        }
    }
    // Row pass: out[y][x] = 1/4 * sum_v C(v) * temp[v][x] * cos(y, v)
    let mut out = [0f32; 64];
    for x in 0..8 {
        for y in 0..8 {
            let mut sum = 0f32;
            for v in 0..8 {
                sum += c(v) * temp[v * 8 + x] * cos[y][v];
            }
            out[y * 8 + x] = 0.25 * sum;
        }
    }
    out
}

/// Forward DCT: inverse operation of [`idct_2d`], used by the encoder.
/// `samples` holds level-shifted spatial-domain values; returns
/// unquantized frequency-domain coefficients.
#[must_use]
pub fn fdct_2d(samples: &[f32; 64]) -> [f32; 64] {
    let cos = cos_table();
    // Row pass over x: temp[v][u] accumulates the x-dependent cosine factor.
    let mut temp = [0f32; 64];
    for y in 0..8 {
        for u in 0..8 {
            let mut sum = 0f32;
            for x in 0..8 {
                sum += samples[y * 8 + x] * cos[x][u];
            }
            temp[y * 8 + u] = sum;
        }
    }
    let mut out = [0f32; 64];
    for u in 0..8 {
        for v in 0..8 {
            let mut sum = 0f32;
            for y in 0..8 {
                sum += temp[y * 8 + u] * cos[y][v];
            }
            out[v * 8 + u] = 0.25 * c(u) * c(v) * sum;
        }
    }
    out
}

/// Level-shift an IDCT output sample and round to the nearest integer,
/// without clamping (clamping happens in the color transform).
#[inline]
#[must_use]
pub fn level_shift(sample: f32) -> i32 {
    sample.round() as i32 + 128
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dc_only_block_is_flat() {
        // A block whose only nonzero coefficient is DC reconstructs to
        // a constant plane of value DC/8 (since C(0) folds sqrt(1/2)
        // twice and the 1/4 scale combine to 1/8 for the DC term).
        let mut block = [0i32; 64];
        block[0] = 1024;
        let out = idct_2d(&block);
        let expected = 1024.0 / 8.0;
        for v in out {
            assert!((v - expected).abs() < 1e-2, "{v} vs {expected}");
        }
    }

    #[test]
    fn forward_then_inverse_round_trips() {
        let mut samples = [0f32; 64];
        for (i, s) in samples.iter_mut().enumerate() {
            *s = ((i * 7) % 256) as f32 - 128.0;
        }
        let freq = fdct_2d(&samples);
        let freq_i = {
            let mut b = [0i32; 64];
            for i in 0..64 {
                b[i] = freq[i].round() as i32;
            }
            b
        };
        let back = idct_2d(&freq_i);
        for i in 0..64 {
            assert!(
                (back[i] - samples[i]).abs() < 1.0,
                "index {i}: {} vs {}",
                back[i],
                samples[i]
            );
        }
    }
}
