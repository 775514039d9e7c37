#![allow(dead_code)]
//! Small shared helpers: zig-zag tables, value/category conversions,
//! and big-endian byte readers used by both the header parser and the
//! entropy decoder.
use std::io::Read;

use crate::errors::DecodeErrors;

/// Maps a zig-zag transmission index to its natural row-major index in
/// an 8x8 block: `UN_ZIGZAG[i]` is where zig-zag position `i` belongs.
#[rustfmt::skip]
pub const UN_ZIGZAG: [usize; 64] = [
    0,  1,  8,  16, 9,  2,  3, 10,
    17, 24, 32, 25, 18, 11, 4,  5,
    12, 19, 26, 33, 40, 48, 41, 34,
    27, 20, 13, 6,  7,  14, 21, 28,
    35, 42, 49, 56, 57, 50, 43, 36,
    29, 22, 15, 23, 30, 37, 44, 51,
    58, 59, 52, 45, 38, 31, 39, 46,
    53, 60, 61, 54, 47, 55, 62, 63,
];

/// The inverse of [`UN_ZIGZAG`]: maps a natural row-major index to its
/// zig-zag transmission index. Built once at first use rather than
/// hand-transcribed, so it is provably the inverse of `UN_ZIGZAG`.
#[must_use]
pub fn zigzag_table() -> [usize; 64] {
    let mut out = [0usize; 64];
    for (zz, &natural) in UN_ZIGZAG.iter().enumerate() {
        out[natural] = zz;
    }
    out
}

/// Color space of a decoded or to-be-encoded image.
///
/// Only `RGB` and `YCbCr` are produced internally by this crate; the
/// other variants exist so callers converting between representations
/// have a common vocabulary.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ColorSpace {
    /// Red, Green, Blue.
    RGB,
    /// Luma, blue-difference chroma, red-difference chroma.
    YCbCr,
    /// Single-channel luma only.
    GRAYSCALE,
}

impl ColorSpace {
    /// Number of channels in this color space.
    #[must_use]
    pub const fn num_components(self) -> usize {
        match self {
            Self::RGB | Self::YCbCr => 3,
            Self::GRAYSCALE => 1,
        }
    }
}

impl Default for ColorSpace {
    fn default() -> Self {
        ColorSpace::RGB
    }
}

/// Read a single byte, mapping an exhausted reader to [`DecodeErrors::Io`].
#[inline]
pub fn read_u8<R: Read>(reader: &mut R) -> Result<u8, DecodeErrors> {
    let mut tmp = [0u8; 1];
    reader.read_exact(&mut tmp)?;
    Ok(tmp[0])
}

/// Read a big-endian `u16` (the length/version/density fields in JFIF
/// segments are all transmitted big-endian).
#[inline]
pub fn read_u16_be<R: Read>(reader: &mut R) -> Result<u16, DecodeErrors> {
    let mut tmp = [0u8; 2];
    reader.read_exact(&mut tmp)?;
    Ok(u16::from_be_bytes(tmp))
}

/// The number of bits required to represent the magnitude of a signed
/// coefficient: `category_of(0) == 0`, and for `v != 0`,
/// `category_of(v) == ceil(log2(|v| + 1))`.
#[must_use]
pub fn category_of(v: i32) -> u8 {
    let mag = v.unsigned_abs();
    (32 - mag.leading_zeros()) as u8
}

/// Encode a signed coefficient as the `cat`-bit unsigned window the
/// baseline entropy coder transmits after the Huffman-coded
/// (run, category) prefix: positive values are sent as-is; negative
/// values are sent as `v + 2^cat - 1` (one's-complement-like folding).
#[must_use]
pub fn value_to_bits(v: i32) -> (u32, u8) {
    let cat = category_of(v);
    if cat == 0 {
        return (0, 0);
    }
    let bits = if v > 0 {
        v as u32
    } else {
        (v + (1 << cat) - 1) as u32
    };
    (bits, cat)
}

/// Inverse of [`value_to_bits`]: recover the signed coefficient from a
/// `cat`-bit unsigned window using the JPEG sign rule (top bit of the
/// window set => positive, clear => negative offset from `2^cat - 1`).
#[must_use]
pub fn bits_to_value(bits: u32, cat: u8) -> i32 {
    if cat == 0 {
        return 0;
    }
    let half = 1i32 << (cat - 1);
    if (bits as i32) < half {
        (bits as i32) - ((1 << cat) - 1)
    } else {
        bits as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zigzag_round_trips() {
        let zz = zigzag_table();
        for i in 0..64 {
            assert_eq!(zz[UN_ZIGZAG[i]], i);
            assert_eq!(UN_ZIGZAG[zz[i]], i);
        }
    }

    #[test]
    fn category_matches_ceil_log2() {
        assert_eq!(category_of(0), 0);
        assert_eq!(category_of(1), 1);
        assert_eq!(category_of(-1), 1);
        assert_eq!(category_of(17), 5);
        assert_eq!(category_of(-34), 6);
        assert_eq!(category_of(-512), 10);
        assert_eq!(category_of(2047), 11);
        assert_eq!(category_of(-2047), 11);
    }

    #[test]
    fn value_bits_round_trip() {
        for v in -2047..=2047 {
            if v == 0 {
                continue;
            }
            let (bits, cat) = value_to_bits(v);
            assert_eq!(bits_to_value(bits, cat), v);
        }
    }

    #[test]
    fn matches_worked_bit_encoding_examples() {
        assert_eq!(value_to_bits(17), (0b10001, 5));
        assert_eq!(value_to_bits(-34), (0b011101, 6));
        assert_eq!(value_to_bits(-512), (0b0111111111, 10));
        assert_eq!(bits_to_value(0b000, 3), -7);
        assert_eq!(bits_to_value(0b10001, 5), 17);
    }
}
