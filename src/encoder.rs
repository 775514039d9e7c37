//! The encoder mirror: RGB -> YCbCr -> level shift -> forward DCT ->
//! quantize -> zig-zag -> run-length -> Huffman-code, using the fixed
//! Annex-K quality-50 tables baked in as constants below.
use std::path::Path;

use crate::color_convert::rgb_to_ycbcr;
use crate::errors::EncodeErrors;
use crate::idct::fdct_2d;
use crate::misc::{category_of, value_to_bits, UN_ZIGZAG};
use crate::ppm;

/// Luminance quantization table, quality 50, natural (row-major) order.
#[rustfmt::skip]
const STD_LUMA_QT_NATURAL: [u16; 64] = [
    16, 11, 10, 16, 24, 40, 51, 61,
    12, 12, 14, 19, 26, 58, 60, 55,
    14, 13, 16, 24, 40, 57, 69, 56,
    14, 17, 22, 29, 51, 87, 80, 62,
    18, 22, 37, 56, 68,109,103, 77,
    24, 35, 55, 64, 81,104,113, 92,
    49, 64, 78, 87,103,121,120,101,
    72, 92, 95, 98,112,100,103, 99,
];

/// Chrominance quantization table, quality 50, natural (row-major) order.
#[rustfmt::skip]
const STD_CHROMA_QT_NATURAL: [u16; 64] = [
    17, 18, 24, 47, 99, 99, 99, 99,
    18, 21, 26, 66, 99, 99, 99, 99,
    24, 26, 56, 99, 99, 99, 99, 99,
    47, 66, 99, 99, 99, 99, 99, 99,
    99, 99, 99, 99, 99, 99, 99, 99,
    99, 99, 99, 99, 99, 99, 99, 99,
    99, 99, 99, 99, 99, 99, 99, 99,
    99, 99, 99, 99, 99, 99, 99, 99,
];

const STD_LUMA_DC_BITS: [u8; 16] = [0, 0, 1, 5, 1, 1, 1, 1, 1, 1, 0, 0, 0, 0, 0, 0];
const STD_LUMA_DC_VALUES: [u8; 12] = [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11];

const STD_CHROMA_DC_BITS: [u8; 16] = [0, 3, 1, 1, 1, 1, 1, 1, 1, 1, 1, 0, 0, 0, 0, 0];
const STD_CHROMA_DC_VALUES: [u8; 12] = [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11];

const STD_LUMA_AC_BITS: [u8; 16] = [0, 2, 1, 3, 3, 2, 4, 3, 5, 5, 4, 4, 0, 0, 1, 0x7d];
#[rustfmt::skip]
const STD_LUMA_AC_VALUES: [u8; 162] = [
    0x01, 0x02, 0x03, 0x00, 0x04, 0x11, 0x05, 0x12,
    0x21, 0x31, 0x41, 0x06, 0x13, 0x51, 0x61, 0x07,
    0x22, 0x71, 0x14, 0x32, 0x81, 0x91, 0xa1, 0x08,
    0x23, 0x42, 0xb1, 0xc1, 0x15, 0x52, 0xd1, 0xf0,
    0x24, 0x33, 0x62, 0x72, 0x82, 0x09, 0x0a, 0x16,
    0x17, 0x18, 0x19, 0x1a, 0x25, 0x26, 0x27, 0x28,
    0x29, 0x2a, 0x34, 0x35, 0x36, 0x37, 0x38, 0x39,
    0x3a, 0x43, 0x44, 0x45, 0x46, 0x47, 0x48, 0x49,
    0x4a, 0x53, 0x54, 0x55, 0x56, 0x57, 0x58, 0x59,
    0x5a, 0x63, 0x64, 0x65, 0x66, 0x67, 0x68, 0x69,
    0x6a, 0x73, 0x74, 0x75, 0x76, 0x77, 0x78, 0x79,
    0x7a, 0x83, 0x84, 0x85, 0x86, 0x87, 0x88, 0x89,
    0x8a, 0x92, 0x93, 0x94, 0x95, 0x96, 0x97, 0x98,
    0x99, 0x9a, 0xa2, 0xa3, 0xa4, 0xa5, 0xa6, 0xa7,
    0xa8, 0xa9, 0xaa, 0xb2, 0xb3, 0xb4, 0xb5, 0xb6,
    0xb7, 0xb8, 0xb9, 0xba, 0xc2, 0xc3, 0xc4, 0xc5,
    0xc6, 0xc7, 0xc8, 0xc9, 0xca, 0xd2, 0xd3, 0xd4,
    0xd5, 0xd6, 0xd7, 0xd8, 0xd9, 0xda, 0xe1, 0xe2,
    0xe3, 0xe4, 0xe5, 0xe6, 0xe7, 0xe8, 0xe9, 0xea,
    0xf1, 0xf2, 0xf3, 0xf4, 0xf5, 0xf6, 0xf7, 0xf8,
    0xf9, 0xfa,
];

const STD_CHROMA_AC_BITS: [u8; 16] = [0, 2, 1, 2, 4, 4, 3, 4, 7, 5, 4, 4, 0, 1, 2, 0x77];
#[rustfmt::skip]
const STD_CHROMA_AC_VALUES: [u8; 162] = [
    0x00, 0x01, 0x02, 0x03, 0x11, 0x04, 0x05, 0x21,
    0x31, 0x06, 0x12, 0x41, 0x51, 0x07, 0x61, 0x71,
    0x13, 0x22, 0x32, 0x81, 0x08, 0x14, 0x42, 0x91,
    0xa1, 0xb1, 0xc1, 0x09, 0x23, 0x33, 0x52, 0xf0,
    0x15, 0x62, 0x72, 0xd1, 0x0a, 0x16, 0x24, 0x34,
    0xe1, 0x25, 0xf1, 0x17, 0x18, 0x19, 0x1a, 0x26,
    0x27, 0x28, 0x29, 0x2a, 0x35, 0x36, 0x37, 0x38,
    0x39, 0x3a, 0x43, 0x44, 0x45, 0x46, 0x47, 0x48,
    0x49, 0x4a, 0x53, 0x54, 0x55, 0x56, 0x57, 0x58,
    0x59, 0x5a, 0x63, 0x64, 0x65, 0x66, 0x67, 0x68,
    0x69, 0x6a, 0x73, 0x74, 0x75, 0x76, 0x77, 0x78,
    0x79, 0x7a, 0x82, 0x83, 0x84, 0x85, 0x86, 0x87,
    0x88, 0x89, 0x8a, 0x92, 0x93, 0x94, 0x95, 0x96,
    0x97, 0x98, 0x99, 0x9a, 0xa2, 0xa3, 0xa4, 0xa5,
    0xa6, 0xa7, 0xa8, 0xa9, 0xaa, 0xb2, 0xb3, 0xb4,
    0xb5, 0xb6, 0xb7, 0xb8, 0xb9, 0xba, 0xc2, 0xc3,
    0xc4, 0xc5, 0xc6, 0xc7, 0xc8, 0xc9, 0xca, 0xd2,
    0xd3, 0xd4, 0xd5, 0xd6, 0xd7, 0xd8, 0xd9, 0xda,
    0xe2, 0xe3, 0xe4, 0xe5, 0xe6, 0xe7, 0xe8, 0xe9,
    0xea, 0xf2, 0xf3, 0xf4, 0xf5, 0xf6, 0xf7, 0xf8,
    0xf9, 0xfa,
];

/// A symbol's canonical (code, length) pair, looked up by linear scan
/// over the small (<=162 entry) per-segment table; these tables are
/// built once per `encode` call, not per block.
struct EncodeTable {
    codes: Vec<(u8, u32, u8)>,
}

impl EncodeTable {
    fn build(bits: &[u8; 16], values: &[u8]) -> Self {
        let mut codes = Vec::with_capacity(values.len());
        let mut code: u32 = 0;
        let mut k = 0usize;
        for (len_idx, &count) in bits.iter().enumerate() {
            let len = (len_idx + 1) as u8;
            for _ in 0..count {
                codes.push((values[k], code, len));
                code += 1;
                k += 1;
            }
            code <<= 1;
        }
        EncodeTable { codes }
    }

    fn lookup(&self, symbol: u8) -> (u32, u8) {
        self.codes
            .iter()
            .find(|(s, _, _)| *s == symbol)
            .map(|&(_, code, len)| (code, len))
            .unwrap_or((0, 0))
    }
}

/// A bit-level sink that MSB-first packs written bit-strings into
/// bytes, stuffing a 0x00 after every 0xFF byte it emits, and padding
/// the final partial byte with 1-bits on [`BitWriter::finish`].
struct BitWriter {
    out: Vec<u8>,
    acc: u32,
    bit_count: u8,
}

impl BitWriter {
    fn new() -> Self {
        BitWriter {
            out: Vec::new(),
            acc: 0,
            bit_count: 0,
        }
    }

    fn write_bits(&mut self, value: u32, len: u8) {
        if len == 0 {
            return;
        }
        debug_assert!(len <= 24, "write_bits is only sized for short codes");
        let mask = (1u32 << len) - 1;
        self.acc = (self.acc << len) | (value & mask);
        self.bit_count += len;
        while self.bit_count >= 8 {
            self.bit_count -= 8;
            let byte = ((self.acc >> self.bit_count) & 0xFF) as u8;
            self.push_byte(byte);
        }
    }

    fn push_byte(&mut self, byte: u8) {
        self.out.push(byte);
        if byte == 0xFF {
            self.out.push(0x00);
        }
    }

    /// Pad the trailing partial byte with 1-bits and return the
    /// accumulated, already-stuffed output.
    fn finish(mut self) -> Vec<u8> {
        if self.bit_count > 0 {
            let pad = 8 - self.bit_count;
            let byte = (((self.acc << pad) | ((1u32 << pad) - 1)) & 0xFF) as u8;
            self.push_byte(byte);
        }
        self.out
    }
}

/// A single-use baseline JPEG encoder, fixed to quality-50 Annex-K
/// tables (the quantization tables are a Non-goal to make tunable).
#[derive(Default)]
pub struct Encoder {
    /// Optional COM segment text, emitted verbatim if set.
    pub comment: Option<String>,
}

impl Encoder {
    #[must_use]
    pub fn new() -> Self {
        Encoder::default()
    }

    /// Encode a raw interleaved RGB raster of `width x height` pixels
    /// into a complete JFIF byte stream.
    pub fn encode(&self, width: u16, height: u16, rgb: &[u8]) -> Result<Vec<u8>, EncodeErrors> {
        if width == 0 || height == 0 {
            return Err(EncodeErrors::DimensionError(
                "cannot encode a zero-width or zero-height image".into(),
            ));
        }
        let expected = width as usize * height as usize * 3;
        if rgb.len() != expected {
            return Err(EncodeErrors::InvalidRaster(format!(
                "expected {expected} bytes of RGB pixel data, found {}",
                rgb.len()
            )));
        }

        let mut out = Vec::new();
        out.extend_from_slice(&0xFFD8u16.to_be_bytes());
        self.write_app0(&mut out);
        if let Some(text) = &self.comment {
            self.write_com(&mut out, text);
        }
        write_dqt(&mut out, 0, &STD_LUMA_QT_NATURAL);
        write_dqt(&mut out, 1, &STD_CHROMA_QT_NATURAL);
        write_sof0(&mut out, width, height);
        let luma_dc = EncodeTable::build(&STD_LUMA_DC_BITS, &STD_LUMA_DC_VALUES);
        let luma_ac = EncodeTable::build(&STD_LUMA_AC_BITS, &STD_LUMA_AC_VALUES);
        let chroma_dc = EncodeTable::build(&STD_CHROMA_DC_BITS, &STD_CHROMA_DC_VALUES);
        let chroma_ac = EncodeTable::build(&STD_CHROMA_AC_BITS, &STD_CHROMA_AC_VALUES);
        write_dht(&mut out, 0, 0, &STD_LUMA_DC_BITS, &STD_LUMA_DC_VALUES);
        write_dht(&mut out, 1, 0, &STD_LUMA_AC_BITS, &STD_LUMA_AC_VALUES);
        write_dht(&mut out, 0, 1, &STD_CHROMA_DC_BITS, &STD_CHROMA_DC_VALUES);
        write_dht(&mut out, 1, 1, &STD_CHROMA_AC_BITS, &STD_CHROMA_AC_VALUES);
        write_sos(&mut out);

        let entropy = self.encode_scan(
            width,
            height,
            rgb,
            &luma_dc,
            &luma_ac,
            &chroma_dc,
            &chroma_ac,
        );
        out.extend_from_slice(&entropy);
        out.extend_from_slice(&0xFFD9u16.to_be_bytes());
        Ok(out)
    }

    /// Read a PPM file and encode it to a JFIF file at `out_path`.
    pub fn encode_ppm_file(&self, ppm_path: impl AsRef<Path>, out_path: impl AsRef<Path>) -> Result<(), EncodeErrors> {
        let image = ppm::read_ppm(ppm_path)?;
        let bytes = self.encode(image.width, image.height, &image.pixels)?;
        std::fs::write(out_path, bytes)?;
        Ok(())
    }

    fn write_app0(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&0xFFE0u16.to_be_bytes());
        out.extend_from_slice(&16u16.to_be_bytes());
        out.extend_from_slice(b"JFIF\0");
        out.push(1); // major version
        out.push(1); // minor version
        out.push(0); // density units: aspect ratio
        out.extend_from_slice(&1u16.to_be_bytes()); // Xdensity
        out.extend_from_slice(&1u16.to_be_bytes()); // Ydensity
        out.push(0); // thumbnail width
        out.push(0); // thumbnail height
    }

    fn write_com(&self, out: &mut Vec<u8>, text: &str) {
        let bytes = text.as_bytes();
        out.extend_from_slice(&0xFFFEu16.to_be_bytes());
        out.extend_from_slice(&((bytes.len() + 2) as u16).to_be_bytes());
        out.extend_from_slice(bytes);
    }

    #[allow(clippy::too_many_arguments)]
    fn encode_scan(
        &self,
        width: u16,
        height: u16,
        rgb: &[u8],
        luma_dc: &EncodeTable,
        luma_ac: &EncodeTable,
        chroma_dc: &EncodeTable,
        chroma_ac: &EncodeTable,
    ) -> Vec<u8> {
        let mcu_w = (width as usize).div_ceil(8);
        let mcu_h = (height as usize).div_ceil(8);
        let mut writer = BitWriter::new();

        let mut dc_pred = [0i32; 3];
        for mcu_row in 0..mcu_h {
            for mcu_col in 0..mcu_w {
                let (y_block, cb_block, cr_block) =
                    extract_block(rgb, width as usize, height as usize, mcu_col * 8, mcu_row * 8);
                for (comp_idx, block) in [y_block, cb_block, cr_block].iter().enumerate() {
                    let qt = if comp_idx == 0 {
                        &STD_LUMA_QT_NATURAL
                    } else {
                        &STD_CHROMA_QT_NATURAL
                    };
                    let (dc_table, ac_table) = if comp_idx == 0 {
                        (luma_dc, luma_ac)
                    } else {
                        (chroma_dc, chroma_ac)
                    };
                    encode_block_internal(&mut writer, block, qt, dc_table, ac_table, &mut dc_pred[comp_idx]);
                }
            }
        }

        writer.finish()
    }
}

/// Extract and color-convert one 8x8-per-component MCU starting at
/// pixel `(x0, y0)`, clamping to the image edge for the padding
/// columns/rows introduced by dimensions not a multiple of 8 (the last
/// valid pixel in each direction is repeated, the conventional JPEG
/// edge-extension behavior).
fn extract_block(rgb: &[u8], width: usize, height: usize, x0: usize, y0: usize) -> ([f32; 64], [f32; 64], [f32; 64]) {
    let mut y_block = [0f32; 64];
    let mut cb_block = [0f32; 64];
    let mut cr_block = [0f32; 64];
    for by in 0..8 {
        let sy = (y0 + by).min(height - 1);
        for bx in 0..8 {
            let sx = (x0 + bx).min(width - 1);
            let idx = (sy * width + sx) * 3;
            let (r, g, b) = (rgb[idx], rgb[idx + 1], rgb[idx + 2]);
            let (y, cb, cr) = rgb_to_ycbcr(r, g, b);
            let slot = by * 8 + bx;
            y_block[slot] = y as f32 - 128.0;
            cb_block[slot] = cb as f32 - 128.0;
            cr_block[slot] = cr as f32 - 128.0;
        }
    }
    (y_block, cb_block, cr_block)
}

/// Forward-transform, quantize, and entropy-code one 8x8 block,
/// updating `dc_pred` in place.
fn encode_block_internal(
    writer: &mut BitWriter,
    samples: &[f32; 64],
    qt_natural: &[u16; 64],
    dc_table: &EncodeTable,
    ac_table: &EncodeTable,
    dc_pred: &mut i32,
) {
    let freq = fdct_2d(samples);

    // Quantize in natural order, then read out in zig-zag order.
    let mut zigzag = [0i32; 64];
    for (zz, &natural_idx) in UN_ZIGZAG.iter().enumerate() {
        let quantized = (freq[natural_idx] / qt_natural[natural_idx] as f32).round() as i32;
        zigzag[zz] = quantized;
    }

    let dc = zigzag[0];
    let diff = dc - *dc_pred;
    *dc_pred = dc;
    let (bits, cat) = value_to_bits(diff);
    let (code, len) = dc_table.lookup(cat);
    writer.write_bits(code, len);
    writer.write_bits(bits, cat);

    let mut run = 0u8;
    for i in 1..64 {
        let coeff = zigzag[i];
        if coeff == 0 {
            run += 1;
            if i == 63 {
                let (code, len) = ac_table.lookup(0x00);
                writer.write_bits(code, len);
            }
            continue;
        }
        while run >= 16 {
            let (code, len) = ac_table.lookup(0xF0);
            writer.write_bits(code, len);
            run -= 16;
        }
        let cat = category_of(coeff);
        let symbol = (run << 4) | cat;
        let (code, len) = ac_table.lookup(symbol);
        writer.write_bits(code, len);
        let (bits, _) = value_to_bits(coeff);
        writer.write_bits(bits, cat);
        run = 0;
    }
}

fn write_dqt(out: &mut Vec<u8>, index: u8, table_natural: &[u16; 64]) {
    out.extend_from_slice(&0xFFDBu16.to_be_bytes());
    out.extend_from_slice(&67u16.to_be_bytes()); // 2 (length) + 1 (pq/tq) + 64
    out.push(index);
    for &natural_idx in &UN_ZIGZAG {
        out.push(table_natural[natural_idx] as u8);
    }
}

fn write_sof0(out: &mut Vec<u8>, width: u16, height: u16) {
    out.extend_from_slice(&0xFFC0u16.to_be_bytes());
    out.extend_from_slice(&17u16.to_be_bytes()); // 2 + 1 + 2 + 2 + 1 + 3*3
    out.push(8); // precision
    out.extend_from_slice(&height.to_be_bytes());
    out.extend_from_slice(&width.to_be_bytes());
    out.push(3); // component count
    // (id, sampling, quant table index)
    out.push(1);
    out.push(0x11);
    out.push(0);
    out.push(2);
    out.push(0x11);
    out.push(1);
    out.push(3);
    out.push(0x11);
    out.push(1);
}

fn write_dht(out: &mut Vec<u8>, class: u8, id: u8, bits: &[u8; 16], values: &[u8]) {
    out.extend_from_slice(&0xFFC4u16.to_be_bytes());
    let length = 2 + 1 + 16 + values.len();
    out.extend_from_slice(&(length as u16).to_be_bytes());
    out.push((class << 4) | id);
    out.extend_from_slice(bits);
    out.extend_from_slice(values);
}

fn write_sos(out: &mut Vec<u8>) {
    out.extend_from_slice(&0xFFDAu16.to_be_bytes());
    out.extend_from_slice(&12u16.to_be_bytes()); // 2 + 1 + 3*2 + 3
    out.push(3); // component count
    out.push(1);
    out.push(0x00); // Y: DC table 0, AC table 0
    out.push(2);
    out.push(0x11); // Cb: DC table 1, AC table 1
    out.push(3);
    out.push(0x11); // Cr: DC table 1, AC table 1
    out.push(0); // spectral selection start
    out.push(63); // spectral selection end
    out.push(0); // successive approximation
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_mismatched_pixel_count() {
        let encoder = Encoder::new();
        let err = encoder.encode(4, 4, &[0u8; 10]).unwrap_err();
        assert!(matches!(err, EncodeErrors::InvalidRaster(_)));
    }

    #[test]
    fn emits_soi_and_eoi() {
        let encoder = Encoder::new();
        let pixels = vec![128u8; 8 * 8 * 3];
        let bytes = encoder.encode(8, 8, &pixels).unwrap();
        assert_eq!(&bytes[0..2], &[0xFF, 0xD8]);
        assert_eq!(&bytes[bytes.len() - 2..], &[0xFF, 0xD9]);
    }

    #[test]
    fn gray_block_encodes_without_panicking() {
        let encoder = Encoder::new();
        let pixels = vec![128u8; 16 * 16 * 3];
        let bytes = encoder.encode(16, 16, &pixels).unwrap();
        assert!(bytes.len() > 4);
    }
}
