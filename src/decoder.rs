//! The baseline JPEG decoder: drives the segment scanner's state
//! machine, owns the quantization/Huffman tables and per-component DC
//! predictors for the duration of one decode call, and hands the
//! reconstructed MCUs off to [`crate::image::assemble_raster`].
use std::io::Cursor;
use std::path::Path;

use log::{debug, warn};

use crate::bitstream::BitStream;
use crate::components::Component;
use crate::errors::{DecodeErrors, UnsupportedSchemes};
use crate::headers::{self, read_marker};
use crate::huffman::HuffmanTable;
use crate::image::{assemble_raster, Image, ImageInfo, McuBlocks};
use crate::marker::Marker;
use crate::misc::ColorSpace;

/// A single-use baseline JPEG decoder. Construct one per image; all
/// state (quant tables, Huffman tables, DC predictors) lives on the
/// instance and is reset by [`Decoder::new`], so two decoders may run
/// concurrently on separate threads with no shared mutable state.
#[derive(Default)]
pub struct Decoder {
    qt_tables: [Option<[u16; 64]>; 4],
    dc_huffman_tables: [Option<HuffmanTable>; 4],
    ac_huffman_tables: [Option<HuffmanTable>; 4],
    components: Vec<Component>,
    info: ImageInfo,
    comment: Option<String>,
}

impl Decoder {
    #[must_use]
    pub fn new() -> Self {
        Decoder::default()
    }

    /// Decode a JPEG file from disk into an [`Image`].
    pub fn decode_file(&mut self, path: impl AsRef<Path>) -> Result<Image, DecodeErrors> {
        let bytes = std::fs::read(path)?;
        self.decode_buffer(&bytes)
    }

    /// Decode a complete in-memory JFIF byte stream into an [`Image`].
    pub fn decode_buffer(&mut self, buf: &[u8]) -> Result<Image, DecodeErrors> {
        let mut reader = Cursor::new(buf);

        // AwaitSOI.
        let mut magic = [0u8; 2];
        std::io::Read::read_exact(&mut reader, &mut magic).map_err(DecodeErrors::from)?;
        let magic_u16 = u16::from_be_bytes(magic);
        if magic_u16 != 0xFFD8 {
            return Err(DecodeErrors::IllegalMagicBytes(magic_u16));
        }
        debug!("SOI observed, entering header scan");

        // InHeaders.
        let (width, height) = self.scan_headers(&mut reader)?;

        // AwaitScan -> InScan: the SOS header was already consumed by
        // scan_headers, which left `reader` positioned at the first
        // entropy-coded byte.
        let mcu_w = width.div_ceil(8) as usize;
        let mcu_h = height.div_ceil(8) as usize;
        let mcus = self.decode_scan(&mut reader, mcu_w, mcu_h)?;

        // Finalized.
        self.expect_eoi(&mut reader)?;

        let pixels = assemble_raster(&mcus, mcu_w, mcu_h, width, height);
        self.info.width = width;
        self.info.height = height;

        Ok(Image {
            info: self.info.clone(),
            colorspace: ColorSpace::RGB,
            pixels,
            comment: self.comment.take(),
        })
    }

    /// Consume segments until a SOS header has been fully parsed.
    /// Returns the frame's (width, height).
    fn scan_headers(&mut self, reader: &mut Cursor<&[u8]>) -> Result<(u16, u16), DecodeErrors> {
        let mut dims: Option<(u16, u16)> = None;
        loop {
            let marker_offset = reader.position();
            let marker = read_marker(reader)?;
            match marker {
                Marker::APP(0) => {
                    let length = crate::misc::read_u16_be(reader)?;
                    headers::parse_app0(reader, length, &mut self.info)?;
                }
                Marker::APP(_) => {
                    let length = crate::misc::read_u16_be(reader)?;
                    headers::skip(reader, length - 2)?;
                }
                Marker::COM => {
                    let length = crate::misc::read_u16_be(reader)?;
                    self.comment = Some(headers::parse_com(reader, length)?);
                }
                Marker::DQT => {
                    let length = crate::misc::read_u16_be(reader)?;
                    headers::parse_dqt(reader, length, &mut self.qt_tables)?;
                }
                Marker::DHT => {
                    let length = crate::misc::read_u16_be(reader)?;
                    for (class, id, table) in headers::parse_huffman(reader, length)? {
                        let slot = if class == 0 {
                            &mut self.dc_huffman_tables[id as usize]
                        } else {
                            &mut self.ac_huffman_tables[id as usize]
                        };
                        *slot = Some(table);
                    }
                }
                Marker::SOF0 => {
                    let _length = crate::misc::read_u16_be(reader)?;
                    let (width, height, components) = headers::parse_sof0(reader)?;
                    for component in &components {
                        if self.qt_tables[component.quantization_table as usize].is_none() {
                            return Err(DecodeErrors::SofError(format!(
                                "component references quantization table {} which was never defined",
                                component.quantization_table
                            )));
                        }
                    }
                    self.components = components;
                    dims = Some((width, height));
                }
                Marker::DRI => {
                    return Err(DecodeErrors::Unsupported(UnsupportedSchemes::RestartMarkers));
                }
                Marker::SOS => {
                    let (w, h) = dims.ok_or_else(|| {
                        DecodeErrors::Malformed(format!(
                            "SOS encountered before a SOF0 header, at offset {marker_offset}"
                        ))
                    })?;
                    let _length = crate::misc::read_u16_be(reader)?;
                    headers::parse_sos(reader, &mut self.components)?;
                    return Ok((w, h));
                }
                Marker::SOF1 | Marker::SOF2 | Marker::SOF3 | Marker::SOF9 | Marker::SOF10
                | Marker::SOF11 => {
                    let scheme = UnsupportedSchemes::from_marker(marker).unwrap();
                    return Err(DecodeErrors::Unsupported(scheme));
                }
                Marker::EOI => {
                    return Err(DecodeErrors::Malformed(format!(
                        "EOI encountered before a scan was started, at offset {marker_offset}"
                    )));
                }
                Marker::SOI => {
                    return Err(DecodeErrors::Malformed(format!(
                        "duplicate SOI marker at offset {marker_offset}"
                    )));
                }
                Marker::RST(_) => {
                    return Err(DecodeErrors::Unsupported(UnsupportedSchemes::RestartMarkers));
                }
                Marker::Other(byte) => {
                    let length = crate::misc::read_u16_be(reader)?;
                    warn!("skipping unrecognized marker 0x{byte:02x}, {length} bytes");
                    headers::skip(reader, length - 2)?;
                }
            }
        }
    }

    /// Entropy-decode every MCU of the single scan into dequantized,
    /// un-zig-zagged coefficient blocks, ready for IDCT.
    fn decode_scan(&mut self, reader: &mut Cursor<&[u8]>, mcu_w: usize, mcu_h: usize) -> Result<Vec<McuBlocks>, DecodeErrors> {
        let remaining = {
            let pos = reader.position() as usize;
            reader.get_ref().len() - pos
        };
        let scan_start = reader.position() as usize;
        let scan_bytes = &reader.get_ref()[scan_start..scan_start + remaining];

        let mut bits = BitStream::new(scan_bytes);
        let mcu_count = mcu_w * mcu_h;
        let mut mcus = Vec::with_capacity(mcu_count);
        let zz = crate::misc::zigzag_table();

        for component in &mut self.components {
            component.dc_prediction = 0;
        }

        for _ in 0..mcu_count {
            let mut blocks: McuBlocks = [[0i32; 64]; 3];
            for (comp_idx, component) in self.components.iter_mut().enumerate() {
                let dc_table = self.dc_huffman_tables[component.dc_huffman_table as usize]
                    .as_ref()
                    .ok_or_else(|| DecodeErrors::SosError("scan selects an undefined DC huffman table".into()))?;
                let ac_table = self.ac_huffman_tables[component.ac_huffman_table as usize]
                    .as_ref()
                    .ok_or_else(|| DecodeErrors::SosError("scan selects an undefined AC huffman table".into()))?;
                let qt = self.qt_tables[component.quantization_table as usize]
                    .ok_or_else(|| DecodeErrors::DqtError("component selects an undefined quantization table".into()))?;

                // `natural` is indexed in row-major order: decode_ac
                // already un-zig-zags AC coefficients as it places
                // them (see BitStream::decode_ac).
                let mut natural = [0i32; 64];
                let dc = bits.decode_dc(dc_table, &mut component.dc_prediction)?;
                natural[0] = dc;
                bits.decode_ac(ac_table, &mut natural)?;

                for (i, slot) in natural.iter_mut().enumerate() {
                    *slot *= qt[zz[i]] as i32;
                }
                blocks[comp_idx] = natural;
            }
            mcus.push(blocks);
        }

        // Advance the outer reader past the bytes the bitstream actually
        // consumed (not the whole remaining buffer), so the caller can
        // look for EOI next.
        reader.set_position((scan_start + bits.byte_offset()) as u64);
        Ok(mcus)
    }

    fn expect_eoi(&self, reader: &mut Cursor<&[u8]>) -> Result<(), DecodeErrors> {
        // Skip any trailing fill bytes / stuffed markers the bitstream
        // left behind, then require an EOI.
        loop {
            let offset = reader.position();
            if offset as usize >= reader.get_ref().len() {
                return Err(DecodeErrors::Truncated(format!(
                    "reached end of file at offset {offset} without an EOI marker"
                )));
            }
            let byte = crate::misc::read_u8(reader)?;
            if byte != 0xFF {
                continue;
            }
            let next = crate::misc::read_u8(reader)?;
            if next == 0x00 {
                continue;
            }
            if next == 0xD9 {
                return Ok(());
            }
            return Err(DecodeErrors::Malformed(format!(
                "expected EOI after scan data, found marker 0xFF{next:02x}"
            )));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_bad_magic() {
        let mut decoder = Decoder::new();
        let err = decoder.decode_buffer(&[0x00, 0x01]).unwrap_err();
        assert!(matches!(err, DecodeErrors::Io(_)) || matches!(err, DecodeErrors::IllegalMagicBytes(_)));
    }

    #[test]
    fn rejects_non_ffd8_start() {
        let mut decoder = Decoder::new();
        let err = decoder
            .decode_buffer(&[0xFF, 0xD9, 0x00, 0x00])
            .unwrap_err();
        assert!(matches!(err, DecodeErrors::IllegalMagicBytes(0xFFD9)));
    }
}
