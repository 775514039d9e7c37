//! Parsers for individual JFIF segment bodies. Each function consumes
//! exactly the bytes belonging to its segment from `reader` and
//! mutates the decoder state passed to it; the top-level marker loop
//! lives in [`crate::decoder`].
use std::io::{Read, Seek};

use crate::components::{Component, ComponentId};
use crate::errors::{DecodeErrors, UnsupportedSchemes};
use crate::huffman::HuffmanTable;
use crate::image::ImageInfo;
use crate::marker::Marker;
use crate::misc::read_u16_be;

/// Parse an APP0 ("JFIF") segment body of `length - 2` bytes (the
/// length field itself has already been consumed). Only APP0 carries
/// data we retain; other APPn segments are the caller's responsibility
/// to skip by length.
pub fn parse_app0<R: Read>(reader: &mut R, length: u16, info: &mut ImageInfo) -> Result<(), DecodeErrors> {
    let mut remaining = length as i32 - 2;
    let mut identifier = [0u8; 5];
    reader.read_exact(&mut identifier)?;
    remaining -= 5;
    if &identifier != b"JFIF\0" {
        // Not a JFIF APP0; skip the rest of the segment and move on.
        skip(reader, remaining.max(0) as u16)?;
        return Ok(());
    }
    let mut rest = [0u8; 9];
    reader.read_exact(&mut rest)?;
    remaining -= 9;
    info.density_units = rest[2];
    info.x_density = u16::from_be_bytes([rest[3], rest[4]]);
    info.y_density = u16::from_be_bytes([rest[5], rest[6]]);
    let thumb_w = rest[7] as u32;
    let thumb_h = rest[8] as u32;
    let thumb_bytes = thumb_w * thumb_h * 3;
    skip(reader, thumb_bytes.min(remaining.max(0) as u32) as u16)?;
    Ok(())
}

/// Parse a COM (comment) segment body of `length - 2` ASCII bytes.
pub fn parse_com<R: Read>(reader: &mut R, length: u16) -> Result<String, DecodeErrors> {
    let body_len = (length as usize).saturating_sub(2);
    let mut buf = vec![0u8; body_len];
    reader.read_exact(&mut buf)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Skip `len` bytes of a segment this crate has no use for.
pub fn skip<R: Read>(reader: &mut R, len: u16) -> Result<(), DecodeErrors> {
    let mut buf = vec![0u8; len as usize];
    reader.read_exact(&mut buf)?;
    Ok(())
}

/// Parse one or more quantization tables out of a DQT segment body.
/// `length` is the full segment length including the two length bytes.
pub fn parse_dqt<R: Read>(
    reader: &mut R,
    length: u16,
    qt_tables: &mut [Option<[u16; 64]>; 4],
) -> Result<(), DecodeErrors> {
    let mut remaining = length as i32 - 2;
    while remaining > 0 {
        let pq_tq = crate::misc::read_u8(reader)?;
        let precision = pq_tq >> 4;
        let index = (pq_tq & 0x0F) as usize;
        if precision != 0 {
            return Err(DecodeErrors::Unsupported(UnsupportedSchemes::SixteenBitPrecision));
        }
        if index >= 4 {
            return Err(DecodeErrors::DqtError(format!(
                "quantization table index {index} is out of range 0..=3"
            )));
        }
        let mut table = [0u16; 64];
        for slot in table.iter_mut() {
            *slot = crate::misc::read_u8(reader)? as u16;
        }
        qt_tables[index] = Some(table);
        remaining -= 1 + 64;
    }
    if remaining != 0 {
        return Err(DecodeErrors::DqtError(
            "DQT segment length did not align with the tables it declared".into(),
        ));
    }
    Ok(())
}

/// Parse one or more Huffman tables out of a DHT segment body.
/// Returns `(class, id, table)` triples; `class` is 0 for DC, 1 for AC.
pub fn parse_huffman<R: Read>(reader: &mut R, length: u16) -> Result<Vec<(u8, u8, HuffmanTable)>, DecodeErrors> {
    let mut remaining = length as i32 - 2;
    let mut out = Vec::new();
    while remaining > 0 {
        let tc_th = crate::misc::read_u8(reader)?;
        let class = tc_th >> 4;
        let id = tc_th & 0x0F;
        if class > 1 || id > 3 {
            return Err(DecodeErrors::HuffmanDecode(format!(
                "invalid huffman table class/id byte 0x{tc_th:02x}"
            )));
        }
        let mut bits = [0u8; 16];
        for slot in bits.iter_mut() {
            *slot = crate::misc::read_u8(reader)?;
        }
        let total: usize = bits.iter().map(|&b| b as usize).sum();
        let mut symbols = vec![0u8; total];
        reader.read_exact(&mut symbols)?;
        let table = HuffmanTable::build(&bits, &symbols)?;
        remaining -= 1 + 16 + total as i32;
        out.push((class, id, table));
    }
    if remaining != 0 {
        return Err(DecodeErrors::HuffmanDecode(
            "DHT segment length did not align with the tables it declared".into(),
        ));
    }
    Ok(out)
}

/// Parse a SOF0 (baseline DCT) frame header body. Rejects anything
/// that isn't 8-bit precision, 3 components, or 1x1 sampling factors
/// (the 4:4:4, non-subsampled invariant this crate enforces).
pub fn parse_sof0<R: Read>(reader: &mut R) -> Result<(u16, u16, Vec<Component>), DecodeErrors> {
    let precision = crate::misc::read_u8(reader)?;
    if precision != 8 {
        return Err(DecodeErrors::SofError(format!(
            "unsupported sample precision {precision}, only 8-bit is supported"
        )));
    }
    let height = read_u16_be(reader)?;
    let width = read_u16_be(reader)?;
    if width == 0 || height == 0 {
        return Err(DecodeErrors::ZeroDimension);
    }
    let component_count = crate::misc::read_u8(reader)?;
    if component_count != 3 {
        return Err(DecodeErrors::SofError(format!(
            "expected 3 components (Y, Cb, Cr), found {component_count}"
        )));
    }
    let mut components = Vec::with_capacity(3);
    for _ in 0..component_count {
        let id_byte = crate::misc::read_u8(reader)?;
        let sampling = crate::misc::read_u8(reader)?;
        let h_sample = sampling >> 4;
        let v_sample = sampling & 0x0F;
        let quant_table = crate::misc::read_u8(reader)?;
        if h_sample != 1 || v_sample != 1 {
            return Err(DecodeErrors::Unsupported(UnsupportedSchemes::ChromaSubsampled));
        }
        if quant_table >= 4 {
            return Err(DecodeErrors::SofError(format!(
                "component selects quantization table {quant_table}, out of range 0..=3"
            )));
        }
        let id = ComponentId::from_id(id_byte)?;
        components.push(Component::new(id, h_sample, v_sample, quant_table));
    }
    Ok((width, height, components))
}

/// Parse a SOS (start-of-scan) header body, assigning each component's
/// DC/AC Huffman table selectors in place. Returns an error if the
/// scan does not reference exactly as many components as the frame
/// declared, or selects a restart interval / spectral-selection range
/// outside the baseline sequential single-scan contract.
pub fn parse_sos<R: Read>(reader: &mut R, components: &mut [Component]) -> Result<(), DecodeErrors> {
    let scan_component_count = crate::misc::read_u8(reader)?;
    if scan_component_count as usize != components.len() {
        return Err(DecodeErrors::Unsupported(UnsupportedSchemes::MultiScan));
    }
    for _ in 0..scan_component_count {
        let id_byte = crate::misc::read_u8(reader)?;
        let table_sel = crate::misc::read_u8(reader)?;
        let id = ComponentId::from_id(id_byte)?;
        let component = components
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| DecodeErrors::SosError(format!("scan references unknown component id {id_byte}")))?;
        let dc_sel = table_sel >> 4;
        let ac_sel = table_sel & 0x0F;
        if dc_sel >= 4 || ac_sel >= 4 {
            return Err(DecodeErrors::SosError(format!(
                "scan selects huffman table selector byte 0x{table_sel:02x}, out of range 0..=3 per nibble"
            )));
        }
        component.dc_huffman_table = dc_sel;
        component.ac_huffman_table = ac_sel;
    }
    // Spectral selection start/end and successive approximation; for
    // baseline sequential these are fixed at 0, 63, 0.
    let ss = crate::misc::read_u8(reader)?;
    let se = crate::misc::read_u8(reader)?;
    let ah_al = crate::misc::read_u8(reader)?;
    if ss != 0 || se != 63 || ah_al != 0 {
        return Err(DecodeErrors::Unsupported(UnsupportedSchemes::ProgressiveDctHuffman));
    }
    Ok(())
}

/// Identify the `Marker` following an 0xFF prefix byte, skipping any
/// 0xFF fill bytes first (the standard allows any number of them).
pub fn read_marker<R: Read + Seek>(reader: &mut R) -> Result<Marker, DecodeErrors> {
    let offset = reader.stream_position().unwrap_or(0);
    let mut byte = crate::misc::read_u8(reader)?;
    if byte != 0xFF {
        return Err(DecodeErrors::Malformed(format!(
            "expected a marker (0xFF prefix) at byte offset {offset}, found byte 0x{byte:02x}"
        )));
    }
    // Skip fill bytes (multiple 0xFF in a row before the real marker byte).
    while byte == 0xFF {
        byte = crate::misc::read_u8(reader)?;
    }
    Marker::from_u8(byte).ok_or_else(|| {
        DecodeErrors::Malformed(format!(
            "unrecognized marker byte 0x{byte:02x} at offset {offset}"
        ))
    })
}
