//! Malformed and truncated input handling.
use baseline_jpeg::errors::ErrorKind;
use baseline_jpeg::Decoder;

#[test]
fn illegal_magic_bytes_is_malformed() {
    let mut decoder = Decoder::new();
    let err = decoder.decode_buffer(&[0x00, 0x00, 0x00]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Malformed);
}

#[test]
fn truncated_after_soi_is_an_error() {
    let mut decoder = Decoder::new();
    let err = decoder.decode_buffer(&[0xFF, 0xD8]).unwrap_err();
    // Ends mid-header-scan: either a bubbled I/O EOF or an explicit
    // malformed/truncated diagnostic, never a successfully decoded image.
    assert!(matches!(
        err.kind(),
        ErrorKind::Io | ErrorKind::Malformed | ErrorKind::CorruptStream
    ));
}

#[test]
fn eoi_before_any_scan_is_malformed() {
    let mut decoder = Decoder::new();
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&0xFFD8u16.to_be_bytes());
    bytes.extend_from_slice(&0xFFD9u16.to_be_bytes());
    let err = decoder.decode_buffer(&bytes).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Malformed);
}

#[test]
fn unknown_marker_after_soi_is_malformed() {
    let mut decoder = Decoder::new();
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&0xFFD8u16.to_be_bytes());
    // 0xFF01 is the reserved TEM marker byte, not one this scanner
    // recognizes, and it has no length field to skip by.
    bytes.push(0xFF);
    bytes.push(0x01);
    let err = decoder.decode_buffer(&bytes).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Malformed);
}

/// A SOF0 component whose quantization-table selector is out of the
/// 0..=3 range must be rejected, not used as a raw array index.
#[test]
fn sof0_quant_table_selector_out_of_range_is_rejected() {
    let mut decoder = Decoder::new();
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&0xFFD8u16.to_be_bytes()); // SOI
    bytes.extend_from_slice(&0xFFC0u16.to_be_bytes()); // SOF0
    bytes.extend_from_slice(&17u16.to_be_bytes());
    bytes.push(8); // precision
    bytes.extend_from_slice(&8u16.to_be_bytes()); // height
    bytes.extend_from_slice(&8u16.to_be_bytes()); // width
    bytes.push(3); // component count
    bytes.extend_from_slice(&[1, 0x11, 4]); // Y: quant table index 4 -- out of range
    bytes.extend_from_slice(&[2, 0x11, 0]);
    bytes.extend_from_slice(&[3, 0x11, 0]);
    let err = decoder.decode_buffer(&bytes).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unsupported);
}

/// An SOS table-selector nibble (DC or AC) outside 0..=3 must be
/// rejected, not used as a raw array index.
#[test]
fn sos_huffman_selector_out_of_range_is_rejected() {
    let mut decoder = Decoder::new();
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&0xFFD8u16.to_be_bytes()); // SOI
    bytes.extend_from_slice(&0xFFC0u16.to_be_bytes()); // SOF0
    bytes.extend_from_slice(&17u16.to_be_bytes());
    bytes.push(8); // precision
    bytes.extend_from_slice(&8u16.to_be_bytes()); // height
    bytes.extend_from_slice(&8u16.to_be_bytes()); // width
    bytes.push(3); // component count
    bytes.extend_from_slice(&[1, 0x11, 0]);
    bytes.extend_from_slice(&[2, 0x11, 0]);
    bytes.extend_from_slice(&[3, 0x11, 0]);
    bytes.extend_from_slice(&0xFFDBu16.to_be_bytes()); // DQT
    bytes.extend_from_slice(&67u16.to_be_bytes());
    bytes.push(0x00); // precision 0, table index 0
    bytes.extend_from_slice(&[16u8; 64]);
    bytes.extend_from_slice(&0xFFDAu16.to_be_bytes()); // SOS
    bytes.extend_from_slice(&12u16.to_be_bytes());
    bytes.push(3); // component count
    bytes.extend_from_slice(&[1, 0xF0]); // Y: DC selector nibble 15 -- out of range
    bytes.extend_from_slice(&[2, 0x11]);
    bytes.extend_from_slice(&[3, 0x11]);
    bytes.extend_from_slice(&[0, 63, 0]); // Ss, Se, Ah/Al
    let err = decoder.decode_buffer(&bytes).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::CorruptStream);
}
