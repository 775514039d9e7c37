//! End-to-end scenario tests. Each test's doc comment names the
//! behavior it pins down.
use baseline_jpeg::errors::ErrorKind;
use baseline_jpeg::{Decoder, Encoder};

/// A single constant-128-gray 8x8 image decodes back to 64 identical
/// (128, 128, 128) RGB triples.
#[test]
fn single_gray_block_decodes_to_constant_rgb() {
    let pixels = vec![128u8; 8 * 8 * 3];
    let encoder = Encoder::new();
    let bytes = encoder.encode(8, 8, &pixels).unwrap();

    let mut decoder = Decoder::new();
    let image = decoder.decode_buffer(&bytes).unwrap();

    assert_eq!(image.pixels.len(), 64 * 3);
    for triple in image.pixels.chunks_exact(3) {
        assert_eq!(triple, [128, 128, 128]);
    }
}

/// A SOF0 segment declaring non-1x1 sampling factors is rejected with
/// `Unsupported`, and no raster is produced.
#[test]
fn chroma_subsampled_frame_header_is_rejected() {
    let bytes = build_subsampled_frame_header();
    let mut decoder = Decoder::new();
    let err = decoder.decode_buffer(&bytes).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unsupported);
}

/// Builds just enough of a JFIF stream (SOI + SOF0 declaring Y with
/// sampling 2x1) to exercise the sampling-factor check; the scanner
/// must fail before ever reaching the scan data.
fn build_subsampled_frame_header() -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&0xFFD8u16.to_be_bytes()); // SOI
    out.extend_from_slice(&0xFFC0u16.to_be_bytes()); // SOF0
    out.extend_from_slice(&17u16.to_be_bytes());
    out.push(8); // precision
    out.extend_from_slice(&8u16.to_be_bytes()); // height
    out.extend_from_slice(&8u16.to_be_bytes()); // width
    out.push(3); // component count
    out.push(1);
    out.push(0x21); // Y: h=2, v=1 -- the rejected case
    out.push(0);
    out.push(2);
    out.push(0x11);
    out.push(1);
    out.push(3);
    out.push(0x11);
    out.push(1);
    out
}
