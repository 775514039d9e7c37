//! End-to-end encode -> decode round trips.
use baseline_jpeg::{Decoder, Encoder};

/// A deterministic (not all-constant) 16x16 RGB pattern, built without
/// an RNG dependency: exercises every DCT coefficient band rather than
/// just the DC term.
fn pattern_16x16() -> Vec<u8> {
    let mut pixels = Vec::with_capacity(16 * 16 * 3);
    for y in 0..16u32 {
        for x in 0..16u32 {
            let r = ((x * 16 + y * 7) % 256) as u8;
            let g = ((x * 3 + y * 23) % 256) as u8;
            let b = ((x * 11 + y * 5) % 256) as u8;
            pixels.extend_from_slice(&[r, g, b]);
        }
    }
    pixels
}

#[test]
fn decoded_dimensions_match_declared_dimensions() {
    let pixels = pattern_16x16();
    let encoder = Encoder::new();
    let bytes = encoder.encode(16, 16, &pixels).unwrap();

    let mut decoder = Decoder::new();
    let image = decoder.decode_buffer(&bytes).unwrap();

    assert_eq!(image.width(), 16);
    assert_eq!(image.height(), 16);
    assert_eq!(image.pixels.len(), 16 * 16 * 3);
}

#[test]
fn round_trip_error_is_bounded_by_quantization_noise() {
    let pixels = pattern_16x16();
    let encoder = Encoder::new();
    let bytes = encoder.encode(16, 16, &pixels).unwrap();

    let mut decoder = Decoder::new();
    let image = decoder.decode_buffer(&bytes).unwrap();

    let mut total_error: i64 = 0;
    for (original, decoded) in pixels.iter().zip(image.pixels.iter()) {
        total_error += (*original as i64 - *decoded as i64).abs();
    }
    let mean_abs_error = total_error as f64 / pixels.len() as f64;
    assert!(
        mean_abs_error < 6.0,
        "mean absolute error {mean_abs_error} exceeds the quality-50 quantization noise bound"
    );
}

#[test]
fn non_multiple_of_eight_dimensions_trim_correctly() {
    // 10x10 forces padding up to 16x16 internally; the decoded raster
    // must still come back at the declared, unpadded size.
    let mut pixels = Vec::with_capacity(10 * 10 * 3);
    for _ in 0..10 * 10 {
        pixels.extend_from_slice(&[200u8, 100, 50]);
    }
    let encoder = Encoder::new();
    let bytes = encoder.encode(10, 10, &pixels).unwrap();

    let mut decoder = Decoder::new();
    let image = decoder.decode_buffer(&bytes).unwrap();
    assert_eq!(image.width(), 10);
    assert_eq!(image.height(), 10);
    assert_eq!(image.pixels.len(), 10 * 10 * 3);
}
