//! A baseline (SOF0) sequential DCT JPEG codec, restricted to 4:4:4
//! (no chroma subsampling) images.
//!
//! This crate decodes a JFIF-wrapped baseline JPEG bit-stream into an
//! RGB raster, and encodes an RGB raster back into a baseline JPEG
//! using fixed Annex-K quality-50 tables. Progressive, arithmetic,
//! lossless, hierarchical, subsampled and multi-scan/restart-marker
//! images are explicitly unsupported and are rejected with
//! [`errors::DecodeErrors::Unsupported`].
#![forbid(unsafe_code)]

pub mod bitstream;
mod color_convert;
mod components;
pub mod decoder;
pub mod encoder;
pub mod errors;
mod headers;
mod huffman;
mod idct;
pub mod image;
mod marker;
mod misc;
pub mod ppm;

pub use decoder::Decoder;
pub use encoder::Encoder;
pub use errors::{DecodeErrors, EncodeErrors, ErrorKind};
pub use image::{Image, ImageInfo};
pub use misc::ColorSpace;
