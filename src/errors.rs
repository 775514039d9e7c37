//! Error types produced by the decoder and encoder.
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};

use crate::marker::Marker;

/// The five canonical error categories a caller can match on without
/// caring about the richer, decoder-specific variant that produced them.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ErrorKind {
    /// Underlying read/write failure.
    Io,
    /// Structural violation of JFIF framing.
    Malformed,
    /// Valid JPEG, but outside baseline 4:4:4.
    Unsupported,
    /// Huffman prefix not found, AC index overrun, truncated value bits.
    CorruptStream,
    /// PPM header malformed, or pixel count mismatches header dimensions.
    InvalidRaster,
}

/// Errors that can occur while decoding a JPEG image.
#[allow(clippy::module_name_repetitions)]
pub enum DecodeErrors {
    /// An I/O error bubbled up from the underlying reader.
    Io(std::io::Error),
    /// The first two bytes of the stream were not 0xFFD8.
    IllegalMagicBytes(u16),
    /// A marker byte was expected but something else was found.
    Malformed(String),
    /// The stream ended before an EOI marker was seen.
    Truncated(String),
    /// Problems with the Huffman tables in a JPEG file.
    HuffmanDecode(String),
    /// Discrete Quantization Table errors.
    DqtError(String),
    /// Start-of-scan errors.
    SosError(String),
    /// Start-of-frame errors.
    SofError(String),
    /// The entropy-coded bit-stream violated the coding contract.
    CorruptStream(String),
    /// Image has zero width or height.
    ZeroDimension,
    /// Unsupported image encoding scheme.
    Unsupported(UnsupportedSchemes),
}

impl DecodeErrors {
    /// Map this decoder-specific variant onto one of the five canonical
    /// error kinds, for callers that want a coarse classification
    /// without losing the richer `Display` message above.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Io(_) => ErrorKind::Io,
            Self::IllegalMagicBytes(_) | Self::Malformed(_) | Self::Truncated(_) => {
                ErrorKind::Malformed
            }
            Self::Unsupported(_) | Self::SofError(_) => ErrorKind::Unsupported,
            Self::HuffmanDecode(_) | Self::CorruptStream(_) | Self::SosError(_) => {
                ErrorKind::CorruptStream
            }
            Self::DqtError(_) | Self::ZeroDimension => ErrorKind::Malformed,
        }
    }
}

impl From<std::io::Error> for DecodeErrors {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl Debug for DecodeErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}

impl Display for DecodeErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(ref e) => write!(f, "I/O error: {e}"),
            Self::IllegalMagicBytes(bytes) => {
                write!(f, "Error parsing image. Illegal start bytes: {bytes:x}")
            }
            Self::Malformed(ref reason) => write!(f, "Malformed JFIF stream. Reason: {reason}"),
            Self::Truncated(ref reason) => write!(f, "Truncated JFIF stream. Reason: {reason}"),
            Self::HuffmanDecode(ref reason) => {
                write!(f, "Error decoding huffman tables. Reason: {reason}")
            }
            Self::DqtError(ref reason) => write!(f, "Error parsing DQT segment. Reason: {reason}"),
            Self::SosError(ref reason) => write!(f, "Error parsing SOS segment. Reason: {reason}"),
            Self::SofError(ref reason) => write!(f, "Error parsing SOF segment. Reason: {reason}"),
            Self::CorruptStream(ref reason) => write!(f, "Corrupt entropy stream: {reason}"),
            Self::ZeroDimension => write!(f, "Image width or height is zero, cannot continue"),
            Self::Unsupported(ref image_type) => write!(f, "{image_type:?}"),
        }
    }
}

impl Error for DecodeErrors {}

/// Contains unsupported/yet-to-be-supported JPEG image encoding types.
#[derive(Eq, PartialEq, Copy, Clone)]
pub enum UnsupportedSchemes {
    /// SOF1, extended sequential DCT, Huffman coding.
    ExtendedSequentialHuffman,
    /// SOF2, progressive DCT, Huffman coding.
    ProgressiveDctHuffman,
    /// SOF3, lossless (sequential), Huffman coding.
    LosslessHuffman,
    /// SOF9, extended sequential DCT, arithmetic coding.
    ExtendedSequentialDctArithmetic,
    /// SOF10, progressive DCT, arithmetic coding.
    ProgressiveDctArithmetic,
    /// SOF11, lossless (sequential), arithmetic coding.
    LosslessArithmetic,
    /// A SOF0 frame whose component sampling factors are not all 1x1,
    /// i.e. the image uses chroma subsampling.
    ChromaSubsampled,
    /// Restart markers (DRI) are present in the scan.
    RestartMarkers,
    /// More than one scan (SOS) segment was found.
    MultiScan,
    /// A DQT precision nibble other than 0 (8-bit).
    SixteenBitPrecision,
}

impl Debug for UnsupportedSchemes {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ExtendedSequentialHuffman => write!(
                f,
                "Extended sequential DCT, Huffman coding is not supported"
            ),
            Self::ProgressiveDctHuffman => {
                write!(f, "Progressive DCT, Huffman coding is not supported")
            }
            Self::LosslessHuffman => {
                write!(f, "Lossless (sequential) Huffman coding is not supported")
            }
            Self::ExtendedSequentialDctArithmetic => write!(
                f,
                "Extended sequential DCT, arithmetic coding is not supported"
            ),
            Self::ProgressiveDctArithmetic => {
                write!(f, "Progressive DCT, arithmetic coding is not supported")
            }
            Self::LosslessArithmetic => {
                write!(f, "Lossless (sequential) arithmetic coding is not supported")
            }
            Self::ChromaSubsampled => write!(
                f,
                "Chroma subsampled images are not supported, only 4:4:4 is"
            ),
            Self::RestartMarkers => write!(f, "Restart markers are not supported"),
            Self::MultiScan => write!(f, "Multi-scan images are not supported"),
            Self::SixteenBitPrecision => write!(f, "Only 8-bit quantization tables are supported"),
        }
    }
}

impl UnsupportedSchemes {
    /// Map a SOF marker to the unsupported scheme it represents, if any.
    #[must_use]
    pub fn from_marker(marker: Marker) -> Option<UnsupportedSchemes> {
        match marker {
            Marker::SOF1 => Some(Self::ExtendedSequentialHuffman),
            Marker::SOF2 => Some(Self::ProgressiveDctHuffman),
            Marker::SOF3 => Some(Self::LosslessHuffman),
            Marker::SOF9 => Some(Self::ExtendedSequentialDctArithmetic),
            Marker::SOF10 => Some(Self::ProgressiveDctArithmetic),
            Marker::SOF11 => Some(Self::LosslessArithmetic),
            _ => None,
        }
    }
}

/// Errors that can occur while encoding a raster into a JPEG image.
pub enum EncodeErrors {
    /// An I/O error bubbled up from the underlying writer.
    Io(std::io::Error),
    /// The PPM header was malformed, or the pixel count did not match
    /// the declared dimensions.
    InvalidRaster(String),
    /// The raster's dimensions cannot be represented (zero, or larger
    /// than the 16-bit JFIF frame-header fields allow).
    DimensionError(String),
}

impl EncodeErrors {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Io(_) => ErrorKind::Io,
            Self::InvalidRaster(_) | Self::DimensionError(_) => ErrorKind::InvalidRaster,
        }
    }
}

impl From<std::io::Error> for EncodeErrors {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl Debug for EncodeErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}

impl Display for EncodeErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(ref e) => write!(f, "I/O error: {e}"),
            Self::InvalidRaster(ref reason) => write!(f, "Invalid raster. Reason: {reason}"),
            Self::DimensionError(ref reason) => write!(f, "Invalid dimensions: {reason}"),
        }
    }
}

impl Error for EncodeErrors {}
