//! JFIF marker bytes recognized by the segment scanner.
use std::fmt;

/// A single JFIF marker code (the byte following the 0xFF prefix).
#[derive(Eq, PartialEq, Copy, Clone)]
#[allow(clippy::upper_case_acronyms)]
pub enum Marker {
    /// Start of Image.
    SOI,
    /// End of Image.
    EOI,
    /// Baseline sequential DCT.
    SOF0,
    /// Extended sequential DCT, Huffman coding.
    SOF1,
    /// Progressive DCT, Huffman coding.
    SOF2,
    /// Lossless (sequential), Huffman coding.
    SOF3,
    /// Extended sequential DCT, arithmetic coding.
    SOF9,
    /// Progressive DCT, arithmetic coding.
    SOF10,
    /// Lossless (sequential), arithmetic coding.
    SOF11,
    /// Define Huffman Table(s).
    DHT,
    /// Define Quantization Table(s).
    DQT,
    /// Define Restart Interval.
    DRI,
    /// Start of Scan.
    SOS,
    /// Restart markers RST0..RST7.
    RST(u8),
    /// Application-specific segment APP0..APP15.
    APP(u8),
    /// Comment.
    COM,
    /// Anything else recognized only as "a marker with a length field".
    Other(u8),
}

impl Marker {
    /// Parse the marker byte following an 0xFF prefix.
    #[must_use]
    pub fn from_u8(byte: u8) -> Option<Marker> {
        match byte {
            0xD8 => Some(Marker::SOI),
            0xD9 => Some(Marker::EOI),
            0xC0 => Some(Marker::SOF0),
            0xC1 => Some(Marker::SOF1),
            0xC2 => Some(Marker::SOF2),
            0xC3 => Some(Marker::SOF3),
            0xC9 => Some(Marker::SOF9),
            0xCA => Some(Marker::SOF10),
            0xCB => Some(Marker::SOF11),
            0xC4 => Some(Marker::DHT),
            0xDB => Some(Marker::DQT),
            0xDD => Some(Marker::DRI),
            0xDA => Some(Marker::SOS),
            0xD0..=0xD7 => Some(Marker::RST(byte - 0xD0)),
            0xE0..=0xEF => Some(Marker::APP(byte - 0xE0)),
            0xFE => Some(Marker::COM),
            0x01 | 0xFF | 0x00 => None,
            _ => Some(Marker::Other(byte)),
        }
    }
}

impl fmt::Debug for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Marker::SOI => write!(f, "SOI"),
            Marker::EOI => write!(f, "EOI"),
            Marker::SOF0 => write!(f, "SOF0 (baseline DCT)"),
            Marker::SOF1 => write!(f, "SOF1"),
            Marker::SOF2 => write!(f, "SOF2"),
            Marker::SOF3 => write!(f, "SOF3"),
            Marker::SOF9 => write!(f, "SOF9"),
            Marker::SOF10 => write!(f, "SOF10"),
            Marker::SOF11 => write!(f, "SOF11"),
            Marker::DHT => write!(f, "DHT"),
            Marker::DQT => write!(f, "DQT"),
            Marker::DRI => write!(f, "DRI"),
            Marker::SOS => write!(f, "SOS"),
            Marker::RST(n) => write!(f, "RST{n}"),
            Marker::APP(n) => write!(f, "APP{n}"),
            Marker::COM => write!(f, "COM"),
            Marker::Other(b) => write!(f, "0xFF{b:02X}"),
        }
    }
}
