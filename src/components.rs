//! Per-component frame state: which quantization and Huffman tables a
//! component uses, and its running DC predictor.
use crate::errors::DecodeErrors;

/// The three components a baseline 4:4:4 frame carries.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ComponentId {
    Y,
    Cb,
    Cr,
}

impl ComponentId {
    /// Map the conventional JFIF component identifier byte (1=Y, 2=Cb,
    /// 3=Cr) to a [`ComponentId`].
    pub fn from_id(id: u8) -> Result<Self, DecodeErrors> {
        match id {
            1 => Ok(Self::Y),
            2 => Ok(Self::Cb),
            3 => Ok(Self::Cr),
            other => Err(DecodeErrors::SofError(format!(
                "unrecognized component id {other}, expected 1 (Y), 2 (Cb) or 3 (Cr)"
            ))),
        }
    }
}

/// Frame-header state for one color component.
#[derive(Debug, Clone)]
pub struct Component {
    pub id: ComponentId,
    /// Horizontal sampling factor; must be 1 for 4:4:4.
    pub horizontal_sample: u8,
    /// Vertical sampling factor; must be 1 for 4:4:4.
    pub vertical_sample: u8,
    /// Index into the decoder's quantization table array.
    pub quantization_table: u8,
    /// Index into the decoder's DC Huffman table array, set by the SOS header.
    pub dc_huffman_table: u8,
    /// Index into the decoder's AC Huffman table array, set by the SOS header.
    pub ac_huffman_table: u8,
    /// Running DC predictor for this component, reset to 0 at scan start.
    pub dc_prediction: i32,
}

impl Component {
    #[must_use]
    pub fn new(id: ComponentId, horizontal_sample: u8, vertical_sample: u8, quantization_table: u8) -> Self {
        Component {
            id,
            horizontal_sample,
            vertical_sample,
            quantization_table,
            dc_huffman_table: 0,
            ac_huffman_table: 0,
            dc_prediction: 0,
        }
    }
}
