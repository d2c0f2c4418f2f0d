//! Per-component frame and scan parameters

use crate::errors::DecodeErrors;

#[derive(Copy, Clone, Default)]
pub(crate) struct Component {
    /// identifier from the frame header, informational only; components are
    /// always taken in declaration order
    pub id: u8,
    pub horizontal_sample: usize,
    pub vertical_sample: usize,
    pub quantization_table: usize,
    pub dc_huff_table: usize,
    pub ac_huff_table: usize,
    /// scan-local DC predictor
    pub dc_pred: i16,
}

impl Component {
    /// Build a component from the three bytes describing it in the frame
    /// header. `position` is its index in declaration order; only the first
    /// component may be subsampled against.
    pub fn from(values: [u8; 3], position: usize) -> Result<Component, DecodeErrors> {
        let id = values[0];
        let horizontal_sample = usize::from(values[1] >> 4);
        let vertical_sample = usize::from(values[1] & 0x0F);
        let quantization_table = usize::from(values[2]);

        if quantization_table > 1 {
            return Err(DecodeErrors::SofError(format!(
                "Component {id} uses quantization table {quantization_table}, expected 0 or 1"
            )));
        }
        if position == 0 {
            if !(1..=2).contains(&horizontal_sample) || !(1..=2).contains(&vertical_sample) {
                return Err(DecodeErrors::SofError(format!(
                    "Unsupported sampling factors {horizontal_sample}x{vertical_sample} for the first component"
                )));
            }
        } else if horizontal_sample != 1 || vertical_sample != 1 {
            return Err(DecodeErrors::SofError(format!(
                "Unsupported sampling factors {horizontal_sample}x{vertical_sample} for a chroma component"
            )));
        }

        Ok(Component {
            id,
            horizontal_sample,
            vertical_sample,
            quantization_table,
            dc_huff_table: 0,
            ac_huff_table: 0,
            dc_pred: 0,
        })
    }
}
