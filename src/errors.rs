//! Decoding errors
//!
//! Everything here is fatal to the current decode; scanlines already handed
//! to the sink stay valid, the decoder itself is spent.

use std::fmt;

/// Errors that may arise while decoding a JPEG image.
pub enum DecodeErrors {
    /// Anything that does not fit another bucket
    Format(String),
    /// A malformed Huffman table or an undecodable Huffman code
    HuffmanDecode(String),
    /// An invalid quantization table segment
    DqtError(String),
    /// An invalid or unsupported frame header
    SofError(String),
    /// An invalid scan header
    SosError(String),
    /// Errors inside the entropy coded segment
    McuError(String),
    /// The image has zero width or zero height
    ZeroError,
    /// The input ended before the decoder was done with it
    ExhaustedData,
}

impl fmt::Debug for DecodeErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Format(reason) => write!(f, "{reason}"),
            Self::HuffmanDecode(reason) => write!(f, "Error decoding huffman values: {reason}"),
            Self::DqtError(reason) => write!(f, "Error parsing DQT segment: {reason}"),
            Self::SofError(reason) => write!(f, "Error parsing SOF segment: {reason}"),
            Self::SosError(reason) => write!(f, "Error parsing SOS segment: {reason}"),
            Self::McuError(reason) => write!(f, "Error in entropy coded data: {reason}"),
            Self::ZeroError => write!(f, "Image has zero width or height, cannot decode"),
            Self::ExhaustedData => write!(f, "Input data exhausted before decoding finished"),
        }
    }
}

impl fmt::Display for DecodeErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

impl std::error::Error for DecodeErrors {}
