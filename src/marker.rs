//! JPEG marker identification

use std::fmt;

/// Markers the header scan can meet between segments.
#[derive(Eq, PartialEq, Copy, Clone)]
pub(crate) enum Marker {
    /// Start of image
    SOI,
    /// End of image
    EOI,
    /// Start of scan
    SOS,
    /// Define Huffman tables
    DHT,
    /// Define quantization tables
    DQT,
    /// Define restart interval
    DRI,
    /// Start of frame, `n` selecting the coding process (0 = baseline)
    SOF(u8),
    /// Restart marker, `n` in 0..8
    RST(u8),
    /// Application segment
    APP(u8),
    /// Comment
    COM,
    /// Anything else
    Other(u8),
}

impl Marker {
    pub fn from_u8(byte: u8) -> Marker {
        match byte {
            0xD8 => Marker::SOI,
            0xD9 => Marker::EOI,
            0xDA => Marker::SOS,
            0xC4 => Marker::DHT,
            0xDB => Marker::DQT,
            0xDD => Marker::DRI,
            0xC0..=0xCF => Marker::SOF(byte - 0xC0),
            0xD0..=0xD7 => Marker::RST(byte & 7),
            0xE0..=0xEF => Marker::APP(byte & 0x0F),
            0xFE => Marker::COM,
            _ => Marker::Other(byte),
        }
    }
}

impl fmt::Debug for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Marker::SOI => write!(f, "SOI"),
            Marker::EOI => write!(f, "EOI"),
            Marker::SOS => write!(f, "SOS"),
            Marker::DHT => write!(f, "DHT"),
            Marker::DQT => write!(f, "DQT"),
            Marker::DRI => write!(f, "DRI"),
            Marker::SOF(n) => write!(f, "SOF({n})"),
            Marker::RST(n) => write!(f, "RST({n})"),
            Marker::APP(n) => write!(f, "APP({n})"),
            Marker::COM => write!(f, "COM"),
            Marker::Other(n) => write!(f, "Marker(0xFF{n:02X})"),
        }
    }
}
