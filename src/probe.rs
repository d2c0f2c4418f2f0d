//! Cheap dimension probe that stops at the frame header

use crate::bitstream::BitStream;
use crate::decoder::ImageInfo;
use crate::errors::DecodeErrors;
use crate::headers::next_marker;
use crate::marker::Marker;

/// Scan `data` for the baseline frame header and report the image
/// dimensions without decoding any pixels.
///
/// # Errors
/// Fails when the buffer cannot be a decodable baseline JPEG: fewer than
/// two bytes, missing SOI, a progressive frame, no SOF0 before the scan or
/// the end of image, or a truncated SOF0 segment.
pub fn probe(data: &[u8]) -> Result<ImageInfo, DecodeErrors> {
    if data.len() < 2 {
        return Err(DecodeErrors::ExhaustedData);
    }
    let mut stream = BitStream::new(data);
    if stream.read_u16() != 0xFFD8 {
        return Err(DecodeErrors::Format(
            "Missing SOI marker, not a JPEG".to_string(),
        ));
    }

    loop {
        let marker = next_marker(&mut stream).ok_or(DecodeErrors::ExhaustedData)?;
        match marker {
            Marker::SOF(0) => {
                let length = stream.read_u16();
                // precision, dimensions and a component count at minimum
                if length < 9 {
                    return Err(DecodeErrors::SofError(format!(
                        "Truncated SOF0 segment of length {length}"
                    )));
                }
                let _precision = stream.read_u8();
                let height = stream.read_u16();
                let width = stream.read_u16();
                let components = stream.read_u8();

                if width == 0 || height == 0 {
                    return Err(DecodeErrors::ZeroError);
                }
                return Ok(ImageInfo {
                    width,
                    height,
                    components,
                });
            }
            Marker::SOF(2) => {
                return Err(DecodeErrors::SofError(
                    "The decoder cannot parse progressive jpegs".to_string(),
                ));
            }
            Marker::EOI | Marker::SOS => {
                return Err(DecodeErrors::SofError(
                    "No SOF0 segment before the scan data".to_string(),
                ));
            }
            Marker::SOI | Marker::RST(_) => {}
            _ => {
                let length = stream.read_u16();
                let skip = length.checked_sub(2).ok_or_else(|| {
                    DecodeErrors::Format(format!("Bad segment length for marker {marker:?}"))
                })?;
                stream.skip(usize::from(skip));
            }
        }
    }
}
