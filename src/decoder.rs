//! Main image logic

use crate::bitstream::BitStream;
use crate::components::Component;
use crate::errors::DecodeErrors;
use crate::headers::{
    next_marker, parse_dqt, parse_dri, parse_huffman, parse_sos, parse_start_of_frame,
};
use crate::huffman::HuffmanTable;
use crate::marker::Marker;

/// Maximum number of image components.
pub(crate) const MAX_COMPONENTS: usize = 3;

/// Image information from the frame header.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct ImageInfo {
    /// Width of the image
    pub width: u16,
    /// Height of the image
    pub height: u16,
    /// Number of components, 1 for grayscale and 3 for YCbCr
    pub components: u8,
}

/// A JPEG decoder over a borrowed byte buffer.
///
/// A decoder is a one shot value: build it over a complete JPEG, run
/// [`Decoder::decode`] or [`Decoder::decode_to_vec`] once, drop it. Nothing
/// is read from the buffer until a decode entry point runs.
pub struct Decoder<'a> {
    pub(crate) stream: BitStream<'a>,
    pub(crate) info: Option<ImageInfo>,
    pub(crate) num_components: usize,
    pub(crate) components: [Component; MAX_COMPONENTS],
    /// Quantization tables, zig-zag order, pre-multiplied by the Winograd
    /// scales at DQT parse time
    pub(crate) qt_tables: [[u16; 64]; 2],
    pub(crate) dc_tables: [Option<HuffmanTable>; 2],
    pub(crate) ac_tables: [Option<HuffmanTable>; 2],
    /// MCU size in pixels, 8 or 16 per axis
    pub(crate) mcu_width: usize,
    pub(crate) mcu_height: usize,
    /// MCU counts across and down, rounded up
    pub(crate) mcu_x: usize,
    pub(crate) mcu_y: usize,
    /// Restart interval in MCUs, zero when disabled
    pub(crate) restart_interval: usize,
    /// MCUs left before the next restart marker is due
    pub(crate) todo: usize,
    /// Expected index of the next restart marker, modulo 8
    pub(crate) next_restart: usize,
    headers_done: bool,
}

impl<'a> Decoder<'a> {
    /// Create a decoder over `data`, which should hold a complete baseline
    /// JPEG. Trailing bytes after the end of image marker are fine.
    #[must_use]
    pub fn new(data: &'a [u8]) -> Decoder<'a> {
        Decoder {
            stream: BitStream::new(data),
            info: None,
            num_components: 0,
            components: [Component::default(); MAX_COMPONENTS],
            qt_tables: [[0; 64]; 2],
            dc_tables: [None, None],
            ac_tables: [None, None],
            mcu_width: 0,
            mcu_height: 0,
            mcu_x: 0,
            mcu_y: 0,
            restart_interval: 0,
            todo: 0,
            next_restart: 0,
            headers_done: false,
        }
    }

    /// Image information, available once the frame header has been seen.
    #[must_use]
    pub fn info(&self) -> Option<ImageInfo> {
        self.info
    }

    /// Decode the image, handing every finished scanline to `sink`.
    ///
    /// `sink` is called exactly `height` times, top down, with the row
    /// index and a slice of `width` RGB565 pixels. The slice points into a
    /// buffer that is reused for later rows, so consume or copy it before
    /// returning.
    pub fn decode<F>(&mut self, sink: F) -> Result<(), DecodeErrors>
    where
        F: FnMut(usize, &[u16]),
    {
        self.decode_headers()?;
        self.decode_mcu_rows(sink)
    }

    /// Decode the whole image into one row-major RGB565 pixel vector.
    pub fn decode_to_vec(&mut self) -> Result<Vec<u16>, DecodeErrors> {
        self.decode_headers()?;
        let info = self.info.ok_or_else(|| {
            DecodeErrors::SofError("No frame header seen before the scan".to_string())
        })?;
        let width = usize::from(info.width);

        let mut pixels = vec![0_u16; width * usize::from(info.height)];
        self.decode_mcu_rows(|y, row| {
            pixels[y * width..(y + 1) * width].copy_from_slice(row);
        })?;
        Ok(pixels)
    }

    /// Walk the header stream up to (and through) the start of scan.
    ///
    /// Everything after this is entropy coded data.
    pub(crate) fn decode_headers(&mut self) -> Result<(), DecodeErrors> {
        if self.headers_done {
            return Ok(());
        }
        if self.stream.read_u16() != 0xFFD8 {
            return Err(DecodeErrors::Format(
                "Missing SOI marker, not a JPEG".to_string(),
            ));
        }

        loop {
            let marker = next_marker(&mut self.stream).ok_or(DecodeErrors::ExhaustedData)?;
            match marker {
                Marker::DQT => parse_dqt(self)?,
                Marker::DHT => parse_huffman(self)?,
                Marker::SOF(0) => parse_start_of_frame(self)?,
                Marker::SOF(2) => {
                    return Err(DecodeErrors::SofError(
                        "The decoder cannot parse progressive jpegs".to_string(),
                    ));
                }
                Marker::DRI => parse_dri(self)?,
                Marker::SOS => {
                    if self.info.is_none() {
                        return Err(DecodeErrors::SofError(
                            "Start of scan without a frame header".to_string(),
                        ));
                    }
                    parse_sos(self)?;
                    // scan state: predictors were zeroed by the SOS parse,
                    // the restart countdown begins afresh
                    self.todo = self.restart_interval;
                    self.next_restart = 0;
                    self.headers_done = true;
                    return Ok(());
                }
                Marker::EOI => {
                    return Err(DecodeErrors::Format(
                        "Premature end of image, no scan data".to_string(),
                    ));
                }
                Marker::SOI | Marker::RST(_) => {
                    // parameterless markers with no business being here
                    warn!("Stray {:?} marker in the header stream", marker);
                }
                _ => {
                    // APPn, COM and friends: skip over their payload
                    let length = self.stream.read_u16();
                    let skip = length.checked_sub(2).ok_or_else(|| {
                        DecodeErrors::Format(format!("Bad segment length for marker {marker:?}"))
                    })?;
                    self.stream.skip(usize::from(skip));
                    debug!("Skipping {} bytes of {:?}", skip, marker);
                }
            }
        }
    }
}
