//! This crate provides a featherweight decoder for baseline sequential
//! ITU-T T.81 (JPEG-1) images that renders RGB565 scanlines, one row at a
//! time, through a caller supplied sink.
//!
//! It is written for small places: the working set is a few hundred bytes of
//! decoder state plus a single output row buffer, the arithmetic is entirely
//! integer (a fixed point Winograd IDCT), and the only heap allocation of a
//! decode is that row buffer.
//!
//! # Features
//!  - Baseline sequential, Huffman coded, 8 bit JPEG (SOF0)
//!  - Grayscale and YCbCr images with 1x1, 2x1, 1x2 and 2x2 luma sampling
//!  - Restart marker resynchronisation
//!  - RGB565 output packed `RRRRRGGGGGGBBBBB`, one `u16` per pixel
//!
//! # Usage
//! Add jpeg565 to the dependencies in the project Cargo.toml
//!
//! ```toml
//! [dependencies]
//! jpeg565 = "0.1.0"
//! ```
//! # Examples
//!
//! ## Stream scanlines to a display
//! ```no_run
//! use jpeg565::Decoder;
//!
//! let data = std::fs::read("an_image.jpg").unwrap();
//! let mut decoder = Decoder::new(&data);
//! decoder
//!     .decode(|y, row| {
//!         // `row` holds `width` RGB565 pixels and is reused afterwards
//!         push_row_to_display(y, row);
//!     })
//!     .unwrap();
//! # fn push_row_to_display(_y: usize, _row: &[u16]) {}
//! ```
//!
//! ## Probe an image for its dimensions
//! ```no_run
//! let data = std::fs::read("an_image.jpg").unwrap();
//! let info = jpeg565::probe(&data).unwrap();
//! println!("{}x{}", info.width, info.height);
//! ```
//!
//! Progressive, hierarchical, arithmetic coded and CMYK images are out of
//! scope and rejected with an error. The input must be a complete JPEG held
//! in memory; trailing bytes after the end of image marker are ignored.

#![warn(clippy::correctness, clippy::perf, clippy::pedantic)]
#![allow(
    clippy::needless_return,
    clippy::similar_names,
    clippy::inline_always,
    clippy::doc_markdown,
    clippy::module_name_repetitions,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::missing_errors_doc
)]
#![forbid(unsafe_code)]

#[macro_use]
extern crate log;

pub use crate::decoder::{Decoder, ImageInfo};
pub use crate::probe::probe;

mod bitstream;
mod color_convert;
mod components;
mod decoder;
pub mod errors;
mod headers;
mod huffman;
mod idct;
mod marker;
mod mcu;
mod misc;
mod probe;
