//! Decode JPEG markers/segments
//!
//! This file deals with decoding header information in a jpeg file

use crate::bitstream::BitStream;
use crate::components::Component;
use crate::decoder::{Decoder, ImageInfo};
use crate::errors::DecodeErrors;
use crate::huffman::HuffmanTable;
use crate::marker::Marker;
use crate::misc::WINOGRAD_QUANT;

/// Scan forward to the next marker, collapsing fill bytes and ignoring
/// stuffed `0xFF 0x00` pairs. `None` once the data runs out.
pub(crate) fn next_marker(stream: &mut BitStream) -> Option<Marker> {
    loop {
        if stream.is_eof() {
            return None;
        }
        if stream.read_u8() != 0xFF {
            continue;
        }
        let mut byte = stream.read_u8();
        // fill bytes collapse into the marker prefix
        while byte == 0xFF {
            byte = stream.read_u8();
        }
        if byte == 0x00 {
            // stuffing, not a marker
            continue;
        }
        return Some(Marker::from_u8(byte));
    }
}

///**B.2.4.1 Quantization table-specification syntax**
pub(crate) fn parse_dqt(decoder: &mut Decoder) -> Result<(), DecodeErrors> {
    let mut qt_length = decoder.stream.read_u16().checked_sub(2).ok_or_else(|| {
        DecodeErrors::DqtError("Invalid DQT length, should be greater than 2".to_string())
    })?;

    // A single DQT segment may carry multiple tables.
    while qt_length > 0 {
        let qt_info = decoder.stream.read_u8();

        // 0 => 8 bit entries, 1 => 16 bit big-endian entries
        let precision = usize::from(qt_info >> 4);
        let table_position = usize::from(qt_info & 0x0F);

        if table_position > 1 {
            return Err(DecodeErrors::DqtError(format!(
                "Too large table position for QT :{table_position}, expected 0 or 1"
            )));
        }
        if precision > 1 {
            return Err(DecodeErrors::DqtError(format!(
                "Expected QT precision value of either 0 or 1, found {precision}"
            )));
        }

        let segment_size = (1 + 64 * (precision + 1)) as u16;
        if qt_length < segment_size {
            return Err(DecodeErrors::DqtError(format!(
                "Invalid QT table bytes left :{qt_length}, too small for a {segment_size} byte table"
            )));
        }

        let table = &mut decoder.qt_tables[table_position];
        for (entry, &scale) in table.iter_mut().zip(WINOGRAD_QUANT.iter()) {
            let raw = if precision == 0 {
                u16::from(decoder.stream.read_u8())
            } else {
                decoder.stream.read_u16()
            };
            // Fold the Winograd scales in once, here, with a rounding bias;
            // entries stay in zig-zag order, signedness enters at use.
            *entry = ((u32::from(raw) * u32::from(scale) + 4) >> 3) as u16;
        }
        qt_length -= segment_size;

        debug!("Quantization table {} loaded", table_position);
    }
    return Ok(());
}

///**B.2.4.2 Huffman table-specification syntax**
pub(crate) fn parse_huffman(decoder: &mut Decoder) -> Result<(), DecodeErrors> {
    let mut dht_length = i32::from(decoder.stream.read_u16().checked_sub(2).ok_or_else(
        || DecodeErrors::HuffmanDecode("Invalid Huffman length in image".to_string()),
    )?);

    while dht_length > 16 {
        // HT information
        let ht_info = decoder.stream.read_u8();

        // third bit indicates whether the huffman encoding is DC or AC type
        let dc_or_ac = (ht_info >> 4) & 0x0F;
        // low nibble is the table slot
        let index = usize::from(ht_info & 0x0F);

        if dc_or_ac > 1 {
            return Err(DecodeErrors::HuffmanDecode(format!(
                "Invalid DHT class {dc_or_ac}, should be 0 or 1"
            )));
        }
        if index > 1 {
            return Err(DecodeErrors::HuffmanDecode(format!(
                "Invalid DHT index {index}, expected 0 or 1"
            )));
        }

        // number of symbols with codes of each length 1..=16
        let mut counts = [0_u8; 17];
        for count in &mut counts[1..] {
            *count = decoder.stream.read_u8();
        }
        dht_length -= 1 + 16;

        let symbols_sum: i32 = counts.iter().map(|count| i32::from(*count)).sum();
        if symbols_sum > 256 {
            return Err(DecodeErrors::HuffmanDecode(
                "Encountered Huffman table with excessive length in DHT".to_string(),
            ));
        }
        if symbols_sum > dht_length {
            return Err(DecodeErrors::HuffmanDecode(format!(
                "Excessive Huffman table of length {symbols_sum} found when segment has {dht_length} bytes left"
            )));
        }
        dht_length -= symbols_sum;

        // symbols in increasing code length order
        let mut symbols = [0_u8; 256];
        for symbol in &mut symbols[..symbols_sum as usize] {
            *symbol = decoder.stream.read_u8();
        }

        let table = HuffmanTable::new(&counts, symbols)?;
        if dc_or_ac == 0 {
            decoder.dc_tables[index] = Some(table);
        } else {
            decoder.ac_tables[index] = Some(table);
        }
        debug!("Huffman table loaded, class={} slot={}", dc_or_ac, index);
    }
    if dht_length > 0 {
        return Err(DecodeErrors::HuffmanDecode(
            "Bogus Huffman table definition".to_string(),
        ));
    }
    return Ok(());
}

/// Section:`B.2.2 Frame header syntax`
pub(crate) fn parse_start_of_frame(decoder: &mut Decoder) -> Result<(), DecodeErrors> {
    let length = decoder.stream.read_u16();

    // usually 8; 12 and 16 bit precision is out of scope here
    let precision = decoder.stream.read_u8();
    if precision != 8 {
        return Err(DecodeErrors::SofError(format!(
            "The library can only parse 8-bit images, the image has {precision} bits of precision"
        )));
    }

    let height = decoder.stream.read_u16();
    let width = decoder.stream.read_u16();

    if width == 0 || height == 0 {
        return Err(DecodeErrors::ZeroError);
    }
    info!("Image width  :{}", width);
    info!("Image height :{}", height);

    let num_components = decoder.stream.read_u8();
    if num_components != 1 && num_components != 3 {
        return Err(DecodeErrors::SofError(format!(
            "Expected 1 or 3 image components, found {num_components}"
        )));
    }
    let expected = 8 + 3 * u16::from(num_components);
    if length != expected {
        return Err(DecodeErrors::SofError(format!(
            "Length of start of frame differs from expected {expected}, value is {length}"
        )));
    }
    info!("Image components : {}", num_components);

    decoder.num_components = usize::from(num_components);
    for position in 0..decoder.num_components {
        let bytes = [
            decoder.stream.read_u8(),
            decoder.stream.read_u8(),
            decoder.stream.read_u8(),
        ];
        decoder.components[position] = Component::from(bytes, position)?;
    }

    // Lone component images always tile as plain 8x8 blocks, whatever their
    // declared sampling factors; colour images tile by the luma factors.
    if decoder.num_components == 1 {
        decoder.components[0].horizontal_sample = 1;
        decoder.components[0].vertical_sample = 1;
    }
    let h_samp = decoder.components[0].horizontal_sample;
    let v_samp = decoder.components[0].vertical_sample;

    decoder.mcu_width = h_samp * 8;
    decoder.mcu_height = v_samp * 8;
    // MCU counts round up, edge MCUs are clipped at paint time
    decoder.mcu_x = (usize::from(width) + decoder.mcu_width - 1) / decoder.mcu_width;
    decoder.mcu_y = (usize::from(height) + decoder.mcu_height - 1) / decoder.mcu_height;

    decoder.info = Some(ImageInfo {
        width,
        height,
        components: num_components,
    });
    return Ok(());
}

/// Parse a start of scan header
pub(crate) fn parse_sos(decoder: &mut Decoder) -> Result<(), DecodeErrors> {
    // Scan header length
    let ls = decoder.stream.read_u16();
    // Number of image components in scan
    let ns = usize::from(decoder.stream.read_u8());

    if ls != 6 + 2 * ns as u16 {
        return Err(DecodeErrors::SosError(
            "Bad SOS length, corrupt jpeg".to_string(),
        ));
    }
    if ns != decoder.num_components {
        return Err(DecodeErrors::SosError(format!(
            "Scan has {} components but the frame declared {}",
            ns, decoder.num_components
        )));
    }

    for position in 0..ns {
        // component selector, components are taken in declaration order
        let _id = decoder.stream.read_u8();

        // top nibble DC table, bottom nibble AC table
        let tables = decoder.stream.read_u8();
        let dc_huff_table = usize::from(tables >> 4);
        let ac_huff_table = usize::from(tables & 0x0F);
        if dc_huff_table > 1 || ac_huff_table > 1 {
            return Err(DecodeErrors::SosError(format!(
                "Scan component {position} references Huffman tables {dc_huff_table}/{ac_huff_table}, expected 0 or 1"
            )));
        }
        decoder.components[position].dc_huff_table = dc_huff_table;
        decoder.components[position].ac_huff_table = ac_huff_table;
        decoder.components[position].dc_pred = 0;
    }

    // spectral selection and successive approximation, fixed for baseline
    decoder.stream.skip(3);
    return Ok(());
}

/// Parse the restart interval
pub(crate) fn parse_dri(decoder: &mut Decoder) -> Result<(), DecodeErrors> {
    let length = decoder.stream.read_u16();
    if length != 4 {
        return Err(DecodeErrors::Format(format!(
            "Invalid DRI length {length}, expected 4"
        )));
    }
    decoder.restart_interval = usize::from(decoder.stream.read_u16());
    debug!("Restart interval :{}", decoder.restart_interval);
    return Ok(());
}
