//! Canonical Huffman tables and the bit-serial decode walk

use crate::bitstream::BitStream;
use crate::errors::DecodeErrors;

/// Sentinel marking a code length with no codes assigned.
const EMPTY: u16 = 0xFFFF;

pub(crate) struct HuffmanTable {
    /// smallest code of length l, index 1..=16
    min_code: [u16; 17],
    /// largest code of length l, `EMPTY` when that length has no codes
    max_code: [u16; 17],
    /// index into `values` of the first symbol with codes of length l
    val_ptr: [u16; 17],
    /// Symbols in order of increasing code length
    values: [u8; 256],
}

impl HuffmanTable {
    /// Derive the decode tables from a DHT count/symbol listing, the
    /// Annex C construction: codes of each length are consecutive, and the
    /// first code of length l+1 is the successor of the last code of
    /// length l, doubled.
    pub fn new(counts: &[u8; 17], values: [u8; 256]) -> Result<HuffmanTable, DecodeErrors> {
        let mut table = HuffmanTable {
            min_code: [0; 17],
            max_code: [EMPTY; 17],
            val_ptr: [0; 17],
            values,
        };

        let mut code: u32 = 0;
        let mut first_value: u16 = 0;

        for length in 1..=16 {
            let count = u32::from(counts[length]);
            if count != 0 {
                table.min_code[length] = code as u16;
                table.val_ptr[length] = first_value;
                code += count;
                first_value += count as u16;
                // no code may need more bits than its length provides
                if code > (1 << length) {
                    return Err(DecodeErrors::HuffmanDecode(
                        "Bad Huffman table, counts exceed the code space".to_string(),
                    ));
                }
                table.max_code[length] = (code - 1) as u16;
            }
            code <<= 1;
        }
        Ok(table)
    }

    /// Walk the bitstream one bit at a time until the running code falls
    /// inside a populated length row (the F.16 DECODE procedure).
    ///
    /// A code that is still unresolved after 16 bits cannot belong to the
    /// table and fails the decode.
    #[inline(always)]
    pub fn decode(&self, stream: &mut BitStream) -> Result<u8, DecodeErrors> {
        let mut code = u16::from(stream.get_bit());
        let mut length = 1;
        loop {
            let max_code = self.max_code[length];
            if max_code != EMPTY && code <= max_code {
                let index =
                    usize::from(self.val_ptr[length]) + usize::from(code - self.min_code[length]);
                return Ok(self.values[index & 0xFF]);
            }
            length += 1;
            if length > 16 {
                return Err(DecodeErrors::HuffmanDecode(format!(
                    "Bad Huffman code 0x{code:X}, corrupt JPEG"
                )));
            }
            code = (code << 1) | u16::from(stream.get_bit());
        }
    }
}
