//! The baseline entropy loop: walk the MCU grid, decode blocks, paint
//! RGB565 rows and hand them out
//!
//! One MCU row of pixels is buffered at a time (the decoder's only heap
//! allocation); every component block inside an MCU goes coefficient
//! decode -> IDCT -> sample block, and the paint step then picks luma and
//! chroma samples per pixel, converts and packs them. Scanlines leave
//! through the sink as soon as their MCU row is complete.

use crate::color_convert::{luma_to_rgb565, ycbcr_to_rgb565};
use crate::errors::DecodeErrors;
use crate::idct::winograd_idct;
use crate::Decoder;

impl Decoder<'_> {
    /// Decode the MCU grid row by row, emitting finished scanlines.
    ///
    /// This is the hot loop of the library.
    #[inline(never)]
    pub(crate) fn decode_mcu_rows<F>(&mut self, mut sink: F) -> Result<(), DecodeErrors>
    where
        F: FnMut(usize, &[u16]),
    {
        let info = self.info.ok_or_else(|| {
            DecodeErrors::SofError("No frame header seen before the scan".to_string())
        })?;
        let width = usize::from(info.width);
        let height = usize::from(info.height);
        let (mcu_width, mcu_height) = (self.mcu_width, self.mcu_height);

        let h_samp = self.components[0].horizontal_sample;
        let v_samp = self.components[0].vertical_sample;
        // nearest neighbour chroma positioning, purely positional
        let h_shift = usize::from(h_samp == 2);
        let v_shift = usize::from(v_samp == 2);
        let is_color = self.num_components == 3;

        // The one heap allocation of the decode path, freed on every exit.
        let mut row_buffer = vec![0_u16; width * mcu_height];

        let mut y_blocks = [[0_u8; 64]; 4];
        let mut cb_block = [0_u8; 64];
        let mut cr_block = [0_u8; 64];

        for mcu_row in 0..self.mcu_y {
            row_buffer.fill(0);

            for mcu_col in 0..self.mcu_x {
                if self.restart_interval != 0 {
                    if self.todo == 0 {
                        self.process_restart();
                    }
                    self.todo -= 1;
                }

                // luma blocks in raster order, then the chroma pair
                for v in 0..v_samp {
                    for h in 0..h_samp {
                        self.decode_block_into(0, &mut y_blocks[v * h_samp + h])?;
                    }
                }
                if is_color {
                    self.decode_block_into(1, &mut cb_block)?;
                    self.decode_block_into(2, &mut cr_block)?;
                }

                // Paint the MCU into the row buffer, clipped to the image.
                let x_base = mcu_col * mcu_width;
                for py in 0..mcu_height {
                    if mcu_row * mcu_height + py >= height {
                        break;
                    }
                    let row = &mut row_buffer[py * width..(py + 1) * width];
                    for px in 0..mcu_width {
                        let x = x_base + px;
                        if x >= width {
                            break;
                        }
                        let y_block = &y_blocks[(py >> 3) * h_samp + (px >> 3)];
                        let luma = y_block[(py & 7) * 8 + (px & 7)];

                        row[x] = if is_color {
                            let cx = px >> h_shift;
                            let cy = py >> v_shift;
                            ycbcr_to_rgb565(luma, cb_block[cy * 8 + cx], cr_block[cy * 8 + cx])
                        } else {
                            luma_to_rgb565(luma)
                        };
                    }
                }
            }

            // hand out every finished scanline of this MCU row
            for py in 0..mcu_height {
                let y = mcu_row * mcu_height + py;
                if y >= height {
                    break;
                }
                sink(y, &row_buffer[py * width..(py + 1) * width]);
            }
        }
        info!("Finished decoding image");
        return Ok(());
    }

    /// Entropy decode, dequantize and transform one component block.
    fn decode_block_into(
        &mut self, position: usize, out: &mut [u8; 64],
    ) -> Result<(), DecodeErrors> {
        let component = self.components[position];
        let dc_table = self.dc_tables[component.dc_huff_table]
            .as_ref()
            .ok_or_else(|| {
                DecodeErrors::HuffmanDecode(format!("No DC table for component {}", component.id))
            })?;
        let ac_table = self.ac_tables[component.ac_huff_table]
            .as_ref()
            .ok_or_else(|| {
                DecodeErrors::HuffmanDecode(format!("No AC table for component {}", component.id))
            })?;
        let qt_table = &self.qt_tables[component.quantization_table];

        let mut dc_pred = component.dc_pred;
        let mut coefficients = [0_i32; 64];
        self.stream
            .decode_block(dc_table, ac_table, qt_table, &mut coefficients, &mut dc_pred)?;
        self.components[position].dc_pred = dc_pred;

        winograd_idct(&mut coefficients, out);
        Ok(())
    }

    /// Resynchronise at a restart marker.
    ///
    /// Buffered bits are encoder padding at this point and get dropped,
    /// then the byte cursor scans forward for an `FF D0..D7` pair and
    /// consumes it. DC predictions restart from zero on the far side.
    ///
    /// A marker index that does not match the expected sequence is logged
    /// and otherwise ignored, and a truncated stream simply ends the scan
    /// here; later structural checks deal with the fallout.
    #[cold]
    fn process_restart(&mut self) {
        self.stream.reset();

        loop {
            if self.stream.is_eof() {
                warn!("End of data while looking for a restart marker");
                break;
            }
            if self.stream.read_u8() != 0xFF {
                continue;
            }
            let marker = self.stream.read_u8();
            if (0xD0..=0xD7).contains(&marker) {
                let observed = usize::from(marker & 7);
                if observed != self.next_restart {
                    warn!(
                        "Restart marker {} out of sequence, expected {}",
                        observed, self.next_restart
                    );
                }
                break;
            }
            if marker == 0xFF {
                // fill byte; the byte after it may still be the marker
                self.stream.back_up(1);
            }
        }

        for component in &mut self.components {
            component.dc_pred = 0;
        }
        self.todo = self.restart_interval;
        self.next_restart = (self.next_restart + 1) & 7;
    }
}
