//! Helpers that assemble baseline JPEG streams in memory.
//!
//! The builder writes real marker segments, and the entropy writer runs a
//! canonical Huffman encoder over the same count/symbol listings the DHT
//! segments carry, so the decoder sees byte streams shaped exactly like
//! encoder output (byte stuffing included).

#![allow(dead_code)]

/// MSB-first bit writer with JPEG byte stuffing.
pub struct BitWriter {
    bytes: Vec<u8>,
    current: u32,
    count: u8,
}

impl BitWriter {
    pub fn new() -> BitWriter {
        BitWriter {
            bytes: Vec::new(),
            current: 0,
            count: 0,
        }
    }

    pub fn put_bits(&mut self, code: u16, length: u8) {
        for shift in (0..length).rev() {
            self.current = (self.current << 1) | u32::from((code >> shift) & 1);
            self.count += 1;
            if self.count == 8 {
                let byte = self.current as u8;
                self.bytes.push(byte);
                if byte == 0xFF {
                    self.bytes.push(0x00);
                }
                self.current = 0;
                self.count = 0;
            }
        }
    }

    /// Pad the trailing partial byte with one bits, as encoders do before
    /// a marker.
    pub fn pad(&mut self) {
        while self.count != 0 {
            self.put_bits(1, 1);
        }
    }

    pub fn into_bytes(mut self) -> Vec<u8> {
        self.pad();
        self.bytes
    }
}

/// A Huffman table listing plus its canonical codes, shared between the
/// DHT segment bytes and the entropy encoder.
pub struct HuffSpec {
    pub counts: [u8; 16],
    pub symbols: Vec<u8>,
    /// (code, length) per symbol, in `symbols` order
    codes: Vec<(u16, u8)>,
}

impl HuffSpec {
    pub fn new(counts: [u8; 16], symbols: &[u8]) -> HuffSpec {
        let mut codes = Vec::with_capacity(symbols.len());
        let mut code: u16 = 0;
        for (index, &count) in counts.iter().enumerate() {
            for _ in 0..count {
                codes.push((code, index as u8 + 1));
                code += 1;
            }
            code <<= 1;
        }
        assert_eq!(codes.len(), symbols.len(), "counts and symbols disagree");
        HuffSpec {
            counts,
            symbols: symbols.to_vec(),
            codes,
        }
    }

    pub fn encode(&self, writer: &mut BitWriter, symbol: u8) {
        let index = self
            .symbols
            .iter()
            .position(|&s| s == symbol)
            .expect("symbol missing from the test table");
        let (code, length) = self.codes[index];
        writer.put_bits(code, length);
    }
}

/// DC categories 0..=5 over code lengths 2..=5.
pub fn test_dc_table() -> HuffSpec {
    HuffSpec::new(
        [0, 3, 1, 1, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
        &[0, 1, 2, 3, 4, 5],
    )
}

/// EOB, a few (run, size) pairs, ZRL and the pathological (15, 1).
pub fn test_ac_table() -> HuffSpec {
    HuffSpec::new(
        [0, 3, 1, 1, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
        &[0x00, 0x01, 0x11, 0xF0, 0xF1, 0x21],
    )
}

/// DC difference to (category, magnitude bits), F.1.2.1.
pub fn dc_category(value: i32) -> (u8, u16) {
    if value == 0 {
        return (0, 0);
    }
    let category = (32 - value.unsigned_abs().leading_zeros()) as u8;
    let extra = if value < 0 {
        (value + (1 << category) - 1) as u16
    } else {
        value as u16
    };
    (category, extra)
}

/// Encode one 8x8 block: a DC difference plus (run, value) AC pairs, then
/// an explicit end of block. Keep coefficients short of position 63 so the
/// EOB stays meaningful.
pub fn encode_block(
    writer: &mut BitWriter, dc: &HuffSpec, ac: &HuffSpec, dc_diff: i32, acs: &[(u8, i32)],
) {
    let (category, extra) = dc_category(dc_diff);
    dc.encode(writer, category);
    writer.put_bits(extra, category);

    for &(run, value) in acs {
        let (size, extra) = dc_category(value);
        ac.encode(writer, (run << 4) | size);
        writer.put_bits(extra, size);
    }
    ac.encode(writer, 0x00);
}

/// Incrementally assembles a JPEG byte stream.
pub struct JpegBuilder {
    pub bytes: Vec<u8>,
}

impl JpegBuilder {
    pub fn new() -> JpegBuilder {
        JpegBuilder {
            bytes: vec![0xFF, 0xD8],
        }
    }

    fn segment(&mut self, marker: u8, payload: &[u8]) {
        self.bytes.push(0xFF);
        self.bytes.push(marker);
        self.bytes
            .extend_from_slice(&((payload.len() + 2) as u16).to_be_bytes());
        self.bytes.extend_from_slice(payload);
    }

    /// 8 bit precision quantization table, values in zig-zag order.
    pub fn dqt(&mut self, id: u8, values: &[u8; 64]) {
        let mut payload = vec![id];
        payload.extend_from_slice(values);
        self.segment(0xDB, &payload);
    }

    /// 16 bit precision quantization table, big-endian values.
    pub fn dqt16(&mut self, id: u8, values: &[u16; 64]) {
        let mut payload = vec![0x10 | id];
        for value in values {
            payload.extend_from_slice(&value.to_be_bytes());
        }
        self.segment(0xDB, &payload);
    }

    pub fn dht(&mut self, class: u8, id: u8, spec: &HuffSpec) {
        let mut payload = vec![(class << 4) | id];
        payload.extend_from_slice(&spec.counts);
        payload.extend_from_slice(&spec.symbols);
        self.segment(0xC4, &payload);
    }

    /// Baseline frame header; components are (id, sampling byte, q table).
    pub fn sof0(&mut self, width: u16, height: u16, components: &[(u8, u8, u8)]) {
        self.sof(0xC0, 8, width, height, components);
    }

    pub fn sof(
        &mut self, marker: u8, precision: u8, width: u16, height: u16,
        components: &[(u8, u8, u8)],
    ) {
        let mut payload = vec![precision];
        payload.extend_from_slice(&height.to_be_bytes());
        payload.extend_from_slice(&width.to_be_bytes());
        payload.push(components.len() as u8);
        for &(id, sampling, qtable) in components {
            payload.push(id);
            payload.push(sampling);
            payload.push(qtable);
        }
        self.segment(marker, &payload);
    }

    pub fn dri(&mut self, interval: u16) {
        self.segment(0xDD, &interval.to_be_bytes());
    }

    pub fn app(&mut self, n: u8, payload: &[u8]) {
        self.segment(0xE0 + n, payload);
    }

    /// Scan header; components are (id, dc table << 4 | ac table).
    pub fn sos(&mut self, components: &[(u8, u8)]) {
        let mut payload = vec![components.len() as u8];
        for &(id, tables) in components {
            payload.push(id);
            payload.push(tables);
        }
        payload.extend_from_slice(&[0, 63, 0]);
        self.segment(0xDA, &payload);
    }

    pub fn entropy(&mut self, writer: BitWriter) {
        self.bytes.extend_from_slice(&writer.into_bytes());
    }

    pub fn rst(&mut self, n: u8) {
        self.bytes.push(0xFF);
        self.bytes.push(0xD0 + n);
    }

    pub fn eoi(mut self) -> Vec<u8> {
        self.bytes.push(0xFF);
        self.bytes.push(0xD9);
        self.bytes
    }
}

/// A flat mid-gray grayscale image: every block is category zero plus EOB.
pub fn flat_gray(width: u16, height: u16) -> Vec<u8> {
    let dc = test_dc_table();
    let ac = test_ac_table();

    let mut builder = JpegBuilder::new();
    builder.dqt(0, &[1; 64]);
    builder.sof0(width, height, &[(1, 0x11, 0)]);
    builder.dht(0, 0, &dc);
    builder.dht(1, 0, &ac);
    builder.sos(&[(1, 0x00)]);

    let mcus = usize::from((width + 7) / 8) * usize::from((height + 7) / 8);
    let mut writer = BitWriter::new();
    for _ in 0..mcus {
        encode_block(&mut writer, &dc, &ac, 0, &[]);
    }
    builder.entropy(writer);
    builder.eoi()
}

/// Decode and collect every emitted (row index, pixels) pair.
pub fn decode_rows(data: &[u8]) -> Result<Vec<(usize, Vec<u16>)>, jpeg565::errors::DecodeErrors> {
    let mut rows = Vec::new();
    let mut decoder = jpeg565::Decoder::new(data);
    decoder.decode(|y, row| rows.push((y, row.to_vec())))?;
    Ok(rows)
}

/// Reference RGB565 packing for expectations.
pub fn pack565(r: u8, g: u8, b: u8) -> u16 {
    (u16::from(r & 0xF8) << 8) | (u16::from(g & 0xFC) << 3) | u16::from(b >> 3)
}

/// Mid gray, the pixel every all-zero block decodes to.
pub const MID_GRAY: u16 = 0x8410;
