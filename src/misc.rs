//! Shared constant tables

/// Undo run length encoding of coefficients by placing them in natural order
#[rustfmt::skip]
pub const UN_ZIGZAG: [usize; 64] = [
    0,  1,  8,  16, 9,  2,  3, 10,
    17, 24, 32, 25, 18, 11, 4,  5,
    12, 19, 26, 33, 40, 48, 41, 34,
    27, 20, 13, 6,  7,  14, 21, 28,
    35, 42, 49, 56, 57, 50, 43, 36,
    29, 22, 15, 23, 30, 37, 44, 51,
    58, 59, 52, 45, 38, 31, 39, 46,
    53, 60, 61, 54, 47, 55, 62, 63,
];

/// Winograd dequantization scales in zig-zag order, 10 bit fixed point.
///
/// Multiplying these into the quantization tables once at DQT parse time
/// removes the per-frequency scale factors the Winograd transform leaves
/// behind, so the per-block work stays at shifts and adds.
#[rustfmt::skip]
pub const WINOGRAD_QUANT: [u16; 64] = [
    1024, 1420, 1420, 1338, 1970, 1338, 1204, 1856,
    1856, 1204, 1024, 1670, 1748, 1670, 1024,  805,
    1420, 1573, 1573, 1420,  805,  554, 1116, 1338,
    1416, 1338, 1116,  554,  283,  769, 1051, 1204,
    1204, 1051,  769,  283,  392,  724,  946, 1024,
     946,  724,  392,  369,  652,  805,  805,  652,
     369,  332,  554,  632,  554,  332,  283,  435,
     435,  283,  222,  300,  222,  153,  153,   78,
];
