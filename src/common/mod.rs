//! Values and tables shared between the encoding side
//! and the decoding side.

// --- ARCHIVES ---
/// Every `PAK` container starts with these four bytes.
pub const PAK_MAGIC: [u8; 4] = *b"PAKF";
/// Entry names are stored in a fixed, NUL padded field of this size.
pub const PAK_NAME_LEN: usize = 16;
/// Magic plus the `total_size` field.
pub const PAK_HEADER_LEN: usize = 8;
/// Name, compression level, compressed size and uncompressed size.
pub const PAK_ENTRY_HEADER_LEN: usize = PAK_NAME_LEN + 12;
/// The only entry compression scheme the LZ codec implements.
pub const COMPRESSION_LEVEL_LZ: u32 = 3;

/// Literal tokens carry between 1 and 128 bytes.
pub const MAX_LITERAL_LEN: usize = 128;
/// Back-references copy between 1 and 64 bytes.
pub const MAX_MATCH_LEN: usize = 64;
/// Distances up to this value fit into the single byte form.
pub const SHORT_DISTANCE_MAX: usize = 256;
/// Largest distance the two byte form can express.
pub const MAX_DISTANCE: usize = 65536;
/// The compressor never looks further back than this.
pub const MATCH_WINDOW: usize = 65535;

// --- HUFFMAN ---
/// Synthetic symbol that terminates a Huffman coded stream.
pub const END_OF_BLOCK: u16 = 256;
/// 256 literal byte values plus [`END_OF_BLOCK`].
pub const SYMBOL_COUNT: usize = 257;
/// A full binary tree over [`SYMBOL_COUNT`] leaves.
pub const MAX_NODE_COUNT: usize = 2 * SYMBOL_COUNT - 1;

// --- IMAGES ---
/// Blocks are 8×8 samples.
pub const BLOCK_SIZE: usize = 8;
pub const BLOCK_LEN: usize = BLOCK_SIZE * BLOCK_SIZE;

/// Maps a position in the coefficient stream to its natural row-major position.
#[rustfmt::skip]
pub const ZIGZAG: [usize; BLOCK_LEN] = [
     0,  1,  8, 16,  9,  2,  3, 10,
    17, 24, 32, 25, 18, 11,  4,  5,
    12, 19, 26, 33, 40, 48, 41, 34,
    27, 20, 13,  6,  7, 14, 21, 28,
    35, 42, 49, 56, 57, 50, 43, 36,
    29, 22, 15, 23, 30, 37, 44, 51,
    58, 59, 52, 45, 38, 31, 39, 46,
    53, 60, 61, 54, 47, 55, 62, 63,
];

/// JPEG Annex K luminance table, natural order.
#[rustfmt::skip]
pub const LUMA_BASE_QUANT: [i32; BLOCK_LEN] = [
    16, 11, 10, 16,  24,  40,  51,  61,
    12, 12, 14, 19,  26,  58,  60,  55,
    14, 13, 16, 24,  40,  57,  69,  56,
    14, 17, 22, 29,  51,  87,  80,  62,
    18, 22, 37, 56,  68, 109, 103,  77,
    24, 35, 55, 64,  81, 104, 113,  92,
    49, 64, 78, 87, 103, 121, 120, 101,
    72, 92, 95, 98, 112, 100, 103,  99,
];

/// JPEG Annex K chrominance table, natural order.
#[rustfmt::skip]
pub const CHROMA_BASE_QUANT: [i32; BLOCK_LEN] = [
    17, 18, 24, 47, 99, 99, 99, 99,
    18, 21, 26, 66, 99, 99, 99, 99,
    24, 26, 56, 99, 99, 99, 99, 99,
    47, 66, 99, 99, 99, 99, 99, 99,
    99, 99, 99, 99, 99, 99, 99, 99,
    99, 99, 99, 99, 99, 99, 99, 99,
    99, 99, 99, 99, 99, 99, 99, 99,
    99, 99, 99, 99, 99, 99, 99, 99,
];

/// AAN IDCT pre-scale factors in 2.14 fixed point, natural order.
#[rustfmt::skip]
pub const AAN_SCALES: [i32; BLOCK_LEN] = [
    16384, 22725, 21407, 19266, 16384, 12873,  8867,  4520,
    22725, 31521, 29692, 26722, 22725, 17855, 12299,  6270,
    21407, 29692, 27969, 25172, 21407, 16819, 11585,  5906,
    19266, 26722, 25172, 22654, 19266, 15137, 10426,  5315,
    16384, 22725, 21407, 19266, 16384, 12873,  8867,  4520,
    12873, 17855, 16819, 15137, 12873, 10114,  6967,  3552,
     8867, 12299, 11585, 10426,  8867,  6967,  4799,  2446,
     4520,  6270,  5906,  5315,  4520,  3552,  2446,  1247,
];

#[test]
fn zigzag_is_a_permutation() {
    let mut seen = [false; BLOCK_LEN];
    for &pos in ZIGZAG.iter() {
        assert!(!seen[pos], "position {} visited twice", pos);
        seen[pos] = true;
    }
    assert!(seen.iter().all(|s| *s));
}
