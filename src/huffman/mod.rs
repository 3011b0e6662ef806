//! Huffman coding as used for the AC control stream of images.
//!
//! A stream is a [`FrequencyTable`] followed by the codewords, each walked
//! from the root of a [`HuffmanTree`] one bit at a time.

mod frequency;
mod tree;

pub use frequency::FrequencyTable;
pub use tree::{Codeword, HuffmanTree};

use crate::common::END_OF_BLOCK;
use crate::decoding::BitReader;
use crate::encoding::BitWriter;
use crate::errors::{Decoded, StructuralError};
use alloc::vec;
use alloc::vec::Vec;

/// Huffman codes `data`, terminated by the end of block symbol.
pub fn compress(data: &[u8]) -> Vec<u8> {
    let table = FrequencyTable::from_data(data);
    let mut output = Vec::new();
    table.write_to(&mut output);

    let Some(tree) = HuffmanTree::build(&table) else {
        return output;
    };
    let codes = tree.codes();
    let mut writer = BitWriter::new();
    for byte in data {
        if let Some(code) = codes[usize::from(*byte)] {
            writer.write_code(code.bits, code.len);
        }
    }
    if let Some(code) = codes[usize::from(END_OF_BLOCK)] {
        writer.write_code(code.bits, code.len);
    }
    output.extend(writer.dump());
    vprintln!(
        "Huffman coded {} bytes into {} bytes",
        data.len(),
        output.len()
    );
    output
}

/// Decodes a stream produced by [`compress`] (or the legacy encoder) into exactly
/// `uncompressed_size` bytes. Symbols that are missing because the stream ended early read as zero.
pub fn decompress(
    source: &[u8],
    uncompressed_size: usize,
) -> Result<Decoded<Vec<u8>>, StructuralError> {
    let (table, header_len) = FrequencyTable::parse(source)?;
    let mut output = Decoded::clean(Vec::with_capacity(uncompressed_size.min(source.len() * 8)));

    if let Some(tree) = HuffmanTree::build(&table) {
        let mut br = BitReader::new(&source[header_len..]);
        let symbols = tree.decode(&mut br, uncompressed_size);
        output.defects = symbols.defects;
        // every symbol but the end of block fits a byte and the end of block is never emitted
        output.value.extend(symbols.value.into_iter().map(|s| s as u8));
    }
    output.value.resize(uncompressed_size, 0);
    Ok(output)
}
