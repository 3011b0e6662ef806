#![no_main]
#[macro_use] extern crate libfuzzer_sys;
extern crate fvr_codecs;

fuzz_target!(|data: &[u8]| {
    let packed = fvr_codecs::huffman::compress(data);
    let decoded = fvr_codecs::huffman::decompress(&packed, data.len())
        .expect("Compressed header is malformed")
        .into_strict()
        .expect("Decoding failed");
    assert!(decoded == data, "Decoded data did not match the original input");

    let _ = fvr_codecs::huffman::decompress(data, 4096);
});
