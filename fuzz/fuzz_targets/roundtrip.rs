#![no_main]
#[macro_use] extern crate libfuzzer_sys;
extern crate fvr_codecs;

fuzz_target!(|data: &[u8]| {
    let packed = fvr_codecs::archive::compress(data);
    let decoded = fvr_codecs::archive::decompress(&packed)
        .into_strict()
        .expect("Decoding failed");
    assert!(decoded == data, "Decoded data did not match the original input");
});
