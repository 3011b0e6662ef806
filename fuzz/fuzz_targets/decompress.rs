#![no_main]
#[macro_use] extern crate libfuzzer_sys;
extern crate fvr_codecs;

fuzz_target!(|data: &[u8]| {
    let _ = fvr_codecs::archive::decompress(data);
});
