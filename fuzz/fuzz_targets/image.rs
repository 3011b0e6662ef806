#![no_main]
#[macro_use] extern crate libfuzzer_sys;
extern crate fvr_codecs;

fuzz_target!(|data: &[u8]| {
    // first byte picks the dimensions, the rest is the payload
    if let Some((shape, payload)) = data.split_first() {
        let width = 8 * (usize::from(shape & 0x0F) + 1);
        let height = 8 * (usize::from(shape >> 4) + 1);
        if let Ok(decoded) = fvr_codecs::image::decode_image(payload, width, height, 50) {
            assert_eq!(decoded.value.pixels.len(), width * height);
        }
    }
});
