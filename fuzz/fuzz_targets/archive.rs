#![no_main]
#[macro_use] extern crate libfuzzer_sys;
extern crate fvr_codecs;

fuzz_target!(|data: &[u8]| {
    if let Ok(archive) = fvr_codecs::archive::PakArchive::parse(data) {
        for (_, result) in archive.extract_all() {
            let _ = result;
        }
    }
});
