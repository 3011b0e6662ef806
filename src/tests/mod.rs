//! Scenarios that run whole buffers through the public entry points.

#[cfg(test)]
mod image_scenarios {
    use crate::common::BLOCK_LEN;
    use crate::errors::{StreamDefect, StructuralError};
    use crate::image::{decode_image, FrameGeometry, ImagePayload, ImagePayloadBuilder};
    use alloc::vec;
    use alloc::vec::Vec;

    const MID_GRAY: u16 = 0x8410;
    const WHITE: u16 = 0xFFFF;

    /// 16×16 image, every block ends right away and every DC byte is zero.
    /// Mid-gray is sample level 128 after the level shift, i.e. a raw DC of 0.
    fn hand_written_flat_payload() -> Vec<u8> {
        // symbol 0 with weight 1 pairs with the end of block: 0 codes as a single 0 bit
        let ac_control = [0x00, 0x00, 0x01, 0x00, 0x00, 0x00];
        let dc = [0u8; 12];
        let payload = ImagePayload {
            ac_control_uncompressed_size: 12,
            ac_control: &ac_control,
            ac_magnitudes: &[],
            dc: &dc,
        };
        let mut out = Vec::new();
        payload.write_to(&mut out);
        out
    }

    fn built_payload(macro_blocks: usize, levels: impl Fn(usize) -> [i32; BLOCK_LEN]) -> Vec<u8> {
        let mut builder = ImagePayloadBuilder::new();
        for block in 0..macro_blocks * 3 {
            builder.push_block(&levels(block)).unwrap();
        }
        builder.finish()
    }

    fn dc_only(dc: i32) -> [i32; BLOCK_LEN] {
        let mut levels = [0; BLOCK_LEN];
        levels[0] = dc;
        levels
    }

    #[test]
    fn zero_coefficients_decode_to_mid_gray() {
        let decoded = decode_image(&hand_written_flat_payload(), 16, 16, 50).unwrap();
        assert!(decoded.is_clean(), "{:?}", decoded.defects);
        let image = decoded.value;
        assert_eq!((image.width, image.height), (16, 16));
        assert_eq!(image.pixels, vec![MID_GRAY; 256]);
    }

    #[test]
    fn builder_payload_matches_hand_written_one() {
        let payload = built_payload(4, |_| [0; BLOCK_LEN]);
        let built = decode_image(&payload, 16, 16, 50).unwrap().into_strict().unwrap();
        let hand = decode_image(&hand_written_flat_payload(), 16, 16, 50)
            .unwrap()
            .into_strict()
            .unwrap();
        assert_eq!(built, hand);
    }

    #[test]
    fn saturated_luma_is_white() {
        // Y gets a DC level of 128, the chroma blocks stay neutral
        let payload = built_payload(4, |block| if block % 3 == 0 { dc_only(128) } else { dc_only(0) });
        for quality in [1, 50, 75, 100] {
            let image = decode_image(&payload, 16, 16, quality)
                .unwrap()
                .into_strict()
                .unwrap();
            assert!(image.pixels.iter().all(|p| *p == WHITE), "quality {}", quality);
        }
    }

    #[test]
    fn brighter_dc_gives_brighter_blocks() {
        // two macro blocks side by side
        let payload = built_payload(2, |block| match block {
            0 => dc_only(0),
            3 => dc_only(40),
            _ => dc_only(0),
        });
        let image = decode_image(&payload, 16, 8, 50).unwrap().into_strict().unwrap();
        for row in 0..8 {
            let left = image.pixels[row * 16 + 3] >> 11;
            let right = image.pixels[row * 16 + 12] >> 11;
            assert!(left < right, "row {}: {} vs {}", row, left, right);
        }
    }

    #[test]
    fn static_picture_geometry() {
        let geometry = FrameGeometry::STATIC_PICTURE;
        let payload = built_payload(geometry.macro_blocks(), |_| [0; BLOCK_LEN]);
        let image = decode_image(&payload, geometry.width(), geometry.height(), 80)
            .unwrap()
            .into_strict()
            .unwrap();
        assert_eq!(image.pixels.len(), 640 * 480);
        assert!(image.pixels.iter().all(|p| *p == MID_GRAY));
        assert!(image.cube_faces().is_none());
    }

    #[test]
    fn short_dc_stream_is_structural() {
        let payload = built_payload(3, |_| [0; BLOCK_LEN]);
        assert_eq!(
            decode_image(&payload, 16, 16, 50),
            Err(StructuralError::DcStreamTooShort {
                got: 9,
                needed: 12,
                blocks: 4
            })
        );
    }

    #[test]
    fn truncated_payload_is_structural() {
        let payload = hand_written_flat_payload();
        let cut = &payload[..payload.len() - 1];
        assert!(matches!(
            decode_image(cut, 16, 16, 50),
            Err(StructuralError::Truncated { what: "DC stream", .. })
        ));
    }

    #[test]
    fn short_control_stream_still_decodes() {
        // the control stream only covers the first macro block
        let ac_control = [0x00, 0x00, 0x01, 0x00, 0x00];
        let dc = [0u8; 12];
        let payload = ImagePayload {
            ac_control_uncompressed_size: 3,
            ac_control: &ac_control,
            ac_magnitudes: &[],
            dc: &dc,
        };
        let mut bytes = Vec::new();
        payload.write_to(&mut bytes);
        let decoded = decode_image(&bytes, 16, 16, 50).unwrap();
        assert_eq!(decoded.defects, vec![StreamDefect::ControlStreamExhausted]);
        assert!(decoded.value.pixels.iter().all(|p| *p == MID_GRAY));
    }

    #[test]
    fn cut_huffman_stream_is_reported() {
        // twelve control symbols announced, the coded bits stop after eight
        let ac_control = [0x00, 0x00, 0x01, 0x00, 0x00];
        let dc = [0u8; 12];
        let payload = ImagePayload {
            ac_control_uncompressed_size: 12,
            ac_control: &ac_control,
            ac_magnitudes: &[],
            dc: &dc,
        };
        let mut bytes = Vec::new();
        payload.write_to(&mut bytes);
        let decoded = decode_image(&bytes, 16, 16, 50).unwrap();
        assert_eq!(
            decoded.defects,
            vec![StreamDefect::HuffmanInputExhausted {
                decoded: 8,
                expected: 12
            }]
        );
        // missing control bytes are zero, every block still ends right away
        assert!(decoded.value.pixels.iter().all(|p| *p == MID_GRAY));
    }
}

#[cfg(test)]
mod archive_scenarios {
    use crate::archive::{compress, decompress, PakArchive, PakWriter};
    use crate::image::{decode_image, ImagePayloadBuilder};
    use crate::{CodecError, StreamDefect};
    use alloc::vec::Vec;

    #[test]
    fn image_stored_in_an_archive() {
        let mut builder = ImagePayloadBuilder::new();
        for _ in 0..12 {
            builder.push_block(&[0; 64]).unwrap();
        }
        let payload = builder.finish();

        let mut writer = PakWriter::new();
        writer.add_file("PIC.VR", &payload).unwrap();
        writer.add_file("README", b"nothing to see here").unwrap();
        let pak = writer.finish().unwrap();

        let archive = PakArchive::parse(&pak).unwrap();
        let (entry, extracted) = archive.extract_all().next().unwrap();
        assert_eq!(entry.name(), "PIC.VR");
        let extracted = extracted.unwrap().into_strict().unwrap();
        assert_eq!(extracted, payload);
        let image = decode_image(&extracted, 16, 16, 50).unwrap();
        assert!(image.is_clean());
    }

    #[test]
    fn strict_callers_get_one_error_type() {
        fn unpack(data: &[u8]) -> Result<Vec<u8>, CodecError> {
            Ok(decompress(data).into_strict()?)
        }
        assert_eq!(unpack(&compress(b"abcabcabc")).unwrap(), b"abcabcabc");
        assert_eq!(
            unpack(&[0xC0, 0x05]),
            Err(CodecError::Degraded(StreamDefect::BackReferenceUnderflow {
                offset: 0,
                distance: 6,
                available: 0,
                count: 1
            }))
        );
    }
}
