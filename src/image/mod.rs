//! The block transform image codec.
//!
//! An image is split into strips of 8 rows, each strip into macro blocks of 8×8
//! pixels. Every macro block stores a Y, a Cb and a Cr block of DCT coefficients.
//! Those coefficients are spread over three streams (see [`ImagePayload`]):
//! a Huffman coded control stream telling how many zeros to skip and how many
//! bits to read, the raw AC magnitude bits and one raw byte of DC per block.

pub mod block;
pub mod color;
pub mod idct;
mod payload;
mod payload_builder;
pub mod quant;

pub use payload::ImagePayload;
pub use payload_builder::ImagePayloadBuilder;
pub use quant::QuantTables;

use self::block::CoefficientStreams;
use self::color::StripDither;
use crate::common::{BLOCK_LEN, BLOCK_SIZE};
use crate::errors::{Decoded, StructuralError};
use alloc::vec;
use alloc::vec::Vec;

/// Blocks per macro block, one per channel.
const CHANNELS: usize = 3;

/// Width and height of a frame. Both are non-zero multiples of 8.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameGeometry {
    width: usize,
    height: usize,
}

impl FrameGeometry {
    /// Still pictures.
    pub const STATIC_PICTURE: FrameGeometry = FrameGeometry {
        width: 640,
        height: 480,
    };
    /// Panoramas: six cube faces of 512×512, each stored as four 256×256 tiles stacked on top of each other.
    pub const PANORAMA_STRIP: FrameGeometry = FrameGeometry {
        width: 256,
        height: 6144,
    };

    pub fn new(width: usize, height: usize) -> Result<FrameGeometry, StructuralError> {
        if width == 0 || height == 0 || width % BLOCK_SIZE != 0 || height % BLOCK_SIZE != 0 {
            return Err(StructuralError::UnalignedDimensions { width, height });
        }
        Ok(FrameGeometry { width, height })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of 8×8 macro blocks, saturating for absurd dimensions.
    pub fn macro_blocks(&self) -> usize {
        (self.width / BLOCK_SIZE).saturating_mul(self.height / BLOCK_SIZE)
    }
}

/// A decoded frame, one RGB565 value per pixel in raster order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rgb565Image {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<u16>,
}

impl Rgb565Image {
    /// The raster as the legacy engine kept it in memory.
    pub fn to_le_bytes(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|p| p.to_le_bytes()).collect()
    }

    /// Expands every pixel to 8 bits per channel, `[r, g, b]` triples in raster order.
    pub fn to_rgb888(&self) -> Vec<u8> {
        let mut rgb = Vec::with_capacity(self.pixels.len() * 3);
        for pixel in &self.pixels {
            let r = (pixel >> 11) as u8 & 0x1F;
            let g = (pixel >> 5) as u8 & 0x3F;
            let b = *pixel as u8 & 0x1F;
            rgb.extend_from_slice(&[r << 3 | r >> 2, g << 2 | g >> 4, b << 3 | b >> 2]);
        }
        rgb
    }

    /// Reassembles the six 512×512 cube faces of a panorama strip. `None` for any other geometry.
    pub fn cube_faces(&self) -> Option<Vec<Rgb565Image>> {
        const TILE: usize = 256;
        const FACE: usize = 2 * TILE;
        let strip = FrameGeometry::PANORAMA_STRIP;
        if self.width != strip.width || self.height != strip.height {
            return None;
        }

        // tile index within a face -> (column, row) of that tile
        const TILE_PLACEMENT: [(usize, usize); 4] = [(0, 0), (1, 0), (1, 1), (0, 1)];
        let faces = (0..6)
            .map(|face| {
                let mut pixels = vec![0u16; FACE * FACE];
                for (tile, (column, row)) in TILE_PLACEMENT.iter().enumerate() {
                    let source = (face * 4 + tile) * TILE * TILE;
                    for line in 0..TILE {
                        let from = source + line * TILE;
                        let to = (row * TILE + line) * FACE + column * TILE;
                        pixels[to..to + TILE].copy_from_slice(&self.pixels[from..from + TILE]);
                    }
                }
                Rgb565Image {
                    width: FACE,
                    height: FACE,
                    pixels,
                }
            })
            .collect();
        Some(faces)
    }
}

/// State of one image decode.
pub struct ImageDecoder<'p> {
    geometry: FrameGeometry,
    quant: QuantTables,
    streams: CoefficientStreams<'p>,
    dither: StripDither,
}

impl<'p> ImageDecoder<'p> {
    /// Checks `payload` against `geometry` and unpacks the control stream.
    pub fn new(
        payload: &ImagePayload<'p>,
        geometry: FrameGeometry,
        quality: u32,
    ) -> Result<ImageDecoder<'p>, StructuralError> {
        let blocks = geometry.macro_blocks();
        let needed = blocks.saturating_mul(CHANNELS);
        if payload.dc.len() < needed {
            return Err(StructuralError::DcStreamTooShort {
                got: payload.dc.len(),
                needed,
                blocks,
            });
        }

        // no block consumes more than 63 control bytes, the rest would never be read
        let control_limit = needed.saturating_mul(BLOCK_LEN - 1);
        let control_len = (payload.ac_control_uncompressed_size as usize).min(control_limit);
        let control = crate::huffman::decompress(payload.ac_control, control_len)?;
        let mut streams = CoefficientStreams::new(control.value, payload.ac_magnitudes, payload.dc);
        for defect in control.defects {
            crate::errors::note_defect(streams.defects_mut(), defect);
        }

        Ok(ImageDecoder {
            geometry,
            quant: QuantTables::new(quality),
            streams,
            dither: StripDither::new(geometry.width),
        })
    }

    pub fn decode(mut self) -> Decoded<Rgb565Image> {
        let FrameGeometry { width, height } = self.geometry;
        vprintln!("Decoding {}x{} image", width, height);
        let mut pixels = vec![0u16; width * height];

        for strip in pixels.chunks_exact_mut(width * BLOCK_SIZE) {
            for x in (0..width).step_by(BLOCK_SIZE) {
                let mut y = self.streams.next_block(&self.quant.luma);
                let mut cb = self.streams.next_block(&self.quant.chroma);
                let mut cr = self.streams.next_block(&self.quant.chroma);
                y.inverse_transform();
                cb.inverse_transform();
                cr.inverse_transform();
                self.dither.store_blocks(x, &y, &cb, &cr);
            }
            self.dither.flush(strip);
        }

        Decoded {
            value: Rgb565Image {
                width,
                height,
                pixels,
            },
            defects: self.streams.into_defects(),
        }
    }
}

/// Decodes an image payload into an RGB565 raster of `width × height` pixels.
///
/// Fails if the dimensions are not multiples of 8, if a length field of the
/// payload points past its end, or if the DC stream cannot cover every block.
/// Damaged coefficient streams still produce an image, with the damage listed
/// in the returned [`Decoded`].
pub fn decode_image(
    payload: &[u8],
    width: usize,
    height: usize,
    quality: u32,
) -> Result<Decoded<Rgb565Image>, StructuralError> {
    let geometry = FrameGeometry::new(width, height)?;
    let payload = ImagePayload::parse(payload)?;
    Ok(ImageDecoder::new(&payload, geometry, quality)?.decode())
}

#[cfg(test)]
mod tests {
    use super::{decode_image, FrameGeometry, Rgb565Image};
    use crate::errors::StructuralError;
    use alloc::vec;
    use alloc::vec::Vec;

    #[test]
    fn dimensions_must_be_block_aligned() {
        assert!(FrameGeometry::new(16, 8).is_ok());
        for (w, h) in [(0, 8), (8, 0), (12, 8), (8, 20)] {
            assert_eq!(
                FrameGeometry::new(w, h),
                Err(StructuralError::UnalignedDimensions {
                    width: w,
                    height: h
                })
            );
            assert!(decode_image(&[], w, h, 50).is_err());
        }
        assert_eq!(FrameGeometry::STATIC_PICTURE.macro_blocks(), 80 * 60);
        assert_eq!(FrameGeometry::PANORAMA_STRIP.macro_blocks(), 32 * 768);
    }

    #[test]
    fn rgb888_expansion() {
        let image = Rgb565Image {
            width: 3,
            height: 1,
            pixels: vec![0xFFFF, 0x0000, 0x8410],
        };
        assert_eq!(
            image.to_rgb888(),
            vec![255, 255, 255, 0, 0, 0, 132, 130, 132]
        );
        assert_eq!(image.to_le_bytes(), vec![0xFF, 0xFF, 0, 0, 0x10, 0x84]);
    }

    #[test]
    fn cube_faces_from_tiles() {
        // every pixel holds the index of the 256x256 tile it belongs to
        let pixels: Vec<u16> = (0..24u16)
            .flat_map(|tile| core::iter::repeat(tile).take(256 * 256))
            .collect();
        let strip = Rgb565Image {
            width: 256,
            height: 6144,
            pixels,
        };
        let faces = strip.cube_faces().unwrap();
        assert_eq!(faces.len(), 6);
        for (i, face) in faces.iter().enumerate() {
            let base = i as u16 * 4;
            assert_eq!(face.pixels[0], base);
            assert_eq!(face.pixels[511], base + 1);
            assert_eq!(face.pixels[511 * 512 + 511], base + 2);
            assert_eq!(face.pixels[511 * 512], base + 3);
        }

        let picture = Rgb565Image {
            width: 8,
            height: 8,
            pixels: vec![0; 64],
        };
        assert!(picture.cube_faces().is_none());
    }
}
