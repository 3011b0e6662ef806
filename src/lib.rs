//! Decoders for the asset formats of 1990s panoramic adventure titles.
//!
//! Two independent codecs live in this crate:
//!
//! * [`image`]: the block-transform image format. Three byte streams (a
//!   Huffman-coded AC control stream, raw AC magnitude bits and raw DC bits)
//!   are unpacked into 8×8 blocks, run through an inverse DCT and packed into an
//!   RGB565 raster with error diffusion.
//! * [`archive`]: the byte-oriented LZ scheme used inside `PAKF` containers
//!   ("compression level 3"), with both directions implemented.
//!
//! Malformed input never panics. Structural problems (a length field pointing
//! past the end of the buffer, dimensions the format cannot express) are
//! returned as [`errors::StructuralError`]. Damage the legacy engine tolerated
//! (truncated bit streams, bad back-references) still produces output, with the
//! problems listed in [`Decoded::defects`] so callers can decide how strict to be.
//!
//! # Examples
//! ```
//! let data = b"abcabcabcabcabcabc";
//! let packed = fvr_codecs::archive::compress(data);
//! let unpacked = fvr_codecs::archive::decompress(&packed).into_strict().unwrap();
//! assert_eq!(unpacked, data);
//! ```
#![no_std]
#![deny(rust_2018_idioms)]
#![warn(trivial_casts, trivial_numeric_casts)]

#[cfg(feature = "std")]
extern crate std;

extern crate alloc;

macro_rules! vprintln {
    ($($x:tt)*) => {
        #[cfg(feature = "tracing")]
        tracing::debug!($($x)*);
    };
}

macro_rules! vwarn {
    ($($x:tt)*) => {
        #[cfg(feature = "tracing")]
        tracing::warn!($($x)*);
    };
}

pub mod archive;
pub mod common;
pub mod decoding;
pub mod encoding;
pub mod errors;
pub mod huffman;
pub mod image;
mod tests;

pub use errors::{CodecError, Decoded, StreamDefect, StructuralError, UnsupportedEncoding};
