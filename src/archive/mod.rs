//! The LZ scheme of `PAKF` archives, stored as compression level 3.
//!
//! The stream is a sequence of [`Token`]s. [`decompress`] expands it, [`compress`]
//! produces one greedily. [`container`] reads and writes the archive format around it.

mod compress;
pub mod container;
mod decompress;
mod token;

pub use compress::compress;
pub use container::{PakArchive, PakEntry, PakWriter};
pub use decompress::decompress;
pub use token::{Token, Tokens};
