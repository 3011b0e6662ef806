//! Readers shared by the decoders.

pub mod bit_reader;
pub mod byte_reader;

pub use bit_reader::BitReader;
pub use byte_reader::ByteCursor;
