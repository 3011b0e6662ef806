//! Writers shared by the encoders.

pub mod bit_writer;

pub use bit_writer::BitWriter;
