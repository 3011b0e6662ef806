//! Errors and the [`Decoded`] wrapper shared by both codecs.
//!
//! Failures come in three kinds:
//!
//! * [`StructuralError`]: the buffer cannot be what the caller says it is. Nothing is decoded.
//! * [`StreamDefect`]: the data is damaged in a way the original engine shrugged off.
//!   Decoding finishes and the defect is listed next to the output.
//! * [`UnsupportedEncoding`]: an archive entry uses a scheme this crate does not implement.
//!   Only that entry is skipped.
//!
//! [`CodecError`] wraps all three for callers that want a single `?`-able error type.

use alloc::vec::Vec;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum StructuralError {
    #[error("{what} needs {needed} bytes at offset {offset} but only {available} are left")]
    Truncated {
        what: &'static str,
        offset: usize,
        needed: usize,
        available: usize,
    },
    #[error("Read wrong magic number: {found:02X?}")]
    BadMagic { found: [u8; 4] },
    #[error("Image dimensions must be non-zero multiples of 8. Is: {width}x{height}")]
    UnalignedDimensions { width: usize, height: usize },
    #[error("DC stream holds {got} bytes but {blocks} blocks need at least {needed}")]
    DcStreamTooShort {
        got: usize,
        needed: usize,
        blocks: usize,
    },
}

/// Damage found while decoding. The output that comes with it is still usable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum StreamDefect {
    #[error("Huffman stream ran out of bits after {decoded} of {expected} symbols")]
    HuffmanInputExhausted { decoded: usize, expected: usize },
    #[error("AC control stream ended before the last block")]
    ControlStreamExhausted,
    #[error("AC magnitude stream ran out of bits")]
    AcMagnitudesExhausted,
    #[error("DC stream ran out of bits")]
    DcExhausted,
    #[error("AC control code 0x{code:02X} has a zero bit size")]
    ZeroSizedCoefficient { code: u8 },
    #[error("AC control code 0x{code:02X} skips past the end of the block")]
    CoefficientOverrun { code: u8 },
    #[error("Token at offset {offset} is cut off by the end of the input")]
    TruncatedToken { offset: usize },
    /// Describes the first offending back-reference, `count` includes it.
    #[error("Back-reference at offset {offset} reaches {distance} bytes back but only {available} bytes were decoded ({count} in total)")]
    BackReferenceUnderflow {
        offset: usize,
        distance: usize,
        available: usize,
        count: usize,
    },
    #[error("Entry should decode to {expected} bytes but produced {actual}")]
    SizeMismatch { expected: usize, actual: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum UnsupportedEncoding {
    #[error("Compression level {level} is not supported, only level 3 is")]
    CompressionLevel { level: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum CodecError {
    #[error(transparent)]
    Structural(#[from] StructuralError),
    #[error(transparent)]
    Degraded(#[from] StreamDefect),
    #[error(transparent)]
    Unsupported(#[from] UnsupportedEncoding),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum PakWriteError {
    #[error("Entry name must not be empty")]
    EmptyName,
    #[error("Entry name {name:?} is {len} bytes long, at most {max} fit")]
    NameTooLong {
        name: alloc::string::String,
        len: usize,
        max: usize,
    },
    #[error("Entry name {name:?} contains non ASCII or NUL characters")]
    InvalidName { name: alloc::string::String },
    #[error("Archive would grow past 4 GiB")]
    ArchiveTooLarge,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum PayloadBuildError {
    #[error("DC level {got} does not fit into 8 bits")]
    DcOutOfRange { got: i32 },
    #[error("AC level {got} at position {position} needs more than 15 bits")]
    AcOutOfRange { got: i32, position: usize },
}

/// Output of a lenient decode together with everything that went wrong on the way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded<T> {
    pub value: T,
    pub defects: Vec<StreamDefect>,
}

impl<T> Decoded<T> {
    pub fn clean(value: T) -> Self {
        Decoded {
            value,
            defects: Vec::new(),
        }
    }

    pub fn is_clean(&self) -> bool {
        self.defects.is_empty()
    }

    /// Fails with the first recorded defect, if any.
    pub fn into_strict(self) -> Result<T, StreamDefect> {
        match self.defects.into_iter().next() {
            Some(defect) => Err(defect),
            None => Ok(self.value),
        }
    }

    pub fn into_lenient(self) -> T {
        self.value
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Decoded<U> {
        Decoded {
            value: f(self.value),
            defects: self.defects,
        }
    }

    /// Records a defect unless an identical one is already listed.
    pub(crate) fn note(&mut self, defect: StreamDefect) {
        note_defect(&mut self.defects, defect);
    }
}

pub(crate) fn note_defect(defects: &mut Vec<StreamDefect>, defect: StreamDefect) {
    if !defects.contains(&defect) {
        vwarn!("{}", defect);
        defects.push(defect);
    }
}
