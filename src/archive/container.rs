//! The `PAKF` container.
//!
//! ```text
//! "PAKF" | total_size: u32
//! repeated until total_size:
//!     name: [u8; 16] NUL padded | compression_level: u32 | compressed_size: u32
//!     | uncompressed_size: u32 | data: [u8; compressed_size]
//! ```
//! All integers are little-endian.

use super::{compress, decompress};
use crate::common::{
    COMPRESSION_LEVEL_LZ, PAK_ENTRY_HEADER_LEN, PAK_HEADER_LEN, PAK_MAGIC, PAK_NAME_LEN,
};
use crate::decoding::ByteCursor;
use crate::errors::{Decoded, PakWriteError, StreamDefect, StructuralError, UnsupportedEncoding};
use alloc::borrow::Cow;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

/// One file inside an archive. The payload is borrowed from the archive buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PakEntry<'a> {
    raw_name: &'a [u8],
    pub compression_level: u32,
    pub uncompressed_size: u32,
    pub data: &'a [u8],
    /// Offset of the entry header inside the archive
    pub offset: usize,
}

impl<'a> PakEntry<'a> {
    /// Name bytes up to the first NUL.
    pub fn raw_name(&self) -> &'a [u8] {
        self.raw_name
    }

    pub fn name(&self) -> Cow<'a, str> {
        String::from_utf8_lossy(self.raw_name)
    }

    pub fn is_supported(&self) -> bool {
        self.compression_level == COMPRESSION_LEVEL_LZ
    }

    /// Expands the payload. Only compression level 3 is understood.
    ///
    /// An output length that differs from the recorded size is reported as
    /// [`StreamDefect::SizeMismatch`], the bytes are returned anyway.
    pub fn decompress(&self) -> Result<Decoded<Vec<u8>>, UnsupportedEncoding> {
        if !self.is_supported() {
            return Err(UnsupportedEncoding::CompressionLevel {
                level: self.compression_level,
            });
        }
        let mut decoded = decompress(self.data);
        let expected = self.uncompressed_size as usize;
        if decoded.value.len() != expected {
            decoded.note(StreamDefect::SizeMismatch {
                expected,
                actual: decoded.value.len(),
            });
        }
        Ok(decoded)
    }
}

/// A parsed archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PakArchive<'a> {
    pub total_size: u32,
    pub entries: Vec<PakEntry<'a>>,
}

impl<'a> PakArchive<'a> {
    /// Reads the entry table of `source`.
    ///
    /// Entries are read until `total_size` or the end of the buffer, whichever comes
    /// first. Any header or payload running past that point fails the whole parse.
    pub fn parse(source: &'a [u8]) -> Result<PakArchive<'a>, StructuralError> {
        let mut cursor = ByteCursor::new(source);
        let magic = cursor.read_array::<4>("archive magic")?;
        if magic != PAK_MAGIC {
            return Err(StructuralError::BadMagic { found: magic });
        }
        let total_size = cursor.read_u32_le("archive size")?;
        let end = (total_size as usize).clamp(PAK_HEADER_LEN, source.len());
        if end < source.len() {
            vprintln!(
                "Archive declares {} bytes, ignoring {} trailing bytes",
                total_size,
                source.len() - end
            );
        }

        let mut cursor = ByteCursor::new(&source[..end]);
        cursor.read_bytes(PAK_HEADER_LEN, "archive header")?;
        let mut entries = Vec::new();
        while !cursor.is_empty() {
            let offset = cursor.offset();
            let name = cursor.read_bytes(PAK_NAME_LEN, "entry name")?;
            let compression_level = cursor.read_u32_le("entry compression level")?;
            let compressed_size = cursor.read_u32_le("entry compressed size")?;
            let uncompressed_size = cursor.read_u32_le("entry uncompressed size")?;
            let data = cursor.read_bytes(compressed_size as usize, "entry data")?;

            let name_len = name.iter().position(|b| *b == 0).unwrap_or(name.len());
            let entry = PakEntry {
                raw_name: &name[..name_len],
                compression_level,
                uncompressed_size,
                data,
                offset,
            };
            vprintln!(
                "Entry {:?}: level {}, {} -> {} bytes",
                entry.name(),
                compression_level,
                compressed_size,
                uncompressed_size
            );
            entries.push(entry);
        }

        Ok(PakArchive {
            total_size,
            entries,
        })
    }

    /// Decompresses every entry. Entries with an unknown compression level yield
    /// an error of their own, the rest of the archive is still extracted.
    pub fn extract_all(
        &self,
    ) -> impl Iterator<Item = (&PakEntry<'a>, Result<Decoded<Vec<u8>>, UnsupportedEncoding>)> + '_ {
        self.entries.iter().map(|entry| {
            let result = entry.decompress();
            if let Err(_err) = &result {
                vwarn!("Skipping {:?}: {}", entry.name(), _err);
            }
            (entry, result)
        })
    }
}

/// Builds an archive in memory. Every file is stored with compression level 3.
pub struct PakWriter {
    body: Vec<u8>,
    entries: usize,
}

impl PakWriter {
    pub fn new() -> Self {
        Self {
            body: Vec::new(),
            entries: 0,
        }
    }

    pub fn entries(&self) -> usize {
        self.entries
    }

    /// Compresses `data` and appends it as `name`. Names are 1 to 15 ASCII characters without NUL.
    pub fn add_file(&mut self, name: &str, data: &[u8]) -> Result<(), PakWriteError> {
        if name.is_empty() {
            return Err(PakWriteError::EmptyName);
        }
        if !name.bytes().all(|b| b.is_ascii() && b != 0) {
            return Err(PakWriteError::InvalidName {
                name: name.to_string(),
            });
        }
        if name.len() >= PAK_NAME_LEN {
            return Err(PakWriteError::NameTooLong {
                name: name.to_string(),
                len: name.len(),
                max: PAK_NAME_LEN - 1,
            });
        }
        let uncompressed_size = u32::try_from(data.len()).map_err(|_| PakWriteError::ArchiveTooLarge)?;
        let packed = compress(data);
        let compressed_size = u32::try_from(packed.len()).map_err(|_| PakWriteError::ArchiveTooLarge)?;

        let mut field = [0u8; PAK_NAME_LEN];
        field[..name.len()].copy_from_slice(name.as_bytes());
        self.body.reserve(PAK_ENTRY_HEADER_LEN + packed.len());
        self.body.extend_from_slice(&field);
        self.body.extend_from_slice(&COMPRESSION_LEVEL_LZ.to_le_bytes());
        self.body.extend_from_slice(&compressed_size.to_le_bytes());
        self.body.extend_from_slice(&uncompressed_size.to_le_bytes());
        self.body.extend_from_slice(&packed);
        self.entries += 1;
        vprintln!("Packed {}: {} -> {} bytes", name, data.len(), packed.len());
        Ok(())
    }

    pub fn finish(self) -> Result<Vec<u8>, PakWriteError> {
        let total_size = u32::try_from(PAK_HEADER_LEN + self.body.len())
            .map_err(|_| PakWriteError::ArchiveTooLarge)?;
        let mut output = Vec::with_capacity(total_size as usize);
        output.extend_from_slice(&PAK_MAGIC);
        output.extend_from_slice(&total_size.to_le_bytes());
        output.extend_from_slice(&self.body);
        Ok(output)
    }
}

impl Default for PakWriter {
    fn default() -> Self {
        Self::new()
    }
}
