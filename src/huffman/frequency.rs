use crate::decoding::ByteCursor;
use crate::errors::StructuralError;
use alloc::vec::Vec;

/// Per byte value weights that seed a [`HuffmanTree`](super::HuffmanTree).
///
/// On the wire only the non-zero stretches are stored. Every run is
/// `start, end, freq[end - start + 1]`, and the list ends with a zero start byte
/// that is not the very first byte of the table (a first run may legitimately start at 0).
/// A run with `end < start` carries no frequency bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    frequencies: [u8; 256],
}

impl FrequencyTable {
    pub fn new(frequencies: [u8; 256]) -> Self {
        FrequencyTable { frequencies }
    }

    /// Weights proportional to the byte counts of `data`, scaled into `1..=255`.
    /// Bytes that never occur keep a weight of zero.
    pub fn from_data(data: &[u8]) -> Self {
        let mut counts = [0u64; 256];
        for byte in data {
            counts[usize::from(*byte)] += 1;
        }
        let max = counts.iter().copied().max().unwrap_or(0);
        let mut frequencies = [0u8; 256];
        for (freq, count) in frequencies.iter_mut().zip(counts) {
            if count > 0 {
                *freq = (count * 255 / max).clamp(1, 255) as u8;
            }
        }
        FrequencyTable { frequencies }
    }

    pub fn frequencies(&self) -> &[u8; 256] {
        &self.frequencies
    }

    pub fn get(&self, symbol: u8) -> u8 {
        self.frequencies[usize::from(symbol)]
    }

    pub fn is_empty(&self) -> bool {
        self.frequencies.iter().all(|f| *f == 0)
    }

    /// Parses a table from the head of `source`. Returns the table and the number of bytes it occupied.
    pub fn parse(source: &[u8]) -> Result<(FrequencyTable, usize), StructuralError> {
        const WHAT: &str = "Huffman frequency table";
        let mut cursor = ByteCursor::new(source);
        let mut frequencies = [0u8; 256];

        loop {
            let first = cursor.offset() == 0;
            let start = cursor.read_u8(WHAT)?;
            if !first && start == 0 {
                break;
            }
            let end = cursor.read_u8(WHAT)?;
            if end < start {
                continue;
            }
            let (start, end) = (usize::from(start), usize::from(end));
            let run = cursor.read_bytes(end - start + 1, WHAT)?;
            frequencies[start..=end].copy_from_slice(run);
        }

        vprintln!("Parsed Huffman frequency table of {} bytes", cursor.offset());
        Ok((FrequencyTable { frequencies }, cursor.offset()))
    }

    /// Appends the wire form of this table to `output`.
    pub fn write_to(&self, output: &mut Vec<u8>) {
        let runs = self.runs();
        if runs.is_empty() {
            // one explicit zero run, then the terminator
            output.extend_from_slice(&[0, 0, 0, 0]);
            return;
        }
        for (start, end) in runs {
            output.push(start as u8);
            output.push(end as u8);
            output.extend_from_slice(&self.frequencies[start..=end]);
        }
        output.push(0);
    }

    /// Inclusive ranges covering every non-zero weight. Gaps of up to two zeros are
    /// stored inline, a new run header would cost just as much.
    fn runs(&self) -> Vec<(usize, usize)> {
        let mut runs: Vec<(usize, usize)> = Vec::new();
        for (symbol, freq) in self.frequencies.iter().enumerate() {
            if *freq == 0 {
                continue;
            }
            match runs.last_mut() {
                Some((_, end)) if symbol - *end <= 3 => *end = symbol,
                _ => runs.push((symbol, symbol)),
            }
        }
        runs
    }
}
