use super::token::Token;
use crate::common::{MATCH_WINDOW, MAX_LITERAL_LEN, MAX_MATCH_LEN, SHORT_DISTANCE_MAX};
use alloc::vec;
use alloc::vec::Vec;

/// Every match starts with this many equal bytes.
const MIN_MATCH_LEN: usize = 3;
const HASH_LOG: u32 = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Match {
    length: usize,
    distance: usize,
}

impl Match {
    /// A back-reference has to save space compared to a literal.
    fn is_worth_it(&self) -> bool {
        if self.distance <= SHORT_DISTANCE_MAX {
            self.length >= MIN_MATCH_LEN
        } else {
            self.length > MIN_MATCH_LEN
        }
    }
}

/// Positions of the input grouped by their first three bytes, newest first.
struct HashChains {
    head: Vec<Option<usize>>,
    prev: Vec<Option<usize>>,
}

impl HashChains {
    fn new(input_len: usize) -> Self {
        Self {
            head: vec![None; 1 << HASH_LOG],
            prev: vec![None; input_len],
        }
    }

    fn key(prefix: &[u8]) -> usize {
        let value = u32::from(prefix[0]) << 16 | u32::from(prefix[1]) << 8 | u32::from(prefix[2]);
        (value.wrapping_mul(0x9E37_79B1) >> (32 - HASH_LOG)) as usize
    }

    fn insert(&mut self, data: &[u8], idx: usize) {
        if idx + MIN_MATCH_LEN > data.len() {
            return;
        }
        let key = Self::key(&data[idx..]);
        self.prev[idx] = self.head[key];
        self.head[key] = Some(idx);
    }

    /// Earlier positions sharing the hash of `idx`, nearest first.
    fn candidates<'c>(&'c self, data: &[u8], idx: usize) -> impl Iterator<Item = usize> + 'c {
        let first = if idx + MIN_MATCH_LEN <= data.len() {
            self.head[Self::key(&data[idx..])]
        } else {
            None
        };
        core::iter::successors(first, move |candidate| self.prev[*candidate])
    }
}

/// Greedy matcher over a whole buffer.
struct MatchGenerator<'data> {
    data: &'data [u8],
    chains: HashChains,
    /// Every position below this one is in the chains
    indexed: usize,
}

impl<'data> MatchGenerator<'data> {
    fn new(data: &'data [u8]) -> Self {
        Self {
            data,
            chains: HashChains::new(data.len()),
            indexed: 0,
        }
    }

    fn index_up_to(&mut self, idx: usize) {
        while self.indexed < idx {
            self.chains.insert(self.data, self.indexed);
            self.indexed += 1;
        }
    }

    /// Best acceptable match at `idx`: the longest one, the nearest among equally long ones.
    /// Matches may run into the bytes they produce.
    fn best_match(&mut self, idx: usize) -> Option<Match> {
        self.index_up_to(idx);
        let data = self.data;
        let max_len = MAX_MATCH_LEN.min(data.len() - idx);
        if max_len < MIN_MATCH_LEN {
            return None;
        }

        let mut best: Option<Match> = None;
        for candidate in self.chains.candidates(data, idx) {
            let distance = idx - candidate;
            if distance > MATCH_WINDOW {
                break;
            }
            let length = data[candidate..]
                .iter()
                .zip(&data[idx..idx + max_len])
                .take_while(|(a, b)| a == b)
                .count();
            let found = Match { length, distance };
            if found.is_worth_it() && best.map_or(true, |b| length > b.length) {
                best = Some(found);
                if length == max_len {
                    break;
                }
            }
        }
        best
    }
}

/// Compresses `data` into the LZ stream [`decompress`](super::decompress) expands.
///
/// Greedy: every position takes its best match if there is one. Otherwise bytes
/// are collected into a literal until a match shows up, the literal is full or
/// the input ends.
pub fn compress(data: &[u8]) -> Vec<u8> {
    let mut output = Vec::with_capacity(data.len() + data.len() / MAX_LITERAL_LEN + 1);
    let mut generator = MatchGenerator::new(data);

    let mut idx = 0;
    let mut pending = None;
    while idx < data.len() {
        let found = match pending.take() {
            Some(m) => Some(m),
            None => generator.best_match(idx),
        };
        if let Some(Match { length, distance }) = found {
            Token::BackReference { length, distance }.write_to(&mut output);
            idx += length;
            continue;
        }

        let start = idx;
        idx += 1;
        while idx < data.len() && idx - start < MAX_LITERAL_LEN {
            pending = generator.best_match(idx);
            if pending.is_some() {
                break;
            }
            idx += 1;
        }
        Token::Literal(&data[start..idx]).write_to(&mut output);
    }

    vprintln!("Compressed {} bytes into {} bytes", data.len(), output.len());
    output
}
