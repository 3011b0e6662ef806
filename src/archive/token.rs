use crate::common::{MAX_DISTANCE, MAX_LITERAL_LEN, MAX_MATCH_LEN, SHORT_DISTANCE_MAX};
use alloc::vec::Vec;

const BACK_REFERENCE_FLAG: u8 = 0x80;
const SHORT_DISTANCE_FLAG: u8 = 0x40;
const MATCH_LEN_MASK: u8 = 0x3F;

/// One unit of the LZ stream.
///
/// A control byte with the high bit clear starts a literal of `byte + 1` bytes.
/// With the high bit set it is a back-reference of `(byte & 0x3F) + 1` bytes; bit 6
/// selects a one byte distance field, otherwise the field takes two bytes, big-endian.
/// The distance is the field value plus one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    Literal(&'a [u8]),
    BackReference { length: usize, distance: usize },
}

impl Token<'_> {
    pub fn encoded_len(&self) -> usize {
        match self {
            Token::Literal(bytes) => 1 + bytes.len(),
            Token::BackReference { distance, .. } if *distance <= SHORT_DISTANCE_MAX => 2,
            Token::BackReference { .. } => 3,
        }
    }

    /// Appends the encoded token. Lengths and distances have to be within their encodable ranges.
    pub fn write_to(&self, output: &mut Vec<u8>) {
        match *self {
            Token::Literal(bytes) => {
                debug_assert!((1..=MAX_LITERAL_LEN).contains(&bytes.len()));
                output.push((bytes.len() - 1) as u8);
                output.extend_from_slice(bytes);
            }
            Token::BackReference { length, distance } => {
                debug_assert!((1..=MAX_MATCH_LEN).contains(&length));
                debug_assert!((1..=MAX_DISTANCE).contains(&distance));
                let length_bits = (length - 1) as u8 & MATCH_LEN_MASK;
                if distance <= SHORT_DISTANCE_MAX {
                    output.push(BACK_REFERENCE_FLAG | SHORT_DISTANCE_FLAG | length_bits);
                    output.push((distance - 1) as u8);
                } else {
                    output.push(BACK_REFERENCE_FLAG | length_bits);
                    output.extend_from_slice(&((distance - 1) as u16).to_be_bytes());
                }
            }
        }
    }
}

/// Splits an LZ stream into [`Token`]s.
///
/// Iteration ends at the end of the input or at a token cut off by it. In the
/// latter case [`truncated_at`](Tokens::truncated_at) tells where that token
/// started. A cut off literal is still yielded with the bytes that are present.
pub struct Tokens<'a> {
    source: &'a [u8],
    offset: usize,
    truncated_at: Option<usize>,
}

impl<'a> Tokens<'a> {
    pub fn new(source: &'a [u8]) -> Tokens<'a> {
        Tokens {
            source,
            offset: 0,
            truncated_at: None,
        }
    }

    /// Offset of the next control byte.
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn truncated_at(&self) -> Option<usize> {
        self.truncated_at
    }

    fn truncate(&mut self, start: usize) {
        self.truncated_at = Some(start);
        self.offset = self.source.len();
    }
}

impl<'a> Iterator for Tokens<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        let source = self.source;
        let start = self.offset;
        let control = *source.get(start)?;
        let rest = &source[start + 1..];

        if control & BACK_REFERENCE_FLAG == 0 {
            let len = usize::from(control) + 1;
            if rest.len() < len {
                self.truncate(start);
                return if rest.is_empty() {
                    None
                } else {
                    Some(Token::Literal(rest))
                };
            }
            self.offset = start + 1 + len;
            return Some(Token::Literal(&rest[..len]));
        }

        let length = usize::from(control & MATCH_LEN_MASK) + 1;
        let (field, field_len) = if control & SHORT_DISTANCE_FLAG != 0 {
            match rest {
                [d, ..] => (usize::from(*d), 1),
                _ => {
                    self.truncate(start);
                    return None;
                }
            }
        } else {
            match rest {
                [hi, lo, ..] => (usize::from(u16::from_be_bytes([*hi, *lo])), 2),
                _ => {
                    self.truncate(start);
                    return None;
                }
            }
        };
        self.offset = start + 1 + field_len;
        Some(Token::BackReference {
            length,
            distance: field + 1,
        })
    }
}
