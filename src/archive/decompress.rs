use super::token::{Token, Tokens};
use crate::errors::{Decoded, StreamDefect};
use alloc::vec::Vec;

/// Expands an LZ stream.
///
/// Back-references are copied one byte at a time, so a distance shorter than the
/// length repeats the last `distance` bytes. A reference reaching before the
/// start of the output reads zeros for the missing part, all such references are
/// reported as a single defect. A token cut off by the
/// end of the input ends decoding, the literal bytes that are present are kept.
pub fn decompress(source: &[u8]) -> Decoded<Vec<u8>> {
    let mut decoded = Decoded::clean(Vec::with_capacity(source.len().saturating_mul(2)));
    let mut tokens = Tokens::new(source);
    let mut underflow: Option<(usize, usize, usize)> = None;
    let mut underflows = 0;

    loop {
        let offset = tokens.offset();
        let Some(token) = tokens.next() else {
            break;
        };
        match token {
            Token::Literal(bytes) => decoded.value.extend_from_slice(bytes),
            Token::BackReference { length, distance } => {
                let available = decoded.value.len();
                if distance > available {
                    underflow.get_or_insert((offset, distance, available));
                    underflows += 1;
                }
                let output = &mut decoded.value;
                for _ in 0..length {
                    let byte = match output.len().checked_sub(distance) {
                        Some(from) => output[from],
                        None => 0,
                    };
                    output.push(byte);
                }
            }
        }
    }

    if let Some((offset, distance, available)) = underflow {
        decoded.note(StreamDefect::BackReferenceUnderflow {
            offset,
            distance,
            available,
            count: underflows,
        });
    }
    if let Some(offset) = tokens.truncated_at() {
        decoded.note(StreamDefect::TruncatedToken { offset });
    }
    vprintln!(
        "Expanded {} bytes into {} bytes",
        source.len(),
        decoded.value.len()
    );
    decoded
}
