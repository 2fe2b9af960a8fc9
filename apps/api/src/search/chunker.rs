//! Splits oversized payloads into bounded pieces before they are sent to the completion service.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChunkError {
    #[error("Invalid chunk size {0}: must be greater than zero")]
    InvalidSize(usize),
}

/// Splits `text` into consecutive, non-overlapping pieces of at most `max_size` characters.
///
/// Every piece but the last holds exactly `max_size` characters. Joining the pieces
/// reproduces `text`. Empty input yields no pieces. Boundaries always fall on char
/// boundaries, so multi-byte text is never cut mid-character.
pub fn split(text: &str, max_size: usize) -> Result<Vec<&str>, ChunkError> {
    if max_size == 0 {
        return Err(ChunkError::InvalidSize(max_size));
    }

    let mut chunks = Vec::new();
    let mut start = 0;
    let mut count = 0;

    for (offset, _) in text.char_indices() {
        if count == max_size {
            chunks.push(&text[start..offset]);
            start = offset;
            count = 0;
        }
        count += 1;
    }

    if start < text.len() {
        chunks.push(&text[start..]);
    }

    Ok(chunks)
}
