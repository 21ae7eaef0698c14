// src/backend/utils/chunks.rs
use crate::error::SwitchError;

/// Width of one fixed-size slot. Matches the ciphertext word width of the
/// confidential-computation substrate.
pub const WORD_BYTES: usize = 32;

/// Splits `bytes` into consecutive 32-byte words; the final word is
/// zero-right-padded. Empty input encodes to zero words.
///
/// Pure and total. Clients run this before encrypting each word; the
/// canister itself only ever stores the resulting ciphertext handles.
pub fn encode(bytes: &[u8]) -> Vec<[u8; WORD_BYTES]> {
    bytes
        .chunks(WORD_BYTES)
        .map(|chunk| {
            let mut word = [0u8; WORD_BYTES];
            word[..chunk.len()].copy_from_slice(chunk);
            word
        })
        .collect()
}

/// Concatenates `words` in order and truncates to `original_byte_len`.
///
/// # Errors
///
/// Returns `SwitchError::InvalidLength` if `original_byte_len` exceeds the
/// total width of the given words.
pub fn decode(words: &[[u8; WORD_BYTES]], original_byte_len: usize) -> Result<Vec<u8>, SwitchError> {
    if original_byte_len > words.len() * WORD_BYTES {
        return Err(SwitchError::InvalidLength {
            word_count: words.len() as u64,
            byte_len: original_byte_len as u64,
        });
    }
    let mut bytes = Vec::with_capacity(words.len() * WORD_BYTES);
    for word in words {
        bytes.extend_from_slice(word);
    }
    bytes.truncate(original_byte_len);
    Ok(bytes)
}

/// Ingestion invariant for a stored word sequence: the byte length must
/// land inside the final word, so no superfluous trailing word is stored.
/// Zero words is valid only for a zero-length value.
pub fn is_consistent(word_count: usize, byte_len: usize) -> bool {
    if word_count == 0 {
        return byte_len == 0;
    }
    byte_len > (word_count - 1) * WORD_BYTES && byte_len <= word_count * WORD_BYTES
}

/// Number of words `encode` produces for `byte_len` input bytes.
pub fn word_count_for(byte_len: usize) -> usize {
    byte_len.div_ceil(WORD_BYTES)
}
