//! Word codec
//! 32-byte hex words <-> four felts, chunk order preserved

use crate::models::errors::AppResult;
use crate::models::types::{Felt, Word};
use crate::utils::constants::{FELT_BYTES, WORD_BYTES};
use crate::utils::felts::{bytes_to_felt, felt_to_bytes, hex_to_fixed_bytes};

/// Decode a 32-byte hex word into four felts
pub fn word_hex_to_felts(word_hex: &str) -> AppResult<Word> {
    let bytes = hex_to_fixed_bytes(word_hex, WORD_BYTES)?;

    let mut word: Word = [0; 4];
    for (felt, chunk) in word.iter_mut().zip(bytes.chunks_exact(FELT_BYTES)) {
        *felt = bytes_to_felt(chunk)?;
    }
    Ok(word)
}

/// Encode four felts as a lowercase `0x`-prefixed hex word
pub fn word_to_hex(word: &Word) -> String {
    let bytes: Vec<u8> = word.iter().copied().flat_map(felt_to_bytes).collect();
    format!("0x{}", hex::encode(bytes))
}

/// Render a word as a dot-separated push operand
pub fn word_to_operand(word: &[Felt]) -> String {
    word.iter()
        .map(|felt| felt.to_string())
        .collect::<Vec<_>>()
        .join(".")
}
