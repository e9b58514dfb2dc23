//! Alphabet Codec
//!
//! 32 symbols, one per 5-bit code. The table is indexed by code, so decoding
//! is a direct lookup; encoding goes through a map built once on first use.

use crate::{Error, Result};
use lazy_static::lazy_static;
use std::collections::HashMap;

/// A 5-bit symbol code (0..=31)
pub type Code = u8;

pub const ALPHABET_SIZE: usize = 32;

/// Code with every bit clear
pub const ALL_ZERO: Code = 0b00000;

/// Code with every bit set
pub const ALL_ONE: Code = 0b11111;

/// Marks a position whose plaintext is unknown in a known-text crib
pub const GAP: char = '-';

/// Symbols in code order: `SYMBOLS[code]` is the symbol for `code`
pub const SYMBOLS: [char; ALPHABET_SIZE] = [
    '2', 'T', '3', 'O', '4', 'H', 'N', 'M',
    '5', 'L', 'R', 'G', 'I', 'P', 'C', 'V',
    'E', 'Z', 'D', 'B', 'S', 'Y', 'F', 'X',
    'A', 'W', 'J', '6', 'U', 'Q', 'K', '7',
];

lazy_static! {
    static ref CODES: HashMap<char, Code> = SYMBOLS
        .iter()
        .enumerate()
        .map(|(code, &symbol)| (symbol, code as Code))
        .collect();
}

/// Symbol -> code
pub fn encode(symbol: char) -> Result<Code> {
    CODES.get(&symbol).copied().ok_or(Error::InvalidSymbol(symbol))
}

/// Code -> symbol
pub fn decode(code: Code) -> Result<char> {
    SYMBOLS
        .get(code as usize)
        .copied()
        .ok_or(Error::InvalidCode(code))
}

/// Line breaks pass through the cipher untouched
pub fn is_line_break(c: char) -> bool {
    c == '\n' || c == '\r'
}
