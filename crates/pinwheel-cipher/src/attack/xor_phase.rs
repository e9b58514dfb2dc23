//! XOR wheel recovery
//!
//! Swaps cannot change an all-zero or all-one code, so wherever the
//! ciphertext is one of those the permutation stage was a no-op and
//! `cipher ^ plain` is exactly the XOR mask.

use super::learned::LearnedWheel;
use super::text::KnownText;
use crate::alphabet::{ALL_ONE, ALL_ZERO};
use crate::wheelset::{bit_mask, XOR_WHEELS};
use crate::Result;

/// Record every XOR bit the text reveals. Returns the number of positions used.
pub fn learn(text: &KnownText, learned: &mut [LearnedWheel]) -> Result<usize> {
    let mut used = 0;
    for (position, pair) in text.iter() {
        let Some(pair) = pair else { continue };
        if pair.cipher != ALL_ZERO && pair.cipher != ALL_ONE {
            continue;
        }

        let mask = pair.cipher ^ pair.plain;
        for wheel in XOR_WHEELS {
            learned[wheel].record(position, mask & bit_mask(wheel as u8) != 0)?;
        }
        used += 1;
    }
    Ok(used)
}
