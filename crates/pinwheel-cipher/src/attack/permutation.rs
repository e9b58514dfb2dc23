//! Permutation wheel recovery
//!
//! With the XOR wheels known, every position yields the intermediate code
//! fed into the swaps. When the ciphertext is a unique-bit code, the odd bit's
//! start and end positions index the transposition table.

use super::learned::LearnedWheel;
use super::tables::{transition, unique_bit};
use super::text::{KnownText, Pair};
use crate::alphabet::Code;
use crate::wheelset::{xor_mask, PERMUTATION_WHEELS};
use crate::{Error, Result, Wheel};

/// Where the odd bit travelled through the swaps at one position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Move {
    pub origin: u8,
    pub destination: u8,
}

/// Trace the odd bit for one known pair, given that position's XOR mask.
/// `None` when the ciphertext is not a unique-bit code.
pub fn trace(position: usize, pair: Pair, mask: Code) -> Result<Option<Move>> {
    let Some(out) = unique_bit(pair.cipher) else {
        return Ok(None);
    };
    let intermediate = pair.plain ^ mask;
    match unique_bit(intermediate) {
        Some(input) if input.polarity == out.polarity => Ok(Some(Move {
            origin: input.position,
            destination: out.position,
        })),
        _ => Err(Error::InvalidUniqueBitPattern {
            position,
            code: intermediate,
        }),
    }
}

/// Read one step from each wheel
pub fn read_bits<const N: usize>(wheels: &mut [Wheel]) -> [bool; N] {
    std::array::from_fn(|i| wheels[i].read())
}

/// Record every gate bit the transposition table pins down. `xor_wheels` are
/// the assembled XOR wheels at cursor 0. Returns the number of positions used.
pub fn learn(text: &KnownText, xor_wheels: &mut [Wheel], learned: &mut [LearnedWheel]) -> Result<usize> {
    let mut used = 0;
    for (position, pair) in text.iter() {
        let mask = xor_mask(read_bits(xor_wheels));
        let Some(pair) = pair else { continue };
        let Some(step) = trace(position, pair, mask)? else {
            continue;
        };

        let cell = transition(step.origin, step.destination).ok_or(Error::UnreachableTransition {
            position,
            origin: step.origin,
            destination: step.destination,
        })?;
        for (wheel, slot) in PERMUTATION_WHEELS.zip(cell) {
            if let Some(bit) = slot.bit() {
                learned[wheel].record(position, bit)?;
            }
        }
        used += 1;
    }
    Ok(used)
}
