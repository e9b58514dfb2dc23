//! Residual wheel 9 recovery
//!
//! Once wheels 0-8 are concrete, wheel 5's bit at each position settles the
//! moves where the table could only tie wheel 9 to wheel 5.

use super::learned::LearnedWheel;
use super::permutation::{read_bits, trace};
use super::tables::residual_wheel9;
use super::text::KnownText;
use crate::wheelset::xor_mask;
use crate::{Result, Wheel};

const WHEEL9: usize = 9;

/// `wheels` are the assembled wheels 0-8 at cursor 0. Returns the number of
/// wheel 9 bits recorded.
pub fn learn(text: &KnownText, wheels: &mut [Wheel], learned: &mut [LearnedWheel]) -> Result<usize> {
    let (xor_wheels, gate_wheels) = wheels.split_at_mut(5);
    let mut recorded = 0;

    for (position, pair) in text.iter() {
        let mask = xor_mask(read_bits(xor_wheels));
        let gates: [bool; 4] = read_bits(gate_wheels);

        let Some(pair) = pair else { continue };
        if learned[WHEEL9].slot_at(position).is_known() {
            continue;
        }
        let Some(step) = trace(position, pair, mask)? else {
            continue;
        };
        if let Some(bit) = residual_wheel9(step.origin, step.destination, gates[0]) {
            learned[WHEEL9].record(position, bit)?;
            recorded += 1;
        }
    }
    Ok(recorded)
}
