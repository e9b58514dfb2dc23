//! Inference tables for the permutation stage
//!
//! A unique-bit code has exactly one bit that differs from the other four.
//! The permutation stage only moves bits around, so that odd bit travels from
//! a source position in the intermediate code to a destination position in
//! the ciphertext, and the route it took pins down some of the gate bits.

use super::learned::Slot;
use crate::alphabet::Code;

/// The odd bit of a unique-bit code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UniqueBit {
    /// Position from the MSB (0..5)
    pub position: u8,
    /// `true` for a lone one among zeros, `false` for a lone zero
    pub polarity: bool,
}

/// Classify a code as a unique-bit pattern
pub fn unique_bit(code: Code) -> Option<UniqueBit> {
    let code = code & 0b11111;
    match code.count_ones() {
        1 => Some(UniqueBit {
            position: 4 - code.trailing_zeros() as u8,
            polarity: true,
        }),
        4 => Some(UniqueBit {
            position: 4 - (!code & 0b11111).trailing_zeros() as u8,
            polarity: false,
        }),
        _ => None,
    }
}

const U: Slot = Slot::Unknown;
const Z: Slot = Slot::Zero;
const I: Slot = Slot::One;

/// Gate bits of wheels 5..9 implied by an odd bit moving `[source][destination]`.
/// `None` marks moves no gate combination can produce.
pub const TRANSPOSITION_TABLE: [[Option<[Slot; 5]>; 5]; 5] = [
    [
        Some([Z, Z, U, U, U]),
        Some([Z, I, Z, U, U]),
        Some([Z, I, I, Z, U]),
        Some([U, U, U, U, U]),
        Some([U, U, U, U, U]),
    ],
    [
        Some([U, I, U, U, U]),
        Some([U, Z, Z, U, U]),
        Some([U, Z, I, Z, U]),
        Some([U, Z, I, I, Z]),
        Some([U, Z, I, I, I]),
    ],
    [
        None,
        Some([U, U, I, U, U]),
        Some([U, U, Z, Z, U]),
        Some([U, U, Z, I, Z]),
        Some([U, U, Z, I, I]),
    ],
    [
        None,
        None,
        Some([U, U, U, I, U]),
        Some([U, U, U, Z, Z]),
        Some([U, U, U, Z, I]),
    ],
    [
        Some([I, Z, U, U, U]),
        Some([I, I, Z, U, U]),
        Some([I, I, I, Z, U]),
        Some([U, U, U, U, U]),
        Some([U, U, U, U, U]),
    ],
];

pub fn transition(source: u8, destination: u8) -> Option<[Slot; 5]> {
    TRANSPOSITION_TABLE
        .get(source as usize)
        .and_then(|row| row.get(destination as usize))
        .copied()
        .flatten()
}

/// Wheel 9's bit given wheel 5's, for the four moves where the two are tied.
///
/// An odd bit from position 0 or 4 reaches position 3 or 4 either with wheel 5
/// clear or after the wrap swap carried it across; wheel 9 decides the final
/// hop either way.
pub fn residual_wheel9(source: u8, destination: u8, wheel5: bool) -> Option<bool> {
    match (source, destination) {
        (0, 4) | (4, 3) => Some(!wheel5),
        (4, 4) | (0, 3) => Some(wheel5),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wheelset::{bit_mask, permute};

    fn all_gates() -> impl Iterator<Item = [bool; 5]> {
        (0..32u8).map(|g| std::array::from_fn(|i| g & (1 << i) != 0))
    }

    #[test]
    fn test_unique_bit_codes() {
        for (position, (one, zero)) in [(16, 15), (8, 23), (4, 27), (2, 29), (1, 30)].into_iter().enumerate() {
            let position = position as u8;
            assert_eq!(unique_bit(one), Some(UniqueBit { position, polarity: true }));
            assert_eq!(unique_bit(zero), Some(UniqueBit { position, polarity: false }));
        }
        assert_eq!(unique_bit(0), None);
        assert_eq!(unique_bit(31), None);
        assert_eq!(unique_bit(3), None);
        assert_eq!(unique_bit(28), None);
    }

    #[test]
    fn test_complements_share_position() {
        let one = unique_bit(1).unwrap();
        let zero = unique_bit(30).unwrap();
        assert_eq!(one.position, 4);
        assert_eq!(zero.position, 4);
        assert_ne!(one.polarity, zero.polarity);
    }

    #[test]
    fn test_permutation_preserves_unique_bits() {
        for code in (0..32u8).filter(|&c| unique_bit(c).is_some()) {
            let polarity = unique_bit(code).unwrap().polarity;
            for gates in all_gates() {
                let moved = unique_bit(permute(code, gates)).unwrap();
                assert_eq!(moved.polarity, polarity);
            }
        }
    }

    #[test]
    fn test_table_matches_enumeration() {
        for source in 0..5u8 {
            for destination in 0..5u8 {
                let routes: Vec<[bool; 5]> = all_gates()
                    .filter(|&g| permute(bit_mask(source), g) == bit_mask(destination))
                    .collect();

                let expected: Option<[Slot; 5]> = if routes.is_empty() {
                    None
                } else {
                    Some(std::array::from_fn(|w| {
                        let first = routes[0][w];
                        if routes.iter().all(|r| r[w] == first) {
                            Slot::from_bit(first)
                        } else {
                            Slot::Unknown
                        }
                    }))
                };
                assert_eq!(transition(source, destination), expected, "{} -> {}", source, destination);
            }
        }
    }

    #[test]
    fn test_residual_matches_enumeration() {
        for source in 0..5u8 {
            for destination in 0..5u8 {
                for gates in all_gates().filter(|&g| permute(bit_mask(source), g) == bit_mask(destination)) {
                    if let Some(bit) = residual_wheel9(source, destination, gates[0]) {
                        assert_eq!(bit, gates[4], "{} -> {} via {:?}", source, destination, gates);
                    }
                }
            }
        }
        assert_eq!(residual_wheel9(1, 4, true), None);
        assert_eq!(residual_wheel9(0, 2, true), None);
    }

    #[test]
    fn test_out_of_range_transition() {
        assert_eq!(transition(5, 0), None);
        assert_eq!(transition(0, 7), None);
    }
}
