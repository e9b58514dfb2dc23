//! WheelSet
//!
//! Ten wheels in fixed roles:
//!
//! ```text
//! wheel  0   1   2   3   4  │  5      6      7      8      9
//! role   ⊕16 ⊕8  ⊕4  ⊕2  ⊕1 │  (0,4) (0,1)  (1,2)  (2,3)  (3,4)
//!        XOR stage          │  permutation stage (swap if bit = 1)
//! ```
//!
//! Bit positions count from the most significant bit: position 0 has weight 16.

use crate::alphabet::Code;
use crate::{Error, Result, Wheel};
use std::ops::Range;

pub const WHEEL_COUNT: usize = 10;

/// Wheels whose bits XOR the code
pub const XOR_WHEELS: Range<usize> = 0..5;

/// Wheels whose bits gate an adjacent-bit swap
pub const PERMUTATION_WHEELS: Range<usize> = 5..10;

/// The five swaps of the permutation stage, in application order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SwapPair {
    /// Wheel 5: outermost bits
    Wrap04,
    /// Wheel 6
    Swap01,
    /// Wheel 7
    Swap12,
    /// Wheel 8
    Swap23,
    /// Wheel 9
    Swap34,
}

impl SwapPair {
    pub const ALL: [SwapPair; 5] = [
        SwapPair::Wrap04,
        SwapPair::Swap01,
        SwapPair::Swap12,
        SwapPair::Swap23,
        SwapPair::Swap34,
    ];

    /// Bit positions (from the MSB) exchanged by this swap, lower first
    pub fn positions(&self) -> (u8, u8) {
        match self {
            SwapPair::Wrap04 => (0, 4),
            SwapPair::Swap01 => (0, 1),
            SwapPair::Swap12 => (1, 2),
            SwapPair::Swap23 => (2, 3),
            SwapPair::Swap34 => (3, 4),
        }
    }

    /// Wheel that gates this swap
    pub fn wheel(&self) -> usize {
        PERMUTATION_WHEELS.start + *self as usize
    }

    /// Swap gated by a permutation wheel
    pub fn for_wheel(wheel: usize) -> Option<SwapPair> {
        wheel
            .checked_sub(PERMUTATION_WHEELS.start)
            .and_then(|i| Self::ALL.get(i).copied())
    }
}

/// Weight of the bit at `position` (from the MSB)
pub fn bit_mask(position: u8) -> Code {
    0b10000 >> position
}

/// Exchange the two bits named by `pair`
pub fn swap_bits(code: Code, pair: SwapPair) -> Code {
    let (i, j) = pair.positions();
    let (mi, mj) = (bit_mask(i), bit_mask(j));
    let bi = code & mi != 0;
    let bj = code & mj != 0;
    if bi == bj {
        return code;
    }
    code ^ mi ^ mj
}

/// Apply the permutation stage for the given gate bits (wheels 5..9 in order)
pub fn permute(mut code: Code, gates: [bool; 5]) -> Code {
    for (pair, gate) in SwapPair::ALL.iter().zip(gates) {
        if gate {
            code = swap_bits(code, *pair);
        }
    }
    code
}

/// Undo `permute` for the same gate bits
pub fn unpermute(mut code: Code, gates: [bool; 5]) -> Code {
    for (pair, gate) in SwapPair::ALL.iter().zip(gates).rev() {
        if gate {
            code = swap_bits(code, *pair);
        }
    }
    code
}

/// XOR mask for the five XOR-wheel bits (wheel 0 is the MSB)
pub fn xor_mask(bits: [bool; 5]) -> Code {
    let mut mask = 0;
    for (i, bit) in bits.into_iter().enumerate() {
        if bit {
            mask |= bit_mask(i as u8);
        }
    }
    mask
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WheelSet {
    wheels: Vec<Wheel>,
}

impl WheelSet {
    pub fn new(wheels: Vec<Wheel>) -> Result<Self> {
        if wheels.len() != WHEEL_COUNT {
            return Err(Error::InvalidWheel(format!(
                "a wheel set needs {} wheels, got {}",
                WHEEL_COUNT,
                wheels.len()
            )));
        }
        Ok(Self { wheels })
    }

    /// Every wheel fixed at a single bit
    pub fn constant(bits: [bool; WHEEL_COUNT]) -> Self {
        let wheels = bits.iter().map(|&b| Wheel::constant(b)).collect();
        Self { wheels }
    }

    pub fn wheel(&self, index: usize) -> &Wheel {
        &self.wheels[index]
    }

    pub fn wheels(&self) -> &[Wheel] {
        &self.wheels
    }

    pub fn periods(&self) -> Vec<usize> {
        self.wheels.iter().map(Wheel::period).collect()
    }

    /// Every cursor back to its starting offset
    pub fn reset(&mut self) {
        self.wheels.iter_mut().for_each(Wheel::reset);
    }

    /// Advance every wheel one step without reading
    pub fn tick_all(&mut self) {
        self.wheels.iter_mut().for_each(Wheel::tick);
    }

    /// Read the five XOR wheels (one step each)
    pub fn read_xor_bits(&mut self) -> [bool; 5] {
        let mut bits = [false; 5];
        for (bit, wheel) in bits.iter_mut().zip(&mut self.wheels[XOR_WHEELS]) {
            *bit = wheel.read();
        }
        bits
    }

    /// Read the five permutation wheels (one step each)
    pub fn read_gate_bits(&mut self) -> [bool; 5] {
        let mut bits = [false; 5];
        for (bit, wheel) in bits.iter_mut().zip(&mut self.wheels[PERMUTATION_WHEELS]) {
            *bit = wheel.read();
        }
        bits
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_swap_involution() {
        for pair in SwapPair::ALL {
            for code in 0..32u8 {
                assert_eq!(swap_bits(swap_bits(code, pair), pair), code, "{:?} {}", pair, code);
            }
        }
    }

    #[test]
    fn test_swap_positions() {
        // 10000 with (0,4) -> 00001
        assert_eq!(swap_bits(0b10000, SwapPair::Wrap04), 0b00001);
        // 01000 with (0,1) -> 10000
        assert_eq!(swap_bits(0b01000, SwapPair::Swap01), 0b10000);
        // 00010 with (3,4) -> 00001
        assert_eq!(swap_bits(0b00010, SwapPair::Swap34), 0b00001);
        // equal bits are untouched
        assert_eq!(swap_bits(0b00011, SwapPair::Swap34), 0b00011);
    }

    #[test]
    fn test_unpermute_inverts_permute() {
        for gates in 0..32u8 {
            let gates: [bool; 5] = std::array::from_fn(|i| gates & (1 << i) != 0);
            for code in 0..32u8 {
                assert_eq!(unpermute(permute(code, gates), gates), code);
            }
        }
    }

    #[test]
    fn test_xor_order_independent() {
        let bits = [true, false, true, true, false];
        let forward = (0..5).fold(24u8, |c, i| if bits[i] { c ^ bit_mask(i as u8) } else { c });
        let backward = (0..5).rev().fold(24u8, |c, i| if bits[i] { c ^ bit_mask(i as u8) } else { c });
        assert_eq!(forward, backward);
        assert_eq!(forward, 24 ^ xor_mask(bits));
    }

    #[test]
    fn test_xor_mask_msb_first() {
        assert_eq!(xor_mask([true, false, false, false, false]), 16);
        assert_eq!(xor_mask([false, false, false, false, true]), 1);
    }

    #[test]
    fn test_swap_pair_wheels() {
        assert_eq!(SwapPair::Wrap04.wheel(), 5);
        assert_eq!(SwapPair::Swap34.wheel(), 9);
        assert_eq!(SwapPair::for_wheel(7), Some(SwapPair::Swap12));
        assert_eq!(SwapPair::for_wheel(4), None);
        assert_eq!(SwapPair::for_wheel(10), None);
    }

    #[test]
    fn test_wheel_count_enforced() {
        let wheels = vec![Wheel::from_bit_str("1", 0).unwrap(); 9];
        assert!(WheelSet::new(wheels).is_err());
    }

    #[test]
    fn test_lockstep_reads() {
        let mut set = WheelSet::new(
            (0..WHEEL_COUNT)
                .map(|i| Wheel::from_bit_str(&"01".repeat(i + 1), 0).unwrap())
                .collect(),
        )
        .unwrap();
        set.read_xor_bits();
        set.read_gate_bits();
        assert!(set.wheels().iter().all(|w| w.cursor() == 1));
        set.tick_all();
        assert!(set.wheels().iter().all(|w| w.cursor() == 2 % w.period()));
        set.reset();
        assert!(set.wheels().iter().all(|w| w.cursor() == 0));
    }
}
