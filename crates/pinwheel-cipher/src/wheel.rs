//! Wheel
//!
//! A fixed bit sequence read through a cursor that advances on every use.
//! The cursor always stays in `0..period`.

use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wheel {
    bits: Vec<bool>,
    start: usize,
    cursor: usize,
}

impl Wheel {
    /// Wheel starting at its first bit
    pub fn new(bits: Vec<bool>) -> Result<Self> {
        Self::with_offset(bits, 0)
    }

    /// Wheel whose cursor starts (and resets) at `offset`
    pub fn with_offset(bits: Vec<bool>, offset: usize) -> Result<Self> {
        if bits.is_empty() {
            return Err(Error::InvalidWheel("wheel has no bits".into()));
        }
        if offset >= bits.len() {
            return Err(Error::InvalidWheel(format!(
                "offset {} is outside a wheel of period {}",
                offset,
                bits.len()
            )));
        }
        Ok(Self {
            bits,
            start: offset,
            cursor: offset,
        })
    }

    /// Period-1 wheel that always reads `bit`
    pub fn constant(bit: bool) -> Self {
        Self {
            bits: vec![bit],
            start: 0,
            cursor: 0,
        }
    }

    /// Parse a wheel from a string of '0'/'1' characters
    pub fn from_bit_str(s: &str, offset: usize) -> Result<Self> {
        let bits = s
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| match c {
                '0' => Ok(false),
                '1' => Ok(true),
                other => Err(Error::InvalidWheel(format!("{:?} is not a bit", other))),
            })
            .collect::<Result<Vec<_>>>()?;
        Self::with_offset(bits, offset)
    }

    pub fn period(&self) -> usize {
        self.bits.len()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn offset(&self) -> usize {
        self.start
    }

    pub fn bits(&self) -> &[bool] {
        &self.bits
    }

    /// Bit under the cursor; advances the cursor
    pub fn read(&mut self) -> bool {
        let bit = self.bits[self.cursor];
        self.tick();
        bit
    }

    /// Advance without reading
    pub fn tick(&mut self) {
        self.cursor = (self.cursor + 1) % self.bits.len();
    }

    /// Back to the starting offset
    pub fn reset(&mut self) {
        self.cursor = self.start;
    }

    /// Bit that will be read after `steps` more advances from the starting offset
    pub fn bit_at(&self, steps: usize) -> bool {
        self.bits[(self.start + steps) % self.bits.len()]
    }

    pub fn to_bit_string(&self) -> String {
        self.bits.iter().map(|&b| if b { '1' } else { '0' }).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_wraps() {
        let mut wheel = Wheel::from_bit_str("101", 0).unwrap();
        let read: Vec<bool> = (0..7).map(|_| wheel.read()).collect();
        assert_eq!(read, vec![true, false, true, true, false, true, true]);
        assert_eq!(wheel.cursor(), 1);
    }

    #[test]
    fn test_tick_matches_read() {
        let mut a = Wheel::from_bit_str("1101001", 2).unwrap();
        let mut b = a.clone();
        for _ in 0..5 {
            a.tick();
            b.read();
        }
        assert_eq!(a.cursor(), b.cursor());
        assert!(a.cursor() < a.period());
    }

    #[test]
    fn test_reset_returns_to_offset() {
        let mut wheel = Wheel::from_bit_str("0011", 3).unwrap();
        assert!(wheel.read());
        assert!(!wheel.read());
        wheel.reset();
        assert_eq!(wheel.cursor(), 3);
    }

    #[test]
    fn test_bit_at_follows_reads() {
        let mut wheel = Wheel::from_bit_str("10010110", 5).unwrap();
        let expected: Vec<bool> = (0..20).map(|i| wheel.bit_at(i)).collect();
        let read: Vec<bool> = (0..20).map(|_| wheel.read()).collect();
        assert_eq!(read, expected);
    }

    #[test]
    fn test_invalid_wheels() {
        assert!(Wheel::new(Vec::new()).is_err());
        assert!(Wheel::from_bit_str("0110", 4).is_err());
        assert!(Wheel::from_bit_str("01x0", 0).is_err());
    }

    #[test]
    fn test_bit_string_roundtrip() {
        let wheel = Wheel::from_bit_str("1100 0101", 0).unwrap();
        assert_eq!(wheel.to_bit_string(), "11000101");
    }
}
