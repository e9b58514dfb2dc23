//! Cipher Engine
//!
//! A `Cipher` owns its wheel set; every symbol consumes exactly ten wheel
//! reads. Decrypting requires a wheel set positioned where the encrypting one
//! was for the same symbol.

use crate::alphabet::{self, Code};
use crate::wheelset::{permute, unpermute, xor_mask};
use crate::{Result, WheelSet};

/// One cipher session
#[derive(Debug, Clone)]
pub struct Cipher {
    wheels: WheelSet,
}

impl Cipher {
    pub fn new(wheels: WheelSet) -> Self {
        Self { wheels }
    }

    pub fn wheels(&self) -> &WheelSet {
        &self.wheels
    }

    pub fn into_wheels(self) -> WheelSet {
        self.wheels
    }

    /// Rewind every wheel to its starting offset
    pub fn reset(&mut self) {
        self.wheels.reset();
    }

    pub fn encrypt_code(&mut self, code: Code) -> Code {
        let masked = code ^ xor_mask(self.wheels.read_xor_bits());
        permute(masked, self.wheels.read_gate_bits())
    }

    pub fn decrypt_code(&mut self, code: Code) -> Code {
        // same read order as encryption: XOR wheels first, then gates
        let mask = xor_mask(self.wheels.read_xor_bits());
        unpermute(code, self.wheels.read_gate_bits()) ^ mask
    }

    pub fn encrypt_symbol(&mut self, symbol: char) -> Result<char> {
        let code = alphabet::encode(symbol)?;
        let encrypted = self.encrypt_code(code);
        alphabet::decode(encrypted)
    }

    pub fn decrypt_symbol(&mut self, symbol: char) -> Result<char> {
        let code = alphabet::encode(symbol)?;
        let decrypted = self.decrypt_code(code);
        alphabet::decode(decrypted)
    }

    /// Encrypt a whole message. Line breaks pass through; any other symbol
    /// outside the alphabet fails before a single wheel moves.
    pub fn encrypt_stream(&mut self, plaintext: &str) -> Result<String> {
        self.stream(plaintext, Self::encrypt_code)
    }

    /// Decrypt a whole message, same rules as `encrypt_stream`
    pub fn decrypt_stream(&mut self, ciphertext: &str) -> Result<String> {
        self.stream(ciphertext, Self::decrypt_code)
    }

    fn stream(&mut self, input: &str, step: fn(&mut Self, Code) -> Code) -> Result<String> {
        let items = input
            .chars()
            .map(|c| {
                if alphabet::is_line_break(c) {
                    Ok(StreamItem::LineBreak(c))
                } else {
                    alphabet::encode(c).map(StreamItem::Code)
                }
            })
            .collect::<Result<Vec<_>>>()?;

        let mut output = String::with_capacity(items.len());
        for item in items {
            match item {
                StreamItem::LineBreak(c) => output.push(c),
                StreamItem::Code(code) => output.push(alphabet::decode(step(self, code))?),
            }
        }
        Ok(output)
    }
}

enum StreamItem {
    LineBreak(char),
    Code(Code),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Error, KeyConfig, WHEEL_COUNT};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn reference_cipher() -> Cipher {
        Cipher::new(KeyConfig::reference().build().unwrap())
    }

    #[test]
    fn test_all_zero_set_is_identity() {
        let mut cipher = Cipher::new(WheelSet::constant([false; WHEEL_COUNT]));
        assert_eq!(cipher.encrypt_symbol('A').unwrap(), 'A');
    }

    #[test]
    fn test_first_xor_wheel_flips_msb() {
        let mut bits = [false; WHEEL_COUNT];
        bits[0] = true;
        let mut cipher = Cipher::new(WheelSet::constant(bits));
        // A = 11000 -> 01000 = 5
        assert_eq!(cipher.encrypt_symbol('A').unwrap(), '5');
    }

    #[test]
    fn test_wrap_swap() {
        let mut bits = [false; WHEEL_COUNT];
        bits[5] = true;
        let mut cipher = Cipher::new(WheelSet::constant(bits));
        // E = 10000 -> 00001 = T
        assert_eq!(cipher.encrypt_symbol('E').unwrap(), 'T');
        assert_eq!(cipher.decrypt_symbol('T').unwrap(), 'E');
    }

    #[test]
    fn test_stream_roundtrip() {
        let mut rng = StdRng::seed_from_u64(11);
        let plaintext: String = (0..500)
            .map(|i| {
                if i % 60 == 59 {
                    '\n'
                } else {
                    crate::alphabet::SYMBOLS[rng.gen_range(0..32)]
                }
            })
            .collect();

        let ciphertext = reference_cipher().encrypt_stream(&plaintext).unwrap();
        assert_ne!(ciphertext, plaintext);
        assert_eq!(ciphertext.matches('\n').count(), plaintext.matches('\n').count());

        let recovered = reference_cipher().decrypt_stream(&ciphertext).unwrap();
        assert_eq!(recovered, plaintext);
    }

    #[test]
    fn test_line_breaks_consume_no_reads() {
        let mut a = reference_cipher();
        let mut b = reference_cipher();
        let with_breaks = a.encrypt_stream("UMUM\r\n4VEVE").unwrap();
        let without = b.encrypt_stream("UMUM4VEVE").unwrap();
        assert_eq!(with_breaks.replace("\r\n", ""), without);
        assert_eq!(a.wheels(), b.wheels());
    }

    #[test]
    fn test_invalid_symbol_aborts_without_moving_wheels() {
        let mut cipher = reference_cipher();
        let before = cipher.wheels().clone();
        let result = cipher.encrypt_stream("KING HENRY");
        assert_eq!(result, Err(Error::InvalidSymbol(' ')));
        assert_eq!(cipher.wheels(), &before);
    }

    #[test]
    fn test_desynchronized_decrypt_is_garbage_not_error() {
        let plaintext = "UMUM4VEVE35KING4HENRY4IV35UMUM4VEVE";
        let ciphertext = reference_cipher().encrypt_stream(plaintext).unwrap();

        let mut shifted = reference_cipher();
        shifted.encrypt_symbol('2').unwrap();
        let garbage = shifted.decrypt_stream(&ciphertext).unwrap();
        assert_ne!(garbage, plaintext);
    }

    #[test]
    fn test_reset_replays_stream() {
        let mut cipher = reference_cipher();
        let first = cipher.encrypt_stream("KING4HENRY").unwrap();
        cipher.reset();
        assert_eq!(cipher.encrypt_stream("KING4HENRY").unwrap(), first);
    }

    #[test]
    fn test_into_wheels_keeps_cursors() {
        let mut expected = KeyConfig::reference().build().unwrap();
        let mut cipher = Cipher::new(expected.clone());
        cipher.encrypt_stream("UM\nUM").unwrap();
        for _ in 0..4 {
            expected.tick_all();
        }
        assert_eq!(cipher.into_wheels(), expected);
    }
}
