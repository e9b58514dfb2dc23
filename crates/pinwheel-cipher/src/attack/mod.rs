//! Known-plaintext attack
//!
//! Recovers a complete wheel set, periods included, from aligned plaintext and
//! ciphertext in three phases:
//!
//! 1. XOR wheels, wherever the ciphertext is all zeros or all ones
//! 2. permutation wheels, wherever the ciphertext is a unique-bit code
//! 3. leftover wheel 9 bits, from wheel 5's now known bits
//!
//! Candidate periods are narrowed after each phase. Nothing is guessed: a slot
//! the text never reveals is an error.

pub mod assemble;
pub mod learned;
pub mod period;
pub mod permutation;
pub mod residual;
pub mod session;
pub mod tables;
pub mod text;
pub mod xor_phase;

pub use assemble::Assembler;
pub use learned::{LearnedWheel, Slot};
pub use period::PeriodResolver;
pub use session::AttackSession;
pub use text::{KnownText, Pair};

use crate::{AttackConfig, Result, WheelSet};

/// Learn the wheel set that turned `plaintext` into `ciphertext`.
///
/// Line breaks are ignored on both sides and `-` marks an unknown position.
/// The returned wheels sit at the cursor for the first symbol.
pub fn learn_wheel_set(plaintext: &str, ciphertext: &str, config: &AttackConfig) -> Result<WheelSet> {
    let text = KnownText::align(plaintext, ciphertext)?;
    AttackSession::new(text, config)?.run()
}
