//! Pinwheel: ten-wheel XOR/transposition cipher
//!
//! A 32-symbol alphabet is encoded as 5-bit codes. Each symbol is XORed with
//! the current bits of five wheels, then put through five conditional
//! adjacent-bit swaps gated by five more wheels. Every wheel advances once per
//! symbol.
//!
//! ```text
//!  plain ─► ⊕ b0..b4 ─► swap(0,4)? ─► swap(0,1)? ─► swap(1,2)? ─► swap(2,3)? ─► swap(3,4)? ─► cipher
//!            wheels 0-4   wheel 5       wheel 6       wheel 7       wheel 8       wheel 9
//! ```
//!
//! # Modules
//! - `alphabet` - Symbol <-> 5-bit code table
//! - `wheel` - Rotating bit sequence with a read cursor
//! - `wheelset` - The ten wheels in their fixed roles
//! - `engine` - Symbol and stream encryption/decryption
//! - `config` - Key settings and attack settings (YAML/JSON)
//! - `attack` - Staged known-plaintext recovery of a wheel set
//! - `analysis` - Transposition probability model, statistical XOR estimator

pub mod alphabet;
pub mod wheel;
pub mod wheelset;
pub mod engine;
pub mod config;
pub mod attack;
pub mod analysis;

pub use alphabet::{decode, encode, Code};
pub use wheel::Wheel;
pub use wheelset::{swap_bits, SwapPair, WheelSet, WHEEL_COUNT};
pub use engine::Cipher;
pub use config::{AttackConfig, KeyConfig, DEFAULT_CATALOG};
pub use attack::{learn_wheel_set, AttackSession, KnownText, LearnedWheel, Slot};
pub use analysis::{TranspositionModel, XorEstimator};

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Symbol {0:?} is not in the alphabet")]
    InvalidSymbol(char),

    #[error("Code {0} is outside the 5-bit alphabet")]
    InvalidCode(u8),

    #[error("Conflicting observation for wheel {wheel} at {}", describe_slot(.slot, .period))]
    Conflict {
        wheel: usize,
        slot: usize,
        period: Option<usize>,
    },

    #[error("Code {code} at position {position} is not a unique-bit pattern")]
    InvalidUniqueBitPattern { position: usize, code: u8 },

    #[error("No swap combination moves bit {origin} to bit {destination} (position {position})")]
    UnreachableTransition {
        position: usize,
        origin: u8,
        destination: u8,
    },

    #[error("Learning incomplete: {0}")]
    IncompleteLearning(Incomplete),

    #[error("Every candidate period was eliminated for wheel {wheel}")]
    PeriodExhausted { wheel: usize },

    #[error("Plaintext has {plaintext} symbols but ciphertext has {ciphertext}")]
    MisalignedText { plaintext: usize, ciphertext: usize },

    #[error("Invalid wheel: {0}")]
    InvalidWheel(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    IoError(String),
}

/// What was still missing when learning stopped
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Incomplete {
    #[error("wheel {wheel} slot {slot} is unknown")]
    UnknownSlot { wheel: usize, slot: usize },

    #[error("wheel {wheel} still has candidate periods {candidates:?}")]
    AmbiguousPeriod { wheel: usize, candidates: Vec<usize> },
}

fn describe_slot(slot: &usize, period: &Option<usize>) -> String {
    match period {
        Some(p) => format!("slot {} of period {}", slot, p),
        None => format!("text position {}", slot),
    }
}

pub type Result<T> = std::result::Result<T, Error>;
