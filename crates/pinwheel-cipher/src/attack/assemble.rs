//! Turns learned wheels into concrete ones. Slot `k` of the resolved fold
//! becomes bit `k`, so cursor 0 lines up with text position 0.

use super::learned::LearnedWheel;
use crate::{Error, Incomplete, Result, Wheel, WheelSet};

pub struct Assembler;

impl Assembler {
    pub fn wheel(learned: &LearnedWheel) -> Result<Wheel> {
        let period = learned.resolved_period().ok_or_else(|| {
            Error::IncompleteLearning(Incomplete::AmbiguousPeriod {
                wheel: learned.wheel(),
                candidates: learned.candidates(),
            })
        })?;

        let bits = learned
            .fold(period)
            .unwrap_or_default()
            .iter()
            .enumerate()
            .map(|(slot, value)| {
                value.bit().ok_or(Error::IncompleteLearning(Incomplete::UnknownSlot {
                    wheel: learned.wheel(),
                    slot,
                }))
            })
            .collect::<Result<Vec<_>>>()?;
        Wheel::new(bits)
    }

    /// Concrete wheels for a range of roles, e.g. the XOR wheels alone
    pub fn wheels(learned: &[LearnedWheel]) -> Result<Vec<Wheel>> {
        learned.iter().map(Self::wheel).collect()
    }

    pub fn wheel_set(learned: &[LearnedWheel]) -> Result<WheelSet> {
        WheelSet::new(Self::wheels(learned)?)
    }
}
