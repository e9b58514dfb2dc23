//! Attack session: runs the three learning phases over one known text and
//! owns every learned wheel while it does.

use super::assemble::Assembler;
use super::learned::LearnedWheel;
use super::period::PeriodResolver;
use super::text::KnownText;
use super::{permutation, residual, xor_phase};
use crate::wheelset::{PERMUTATION_WHEELS, XOR_WHEELS};
use crate::{AttackConfig, Result, WheelSet, WHEEL_COUNT};

pub struct AttackSession {
    text: KnownText,
    learned: Vec<LearnedWheel>,
}

impl AttackSession {
    pub fn new(text: KnownText, config: &AttackConfig) -> Result<Self> {
        config.validate()?;
        let learned = (0..WHEEL_COUNT)
            .map(|i| Ok(LearnedWheel::new(i, text.len(), &config.initial_candidates(i)?)))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { text, learned })
    }

    pub fn text(&self) -> &KnownText {
        &self.text
    }

    pub fn learned(&self) -> &[LearnedWheel] {
        &self.learned
    }

    pub fn learned_wheel(&self, wheel: usize) -> &LearnedWheel {
        &self.learned[wheel]
    }

    /// Drop contradicted periods and propagate resolved ones
    pub fn resolve(&mut self) -> Result<Vec<bool>> {
        PeriodResolver::resolve(&mut self.learned)
    }

    /// Phase 1: XOR wheels from all-zero and all-one ciphertext
    pub fn learn_xor_wheels(&mut self) -> Result<()> {
        let used = xor_phase::learn(&self.text, &mut self.learned)?;
        let resolved = self.resolve()?;
        tracing::info!(
            "XOR phase: {} positions used, {} wheels resolved",
            used,
            resolved.iter().filter(|&&r| r).count()
        );
        Ok(())
    }

    /// Phase 2: permutation wheels from unique-bit ciphertext
    pub fn learn_permutation_wheels(&mut self) -> Result<()> {
        let mut xor_wheels = Assembler::wheels(&self.learned[XOR_WHEELS])?;
        let used = permutation::learn(&self.text, &mut xor_wheels, &mut self.learned)?;
        let resolved = self.resolve()?;
        tracing::info!(
            "Permutation phase: {} positions used, {} wheels resolved",
            used,
            resolved.iter().filter(|&&r| r).count()
        );
        Ok(())
    }

    /// Phase 3: remaining wheel 9 bits from wheel 5
    pub fn learn_residual(&mut self) -> Result<()> {
        let last = PERMUTATION_WHEELS.end - 1;
        let mut wheels = Assembler::wheels(&self.learned[..last])?;
        wheels.iter_mut().for_each(|w| w.reset());
        let recorded = residual::learn(&self.text, &mut wheels, &mut self.learned)?;
        self.resolve()?;
        tracing::info!("Residual phase: {} wheel {} bits recorded", recorded, last);
        Ok(())
    }

    /// The learned wheel set; fails unless every wheel is resolved and complete
    pub fn assemble(&self) -> Result<WheelSet> {
        Assembler::wheel_set(&self.learned)
    }

    /// Run every phase and assemble the result
    pub fn run(mut self) -> Result<WheelSet> {
        tracing::info!(
            "Learning wheel set from {} positions ({} known)",
            self.text.len(),
            self.text.known()
        );
        self.learn_xor_wheels()?;
        self.learn_permutation_wheels()?;
        self.learn_residual()?;
        let wheels = self.assemble()?;
        tracing::info!("Learned wheel periods {:?}", wheels.periods());
        Ok(wheels)
    }
}
