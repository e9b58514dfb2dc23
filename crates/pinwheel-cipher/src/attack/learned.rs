//! Learned wheel state
//!
//! Observations are kept by absolute text position, and folded into one
//! array of slots per live candidate period. A fold that receives two
//! different values for one slot is contradicted; the period resolver
//! removes it.

use crate::{Error, Result};
use std::collections::BTreeMap;

/// What is known about one wheel bit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Slot {
    #[default]
    Unknown,
    Zero,
    One,
}

impl Slot {
    pub fn from_bit(bit: bool) -> Self {
        if bit {
            Slot::One
        } else {
            Slot::Zero
        }
    }

    pub fn bit(&self) -> Option<bool> {
        match self {
            Slot::Unknown => None,
            Slot::Zero => Some(false),
            Slot::One => Some(true),
        }
    }

    pub fn is_known(&self) -> bool {
        *self != Slot::Unknown
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Fold {
    slots: Vec<Slot>,
    contradicted: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LearnedWheel {
    wheel: usize,
    observed: Vec<Slot>,
    folds: BTreeMap<usize, Fold>,
}

impl LearnedWheel {
    /// Nothing observed yet over `text_len` positions
    pub fn new(wheel: usize, text_len: usize, candidates: &[usize]) -> Self {
        let folds = candidates
            .iter()
            .map(|&p| {
                (
                    p,
                    Fold {
                        slots: vec![Slot::Unknown; p],
                        contradicted: false,
                    },
                )
            })
            .collect();
        Self {
            wheel,
            observed: vec![Slot::Unknown; text_len],
            folds,
        }
    }

    /// Rebuild from absolute observations, e.g. to re-run period inference
    pub fn from_observations(wheel: usize, observed: &[Slot], candidates: &[usize]) -> Result<Self> {
        let mut learned = Self::new(wheel, observed.len(), candidates);
        for (position, slot) in observed.iter().enumerate() {
            if let Some(bit) = slot.bit() {
                learned.record(position, bit)?;
            }
        }
        Ok(learned)
    }

    pub fn wheel(&self) -> usize {
        self.wheel
    }

    pub fn text_len(&self) -> usize {
        self.observed.len()
    }

    /// Record the wheel's bit at an absolute text position
    pub fn record(&mut self, position: usize, bit: bool) -> Result<()> {
        if position >= self.observed.len() {
            return Err(Error::InvalidWheel(format!(
                "position {} is past the end of a {}-symbol text",
                position,
                self.observed.len()
            )));
        }
        let value = Slot::from_bit(bit);
        match self.observed[position] {
            Slot::Unknown => self.observed[position] = value,
            existing if existing == value => return Ok(()),
            _ => {
                return Err(Error::Conflict {
                    wheel: self.wheel,
                    slot: position,
                    period: None,
                })
            }
        }

        let live = self.live_candidates().count();
        for (&period, fold) in self.folds.iter_mut().filter(|(_, f)| !f.contradicted) {
            let slot = position % period;
            match fold.slots[slot] {
                Slot::Unknown => fold.slots[slot] = value,
                existing if existing == value => {}
                _ if live == 1 => {
                    return Err(Error::Conflict {
                        wheel: self.wheel,
                        slot,
                        period: Some(period),
                    })
                }
                _ => {
                    tracing::debug!(
                        "wheel {}: position {} contradicts period {}",
                        self.wheel,
                        position,
                        period
                    );
                    fold.contradicted = true;
                }
            }
        }
        Ok(())
    }

    /// Observation at an absolute position; unknown past the end of the text
    pub fn observed(&self, position: usize) -> Slot {
        self.observed.get(position).copied().unwrap_or_default()
    }

    pub fn observations(&self) -> &[Slot] {
        &self.observed
    }

    /// Candidate periods not yet eliminated (contradicted ones included until
    /// the resolver removes them)
    pub fn candidates(&self) -> Vec<usize> {
        self.folds.keys().copied().collect()
    }

    fn live_candidates(&self) -> impl Iterator<Item = usize> + '_ {
        self.folds
            .iter()
            .filter(|(_, f)| !f.contradicted)
            .map(|(&p, _)| p)
    }

    pub fn contradicted(&self) -> Vec<usize> {
        self.folds
            .iter()
            .filter(|(_, f)| f.contradicted)
            .map(|(&p, _)| p)
            .collect()
    }

    /// Drop a candidate period; true if it was present
    pub fn eliminate(&mut self, period: usize) -> bool {
        self.folds.remove(&period).is_some()
    }

    /// The single remaining period, if the candidate set has collapsed
    pub fn resolved_period(&self) -> Option<usize> {
        if self.folds.len() == 1 {
            self.folds.keys().next().copied()
        } else {
            None
        }
    }

    /// Slots of a candidate period's fold
    pub fn fold(&self, period: usize) -> Option<&[Slot]> {
        self.folds.get(&period).map(|f| f.slots.as_slice())
    }

    /// Best knowledge of the bit at a text position: the resolved fold when
    /// the period is known, otherwise the raw observation
    pub fn slot_at(&self, position: usize) -> Slot {
        match self.resolved_period().and_then(|p| self.fold(p).map(|f| (p, f))) {
            Some((period, fold)) => fold[position % period],
            None => self.observed(position),
        }
    }

    /// Unknown slots of the resolved fold (empty if unresolved)
    pub fn unknown_slots(&self) -> Vec<usize> {
        self.resolved_period()
            .and_then(|p| self.fold(p))
            .map(|fold| {
                fold.iter()
                    .enumerate()
                    .filter(|(_, s)| !s.is_known())
                    .map(|(i, _)| i)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Period resolved and every slot known
    pub fn is_complete(&self) -> bool {
        self.resolved_period().is_some() && self.unknown_slots().is_empty()
    }
}
