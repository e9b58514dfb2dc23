//! Statistical Analysis
//!
//! Probability model of the permutation stage and a statistical estimator for
//! XOR wheel bits built on it. Useful when the text is too short for the exact
//! attack to finish.

use crate::attack::KnownText;
use crate::wheelset::{bit_mask, permute, XOR_WHEELS};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// P(bit at source position lands at destination position) for uniformly
/// random permutation wheel bits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranspositionModel {
    probabilities: [[f64; 5]; 5],
}

impl TranspositionModel {
    /// Count all 32 gate combinations
    pub fn exact() -> Self {
        let mut probabilities = [[0.0; 5]; 5];
        for gates in 0..32u8 {
            let gates: [bool; 5] = std::array::from_fn(|i| gates & (1 << i) != 0);
            for (source, row) in probabilities.iter_mut().enumerate() {
                let moved = permute(bit_mask(source as u8), gates);
                let destination = moved.leading_zeros() as usize - 3;
                row[destination] += 1.0 / 32.0;
            }
        }
        Self { probabilities }
    }

    pub fn probability(&self, source: usize, destination: usize) -> f64 {
        self.probabilities[source][destination]
    }

    pub fn row(&self, source: usize) -> &[f64; 5] {
        &self.probabilities[source]
    }
}

impl Default for TranspositionModel {
    fn default() -> Self {
        Self::exact()
    }
}

impl fmt::Display for TranspositionModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "src\\dst       0        1        2        3        4")?;
        for (source, row) in self.probabilities.iter().enumerate() {
            write!(f, "   {}   ", source)?;
            for p in row {
                write!(f, " {:.5}", p)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Weighted-evidence estimator for XOR wheel bits
#[derive(Debug, Clone)]
pub struct XorEstimator {
    model: TranspositionModel,
    threshold: f64,
}

impl Default for XorEstimator {
    fn default() -> Self {
        Self::new(0.1)
    }
}

impl XorEstimator {
    /// `threshold` is the minimum mean evidence for a slot to be reported
    pub fn new(threshold: f64) -> Self {
        Self {
            model: TranspositionModel::exact(),
            threshold,
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Mean evidence per slot of `wheel` under `period`, `None` where the text
    /// has nothing. Positive favours bit 0, negative bit 1.
    ///
    /// The wheel's bit leaves the XOR stage at its own position and lands on
    /// ciphertext bit `d` with the model's probability; each ciphertext bit
    /// that agrees with the plaintext bit counts for 0 with that weight.
    pub fn scores(&self, text: &KnownText, wheel: usize, period: usize) -> Result<Vec<Option<f64>>> {
        if !XOR_WHEELS.contains(&wheel) {
            return Err(Error::InvalidWheel(format!("wheel {} is not an XOR wheel", wheel)));
        }
        if period == 0 {
            return Err(Error::InvalidWheel("period must be non-zero".into()));
        }

        let weights = self.model.row(wheel);
        let plain_mask = bit_mask(wheel as u8);
        let mut totals = vec![0.0; period];
        let mut counts = vec![0usize; period];

        for (position, pair) in text.iter() {
            let Some(pair) = pair else { continue };
            let plain_bit = pair.plain & plain_mask != 0;
            let evidence: f64 = (0..5u8)
                .map(|d| {
                    let cipher_bit = pair.cipher & bit_mask(d) != 0;
                    let w = weights[d as usize];
                    if cipher_bit == plain_bit {
                        w
                    } else {
                        -w
                    }
                })
                .sum();
            totals[position % period] += evidence;
            counts[position % period] += 1;
        }

        Ok(totals
            .into_iter()
            .zip(counts)
            .map(|(total, count)| (count > 0).then(|| total / count as f64))
            .collect())
    }

    /// Estimated bit per slot where the evidence clears the threshold
    pub fn estimate(&self, text: &KnownText, wheel: usize, period: usize) -> Result<Vec<Option<bool>>> {
        let estimate: Vec<Option<bool>> = self
            .scores(text, wheel, period)?
            .into_iter()
            .map(|score| match score {
                Some(s) if s >= self.threshold => Some(false),
                Some(s) if s <= -self.threshold => Some(true),
                _ => None,
            })
            .collect();
        tracing::debug!(
            "wheel {} period {}: {} of {} slots estimated",
            wheel,
            period,
            estimate.iter().filter(|b| b.is_some()).count(),
            period
        );
        Ok(estimate)
    }
}
