//! Period resolution
//!
//! Every wheel starts with a set of candidate periods. Contradicted candidates
//! are dropped, and a period claimed by a resolved wheel is removed from every
//! other wheel until nothing changes.

use super::learned::LearnedWheel;
use crate::{Error, Result};

pub struct PeriodResolver;

impl PeriodResolver {
    /// Run one resolution pass. Returns, per wheel, whether its period is now
    /// known.
    pub fn resolve(learned: &mut [LearnedWheel]) -> Result<Vec<bool>> {
        let mut worklist = Vec::new();

        for (index, wheel) in learned.iter_mut().enumerate() {
            for period in wheel.contradicted() {
                tracing::debug!("wheel {}: eliminating contradicted period {}", index, period);
                wheel.eliminate(period);
            }
            if wheel.candidates().is_empty() {
                return Err(Error::PeriodExhausted { wheel: index });
            }
            if wheel.resolved_period().is_some() {
                worklist.push(index);
            }
        }

        while let Some(owner) = worklist.pop() {
            let Some(period) = learned[owner].resolved_period() else {
                continue;
            };
            for (index, wheel) in learned.iter_mut().enumerate() {
                if index == owner || !wheel.eliminate(period) {
                    continue;
                }
                tracing::debug!("wheel {}: period {} taken by wheel {}", index, period, owner);
                if wheel.candidates().is_empty() {
                    return Err(Error::PeriodExhausted { wheel: index });
                }
                if wheel.resolved_period().is_some() {
                    worklist.push(index);
                }
            }
        }

        Ok(learned.iter().map(|w| w.resolved_period().is_some()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attack::learned::Slot;
    use crate::{KeyConfig, DEFAULT_CATALOG, WHEEL_COUNT};

    #[test]
    fn test_propagation_chain() {
        // wheel 0 resolves by contradiction, the rest cascade
        let mut learned = vec![
            LearnedWheel::new(0, 10, &[2, 3]),
            LearnedWheel::new(1, 10, &[2, 3, 5]),
            LearnedWheel::new(2, 10, &[3, 5]),
        ];
        learned[0].record(0, true).unwrap();
        learned[0].record(3, false).unwrap();

        let resolved = PeriodResolver::resolve(&mut learned).unwrap();
        assert_eq!(resolved, vec![true, false, false]);
        assert_eq!(learned[0].resolved_period(), Some(2));
        assert_eq!(learned[1].candidates(), vec![3, 5]);

        learned[2].eliminate(5);
        let resolved = PeriodResolver::resolve(&mut learned).unwrap();
        assert_eq!(resolved, vec![true, true, true]);
        assert_eq!(learned[1].resolved_period(), Some(5));
    }

    #[test]
    fn test_exhausted_by_propagation() {
        let mut learned = vec![LearnedWheel::new(0, 4, &[2]), LearnedWheel::new(1, 4, &[2])];
        assert!(matches!(
            PeriodResolver::resolve(&mut learned),
            Err(Error::PeriodExhausted { .. })
        ));
    }

    #[test]
    fn test_exhausted_by_contradiction() {
        let mut learned = vec![LearnedWheel::new(0, 8, &[2, 3])];
        learned[0].record(0, true).unwrap();
        // position 6 folds onto slot 0 of both candidates
        learned[0].record(6, false).unwrap();
        assert_eq!(
            PeriodResolver::resolve(&mut learned),
            Err(Error::PeriodExhausted { wheel: 0 })
        );
    }

    #[test]
    fn test_full_observations_resolve_deterministically() {
        let set = KeyConfig::reference().build().unwrap();
        let length = 147;

        let run = || {
            let mut learned: Vec<LearnedWheel> = (0..WHEEL_COUNT)
                .map(|i| {
                    let wheel = set.wheel(i);
                    let observed: Vec<Slot> = (0..length)
                        .map(|n| Slot::from_bit(wheel.bit_at(n)))
                        .collect();
                    LearnedWheel::from_observations(i, &observed, &DEFAULT_CATALOG).unwrap()
                })
                .collect();
            PeriodResolver::resolve(&mut learned).unwrap();
            learned
                .iter()
                .map(|w| w.resolved_period())
                .collect::<Vec<_>>()
        };

        let first = run();
        assert_eq!(first, run());
        let expected: Vec<Option<usize>> = set.periods().into_iter().map(Some).collect();
        assert_eq!(first, expected);
    }
}
