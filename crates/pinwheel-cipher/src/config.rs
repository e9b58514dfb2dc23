//! Key and Attack Settings
//!
//! A key is a bank of wheel bit strings, the order in which bank wheels fill
//! the ten roles, and the starting offset of each role. Settings load from
//! YAML (`.yaml`/`.yml`) or JSON (anything else).

use crate::wheelset::WHEEL_COUNT;
use crate::{Error, Result, Wheel, WheelSet};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::path::Path;

/// Candidate wheel periods, one per wheel
pub const DEFAULT_CATALOG: [usize; WHEEL_COUNT] = [47, 53, 59, 61, 64, 65, 67, 69, 71, 73];

const REFERENCE_BANK: [&str; WHEEL_COUNT] = [
    "11000011010111101011100011111101111011110110010",
    "11110001110100111111010101111100101000011110010010000",
    "00001011011010001001100011001000101000001001101111110100011",
    "0110111001111011100111011111101001110011101100101001100011100",
    "1111000110101001011110010001001100000101111110111110001011010010",
    "11111111110010110011010010011001011000101011010011010110101001010",
    "1010110101100010100100100101010111000100110011110010100100111100110",
    "100111110011101001010100000011111110110100010111011110001110000011010",
    "10100110111100011011010011011111111100111111000010011111100110001110111",
    "0101011101110100010011000111101110011010001111101111100110000000101101111",
];
const REFERENCE_ORDER: [usize; WHEEL_COUNT] = [8, 7, 2, 4, 3, 5, 6, 1, 0, 9];
const REFERENCE_OFFSETS: [usize; WHEEL_COUNT] = [44, 52, 35, 14, 19, 55, 6, 4, 3, 51];

/// Wheel set key settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyConfig {
    /// Wheel bit strings ('0'/'1')
    pub bank: Vec<String>,
    /// Bank index for each role; bank order when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<Vec<usize>>,
    /// Starting cursor for each role; all zero when empty
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub offsets: Vec<usize>,
}

impl KeyConfig {
    /// The built-in key setting
    pub fn reference() -> Self {
        Self {
            bank: REFERENCE_BANK.iter().map(|s| s.to_string()).collect(),
            order: Some(REFERENCE_ORDER.to_vec()),
            offsets: REFERENCE_OFFSETS.to_vec(),
        }
    }

    /// Random key: catalog periods shuffled over the roles, random bits and offsets
    pub fn random<R: Rng + ?Sized>(catalog: &[usize], rng: &mut R) -> Result<Self> {
        if catalog.len() != WHEEL_COUNT || catalog.contains(&0) {
            return Err(Error::Config(format!(
                "a catalog needs {} non-zero periods, got {:?}",
                WHEEL_COUNT, catalog
            )));
        }
        let mut periods = catalog.to_vec();
        periods.shuffle(rng);

        let bank = periods
            .iter()
            .map(|&p| (0..p).map(|_| if rng.gen::<bool>() { '1' } else { '0' }).collect())
            .collect();
        let offsets = periods.iter().map(|&p| rng.gen_range(0..p)).collect();

        Ok(Self {
            bank,
            order: None,
            offsets,
        })
    }

    /// Export a wheel set (bits and starting offsets, bank in role order)
    pub fn from_wheel_set(wheels: &WheelSet) -> Self {
        let offsets: Vec<usize> = wheels.wheels().iter().map(Wheel::offset).collect();
        Self {
            bank: wheels.wheels().iter().map(Wheel::to_bit_string).collect(),
            order: None,
            offsets: if offsets.iter().all(|&o| o == 0) {
                Vec::new()
            } else {
                offsets
            },
        }
    }

    /// Build a fresh wheel set. Each call returns independent cursors.
    pub fn build(&self) -> Result<WheelSet> {
        let order: Vec<usize> = match &self.order {
            Some(order) => order.clone(),
            None => (0..self.bank.len()).collect(),
        };
        if order.len() != WHEEL_COUNT {
            return Err(Error::Config(format!(
                "key needs {} roles, got {}",
                WHEEL_COUNT,
                order.len()
            )));
        }
        let mut seen = [false; WHEEL_COUNT];
        for &index in &order {
            if index >= self.bank.len() || index >= WHEEL_COUNT || seen[index] {
                return Err(Error::Config(format!(
                    "order {:?} is not a permutation of the bank",
                    order
                )));
            }
            seen[index] = true;
        }
        if !self.offsets.is_empty() && self.offsets.len() != WHEEL_COUNT {
            return Err(Error::Config(format!(
                "expected {} offsets, got {}",
                WHEEL_COUNT,
                self.offsets.len()
            )));
        }

        let wheels = order
            .iter()
            .enumerate()
            .map(|(role, &index)| {
                let offset = self.offsets.get(role).copied().unwrap_or(0);
                Wheel::from_bit_str(&self.bank[index], offset)
            })
            .collect::<Result<Vec<_>>>()?;
        WheelSet::new(wheels)
    }

    pub fn load(path: &Path) -> Result<Self> {
        load_file(path)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        save_file(self, path)
    }
}

/// Known-plaintext attack settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackConfig {
    /// Candidate periods; each is used by exactly one wheel
    pub catalog: Vec<usize>,
    /// Wheel i has `catalog[i]` from the start instead of inferring periods
    #[serde(default)]
    pub pinned: bool,
}

impl Default for AttackConfig {
    fn default() -> Self {
        Self {
            catalog: DEFAULT_CATALOG.to_vec(),
            pinned: false,
        }
    }
}

impl AttackConfig {
    pub fn pinned(catalog: Vec<usize>) -> Self {
        Self {
            catalog,
            pinned: true,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.catalog.len() != WHEEL_COUNT {
            return Err(Error::Config(format!(
                "catalog needs {} periods, got {}",
                WHEEL_COUNT,
                self.catalog.len()
            )));
        }
        let mut sorted = self.catalog.clone();
        sorted.sort_unstable();
        sorted.dedup();
        if sorted.len() != WHEEL_COUNT || sorted[0] == 0 {
            return Err(Error::Config(format!(
                "catalog periods must be distinct and non-zero: {:?}",
                self.catalog
            )));
        }
        Ok(())
    }

    /// Candidate periods each wheel starts with
    pub fn initial_candidates(&self, wheel: usize) -> Result<Vec<usize>> {
        if !self.pinned {
            return Ok(self.catalog.clone());
        }
        self.catalog
            .get(wheel)
            .map(|&period| vec![period])
            .ok_or_else(|| {
                Error::Config(format!(
                    "no pinned period for wheel {} in a catalog of {}",
                    wheel,
                    self.catalog.len()
                ))
            })
    }

    pub fn load(path: &Path) -> Result<Self> {
        load_file(path)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        save_file(self, path)
    }
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    )
}

fn load_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let data = std::fs::read_to_string(path)
        .map_err(|e| Error::IoError(format!("Failed to read {}: {}", path.display(), e)))?;
    if is_yaml(path) {
        serde_yaml::from_str(&data).map_err(|e| Error::Config(e.to_string()))
    } else {
        serde_json::from_str(&data).map_err(|e| Error::Config(e.to_string()))
    }
}

fn save_file<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    let data = if is_yaml(path) {
        serde_yaml::to_string(value).map_err(|e| Error::Config(e.to_string()))?
    } else {
        serde_json::to_string_pretty(value).map_err(|e| Error::Config(e.to_string()))?
    };

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| Error::IoError(format!("Failed to create directory: {}", e)))?;
    }
    std::fs::write(path, data)
        .map_err(|e| Error::IoError(format!("Failed to write {}: {}", path.display(), e)))?;

    tracing::info!("Saved settings to {}", path.display());
    Ok(())
}
