//! Data-driven game balance
//!
//! Knobs whose values differ between observed configurations live here
//! rather than in `consts`, so a run can swap its reference configuration
//! by loading a JSON file. Missing or unreadable files fall back to the
//! defaults with a logged warning.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Tunable balance constants
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Chance a killed hostile drops a heal pickup
    pub pickup_drop_chance: f32,
    /// An elite spawns every this many wave levels
    pub boss_wave_interval: u32,
    /// Orbs scattered by a dying elite
    pub elite_orb_burst: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            pickup_drop_chance: 0.15,
            boss_wave_interval: 5,
            elite_orb_burst: 5,
        }
    }
}

impl Tuning {
    /// Load tuning from a JSON file, falling back to defaults
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str::<Tuning>(&json) {
                Ok(tuning) => {
                    log::info!("loaded tuning from {}", path.display());
                    tuning.sanitized()
                }
                Err(err) => {
                    log::warn!("invalid tuning file {}: {err}", path.display());
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("no tuning file at {}, using defaults", path.display());
                Self::default()
            }
        }
    }

    /// Clamp values into usable ranges
    fn sanitized(mut self) -> Self {
        self.pickup_drop_chance = self.pickup_drop_chance.clamp(0.0, 1.0);
        self.boss_wave_interval = self.boss_wave_interval.max(1);
        self
    }
}
