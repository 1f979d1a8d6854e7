//! Level table
//!
//! A short authored list, then procedural extrapolation: one more chimney
//! and five fewer seconds per level past the end, with floors and caps.

use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};

/// Fog thickness tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FogDensity {
    Light,
    Medium,
    Heavy,
    Blizzard,
}

impl FogDensity {
    /// Nose glow multiplier: thicker fog, smaller clearing
    pub fn glow_scale(&self) -> f32 {
        match self {
            FogDensity::Light => 1.0,
            FogDensity::Medium => 0.85,
            FogDensity::Heavy => 0.7,
            FogDensity::Blizzard => 0.55,
        }
    }

    /// Opacity of untouched fog in the overlay
    pub fn opacity(&self) -> f32 {
        match self {
            FogDensity::Light => 0.82,
            FogDensity::Medium => 0.88,
            FogDensity::Heavy => 0.93,
            FogDensity::Blizzard => 0.97,
        }
    }
}

/// Immutable parameters for one level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelConfig {
    /// 0-based
    pub index: u32,
    pub fog: FogDensity,
    pub target_count: u32,
    pub time_limit_secs: f32,
    pub power_up_count: u32,
    pub hazard_count: u32,
    /// Peak horizontal gust (px/tick^2)
    pub wind: f32,
}

impl LevelConfig {
    pub fn validate(&self) -> Result<()> {
        let invalid = |reason| GameError::InvalidLevel {
            index: self.index,
            reason,
        };
        if self.target_count == 0 {
            return Err(invalid("needs at least one chimney"));
        }
        if !(self.time_limit_secs > 0.0) {
            return Err(invalid("time limit must be positive"));
        }
        if !self.wind.is_finite() {
            return Err(invalid("wind must be finite"));
        }
        Ok(())
    }
}

/// Shortest time limit extrapolated levels can reach
pub const MIN_TIME_LIMIT_SECS: f32 = 40.0;
/// Most power-ups extrapolated levels can have
pub const MAX_POWER_UPS: u32 = 6;
/// Most hazards extrapolated levels can have
pub const MAX_HAZARDS: u32 = 6;

const fn authored(
    index: u32,
    fog: FogDensity,
    target_count: u32,
    time_limit_secs: f32,
    power_up_count: u32,
    hazard_count: u32,
    wind: f32,
) -> LevelConfig {
    LevelConfig {
        index,
        fog,
        target_count,
        time_limit_secs,
        power_up_count,
        hazard_count,
        wind,
    }
}

const AUTHORED: [LevelConfig; 8] = [
    authored(0, FogDensity::Light, 3, 90.0, 2, 0, 0.0),
    authored(1, FogDensity::Light, 4, 90.0, 2, 1, 0.02),
    authored(2, FogDensity::Medium, 5, 90.0, 3, 1, 0.03),
    authored(3, FogDensity::Medium, 6, 85.0, 3, 2, 0.04),
    authored(4, FogDensity::Heavy, 7, 80.0, 3, 2, 0.05),
    authored(5, FogDensity::Heavy, 8, 75.0, 4, 3, 0.06),
    authored(6, FogDensity::Blizzard, 9, 70.0, 4, 3, 0.07),
    authored(7, FogDensity::Blizzard, 10, 65.0, 4, 4, 0.08),
];

/// Number of hand-authored levels
pub fn authored_count() -> usize {
    AUTHORED.len()
}

/// Config for any level index
pub fn level(index: u32) -> LevelConfig {
    if let Some(cfg) = AUTHORED.get(index as usize) {
        return cfg.clone();
    }
    let last = &AUTHORED[AUTHORED.len() - 1];
    let extra = index - last.index;
    LevelConfig {
        index,
        fog: FogDensity::Blizzard,
        target_count: last.target_count + extra,
        time_limit_secs: (last.time_limit_secs - 5.0 * extra as f32).max(MIN_TIME_LIMIT_SECS),
        power_up_count: (last.power_up_count + extra / 2).min(MAX_POWER_UPS),
        hazard_count: (last.hazard_count + extra / 2).min(MAX_HAZARDS),
        wind: (last.wind + 0.005 * extra as f32).min(0.12),
    }
}
