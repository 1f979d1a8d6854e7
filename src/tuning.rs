//! Data-driven game balance
//!
//! Every tunable number lives here, grouped by the component that reads it.
//! Per-tick values assume the fixed 60 Hz step in [`crate::consts::SIM_DT`].
//! Durations are milliseconds of game clock.

use serde::{Deserialize, Serialize};

/// Tilt normalizer tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TiltTuning {
    /// Exponential smoothing factor applied each sample
    pub smoothing: f32,
    /// Readings closer to zero than this (degrees) are treated as level
    pub deadzone_deg: f32,
    /// Readings are clamped to +/- this many degrees
    pub max_angle_deg: f32,
    pub calibration_samples: usize,
    pub calibration_interval_ms: f64,
    /// Calibration samples beyond this magnitude are discarded
    pub calibration_outlier_deg: f32,
    /// Divisor at sensitivity 1
    pub divisor_least_sensitive: f32,
    /// Divisor at sensitivity 10
    pub divisor_most_sensitive: f32,
    /// Virtual tilt produced by a held direction key
    pub fallback_angle_deg: f32,
}

impl Default for TiltTuning {
    fn default() -> Self {
        Self {
            smoothing: 0.15,
            deadzone_deg: 3.0,
            max_angle_deg: 90.0,
            calibration_samples: 30,
            calibration_interval_ms: 100.0,
            calibration_outlier_deg: 80.0,
            divisor_least_sensitive: 40.0,
            divisor_most_sensitive: 10.0,
            fallback_angle_deg: 30.0,
        }
    }
}

/// Shake detector and boost charge tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShakeTuning {
    pub max_charges: u8,
    pub cooldown_ms: f64,
    /// Gap after which the rapid-trigger counter starts over
    pub rapid_window_ms: f64,
    /// Accepted triggers inside the window that cause an overheat
    pub rapid_threshold: u32,
    pub overheat_ms: f64,
    /// Number of deltas averaged to smooth sensor noise
    pub history: usize,
    /// L1 delta threshold (m/s^2) at sensitivity 1
    pub threshold_least_sensitive: f32,
    /// L1 delta threshold (m/s^2) at sensitivity 10
    pub threshold_most_sensitive: f32,
}

impl Default for ShakeTuning {
    fn default() -> Self {
        Self {
            max_charges: 3,
            cooldown_ms: 2000.0,
            rapid_window_ms: 3000.0,
            rapid_threshold: 5,
            overheat_ms: 5000.0,
            history: 3,
            threshold_least_sensitive: 40.0,
            threshold_most_sensitive: 12.0,
        }
    }
}

/// Pointer gesture tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GestureTuning {
    pub hold_ms: f64,
    /// Movement (px) that turns a press into a drag
    pub move_jitter_px: f32,
    pub double_tap_ms: f64,
    pub double_tap_px: f32,
    pub radar_cooldown_ms: f64,
}

impl Default for GestureTuning {
    fn default() -> Self {
        Self {
            hold_ms: 500.0,
            move_jitter_px: 20.0,
            double_tap_ms: 300.0,
            double_tap_px: 50.0,
            radar_cooldown_ms: 10_000.0,
        }
    }
}

/// Character movement, glow and status effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CharacterTuning {
    pub accel: f32,
    pub friction: f32,
    pub max_speed: f32,
    /// |vel.x| needed before the character turns around
    pub facing_threshold: f32,
    /// Distance from body center to the glowing nose
    pub nose_offset: f32,
    pub base_glow: f32,
    pub boost_glow_mult: f32,
    /// Glow multiplier while overheated or iced
    pub dim_glow_mult: f32,
    pub lantern_glow_mult: f32,
    /// Fraction of the remaining glow difference closed per tick
    pub glow_ease: f32,
    pub boost_speed_mult: f32,
    pub boost_ms: f64,
    pub boost_hole_radius: f32,
    pub boost_hole_ms: f64,
    pub iced_ms: f64,
    /// Ice immunity granted after thawing
    pub immune_ms: f64,
    pub iced_accel_mult: f32,
    /// Extra friction applied while hovering (hold gesture)
    pub hover_friction: f32,
    pub wind_frequency_hz: f32,
}

impl Default for CharacterTuning {
    fn default() -> Self {
        Self {
            accel: 0.6,
            friction: 0.92,
            max_speed: 7.0,
            facing_threshold: 0.5,
            nose_offset: 22.0,
            base_glow: 110.0,
            boost_glow_mult: 1.6,
            dim_glow_mult: 0.6,
            lantern_glow_mult: 1.5,
            glow_ease: 0.1,
            boost_speed_mult: 1.6,
            boost_ms: 1500.0,
            boost_hole_radius: 180.0,
            boost_hole_ms: 3000.0,
            iced_ms: 2500.0,
            immune_ms: 1500.0,
            iced_accel_mult: 0.5,
            hover_friction: 0.8,
            wind_frequency_hz: 0.5,
        }
    }
}

/// Trailing sleigh spring model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SleighTuning {
    pub rope_length: f32,
    /// Anchor sits this far below the character
    pub rope_drop: f32,
    pub spring: f32,
    pub max_spring_force: f32,
    pub max_stretch: f32,
    pub pull_back: f32,
    pub friction: f32,
    pub swing_impulse: f32,
    pub swing_damping: f32,
    pub max_swing: f32,
}

impl Default for SleighTuning {
    fn default() -> Self {
        Self {
            rope_length: 55.0,
            rope_drop: 18.0,
            spring: 0.08,
            max_spring_force: 2.5,
            max_stretch: 90.0,
            pull_back: 0.2,
            friction: 0.85,
            swing_impulse: 0.015,
            swing_damping: 0.9,
            max_swing: 0.6,
        }
    }
}

/// Fog queries and reveal effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FogTuning {
    /// Fraction of a hole's radius that counts as "spotted"
    pub visible_fraction: f32,
    pub reveal_radius: f32,
    pub reveal_ms: f64,
}

impl Default for FogTuning {
    fn default() -> Self {
        Self {
            visible_fraction: 0.8,
            reveal_radius: 220.0,
            reveal_ms: 5000.0,
        }
    }
}

/// Placement of chimneys, power-ups and hazards
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpawnTuning {
    pub attempts_per_item: u32,
    /// Inset from the world edge
    pub margin: f32,
    pub chimney_separation: f32,
    pub power_up_separation: f32,
    pub hazard_separation: f32,
    /// Chimneys sit on rooftops below this fraction of the world height
    pub rooftop_fraction: f32,
    pub hazard_radius: f32,
    /// Horizontal hazard drift per tick, scaled by level wind
    pub hazard_drift: f32,
}

impl Default for SpawnTuning {
    fn default() -> Self {
        Self {
            attempts_per_item: 20,
            margin: 60.0,
            chimney_separation: 120.0,
            power_up_separation: 90.0,
            hazard_separation: 150.0,
            rooftop_fraction: 0.45,
            hazard_radius: 45.0,
            hazard_drift: 0.4,
        }
    }
}

/// Power-up effect strengths
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUpTuning {
    pub extra_time_secs: f32,
    pub shield_ms: f64,
    pub lantern_ms: f64,
}

impl Default for PowerUpTuning {
    fn default() -> Self {
        Self {
            extra_time_secs: 10.0,
            shield_ms: 8000.0,
            lantern_ms: 10_000.0,
        }
    }
}

/// Points and end-of-level bonuses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreTuning {
    pub delivery: u64,
    pub perfect_delivery: u64,
    pub perfect_radius: f32,
    pub spotted: u64,
    pub power_up: u64,
    /// Padding added around a chimney's box for tap hits
    pub hit_padding: f32,
    pub time_bonus_per_sec: u64,
    pub all_delivered_bonus: u64,
    pub no_boost_bonus: u64,
    pub untouched_bonus: u64,
    pub no_radar_bonus: u64,
    /// Time fraction that must remain for two stars
    pub two_star_time_fraction: f32,
    /// A spotted chimney this far outside the view counts as missed
    pub miss_margin: f32,
}

impl Default for ScoreTuning {
    fn default() -> Self {
        Self {
            delivery: 100,
            perfect_delivery: 200,
            perfect_radius: 20.0,
            spotted: 10,
            power_up: 50,
            hit_padding: 20.0,
            time_bonus_per_sec: 10,
            all_delivered_bonus: 500,
            no_boost_bonus: 200,
            untouched_bonus: 300,
            no_radar_bonus: 100,
            two_star_time_fraction: 0.2,
            miss_margin: 60.0,
        }
    }
}

/// Complete tuning table
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Tuning {
    #[serde(default)]
    pub tilt: TiltTuning,
    #[serde(default)]
    pub shake: ShakeTuning,
    #[serde(default)]
    pub gesture: GestureTuning,
    #[serde(default)]
    pub character: CharacterTuning,
    #[serde(default)]
    pub sleigh: SleighTuning,
    #[serde(default)]
    pub fog: FogTuning,
    #[serde(default)]
    pub spawn: SpawnTuning,
    #[serde(default)]
    pub power_ups: PowerUpTuning,
    #[serde(default)]
    pub score: ScoreTuning,
}

impl Tuning {
    /// Parse a tuning override, filling missing sections with defaults
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
