//! Fog Sleigh - a tilt-and-shake arcade game in the fog
//!
//! Core modules:
//! - `input`: Sensor and pointer normalizers (tilt, shake, gestures)
//! - `sim`: Deterministic simulation (fog, physics, chimneys, scoring)
//! - `session`: Game state machine and fixed-step frame loop
//! - `renderer`: Pure draw-list builder plus the WebGPU pipeline
//! - `platform`: Browser/native platform helpers
//! - `persistence`: Versioned save/load over key-value storage
//! - `tuning`: Data-driven game balance

pub mod error;
pub mod events;
pub mod haptics;
pub mod input;
pub mod persistence;
pub mod platform;
pub mod progress;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use error::{GameError, Result};
pub use events::{GameEvent, Presenter};
pub use progress::Progress;
pub use session::{Session, SessionState};
pub use settings::{FogQuality, Settings};
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, all per-tick physics constants assume it)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Fixed timestep in milliseconds of game clock
    pub const SIM_DT_MS: f64 = 1000.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// World width as a multiple of the viewport width
    pub const WORLD_SCREENS: f32 = 3.0;
    /// Default viewport (portrait phone) used before the first resize
    pub const DEFAULT_VIEW_WIDTH: f32 = 420.0;
    pub const DEFAULT_VIEW_HEIGHT: f32 = 780.0;
    /// Smallest viewport side a level can start in
    pub const MIN_VIEW_SIZE: f32 = 200.0;

    /// Chimney footprint
    pub const CHIMNEY_WIDTH: f32 = 40.0;
    pub const CHIMNEY_HEIGHT: f32 = 30.0;
    /// Number of chimney art variants
    pub const CHIMNEY_STYLES: u8 = 4;

    /// Pickup radius for power-ups
    pub const POWER_UP_RADIUS: f32 = 18.0;
    /// Half-size of the character's body used for contact checks
    pub const CHARACTER_RADIUS: f32 = 16.0;
    /// Sleigh contact radius
    pub const SLEIGH_RADIUS: f32 = 14.0;
}

/// Clamp each component of a point into an axis-aligned rectangle
#[inline]
pub fn clamp_to_rect(p: Vec2, min: Vec2, max: Vec2) -> Vec2 {
    Vec2::new(p.x.clamp(min.x, max.x), p.y.clamp(min.y, max.y))
}

/// Angle (radians, screen coords with y down) pointing from `from` to `to`
#[inline]
pub fn heading(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    d.y.atan2(d.x)
}

/// Cap a vector's length without changing its direction
#[inline]
pub fn cap_length(v: Vec2, max: f32) -> Vec2 {
    let len = v.length();
    if len > max && len > 0.0 { v * (max / len) } else { v }
}
