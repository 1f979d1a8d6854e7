//! Game settings and preferences
//!
//! Persisted separately from progress in key-value storage.

use serde::{Deserialize, Serialize};

use crate::persistence::{self, Storage};

/// Fog overlay quality
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum FogQuality {
    Low,
    #[default]
    Medium,
    High,
}

impl FogQuality {
    pub fn as_str(&self) -> &'static str {
        match self {
            FogQuality::Low => "Low",
            FogQuality::Medium => "Medium",
            FogQuality::High => "High",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(FogQuality::Low),
            "medium" | "med" => Some(FogQuality::Medium),
            "high" => Some(FogQuality::High),
            _ => None,
        }
    }

    /// Side length (px) of one fog overlay cell
    pub fn fog_cell_size(&self) -> f32 {
        match self {
            FogQuality::Low => 32.0,
            FogQuality::Medium => 20.0,
            FogQuality::High => 12.0,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Fog overlay quality preset
    pub fog_quality: FogQuality,

    // === Controls ===
    /// Tilt sensitivity (1 = gentle, 10 = twitchy)
    pub tilt_sensitivity: u8,
    /// Shake sensitivity (1 = hard shake needed, 10 = light flick)
    pub shake_sensitivity: u8,
    /// Skip sensors entirely and steer with keys/buttons
    pub prefer_buttons: bool,

    // === Feedback ===
    pub haptics: bool,

    // === Accessibility ===
    /// Reduced motion (no sleigh swing, no glow pulsing)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            fog_quality: FogQuality::Medium,
            tilt_sensitivity: 5,
            shake_sensitivity: 5,
            prefer_buttons: false,
            haptics: true,
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Storage key
    const STORAGE_KEY: &'static str = "fog_sleigh_settings";
    const VERSION: u32 = 1;

    /// Clamp values a hand-edited save may have pushed out of range
    pub fn sanitized(mut self) -> Self {
        self.tilt_sensitivity = self.tilt_sensitivity.clamp(1, 10);
        self.shake_sensitivity = self.shake_sensitivity.clamp(1, 10);
        self
    }

    /// Load settings, falling back to defaults
    pub fn load(storage: &dyn Storage) -> Self {
        match persistence::load::<Settings>(storage, Self::STORAGE_KEY, Self::VERSION) {
            Some(settings) => {
                log::info!("Loaded settings");
                settings.sanitized()
            }
            None => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    pub fn save(&self, storage: &mut dyn Storage) {
        match persistence::save(storage, Self::STORAGE_KEY, Self::VERSION, self) {
            Ok(()) => log::info!("Settings saved"),
            Err(e) => log::warn!("Settings not saved: {e}"),
        }
    }
}
