//! Haptic feedback via the Vibration API
//!
//! Fire-and-forget named patterns. Unsupported devices, missing permission
//! or a disabled setting all turn requests into no-ops.

use serde::{Deserialize, Serialize};

/// Named vibration patterns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HapticPattern {
    /// Boost accepted
    Boost,
    /// Boost locked out by overheat
    Overheat,
    /// Chimney spotted through the fog
    Spotted,
    /// Delivery landed
    Deliver,
    /// Delivery landed dead center
    Perfect,
    /// Chimney flown past
    Miss,
    /// Sleigh clipped a hazard
    Bump,
    /// Radar pulse
    Radar,
    /// Level complete
    Success,
    /// Time ran out
    Failure,
}

impl HapticPattern {
    /// Vibration timings in ms, alternating on/off
    pub fn timings(&self) -> &'static [u32] {
        match self {
            HapticPattern::Boost => &[50, 30, 50],
            HapticPattern::Overheat => &[300],
            HapticPattern::Spotted => &[20],
            HapticPattern::Deliver => &[40],
            HapticPattern::Perfect => &[30, 20, 30, 20, 60],
            HapticPattern::Miss => &[200],
            HapticPattern::Bump => &[80],
            HapticPattern::Radar => &[20, 40, 20, 40, 20],
            HapticPattern::Success => &[100, 50, 100, 50, 200],
            HapticPattern::Failure => &[400, 100, 400],
        }
    }
}

/// Something that can run a vibration pattern
pub trait Vibrator {
    /// Returns false when the device refused the request
    fn vibrate(&self, timings: &[u32]) -> bool;
}

/// Haptics manager for the game
pub struct Haptics {
    backend: Option<Box<dyn Vibrator>>,
    enabled: bool,
}

impl Default for Haptics {
    fn default() -> Self {
        Self::disabled()
    }
}

impl std::fmt::Debug for Haptics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Haptics")
            .field("supported", &self.backend.is_some())
            .field("enabled", &self.enabled)
            .finish()
    }
}

impl Haptics {
    pub fn new(backend: Box<dyn Vibrator>) -> Self {
        Self {
            backend: Some(backend),
            enabled: true,
        }
    }

    /// No backend at all (native, unsupported browser)
    pub fn disabled() -> Self {
        Self {
            backend: None,
            enabled: false,
        }
    }

    /// Browser vibration if the navigator supports it (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn from_navigator() -> Self {
        match web_sys::window() {
            Some(window) => Self::new(Box::new(NavigatorVibrator { window })),
            None => {
                log::warn!("No window - haptics disabled");
                Self::disabled()
            }
        }
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled && self.backend.is_some();
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Play a pattern
    pub fn play(&self, pattern: HapticPattern) {
        if !self.enabled {
            return;
        }
        let Some(backend) = &self.backend else { return };
        if !backend.vibrate(pattern.timings()) {
            log::debug!("Vibration refused for {:?}", pattern);
        }
    }
}

/// `navigator.vibrate` backend
#[cfg(target_arch = "wasm32")]
struct NavigatorVibrator {
    window: web_sys::Window,
}

#[cfg(target_arch = "wasm32")]
impl Vibrator for NavigatorVibrator {
    fn vibrate(&self, timings: &[u32]) -> bool {
        let pattern = js_sys::Array::new();
        for &ms in timings {
            pattern.push(&wasm_bindgen::JsValue::from(ms));
        }
        self.window.navigator().vibrate_with_pattern(&pattern)
    }
}
