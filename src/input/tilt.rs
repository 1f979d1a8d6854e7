//! Tilt steering with calibration and keyboard fallback
//!
//! Raw orientation (gamma = left/right, beta = front/back, degrees) goes
//! through offset subtraction, clamping, a deadzone and exponential
//! smoothing. The output is divided by a sensitivity-derived divisor.
//!
//! Devices without orientation sensors drive the same filter from held
//! direction keys, so both paths feel alike.

use glam::Vec2;

use crate::tuning::TiltTuning;

/// Held state of the four direction inputs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DirectionalKeys {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl DirectionalKeys {
    /// Unit-ish direction (-1/0/1 per axis, y down)
    pub fn axis(&self) -> Vec2 {
        let x = (self.right as i8 - self.left as i8) as f32;
        let y = (self.down as i8 - self.up as i8) as f32;
        Vec2::new(x, y)
    }
}

/// Progress reported while calibrating
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CalibrationStep {
    /// Sample arrived too soon after the previous one
    Skipped,
    /// Fraction of samples collected (0..1)
    Progress(f32),
    /// Calibration finished with this offset
    Done(Vec2),
}

/// Baseline subtracted from raw tilt readings
#[derive(Debug, Clone, Default)]
pub struct Calibration {
    offset: Vec2,
    calibrated: bool,
    collecting: bool,
    samples: Vec<Vec2>,
    last_sample_at: Option<f64>,
}

impl Calibration {
    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    pub fn is_calibrated(&self) -> bool {
        self.calibrated
    }

    pub fn is_collecting(&self) -> bool {
        self.collecting
    }

    /// Begin a fresh sampling run (keeps any previous offset until done)
    pub fn start(&mut self) {
        self.collecting = true;
        self.samples.clear();
        self.last_sample_at = None;
    }

    /// Abort sampling. Nothing collected so far is kept.
    pub fn cancel(&mut self) {
        self.collecting = false;
        self.samples.clear();
        self.last_sample_at = None;
    }

    /// Forget the offset entirely (controls reset)
    pub fn reset(&mut self) {
        self.cancel();
        self.offset = Vec2::ZERO;
        self.calibrated = false;
    }

    /// Feed one raw reading; samples closer than the interval are skipped
    pub fn sample(&mut self, raw: Vec2, now: f64, tuning: &TiltTuning) -> CalibrationStep {
        if !self.collecting {
            return CalibrationStep::Skipped;
        }
        if let Some(last) = self.last_sample_at {
            if now - last < tuning.calibration_interval_ms {
                return CalibrationStep::Skipped;
            }
        }
        self.last_sample_at = Some(now);
        self.samples.push(raw);

        let wanted = tuning.calibration_samples.max(1);
        if self.samples.len() < wanted {
            return CalibrationStep::Progress(self.samples.len() as f32 / wanted as f32);
        }

        let limit = tuning.calibration_outlier_deg;
        let kept: Vec<Vec2> = self
            .samples
            .iter()
            .copied()
            .filter(|s| s.x.abs() <= limit && s.y.abs() <= limit)
            .collect();
        self.offset = if kept.is_empty() {
            log::warn!("All calibration samples were outliers, using a level baseline");
            Vec2::ZERO
        } else {
            kept.iter().copied().sum::<Vec2>() / kept.len() as f32
        };
        log::info!(
            "Calibrated tilt offset ({:.1}, {:.1}) from {}/{} samples",
            self.offset.x,
            self.offset.y,
            kept.len(),
            self.samples.len()
        );
        self.calibrated = true;
        self.collecting = false;
        self.samples.clear();
        CalibrationStep::Done(self.offset)
    }
}

/// Which source currently drives the filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TiltSource {
    Sensor,
    Keys,
}

/// Tilt normalizer
#[derive(Debug, Clone)]
pub struct TiltInput {
    tuning: TiltTuning,
    divisor: f32,
    calibration: Calibration,
    smoothed: Vec2,
    keys: DirectionalKeys,
    source: TiltSource,
}

impl TiltInput {
    pub fn new(tuning: TiltTuning, sensitivity: u8) -> Self {
        let divisor = sensitivity_divisor(&tuning, sensitivity);
        Self {
            tuning,
            divisor,
            calibration: Calibration::default(),
            smoothed: Vec2::ZERO,
            keys: DirectionalKeys::default(),
            source: TiltSource::Sensor,
        }
    }

    pub fn set_sensitivity(&mut self, sensitivity: u8) {
        self.divisor = sensitivity_divisor(&self.tuning, sensitivity);
    }

    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    pub fn calibration_mut(&mut self) -> &mut Calibration {
        &mut self.calibration
    }

    pub fn source(&self) -> TiltSource {
        self.source
    }

    pub fn use_keys(&mut self) {
        self.source = TiltSource::Keys;
    }

    pub fn keys(&self) -> DirectionalKeys {
        self.keys
    }

    /// Feed a raw orientation reading. While calibrating the reading only
    /// feeds the calibration and the steering filter is left untouched.
    pub fn feed_orientation(&mut self, gamma: f32, beta: f32, now: f64) -> Option<CalibrationStep> {
        let raw = Vec2::new(gamma, beta);
        if self.calibration.is_collecting() {
            return Some(self.calibration.sample(raw, now, &self.tuning));
        }
        if self.source == TiltSource::Keys {
            return None;
        }
        let max = self.tuning.max_angle_deg;
        let mut v = raw - self.calibration.offset();
        v = Vec2::new(v.x.clamp(-max, max), v.y.clamp(-max, max));
        v = Vec2::new(
            deadzone(v.x, self.tuning.deadzone_deg),
            deadzone(v.y, self.tuning.deadzone_deg),
        );
        self.smooth_toward(v);
        None
    }

    /// Update held direction keys; the first key press switches to key input
    pub fn set_key(&mut self, keys: DirectionalKeys) {
        self.keys = keys;
        if keys != DirectionalKeys::default() {
            self.source = TiltSource::Keys;
        }
    }

    /// Per-tick update for key input (sensor input smooths per sample)
    pub fn tick(&mut self) {
        if self.source == TiltSource::Keys {
            let target = self.keys.axis() * self.tuning.fallback_angle_deg;
            self.smooth_toward(target);
        }
    }

    fn smooth_toward(&mut self, target: Vec2) {
        self.smoothed += (target - self.smoothed) * self.tuning.smoothing;
    }

    /// Smoothed tilt in degrees (before sensitivity scaling)
    pub fn smoothed(&self) -> Vec2 {
        self.smoothed
    }

    /// Steering signal for the current tick
    pub fn steering(&self) -> Vec2 {
        self.smoothed / self.divisor
    }

    /// Drop filter state (level restart). Calibration is kept.
    pub fn settle(&mut self) {
        self.smoothed = Vec2::ZERO;
        self.keys = DirectionalKeys::default();
    }
}

/// Map the 1..=10 UI scale onto a divisor (higher setting, smaller divisor)
pub fn sensitivity_divisor(tuning: &TiltTuning, sensitivity: u8) -> f32 {
    let t = (sensitivity.clamp(1, 10) - 1) as f32 / 9.0;
    tuning.divisor_least_sensitive
        + (tuning.divisor_most_sensitive - tuning.divisor_least_sensitive) * t
}

#[inline]
fn deadzone(v: f32, zone: f32) -> f32 {
    if v.abs() < zone { 0.0 } else { v }
}
