//! Shake detection and boost charge gating
//!
//! A boost is accepted only with a charge left, the cooldown elapsed and no
//! overheat in progress. Too many accepted boosts in quick succession cause
//! an overheat lockout. Every timer is a deadline on the caller's clock.

use std::collections::VecDeque;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::tuning::ShakeTuning;

/// Why a boost trigger was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoostRejection {
    Cooldown,
    NoCharges,
    Overheated,
}

/// Result of a boost trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoostOutcome {
    Accepted {
        charges_left: u8,
        /// This trigger tipped the rapid counter into an overheat
        overheated: bool,
    },
    Rejected(BoostRejection),
}

/// Boost charges, cooldown and overheat bookkeeping
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoostState {
    pub charges: u8,
    pub cooldown_until: f64,
    pub overheat_until: f64,
    pub rapid_count: u32,
    pub last_trigger_at: Option<f64>,
}

impl BoostState {
    pub fn new(charges: u8) -> Self {
        Self {
            charges,
            cooldown_until: f64::NEG_INFINITY,
            overheat_until: f64::NEG_INFINITY,
            rapid_count: 0,
            last_trigger_at: None,
        }
    }

    pub fn is_overheated(&self, now: f64) -> bool {
        now < self.overheat_until
    }

    /// Try to spend a charge at `now`
    pub fn try_trigger(&mut self, now: f64, tuning: &ShakeTuning) -> BoostOutcome {
        if self.is_overheated(now) {
            return BoostOutcome::Rejected(BoostRejection::Overheated);
        }
        if now < self.cooldown_until {
            return BoostOutcome::Rejected(BoostRejection::Cooldown);
        }
        if self.charges == 0 {
            return BoostOutcome::Rejected(BoostRejection::NoCharges);
        }

        self.charges -= 1;
        self.cooldown_until = now + tuning.cooldown_ms;

        let in_window = self
            .last_trigger_at
            .is_some_and(|last| now - last <= tuning.rapid_window_ms);
        self.rapid_count = if in_window { self.rapid_count + 1 } else { 1 };
        self.last_trigger_at = Some(now);

        let overheated = self.rapid_count >= tuning.rapid_threshold;
        if overheated {
            self.overheat_until = now + tuning.overheat_ms;
            self.rapid_count = 0;
            log::debug!("Boost overheated until {:.0}", self.overheat_until);
        }

        BoostOutcome::Accepted {
            charges_left: self.charges,
            overheated,
        }
    }
}

/// Accelerometer shake detector feeding the boost gate
#[derive(Debug, Clone)]
pub struct ShakeDetector {
    tuning: ShakeTuning,
    threshold: f32,
    previous: Option<Vec3>,
    deltas: VecDeque<f32>,
    state: BoostState,
}

impl ShakeDetector {
    pub fn new(tuning: ShakeTuning, sensitivity: u8) -> Self {
        let threshold = shake_threshold(&tuning, sensitivity);
        let state = BoostState::new(tuning.max_charges);
        Self {
            deltas: VecDeque::with_capacity(tuning.history.max(1)),
            tuning,
            threshold,
            previous: None,
            state,
        }
    }

    pub fn set_sensitivity(&mut self, sensitivity: u8) {
        self.threshold = shake_threshold(&self.tuning, sensitivity);
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn state(&self) -> &BoostState {
        &self.state
    }

    pub fn charges(&self) -> u8 {
        self.state.charges
    }

    pub fn max_charges(&self) -> u8 {
        self.tuning.max_charges
    }

    pub fn is_overheated(&self, now: f64) -> bool {
        self.state.is_overheated(now)
    }

    /// Feed an acceleration sample. Returns an outcome only when the
    /// smoothed movement crosses the threshold.
    pub fn feed_motion(&mut self, accel: Vec3, now: f64) -> Option<BoostOutcome> {
        let prev = self.previous.replace(accel)?;
        let delta = (accel - prev).abs().element_sum();

        if self.deltas.len() >= self.tuning.history.max(1) {
            self.deltas.pop_front();
        }
        self.deltas.push_back(delta);
        let average = self.deltas.iter().sum::<f32>() / self.deltas.len() as f32;

        if average < self.threshold {
            return None;
        }
        let outcome = self.state.try_trigger(now, &self.tuning);
        if matches!(outcome, BoostOutcome::Accepted { .. }) {
            // A single shake should not keep re-firing from its tail
            self.deltas.clear();
        }
        Some(outcome)
    }

    /// Button/key trigger used without a motion sensor
    pub fn trigger(&mut self, now: f64) -> BoostOutcome {
        self.state.try_trigger(now, &self.tuning)
    }

    /// Grant a charge (power-up), capped at the maximum
    pub fn add_charge(&mut self) -> u8 {
        self.state.charges = (self.state.charges + 1).min(self.tuning.max_charges);
        self.state.charges
    }

    /// Fresh charges and timers for a new level
    pub fn reset(&mut self) {
        self.state = BoostState::new(self.tuning.max_charges);
        self.previous = None;
        self.deltas.clear();
    }
}

/// Map the 1..=10 UI scale to an L1 threshold (higher setting, lower threshold)
pub fn shake_threshold(tuning: &ShakeTuning, sensitivity: u8) -> f32 {
    let t = (sensitivity.clamp(1, 10) - 1) as f32 / 9.0;
    tuning.threshold_least_sensitive
        + (tuning.threshold_most_sensitive - tuning.threshold_least_sensitive) * t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cooldown_gates_triggers() {
        let tuning = ShakeTuning::default();
        let mut state = BoostState::new(3);

        assert_eq!(
            state.try_trigger(0.0, &tuning),
            BoostOutcome::Accepted { charges_left: 2, overheated: false }
        );
        assert_eq!(
            state.try_trigger(500.0, &tuning),
            BoostOutcome::Rejected(BoostRejection::Cooldown)
        );
        assert_eq!(state.charges, 2);
        assert_eq!(
            state.try_trigger(2001.0, &tuning),
            BoostOutcome::Accepted { charges_left: 1, overheated: false }
        );
    }

    #[test]
    fn test_no_charges() {
        let tuning = ShakeTuning::default();
        let mut state = BoostState::new(1);
        assert!(matches!(state.try_trigger(0.0, &tuning), BoostOutcome::Accepted { .. }));
        assert_eq!(
            state.try_trigger(10_000.0, &tuning),
            BoostOutcome::Rejected(BoostRejection::NoCharges)
        );
    }

    #[test]
    fn test_overheat_after_rapid_triggers() {
        let tuning = ShakeTuning::default();
        let mut state = BoostState::new(10);

        let mut t = 0.0;
        for i in 0..5 {
            let outcome = state.try_trigger(t, &tuning);
            let expect_overheat = i == 4;
            assert_eq!(
                outcome,
                BoostOutcome::Accepted {
                    charges_left: 9 - i as u8,
                    overheated: expect_overheat
                }
            );
            t += 2100.0;
        }
        let overheated_at = t - 2100.0;
        assert!(state.is_overheated(overheated_at));

        // Charges left and cooldown elapsed, still locked out
        let later = overheated_at + 2500.0;
        assert!(state.charges > 0);
        assert!(later >= state.cooldown_until);
        assert_eq!(
            state.try_trigger(later, &tuning),
            BoostOutcome::Rejected(BoostRejection::Overheated)
        );

        // Clears exactly at the deadline
        assert!(state.is_overheated(overheated_at + 4999.0));
        assert!(!state.is_overheated(overheated_at + 5000.0));
        assert!(matches!(
            state.try_trigger(overheated_at + 5000.0, &tuning),
            BoostOutcome::Accepted { overheated: false, .. }
        ));
    }

    #[test]
    fn test_rapid_counter_resets_after_quiet_gap() {
        let tuning = ShakeTuning::default();
        let mut state = BoostState::new(10);
        let times = [0.0, 2100.0, 4200.0, 6300.0, 12_000.0, 14_100.0];
        for t in times {
            assert!(matches!(
                state.try_trigger(t, &tuning),
                BoostOutcome::Accepted { overheated: false, .. }
            ));
        }
        assert_eq!(state.rapid_count, 2);
    }

    #[test]
    fn test_shake_detection_threshold() {
        let mut shake = ShakeDetector::new(ShakeTuning::default(), 10);
        assert_eq!(shake.threshold(), 12.0);

        // Gentle movement never triggers
        assert_eq!(shake.feed_motion(Vec3::new(0.0, 9.8, 0.0), 0.0), None);
        assert_eq!(shake.feed_motion(Vec3::new(0.5, 9.6, 0.2), 16.0), None);

        // A hard jolt pushes the averaged delta over the threshold
        let outcome = shake.feed_motion(Vec3::new(30.0, -20.0, 15.0), 32.0);
        assert_eq!(
            outcome,
            Some(BoostOutcome::Accepted { charges_left: 2, overheated: false })
        );

        // Follow-up jolts during cooldown are reported as rejected
        let outcome = shake.feed_motion(Vec3::new(-30.0, 20.0, -15.0), 48.0);
        assert_eq!(outcome, Some(BoostOutcome::Rejected(BoostRejection::Cooldown)));
        assert_eq!(shake.charges(), 2);
    }

    #[test]
    fn test_manual_trigger_and_refill() {
        let mut shake = ShakeDetector::new(ShakeTuning::default(), 5);
        assert!(matches!(shake.trigger(0.0), BoostOutcome::Accepted { .. }));
        assert_eq!(shake.trigger(100.0), BoostOutcome::Rejected(BoostRejection::Cooldown));
        assert_eq!(shake.add_charge(), 3);
        assert_eq!(shake.add_charge(), 3);

        shake.reset();
        assert_eq!(shake.charges(), 3);
        assert!(matches!(shake.trigger(100.0), BoostOutcome::Accepted { .. }));
    }
}
