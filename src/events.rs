//! Outbound notifications
//!
//! The simulation and session push [`GameEvent`]s; the host drains them after
//! each frame and hands them to a [`Presenter`]. Nothing flows back.

use glam::Vec2;

use crate::haptics::HapticPattern;
use crate::session::SessionState;

#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    UpdateScore(u64),
    /// Whole seconds left, rounded up
    UpdateTimer(u32),
    UpdateTargetsFound { found: usize, total: usize },
    UpdateBoostCharges(u8),
    Toast(String),
    /// Screen position
    ScorePopup { pos: Vec2, points: u64, perfect: bool },
    /// Radians, screen coords (y down), from the character to the target
    DirectionIndicator(f32),
    Success { score: u64, time_left_secs: u32, stars: u8 },
    Failure { found: usize, total: usize, score: u64 },
    CalibrationProgress(f32),
    Error(String),
    StateChanged(SessionState),
    Haptic(HapticPattern),
}

/// HUD and screens
///
/// Only the HUD counters and the two end screens are required; the rest
/// default to doing nothing.
pub trait Presenter {
    fn update_score(&mut self, score: u64);
    fn update_timer(&mut self, secs: u32);
    fn update_targets_found(&mut self, found: usize, total: usize);
    fn update_boost_charges(&mut self, charges: u8);
    fn show_success(&mut self, score: u64, time_left_secs: u32, stars: u8);
    fn show_failure(&mut self, found: usize, total: usize, score: u64);

    fn show_toast(&mut self, _message: &str) {}
    fn show_score_popup(&mut self, _pos: Vec2, _points: u64, _perfect: bool) {}
    fn show_direction_indicator(&mut self, _angle: f32) {}
    fn show_calibration_progress(&mut self, _fraction: f32) {}
    fn show_error(&mut self, _message: &str) {}
    fn state_changed(&mut self, _state: SessionState) {}
}

/// Route one event to the presenter. Haptic requests are not presentation
/// and are skipped; returns them so the caller can play them.
pub fn present(presenter: &mut dyn Presenter, event: &GameEvent) -> Option<HapticPattern> {
    match event {
        GameEvent::UpdateScore(score) => presenter.update_score(*score),
        GameEvent::UpdateTimer(secs) => presenter.update_timer(*secs),
        GameEvent::UpdateTargetsFound { found, total } => {
            presenter.update_targets_found(*found, *total)
        }
        GameEvent::UpdateBoostCharges(n) => presenter.update_boost_charges(*n),
        GameEvent::Toast(message) => presenter.show_toast(message),
        GameEvent::ScorePopup { pos, points, perfect } => {
            presenter.show_score_popup(*pos, *points, *perfect)
        }
        GameEvent::DirectionIndicator(angle) => presenter.show_direction_indicator(*angle),
        GameEvent::Success { score, time_left_secs, stars } => {
            presenter.show_success(*score, *time_left_secs, *stars)
        }
        GameEvent::Failure { found, total, score } => presenter.show_failure(*found, *total, *score),
        GameEvent::CalibrationProgress(fraction) => presenter.show_calibration_progress(*fraction),
        GameEvent::Error(message) => presenter.show_error(message),
        GameEvent::StateChanged(state) => presenter.state_changed(*state),
        GameEvent::Haptic(pattern) => return Some(*pattern),
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Hud {
        score: u64,
        found: (usize, usize),
        toasts: Vec<String>,
    }

    impl Presenter for Hud {
        fn update_score(&mut self, score: u64) {
            self.score = score;
        }
        fn update_timer(&mut self, _secs: u32) {}
        fn update_targets_found(&mut self, found: usize, total: usize) {
            self.found = (found, total);
        }
        fn update_boost_charges(&mut self, _charges: u8) {}
        fn show_success(&mut self, _score: u64, _time_left_secs: u32, _stars: u8) {}
        fn show_failure(&mut self, _found: usize, _total: usize, _score: u64) {}
        fn show_toast(&mut self, message: &str) {
            self.toasts.push(message.to_string());
        }
    }

    #[test]
    fn test_present_routes_events() {
        let mut hud = Hud::default();
        assert_eq!(present(&mut hud, &GameEvent::UpdateScore(340)), None);
        present(&mut hud, &GameEvent::UpdateTargetsFound { found: 2, total: 5 });
        present(&mut hud, &GameEvent::Toast("Chimney spotted!".into()));
        // Default no-op
        present(&mut hud, &GameEvent::DirectionIndicator(1.0));

        assert_eq!(hud.score, 340);
        assert_eq!(hud.found, (2, 5));
        assert_eq!(hud.toasts, vec!["Chimney spotted!".to_string()]);
    }

    #[test]
    fn test_haptics_are_handed_back() {
        let mut hud = Hud::default();
        let pattern = present(&mut hud, &GameEvent::Haptic(HapticPattern::Perfect));
        assert_eq!(pattern, Some(HapticPattern::Perfect));
    }
}
