//! Platform helpers shared by the browser and native hosts
//!
//! - Frame timing from host timestamps (ms)
//! - Keyboard mapping onto game inputs

use crate::consts::SIM_DT_MS;
use crate::input::Direction;

/// Turns host frame timestamps into frame deltas and tracks FPS
#[derive(Debug, Clone)]
pub struct FrameTimer {
    last: Option<f64>,
    frame_times: [f64; 60],
    frame_index: usize,
    fps: u32,
}

impl Default for FrameTimer {
    fn default() -> Self {
        Self {
            last: None,
            frame_times: [0.0; 60],
            frame_index: 0,
            fps: 0,
        }
    }
}

impl FrameTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Milliseconds since the previous frame. The first frame counts as one
    /// tick; clock jumps backwards count as zero.
    pub fn frame(&mut self, time: f64) -> f64 {
        let dt = match self.last {
            Some(last) => (time - last).max(0.0),
            None => SIM_DT_MS,
        };
        self.last = Some(time);

        self.frame_times[self.frame_index] = time;
        self.frame_index = (self.frame_index + 1) % self.frame_times.len();
        let oldest = self.frame_times[self.frame_index];
        if oldest > 0.0 && time > oldest {
            let frames = (self.frame_times.len() - 1) as f64;
            self.fps = (frames * 1000.0 / (time - oldest)).round() as u32;
        }
        dt
    }

    /// Forget the previous timestamp (after the page was hidden)
    pub fn reset(&mut self) {
        self.last = None;
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }
}

/// What a keyboard key does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Steer(Direction),
    Boost,
    Pause,
    ToggleAutopilot,
}

/// Map a DOM `KeyboardEvent.key` value
pub fn key_action(key: &str) -> Option<KeyAction> {
    let action = match key {
        "ArrowUp" | "w" | "W" => KeyAction::Steer(Direction::Up),
        "ArrowDown" | "s" | "S" => KeyAction::Steer(Direction::Down),
        "ArrowLeft" | "a" | "A" => KeyAction::Steer(Direction::Left),
        "ArrowRight" | "d" | "D" => KeyAction::Steer(Direction::Right),
        " " | "Shift" => KeyAction::Boost,
        "Escape" | "p" | "P" => KeyAction::Pause,
        "i" | "I" => KeyAction::ToggleAutopilot,
        _ => return None,
    };
    Some(action)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_frame_is_one_tick() {
        let mut timer = FrameTimer::new();
        assert_eq!(timer.frame(5000.0), SIM_DT_MS);
        assert_eq!(timer.frame(5020.0), 20.0);
        assert_eq!(timer.frame(5010.0), 0.0);
        timer.reset();
        assert_eq!(timer.frame(9000.0), SIM_DT_MS);
    }

    #[test]
    fn test_fps_at_steady_rate() {
        let mut timer = FrameTimer::new();
        for i in 1..=120 {
            timer.frame(i as f64 * 20.0);
        }
        assert_eq!(timer.fps(), 50);
    }

    #[test]
    fn test_key_mapping() {
        assert_eq!(key_action("ArrowLeft"), Some(KeyAction::Steer(Direction::Left)));
        assert_eq!(key_action("D"), Some(KeyAction::Steer(Direction::Right)));
        assert_eq!(key_action(" "), Some(KeyAction::Boost));
        assert_eq!(key_action("Escape"), Some(KeyAction::Pause));
        assert_eq!(key_action("q"), None);
    }
}
