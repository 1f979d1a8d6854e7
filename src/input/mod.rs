//! Input normalizers
//!
//! Host event handlers never touch gameplay state. They queue
//! [`InputEvent`]s; the session drains the queue at the start of a tick and
//! runs each event through [`Controls`], which turns them into [`Signal`]s.

pub mod gesture;
pub mod shake;
pub mod tilt;

pub use gesture::{Gesture, GestureRecognizer};
pub use shake::{BoostOutcome, BoostRejection, BoostState, ShakeDetector};
pub use tilt::{Calibration, CalibrationStep, DirectionalKeys, TiltInput, TiltSource};

use glam::{Vec2, Vec3};

use crate::settings::Settings;
use crate::tuning::Tuning;

/// Direction keys / on-screen arrows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Raw host input, stamped with game-clock time when drained
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Device orientation in degrees
    Orientation { gamma: f32, beta: f32 },
    /// Acceleration including gravity (m/s^2)
    Motion { x: f32, y: f32, z: f32 },
    PointerDown { id: i32, pos: Vec2 },
    PointerMove { id: i32, pos: Vec2 },
    PointerUp { id: i32, pos: Vec2 },
    PointerCancel { id: i32 },
    Direction { dir: Direction, pressed: bool },
    /// On-screen boost button or key
    BoostButton,
}

/// Normalized gameplay signals for one tick. Points are world coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Signal {
    Boost { charges_left: u8, overheated: bool },
    BoostRejected { reason: BoostRejection, manual: bool },
    Tap(Vec2),
    Radar(Vec2),
    RadarCooling { remaining_ms: f64 },
    HoldStart(Vec2),
    HoldEnd(Vec2),
    Pause,
    Calibration(CalibrationStep),
}

/// All normalizers for one player
#[derive(Debug, Clone)]
pub struct Controls {
    pub tilt: TiltInput,
    pub shake: ShakeDetector,
    pub gestures: GestureRecognizer,
    scratch: Vec<Gesture>,
}

impl Controls {
    pub fn new(tuning: &Tuning, settings: &Settings) -> Self {
        Self {
            tilt: TiltInput::new(tuning.tilt.clone(), settings.tilt_sensitivity),
            shake: ShakeDetector::new(tuning.shake.clone(), settings.shake_sensitivity),
            gestures: GestureRecognizer::new(tuning.gesture.clone()),
            scratch: Vec::new(),
        }
    }

    pub fn apply_settings(&mut self, settings: &Settings) {
        self.tilt.set_sensitivity(settings.tilt_sensitivity);
        self.shake.set_sensitivity(settings.shake_sensitivity);
    }

    /// Screen to world offset for pointer events; set before each batch
    pub fn set_camera(&mut self, camera: Vec2) {
        self.gestures.set_camera(camera);
    }

    /// Run one raw event through the normalizers
    pub fn handle(&mut self, event: InputEvent, now: f64, out: &mut Vec<Signal>) {
        match event {
            InputEvent::Orientation { gamma, beta } => {
                if let Some(step) = self.tilt.feed_orientation(gamma, beta, now) {
                    if step != CalibrationStep::Skipped {
                        out.push(Signal::Calibration(step));
                    }
                }
            }
            InputEvent::Motion { x, y, z } => {
                if let Some(outcome) = self.shake.feed_motion(Vec3::new(x, y, z), now) {
                    out.push(boost_signal(outcome, false));
                }
            }
            InputEvent::BoostButton => {
                let outcome = self.shake.trigger(now);
                out.push(boost_signal(outcome, true));
            }
            InputEvent::Direction { dir, pressed } => {
                let mut keys = self.tilt.keys();
                match dir {
                    Direction::Up => keys.up = pressed,
                    Direction::Down => keys.down = pressed,
                    Direction::Left => keys.left = pressed,
                    Direction::Right => keys.right = pressed,
                }
                self.tilt.set_key(keys);
            }
            InputEvent::PointerDown { id, pos } => {
                self.gestures.pointer_down(id, pos, now, &mut self.scratch);
            }
            InputEvent::PointerMove { id, pos } => self.gestures.pointer_move(id, pos),
            InputEvent::PointerUp { id, pos } => {
                self.gestures.pointer_up(id, pos, now, &mut self.scratch);
            }
            InputEvent::PointerCancel { id } => {
                self.gestures.pointer_cancel(id, &mut self.scratch);
            }
        }
        self.flush_gestures(out);
    }

    /// Per-tick timers: hold detection, pending taps, key smoothing
    pub fn poll(&mut self, now: f64, out: &mut Vec<Signal>) {
        self.tilt.tick();
        self.gestures.poll(now, &mut self.scratch);
        self.flush_gestures(out);
    }

    /// Latest steering sample
    pub fn steering(&self) -> Vec2 {
        self.tilt.steering()
    }

    /// Per-level reset: fresh charges, no in-flight gestures, level filter
    pub fn reset_for_level(&mut self) {
        self.shake.reset();
        self.gestures.clear();
        self.gestures.reset_radar();
        self.tilt.settle();
    }

    fn flush_gestures(&mut self, out: &mut Vec<Signal>) {
        out.extend(self.scratch.drain(..).map(|g| match g {
            Gesture::Tap(p) => Signal::Tap(p),
            Gesture::Radar(p) => Signal::Radar(p),
            Gesture::RadarCooling { remaining_ms } => Signal::RadarCooling { remaining_ms },
            Gesture::HoldStart(p) => Signal::HoldStart(p),
            Gesture::HoldEnd(p) => Signal::HoldEnd(p),
            Gesture::TwoFingerTap => Signal::Pause,
        }));
    }
}

fn boost_signal(outcome: BoostOutcome, manual: bool) -> Signal {
    match outcome {
        BoostOutcome::Accepted { charges_left, overheated } => Signal::Boost {
            charges_left,
            overheated,
        },
        BoostOutcome::Rejected(reason) => Signal::BoostRejected { reason, manual },
    }
}
