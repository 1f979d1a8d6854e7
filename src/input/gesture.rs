//! Pointer gesture disambiguation
//!
//! One pointer at a time is classified as tap, double-tap (radar), hold or
//! drag. A second pointer going down while the first is still pressed is a
//! two-finger tap, which suppresses single-pointer classification until
//! every pointer has lifted.
//!
//! Single taps wait out the double-tap window before they are emitted so a
//! double-tap can consume them. The host must call [`GestureRecognizer::poll`]
//! every tick to fire hold timers and flush pending taps.
//!
//! Classification (jitter, double-tap distance) works on screen points.
//! Emitted gestures carry world points, fixed with the camera offset current
//! when the pointer went down or up, so a pending tap keeps aiming at what
//! was under the finger while the camera moves on.

use glam::Vec2;

use crate::tuning::GestureTuning;

/// Semantic gestures produced by the recognizer. Points are world
/// coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gesture {
    Tap(Vec2),
    /// Double-tap with the radar cooldown elapsed
    Radar(Vec2),
    /// Double-tap inside the radar cooldown
    RadarCooling { remaining_ms: f64 },
    HoldStart(Vec2),
    HoldEnd(Vec2),
    TwoFingerTap,
}

#[derive(Debug, Clone, Copy)]
struct Press {
    id: i32,
    origin: Vec2,
    /// `origin` in world space
    anchor: Vec2,
    started_at: f64,
    hold_fired: bool,
    dragged: bool,
}

#[derive(Debug, Clone, Copy)]
struct PendingTap {
    screen: Vec2,
    world: Vec2,
    at: f64,
}

#[derive(Debug, Clone)]
pub struct GestureRecognizer {
    tuning: GestureTuning,
    /// Screen to world offset
    camera: Vec2,
    down: Vec<i32>,
    press: Option<Press>,
    multi_touch: bool,
    pending_tap: Option<PendingTap>,
    radar_ready_at: f64,
}

impl GestureRecognizer {
    pub fn new(tuning: GestureTuning) -> Self {
        Self {
            tuning,
            camera: Vec2::ZERO,
            down: Vec::with_capacity(2),
            press: None,
            multi_touch: false,
            pending_tap: None,
            radar_ready_at: f64::NEG_INFINITY,
        }
    }

    /// Camera offset for the pointer events that follow
    pub fn set_camera(&mut self, camera: Vec2) {
        self.camera = camera;
    }

    pub fn pointer_down(&mut self, id: i32, pos: Vec2, now: f64, out: &mut Vec<Gesture>) {
        if self.down.contains(&id) {
            return;
        }
        self.down.push(id);

        if self.down.len() >= 2 {
            if !self.multi_touch {
                self.multi_touch = true;
                if let Some(press) = self.press.take() {
                    if press.hold_fired {
                        out.push(Gesture::HoldEnd(press.anchor));
                    }
                }
                out.push(Gesture::TwoFingerTap);
            }
            return;
        }

        if self.multi_touch {
            return;
        }
        self.press = Some(Press {
            id,
            origin: pos,
            anchor: pos + self.camera,
            started_at: now,
            hold_fired: false,
            dragged: false,
        });
    }

    pub fn pointer_move(&mut self, id: i32, pos: Vec2) {
        if let Some(press) = self.press.as_mut() {
            if press.id == id
                && !press.hold_fired
                && press.origin.distance(pos) > self.tuning.move_jitter_px
            {
                press.dragged = true;
            }
        }
    }

    pub fn pointer_up(&mut self, id: i32, pos: Vec2, now: f64, out: &mut Vec<Gesture>) {
        let Some(idx) = self.down.iter().position(|&d| d == id) else {
            return;
        };
        self.down.swap_remove(idx);

        if self.multi_touch {
            if self.down.is_empty() {
                self.multi_touch = false;
            }
            return;
        }

        let Some(press) = self.press.take_if(|p| p.id == id) else {
            return;
        };
        if press.hold_fired {
            out.push(Gesture::HoldEnd(pos + self.camera));
            return;
        }
        if press.dragged {
            return;
        }
        self.release_tap(pos, now, out);
    }

    /// Pointer lost (e.g. touchcancel). Never produces a tap.
    pub fn pointer_cancel(&mut self, id: i32, out: &mut Vec<Gesture>) {
        let Some(idx) = self.down.iter().position(|&d| d == id) else {
            return;
        };
        self.down.swap_remove(idx);
        if self.down.is_empty() {
            self.multi_touch = false;
        }
        if let Some(press) = self.press.take_if(|p| p.id == id) {
            if press.hold_fired {
                out.push(Gesture::HoldEnd(press.anchor));
            }
        }
    }

    /// Fire the hold timer and flush a single tap whose window has passed
    pub fn poll(&mut self, now: f64, out: &mut Vec<Gesture>) {
        if let Some(press) = self.press.as_mut() {
            if !press.hold_fired && !press.dragged && now - press.started_at >= self.tuning.hold_ms {
                press.hold_fired = true;
                out.push(Gesture::HoldStart(press.anchor));
            }
        }
        if let Some(tap) = self.pending_tap {
            if now - tap.at >= self.tuning.double_tap_ms {
                self.pending_tap = None;
                out.push(Gesture::Tap(tap.world));
            }
        }
    }

    /// Drop all in-flight state (pause, level restart)
    pub fn clear(&mut self) {
        self.down.clear();
        self.press = None;
        self.multi_touch = false;
        self.pending_tap = None;
    }

    /// Make radar available immediately (new level)
    pub fn reset_radar(&mut self) {
        self.radar_ready_at = f64::NEG_INFINITY;
    }

    pub fn radar_ready_at(&self) -> f64 {
        self.radar_ready_at
    }

    fn release_tap(&mut self, pos: Vec2, now: f64, out: &mut Vec<Gesture>) {
        let world = pos + self.camera;
        if let Some(prev) = self.pending_tap.take() {
            let quick = now - prev.at < self.tuning.double_tap_ms;
            let close = prev.screen.distance(pos) < self.tuning.double_tap_px;
            if quick && close {
                if now >= self.radar_ready_at {
                    self.radar_ready_at = now + self.tuning.radar_cooldown_ms;
                    out.push(Gesture::Radar(world));
                } else {
                    out.push(Gesture::RadarCooling {
                        remaining_ms: self.radar_ready_at - now,
                    });
                }
                return;
            }
            // Unrelated earlier tap stands on its own
            out.push(Gesture::Tap(prev.world));
        }
        self.pending_tap = Some(PendingTap {
            screen: pos,
            world,
            at: now,
        });
    }
}
