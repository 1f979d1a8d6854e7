//! Session controller
//!
//! Owns everything for one player: controls, the current world, progress and
//! storage. Host code only calls into it:
//! - `push_input` from event handlers (queued, never applied directly)
//! - `frame` once per display refresh
//! - the menu operations (`play`, `pause`, `retry`, ...)
//! - `flush` to hand queued [`GameEvent`]s to the presentation layer

use std::collections::VecDeque;

use glam::Vec2;
use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::events::{GameEvent, Presenter, present};
use crate::haptics::Haptics;
use crate::input::{CalibrationStep, Controls, InputEvent, Signal};
use crate::persistence::Storage;
use crate::progress::Progress;
use crate::settings::Settings;
use crate::sim::levels;
use crate::sim::{Outcome, TickInput, World};
use crate::tuning::Tuning;

/// Exactly one is active at a time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    Menu,
    /// Waiting for the host to ask for motion sensor access
    Permission,
    Calibrating,
    Playing,
    Paused,
    Success,
    GameOver,
}

impl SessionState {
    /// States in which ticks run and input is consumed
    pub fn is_active(&self) -> bool {
        matches!(self, SessionState::Calibrating | SessionState::Playing)
    }
}

/// What the host knows about motion sensors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SensorAccess {
    /// Not asked yet
    Unknown,
    Granted,
    Denied,
    /// No sensor API on this platform
    Unavailable,
}

/// Longest host frame fed to the accumulator (ms)
const MAX_FRAME_MS: f64 = 100.0;

pub struct Session {
    state: SessionState,
    tuning: Tuning,
    settings: Settings,
    controls: Controls,
    world: World,
    progress: Progress,
    storage: Box<dyn Storage>,
    sensors: SensorAccess,
    level_index: u32,
    base_seed: u64,
    attempts: u64,
    /// Session clock (ms); drives the input normalizers
    clock: f64,
    accumulator: f64,
    queue: VecDeque<InputEvent>,
    signals: Vec<Signal>,
    events: Vec<GameEvent>,
    autopilot: bool,
}

impl Session {
    /// Create a session, loading settings and progress from `storage`
    pub fn new(tuning: Tuning, storage: Box<dyn Storage>, seed: u64) -> Self {
        let settings = Settings::load(storage.as_ref());
        let progress = Progress::load(storage.as_ref(), levels::authored_count());
        let controls = Controls::new(&tuning, &settings);
        let view = Vec2::new(DEFAULT_VIEW_WIDTH, DEFAULT_VIEW_HEIGHT);
        let world = World::new(seed, view, &tuning);
        Self {
            state: SessionState::Menu,
            tuning,
            settings,
            controls,
            world,
            progress,
            storage,
            sensors: SensorAccess::Unknown,
            level_index: 0,
            base_seed: seed,
            attempts: 0,
            clock: 0.0,
            accumulator: 0.0,
            queue: VecDeque::new(),
            signals: Vec::new(),
            events: Vec::new(),
            autopilot: false,
        }
    }

    // === Accessors ===

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn progress(&self) -> &Progress {
        &self.progress
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn controls(&self) -> &Controls {
        &self.controls
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn sensors(&self) -> SensorAccess {
        self.sensors
    }

    pub fn level_index(&self) -> u32 {
        self.level_index
    }

    pub fn clock(&self) -> f64 {
        self.clock
    }

    pub fn queued_inputs(&self) -> usize {
        self.queue.len()
    }

    // === Configuration ===

    /// Record what the platform reported about motion sensors before play
    pub fn set_sensor_access(&mut self, access: SensorAccess) {
        self.sensors = access;
        if matches!(access, SensorAccess::Denied | SensorAccess::Unavailable) {
            self.controls.tilt.use_keys();
        }
    }

    /// Apply and persist new settings
    pub fn apply_settings(&mut self, settings: Settings) {
        self.settings = settings.sanitized();
        self.controls.apply_settings(&self.settings);
        self.settings.save(self.storage.as_mut());
    }

    /// Demo mode: the world steers and taps for itself
    pub fn set_autopilot(&mut self, on: bool) {
        if self.autopilot != on {
            info!("Autopilot {}", if on { "on" } else { "off" });
        }
        self.autopilot = on;
    }

    pub fn autopilot(&self) -> bool {
        self.autopilot
    }

    // === Input ===

    /// Queue a host event for the next tick. Dropped unless a tick will
    /// consume it.
    pub fn push_input(&mut self, event: InputEvent) {
        if self.state.is_active() {
            self.queue.push_back(event);
        }
    }

    // === Transitions ===

    /// Menu: start a level, going through permission or calibration first
    /// when needed. Returns false for a locked level.
    pub fn play(&mut self, level: u32) -> bool {
        if !self.progress.is_unlocked(level) {
            self.toast(format!("Level {} is locked", level + 1));
            return false;
        }
        self.level_index = level;

        let use_sensors = !self.settings.prefer_buttons
            && !matches!(self.sensors, SensorAccess::Denied | SensorAccess::Unavailable);
        if !use_sensors {
            self.controls.tilt.use_keys();
            self.enter_level();
        } else if self.sensors == SensorAccess::Unknown {
            self.set_state(SessionState::Permission);
        } else if !self.controls.tilt.calibration().is_calibrated() {
            self.begin_calibration();
        } else {
            self.enter_level();
        }
        true
    }

    /// Permission prompt answered
    pub fn grant_permission(&mut self, granted: bool) {
        if self.state != SessionState::Permission {
            return;
        }
        if granted {
            self.sensors = SensorAccess::Granted;
            self.begin_calibration();
        } else {
            warn!("Motion sensor permission denied, using buttons");
            self.set_sensor_access(SensorAccess::Denied);
            self.toast("Motion sensors unavailable - use the arrows to steer".into());
            self.enter_level();
        }
    }

    /// Abandon calibration and play with the current (uncalibrated) offset
    pub fn skip_calibration(&mut self) {
        if self.state != SessionState::Calibrating {
            return;
        }
        self.controls.tilt.calibration_mut().cancel();
        self.enter_level();
    }

    pub fn pause(&mut self) {
        if self.state == SessionState::Playing {
            self.set_state(SessionState::Paused);
        }
    }

    pub fn resume(&mut self) {
        if self.state == SessionState::Paused {
            // Presses that straddled the pause are stale
            self.controls.gestures.clear();
            self.accumulator = 0.0;
            self.set_state(SessionState::Playing);
        }
    }

    /// Back to the menu from anywhere
    pub fn quit(&mut self) {
        if self.state == SessionState::Menu {
            return;
        }
        if self.state == SessionState::Calibrating {
            self.controls.tilt.calibration_mut().cancel();
        }
        self.queue.clear();
        self.set_state(SessionState::Menu);
    }

    /// Replay the level that just ended
    pub fn retry(&mut self) {
        if matches!(self.state, SessionState::Success | SessionState::GameOver) {
            self.enter_level();
        }
    }

    /// Go on to the next level after a success. Returns false outside
    /// Success or when the next level is locked.
    pub fn next_level(&mut self) -> bool {
        if self.state != SessionState::Success {
            return false;
        }
        let next = self.level_index + 1;
        if !self.progress.is_unlocked(next) {
            self.toast(format!("Level {} is locked", next + 1));
            return false;
        }
        self.level_index = next;
        self.enter_level();
        true
    }

    /// Viewport changed (screen pixels)
    pub fn resize(&mut self, width: f32, height: f32) {
        self.world.resize(Vec2::new(width, height));
    }

    // === Frame loop ===

    /// Advance by one host frame of `dt_ms` milliseconds. Runs whole fixed
    /// ticks only; the remainder carries to the next frame.
    pub fn frame(&mut self, dt_ms: f64) -> u32 {
        if !self.state.is_active() {
            self.accumulator = 0.0;
            return 0;
        }
        self.accumulator += dt_ms.clamp(0.0, MAX_FRAME_MS);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT_MS && substeps < MAX_SUBSTEPS {
            self.tick();
            self.accumulator -= SIM_DT_MS;
            substeps += 1;
            if !self.state.is_active() {
                self.accumulator = 0.0;
                break;
            }
        }
        substeps
    }

    /// One fixed step: drain input, run normalizers, advance the world
    pub fn tick(&mut self) {
        if !self.state.is_active() {
            return;
        }
        self.clock += SIM_DT_MS;
        let now = self.clock;

        let mut signals = std::mem::take(&mut self.signals);
        signals.clear();
        // Pointer positions refer to the last frame drawn
        self.controls.set_camera(self.world.camera);
        while let Some(event) = self.queue.pop_front() {
            self.controls.handle(event, now, &mut signals);
        }
        self.controls.poll(now, &mut signals);

        match self.state {
            SessionState::Calibrating => self.calibration_tick(&signals),
            SessionState::Playing => self.play_tick(&signals, now),
            _ => {}
        }
        self.signals = signals;
    }

    fn calibration_tick(&mut self, signals: &[Signal]) {
        for signal in signals {
            match signal {
                Signal::Calibration(CalibrationStep::Progress(fraction)) => {
                    self.events.push(GameEvent::CalibrationProgress(*fraction));
                }
                Signal::Calibration(CalibrationStep::Done(offset)) => {
                    info!("Calibrated: offset ({:.1}, {:.1})", offset.x, offset.y);
                    self.events.push(GameEvent::CalibrationProgress(1.0));
                    self.enter_level();
                    return;
                }
                _ => {}
            }
        }
    }

    fn play_tick(&mut self, signals: &[Signal], now: f64) {
        let input = TickInput {
            steering: self.controls.steering(),
            signals: signals.to_vec(),
            overheated: self.controls.shake.is_overheated(now),
            autopilot: self.autopilot,
        };
        let report = crate::sim::tick(&mut self.world, &input, &self.tuning, &mut self.events);

        for _ in 0..report.charges_granted {
            let charges = self.controls.shake.add_charge();
            self.events.push(GameEvent::UpdateBoostCharges(charges));
        }

        match report.finished {
            Some(Outcome::Complete) => self.finish_success(),
            Some(Outcome::TimedOut | Outcome::Failed) => self.set_state(SessionState::GameOver),
            Some(Outcome::Running) | None => {
                // Signals from the same batch have already landed
                if signals.contains(&Signal::Pause) {
                    self.pause();
                }
            }
        }
    }

    fn finish_success(&mut self) {
        let Some(result) = self.world.result else {
            return;
        };
        let record = self.progress.record_completion(
            self.level_index,
            self.world.score,
            result.stars,
            result.all_delivered,
        );
        if record.new_high_score {
            self.toast("New best score!".into());
        }
        if record.unlocked_next {
            self.toast(format!("Level {} unlocked!", self.level_index + 2));
        }
        self.progress.save(self.storage.as_mut());
        self.set_state(SessionState::Success);
    }

    fn begin_calibration(&mut self) {
        self.controls.tilt.calibration_mut().start();
        self.queue.clear();
        self.events.push(GameEvent::CalibrationProgress(0.0));
        self.set_state(SessionState::Calibrating);
    }

    /// Generate the current level and start playing it. Generation faults
    /// surface as an error event and send the session back to the menu.
    fn enter_level(&mut self) {
        let config = levels::level(self.level_index);
        let seed = self
            .base_seed
            .wrapping_add(self.attempts.wrapping_mul(0x9E37_79B9_7F4A_7C15));
        self.attempts += 1;

        if let Err(e) = crate::sim::start_level(&mut self.world, config, seed, &self.tuning) {
            error!("Level {} failed to start: {e}", self.level_index + 1);
            self.events.push(GameEvent::Error(e.to_string()));
            self.queue.clear();
            self.set_state(SessionState::Menu);
            return;
        }

        self.controls.reset_for_level();
        self.controls.apply_settings(&self.settings);
        self.queue.clear();
        self.accumulator = 0.0;
        self.push_hud();
        self.set_state(SessionState::Playing);
    }

    /// Full HUD refresh for a fresh level
    fn push_hud(&mut self) {
        let world = &self.world;
        self.events.extend([
            GameEvent::UpdateScore(world.score),
            GameEvent::UpdateTimer(world.timer_secs()),
            GameEvent::UpdateTargetsFound {
                found: world.chimneys.delivered(),
                total: world.chimneys.total(),
            },
            GameEvent::UpdateBoostCharges(self.controls.shake.charges()),
        ]);
    }

    fn set_state(&mut self, state: SessionState) {
        if self.state == state {
            return;
        }
        debug!("Session {:?} -> {:?}", self.state, state);
        info!("State: {state:?}");
        self.state = state;
        self.events.push(GameEvent::StateChanged(state));
    }

    fn toast(&mut self, message: String) {
        self.events.push(GameEvent::Toast(message));
    }

    // === Output ===

    /// Take all queued events
    pub fn drain_events(&mut self) -> impl Iterator<Item = GameEvent> + '_ {
        self.events.drain(..)
    }

    /// Hand queued events to the presenter and play haptic requests
    pub fn flush(&mut self, presenter: &mut dyn Presenter, haptics: &Haptics) {
        for event in self.events.drain(..) {
            if let Some(pattern) = present(presenter, &event) {
                haptics.play(pattern);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Direction;
    use crate::persistence::MemoryStorage;
    use crate::sim::{ChimneyState, Chimneys};

    fn session() -> Session {
        Session::new(Tuning::default(), Box::new(MemoryStorage::default()), 7)
    }

    fn buttons_session() -> Session {
        let mut s = session();
        s.set_sensor_access(SensorAccess::Unavailable);
        s
    }

    fn states(events: &[GameEvent]) -> Vec<SessionState> {
        events
            .iter()
            .filter_map(|e| match e {
                GameEvent::StateChanged(s) => Some(*s),
                _ => None,
            })
            .collect()
    }

    fn run_ticks(s: &mut Session, n: usize) {
        for _ in 0..n {
            s.tick();
        }
    }

    #[test]
    fn test_fallback_goes_straight_to_playing() {
        let mut s = buttons_session();
        assert!(s.play(0));
        assert_eq!(s.state(), SessionState::Playing);
        let events: Vec<_> = s.drain_events().collect();
        assert_eq!(states(&events), vec![SessionState::Playing]);
        assert!(events.contains(&GameEvent::UpdateTimer(90)));
        assert!(events.contains(&GameEvent::UpdateBoostCharges(3)));
    }

    #[test]
    fn test_locked_level_stays_in_menu() {
        let mut s = buttons_session();
        assert!(!s.play(3));
        assert_eq!(s.state(), SessionState::Menu);
    }

    #[test]
    fn test_permission_then_calibration() {
        let mut s = session();
        s.play(0);
        assert_eq!(s.state(), SessionState::Permission);
        s.grant_permission(true);
        assert_eq!(s.state(), SessionState::Calibrating);
        assert!(s.controls().tilt.calibration().is_collecting());

        // Host delivers a reading every frame; samples are 100ms apart
        for _ in 0..400 {
            s.push_input(InputEvent::Orientation { gamma: 4.0, beta: 30.0 });
            s.tick();
            if s.state() == SessionState::Playing {
                break;
            }
        }
        assert_eq!(s.state(), SessionState::Playing);
        let calibration = s.controls().tilt.calibration();
        assert!(calibration.is_calibrated());
        assert_eq!(calibration.offset(), Vec2::new(4.0, 30.0));

        // Holding the calibrated pose steers nowhere
        for _ in 0..60 {
            s.push_input(InputEvent::Orientation { gamma: 4.0, beta: 30.0 });
            s.tick();
        }
        assert!(s.controls().steering().length() < 1e-3);
    }

    #[test]
    fn test_permission_denied_falls_back() {
        let mut s = session();
        s.play(0);
        s.grant_permission(false);
        assert_eq!(s.state(), SessionState::Playing);
        assert_eq!(s.sensors(), SensorAccess::Denied);
    }

    #[test]
    fn test_skip_calibration_leaves_uncalibrated() {
        let mut s = session();
        s.play(0);
        s.grant_permission(true);
        for _ in 0..30 {
            s.push_input(InputEvent::Orientation { gamma: 1.0, beta: 1.0 });
            s.tick();
        }
        s.skip_calibration();
        assert_eq!(s.state(), SessionState::Playing);
        let calibration = s.controls().tilt.calibration();
        assert!(!calibration.is_calibrated());
        assert!(!calibration.is_collecting());
    }

    #[test]
    fn test_two_finger_tap_pauses_and_freezes_clock() {
        let mut s = buttons_session();
        s.play(0);
        run_ticks(&mut s, 5);
        s.push_input(InputEvent::PointerDown { id: 1, pos: Vec2::new(10.0, 10.0) });
        s.push_input(InputEvent::PointerDown { id: 2, pos: Vec2::new(90.0, 10.0) });
        s.tick();
        assert_eq!(s.state(), SessionState::Paused);

        let clock = s.world().clock;
        let left = s.world().time_left;
        assert_eq!(s.frame(1000.0), 0);
        s.push_input(InputEvent::BoostButton);
        assert_eq!(s.queued_inputs(), 0);
        assert_eq!(s.world().clock, clock);
        assert_eq!(s.world().time_left, left);

        s.resume();
        assert_eq!(s.state(), SessionState::Playing);
        s.tick();
        assert!(s.world().clock > clock);
    }

    #[test]
    fn test_frame_accumulates_fixed_steps() {
        let mut s = buttons_session();
        s.play(0);
        assert_eq!(s.frame(10.0), 0);
        assert_eq!(s.frame(10.0), 1);
        // A long hitch is capped
        assert_eq!(s.frame(5000.0), MAX_SUBSTEPS);
        assert_eq!(s.world().ticks, 1 + MAX_SUBSTEPS as u64);
    }

    #[test]
    fn test_timeout_is_game_over_with_counts() {
        let mut s = buttons_session();
        s.play(0);
        s.world.chimneys = Chimneys::from_positions(&[
            Vec2::new(100.0, 600.0),
            Vec2::new(200.0, 600.0),
            Vec2::new(300.0, 600.0),
            Vec2::new(380.0, 700.0),
            Vec2::new(1100.0, 600.0),
        ]);
        s.world.power_ups.clear();
        s.world.fog.add_temporary(Vec2::new(200.0, 600.0), 160.0, f64::MAX);
        s.tick();
        assert_eq!(s.world().chimneys.get(0).unwrap().state, ChimneyState::Visible);

        s.push_input(InputEvent::PointerDown { id: 1, pos: Vec2::new(100.0, 600.0) });
        s.push_input(InputEvent::PointerUp { id: 1, pos: Vec2::new(100.0, 600.0) });
        run_ticks(&mut s, 30);
        s.push_input(InputEvent::PointerDown { id: 1, pos: Vec2::new(300.0, 600.0) });
        s.push_input(InputEvent::PointerUp { id: 1, pos: Vec2::new(300.0, 600.0) });
        run_ticks(&mut s, 30);
        assert_eq!(s.world().chimneys.delivered(), 2);

        s.world.time_left = 0.01;
        s.drain_events().for_each(drop);
        s.tick();
        assert_eq!(s.state(), SessionState::GameOver);
        let events: Vec<_> = s.drain_events().collect();
        assert!(events.iter().any(|e| matches!(
            e,
            GameEvent::Failure { found: 2, total: 5, .. }
        )));
        assert_eq!(states(&events), vec![SessionState::GameOver]);

        s.retry();
        assert_eq!(s.state(), SessionState::Playing);
        assert_eq!(s.world().chimneys.delivered(), 0);
    }

    #[test]
    fn test_autopilot_success_unlocks_and_saves() {
        // Same seed the simulation's own autopilot run clears
        let mut s = Session::new(Tuning::default(), Box::new(MemoryStorage::default()), 2024);
        s.set_sensor_access(SensorAccess::Unavailable);
        s.set_autopilot(true);
        s.play(0);
        for _ in 0..(90 * 60) {
            s.tick();
            if s.state() != SessionState::Playing {
                break;
            }
        }
        assert_eq!(s.state(), SessionState::Success);
        assert!(s.progress().is_unlocked(1));
        assert!(s.progress().high_score(0).is_some());

        let saved = Progress::load(s.storage.as_ref(), levels::authored_count());
        assert_eq!(&saved, s.progress());

        assert!(s.next_level());
        assert_eq!(s.level_index(), 1);
        assert_eq!(s.world().chimneys.total(), 4);
    }

    #[test]
    fn test_tap_lands_where_it_was_aimed_while_flying() {
        let mut s = buttons_session();
        s.play(0);
        s.world.power_ups.clear();
        s.world.hazards.clear();
        s.push_input(InputEvent::Direction { dir: Direction::Right, pressed: true });
        run_ticks(&mut s, 40);
        assert!(s.world().character.vel.x > 5.0);

        let ahead = Vec2::new(s.world().character.pos.x + 100.0, 600.0);
        s.world.chimneys = Chimneys::from_positions(&[ahead, Vec2::new(1200.0, 700.0)]);
        s.world.fog.add_temporary(ahead, 160.0, f64::MAX);
        s.tick();
        assert_eq!(s.world().chimneys.get(0).unwrap().state, ChimneyState::Visible);

        let camera = s.world().camera;
        let on_screen = ahead - camera;
        s.push_input(InputEvent::PointerDown { id: 1, pos: on_screen });
        s.push_input(InputEvent::PointerUp { id: 1, pos: on_screen });
        run_ticks(&mut s, 30);

        assert!(s.world().camera.x - camera.x > 80.0);
        assert_eq!(s.world().chimneys.delivered(), 1);
        assert_eq!(s.state(), SessionState::Playing);
    }

    #[test]
    fn test_missed_chimney_is_game_over_without_record() {
        let mut s = buttons_session();
        s.play(0);
        s.world.chimneys = Chimneys::from_positions(&[Vec2::new(100.0, 600.0), Vec2::new(300.0, 600.0)]);
        s.world.power_ups.clear();
        s.world.fog.add_temporary(Vec2::new(200.0, 600.0), 200.0, f64::MAX);
        s.tick();
        assert_eq!(s.world().chimneys.spotted(), 2);

        s.world.character.pos = Vec2::new(1100.0, 300.0);
        s.drain_events().for_each(drop);
        s.tick();
        assert_eq!(s.state(), SessionState::GameOver);
        let events: Vec<_> = s.drain_events().collect();
        assert!(events.iter().any(|e| matches!(
            e,
            GameEvent::Failure { found: 0, total: 2, .. }
        )));
        assert!(!events.iter().any(|e| matches!(e, GameEvent::Success { .. })));
        assert!(s.progress().high_score(0).is_none());
        assert!(!s.progress().is_unlocked(1));
    }

    #[test]
    fn test_boost_in_the_pause_batch_still_lands() {
        let mut s = buttons_session();
        s.play(0);
        s.world.power_ups.clear();
        s.tick();
        s.push_input(InputEvent::BoostButton);
        s.push_input(InputEvent::PointerDown { id: 1, pos: Vec2::new(10.0, 10.0) });
        s.push_input(InputEvent::PointerDown { id: 2, pos: Vec2::new(90.0, 10.0) });
        s.tick();
        assert_eq!(s.state(), SessionState::Paused);
        assert_eq!(s.controls().shake.charges(), 2);
        assert_eq!(s.world().boosts_used, 1);
        assert!(s.world().character.is_boosting(s.world().clock));
    }

    #[test]
    fn test_direction_keys_move_the_character() {
        let mut s = buttons_session();
        s.play(0);
        let start = s.world().character.pos;
        s.push_input(InputEvent::Direction { dir: Direction::Right, pressed: true });
        run_ticks(&mut s, 60);
        assert!(s.world().character.pos.x > start.x);
    }

    #[test]
    fn test_quit_and_bad_viewport_error() {
        let mut s = buttons_session();
        s.play(0);
        s.quit();
        assert_eq!(s.state(), SessionState::Menu);

        s.resize(120.0, 90.0);
        s.drain_events().for_each(drop);
        s.play(0);
        assert_eq!(s.state(), SessionState::Menu);
        let events: Vec<_> = s.drain_events().collect();
        assert!(events.iter().any(|e| matches!(e, GameEvent::Error(_))));
    }

    #[test]
    fn test_flush_routes_to_presenter_and_haptics() {
        use crate::haptics::Vibrator;
        use std::cell::RefCell;
        use std::rc::Rc;

        struct Buzz(Rc<RefCell<usize>>);
        impl Vibrator for Buzz {
            fn vibrate(&self, _timings: &[u32]) -> bool {
                *self.0.borrow_mut() += 1;
                true
            }
        }

        #[derive(Default)]
        struct Hud {
            charges: Option<u8>,
            state: Option<SessionState>,
        }
        impl Presenter for Hud {
            fn update_score(&mut self, _score: u64) {}
            fn update_timer(&mut self, _secs: u32) {}
            fn update_targets_found(&mut self, _found: usize, _total: usize) {}
            fn update_boost_charges(&mut self, charges: u8) {
                self.charges = Some(charges);
            }
            fn show_success(&mut self, _score: u64, _time_left_secs: u32, _stars: u8) {}
            fn show_failure(&mut self, _found: usize, _total: usize, _score: u64) {}
            fn state_changed(&mut self, state: SessionState) {
                self.state = Some(state);
            }
        }

        let buzzes = Rc::new(RefCell::new(0));
        let haptics = Haptics::new(Box::new(Buzz(buzzes.clone())));
        let mut hud = Hud::default();

        let mut s = buttons_session();
        s.play(0);
        s.push_input(InputEvent::BoostButton);
        s.tick();
        s.flush(&mut hud, &haptics);

        assert_eq!(hud.charges, Some(2));
        assert_eq!(hud.state, Some(SessionState::Playing));
        assert!(*buzzes.borrow() >= 1);
        assert_eq!(s.drain_events().count(), 0);
    }
}
