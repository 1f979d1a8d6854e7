//! World state
//!
//! Everything a running level needs lives in [`World`], including the seeded
//! RNG, so a serialized world resumes exactly where it left off.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::actor::Character;
use super::fog::Fog;
use super::hazards::IceCloud;
use super::levels::{self, LevelConfig};
use super::powerups::{ActiveEffects, PowerUp};
use super::score::LevelResult;
use super::sleigh::Sleigh;
use super::targets::Chimneys;
use crate::clamp_to_rect;
use crate::consts::*;
use crate::tuning::Tuning;

/// Where the current level stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Running,
    /// Every chimney delivered
    Complete,
    TimedOut,
    /// A chimney was missed, so a full delivery is out of reach
    Failed,
}

/// One level in play
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    pub seed: u64,
    pub level: LevelConfig,
    /// Full world size; fixed for the level
    pub size: Vec2,
    /// Viewport size in screen pixels
    pub view: Vec2,
    /// World position of the viewport's top-left corner
    pub camera: Vec2,
    /// Game clock (ms). Advanced only by ticks.
    pub clock: f64,
    pub ticks: u64,
    pub time_left: f32,
    pub character: Character,
    pub sleigh: Sleigh,
    pub fog: Fog,
    pub chimneys: Chimneys,
    pub power_ups: Vec<PowerUp>,
    pub hazards: Vec<IceCloud>,
    pub effects: ActiveEffects,
    /// Points earned during play (bonus is added on completion)
    pub score: u64,
    pub boosts_used: u32,
    pub radar_uses: u32,
    /// Hold gesture in progress
    pub hovering: bool,
    pub outcome: Outcome,
    pub result: Option<LevelResult>,
    rng: Pcg32,
}

impl World {
    /// An empty world sized for `view`, with no level started
    pub fn new(seed: u64, view: Vec2, tuning: &Tuning) -> Self {
        let size = world_size(view);
        let character = Character::new(spawn_point(view), tuning.character.base_glow);
        let sleigh = Sleigh::behind(&character, &tuning.sleigh);
        let level = levels::level(0);
        let mut world = Self {
            seed,
            time_left: level.time_limit_secs,
            level,
            size,
            view,
            camera: Vec2::ZERO,
            clock: 0.0,
            ticks: 0,
            character,
            sleigh,
            fog: Fog::new(tuning.fog.visible_fraction),
            chimneys: Chimneys::default(),
            power_ups: Vec::new(),
            hazards: Vec::new(),
            effects: ActiveEffects::default(),
            score: 0,
            boosts_used: 0,
            radar_uses: 0,
            hovering: false,
            outcome: Outcome::Running,
            result: None,
            rng: Pcg32::seed_from_u64(seed),
        };
        world.follow_camera();
        world
    }

    pub fn rng(&mut self) -> &mut Pcg32 {
        &mut self.rng
    }

    /// Reseed for a new level attempt
    pub fn reseed(&mut self, seed: u64) {
        self.seed = seed;
        self.rng = Pcg32::seed_from_u64(seed);
    }

    /// Bounds the character's center may occupy
    pub fn play_bounds(&self) -> (Vec2, Vec2) {
        let r = Vec2::splat(CHARACTER_RADIUS);
        (r, (self.size - r).max(r))
    }

    /// Change the viewport. The world keeps its size; only the camera
    /// window moves. Same size twice is a no-op.
    pub fn resize(&mut self, view: Vec2) {
        if view == self.view {
            return;
        }
        self.view = view;
        self.follow_camera();
    }

    /// Center the camera on the character, clamped to the world
    pub fn follow_camera(&mut self) {
        let max = (self.size - self.view).max(Vec2::ZERO);
        self.camera = clamp_to_rect(self.character.pos - self.view / 2.0, Vec2::ZERO, max);
    }

    pub fn screen_to_world(&self, p: Vec2) -> Vec2 {
        p + self.camera
    }

    pub fn world_to_screen(&self, p: Vec2) -> Vec2 {
        p - self.camera
    }

    /// Whether `p` is inside the camera view grown by `margin`
    pub fn in_view(&self, p: Vec2, margin: f32) -> bool {
        let min = self.camera - Vec2::splat(margin);
        let max = self.camera + self.view + Vec2::splat(margin);
        p.x >= min.x && p.x <= max.x && p.y >= min.y && p.y <= max.y
    }

    /// Whole seconds left, rounded up for display
    pub fn timer_secs(&self) -> u32 {
        self.time_left.max(0.0).ceil() as u32
    }

    pub fn is_running(&self) -> bool {
        self.outcome == Outcome::Running
    }
}

/// World dimensions for a viewport
pub fn world_size(view: Vec2) -> Vec2 {
    Vec2::new(view.x * WORLD_SCREENS, view.y)
}

/// Where the character starts: first screen, upper third
pub fn spawn_point(view: Vec2) -> Vec2 {
    Vec2::new(view.x / 2.0, view.y * 0.3)
}
