//! The player character
//!
//! Steering is integrated into velocity with friction and a speed cap, then
//! into position clamped to the world. Status effects (boost, ice,
//! immunity) are deadlines on the game clock.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::tuning::CharacterTuning;
use crate::{cap_length, clamp_to_rect};

/// Which way the character faces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Facing {
    Left,
    Right,
}

impl Facing {
    /// +1 for right, -1 for left
    pub fn sign(&self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }
}

/// Per-tick influences on the character
#[derive(Debug, Clone, Copy, Default)]
pub struct Drive {
    pub steering: Vec2,
    pub wind: Vec2,
    /// Hold gesture active: ignore steering and brake
    pub hovering: bool,
    /// Boost charges are locked out
    pub overheated: bool,
    /// Lantern power-up active
    pub lantern: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Character {
    pub pos: Vec2,
    pub vel: Vec2,
    pub facing: Facing,
    pub boost_until: f64,
    pub overheated: bool,
    pub iced_until: f64,
    pub immune_until: f64,
    /// Current (eased) glow radius
    pub glow_radius: f32,
}

impl Character {
    pub fn new(pos: Vec2, base_glow: f32) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            facing: Facing::Right,
            boost_until: 0.0,
            overheated: false,
            iced_until: 0.0,
            immune_until: 0.0,
            glow_radius: base_glow,
        }
    }

    pub fn is_boosting(&self, now: f64) -> bool {
        now < self.boost_until
    }

    pub fn is_iced(&self, now: f64) -> bool {
        now < self.iced_until
    }

    pub fn is_immune(&self, now: f64) -> bool {
        now < self.immune_until
    }

    pub fn start_boost(&mut self, now: f64, tuning: &CharacterTuning) {
        self.boost_until = now + tuning.boost_ms;
    }

    /// Freeze the character unless immune. Immunity starts once the ice thaws.
    pub fn freeze(&mut self, now: f64, tuning: &CharacterTuning) -> bool {
        if self.is_iced(now) || self.is_immune(now) {
            return false;
        }
        self.iced_until = now + tuning.iced_ms;
        self.immune_until = self.iced_until + tuning.immune_ms;
        true
    }

    /// Grant immunity until at least `until`
    pub fn shield_until(&mut self, until: f64) {
        self.immune_until = self.immune_until.max(until);
    }

    /// Integrate one tick of movement inside `[min, max]`
    pub fn step(&mut self, drive: &Drive, now: f64, min: Vec2, max: Vec2, tuning: &CharacterTuning) {
        self.overheated = drive.overheated;

        let mut accel = tuning.accel;
        if self.is_iced(now) {
            accel *= tuning.iced_accel_mult;
        }
        let steering = if drive.hovering { Vec2::ZERO } else { drive.steering };

        self.vel += steering * accel + drive.wind;
        self.vel *= tuning.friction;
        if drive.hovering {
            self.vel *= tuning.hover_friction;
        }

        let mut max_speed = tuning.max_speed;
        if self.is_boosting(now) {
            max_speed *= tuning.boost_speed_mult;
        }
        self.vel = cap_length(self.vel, max_speed);

        self.pos = clamp_to_rect(self.pos + self.vel, min, max);
        // Kill velocity into a wall so the character doesn't stick to it
        if self.pos.x <= min.x || self.pos.x >= max.x {
            self.vel.x = 0.0;
        }
        if self.pos.y <= min.y || self.pos.y >= max.y {
            self.vel.y = 0.0;
        }

        if self.vel.x > tuning.facing_threshold {
            self.facing = Facing::Right;
        } else if self.vel.x < -tuning.facing_threshold {
            self.facing = Facing::Left;
        }

        let target = self.target_glow(drive, now, tuning);
        self.glow_radius += (target - self.glow_radius) * tuning.glow_ease;
    }

    /// Glow radius the character is easing toward.
    /// Overheated or iced beats boosting, which beats normal.
    pub fn target_glow(&self, drive: &Drive, now: f64, tuning: &CharacterTuning) -> f32 {
        let mut radius = tuning.base_glow;
        if drive.lantern {
            radius *= tuning.lantern_glow_mult;
        }
        if self.overheated || self.is_iced(now) {
            radius * tuning.dim_glow_mult
        } else if self.is_boosting(now) {
            radius * tuning.boost_glow_mult
        } else {
            radius
        }
    }

    /// Position of the glowing nose
    pub fn nose(&self, tuning: &CharacterTuning) -> Vec2 {
        self.pos + Vec2::new(self.facing.sign() * tuning.nose_offset, 0.0)
    }
}
