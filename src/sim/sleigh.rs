//! Trailing sleigh on a springy rope
//!
//! The sleigh chases an anchor behind the character with a capped spring,
//! gets yanked harder once the rope over-stretches, and never snaps to the
//! anchor. The swing angle is cosmetic and never feeds back into position.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::actor::Character;
use crate::cap_length;
use crate::tuning::SleighTuning;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sleigh {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Visual lean (radians)
    pub swing_angle: f32,
    /// Set on the first hazard contact, never cleared within a level
    pub collided: bool,
}

impl Sleigh {
    /// Place the sleigh at its resting anchor
    pub fn behind(character: &Character, tuning: &SleighTuning) -> Self {
        Self {
            pos: anchor(character, tuning),
            vel: Vec2::ZERO,
            swing_angle: 0.0,
            collided: false,
        }
    }

    pub fn step(&mut self, character: &Character, tuning: &SleighTuning) {
        let to_anchor = anchor(character, tuning) - self.pos;
        let distance = to_anchor.length();

        let mut force = cap_length(to_anchor * tuning.spring, tuning.max_spring_force);
        if distance > tuning.max_stretch {
            let dir = to_anchor / distance;
            force += dir * (distance - tuning.max_stretch) * tuning.pull_back;
        }

        self.vel += force;
        self.vel *= tuning.friction;
        self.pos += self.vel;

        self.swing_angle += character.vel.x * tuning.swing_impulse;
        self.swing_angle *= tuning.swing_damping;
        self.swing_angle = self.swing_angle.clamp(-tuning.max_swing, tuning.max_swing);
    }

    /// Record a hazard contact. Returns true only for the first one.
    pub fn mark_collision(&mut self) -> bool {
        let first = !self.collided;
        self.collided = true;
        first
    }

    pub fn rope_length(&self, character: &Character) -> f32 {
        self.pos.distance(character.pos)
    }
}

/// Where the sleigh wants to hang: behind the facing direction, a bit low
pub fn anchor(character: &Character, tuning: &SleighTuning) -> Vec2 {
    character.pos + Vec2::new(-character.facing.sign() * tuning.rope_length, tuning.rope_drop)
}
