//! Drifting ice clouds
//!
//! Touching one freezes the character; the sleigh clipping one spoils the
//! "untouched" bonus. Clouds drift with the wind and wrap around the world.

use glam::Vec2;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IceCloud {
    pub pos: Vec2,
    pub radius: f32,
    /// Horizontal drift per tick
    pub drift: f32,
}

impl IceCloud {
    pub fn touches(&self, p: Vec2, other_radius: f32) -> bool {
        let r = self.radius + other_radius;
        self.pos.distance_squared(p) <= r * r
    }

    /// Drift and wrap horizontally inside `[0, world_width]`
    pub fn step(&mut self, world_width: f32) {
        self.pos.x += self.drift;
        let span = world_width + self.radius * 2.0;
        if self.pos.x > world_width + self.radius {
            self.pos.x -= span;
        } else if self.pos.x < -self.radius {
            self.pos.x += span;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_touches() {
        let cloud = IceCloud {
            pos: Vec2::new(100.0, 100.0),
            radius: 40.0,
            drift: 0.0,
        };
        assert!(cloud.touches(Vec2::new(150.0, 100.0), 10.0));
        assert!(!cloud.touches(Vec2::new(151.0, 100.0), 10.0));
    }

    #[test]
    fn test_wraps_around_world() {
        let mut cloud = IceCloud {
            pos: Vec2::new(1039.5, 50.0),
            radius: 40.0,
            drift: 1.0,
        };
        cloud.step(1000.0);
        assert_eq!(cloud.pos.x, -39.5);

        let mut back = IceCloud {
            pos: Vec2::new(-39.5, 50.0),
            radius: 40.0,
            drift: -1.0,
        };
        back.step(1000.0);
        assert_eq!(back.pos.x, 1039.5);
    }
}
