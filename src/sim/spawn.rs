//! Rejection-sampled placement with a minimum separation
//!
//! Used for chimneys, power-ups and hazards. Running out of attempts
//! returns fewer points than requested; the caller decides what that means.

use glam::Vec2;
use rand::Rng;

/// Axis-aligned placement area
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Region {
    pub min: Vec2,
    pub max: Vec2,
}

impl Region {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn is_empty(&self) -> bool {
        self.max.x <= self.min.x || self.max.y <= self.min.y
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}

/// Result of a placement run
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    pub points: Vec<Vec2>,
    pub requested: usize,
    pub attempts: u32,
}

impl Placement {
    pub fn is_short(&self) -> bool {
        self.points.len() < self.requested
    }
}

/// Place up to `count` points in `region`, each farther than `separation`
/// from every other placed point and from every point in `avoid`.
pub fn place<R: Rng>(
    rng: &mut R,
    region: Region,
    count: usize,
    separation: f32,
    attempts_per_item: u32,
    avoid: &[Vec2],
) -> Placement {
    let budget = count as u32 * attempts_per_item;
    let mut points = Vec::with_capacity(count);
    let mut attempts = 0;

    if region.is_empty() {
        return Placement {
            points,
            requested: count,
            attempts,
        };
    }

    let min_sq = separation * separation;
    while points.len() < count && attempts < budget {
        attempts += 1;
        let candidate = Vec2::new(
            rng.random_range(region.min.x..region.max.x),
            rng.random_range(region.min.y..region.max.y),
        );
        let clear = points
            .iter()
            .chain(avoid.iter())
            .all(|p: &Vec2| p.distance_squared(candidate) > min_sq);
        if clear {
            points.push(candidate);
        }
    }

    Placement {
        points,
        requested: count,
        attempts,
    }
}
