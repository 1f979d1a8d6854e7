//! Chimneys: the hidden delivery targets
//!
//! The set is fixed when a level starts. Each chimney goes
//! Hidden -> Visible once (spotted), then ends Delivered or Missed. Both end
//! states are terminal, so delivered + missed + outstanding == total always.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::fog::Fog;
use super::spawn::{Placement, Region, place};
use crate::consts::{CHIMNEY_HEIGHT, CHIMNEY_STYLES, CHIMNEY_WIDTH};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChimneyState {
    Hidden,
    Visible,
    Delivered,
    Missed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chimney {
    pub id: u32,
    pub pos: Vec2,
    pub state: ChimneyState,
    /// Art variant
    pub style: u8,
}

impl Chimney {
    pub fn is_outstanding(&self) -> bool {
        matches!(self.state, ChimneyState::Hidden | ChimneyState::Visible)
    }

    /// Tap box: the chimney footprint grown by `padding` on every side
    pub fn hit_box_contains(&self, p: Vec2, padding: f32) -> bool {
        let half = Vec2::new(CHIMNEY_WIDTH / 2.0 + padding, CHIMNEY_HEIGHT / 2.0 + padding);
        let d = (p - self.pos).abs();
        d.x <= half.x && d.y <= half.y
    }
}

/// A successful tap
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Delivery {
    pub id: u32,
    pub pos: Vec2,
    /// Distance from the tap to the chimney center
    pub distance: f32,
    pub perfect: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Chimneys {
    list: Vec<Chimney>,
}

impl Chimneys {
    /// Spawn a fresh set. May place fewer than requested.
    pub fn spawn<R: Rng>(
        rng: &mut R,
        region: Region,
        count: usize,
        separation: f32,
        attempts_per_item: u32,
    ) -> (Self, Placement) {
        let placement = place(rng, region, count, separation, attempts_per_item, &[]);
        let list = placement
            .points
            .iter()
            .enumerate()
            .map(|(i, &pos)| Chimney {
                id: i as u32,
                pos,
                state: ChimneyState::Hidden,
                style: rng.random_range(0..CHIMNEY_STYLES),
            })
            .collect();
        (Self { list }, placement)
    }

    /// Build from explicit positions (tests, authored layouts)
    pub fn from_positions(positions: &[Vec2]) -> Self {
        let list = positions
            .iter()
            .enumerate()
            .map(|(i, &pos)| Chimney {
                id: i as u32,
                pos,
                state: ChimneyState::Hidden,
                style: (i % CHIMNEY_STYLES as usize) as u8,
            })
            .collect();
        Self { list }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Chimney> {
        self.list.iter()
    }

    pub fn get(&self, id: u32) -> Option<&Chimney> {
        self.list.get(id as usize)
    }

    pub fn total(&self) -> usize {
        self.list.len()
    }

    pub fn delivered(&self) -> usize {
        self.count(ChimneyState::Delivered)
    }

    pub fn missed(&self) -> usize {
        self.count(ChimneyState::Missed)
    }

    pub fn outstanding(&self) -> usize {
        self.list.iter().filter(|c| c.is_outstanding()).count()
    }

    /// Chimneys seen at least once
    pub fn spotted(&self) -> usize {
        self.list
            .iter()
            .filter(|c| c.state != ChimneyState::Hidden)
            .count()
    }

    /// Every chimney delivered, none missed
    pub fn all_delivered(&self) -> bool {
        !self.list.is_empty() && self.delivered() == self.total()
    }

    fn count(&self, state: ChimneyState) -> usize {
        self.list.iter().filter(|c| c.state == state).count()
    }

    /// Reveal hidden chimneys inside the fog's visible zone.
    /// Returns the ids spotted this call.
    pub fn update_visibility(&mut self, fog: &Fog) -> Vec<u32> {
        let mut spotted = Vec::new();
        for chimney in &mut self.list {
            if chimney.state == ChimneyState::Hidden && fog.is_visible(chimney.pos) {
                chimney.state = ChimneyState::Visible;
                spotted.push(chimney.id);
            }
        }
        spotted
    }

    /// Deliver to the first visible outstanding chimney whose padded box
    /// contains the tap, in spawn order.
    pub fn resolve_tap(&mut self, tap: Vec2, padding: f32, perfect_radius: f32) -> Option<Delivery> {
        let chimney = self
            .list
            .iter_mut()
            .find(|c| c.state == ChimneyState::Visible && c.hit_box_contains(tap, padding))?;
        chimney.state = ChimneyState::Delivered;
        let distance = tap.distance(chimney.pos);
        Some(Delivery {
            id: chimney.id,
            pos: chimney.pos,
            distance,
            perfect: distance <= perfect_radius,
        })
    }

    /// Mark a chimney missed. No-op (returns false) once resolved.
    pub fn mark_missed(&mut self, id: u32) -> bool {
        match self.list.get_mut(id as usize) {
            Some(c) if c.is_outstanding() => {
                c.state = ChimneyState::Missed;
                true
            }
            _ => false,
        }
    }

    /// Nearest chimney still waiting for a delivery
    pub fn nearest_outstanding(&self, from: Vec2) -> Option<&Chimney> {
        self.list
            .iter()
            .filter(|c| c.is_outstanding())
            .min_by(|a, b| {
                a.pos
                    .distance_squared(from)
                    .partial_cmp(&b.pos.distance_squared(from))
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
    }

    pub fn clear(&mut self) {
        self.list.clear();
    }
}
