//! Visibility field
//!
//! The world starts fully fogged. Circular holes clear it: one permanent
//! hole (the nose glow, replaced every tick) plus any number of temporary
//! holes from boosts and reveals, each with a fixed expiry.
//!
//! Gameplay visibility uses a tighter radius than the rendered falloff so a
//! chimney flickering at the soft fog edge never toggles its spotted state.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// A circular clear region
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hole {
    pub pos: Vec2,
    pub radius: f32,
    /// `None` for the permanent glow hole
    pub expires_at: Option<f64>,
}

impl Hole {
    pub fn is_temporary(&self) -> bool {
        self.expires_at.is_some()
    }

    /// Linear falloff, 1 at the center and 0 at the rim
    #[inline]
    pub fn amount_at(&self, p: Vec2) -> f32 {
        if self.radius <= 0.0 {
            return 0.0;
        }
        (1.0 - self.pos.distance(p) / self.radius).clamp(0.0, 1.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fog {
    /// Fraction of a hole's radius that counts as visible for gameplay
    visible_fraction: f32,
    glow: Option<Hole>,
    temporary: Vec<Hole>,
}

impl Fog {
    pub fn new(visible_fraction: f32) -> Self {
        Self {
            visible_fraction,
            glow: None,
            temporary: Vec::new(),
        }
    }

    /// Replace the permanent glow hole
    pub fn set_glow(&mut self, pos: Vec2, radius: f32) {
        self.glow = Some(Hole {
            pos,
            radius,
            expires_at: None,
        });
    }

    /// Add a temporary hole that lasts until `expires_at`
    pub fn add_temporary(&mut self, pos: Vec2, radius: f32, expires_at: f64) {
        self.temporary.push(Hole {
            pos,
            radius,
            expires_at: Some(expires_at),
        });
    }

    /// Drop temporary holes whose expiry has passed
    pub fn prune(&mut self, now: f64) {
        self.temporary
            .retain(|h| h.expires_at.is_some_and(|at| now < at));
    }

    /// Remove every hole (level reset)
    pub fn clear(&mut self) {
        self.glow = None;
        self.temporary.clear();
    }

    pub fn holes(&self) -> impl Iterator<Item = &Hole> {
        self.glow.iter().chain(self.temporary.iter())
    }

    pub fn glow(&self) -> Option<&Hole> {
        self.glow.as_ref()
    }

    pub fn temporary_count(&self) -> usize {
        self.temporary.len()
    }

    /// Gameplay visibility: inside the inner fraction of any hole
    pub fn is_visible(&self, p: Vec2) -> bool {
        self.holes().any(|h| {
            let r = h.radius * self.visible_fraction;
            h.pos.distance_squared(p) <= r * r
        })
    }

    /// Render opacity of the clearing at `p` (0 = fogged, 1 = clear)
    pub fn visibility_amount(&self, p: Vec2) -> f32 {
        self.holes().map(|h| h.amount_at(p)).fold(0.0, f32::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_inner_threshold() {
        let mut fog = Fog::new(0.8);
        fog.set_glow(Vec2::ZERO, 100.0);

        assert!(fog.is_visible(Vec2::new(79.0, 0.0)));
        assert!(fog.is_visible(Vec2::new(80.0, 0.0)));
        assert!(!fog.is_visible(Vec2::new(81.0, 0.0)));
        // Rendered as partly clear but not spotted
        assert!(fog.visibility_amount(Vec2::new(90.0, 0.0)) > 0.0);
        assert_eq!(fog.visibility_amount(Vec2::new(150.0, 0.0)), 0.0);
        assert_eq!(fog.visibility_amount(Vec2::ZERO), 1.0);
    }

    #[test]
    fn test_glow_is_replaced_not_accumulated() {
        let mut fog = Fog::new(0.8);
        fog.set_glow(Vec2::ZERO, 50.0);
        fog.set_glow(Vec2::new(500.0, 0.0), 50.0);
        assert_eq!(fog.holes().count(), 1);
        assert!(!fog.is_visible(Vec2::ZERO));
        assert!(fog.is_visible(Vec2::new(500.0, 0.0)));
    }

    #[test]
    fn test_temporary_holes_expire() {
        let mut fog = Fog::new(0.8);
        fog.add_temporary(Vec2::new(10.0, 10.0), 100.0, 1000.0);
        fog.add_temporary(Vec2::new(400.0, 10.0), 100.0, 3000.0);

        fog.prune(999.0);
        assert_eq!(fog.temporary_count(), 2);
        fog.prune(1000.0);
        assert_eq!(fog.temporary_count(), 1);
        assert!(!fog.is_visible(Vec2::new(10.0, 10.0)));
        assert!(fog.is_visible(Vec2::new(400.0, 10.0)));
    }

    #[test]
    fn test_max_over_holes() {
        let mut fog = Fog::new(0.8);
        fog.set_glow(Vec2::ZERO, 100.0);
        fog.add_temporary(Vec2::new(60.0, 0.0), 100.0, 10.0);
        // 0.4 from the glow, 1.0 from the temporary hole
        assert_eq!(fog.visibility_amount(Vec2::new(60.0, 0.0)), 1.0);
    }

    proptest! {
        #[test]
        fn prop_visible_implies_partly_clear(
            hx in -500.0f32..500.0, hy in -500.0f32..500.0, r in 1.0f32..300.0,
            px in -800.0f32..800.0, py in -800.0f32..800.0,
        ) {
            let mut fog = Fog::new(0.8);
            fog.set_glow(Vec2::new(hx, hy), r);
            let p = Vec2::new(px, py);
            let amount = fog.visibility_amount(p);
            prop_assert!((0.0..=1.0).contains(&amount));
            if fog.is_visible(p) {
                // Inside 0.8r means at least ~0.2 falloff remains
                prop_assert!(amount >= 0.19);
            }
        }
    }
}
