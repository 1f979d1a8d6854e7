//! Power-ups and their timed effects

use std::collections::BTreeMap;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::tuning::PowerUpTuning;

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PowerUpKind {
    /// Large temporary clearing around the character
    Reveal,
    /// One extra boost charge
    BoostCharge,
    /// More time on the clock
    ExtraTime,
    /// Immune to ice clouds
    Shield,
    /// Bigger nose glow
    Lantern,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 5] = [
        PowerUpKind::Reveal,
        PowerUpKind::BoostCharge,
        PowerUpKind::ExtraTime,
        PowerUpKind::Shield,
        PowerUpKind::Lantern,
    ];

    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }

    /// Short label for toasts
    pub fn label(&self) -> &'static str {
        match self {
            PowerUpKind::Reveal => "Reveal!",
            PowerUpKind::BoostCharge => "+1 Boost",
            PowerUpKind::ExtraTime => "+10s",
            PowerUpKind::Shield => "Shield",
            PowerUpKind::Lantern => "Lantern",
        }
    }

    /// Length of the effect tracked in [`ActiveEffects`], if the kind is timed
    pub fn effect_ms(&self, tuning: &PowerUpTuning) -> Option<f64> {
        match self {
            PowerUpKind::Shield => Some(tuning.shield_ms),
            PowerUpKind::Lantern => Some(tuning.lantern_ms),
            PowerUpKind::Reveal | PowerUpKind::BoostCharge | PowerUpKind::ExtraTime => None,
        }
    }
}

/// A pickup entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUp {
    pub id: u32,
    pub pos: Vec2,
    pub kind: PowerUpKind,
    /// One-shot: set on pickup, never cleared
    pub collected: bool,
}

impl PowerUp {
    /// Collect if not already collected. Returns true on the first pickup.
    pub fn collect(&mut self) -> bool {
        let first = !self.collected;
        self.collected = true;
        first
    }
}

/// Active timed effects: kind -> expiry on the game clock
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActiveEffects {
    expires: BTreeMap<PowerUpKind, f64>,
}

impl ActiveEffects {
    /// Start or refresh an effect. Collecting the same kind again only
    /// moves the expiry.
    pub fn activate(&mut self, kind: PowerUpKind, expires_at: f64) {
        self.expires.insert(kind, expires_at);
    }

    pub fn is_active(&self, kind: PowerUpKind, now: f64) -> bool {
        self.expires.get(&kind).is_some_and(|&at| now < at)
    }

    pub fn expires_at(&self, kind: PowerUpKind) -> Option<f64> {
        self.expires.get(&kind).copied()
    }

    /// Drop expired effects, returning the kinds that just ran out
    pub fn expire(&mut self, now: f64) -> Vec<PowerUpKind> {
        let ended: Vec<PowerUpKind> = self
            .expires
            .iter()
            .filter(|&(_, &at)| now >= at)
            .map(|(&kind, _)| kind)
            .collect();
        for kind in &ended {
            self.expires.remove(kind);
        }
        ended
    }

    pub fn iter(&self) -> impl Iterator<Item = (PowerUpKind, f64)> + '_ {
        self.expires.iter().map(|(&k, &v)| (k, v))
    }

    pub fn clear(&mut self) {
        self.expires.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_is_one_shot() {
        let mut p = PowerUp {
            id: 0,
            pos: Vec2::ZERO,
            kind: PowerUpKind::Reveal,
            collected: false,
        };
        assert!(p.collect());
        assert!(!p.collect());
        assert!(p.collected);
    }

    #[test]
    fn test_recollect_refreshes_expiry() {
        let mut effects = ActiveEffects::default();
        effects.activate(PowerUpKind::Shield, 8000.0);
        effects.activate(PowerUpKind::Shield, 12_000.0);
        assert_eq!(effects.iter().count(), 1);
        assert_eq!(effects.expires_at(PowerUpKind::Shield), Some(12_000.0));
        assert!(effects.is_active(PowerUpKind::Shield, 9000.0));
    }

    #[test]
    fn test_only_shield_and_lantern_are_timed() {
        let tuning = PowerUpTuning::default();
        let timed: Vec<_> = PowerUpKind::ALL
            .into_iter()
            .filter(|k| k.effect_ms(&tuning).is_some())
            .collect();
        assert_eq!(timed, vec![PowerUpKind::Shield, PowerUpKind::Lantern]);
        assert_eq!(PowerUpKind::Lantern.effect_ms(&tuning), Some(10_000.0));
    }

    #[test]
    fn test_expire() {
        let mut effects = ActiveEffects::default();
        effects.activate(PowerUpKind::Shield, 1000.0);
        effects.activate(PowerUpKind::Lantern, 5000.0);

        assert!(effects.expire(999.0).is_empty());
        assert_eq!(effects.expire(1000.0), vec![PowerUpKind::Shield]);
        assert!(!effects.is_active(PowerUpKind::Shield, 1000.0));
        assert!(effects.is_active(PowerUpKind::Lantern, 1000.0));
    }
}
