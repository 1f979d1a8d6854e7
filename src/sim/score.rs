//! End-of-level bonus and star rating

use serde::{Deserialize, Serialize};

use crate::tuning::ScoreTuning;

/// What the player did during a level, as far as the bonus cares
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelStats {
    pub time_left_secs: f32,
    pub time_limit_secs: f32,
    pub all_delivered: bool,
    pub boosts_used: u32,
    pub radar_uses: u32,
    pub sleigh_collided: bool,
}

/// Itemized completion bonus
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bonus {
    pub time: u64,
    pub all_delivered: u64,
    pub no_boost: u64,
    pub untouched: u64,
    pub no_radar: u64,
}

impl Bonus {
    pub fn compute(stats: &LevelStats, tuning: &ScoreTuning) -> Self {
        let whole_secs = stats.time_left_secs.max(0.0).floor() as u64;
        let award = |earned: bool, points: u64| if earned { points } else { 0 };
        Self {
            time: whole_secs * tuning.time_bonus_per_sec,
            all_delivered: award(stats.all_delivered, tuning.all_delivered_bonus),
            no_boost: award(stats.boosts_used == 0, tuning.no_boost_bonus),
            untouched: award(!stats.sleigh_collided, tuning.untouched_bonus),
            no_radar: award(stats.radar_uses == 0, tuning.no_radar_bonus),
        }
    }

    pub fn total(&self) -> u64 {
        self.time + self.all_delivered + self.no_boost + self.untouched + self.no_radar
    }
}

/// 1 to 3 stars for a completed level
pub fn stars(stats: &LevelStats, tuning: &ScoreTuning) -> u8 {
    if stats.boosts_used == 0 && stats.radar_uses == 0 && !stats.sleigh_collided {
        3
    } else if stats.time_limit_secs > 0.0
        && stats.time_left_secs / stats.time_limit_secs > tuning.two_star_time_fraction
    {
        2
    } else {
        1
    }
}

/// Points for a single delivery
pub fn delivery_points(perfect: bool, tuning: &ScoreTuning) -> u64 {
    if perfect { tuning.perfect_delivery } else { tuning.delivery }
}

/// Final tally for a completed level
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelResult {
    /// Points earned during play, before the bonus
    pub base: u64,
    pub bonus: Bonus,
    pub stars: u8,
    pub all_delivered: bool,
    pub time_left_secs: f32,
}

impl LevelResult {
    pub fn new(base: u64, stats: &LevelStats, tuning: &ScoreTuning) -> Self {
        Self {
            base,
            bonus: Bonus::compute(stats, tuning),
            stars: stars(stats, tuning),
            all_delivered: stats.all_delivered,
            time_left_secs: stats.time_left_secs,
        }
    }

    pub fn final_score(&self) -> u64 {
        self.base + self.bonus.total()
    }
}
