//! Per-level progress: best scores, stars and unlocks
//!
//! Persisted as one JSON blob. A missing or corrupt blob silently resets to
//! the defaults (first level unlocked, nothing scored).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::persistence::{self, Storage};

/// Maximum stars per level
pub const MAX_STARS: u8 = 3;

/// Persisted player progress
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    /// Best score per level index (0-based)
    #[serde(default)]
    pub high_scores: BTreeMap<u32, u64>,
    /// Best star count per level index
    #[serde(default)]
    pub stars_earned: BTreeMap<u32, u8>,
    /// Unlock flags aligned to the level table
    #[serde(default)]
    pub unlocked: Vec<bool>,
}

impl Default for Progress {
    fn default() -> Self {
        Self::new(1)
    }
}

/// What a finished level changed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LevelRecord {
    pub new_high_score: bool,
    pub new_best_stars: bool,
    pub unlocked_next: bool,
}

impl Progress {
    /// Storage key
    const STORAGE_KEY: &'static str = "fog_sleigh_progress";
    const VERSION: u32 = 1;

    /// Fresh progress with `level_count` slots and only the first unlocked
    pub fn new(level_count: usize) -> Self {
        let mut unlocked = vec![false; level_count.max(1)];
        unlocked[0] = true;
        Self {
            high_scores: BTreeMap::new(),
            stars_earned: BTreeMap::new(),
            unlocked,
        }
    }

    pub fn is_unlocked(&self, level: u32) -> bool {
        level == 0 || self.unlocked.get(level as usize).copied().unwrap_or(false)
    }

    /// Unlock a level permanently
    pub fn unlock(&mut self, level: u32) -> bool {
        let idx = level as usize;
        if self.unlocked.len() <= idx {
            self.unlocked.resize(idx + 1, false);
        }
        let was = self.unlocked[idx];
        self.unlocked[idx] = true;
        !was
    }

    pub fn high_score(&self, level: u32) -> Option<u64> {
        self.high_scores.get(&level).copied()
    }

    pub fn stars(&self, level: u32) -> u8 {
        self.stars_earned.get(&level).copied().unwrap_or(0)
    }

    pub fn total_stars(&self) -> u32 {
        self.stars_earned.values().map(|&s| s as u32).sum()
    }

    /// Highest unlocked level index
    pub fn furthest_unlocked(&self) -> u32 {
        self.unlocked.iter().rposition(|&u| u).unwrap_or(0) as u32
    }

    /// Record a completed level. Scores and stars only ever improve.
    pub fn record_completion(
        &mut self,
        level: u32,
        score: u64,
        stars: u8,
        all_delivered: bool,
    ) -> LevelRecord {
        let mut record = LevelRecord::default();

        let best = self.high_scores.entry(level).or_insert(0);
        if score > *best {
            *best = score;
            record.new_high_score = true;
        }

        let stars = stars.min(MAX_STARS);
        let best_stars = self.stars_earned.entry(level).or_insert(0);
        if stars > *best_stars {
            *best_stars = stars;
            record.new_best_stars = true;
        }

        if all_delivered {
            record.unlocked_next = self.unlock(level + 1);
        }
        record
    }

    /// Make sure the unlock list covers at least `level_count` entries
    pub fn align_to(&mut self, level_count: usize) {
        if self.unlocked.len() < level_count {
            self.unlocked.resize(level_count, false);
        }
        if let Some(first) = self.unlocked.first_mut() {
            *first = true;
        } else {
            self.unlocked.push(true);
        }
    }

    /// Load progress, falling back to defaults
    pub fn load(storage: &dyn Storage, level_count: usize) -> Self {
        match persistence::load::<Progress>(storage, Self::STORAGE_KEY, Self::VERSION) {
            Some(mut progress) => {
                progress.align_to(level_count);
                log::info!(
                    "Loaded progress ({} levels unlocked, {} stars)",
                    progress.unlocked.iter().filter(|&&u| u).count(),
                    progress.total_stars()
                );
                progress
            }
            None => {
                log::info!("No saved progress, starting fresh");
                Self::new(level_count)
            }
        }
    }

    pub fn save(&self, storage: &mut dyn Storage) {
        match persistence::save(storage, Self::STORAGE_KEY, Self::VERSION, self) {
            Ok(()) => log::info!("Progress saved"),
            Err(e) => log::warn!("Progress not saved: {e}"),
        }
    }
}
