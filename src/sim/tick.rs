//! Fixed timestep simulation tick
//!
//! One call advances the world by [`SIM_DT`]. The order of the steps is
//! fixed: timer, timeout, input, character, nose glow, sleigh, fog, chimneys,
//! power-ups and hazards, completion.

use glam::Vec2;
use log::{debug, info, warn};
use rand::Rng;

use super::actor::{Character, Drive};
use super::hazards::IceCloud;
use super::levels::LevelConfig;
use super::powerups::{PowerUp, PowerUpKind};
use super::score::{LevelResult, LevelStats, delivery_points};
use super::sleigh::Sleigh;
use super::spawn::{Region, place};
use super::state::{Outcome, World, spawn_point, world_size};
use super::targets::{ChimneyState, Chimneys};
use crate::consts::*;
use crate::error::{GameError, Result};
use crate::events::GameEvent;
use crate::haptics::HapticPattern;
use crate::{cap_length, heading};
use crate::input::{BoostRejection, Signal};
use crate::tuning::{CharacterTuning, Tuning};

/// Input for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub steering: Vec2,
    /// Discrete signals in arrival order. Points are world coordinates.
    pub signals: Vec<Signal>,
    /// Boost charges are locked out
    pub overheated: bool,
    /// Demo mode: the world steers and taps for itself
    pub autopilot: bool,
}

/// What the caller has to act on after a tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Boost charges picked up this tick
    pub charges_granted: u8,
    /// Set on the tick the level ended
    pub finished: Option<Outcome>,
}

/// Advance the world by one fixed timestep
pub fn tick(world: &mut World, input: &TickInput, tuning: &Tuning, out: &mut Vec<GameEvent>) -> TickReport {
    let mut report = TickReport::default();
    if !world.is_running() {
        return report;
    }

    // Autopilot rewrites the input before anything reads it
    let mut input = input.clone();
    if input.autopilot {
        pilot(world, &tuning.character, &mut input);
    }
    let input = &input;

    let shown = world.timer_secs();
    world.ticks += 1;
    world.clock += SIM_DT_MS;
    world.time_left -= SIM_DT;
    let now = world.clock;

    if world.time_left <= 0.0 {
        world.time_left = 0.0;
        out.push(GameEvent::UpdateTimer(0));
        fail(world, Outcome::TimedOut, out);
        report.finished = Some(Outcome::TimedOut);
        return report;
    }
    if world.timer_secs() != shown {
        out.push(GameEvent::UpdateTimer(world.timer_secs()));
    }

    for signal in &input.signals {
        apply_signal(world, signal, now, tuning, out);
    }

    let drive = Drive {
        steering: input.steering,
        wind: wind_at(world.level.wind, now, tuning.character.wind_frequency_hz),
        hovering: world.hovering,
        overheated: input.overheated,
        lantern: world.effects.is_active(PowerUpKind::Lantern, now),
    };
    let (min, max) = world.play_bounds();
    world.character.step(&drive, now, min, max, &tuning.character);
    world.follow_camera();

    push_glow(world, tuning);

    world.sleigh.step(&world.character, &tuning.sleigh);

    world.fog.prune(now);

    update_chimneys(world, tuning, out);

    for kind in world.effects.expire(now) {
        debug!("{kind:?} wore off");
    }
    collect_power_ups(world, now, tuning, &mut report, out);
    update_hazards(world, now, tuning, out);

    if world.chimneys.missed() > 0 {
        fail(world, Outcome::Failed, out);
        report.finished = Some(Outcome::Failed);
    } else if world.chimneys.all_delivered() {
        complete(world, tuning, out);
        report.finished = Some(Outcome::Complete);
    }

    report
}

/// Horizontal gust at game time `now`
pub fn wind_at(strength: f32, now: f64, frequency_hz: f32) -> Vec2 {
    let t = (now / 1000.0) as f32;
    Vec2::new(strength * (t * frequency_hz * std::f32::consts::TAU).sin(), 0.0)
}

fn push_glow(world: &mut World, tuning: &Tuning) {
    let nose = world.character.nose(&tuning.character);
    let radius = world.character.glow_radius * world.level.fog.glow_scale();
    world.fog.set_glow(nose, radius);
}

fn apply_signal(world: &mut World, signal: &Signal, now: f64, tuning: &Tuning, out: &mut Vec<GameEvent>) {
    match *signal {
        Signal::Boost { charges_left, overheated } => {
            world.boosts_used += 1;
            world.character.start_boost(now, &tuning.character);
            let nose = world.character.nose(&tuning.character);
            world.fog.add_temporary(
                nose,
                tuning.character.boost_hole_radius,
                now + tuning.character.boost_hole_ms,
            );
            out.push(GameEvent::UpdateBoostCharges(charges_left));
            out.push(GameEvent::Haptic(HapticPattern::Boost));
            if overheated {
                out.push(GameEvent::Toast("Overheated! Let it cool down".into()));
                out.push(GameEvent::Haptic(HapticPattern::Overheat));
            }
        }
        Signal::BoostRejected { reason, manual } => {
            debug!("Boost rejected: {reason:?} (manual: {manual})");
            if manual {
                let message = match reason {
                    BoostRejection::Cooldown => "Boost recharging",
                    BoostRejection::NoCharges => "No boosts left",
                    BoostRejection::Overheated => "Too hot! Cooling down",
                };
                out.push(GameEvent::Toast(message.into()));
            }
        }
        Signal::Tap(p) => {
            let score = &tuning.score;
            if let Some(hit) = world.chimneys.resolve_tap(p, score.hit_padding, score.perfect_radius) {
                let points = delivery_points(hit.perfect, score);
                world.score += points;
                out.push(GameEvent::ScorePopup {
                    pos: world.world_to_screen(hit.pos),
                    points,
                    perfect: hit.perfect,
                });
                out.push(GameEvent::UpdateScore(world.score));
                out.push(GameEvent::UpdateTargetsFound {
                    found: world.chimneys.delivered(),
                    total: world.chimneys.total(),
                });
                if hit.perfect {
                    out.push(GameEvent::Toast("Perfect!".into()));
                    out.push(GameEvent::Haptic(HapticPattern::Perfect));
                } else {
                    out.push(GameEvent::Haptic(HapticPattern::Deliver));
                }
            }
        }
        Signal::Radar(_) => {
            world.radar_uses += 1;
            let from = world.character.pos;
            match world.chimneys.nearest_outstanding(from) {
                Some(target) => out.push(GameEvent::DirectionIndicator(heading(from, target.pos))),
                None => out.push(GameEvent::Toast("Nothing left to find".into())),
            }
            out.push(GameEvent::Haptic(HapticPattern::Radar));
        }
        Signal::RadarCooling { remaining_ms } => {
            let secs = (remaining_ms / 1000.0).ceil() as u32;
            out.push(GameEvent::Toast(format!("Radar recharging ({secs}s)")));
        }
        Signal::HoldStart(_) => world.hovering = true,
        Signal::HoldEnd(_) => world.hovering = false,
        // Session-level signals
        Signal::Pause | Signal::Calibration(_) => {}
    }
}

fn update_chimneys(world: &mut World, tuning: &Tuning, out: &mut Vec<GameEvent>) {
    let spotted = world.chimneys.update_visibility(&world.fog);
    for id in &spotted {
        world.score += tuning.score.spotted;
        if let Some(chimney) = world.chimneys.get(*id) {
            out.push(GameEvent::ScorePopup {
                pos: world.world_to_screen(chimney.pos),
                points: tuning.score.spotted,
                perfect: false,
            });
        }
        out.push(GameEvent::Toast("Chimney spotted!".into()));
        out.push(GameEvent::Haptic(HapticPattern::Spotted));
    }
    if !spotted.is_empty() {
        out.push(GameEvent::UpdateScore(world.score));
    }

    // Spotted but flown past without a delivery
    let margin = tuning.score.miss_margin;
    let passed: Vec<u32> = world
        .chimneys
        .iter()
        .filter(|c| c.state == ChimneyState::Visible && !world.in_view(c.pos, margin))
        .map(|c| c.id)
        .collect();
    for id in passed {
        if world.chimneys.mark_missed(id) {
            debug!("Chimney {id} missed");
            out.push(GameEvent::Toast("Missed a chimney!".into()));
            out.push(GameEvent::Haptic(HapticPattern::Miss));
        }
    }
}

fn collect_power_ups(
    world: &mut World,
    now: f64,
    tuning: &Tuning,
    report: &mut TickReport,
    out: &mut Vec<GameEvent>,
) {
    let reach = POWER_UP_RADIUS + CHARACTER_RADIUS;
    let pos = world.character.pos;
    let picked: Vec<(PowerUpKind, Vec2)> = world
        .power_ups
        .iter_mut()
        .filter(|p| !p.collected && p.pos.distance_squared(pos) <= reach * reach)
        .filter_map(|p| p.collect().then_some((p.kind, p.pos)))
        .collect();

    for (kind, at) in picked {
        world.score += tuning.score.power_up;
        let effects = &tuning.power_ups;
        if let Some(ms) = kind.effect_ms(effects) {
            world.effects.activate(kind, now + ms);
        }
        match kind {
            PowerUpKind::Reveal => {
                world.fog.add_temporary(pos, tuning.fog.reveal_radius, now + tuning.fog.reveal_ms);
            }
            PowerUpKind::BoostCharge => report.charges_granted += 1,
            PowerUpKind::ExtraTime => {
                world.time_left += effects.extra_time_secs;
                out.push(GameEvent::UpdateTimer(world.timer_secs()));
            }
            PowerUpKind::Shield => world.character.shield_until(now + effects.shield_ms),
            PowerUpKind::Lantern => {}
        }
        debug!("Collected {kind:?}");
        out.push(GameEvent::Toast(kind.label().into()));
        out.push(GameEvent::ScorePopup {
            pos: world.world_to_screen(at),
            points: tuning.score.power_up,
            perfect: false,
        });
        out.push(GameEvent::UpdateScore(world.score));
    }
}

fn update_hazards(world: &mut World, now: f64, tuning: &Tuning, out: &mut Vec<GameEvent>) {
    let width = world.size.x;
    for cloud in &mut world.hazards {
        cloud.step(width);
    }

    let character_hit = world
        .hazards
        .iter()
        .any(|c| c.touches(world.character.pos, CHARACTER_RADIUS));
    let shielded = world.effects.is_active(PowerUpKind::Shield, now);
    if character_hit && !shielded && world.character.freeze(now, &tuning.character) {
        out.push(GameEvent::Toast("Frozen!".into()));
        out.push(GameEvent::Haptic(HapticPattern::Bump));
    }

    let sleigh_hit = world
        .hazards
        .iter()
        .any(|c| c.touches(world.sleigh.pos, SLEIGH_RADIUS));
    if sleigh_hit && world.sleigh.mark_collision() {
        info!("Sleigh clipped an ice cloud");
        out.push(GameEvent::Toast("The sleigh got iced!".into()));
        out.push(GameEvent::Haptic(HapticPattern::Bump));
    }
}

/// End the level short of a full delivery
fn fail(world: &mut World, outcome: Outcome, out: &mut Vec<GameEvent>) {
    world.outcome = outcome;
    let found = world.chimneys.delivered();
    let total = world.chimneys.total();
    info!("Level {} over ({outcome:?}): {found}/{total} delivered", world.level.index + 1);
    out.push(GameEvent::Failure {
        found,
        total,
        score: world.score,
    });
    out.push(GameEvent::Haptic(HapticPattern::Failure));
}

fn complete(world: &mut World, tuning: &Tuning, out: &mut Vec<GameEvent>) {
    let stats = LevelStats {
        time_left_secs: world.time_left,
        time_limit_secs: world.level.time_limit_secs,
        all_delivered: world.chimneys.all_delivered(),
        boosts_used: world.boosts_used,
        radar_uses: world.radar_uses,
        sleigh_collided: world.sleigh.collided,
    };
    let result = LevelResult::new(world.score, &stats, &tuning.score);
    world.score = result.final_score();
    world.outcome = Outcome::Complete;
    world.result = Some(result);

    info!(
        "Level {} complete: score {} (bonus {}), {} stars",
        world.level.index + 1,
        world.score,
        result.bonus.total(),
        result.stars
    );
    out.push(GameEvent::UpdateScore(world.score));
    out.push(GameEvent::Success {
        score: world.score,
        time_left_secs: world.time_left.max(0.0).floor() as u32,
        stars: result.stars,
    });
    out.push(GameEvent::Haptic(HapticPattern::Success));
}

/// Reset the world and generate a level from its config
pub fn start_level(world: &mut World, level: LevelConfig, seed: u64, tuning: &Tuning) -> Result<()> {
    level.validate()?;
    let view = world.view;
    if view.x < MIN_VIEW_SIZE || view.y < MIN_VIEW_SIZE {
        return Err(GameError::ViewportTooSmall {
            width: view.x,
            height: view.y,
        });
    }

    world.reseed(seed);
    world.size = world_size(view);
    world.clock = 0.0;
    world.ticks = 0;
    world.time_left = level.time_limit_secs;
    world.character = Character::new(spawn_point(view), tuning.character.base_glow);
    world.sleigh = Sleigh::behind(&world.character, &tuning.sleigh);
    world.fog.clear();
    world.effects.clear();
    world.score = 0;
    world.boosts_used = 0;
    world.radar_uses = 0;
    world.hovering = false;
    world.outcome = Outcome::Running;
    world.result = None;

    let spawn = &tuning.spawn;
    let size = world.size;
    let margin = spawn.margin;
    let roof_line = size.y * (1.0 - spawn.rooftop_fraction);

    // Chimneys on the rooftops
    let rooftops = Region::new(Vec2::new(margin, roof_line), size - Vec2::splat(margin));
    let (chimneys, placement) = Chimneys::spawn(
        world.rng(),
        rooftops,
        level.target_count as usize,
        spawn.chimney_separation,
        spawn.attempts_per_item,
    );
    if placement.points.is_empty() {
        return Err(GameError::EmptySpawn {
            index: level.index,
            attempts: placement.attempts,
        });
    }
    if placement.is_short() {
        warn!(
            "Level {}: placed {} of {} chimneys",
            level.index + 1,
            placement.points.len(),
            placement.requested
        );
    }
    world.chimneys = chimneys;

    // Power-ups anywhere, clear of the chimneys and the start
    let everywhere = Region::new(Vec2::splat(margin), size - Vec2::splat(margin));
    let taken: Vec<Vec2> = world
        .chimneys
        .iter()
        .map(|c| c.pos)
        .chain(std::iter::once(world.character.pos))
        .collect();
    let placement = place(
        world.rng(),
        everywhere,
        level.power_up_count as usize,
        spawn.power_up_separation,
        spawn.attempts_per_item,
        &taken,
    );
    if placement.is_short() {
        warn!("Level {}: placed {} of {} power-ups", level.index + 1, placement.points.len(), placement.requested);
    }
    let mut power_ups = Vec::with_capacity(placement.points.len());
    for (i, &pos) in placement.points.iter().enumerate() {
        power_ups.push(PowerUp {
            id: i as u32,
            pos,
            kind: PowerUpKind::random(world.rng()),
            collected: false,
        });
    }
    world.power_ups = power_ups;

    // Ice clouds in the sky, away from the start
    let sky = Region::new(Vec2::splat(margin), Vec2::new(size.x - margin, roof_line - margin));
    let start = [world.character.pos];
    let placement = place(
        world.rng(),
        sky,
        level.hazard_count as usize,
        spawn.hazard_separation,
        spawn.attempts_per_item,
        &start,
    );
    let speed = spawn.hazard_drift * (1.0 + level.wind * 10.0);
    let mut hazards = Vec::with_capacity(placement.points.len());
    for &pos in &placement.points {
        let drift = if world.rng().random_bool(0.5) { speed } else { -speed };
        hazards.push(IceCloud {
            pos,
            radius: spawn.hazard_radius,
            drift,
        });
    }
    world.hazards = hazards;

    info!(
        "Level {} started: {} chimneys, {} power-ups, {} ice clouds, {:?} fog, {}s",
        level.index + 1,
        world.chimneys.total(),
        world.power_ups.len(),
        world.hazards.len(),
        level.fog,
        level.time_limit_secs
    );
    world.level = level;
    push_glow(world, tuning);
    world.follow_camera();
    Ok(())
}

/// Demo steering: fly just above the nearest outstanding chimney and tap
/// every chimney that shows through the fog
fn pilot(world: &World, tuning: &CharacterTuning, input: &mut TickInput) {
    let from = world.character.pos;
    input.steering = match world.chimneys.nearest_outstanding(from) {
        Some(target) => {
            let hover = target.pos - Vec2::new(0.0, tuning.nose_offset * 2.0);
            cap_length((hover - from) / 40.0, 1.2)
        }
        None => Vec2::ZERO,
    };
    let taps = world
        .chimneys
        .iter()
        .filter(|c| c.state == ChimneyState::Visible && world.in_view(c.pos, 0.0))
        .map(|c| Signal::Tap(c.pos));
    input.signals.extend(taps);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::levels;
    use crate::sim::state::World;

    fn view() -> Vec2 {
        Vec2::new(DEFAULT_VIEW_WIDTH, DEFAULT_VIEW_HEIGHT)
    }

    fn started(index: u32, seed: u64) -> (World, Tuning) {
        let tuning = Tuning::default();
        let mut world = World::new(seed, view(), &tuning);
        start_level(&mut world, levels::level(index), seed, &tuning).unwrap();
        (world, tuning)
    }

    /// A world with five chimneys in a row on the first screen
    fn five_in_a_row(time_limit_secs: f32) -> (World, Tuning) {
        let (mut world, tuning) = started(0, 1);
        world.chimneys = Chimneys::from_positions(&[
            Vec2::new(60.0, 600.0),
            Vec2::new(140.0, 600.0),
            Vec2::new(220.0, 600.0),
            Vec2::new(300.0, 600.0),
            Vec2::new(380.0, 600.0),
        ]);
        world.power_ups.clear();
        world.hazards.clear();
        world.level.time_limit_secs = time_limit_secs;
        world.time_left = time_limit_secs;
        (world, tuning)
    }

    fn reveal_all(world: &mut World) {
        world.fog.add_temporary(Vec2::new(220.0, 600.0), 1000.0, f64::MAX);
    }

    fn tap(world: &World, id: u32) -> Signal {
        Signal::Tap(world.chimneys.get(id).unwrap().pos)
    }

    #[test]
    fn test_start_level_spawns_entities() {
        let (world, _) = started(3, 77);
        assert_eq!(world.chimneys.total(), 6);
        assert_eq!(world.power_ups.len(), 3);
        assert_eq!(world.hazards.len(), 2);
        assert_eq!(world.time_left, 85.0);
        assert!(world.fog.glow().is_some());
        for c in world.chimneys.iter() {
            assert_eq!(c.state, ChimneyState::Hidden);
            assert!(c.pos.y >= world.size.y * 0.5);
        }
    }

    #[test]
    fn test_start_level_rejects_tiny_viewport() {
        let tuning = Tuning::default();
        let mut world = World::new(1, Vec2::new(100.0, 100.0), &tuning);
        let err = start_level(&mut world, levels::level(0), 1, &tuning).unwrap_err();
        assert!(matches!(err, GameError::ViewportTooSmall { .. }));
    }

    #[test]
    fn test_determinism() {
        let (mut a, tuning) = started(4, 99_999);
        let (mut b, _) = started(4, 99_999);
        let input = TickInput {
            steering: Vec2::new(0.8, 0.3),
            ..Default::default()
        };
        let mut out = Vec::new();
        for _ in 0..240 {
            tick(&mut a, &input, &tuning, &mut out);
            tick(&mut b, &input, &tuning, &mut out);
        }
        assert_eq!(a.character.pos, b.character.pos);
        assert_eq!(a.sleigh.pos, b.sleigh.pos);
        assert_eq!(a.score, b.score);
        assert_eq!(a.hazards[0].pos, b.hazards[0].pos);
    }

    #[test]
    fn test_timer_runs_out() {
        let (mut world, tuning) = five_in_a_row(90.0);
        reveal_all(&mut world);
        let mut out = Vec::new();
        tick(&mut world, &TickInput::default(), &tuning, &mut out);
        let taps = TickInput {
            signals: vec![tap(&world, 0), tap(&world, 1)],
            ..Default::default()
        };
        tick(&mut world, &taps, &tuning, &mut out);
        assert_eq!(world.chimneys.delivered(), 2);

        world.time_left = SIM_DT * 0.5;
        out.clear();
        let report = tick(&mut world, &TickInput::default(), &tuning, &mut out);
        assert_eq!(report.finished, Some(Outcome::TimedOut));
        assert_eq!(world.outcome, Outcome::TimedOut);
        assert!(out.contains(&GameEvent::Failure {
            found: 2,
            total: 5,
            score: world.score
        }));

        // Ended levels don't tick
        let clock = world.clock;
        tick(&mut world, &TickInput::default(), &tuning, &mut out);
        assert_eq!(world.clock, clock);
    }

    #[test]
    fn test_clean_run_earns_three_stars() {
        let (mut world, tuning) = five_in_a_row(90.0);
        reveal_all(&mut world);
        let mut out = Vec::new();
        tick(&mut world, &TickInput::default(), &tuning, &mut out);
        assert_eq!(world.chimneys.spotted(), 5);

        world.time_left = 12.5;
        let taps = TickInput {
            signals: (0..5).map(|id| tap(&world, id)).collect(),
            ..Default::default()
        };
        let report = tick(&mut world, &taps, &tuning, &mut out);
        assert_eq!(report.finished, Some(Outcome::Complete));

        let result = world.result.unwrap();
        assert_eq!(result.bonus.total(), 1220);
        assert_eq!(result.stars, 3);
        // 5 spotted (10 each) + 5 perfect deliveries (200 each)
        assert_eq!(result.base, 50 + 1000);
        assert_eq!(world.score, 50 + 1000 + 1220);
        assert!(out.contains(&GameEvent::Success {
            score: world.score,
            time_left_secs: 12,
            stars: 3
        }));
    }

    #[test]
    fn test_hidden_chimney_ignores_taps() {
        let (mut world, tuning) = five_in_a_row(90.0);
        let mut out = Vec::new();
        let taps = TickInput {
            signals: vec![tap(&world, 4)],
            ..Default::default()
        };
        tick(&mut world, &taps, &tuning, &mut out);
        assert_eq!(world.chimneys.delivered(), 0);
    }

    #[test]
    fn test_boost_opens_temporary_hole() {
        let (mut world, tuning) = started(0, 5);
        world.power_ups.clear();
        let input = TickInput {
            signals: vec![Signal::Boost { charges_left: 2, overheated: false }],
            ..Default::default()
        };
        let mut out = Vec::new();
        tick(&mut world, &input, &tuning, &mut out);
        assert_eq!(world.boosts_used, 1);
        assert_eq!(world.fog.temporary_count(), 1);
        assert!(world.character.is_boosting(world.clock));
        assert!(out.contains(&GameEvent::UpdateBoostCharges(2)));

        // Hole closes after 3s of game time
        for _ in 0..181 {
            tick(&mut world, &TickInput::default(), &tuning, &mut out);
        }
        assert_eq!(world.fog.temporary_count(), 0);
    }

    #[test]
    fn test_radar_points_at_nearest_outstanding() {
        let (mut world, tuning) = five_in_a_row(90.0);
        world.character.pos = Vec2::new(60.0, 400.0);
        world.sleigh = Sleigh::behind(&world.character, &tuning.sleigh);
        let input = TickInput {
            signals: vec![Signal::Radar(Vec2::ZERO)],
            ..Default::default()
        };
        let mut out = Vec::new();
        tick(&mut world, &input, &tuning, &mut out);
        assert_eq!(world.radar_uses, 1);
        let angle = out
            .iter()
            .find_map(|e| match e {
                GameEvent::DirectionIndicator(a) => Some(*a),
                _ => None,
            })
            .unwrap();
        // Straight down
        assert!((angle - std::f32::consts::FRAC_PI_2).abs() < 0.05);
    }

    #[test]
    fn test_spotted_chimney_left_behind_is_missed() {
        let (mut world, tuning) = five_in_a_row(90.0);
        reveal_all(&mut world);
        let mut out = Vec::new();
        tick(&mut world, &TickInput::default(), &tuning, &mut out);

        world.character.pos = Vec2::new(1100.0, 300.0);
        out.clear();
        let report = tick(&mut world, &TickInput::default(), &tuning, &mut out);
        assert_eq!(world.chimneys.missed(), 5);
        assert_eq!(report.finished, Some(Outcome::Failed));
        assert_eq!(world.outcome, Outcome::Failed);
        assert!(world.result.is_none());
        assert!(out.contains(&GameEvent::Failure {
            found: 0,
            total: 5,
            score: world.score
        }));
        assert!(!out.iter().any(|e| matches!(e, GameEvent::Success { .. })));
    }

    #[test]
    fn test_one_miss_ends_the_level_without_stars() {
        let (mut world, tuning) = five_in_a_row(90.0);
        world.chimneys = Chimneys::from_positions(&[Vec2::new(60.0, 600.0), Vec2::new(140.0, 600.0)]);
        reveal_all(&mut world);
        let mut out = Vec::new();
        tick(&mut world, &TickInput::default(), &tuning, &mut out);
        let taps = TickInput {
            signals: vec![tap(&world, 0)],
            ..Default::default()
        };
        tick(&mut world, &taps, &tuning, &mut out);
        assert_eq!(world.chimneys.delivered(), 1);
        assert!(world.is_running());

        // The other one is flown past
        world.chimneys.mark_missed(1);
        out.clear();
        let report = tick(&mut world, &TickInput::default(), &tuning, &mut out);
        assert_eq!(report.finished, Some(Outcome::Failed));
        assert!(world.result.is_none());
        assert!(out.contains(&GameEvent::Failure {
            found: 1,
            total: 2,
            score: world.score
        }));
        assert!(!out.iter().any(|e| matches!(e, GameEvent::Success { .. })));

        let clock = world.clock;
        tick(&mut world, &TickInput::default(), &tuning, &mut out);
        assert_eq!(world.clock, clock);
    }

    #[test]
    fn test_power_up_pickup() {
        let (mut world, tuning) = five_in_a_row(90.0);
        let at = world.character.pos;
        world.power_ups = vec![
            PowerUp { id: 0, pos: at, kind: PowerUpKind::ExtraTime, collected: false },
            PowerUp { id: 1, pos: at, kind: PowerUpKind::BoostCharge, collected: false },
        ];
        let mut out = Vec::new();
        let report = tick(&mut world, &TickInput::default(), &tuning, &mut out);
        assert_eq!(report.charges_granted, 1);
        assert!(world.time_left > 99.0);
        assert_eq!(world.score, 100);

        // One-shot
        let report = tick(&mut world, &TickInput::default(), &tuning, &mut out);
        assert_eq!(report.charges_granted, 0);
        assert_eq!(world.score, 100);
    }

    #[test]
    fn test_timed_power_ups_start_effects() {
        let (mut world, tuning) = five_in_a_row(90.0);
        let at = world.character.pos;
        world.power_ups = vec![
            PowerUp { id: 0, pos: at, kind: PowerUpKind::Lantern, collected: false },
            PowerUp { id: 1, pos: at, kind: PowerUpKind::ExtraTime, collected: false },
        ];
        let mut out = Vec::new();
        tick(&mut world, &TickInput::default(), &tuning, &mut out);
        let now = world.clock;
        assert_eq!(
            world.effects.expires_at(PowerUpKind::Lantern),
            Some(now + tuning.power_ups.lantern_ms)
        );
        assert_eq!(world.effects.expires_at(PowerUpKind::ExtraTime), None);
        assert!(world.effects.is_active(PowerUpKind::Lantern, now));
    }

    #[test]
    fn test_ice_cloud_freezes_unless_shielded() {
        let (mut world, tuning) = five_in_a_row(90.0);
        world.hazards = vec![IceCloud { pos: world.character.pos, radius: 45.0, drift: 0.0 }];
        let mut out = Vec::new();
        tick(&mut world, &TickInput::default(), &tuning, &mut out);
        assert!(world.character.is_iced(world.clock));
        assert!(world.sleigh.collided);

        let (mut shielded, _) = five_in_a_row(90.0);
        shielded.effects.activate(PowerUpKind::Shield, 10_000.0);
        shielded.hazards = vec![IceCloud { pos: shielded.character.pos, radius: 45.0, drift: 0.0 }];
        tick(&mut shielded, &TickInput::default(), &tuning, &mut out);
        assert!(!shielded.character.is_iced(shielded.clock));
    }

    #[test]
    fn test_wind_oscillates() {
        assert_eq!(wind_at(0.0, 1234.0, 0.5), Vec2::ZERO);
        let gust = wind_at(0.1, 500.0, 0.5);
        assert!((gust.x - 0.1).abs() < 1e-5);
        assert!(wind_at(0.1, 1500.0, 0.5).x < 0.0);
    }

    #[test]
    fn test_autopilot_clears_first_level() {
        let (mut world, tuning) = started(0, 2024);
        let input = TickInput {
            autopilot: true,
            ..Default::default()
        };
        let mut out = Vec::new();
        for _ in 0..(90 * 60) {
            if tick(&mut world, &input, &tuning, &mut out).finished.is_some() {
                break;
            }
        }
        assert_eq!(world.outcome, Outcome::Complete);
        assert_eq!(world.chimneys.delivered(), world.chimneys.total());
    }
}
