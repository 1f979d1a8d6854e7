//! Frame builder
//!
//! Turns a read-only view of the session into one screen-space triangle
//! list. Draw order, back to front: sky and rooftops, chimneys, power-ups and
//! ice clouds, sleigh, character, fog overlay, effect indicators.

use glam::Vec2;

use super::shapes;
use super::vertex::{Vertex, colors};
use crate::consts::*;
use crate::session::Session;
use crate::settings::Settings;
use crate::sim::{ChimneyState, PowerUpKind, World};
use crate::tuning::Tuning;

/// Extra margin (px) so shapes straddling the screen edge still draw
const CULL_MARGIN: f32 = 40.0;
const SEGMENTS: u32 = 20;

/// Build the frame for the session's current world
pub fn build(session: &Session) -> Vec<Vertex> {
    let mut out = Vec::with_capacity(8192);
    build_world(session.world(), session.tuning(), session.settings(), &mut out);
    out
}

pub fn build_world(world: &World, tuning: &Tuning, settings: &Settings, out: &mut Vec<Vertex>) {
    background(world, tuning, out);
    chimneys(world, out);
    pickups(world, out);
    sleigh(world, out);
    character(world, tuning, out);
    fog_overlay(world, settings, out);
    effects(world, settings, out);
}

fn background(world: &World, tuning: &Tuning, out: &mut Vec<Vertex>) {
    shapes::gradient_rect(out, Vec2::ZERO, world.view, colors::SKY_TOP, colors::SKY_BOTTOM);
    let roof_y = world.size.y * (1.0 - tuning.spawn.rooftop_fraction) - world.camera.y;
    if roof_y < world.view.y {
        let top = Vec2::new(0.0, roof_y.max(0.0));
        shapes::rect(out, top, Vec2::new(world.view.x, world.view.y - top.y), colors::ROOFTOPS);
    }
}

fn chimneys(world: &World, out: &mut Vec<Vertex>) {
    let size = Vec2::new(CHIMNEY_WIDTH, CHIMNEY_HEIGHT);
    for chimney in world.chimneys.iter() {
        if !world.in_view(chimney.pos, CULL_MARGIN) {
            continue;
        }
        let color = match chimney.state {
            ChimneyState::Hidden | ChimneyState::Visible => colors::CHIMNEY,
            ChimneyState::Delivered => colors::CHIMNEY_DELIVERED,
            ChimneyState::Missed => colors::CHIMNEY_MISSED,
        };
        let min = world.world_to_screen(chimney.pos) - size / 2.0;
        shapes::rect(out, min, size, color);
        // Cap; wider on odd styles
        let cap = if chimney.style % 2 == 1 { 8.0 } else { 4.0 };
        shapes::rect(
            out,
            min - Vec2::new(cap / 2.0, 6.0),
            Vec2::new(size.x + cap, 6.0),
            color,
        );
    }
}

fn pickups(world: &World, out: &mut Vec<Vertex>) {
    for power_up in world.power_ups.iter().filter(|p| !p.collected) {
        if !world.in_view(power_up.pos, CULL_MARGIN) {
            continue;
        }
        let pos = world.world_to_screen(power_up.pos);
        shapes::circle(out, pos, POWER_UP_RADIUS, colors::POWER_UP, SEGMENTS);
        shapes::circle(out, pos, POWER_UP_RADIUS * 0.45, kind_color(power_up.kind), SEGMENTS);
    }
    for cloud in &world.hazards {
        if !world.in_view(cloud.pos, cloud.radius + CULL_MARGIN) {
            continue;
        }
        shapes::circle(out, world.world_to_screen(cloud.pos), cloud.radius, colors::ICE, SEGMENTS);
    }
}

fn kind_color(kind: PowerUpKind) -> [f32; 4] {
    match kind {
        PowerUpKind::Reveal => [1.0, 1.0, 1.0, 1.0],
        PowerUpKind::BoostCharge => colors::BOOST_RING,
        PowerUpKind::ExtraTime => [0.4, 1.0, 0.4, 1.0],
        PowerUpKind::Shield => colors::SHIELD_RING,
        PowerUpKind::Lantern => [1.0, 0.9, 0.5, 1.0],
    }
}

fn sleigh(world: &World, out: &mut Vec<Vertex>) {
    let from = world.world_to_screen(world.character.pos);
    let to = world.world_to_screen(world.sleigh.pos);
    shapes::line(out, from, to, 2.0, colors::ROPE);

    let body = Vec2::new(SLEIGH_RADIUS * 2.4, SLEIGH_RADIUS * 1.2);
    shapes::rect(out, to - body / 2.0, body, colors::SLEIGH);
}

fn character(world: &World, tuning: &Tuning, out: &mut Vec<Vertex>) {
    let c = &world.character;
    let pos = world.world_to_screen(c.pos);
    shapes::circle(out, pos, CHARACTER_RADIUS, colors::CHARACTER, SEGMENTS);
    let nose = world.world_to_screen(c.nose(&tuning.character));
    shapes::circle(out, nose, CHARACTER_RADIUS * 0.35, colors::NOSE, 12);
}

/// Grid over the viewport; each cell's alpha is the level's fog opacity
/// scaled by how fogged its center is
fn fog_overlay(world: &World, settings: &Settings, out: &mut Vec<Vertex>) {
    let cell = settings.fog_quality.fog_cell_size();
    let opacity = world.level.fog.opacity();
    let cols = (world.view.x / cell).ceil() as u32;
    let rows = (world.view.y / cell).ceil() as u32;
    for row in 0..rows {
        for col in 0..cols {
            let min = Vec2::new(col as f32 * cell, row as f32 * cell);
            let center = world.screen_to_world(min + Vec2::splat(cell / 2.0));
            let alpha = fog_alpha(world, opacity, center);
            if alpha <= 0.01 {
                continue;
            }
            let [r, g, b] = colors::FOG;
            shapes::rect(out, min, Vec2::splat(cell), [r, g, b, alpha]);
        }
    }
}

/// Overlay alpha at a world point
pub fn fog_alpha(world: &World, opacity: f32, p: Vec2) -> f32 {
    opacity * (1.0 - world.fog.visibility_amount(p))
}

fn effects(world: &World, settings: &Settings, out: &mut Vec<Vertex>) {
    let c = &world.character;
    let now = world.clock;
    let pos = world.world_to_screen(c.pos);
    let pulse = if settings.reduced_motion {
        0.0
    } else {
        ((now / 150.0).sin() as f32) * 2.0
    };

    let mut radius = CHARACTER_RADIUS + 4.0;
    let mut indicator = |color: [f32; 4], out: &mut Vec<Vertex>| {
        shapes::ring(out, pos, radius + pulse, radius + 3.0 + pulse, color, SEGMENTS);
        radius += 5.0;
    };
    if c.is_boosting(now) {
        indicator(colors::BOOST_RING, out);
    }
    if world.effects.is_active(PowerUpKind::Shield, now) {
        indicator(colors::SHIELD_RING, out);
    }
    if c.is_iced(now) {
        indicator(colors::FROZEN_RING, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStorage;
    use crate::session::SensorAccess;
    use crate::sim::start_level;

    fn started() -> (World, Tuning) {
        let tuning = Tuning::default();
        let view = Vec2::new(DEFAULT_VIEW_WIDTH, DEFAULT_VIEW_HEIGHT);
        let mut world = World::new(9, view, &tuning);
        start_level(&mut world, crate::sim::levels::level(2), 9, &tuning).unwrap();
        (world, tuning)
    }

    #[test]
    fn test_build_is_pure() {
        let mut session =
            Session::new(Tuning::default(), Box::new(MemoryStorage::default()), 11);
        session.set_sensor_access(SensorAccess::Unavailable);
        session.play(0);
        for _ in 0..30 {
            session.tick();
        }
        let before = serde_json::to_string(session.world()).unwrap();
        let first = build(&session);
        let second = build(&session);
        let after = serde_json::to_string(session.world()).unwrap();
        assert_eq!(before, after);
        assert_eq!(first, second);
        assert!(!first.is_empty());
    }

    #[test]
    fn test_background_comes_first() {
        let (world, tuning) = started();
        let mut out = Vec::new();
        build_world(&world, &tuning, &Settings::default(), &mut out);
        assert_eq!(out[0].color, colors::SKY_TOP);
        assert_eq!(out[0].position, [0.0, 0.0]);
    }

    #[test]
    fn test_fog_alpha_tracks_clearing() {
        let (world, _) = started();
        let opacity = world.level.fog.opacity();
        // Glow center is clear, far corner fully fogged
        let glow = world.fog.glow().unwrap().pos;
        assert!(fog_alpha(&world, opacity, glow) < 1e-3);
        let far = world.size - Vec2::splat(1.0);
        assert!((fog_alpha(&world, opacity, far) - opacity).abs() < 1e-3);
    }

    #[test]
    fn test_finer_fog_quality_draws_more_cells() {
        let (world, _) = started();
        let count = |quality| {
            let settings = Settings {
                fog_quality: quality,
                ..Settings::default()
            };
            let mut out = Vec::new();
            fog_overlay(&world, &settings, &mut out);
            out.len()
        };
        assert!(count(crate::settings::FogQuality::High) > count(crate::settings::FogQuality::Low));
    }

    #[test]
    fn test_delivered_chimney_changes_color() {
        let (mut world, _) = started();
        world.chimneys = crate::sim::Chimneys::from_positions(&[Vec2::new(100.0, 600.0)]);
        world.fog.add_temporary(Vec2::new(100.0, 600.0), 100.0, f64::MAX);
        world.chimneys.update_visibility(&world.fog);
        world.chimneys.resolve_tap(Vec2::new(100.0, 600.0), 20.0, 20.0);

        let mut out = Vec::new();
        chimneys(&world, &mut out);
        assert!(out.iter().all(|v| v.color == colors::CHIMNEY_DELIVERED));
    }
}
