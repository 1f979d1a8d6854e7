//! Triangle-list primitives
//!
//! Every helper appends to an existing list so a frame builds into one
//! buffer.

use glam::Vec2;
use std::f32::consts::TAU;

use super::vertex::Vertex;

/// Filled circle as a triangle fan
pub fn circle(out: &mut Vec<Vertex>, center: Vec2, radius: f32, color: [f32; 4], segments: u32) {
    let segments = segments.max(3);
    out.reserve((segments * 3) as usize);
    for i in 0..segments {
        let a = point_on(center, radius, i, segments);
        let b = point_on(center, radius, i + 1, segments);
        out.push(Vertex::new(center.x, center.y, color));
        out.push(Vertex::new(a.x, a.y, color));
        out.push(Vertex::new(b.x, b.y, color));
    }
}

/// Hollow circle band
pub fn ring(
    out: &mut Vec<Vertex>,
    center: Vec2,
    inner_radius: f32,
    outer_radius: f32,
    color: [f32; 4],
    segments: u32,
) {
    let segments = segments.max(3);
    out.reserve((segments * 6) as usize);
    for i in 0..segments {
        let inner1 = point_on(center, inner_radius, i, segments);
        let outer1 = point_on(center, outer_radius, i, segments);
        let inner2 = point_on(center, inner_radius, i + 1, segments);
        let outer2 = point_on(center, outer_radius, i + 1, segments);
        quad(out, inner1, outer1, inner2, outer2, color);
    }
}

/// Axis-aligned rectangle from its top-left corner
pub fn rect(out: &mut Vec<Vertex>, min: Vec2, size: Vec2, color: [f32; 4]) {
    let max = min + size;
    quad(
        out,
        min,
        Vec2::new(max.x, min.y),
        Vec2::new(min.x, max.y),
        max,
        color,
    );
}

/// Rectangle with a different color on the top and bottom edges
pub fn gradient_rect(out: &mut Vec<Vertex>, min: Vec2, size: Vec2, top: [f32; 4], bottom: [f32; 4]) {
    let max = min + size;
    out.extend([
        Vertex::new(min.x, min.y, top),
        Vertex::new(max.x, min.y, top),
        Vertex::new(min.x, max.y, bottom),
        Vertex::new(min.x, max.y, bottom),
        Vertex::new(max.x, min.y, top),
        Vertex::new(max.x, max.y, bottom),
    ]);
}

/// Thick line segment
pub fn line(out: &mut Vec<Vertex>, from: Vec2, to: Vec2, width: f32, color: [f32; 4]) {
    let dir = (to - from).normalize_or_zero();
    let perp = Vec2::new(-dir.y, dir.x) * (width / 2.0);
    quad(out, from + perp, from - perp, to + perp, to - perp, color);
}

/// Two triangles: (a, b, c) and (c, b, d)
fn quad(out: &mut Vec<Vertex>, a: Vec2, b: Vec2, c: Vec2, d: Vec2, color: [f32; 4]) {
    out.extend([
        Vertex::new(a.x, a.y, color),
        Vertex::new(b.x, b.y, color),
        Vertex::new(c.x, c.y, color),
        Vertex::new(c.x, c.y, color),
        Vertex::new(b.x, b.y, color),
        Vertex::new(d.x, d.y, color),
    ]);
}

fn point_on(center: Vec2, radius: f32, i: u32, segments: u32) -> Vec2 {
    let theta = (i as f32 / segments as f32) * TAU;
    center + Vec2::new(theta.cos(), theta.sin()) * radius
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_counts() {
        let mut out = Vec::new();
        circle(&mut out, Vec2::ZERO, 10.0, [1.0; 4], 12);
        assert_eq!(out.len(), 36);
        ring(&mut out, Vec2::ZERO, 8.0, 10.0, [1.0; 4], 12);
        assert_eq!(out.len(), 36 + 72);
        rect(&mut out, Vec2::ZERO, Vec2::ONE, [1.0; 4]);
        assert_eq!(out.len(), 36 + 72 + 6);
    }

    #[test]
    fn test_rect_covers_corners() {
        let mut out = Vec::new();
        rect(&mut out, Vec2::new(10.0, 20.0), Vec2::new(5.0, 5.0), [1.0; 4]);
        let xs: Vec<f32> = out.iter().map(|v| v.position[0]).collect();
        let ys: Vec<f32> = out.iter().map(|v| v.position[1]).collect();
        assert_eq!(xs.iter().cloned().fold(f32::MAX, f32::min), 10.0);
        assert_eq!(xs.iter().cloned().fold(f32::MIN, f32::max), 15.0);
        assert_eq!(ys.iter().cloned().fold(f32::MAX, f32::min), 20.0);
        assert_eq!(ys.iter().cloned().fold(f32::MIN, f32::max), 25.0);
    }

    #[test]
    fn test_circle_stays_on_radius() {
        let mut out = Vec::new();
        circle(&mut out, Vec2::new(50.0, 50.0), 10.0, [1.0; 4], 8);
        for v in &out {
            let d = Vec2::from(v.position).distance(Vec2::new(50.0, 50.0));
            assert!(d < 10.0 + 1e-3);
        }
    }
}
