//! Vertex type and palette for the 2D pass

use bytemuck::{Pod, Zeroable};

/// Screen-space vertex: position in pixels, straight RGBA color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x4];

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Scene colors
pub mod colors {
    pub const SKY_TOP: [f32; 4] = [0.03, 0.04, 0.12, 1.0];
    pub const SKY_BOTTOM: [f32; 4] = [0.10, 0.12, 0.24, 1.0];
    pub const ROOFTOPS: [f32; 4] = [0.07, 0.06, 0.10, 1.0];
    pub const CHIMNEY: [f32; 4] = [0.55, 0.22, 0.18, 1.0];
    pub const CHIMNEY_DELIVERED: [f32; 4] = [0.95, 0.80, 0.30, 1.0];
    pub const CHIMNEY_MISSED: [f32; 4] = [0.35, 0.35, 0.38, 1.0];
    pub const POWER_UP: [f32; 4] = [0.45, 0.95, 0.75, 1.0];
    pub const SLEIGH: [f32; 4] = [0.85, 0.12, 0.15, 1.0];
    pub const ROPE: [f32; 4] = [0.75, 0.65, 0.45, 0.9];
    pub const CHARACTER: [f32; 4] = [0.62, 0.42, 0.26, 1.0];
    pub const NOSE: [f32; 4] = [1.0, 0.25, 0.2, 1.0];
    pub const ICE: [f32; 4] = [0.75, 0.9, 1.0, 0.55];
    pub const FOG: [f32; 3] = [0.78, 0.80, 0.86];
    pub const BOOST_RING: [f32; 4] = [1.0, 0.7, 0.2, 0.8];
    pub const SHIELD_RING: [f32; 4] = [0.5, 0.8, 1.0, 0.7];
    pub const FROZEN_RING: [f32; 4] = [0.85, 0.95, 1.0, 0.9];
}
