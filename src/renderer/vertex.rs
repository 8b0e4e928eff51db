//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position and color
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

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Colors for scene elements (straight alpha)
pub mod colors {
    /// #121212
    pub const BACKGROUND: [f32; 4] = [0.071, 0.071, 0.071, 1.0];
    pub const OBSTACLE_FILL: [f32; 4] = [1.0, 1.0, 1.0, 0.2];
    pub const OBSTACLE_STROKE: [f32; 4] = [1.0, 1.0, 1.0, 0.4];
    pub const STEP_STROKE: [f32; 4] = [1.0, 1.0, 1.0, 0.1];
    /// March circles when the ray escapes
    pub const STEP_FILL_MISS: [f32; 4] = [1.0, 1.0, 1.0, 0.08];
    pub const STEP_DOT: [f32; 4] = [1.0, 0.0, 0.0, 0.4];
    pub const RAY: [f32; 4] = [1.0, 1.0, 1.0, 0.1];

    /// Scale a color's alpha, like a canvas global alpha
    #[inline]
    pub fn with_alpha(color: [f32; 4], alpha: f32) -> [f32; 4] {
        [color[0], color[1], color[2], color[3] * alpha]
    }
}
