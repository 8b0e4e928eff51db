//! Shape generation for 2D primitives
//!
//! [`VertexCanvas`] tessellates canvas operations into a triangle list that
//! the wgpu pipeline uploads once per frame.

use glam::Vec2;
use std::f32::consts::PI;

use super::canvas::{Canvas, Rgba};
use super::vertex::Vertex;

/// Stroke width for outlines and lines, in pixels
pub const STROKE_WIDTH: f32 = 1.0;

const MIN_SEGMENTS: u32 = 12;
const MAX_SEGMENTS: u32 = 256;

/// Segment count that keeps edges smooth without flooding small circles
pub fn segments_for(radius: f32) -> u32 {
    ((radius * 0.5) as u32).clamp(MIN_SEGMENTS, MAX_SEGMENTS)
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }

    vertices
}

/// Generate vertices for a ring (hollow circle)
pub fn ring(
    center: Vec2,
    inner_radius: f32,
    outer_radius: f32,
    color: [f32; 4],
    segments: u32,
) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 6) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        let dir1 = Vec2::new(theta1.cos(), theta1.sin());
        let dir2 = Vec2::new(theta2.cos(), theta2.sin());

        let inner1 = center + dir1 * inner_radius;
        let outer1 = center + dir1 * outer_radius;
        let inner2 = center + dir2 * inner_radius;
        let outer2 = center + dir2 * outer_radius;

        // Two triangles per segment
        vertices.push(Vertex::new(inner1.x, inner1.y, color));
        vertices.push(Vertex::new(outer1.x, outer1.y, color));
        vertices.push(Vertex::new(inner2.x, inner2.y, color));

        vertices.push(Vertex::new(inner2.x, inner2.y, color));
        vertices.push(Vertex::new(outer1.x, outer1.y, color));
        vertices.push(Vertex::new(outer2.x, outer2.y, color));
    }

    vertices
}

/// Generate vertices for a line segment as a thin quad
pub fn line(from: Vec2, to: Vec2, width: f32, color: [f32; 4]) -> Vec<Vertex> {
    let dir = (to - from).normalize_or_zero();
    if dir == Vec2::ZERO {
        return Vec::new();
    }
    // Perpendicular for width
    let perp = Vec2::new(-dir.y, dir.x) * (width * 0.5);

    let a1 = from + perp;
    let a2 = from - perp;
    let b1 = to + perp;
    let b2 = to - perp;

    vec![
        Vertex::new(a1.x, a1.y, color),
        Vertex::new(a2.x, a2.y, color),
        Vertex::new(b1.x, b1.y, color),
        Vertex::new(b1.x, b1.y, color),
        Vertex::new(a2.x, a2.y, color),
        Vertex::new(b2.x, b2.y, color),
    ]
}

/// Canvas that accumulates triangles for one frame
#[derive(Debug, Clone)]
pub struct VertexCanvas {
    pub vertices: Vec<Vertex>,
    pub clear_color: Rgba,
}

impl Default for VertexCanvas {
    fn default() -> Self {
        Self {
            vertices: Vec::new(),
            clear_color: super::vertex::colors::BACKGROUND,
        }
    }
}

impl VertexCanvas {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Canvas for VertexCanvas {
    fn clear(&mut self, color: Rgba) {
        self.vertices.clear();
        self.clear_color = color;
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        self.vertices
            .extend(circle(center, radius, color, segments_for(radius)));
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        let half = STROKE_WIDTH * 0.5;
        self.vertices.extend(ring(
            center,
            (radius - half).max(0.0),
            radius + half,
            color,
            segments_for(radius),
        ));
    }

    fn line(&mut self, from: Vec2, to: Vec2, color: Rgba) {
        self.vertices.extend(line(from, to, STROKE_WIDTH, color));
    }
}
