//! Rendering module
//!
//! Scene drawing goes through the [`Canvas`] trait; the WebGPU pipeline draws
//! the triangles a [`VertexCanvas`] collects.

pub mod canvas;
pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use canvas::{Canvas, DrawOp, Recorder, Rgba, draw_scene};
pub use pipeline::RenderState;
pub use shapes::VertexCanvas;
