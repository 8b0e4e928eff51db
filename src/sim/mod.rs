//! Deterministic simulation module
//!
//! All ray-marching and movement logic lives here. This module must be pure
//! and deterministic:
//! - One tick per frame, driven from outside
//! - Input arrives as an explicit snapshot, never read from shared state
//! - Stable iteration order (field order)
//! - No rendering or platform dependencies

pub mod field;
pub mod hero;
pub mod input;
pub mod march;
pub mod sdf;
pub mod tick;

pub use field::{Circle, MAX_SCATTER_COUNT, ObstacleField, ScatterParams, Tint};
pub use hero::{AngleWrap, Hero, Motion, direction_from_degrees};
pub use input::{InputState, Key, OpposingKeys};
pub use march::{
    MarchResult, MarchSettings, MarchStep, Marcher, Termination, find_closest_obstacle,
};
pub use sdf::{distance, sd_circle, signed_distance_to_circle};
pub use tick::{Viewport, World, tick};
