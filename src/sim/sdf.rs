//! Signed distance geometry
//!
//! Positive outside a shape, zero on its boundary, negative inside.

use glam::DVec2;

use super::field::Circle;
use crate::error::{Error, Result};

/// Euclidean distance between two points
#[inline]
pub fn distance(a: DVec2, b: DVec2) -> f64 {
    (a - b).length()
}

/// Signed distance to a circle given by center and radius
#[inline]
pub fn sd_circle(p: DVec2, center: DVec2, radius: f64) -> f64 {
    distance(p, center) - radius
}

/// Signed distance from `p` to an obstacle's boundary
#[inline]
pub fn signed_distance_to_circle(p: DVec2, circle: &Circle) -> f64 {
    sd_circle(p, circle.center, circle.radius)
}

/// Reject NaN/infinite vectors before they reach the marcher or the renderer
pub fn ensure_finite(v: DVec2, what: &str) -> Result<DVec2> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(Error::InvalidState(format!("{what} is not finite: {v}")))
    }
}
