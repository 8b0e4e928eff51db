//! Sphere tracing over the obstacle field
//!
//! Each step advances the ray by exactly the clearance at the current point.
//! The clearance is the distance to the nearest boundary, so nothing can lie
//! within that radius and a step never overshoots into an obstacle.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::field::{Circle, ObstacleField};
use super::sdf::ensure_finite;
use crate::consts::{HIT_THRESHOLD, MARCH_EPSILON, MAX_MARCH_STEPS};
use crate::error::{Error, Result};

/// Marcher thresholds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarchSettings {
    /// Loop stops once clearance drops to this or below
    pub epsilon: f64,
    /// Final clearance below this confirms a hit
    pub hit_threshold: f64,
    /// Iteration cap; reaching it ends the march as escaped
    pub max_steps: usize,
}

impl Default for MarchSettings {
    fn default() -> Self {
        Self {
            epsilon: MARCH_EPSILON,
            hit_threshold: HIT_THRESHOLD,
            max_steps: MAX_MARCH_STEPS,
        }
    }
}

/// One sample along the ray
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarchStep {
    pub point: DVec2,
    /// Signed distance to the nearest obstacle boundary at `point`
    pub clearance: f64,
}

/// Why a march stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Termination {
    /// Converged onto an obstacle boundary
    Hit,
    /// Clearance exceeded the far bound
    #[default]
    Escaped,
    /// Gave up after `max_steps` samples without converging
    IterationCap,
}

/// Result of one march. Rebuilt every tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarchResult {
    /// Samples in march order
    pub steps: Vec<MarchStep>,
    /// Index into the field of the obstacle that was hit
    pub hit: Option<usize>,
    pub termination: Termination,
}

impl MarchResult {
    /// Point where the ray stopped (the last sample)
    pub fn collision_point(&self) -> Option<DVec2> {
        self.steps.last().map(|s| s.point)
    }

    pub fn is_hit(&self) -> bool {
        self.hit.is_some()
    }

    /// Resolve the hit index against the field it was marched in
    pub fn hit_obstacle<'a>(&self, field: &'a ObstacleField) -> Option<&'a Circle> {
        self.hit.and_then(|i| field.get(i))
    }
}

/// Obstacle with the smallest signed distance to `p`, and that distance.
///
/// Ties keep the first obstacle in field order; an empty field returns
/// `(None, f64::INFINITY)`.
pub fn find_closest_obstacle(field: &ObstacleField, p: DVec2) -> (Option<&Circle>, f64) {
    let (index, d) = field.closest(p);
    (index.and_then(|i| field.get(i)), d)
}

/// Ray marcher bound to a far plane (the viewport diagonal)
#[derive(Debug, Clone, PartialEq)]
pub struct Marcher {
    settings: MarchSettings,
    max_distance: f64,
}

impl Marcher {
    pub fn new(settings: MarchSettings, max_distance: f64) -> Result<Self> {
        let mut marcher = Self {
            settings,
            max_distance: 0.0,
        };
        marcher.set_max_distance(max_distance)?;
        Ok(marcher)
    }

    pub fn settings(&self) -> &MarchSettings {
        &self.settings
    }

    pub fn max_distance(&self) -> f64 {
        self.max_distance
    }

    /// Update the far bound, e.g. after a viewport resize
    pub fn set_max_distance(&mut self, max_distance: f64) -> Result<()> {
        if !(max_distance.is_finite() && max_distance >= 0.0) {
            return Err(Error::InvalidState(format!(
                "max march distance {max_distance} must be finite and non-negative"
            )));
        }
        self.max_distance = max_distance;
        Ok(())
    }

    /// March from `origin` along `direction` into a fresh result
    pub fn march(&self, field: &ObstacleField, origin: DVec2, direction: DVec2) -> Result<MarchResult> {
        let mut result = MarchResult::default();
        self.march_into(field, origin, direction, &mut result)?;
        Ok(result)
    }

    /// March into `out`, reusing its step buffer.
    ///
    /// `direction` is normalized; a zero or non-finite direction or a
    /// non-finite origin is rejected and `out` is left untouched.
    pub fn march_into(
        &self,
        field: &ObstacleField,
        origin: DVec2,
        direction: DVec2,
        out: &mut MarchResult,
    ) -> Result<()> {
        ensure_finite(origin, "ray origin")?;
        let dir = ensure_finite(direction, "ray direction")?.normalize_or_zero();
        if dir == DVec2::ZERO {
            return Err(Error::InvalidState("ray direction has zero length".into()));
        }

        let MarchSettings {
            epsilon,
            hit_threshold,
            max_steps,
        } = self.settings;

        out.steps.clear();

        let mut point = origin;
        let (mut closest, mut clearance) = field.closest(point);
        out.steps.push(MarchStep { point, clearance });

        let stop = loop {
            if clearance <= epsilon {
                break Termination::Hit;
            }
            if clearance > self.max_distance {
                break Termination::Escaped;
            }
            if out.steps.len() >= max_steps {
                break Termination::IterationCap;
            }

            point += dir * clearance;
            (closest, clearance) = field.closest(point);
            out.steps.push(MarchStep { point, clearance });
        };

        if stop == Termination::IterationCap {
            log::warn!(
                "March from {} hit the {}-step cap (clearance {:.6}); treating as escaped",
                origin,
                max_steps,
                clearance
            );
            out.hit = None;
            out.termination = Termination::IterationCap;
            return Ok(());
        }

        out.hit = if clearance < hit_threshold { closest } else { None };
        out.termination = if out.hit.is_some() {
            Termination::Hit
        } else {
            Termination::Escaped
        };
        Ok(())
    }
}
