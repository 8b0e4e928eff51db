//! Obstacle field
//!
//! A fixed, ordered set of circles built once per session. Iteration order is
//! only significant for tie-breaking in [`ObstacleField::closest`].

use glam::DVec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::sdf::{distance, signed_distance_to_circle};
use crate::error::{Error, Result};

/// Display tag for an obstacle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tint {
    Red,
    Yellow,
    Blue,
    Green,
    Gold,
    Orange,
}

impl Tint {
    pub const ALL: [Tint; 6] = [
        Tint::Red,
        Tint::Yellow,
        Tint::Blue,
        Tint::Green,
        Tint::Gold,
        Tint::Orange,
    ];

    /// Opaque RGBA for this tint
    pub fn rgba(&self) -> [f32; 4] {
        match self {
            Tint::Red => [1.0, 0.0, 0.0, 1.0],
            Tint::Yellow => [1.0, 1.0, 0.0, 1.0],
            Tint::Blue => [0.0, 0.0, 1.0, 1.0],
            Tint::Green => [0.0, 0.5, 0.0, 1.0],
            Tint::Gold => [1.0, 0.843, 0.0, 1.0],
            Tint::Orange => [1.0, 0.647, 0.0, 1.0],
        }
    }
}

/// A circular obstacle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: DVec2,
    pub radius: f64,
    pub tint: Tint,
}

impl Circle {
    pub const fn new(center: DVec2, radius: f64, tint: Tint) -> Self {
        Self {
            center,
            radius,
            tint,
        }
    }

    /// True if `p` lies inside or on the boundary
    #[inline]
    pub fn contains(&self, p: DVec2) -> bool {
        distance(p, self.center) <= self.radius
    }
}

/// Parameters for a randomly scattered layout
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScatterParams {
    pub seed: u64,
    pub count: usize,
    pub min_radius: f64,
    pub max_radius: f64,
}

/// Placement attempts per requested obstacle before giving up on it
const SCATTER_ATTEMPTS: usize = 64;

/// Upper bound on `ScatterParams::count`
pub const MAX_SCATTER_COUNT: usize = 256;

impl ScatterParams {
    /// Reject counts and radii the layout generator cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.count > MAX_SCATTER_COUNT {
            return Err(Error::Settings(format!(
                "scatter count {} exceeds {}",
                self.count, MAX_SCATTER_COUNT
            )));
        }
        if !(self.min_radius.is_finite()
            && self.max_radius.is_finite()
            && self.min_radius > 0.0
            && self.min_radius <= self.max_radius)
        {
            return Err(Error::Settings(format!(
                "scatter radii must satisfy 0 < min <= max (got {}..{})",
                self.min_radius, self.max_radius
            )));
        }
        Ok(())
    }
}

/// Immutable collection of obstacles
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObstacleField {
    circles: Vec<Circle>,
}

impl ObstacleField {
    /// Build a field, rejecting non-finite centers and non-positive radii
    pub fn new(circles: Vec<Circle>) -> Result<Self> {
        for (index, c) in circles.iter().enumerate() {
            if !c.center.is_finite() {
                return Err(Error::InvalidObstacle {
                    index,
                    reason: format!("center {} is not finite", c.center),
                });
            }
            if !(c.radius.is_finite() && c.radius > 0.0) {
                return Err(Error::InvalidObstacle {
                    index,
                    reason: format!("radius {} must be positive and finite", c.radius),
                });
            }
        }
        Ok(Self { circles })
    }

    /// The six-circle layout the demo ships with
    pub fn classic() -> Self {
        Self {
            circles: vec![
                Circle::new(DVec2::new(500.0, 200.0), 50.0, Tint::Red),
                Circle::new(DVec2::new(800.0, 100.0), 100.0, Tint::Yellow),
                Circle::new(DVec2::new(100.0, 300.0), 80.0, Tint::Blue),
                Circle::new(DVec2::new(150.0, 50.0), 40.0, Tint::Green),
                Circle::new(DVec2::new(500.0, 800.0), 120.0, Tint::Gold),
                Circle::new(DVec2::new(190.0, 600.0), 70.0, Tint::Orange),
            ],
        }
    }

    /// Seeded, non-overlapping random layout inside `width` x `height`.
    ///
    /// `keep_clear` is left free of obstacles (the hero spawn point). Circles
    /// that cannot be placed after a bounded number of attempts are skipped, so
    /// the result may hold fewer than `params.count` obstacles.
    pub fn scattered(params: &ScatterParams, width: f64, height: f64, keep_clear: DVec2) -> Result<Self> {
        params.validate()?;

        let mut rng = Pcg32::seed_from_u64(params.seed);
        let mut circles: Vec<Circle> = Vec::new();

        for i in 0..params.count {
            for _ in 0..SCATTER_ATTEMPTS {
                let radius = if params.min_radius < params.max_radius {
                    rng.random_range(params.min_radius..params.max_radius)
                } else {
                    params.min_radius
                };
                if width <= 2.0 * radius || height <= 2.0 * radius {
                    break;
                }
                let center = DVec2::new(
                    rng.random_range(radius..width - radius),
                    rng.random_range(radius..height - radius),
                );
                let overlaps = circles
                    .iter()
                    .any(|c| distance(c.center, center) < c.radius + radius);
                if overlaps || distance(center, keep_clear) <= radius {
                    continue;
                }
                circles.push(Circle::new(center, radius, Tint::ALL[i % Tint::ALL.len()]));
                break;
            }
        }

        if circles.len() < params.count {
            log::warn!(
                "Scattered layout placed {} of {} obstacles",
                circles.len(),
                params.count
            );
        }

        Self::new(circles)
    }

    pub fn circles(&self) -> &[Circle] {
        &self.circles
    }

    pub fn get(&self, index: usize) -> Option<&Circle> {
        self.circles.get(index)
    }

    pub fn len(&self) -> usize {
        self.circles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.circles.is_empty()
    }

    /// Closest obstacle to `p` by signed distance, as `(index, distance)`.
    ///
    /// Ties keep the first obstacle in field order. An empty field yields
    /// `(None, f64::INFINITY)`.
    pub fn closest(&self, p: DVec2) -> (Option<usize>, f64) {
        self.circles
            .iter()
            .enumerate()
            .fold((None, f64::INFINITY), |acc, (i, circle)| {
                let d = signed_distance_to_circle(p, circle);
                if d < acc.1 { (Some(i), d) } else { acc }
            })
    }

    /// True if `p` lies inside or on any obstacle
    pub fn blocks(&self, p: DVec2) -> bool {
        self.circles.iter().any(|c| c.contains(p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_bad_radius() {
        let err = ObstacleField::new(vec![
            Circle::new(DVec2::new(0.0, 0.0), 10.0, Tint::Red),
            Circle::new(DVec2::new(50.0, 0.0), 0.0, Tint::Blue),
        ])
        .unwrap_err();
        assert!(matches!(err, Error::InvalidObstacle { index: 1, .. }));

        assert!(
            ObstacleField::new(vec![Circle::new(DVec2::new(f64::NAN, 0.0), 5.0, Tint::Red)])
                .is_err()
        );
    }

    #[test]
    fn test_closest_picks_minimum() {
        let field = ObstacleField::classic();
        let (idx, d) = field.closest(DVec2::new(500.0, 140.0));
        assert_eq!(idx, Some(0));
        assert!((d - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_closest_tie_keeps_first() {
        let field = ObstacleField::new(vec![
            Circle::new(DVec2::new(-10.0, 0.0), 5.0, Tint::Red),
            Circle::new(DVec2::new(10.0, 0.0), 5.0, Tint::Blue),
        ])
        .unwrap();
        let (idx, d) = field.closest(DVec2::ZERO);
        assert_eq!(idx, Some(0));
        assert_eq!(d, 5.0);
    }

    #[test]
    fn test_closest_empty_field() {
        let field = ObstacleField::default();
        let (idx, d) = field.closest(DVec2::new(3.0, 4.0));
        assert!(idx.is_none());
        assert!(d.is_infinite() && d > 0.0);
    }

    #[test]
    fn test_blocks_includes_boundary() {
        let field = ObstacleField::classic();
        assert!(field.blocks(DVec2::new(550.0, 200.0)));
        assert!(field.blocks(DVec2::new(500.0, 200.0)));
        assert!(!field.blocks(DVec2::new(550.01, 200.0)));
    }

    #[test]
    fn test_scattered_is_deterministic_and_disjoint() {
        let params = ScatterParams {
            seed: 7,
            count: 12,
            min_radius: 20.0,
            max_radius: 60.0,
        };
        let spawn = DVec2::new(640.0, 480.0);
        let a = ObstacleField::scattered(&params, 1280.0, 960.0, spawn).unwrap();
        let b = ObstacleField::scattered(&params, 1280.0, 960.0, spawn).unwrap();
        assert_eq!(a, b);
        assert!(!a.is_empty());
        assert!(!a.blocks(spawn));

        for (i, c1) in a.circles().iter().enumerate() {
            for c2 in &a.circles()[i + 1..] {
                assert!(distance(c1.center, c2.center) >= c1.radius + c2.radius);
            }
        }
    }

    #[test]
    fn test_scattered_rejects_bad_radii() {
        let params = ScatterParams {
            seed: 1,
            count: 3,
            min_radius: 50.0,
            max_radius: 10.0,
        };
        assert!(ObstacleField::scattered(&params, 500.0, 500.0, DVec2::ZERO).is_err());
    }

    #[test]
    fn test_scattered_rejects_oversized_count() {
        let params = ScatterParams {
            seed: 1,
            count: usize::MAX,
            min_radius: 10.0,
            max_radius: 20.0,
        };
        assert!(matches!(
            ObstacleField::scattered(&params, 800.0, 600.0, DVec2::ZERO),
            Err(Error::Settings(_))
        ));

        let params = ScatterParams {
            count: MAX_SCATTER_COUNT,
            ..params
        };
        assert!(params.validate().is_ok());
    }
}
