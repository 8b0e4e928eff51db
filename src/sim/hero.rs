//! The hero: a point that moves, turns, and casts the ray
//!
//! The facing angle is the single source of truth; the direction vector is
//! recomputed through [`Hero::set_angle`] whenever the angle changes and is
//! never written on its own.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::field::ObstacleField;
use super::input::{InputState, OpposingKeys};
use super::sdf::ensure_finite;
use super::tick::Viewport;
use crate::consts::{MOVE_STEP, TURN_STEP_DEGREES};
use crate::error::{Error, Result};
use crate::{clamp_to_range, degrees_to_radians};

/// How the facing angle is kept in range after a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AngleWrap {
    /// Euclidean remainder into [0, 360)
    #[default]
    Modulo,
    /// One check per change: above 360 resets to 0, below 0 resets to 360.
    /// A single change larger than 360 is not fully normalized.
    SingleStep,
}

impl AngleWrap {
    pub fn apply(self, degrees: f64) -> f64 {
        match self {
            AngleWrap::Modulo => {
                let wrapped = degrees.rem_euclid(360.0);
                // rem_euclid can round up to exactly 360 for tiny negatives
                if wrapped >= 360.0 { 0.0 } else { wrapped }
            }
            AngleWrap::SingleStep => {
                if degrees > 360.0 {
                    0.0
                } else if degrees < 0.0 {
                    360.0
                } else {
                    degrees
                }
            }
        }
    }
}

/// Per-tick movement tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Motion {
    /// Distance per tick for both tank drive and strafing
    pub move_step: f64,
    /// Degrees per tick while turning
    pub turn_step_degrees: f64,
    pub angle_wrap: AngleWrap,
    pub opposing_keys: OpposingKeys,
}

impl Default for Motion {
    fn default() -> Self {
        Self {
            move_step: MOVE_STEP,
            turn_step_degrees: TURN_STEP_DEGREES,
            angle_wrap: AngleWrap::default(),
            opposing_keys: OpposingKeys::default(),
        }
    }
}

/// Unit direction for a facing angle. Angle 0 points along +y and angles
/// increase toward +x.
#[inline]
pub fn direction_from_degrees(degrees: f64) -> DVec2 {
    let (sin, cos) = degrees_to_radians(degrees).sin_cos();
    DVec2::new(sin, cos)
}

#[derive(Debug, Clone, PartialEq)]
pub struct Hero {
    position: DVec2,
    angle_degrees: f64,
    direction: DVec2,
}

impl Hero {
    /// Place the hero, failing if `position` is inside an obstacle
    pub fn spawn(
        position: DVec2,
        angle_degrees: f64,
        wrap: AngleWrap,
        field: &ObstacleField,
    ) -> Result<Self> {
        ensure_finite(position, "spawn position")?;
        if field.blocks(position) {
            return Err(Error::SpawnBlocked {
                x: position.x,
                y: position.y,
            });
        }
        let mut hero = Self {
            position,
            angle_degrees: 0.0,
            direction: direction_from_degrees(0.0),
        };
        hero.set_angle(angle_degrees, wrap)?;
        Ok(hero)
    }

    #[inline]
    pub fn position(&self) -> DVec2 {
        self.position
    }

    #[inline]
    pub fn angle_degrees(&self) -> f64 {
        self.angle_degrees
    }

    #[inline]
    pub fn direction(&self) -> DVec2 {
        self.direction
    }

    /// Set the facing angle (wrapped per `wrap`) and refresh the direction
    pub fn set_angle(&mut self, degrees: f64, wrap: AngleWrap) -> Result<()> {
        if !degrees.is_finite() {
            return Err(Error::InvalidState(format!("angle {degrees} is not finite")));
        }
        self.angle_degrees = wrap.apply(degrees);
        self.direction = direction_from_degrees(self.angle_degrees);
        Ok(())
    }

    /// Turn from held keys: right decreases the angle, left increases it
    pub fn rotate(&mut self, input: &InputState, motion: &Motion) -> Result<()> {
        let turn = motion
            .opposing_keys
            .resolve(input.turn_right, input.turn_left);
        if turn == 0.0 {
            return Ok(());
        }
        self.set_angle(
            self.angle_degrees - turn * motion.turn_step_degrees,
            motion.angle_wrap,
        )
    }

    /// Move from held keys, clamped to the viewport and collision checked.
    ///
    /// Forward/back drive along the facing direction and take precedence over
    /// strafing. Returns whether the candidate position was committed.
    pub fn translate(
        &mut self,
        input: &InputState,
        viewport: &Viewport,
        field: &ObstacleField,
        motion: &Motion,
    ) -> Result<bool> {
        let step = motion.move_step;
        let keys = motion.opposing_keys;
        let mut next = self.position;

        if input.drives() {
            let sign = keys.resolve(input.forward, input.backward);
            next += self.direction * (step * sign);
        } else {
            // Screen space: up is -y, left is -x
            next.y -= keys.resolve(input.up, input.down) * step;
            next.x -= keys.resolve(input.left, input.right) * step;
        }

        next.x = clamp_to_range(next.x, 0.0, viewport.width)?;
        next.y = clamp_to_range(next.y, 0.0, viewport.height)?;

        self.update_position(next, field)
    }

    /// Commit `candidate` unless it lies inside or on any obstacle.
    ///
    /// All or nothing: a rejected move leaves the position untouched, there is
    /// no sliding along the obstacle boundary.
    pub fn update_position(&mut self, candidate: DVec2, field: &ObstacleField) -> Result<bool> {
        ensure_finite(candidate, "candidate position")?;
        if field.blocks(candidate) {
            return Ok(false);
        }
        self.position = candidate;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::field::{Circle, Tint};
    use proptest::prelude::*;

    fn viewport() -> Viewport {
        Viewport::new(1000.0, 1000.0).unwrap()
    }

    fn one_circle() -> ObstacleField {
        ObstacleField::new(vec![Circle::new(DVec2::new(100.0, 100.0), 20.0, Tint::Red)]).unwrap()
    }

    #[test]
    fn test_direction_convention() {
        let d = direction_from_degrees(0.0);
        assert!(d.x.abs() < 1e-12 && (d.y - 1.0).abs() < 1e-12);
        let d = direction_from_degrees(90.0);
        assert!((d.x - 1.0).abs() < 1e-12 && d.y.abs() < 1e-12);
    }

    #[test]
    fn test_spawn_blocked() {
        let field = one_circle();
        let err = Hero::spawn(DVec2::new(110.0, 100.0), 0.0, AngleWrap::Modulo, &field).unwrap_err();
        assert!(matches!(err, Error::SpawnBlocked { .. }));
    }

    #[test]
    fn test_modulo_wrap() {
        let field = ObstacleField::default();
        let motion = Motion::default();
        let mut hero = Hero::spawn(DVec2::ZERO, 359.0, AngleWrap::Modulo, &field).unwrap();

        let left = InputState {
            turn_left: true,
            ..Default::default()
        };
        hero.rotate(&left, &motion).unwrap();
        assert_eq!(hero.angle_degrees(), 0.0);

        let right = InputState {
            turn_right: true,
            ..Default::default()
        };
        hero.rotate(&right, &motion).unwrap();
        assert_eq!(hero.angle_degrees(), 359.0);
    }

    #[test]
    fn test_single_step_wrap() {
        let field = ObstacleField::default();
        let motion = Motion {
            angle_wrap: AngleWrap::SingleStep,
            ..Default::default()
        };
        let mut hero = Hero::spawn(DVec2::ZERO, 0.0, AngleWrap::SingleStep, &field).unwrap();

        let right = InputState {
            turn_right: true,
            ..Default::default()
        };
        hero.rotate(&right, &motion).unwrap();
        assert_eq!(hero.angle_degrees(), 360.0);

        // 360 is kept, the next turn past it resets to 0
        let left = InputState {
            turn_left: true,
            ..Default::default()
        };
        hero.rotate(&left, &motion).unwrap();
        assert_eq!(hero.angle_degrees(), 0.0);

        // Only one wrap check per change
        assert_eq!(AngleWrap::SingleStep.apply(-400.0), 360.0);
        assert_eq!(AngleWrap::Modulo.apply(-400.0), 320.0);
    }

    #[test]
    fn test_direction_tracks_angle() {
        let field = ObstacleField::default();
        let mut hero = Hero::spawn(DVec2::ZERO, 140.0, AngleWrap::Modulo, &field).unwrap();
        hero.set_angle(30.0, AngleWrap::Modulo).unwrap();
        let expected = direction_from_degrees(30.0);
        assert!((hero.direction() - expected).length() < 1e-12);
        assert!((hero.direction().length() - 1.0).abs() < 1e-12);
        assert!(hero.set_angle(f64::NAN, AngleWrap::Modulo).is_err());
    }

    #[test]
    fn test_rotate_priority() {
        let field = ObstacleField::default();
        let both = InputState {
            turn_left: true,
            turn_right: true,
            ..Default::default()
        };

        let mut hero = Hero::spawn(DVec2::ZERO, 10.0, AngleWrap::Modulo, &field).unwrap();
        hero.rotate(&both, &Motion::default()).unwrap();
        assert_eq!(hero.angle_degrees(), 9.0);

        let cancel = Motion {
            opposing_keys: OpposingKeys::Cancel,
            ..Default::default()
        };
        let mut hero = Hero::spawn(DVec2::ZERO, 10.0, AngleWrap::Modulo, &field).unwrap();
        hero.rotate(&both, &cancel).unwrap();
        assert_eq!(hero.angle_degrees(), 10.0);
    }

    #[test]
    fn test_tank_drive_along_direction() {
        let field = ObstacleField::default();
        let mut hero =
            Hero::spawn(DVec2::new(500.0, 500.0), 90.0, AngleWrap::Modulo, &field).unwrap();
        let input = InputState {
            forward: true,
            // Strafing is ignored while driving
            up: true,
            ..Default::default()
        };
        assert!(hero.translate(&input, &viewport(), &field, &Motion::default()).unwrap());
        assert!((hero.position() - DVec2::new(505.0, 500.0)).length() < 1e-9);

        let back = InputState {
            backward: true,
            ..Default::default()
        };
        hero.translate(&back, &viewport(), &field, &Motion::default())
            .unwrap();
        assert!((hero.position() - DVec2::new(500.0, 500.0)).length() < 1e-9);
    }

    #[test]
    fn test_strafe_axes_and_priority() {
        let field = ObstacleField::default();
        let mut hero =
            Hero::spawn(DVec2::new(500.0, 500.0), 0.0, AngleWrap::Modulo, &field).unwrap();
        let input = InputState {
            up: true,
            down: true,
            left: true,
            right: true,
            ..Default::default()
        };
        hero.translate(&input, &viewport(), &field, &Motion::default())
            .unwrap();
        assert_eq!(hero.position(), DVec2::new(495.0, 495.0));

        let cancel = Motion {
            opposing_keys: OpposingKeys::Cancel,
            ..Default::default()
        };
        hero.translate(&input, &viewport(), &field, &cancel).unwrap();
        assert_eq!(hero.position(), DVec2::new(495.0, 495.0));

        let down_right = InputState {
            down: true,
            right: true,
            ..Default::default()
        };
        hero.translate(&down_right, &viewport(), &field, &Motion::default())
            .unwrap();
        assert_eq!(hero.position(), DVec2::new(500.0, 500.0));
    }

    #[test]
    fn test_translate_clamps_to_viewport() {
        let field = ObstacleField::default();
        let mut hero = Hero::spawn(DVec2::new(2.0, 998.0), 0.0, AngleWrap::Modulo, &field).unwrap();
        let input = InputState {
            left: true,
            down: true,
            ..Default::default()
        };
        hero.translate(&input, &viewport(), &field, &Motion::default())
            .unwrap();
        assert_eq!(hero.position(), DVec2::new(0.0, 1000.0));
    }

    #[test]
    fn test_translate_rejected_by_obstacle() {
        let field = one_circle();
        // Just outside the left edge of the circle, facing +x
        let mut hero = Hero::spawn(DVec2::new(78.0, 100.0), 90.0, AngleWrap::Modulo, &field).unwrap();
        let input = InputState {
            forward: true,
            ..Default::default()
        };
        let committed = hero
            .translate(&input, &viewport(), &field, &Motion::default())
            .unwrap();
        assert!(!committed);
        assert_eq!(hero.position(), DVec2::new(78.0, 100.0));
    }

    #[test]
    fn test_update_position_rejects_non_finite() {
        let field = ObstacleField::default();
        let mut hero = Hero::spawn(DVec2::new(1.0, 1.0), 0.0, AngleWrap::Modulo, &field).unwrap();
        assert!(
            hero.update_position(DVec2::new(f64::NAN, 0.0), &field)
                .is_err()
        );
        assert_eq!(hero.position(), DVec2::new(1.0, 1.0));
    }

    proptest! {
        #[test]
        fn prop_blocked_candidate_never_commits(
            angle in 0.0f64..std::f64::consts::TAU,
            frac in 0.0f64..0.999,
        ) {
            let field = one_circle();
            let mut hero = Hero::spawn(DVec2::new(300.0, 300.0), 0.0, AngleWrap::Modulo, &field).unwrap();
            let circle = field.circles()[0];
            let candidate = circle.center + DVec2::new(angle.cos(), angle.sin()) * (circle.radius * frac);
            let committed = hero.update_position(candidate, &field).unwrap();
            prop_assert!(!committed);
            prop_assert_eq!(hero.position(), DVec2::new(300.0, 300.0));
        }
    }
}
