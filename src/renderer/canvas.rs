//! Drawing surface abstraction and scene drawing
//!
//! Coordinates are viewport pixels with the origin at the top-left, the same
//! space the simulation runs in.

use glam::Vec2;

use super::vertex::colors::{self, with_alpha};
use crate::sim::World;

pub type Rgba = [f32; 4];

/// Primitive drawing operations a host surface provides
pub trait Canvas {
    fn clear(&mut self, color: Rgba);
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba);
    fn stroke_circle(&mut self, center: Vec2, radius: f32, color: Rgba);
    fn line(&mut self, from: Vec2, to: Vec2, color: Rgba);
}

/// Radius of the dot marking each march sample
const STEP_DOT_RADIUS: f32 = 2.0;

/// Alpha for march circle `index` of `count` on a hit: fades from 0.2 to 0
#[inline]
pub fn hit_step_alpha(index: usize, count: usize) -> f32 {
    0.2 * (1.0 - index as f32 / count as f32)
}

/// Draw obstacles, the march circles and the ray for the current world state
pub fn draw_scene<C: Canvas>(canvas: &mut C, world: &World) {
    canvas.clear(colors::BACKGROUND);

    for obstacle in world.field.circles() {
        let center = obstacle.center.as_vec2();
        let radius = obstacle.radius as f32;
        canvas.fill_circle(center, radius, colors::OBSTACLE_FILL);
        canvas.stroke_circle(center, radius, colors::OBSTACLE_STROKE);
    }

    let ray = &world.ray;
    let hit = ray.hit_obstacle(&world.field);
    let count = ray.steps.len();

    for (i, step) in ray.steps.iter().enumerate() {
        let center = step.point.as_vec2();
        // No circle for a sample inside an obstacle or an infinite clearance
        // (empty field)
        let radius = step.clearance as f32;

        if radius.is_finite() && radius > 0.0 {
            let (stroke, fill) = match hit {
                Some(obstacle) => {
                    let alpha = hit_step_alpha(i, count);
                    (
                        with_alpha(colors::STEP_STROKE, alpha),
                        with_alpha(obstacle.tint.rgba(), alpha),
                    )
                }
                None => (colors::STEP_STROKE, colors::STEP_FILL_MISS),
            };
            canvas.stroke_circle(center, radius, stroke);
            canvas.fill_circle(center, radius, fill);
        }

        canvas.fill_circle(center, STEP_DOT_RADIUS, colors::STEP_DOT);
    }

    if let Some(end) = ray.collision_point() {
        canvas.line(world.hero.position().as_vec2(), end.as_vec2(), colors::RAY);
    }
}

/// A recorded drawing operation
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawOp {
    Clear(Rgba),
    FillCircle { center: Vec2, radius: f32, color: Rgba },
    StrokeCircle { center: Vec2, radius: f32, color: Rgba },
    Line { from: Vec2, to: Vec2, color: Rgba },
}

/// Canvas that records operations instead of drawing (headless runs, tests)
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    pub ops: Vec<DrawOp>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Canvas for Recorder {
    fn clear(&mut self, color: Rgba) {
        self.ops.clear();
        self.ops.push(DrawOp::Clear(color));
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        self.ops.push(DrawOp::FillCircle {
            center,
            radius,
            color,
        });
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        self.ops.push(DrawOp::StrokeCircle {
            center,
            radius,
            color,
        });
    }

    fn line(&mut self, from: Vec2, to: Vec2, color: Rgba) {
        self.ops.push(DrawOp::Line { from, to, color });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::{Circle, ObstacleField, Tint, Viewport};
    use glam::DVec2;

    fn facing_world(angle: f64) -> World {
        let viewport = Viewport::new(400.0, 400.0).unwrap();
        let field =
            ObstacleField::new(vec![Circle::new(DVec2::new(300.0, 200.0), 20.0, Tint::Blue)])
                .unwrap();
        let settings = Settings {
            start_angle_degrees: angle,
            ..Default::default()
        };
        World::with_field(field, &settings, viewport).unwrap()
    }

    #[test]
    fn test_hit_step_alpha_fades() {
        assert!((hit_step_alpha(0, 4) - 0.2).abs() < 1e-6);
        assert!((hit_step_alpha(2, 4) - 0.1).abs() < 1e-6);
        assert!(hit_step_alpha(3, 4) > 0.0);
    }

    #[test]
    fn test_scene_on_hit_uses_obstacle_tint() {
        let world = facing_world(90.0);
        let mut rec = Recorder::new();
        draw_scene(&mut rec, &world);

        assert_eq!(rec.ops[0], DrawOp::Clear(colors::BACKGROUND));
        // Obstacle fill + stroke follow the clear
        assert!(matches!(rec.ops[1], DrawOp::FillCircle { color, .. } if color == colors::OBSTACLE_FILL));
        assert!(matches!(rec.ops[2], DrawOp::StrokeCircle { color, .. } if color == colors::OBSTACLE_STROKE));

        // First march circle: stroke, then tinted fill at alpha 0.2
        match rec.ops[4] {
            DrawOp::FillCircle { radius, color, .. } => {
                assert!((radius - 80.0).abs() < 1e-3);
                assert_eq!(&color[..3], &Tint::Blue.rgba()[..3]);
                assert!((color[3] - 0.2).abs() < 1e-6);
            }
            op => panic!("unexpected op {op:?}"),
        }

        match rec.ops.last() {
            Some(DrawOp::Line { from, to, color }) => {
                assert_eq!(*from, Vec2::new(200.0, 200.0));
                assert!((to.x - 280.0).abs() < 1e-2);
                assert_eq!(*color, colors::RAY);
            }
            op => panic!("unexpected op {op:?}"),
        }
    }

    #[test]
    fn test_scene_on_escape_uses_neutral_fill() {
        // Facing -x, away from the only obstacle
        let world = facing_world(270.0);
        assert!(world.ray.hit.is_none());

        let mut rec = Recorder::new();
        draw_scene(&mut rec, &world);
        let fills: Vec<_> = rec
            .ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::FillCircle { color, .. } if *color == colors::STEP_FILL_MISS => Some(color),
                _ => None,
            })
            .collect();
        assert_eq!(fills.len(), world.ray.steps.len());
        assert!(matches!(rec.ops.last(), Some(DrawOp::Line { .. })));
    }

    #[test]
    fn test_recorder_clear_resets() {
        let mut rec = Recorder::new();
        rec.line(Vec2::ZERO, Vec2::ONE, colors::RAY);
        rec.clear(colors::BACKGROUND);
        assert_eq!(rec.ops, vec![DrawOp::Clear(colors::BACKGROUND)]);
    }
}
