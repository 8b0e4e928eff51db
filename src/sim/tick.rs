//! World state and the per-tick update
//!
//! A tick runs rotate -> move -> march, in that order. Movement follows the
//! direction produced by this tick's rotation, and the ray shows the
//! post-move state.

use glam::DVec2;

use super::field::ObstacleField;
use super::hero::{Hero, Motion};
use super::input::InputState;
use super::march::{MarchResult, Marcher};
use crate::error::{Error, Result};
use crate::settings::Settings;

/// Ticks between debug summaries
const LOG_EVERY_TICKS: u64 = 600;

/// Visible area in pixels, origin at the top-left
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Result<Self> {
        if !(width.is_finite() && height.is_finite() && width >= 0.0 && height >= 0.0) {
            return Err(Error::InvalidState(format!(
                "viewport {width}x{height} must be finite and non-negative"
            )));
        }
        Ok(Self { width, height })
    }

    /// Far plane for the marcher
    #[inline]
    pub fn diagonal(&self) -> f64 {
        (self.width * self.width + self.height * self.height).sqrt()
    }

    #[inline]
    pub fn center(&self) -> DVec2 {
        DVec2::new(self.width / 2.0, self.height / 2.0)
    }
}

/// Everything the simulation owns between ticks
#[derive(Debug, Clone)]
pub struct World {
    pub field: ObstacleField,
    pub hero: Hero,
    /// Ray from the last committed tick
    pub ray: MarchResult,
    pub ticks: u64,
    viewport: Viewport,
    marcher: Marcher,
    motion: Motion,
}

impl World {
    /// Build the configured layout and spawn the hero at the viewport center
    pub fn new(settings: &Settings, viewport: Viewport) -> Result<Self> {
        let field = settings.layout.build(&viewport)?;
        Self::with_field(field, settings, viewport)
    }

    pub fn with_field(field: ObstacleField, settings: &Settings, viewport: Viewport) -> Result<Self> {
        settings.validate()?;
        let hero = Hero::spawn(
            viewport.center(),
            settings.start_angle_degrees,
            settings.motion.angle_wrap,
            &field,
        )?;
        let marcher = Marcher::new(settings.march, viewport.diagonal())?;
        let ray = marcher.march(&field, hero.position(), hero.direction())?;

        log::info!(
            "World ready: {} obstacles, viewport {}x{}, hero at {} facing {} deg",
            field.len(),
            viewport.width,
            viewport.height,
            hero.position(),
            hero.angle_degrees()
        );

        Ok(Self {
            field,
            hero,
            ray,
            ticks: 0,
            viewport,
            marcher,
            motion: settings.motion,
        })
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn marcher(&self) -> &Marcher {
        &self.marcher
    }

    pub fn motion(&self) -> &Motion {
        &self.motion
    }

    /// Apply new viewport dimensions; the far plane follows the diagonal
    pub fn resize(&mut self, width: f64, height: f64) -> Result<()> {
        let viewport = Viewport::new(width, height)?;
        self.marcher.set_max_distance(viewport.diagonal())?;
        self.viewport = viewport;
        log::info!(
            "Viewport resized to {}x{} (max march distance {:.1})",
            width,
            height,
            viewport.diagonal()
        );
        Ok(())
    }
}

/// Advance the world by one tick.
///
/// On error nothing is committed: hero and ray keep their previous values.
pub fn tick(world: &mut World, input: &InputState) -> Result<()> {
    let mut hero = world.hero.clone();

    hero.rotate(input, &world.motion)?;
    hero.translate(input, &world.viewport, &world.field, &world.motion)?;

    world
        .marcher
        .march_into(&world.field, hero.position(), hero.direction(), &mut world.ray)?;

    world.hero = hero;
    world.ticks += 1;

    if world.ticks % LOG_EVERY_TICKS == 0 {
        log::debug!(
            "tick {}: hero {} @ {:.1} deg, {} march steps, hit {:?}",
            world.ticks,
            world.hero.position(),
            world.hero.angle_degrees(),
            world.ray.steps.len(),
            world.ray.hit
        );
    }
    Ok(())
}
