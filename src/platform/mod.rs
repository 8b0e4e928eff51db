//! Platform abstraction layer
//!
//! Host collaborators the simulation is driven by:
//! - Frame clock (tick scheduling, pause/resume)
//! - Keyboard state (held keys, snapshotted once per tick)

pub mod clock;
pub mod keyboard;

pub use clock::{Animation, FrameClock, StepClock};
pub use keyboard::KeyboardState;

use crate::renderer::{Canvas, draw_scene};
use crate::sim::{World, tick};

/// Run one frame: snapshot input, tick the world, draw the result.
///
/// A rejected tick is logged and the last committed state is drawn instead;
/// errors never reach the canvas.
pub fn run_frame<C: Canvas>(world: &mut World, keyboard: &KeyboardState, canvas: &mut C) {
    let input = keyboard.snapshot();
    if let Err(e) = tick(world, &input) {
        log::warn!("Tick {} rejected: {}", world.ticks + 1, e);
    }
    draw_scene(canvas, world);
}
