//! Frame clock contract and the pause/resume controller

/// Host scheduler that calls back roughly once per display refresh
pub trait FrameClock {
    type Handle;

    /// Schedule the next frame callback. `None` if the host refused.
    fn request_tick(&mut self) -> Option<Self::Handle>;

    /// Cancel a scheduled callback that has not fired yet
    fn cancel_tick(&mut self, handle: Self::Handle);
}

/// Keeps exactly one frame request in flight while running.
///
/// Pausing cancels the pending request; resuming schedules a new one. Neither
/// touches simulation state, so a resumed animation continues from the last
/// committed tick.
pub struct Animation<C: FrameClock> {
    clock: C,
    pending: Option<C::Handle>,
}

impl<C: FrameClock> Animation<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            pending: None,
        }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    pub fn is_running(&self) -> bool {
        self.pending.is_some()
    }

    /// Schedule the first frame if nothing is pending
    pub fn start(&mut self) {
        if self.pending.is_none() {
            self.pending = self.clock.request_tick();
            if self.pending.is_none() {
                log::warn!("Frame request refused, animation stays paused");
            }
        }
    }

    pub fn pause(&mut self) {
        if let Some(handle) = self.pending.take() {
            self.clock.cancel_tick(handle);
            log::info!("Animation paused");
        }
    }

    pub fn resume(&mut self) {
        if self.pending.is_none() {
            self.start();
            log::info!("Animation resumed");
        }
    }

    /// Pause if running, resume if paused. Returns the new running state.
    pub fn toggle(&mut self) -> bool {
        if self.is_running() {
            self.pause();
        } else {
            self.resume();
        }
        self.is_running()
    }

    /// Handle a fired frame callback: re-register for the next frame, then run
    /// one frame. A callback that arrives while paused is ignored. If the
    /// next request is refused the frame still runs and the animation pauses.
    pub fn on_frame<F: FnOnce()>(&mut self, frame: F) -> bool {
        if self.pending.take().is_none() {
            return false;
        }
        self.pending = self.clock.request_tick();
        if self.pending.is_none() {
            log::warn!("Frame request refused, animation paused");
        }
        frame();
        true
    }
}

/// Clock for headless runs and tests: frames fire when [`StepClock::fire`]
/// is called.
#[derive(Debug, Default)]
pub struct StepClock {
    next_handle: u64,
    pending: Option<u64>,
    pub requested: u64,
    pub cancelled: u64,
    /// Refuse further requests, like a host that cannot schedule frames
    pub refuse: bool,
}

impl StepClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume the pending request, if any
    pub fn fire(&mut self) -> bool {
        self.pending.take().is_some()
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }
}

impl FrameClock for StepClock {
    type Handle = u64;

    fn request_tick(&mut self) -> Option<u64> {
        if self.refuse {
            return None;
        }
        self.next_handle += 1;
        self.requested += 1;
        self.pending = Some(self.next_handle);
        Some(self.next_handle)
    }

    fn cancel_tick(&mut self, handle: u64) {
        if self.pending == Some(handle) {
            self.pending = None;
            self.cancelled += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_registers_once() {
        let mut anim = Animation::new(StepClock::new());
        anim.start();
        anim.start();
        assert!(anim.is_running());
        assert_eq!(anim.clock().requested, 1);
    }

    #[test]
    fn test_frame_reregisters() {
        let mut anim = Animation::new(StepClock::new());
        anim.start();

        let mut frames = 0;
        for _ in 0..3 {
            assert!(anim.clock_mut().fire());
            assert!(anim.on_frame(|| frames += 1));
        }
        assert_eq!(frames, 3);
        assert_eq!(anim.clock().requested, 4);
        assert!(anim.clock().has_pending());
    }

    #[test]
    fn test_pause_stops_scheduling() {
        let mut anim = Animation::new(StepClock::new());
        anim.start();
        assert!(!anim.toggle());
        assert_eq!(anim.clock().cancelled, 1);
        assert!(!anim.clock().has_pending());

        // A stray callback while paused does nothing
        let mut ran = false;
        assert!(!anim.on_frame(|| ran = true));
        assert!(!ran);
        assert!(!anim.clock().has_pending());

        assert!(anim.toggle());
        assert!(anim.clock().has_pending());
        assert_eq!(anim.clock().requested, 2);
    }

    #[test]
    fn test_refused_request_leaves_animation_paused() {
        let mut anim = Animation::new(StepClock {
            refuse: true,
            ..Default::default()
        });
        anim.start();
        assert!(!anim.is_running());

        anim.clock_mut().refuse = false;
        anim.start();
        assert!(anim.is_running());

        // Last frame runs, then the refused re-registration pauses
        anim.clock_mut().refuse = true;
        assert!(anim.clock_mut().fire());
        let mut ran = false;
        assert!(anim.on_frame(|| ran = true));
        assert!(ran);
        assert!(!anim.is_running());
        assert!(!anim.clock().has_pending());
    }
}
