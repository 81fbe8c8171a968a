// frame.rs - Frame scheduling
//
// The host owns the display loop (requestAnimationFrame, a native event
// loop, a test). It hands us either a delta in seconds or a raw timestamp,
// and asks afterwards whether it should schedule another frame.

/// Motion constants are tuned per frame at this rate.
pub const REFERENCE_FPS: f32 = 60.0;

/// Longest step a single frame may take. Hidden tabs come back with
/// multi-second gaps that would otherwise teleport everything.
pub const MAX_DT: f32 = 0.1;

/// Anything advanced once per display refresh.
pub trait Tick {
    fn tick(&mut self, dt: f32);
}

/// Number of reference frames covered by `dt` seconds.
#[inline]
pub fn frames(dt: f32) -> f32 {
    dt * REFERENCE_FPS
}

/// Exponential smoothing factor for `steps` frames when a single frame
/// covers fraction `k` of the remaining distance.
#[inline]
pub fn damp(k: f32, steps: f32) -> f32 {
    1.0 - (1.0 - k.clamp(0.0, 1.0)).powf(steps.max(0.0))
}

/// Converts host timestamps (milliseconds) into clamped deltas.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last_ms: Option<f64>,
    max_dt: f32,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(MAX_DT)
    }
}

impl FrameClock {
    pub fn new(max_dt: f32) -> Self {
        Self { last_ms: None, max_dt }
    }

    /// Seconds since the previous call; 0 on the first call or when the
    /// host clock runs backwards.
    pub fn advance(&mut self, now_ms: f64) -> f32 {
        let dt = match self.last_ms {
            Some(last) if now_ms > last => ((now_ms - last) / 1000.0) as f32,
            _ => 0.0,
        };
        self.last_ms = Some(now_ms);
        dt.min(self.max_dt)
    }

    pub fn reset(&mut self) {
        self.last_ms = None;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Stopped,
}

/// Drives a [`Tick`] target from host timestamps until stopped.
#[derive(Debug, Clone)]
pub struct FrameLoop {
    state: LoopState,
    clock: FrameClock,
    frames: u64,
}

impl Default for FrameLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameLoop {
    pub fn new() -> Self {
        Self {
            state: LoopState::Running,
            clock: FrameClock::default(),
            frames: 0,
        }
    }

    /// Run one frame. Returns whether the host should request another.
    pub fn frame<T: Tick + ?Sized>(&mut self, target: &mut T, now_ms: f64) -> bool {
        if self.state == LoopState::Stopped {
            return false;
        }
        let dt = self.clock.advance(now_ms);
        target.tick(dt);
        self.frames += 1;
        true
    }

    pub fn stop(&mut self) {
        self.state = LoopState::Stopped;
    }

    pub fn resume(&mut self) {
        self.clock.reset();
        self.state = LoopState::Running;
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn frame_count(&self) -> u64 {
        self.frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Counter {
        total: f32,
        calls: u32,
    }

    impl Tick for Counter {
        fn tick(&mut self, dt: f32) {
            self.total += dt;
            self.calls += 1;
        }
    }

    #[test]
    fn clock_clamps_long_gaps() {
        let mut clock = FrameClock::default();
        assert_eq!(clock.advance(1000.0), 0.0);
        assert!((clock.advance(1016.0) - 0.016).abs() < 1e-6);
        assert_eq!(clock.advance(9000.0), MAX_DT);
        assert_eq!(clock.advance(8000.0), 0.0);
    }

    #[test]
    fn stopped_loop_does_not_tick() {
        let mut lp = FrameLoop::new();
        let mut c = Counter::default();

        assert!(lp.frame(&mut c, 0.0));
        assert!(lp.frame(&mut c, 16.0));
        lp.stop();
        assert!(!lp.frame(&mut c, 32.0));

        assert_eq!(c.calls, 2);
        assert_eq!(lp.frame_count(), 2);
        assert_eq!(lp.state(), LoopState::Stopped);
    }

    #[test]
    fn resume_does_not_replay_the_pause() {
        let mut lp = FrameLoop::new();
        let mut c = Counter::default();
        lp.frame(&mut c, 0.0);
        lp.stop();
        lp.resume();
        lp.frame(&mut c, 60_000.0);
        assert_eq!(c.total, 0.0);
    }

    #[test]
    fn damp_matches_single_frame_factor() {
        assert!((damp(0.05, 1.0) - 0.05).abs() < 1e-6);
        assert!((damp(0.05, 2.0) - (1.0 - 0.95f32 * 0.95)).abs() < 1e-6);
        assert_eq!(damp(0.05, 0.0), 0.0);
    }
}
