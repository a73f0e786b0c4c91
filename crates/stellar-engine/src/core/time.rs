/// Monotonic frame clock.
/// Fed with the variable frame delta from the host's animation frame driver.
/// Elapsed time is kept in f64 so long sessions do not lose sub-frame precision.
/// The optional epoch anchors `wall_time` to host wall-clock seconds.
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    epoch: f64,
    elapsed: f64,
    delta: f32,
    frame: u64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clock whose wall time starts at `epoch` seconds. Non-finite epochs become zero.
    pub fn with_epoch(epoch: f64) -> Self {
        let mut clock = Self::default();
        clock.set_epoch(epoch);
        clock
    }

    pub fn set_epoch(&mut self, epoch: f64) {
        self.epoch = if epoch.is_finite() { epoch } else { 0.0 };
    }

    pub fn epoch(&self) -> f64 {
        self.epoch
    }

    /// Epoch plus elapsed: absolute seconds for time-of-day driven motion.
    pub fn wall_time(&self) -> f64 {
        self.epoch + self.elapsed
    }

    /// Advance by one rendered frame. Negative or non-finite deltas count as zero.
    pub fn advance(&mut self, dt: f32) {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        self.delta = dt;
        self.elapsed += dt as f64;
        self.frame += 1;
    }

    /// Seconds since the first frame.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Delta of the most recent frame, in seconds.
    pub fn delta(&self) -> f32 {
        self.delta
    }

    /// Number of frames advanced so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }
}

/// Throttle gate for expensive per-frame work.
///
/// Fires when the elapsed time has crossed an interval boundary during the
/// last frame (`elapsed mod interval < delta`). One call answers one frame, so
/// a long frame (`delta > interval`) still fires exactly once: missed
/// intervals are dropped, never replayed.
#[derive(Debug, Clone, Copy)]
pub struct UpdateGate {
    interval: f64,
}

impl UpdateGate {
    /// Orbital recompute interval (10 Hz).
    pub const ORBIT_INTERVAL: f32 = 0.1;
    /// Particle emitter interval (5 Hz).
    pub const PARTICLE_INTERVAL: f32 = 0.2;

    pub fn new(interval: f32) -> Self {
        let interval = if interval.is_finite() && interval > 0.0 {
            interval as f64
        } else {
            Self::ORBIT_INTERVAL as f64
        };
        Self { interval }
    }

    pub fn interval(&self) -> f32 {
        self.interval as f32
    }

    /// Whether the gated work should run this frame.
    pub fn fires(&self, elapsed: f64, delta: f32) -> bool {
        if delta <= 0.0 {
            return false;
        }
        elapsed.rem_euclid(self.interval) < delta as f64
    }

    /// Convenience over a [`FrameClock`].
    pub fn fires_on(&self, clock: &FrameClock) -> bool {
        self.fires(clock.elapsed(), clock.delta())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_accumulates_elapsed() {
        let mut clock = FrameClock::new();
        clock.advance(0.25);
        clock.advance(0.5);
        assert_eq!(clock.frame(), 2);
        assert!((clock.elapsed() - 0.75).abs() < 1e-9);
        assert_eq!(clock.delta(), 0.5);
    }

    #[test]
    fn clock_ignores_negative_and_nan() {
        let mut clock = FrameClock::new();
        clock.advance(-1.0);
        clock.advance(f32::NAN);
        assert_eq!(clock.elapsed(), 0.0);
        assert_eq!(clock.frame(), 2);
    }

    #[test]
    fn wall_time_offsets_elapsed_by_epoch() {
        let mut clock = FrameClock::with_epoch(1_000.0);
        assert_eq!(clock.wall_time(), 1_000.0);
        clock.advance(0.5);
        assert!((clock.wall_time() - 1_000.5).abs() < 1e-9);
        assert!((clock.elapsed() - 0.5).abs() < 1e-9);

        clock.set_epoch(f64::NAN);
        assert_eq!(clock.epoch(), 0.0);
        assert!((clock.wall_time() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn gate_caps_rate_at_high_frame_rate() {
        let gate = UpdateGate::new(0.1);
        let mut clock = FrameClock::new();
        let mut fired = 0;
        // One second at 120 Hz
        for _ in 0..120 {
            clock.advance(1.0 / 120.0);
            if gate.fires_on(&clock) {
                fired += 1;
            }
        }
        assert!((9..=11).contains(&fired), "fired {} times", fired);
    }

    #[test]
    fn gate_fires_once_when_delta_exceeds_interval() {
        let gate = UpdateGate::new(0.1);
        let mut clock = FrameClock::new();
        let mut fired = 0;
        for _ in 0..5 {
            clock.advance(1.0);
            if gate.fires_on(&clock) {
                fired += 1;
            }
        }
        // One recompute per call, never ten
        assert_eq!(fired, 5);
    }

    #[test]
    fn gate_never_fires_on_zero_delta() {
        let gate = UpdateGate::new(0.2);
        assert!(!gate.fires(0.4, 0.0));
    }

    #[test]
    fn gate_rejects_bad_interval() {
        let gate = UpdateGate::new(0.0);
        assert_eq!(gate.interval(), UpdateGate::ORBIT_INTERVAL);
    }
}
