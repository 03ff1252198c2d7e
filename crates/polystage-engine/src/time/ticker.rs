use std::time::{Duration, Instant};

/// Frame timing snapshot.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FrameTime {
    /// Seconds since the previous tick, clamped.
    pub dt: f32,
    pub now: Instant,
    /// Monotonic frame counter, starting at 0 after `start()`.
    pub frame_index: u64,
}

/// Start/stop-able frame ticker.
///
/// A stopped ticker yields no frames. Delta time is clamped so that a long
/// stall (debugger, hidden tab, paused adapter) does not produce a huge step
/// on the next frame.
#[derive(Debug, Clone)]
pub struct Ticker {
    last: Option<Instant>,
    frame_index: u64,
    dt_min: Duration,
    dt_max: Duration,
}

impl Ticker {
    /// Creates a stopped ticker with default clamps (0.1 ms .. 250 ms).
    pub fn new() -> Self {
        Self::with_clamps(Duration::from_micros(100), Duration::from_millis(250))
    }

    pub fn with_clamps(dt_min: Duration, dt_max: Duration) -> Self {
        debug_assert!(dt_min <= dt_max);
        Self { last: None, frame_index: 0, dt_min, dt_max }
    }

    pub fn start(&mut self) {
        if self.last.is_none() {
            self.last = Some(Instant::now());
            self.frame_index = 0;
        }
    }

    pub fn stop(&mut self) {
        self.last = None;
    }

    #[inline]
    pub fn is_started(&self) -> bool {
        self.last.is_some()
    }

    /// Resets the delta baseline without touching the frame counter.
    ///
    /// Call after a pause so the first resumed frame does not see the pause
    /// as elapsed time.
    pub fn reset_baseline(&mut self) {
        if self.last.is_some() {
            self.last = Some(Instant::now());
        }
    }

    /// Advances the ticker. Returns `None` while stopped.
    pub fn tick(&mut self) -> Option<FrameTime> {
        let last = self.last?;
        let now = Instant::now();
        let dt = now.saturating_duration_since(last).clamp(self.dt_min, self.dt_max);

        self.last = Some(now);
        let ft = FrameTime { dt: dt.as_secs_f32(), now, frame_index: self.frame_index };
        self.frame_index = self.frame_index.wrapping_add(1);
        Some(ft)
    }

    #[inline]
    pub fn frames(&self) -> u64 {
        self.frame_index
    }
}

impl Default for Ticker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stopped_ticker_yields_nothing() {
        let mut t = Ticker::new();
        assert!(t.tick().is_none());
        assert!(!t.is_started());
    }

    #[test]
    fn frames_count_up_from_zero() {
        let mut t = Ticker::new();
        t.start();
        assert_eq!(t.tick().map(|f| f.frame_index), Some(0));
        assert_eq!(t.tick().map(|f| f.frame_index), Some(1));
        assert_eq!(t.frames(), 2);
    }

    #[test]
    fn dt_is_clamped() {
        let mut t = Ticker::with_clamps(Duration::from_millis(5), Duration::from_millis(10));
        t.start();
        let ft = t.tick().unwrap();
        assert!(ft.dt >= 0.005 && ft.dt <= 0.010);
    }

    #[test]
    fn stop_then_start_restarts_counter() {
        let mut t = Ticker::new();
        t.start();
        t.tick();
        t.stop();
        assert!(t.tick().is_none());
        t.start();
        assert_eq!(t.tick().map(|f| f.frame_index), Some(0));
    }
}
