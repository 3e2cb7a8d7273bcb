pub const MS_PER_DAY: f64 = 86_400_000.0;

/// Reference instant for simulated time, in milliseconds since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Epoch(f64);

impl Epoch {
    /// 2000-01-01T00:00:00Z
    pub const Y2000: Epoch = Epoch(946_684_800_000.0);

    pub fn millis(&self) -> f64 {
        self.0
    }
}

/// Whole days between `now_ms` and the epoch, rounded up.
///
/// Uses the absolute difference, so an instant before the epoch gives the same
/// count as its mirror image after it.
pub fn elapsed_days(now_ms: f64, epoch: Epoch) -> u64 {
    ((now_ms - epoch.0).abs() / MS_PER_DAY).ceil() as u64
}

/// Simulated "now", advancing at `time_scale` times the wall clock.
pub struct SimulationClock {
    time_scale: f64,
    last_wall_ms: f64,
    current_ms: f64,
}

impl SimulationClock {
    pub fn new(wall_ms: f64) -> Self {
        SimulationClock {
            time_scale: 1.0,
            last_wall_ms: wall_ms,
            current_ms: wall_ms,
        }
    }

    pub fn set_time_scale(&mut self, scale: f64) {
        if scale.is_finite() {
            self.time_scale = scale;
        }
    }

    /// Moves simulated time forward by the wall time since the last call.
    pub fn advance(&mut self, wall_ms: f64) -> f64 {
        let dt = wall_ms - self.last_wall_ms;
        self.last_wall_ms = wall_ms;
        self.current_ms += dt * self.time_scale;
        self.current_ms
    }
}
