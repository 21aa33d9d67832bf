//! Fixed-interval task driven by frame time.
//!
//! Accumulates frame deltas and reports when the interval has elapsed, so a
//! slower cadence (e.g. 10 Hz proximity checks) runs on the frame thread.
//! Once cancelled the task never fires again.

/// Cancellable repeating timer.
#[derive(Debug, Clone)]
pub struct IntervalTask {
    /// Seconds between runs
    pub interval: f32,
    timer: f32,
    cancelled: bool,
}

impl IntervalTask {
    pub fn new(interval: f32) -> Self {
        Self {
            interval,
            timer: 0.0,
            cancelled: false,
        }
    }

    /// Advance by `delta_time`; returns true when a run is due.
    ///
    /// Long frames that span several intervals still yield a single run.
    pub fn tick(&mut self, delta_time: f32) -> bool {
        if self.cancelled {
            return false;
        }

        self.timer += delta_time;
        if self.timer >= self.interval {
            self.timer %= self.interval.max(f32::EPSILON);
            return true;
        }
        false
    }

    /// Stop the task permanently
    pub fn cancel(&mut self) {
        if !self.cancelled {
            tracing::debug!(interval = self.interval, "interval task cancelled");
        }
        self.cancelled = true;
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_on_interval() {
        let mut task = IntervalTask::new(0.1);
        assert!(!task.tick(0.05));
        assert!(task.tick(0.06));
        assert!(!task.tick(0.02));
    }

    #[test]
    fn test_long_frame_fires_once() {
        let mut task = IntervalTask::new(0.1);
        assert!(task.tick(0.35));
        assert!(!task.tick(0.01));
    }

    #[test]
    fn test_cancelled_never_fires() {
        let mut task = IntervalTask::new(0.1);
        task.cancel();
        assert!(task.is_cancelled());
        assert!(!task.tick(10.0));
    }
}
