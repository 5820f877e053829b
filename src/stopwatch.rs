use crate::{Tick, TimeSpan, Uptime};

/// Measures the time elapsed since a start instant.
pub struct Stopwatch<'a, T: Tick, U: Uptime<T>> {
    uptime: &'a U,
    start: TimeSpan<T>,
}

impl<'a, T: Tick, U: Uptime<T>> Stopwatch<'a, T, U> {
    /// Create a stopwatch started now.
    pub fn start(uptime: &'a U) -> Self {
        Self {
            uptime,
            start: uptime.now(),
        }
    }

    /// The uptime at which the stopwatch was (re)started.
    pub fn started_at(&self) -> TimeSpan<T> {
        self.start
    }

    /// Get the time elapsed since the stopwatch was started.
    pub fn elapsed(&self) -> TimeSpan<T> {
        self.uptime.now() - self.start
    }

    /// Restart the stopwatch, returning the time elapsed until now.
    pub fn restart(&mut self) -> TimeSpan<T> {
        let now = self.uptime.now();
        let elapsed = now - self.start;
        self.start = now;
        elapsed
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::drivers::sim::SimHw;

    #[test]
    fn elapsed() {
        let hw = SimHw::new();
        let clock = hw.clock();
        clock.enable();
        hw.advance(10);

        let mut stopwatch = Stopwatch::start(&clock);
        assert_eq!(10, stopwatch.started_at().0);

        hw.advance(200);
        assert_eq!(200, stopwatch.elapsed().0);
        hw.advance(200);
        assert_eq!(400, stopwatch.elapsed().0);
        assert_eq!(200, stopwatch.elapsed().total_micros());

        assert_eq!(400, stopwatch.restart().0);
        hw.advance(4);
        assert_eq!(4, stopwatch.elapsed().0);
    }
}
