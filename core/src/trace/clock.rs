//! Monotonic timing helpers

use std::time::{Duration, Instant};

/// Measures elapsed time from a monotonic start instant
#[derive(Debug, Clone, Copy)]
pub struct Stopwatch {
    started: Instant,
}

impl Stopwatch {
    /// Start measuring now
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
        }
    }

    /// Elapsed time since start
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Elapsed time since start in fractional milliseconds
    pub fn elapsed_ms(&self) -> f64 {
        duration_ms(self.elapsed())
    }
}

/// Render a duration as milliseconds rounded to two decimals
pub fn duration_ms(duration: Duration) -> f64 {
    (duration.as_secs_f64() * 1000.0 * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_ms_rounds_to_two_decimals() {
        assert_eq!(duration_ms(Duration::from_micros(1_234_567)), 1234.57);
        assert_eq!(duration_ms(Duration::from_nanos(4_000)), 0.0);
        assert_eq!(duration_ms(Duration::ZERO), 0.0);
    }

    #[test]
    fn test_stopwatch_is_monotonic() {
        let watch = Stopwatch::start();
        std::thread::sleep(Duration::from_millis(2));
        let first = watch.elapsed_ms();
        let second = watch.elapsed_ms();

        assert!(first >= 2.0);
        assert!(second >= first);
    }
}
