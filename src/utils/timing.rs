//! Wall-clock timing for a run.
//!
//! `ScopedTimer` measures from construction to drop and reports the elapsed
//! time through `log`, so every exit path of the measured scope is timed.

use std::time::{Duration, Instant};

/// Measures a scope and logs its duration when dropped.
#[derive(Debug)]
pub struct ScopedTimer {
    label: &'static str,
    start: Instant,
}

impl ScopedTimer {
    /// Starts timing `label`.
    pub fn start(label: &'static str) -> Self {
        log::debug!("{label} started");
        Self {
            label,
            start: Instant::now(),
        }
    }

    /// Time elapsed since the timer started.
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl Drop for ScopedTimer {
    fn drop(&mut self) {
        log::info!(
            "{} finished in {}",
            self.label,
            format_duration(self.start.elapsed())
        );
    }
}

/// Formats a duration for log output: milliseconds below one second,
/// seconds with two decimals otherwise.
pub fn format_duration(duration: Duration) -> String {
    if duration < Duration::from_secs(1) {
        format!("{}ms", duration.as_millis())
    } else {
        format!("{:.2}s", duration.as_secs_f64())
    }
}
