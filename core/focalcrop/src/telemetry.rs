//! Stage timing for optional performance tracing.
//!
//! A [`TimingGuard`] records how long a scoped stage took and logs it on drop
//! under the `focalcrop::telemetry` target. Guards are inert unless the
//! requested level is enabled, so the cost is a single `log_enabled!` check
//! when tracing is off.

use std::borrow::Cow;
use std::time::{Duration, Instant};

use log::{log, log_enabled, Level};

const TARGET: &str = "focalcrop::telemetry";

/// RAII helper that logs the elapsed time of a stage when dropped.
pub struct TimingGuard {
    label: Cow<'static, str>,
    level: Level,
    start: Instant,
    active: bool,
}

impl TimingGuard {
    /// Returns `true` when the guard will emit a log entry on drop.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Consume the guard and return the elapsed duration without logging.
    pub fn finish(mut self) -> Duration {
        self.active = false;
        self.start.elapsed()
    }
}

impl Drop for TimingGuard {
    fn drop(&mut self) {
        if self.active {
            log!(
                target: TARGET,
                self.level,
                "{} completed in {:.2?}",
                self.label,
                self.start.elapsed()
            );
        }
    }
}

/// Start timing a stage; logs at `level` on drop if that level is enabled.
pub fn timing_guard(label: impl Into<Cow<'static, str>>, level: Level) -> TimingGuard {
    TimingGuard {
        label: label.into(),
        level,
        start: Instant::now(),
        active: log_enabled!(target: TARGET, level),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finish_returns_elapsed_and_disarms() {
        let guard = timing_guard("edge", Level::Trace);
        let elapsed = guard.finish();
        assert!(elapsed <= Duration::from_secs(5));
    }

    #[test]
    fn guard_is_inert_without_logger() {
        // No logger is installed in unit tests, so nothing is enabled.
        let guard = timing_guard("score", Level::Trace);
        assert!(!guard.is_active());
    }
}
