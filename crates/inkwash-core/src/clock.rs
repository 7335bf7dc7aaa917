//! Monotonic time helpers.
//!
//! All timing in the core takes `now` as a parameter instead of reading a
//! clock, so the host decides the time source (`performance.now()` on the web,
//! which keeps running while the tab is hidden) and tests can step time by
//! hand.

use std::time::Duration;

pub use instant::Instant;

/// Elapsed time from `earlier` to `now`, zero if `now` is not later.
#[inline]
pub fn since(now: Instant, earlier: Instant) -> Duration {
    if now > earlier {
        now - earlier
    } else {
        Duration::ZERO
    }
}

/// `elapsed / total` in 0..1; a zero `total` counts as finished.
#[inline]
pub fn progress(elapsed: Duration, total: Duration) -> f32 {
    if total.is_zero() {
        return 1.0;
    }
    (elapsed.as_secs_f32() / total.as_secs_f32()).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn since_saturates() {
        let t0 = Instant::now();
        let t1 = t0 + Duration::from_millis(10);
        assert_eq!(since(t1, t0), Duration::from_millis(10));
        assert_eq!(since(t0, t1), Duration::ZERO);
    }

    #[test]
    fn progress_clamps() {
        let total = Duration::from_secs(4);
        assert_eq!(progress(Duration::from_secs(2), total), 0.5);
        assert_eq!(progress(Duration::from_secs(9), total), 1.0);
        assert_eq!(progress(Duration::ZERO, Duration::ZERO), 1.0);
    }
}
