use std::time::Duration;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::clock::{self, Instant};

/// Two-colour palette of one logical page region, in linear 0..1 RGB.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ColorPair {
    pub primary: Vec3,
    pub secondary: Vec3,
}

impl Default for ColorPair {
    fn default() -> Self {
        Self {
            primary: Vec3::new(0.13, 0.16, 0.22),
            secondary: Vec3::new(0.52, 0.46, 0.38),
        }
    }
}

impl ColorPair {
    pub fn new(primary: Vec3, secondary: Vec3) -> Self {
        Self { primary, secondary }
    }

    pub fn lerp(&self, other: &ColorPair, t: f32) -> ColorPair {
        ColorPair {
            primary: self.primary.lerp(other.primary, t),
            secondary: self.secondary.lerp(other.secondary, t),
        }
    }

    pub fn clamped(self) -> ColorPair {
        let fix = |c: Vec3| {
            if c.is_finite() {
                c.clamp(Vec3::ZERO, Vec3::ONE)
            } else {
                Vec3::ZERO
            }
        };
        ColorPair {
            primary: fix(self.primary),
            secondary: fix(self.secondary),
        }
    }
}

#[inline]
pub fn ease_out_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}

struct Transition {
    from: ColorPair,
    to: ColorPair,
    start: Instant,
}

/// Eases the displayed section colours toward a target over a fixed duration.
pub struct ColorInterpolator {
    displayed: ColorPair,
    transition: Option<Transition>,
    duration: Duration,
}

impl ColorInterpolator {
    pub fn new(initial: ColorPair, duration: Duration) -> Self {
        Self {
            displayed: initial,
            transition: None,
            duration,
        }
    }

    /// Start easing toward `target` from whatever is on screen now.
    pub fn set_target(&mut self, target: ColorPair, now: Instant) {
        let target = target.clamped();
        let from = self.sample(now);
        self.displayed = from;
        if self.duration.is_zero() {
            self.displayed = target;
            self.transition = None;
            return;
        }
        self.transition = Some(Transition {
            from,
            to: target,
            start: now,
        });
    }

    /// Advance to `now` and return the colours to display.
    pub fn advance(&mut self, now: Instant) -> ColorPair {
        self.displayed = self.sample(now);
        if let Some(t) = &self.transition {
            if clock::since(now, t.start) >= self.duration {
                self.transition = None;
            }
        }
        self.displayed
    }

    pub fn displayed(&self) -> ColorPair {
        self.displayed
    }

    pub fn target(&self) -> ColorPair {
        self.transition
            .as_ref()
            .map(|t| t.to)
            .unwrap_or(self.displayed)
    }

    pub fn is_transitioning(&self) -> bool {
        self.transition.is_some()
    }

    fn sample(&self, now: Instant) -> ColorPair {
        let Some(t) = &self.transition else {
            return self.displayed;
        };
        let elapsed = clock::since(now, t.start);
        if elapsed >= self.duration {
            return t.to;
        }
        t.from
            .lerp(&t.to, ease_out_cubic(clock::progress(elapsed, self.duration)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn black() -> ColorPair {
        ColorPair::new(Vec3::ZERO, Vec3::ZERO)
    }

    fn white() -> ColorPair {
        ColorPair::new(Vec3::ONE, Vec3::ONE)
    }

    #[test]
    fn reaches_target_exactly_at_duration() {
        let t0 = Instant::now();
        let mut c = ColorInterpolator::new(black(), Duration::from_secs(2));
        c.set_target(white(), t0);
        assert_eq!(c.advance(t0 + Duration::from_secs(2)), white());
        assert!(!c.is_transitioning());
        assert_eq!(c.advance(t0 + Duration::from_secs(9)), white());
    }

    #[test]
    fn eased_curve_is_monotone_and_never_overshoots() {
        let t0 = Instant::now();
        let mut c = ColorInterpolator::new(black(), Duration::from_secs(2));
        c.set_target(white(), t0);
        let mut last = 0.0;
        for ms in (0..=2500).step_by(50) {
            let v = c.advance(t0 + Duration::from_millis(ms)).primary.x;
            assert!(v >= last - 1e-6);
            assert!(v <= 1.0);
            last = v;
        }
    }

    #[test]
    fn ease_out_front_loads_progress() {
        assert!(ease_out_cubic(0.25) > 0.25);
        assert_eq!(ease_out_cubic(0.0), 0.0);
        assert_eq!(ease_out_cubic(1.0), 1.0);
    }

    #[test]
    fn retarget_starts_from_displayed_colour() {
        let t0 = Instant::now();
        let mut c = ColorInterpolator::new(black(), Duration::from_secs(2));
        c.set_target(white(), t0);
        let mid = c.advance(t0 + Duration::from_secs(1));
        c.set_target(black(), t0 + Duration::from_secs(1));
        assert_eq!(c.displayed(), mid);
        assert_eq!(c.target(), black());
    }

    #[test]
    fn zero_duration_jumps() {
        let t0 = Instant::now();
        let mut c = ColorInterpolator::new(black(), Duration::ZERO);
        c.set_target(white(), t0);
        assert_eq!(c.advance(t0), white());
    }
}
