//! Idle / wash state machine.
//!
//! ```text
//!   Active --(no activity for idle_timeout)--> Idle
//!   Idle   --(activity)--> Active
//!   Idle   --(idle for another idle_timeout)--> Washing
//!   Washing --(wash_duration elapsed)--> Idle   (idle clock restarts)
//! ```
//!
//! Activity during a wash is recorded but does not interrupt it. The machine
//! is driven by `poll`, which the host calls from both the frame callback and
//! a periodic timer so transitions still happen while frames are paused.

use std::f32::consts::TAU;
use std::time::Duration;

use rand::prelude::*;

use crate::clock::{self, Instant};
use crate::config::TimingParams;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActivityState {
    Active,
    Idle,
    Washing,
}

/// Transitions reported by [`IdleMachine::poll`] and [`IdleMachine::activity`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum IdleEvent {
    WentIdle,
    Resumed,
    /// A wash began; `angle` is the sweep direction in radians.
    WashStarted { angle: f32 },
    WashCompleted,
}

pub struct IdleMachine {
    state: ActivityState,
    idle_timeout: Duration,
    wash_duration: Duration,
    last_activity: Instant,
    idle_since: Instant,
    wash_start: Instant,
    progress: f32,
    angle: f32,
    rng: StdRng,
}

impl IdleMachine {
    pub fn new(now: Instant, timing: &TimingParams, seed: u64) -> Self {
        Self {
            state: ActivityState::Active,
            idle_timeout: timing.idle_timeout(),
            wash_duration: timing.wash_duration(),
            last_activity: now,
            idle_since: now,
            wash_start: now,
            progress: 0.0,
            angle: 0.0,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Pointer activity. Wakes an idle machine immediately; a running wash
    /// keeps going.
    pub fn activity(&mut self, now: Instant) -> Option<IdleEvent> {
        self.last_activity = now;
        match self.state {
            ActivityState::Idle => {
                self.state = ActivityState::Active;
                Some(IdleEvent::Resumed)
            }
            ActivityState::Active | ActivityState::Washing => None,
        }
    }

    /// Advance timers. `can_wash` is false while fewer than two images are
    /// available, which holds the machine in Idle.
    pub fn poll(&mut self, now: Instant, can_wash: bool) -> Option<IdleEvent> {
        match self.state {
            ActivityState::Active => {
                if clock::since(now, self.last_activity) >= self.idle_timeout {
                    self.state = ActivityState::Idle;
                    self.idle_since = now;
                    return Some(IdleEvent::WentIdle);
                }
                None
            }
            ActivityState::Idle => {
                if can_wash && clock::since(now, self.idle_since) >= self.idle_timeout {
                    self.state = ActivityState::Washing;
                    self.wash_start = now;
                    self.progress = 0.0;
                    self.angle = self.rng.gen_range(0.0..TAU);
                    return Some(IdleEvent::WashStarted { angle: self.angle });
                }
                None
            }
            ActivityState::Washing => {
                self.progress =
                    clock::progress(clock::since(now, self.wash_start), self.wash_duration);
                if self.progress >= 1.0 {
                    self.state = ActivityState::Idle;
                    self.progress = 0.0;
                    self.idle_since = now;
                    return Some(IdleEvent::WashCompleted);
                }
                None
            }
        }
    }

    pub fn state(&self) -> ActivityState {
        self.state
    }

    /// Wash progress in 0..1; 0 outside a wash.
    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn angle(&self) -> f32 {
        self.angle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn machine(t0: Instant) -> IdleMachine {
        let timing = TimingParams {
            idle_timeout_sec: 15.0,
            wash_duration_sec: 5.0,
            ..TimingParams::default()
        };
        IdleMachine::new(t0, &timing, 7)
    }

    fn at(t0: Instant, secs: f32) -> Instant {
        t0 + Duration::from_secs_f32(secs)
    }

    #[test]
    fn activity_while_active_only_moves_the_clock() {
        let t0 = Instant::now();
        let mut m = machine(t0);
        assert_eq!(m.activity(at(t0, 10.0)), None);
        assert_eq!(m.poll(at(t0, 20.0), true), None);
        assert_eq!(m.state(), ActivityState::Active);
    }

    #[test]
    fn wash_is_not_interrupted_by_activity() {
        let t0 = Instant::now();
        let mut m = machine(t0);
        m.poll(at(t0, 15.0), true);
        m.poll(at(t0, 30.0), true);
        assert_eq!(m.state(), ActivityState::Washing);
        assert_eq!(m.activity(at(t0, 31.0)), None);
        assert_eq!(m.state(), ActivityState::Washing);
        m.poll(at(t0, 32.5), true);
        assert!((m.progress() - 0.5).abs() < 1e-3);
    }

    #[test]
    fn single_image_never_washes() {
        let t0 = Instant::now();
        let mut m = machine(t0);
        m.poll(at(t0, 15.0), false);
        assert_eq!(m.poll(at(t0, 100.0), false), None);
        assert_eq!(m.state(), ActivityState::Idle);
    }

    #[test]
    fn wash_angles_vary_between_transitions() {
        let t0 = Instant::now();
        let mut m = machine(t0);
        let mut angles = Vec::new();
        let mut t = 15.0;
        m.poll(at(t0, t), true);
        for _ in 0..4 {
            t += 15.0;
            if let Some(IdleEvent::WashStarted { angle }) = m.poll(at(t0, t), true) {
                assert!((0.0..TAU).contains(&angle));
                angles.push(angle);
            }
            t += 5.0;
            assert_eq!(m.poll(at(t0, t), true), Some(IdleEvent::WashCompleted));
        }
        assert_eq!(angles.len(), 4);
        assert!(angles.windows(2).any(|w| w[0] != w[1]));
    }
}
