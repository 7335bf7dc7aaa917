use glam::Vec2;

use crate::constants::*;

/// Smoothed pointer state.
///
/// The host writes the raw target on every pointer event; `update` runs once
/// per frame and eases the smoothed position toward it. Movement intensity is
/// derived from the per-frame position delta with a fast attack and a slow
/// release, so short flicks still register and motion fades out gently.
#[derive(Clone, Debug)]
pub struct PointerSmoother {
    position: Vec2,
    previous: Vec2,
    target: Vec2,
    active: bool,
    intensity: f32,
    initialized: bool,
}

impl Default for PointerSmoother {
    fn default() -> Self {
        Self {
            position: Vec2::splat(0.5),
            previous: Vec2::splat(0.5),
            target: Vec2::splat(0.5),
            active: false,
            intensity: 0.0,
            initialized: false,
        }
    }
}

impl PointerSmoother {
    /// Record a raw pointer position in normalized coordinates.
    pub fn set_target(&mut self, uv: Vec2) {
        if !uv.is_finite() {
            return;
        }
        self.target = uv.clamp(Vec2::ZERO, Vec2::ONE);
        if !self.initialized {
            // snap on first sighting so the brush does not sweep in from the centre
            self.position = self.target;
            self.previous = self.target;
            self.initialized = true;
        }
        self.active = true;
    }

    pub fn enter(&mut self, uv: Vec2) {
        self.set_target(uv);
    }

    pub fn leave(&mut self) {
        self.active = false;
    }

    /// Advance one frame.
    pub fn update(&mut self) {
        self.previous = self.position;
        self.position += (self.target - self.position) * POINTER_SMOOTHING;
        let speed = (self.position - self.previous).length() * INTENSITY_GAIN;
        let goal = speed.clamp(0.0, 1.0);
        let rate = if goal > self.intensity {
            INTENSITY_ATTACK
        } else {
            INTENSITY_RELEASE
        };
        self.intensity += (goal - self.intensity) * rate;
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn target(&self) -> Vec2 {
        self.target
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn intensity(&self) -> f32 {
        self.intensity
    }
}
