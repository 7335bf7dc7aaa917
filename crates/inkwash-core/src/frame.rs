use glam::Vec2;

use crate::color::ColorPair;
use crate::compose::CoverTransform;
use crate::idle::ActivityState;

/// Everything the renderer needs for one frame, captured after the
/// orchestrator has advanced all of its units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameParams {
    /// Seconds since the orchestrator was created.
    pub time: f32,
    pub width: u32,
    pub height: u32,
    pub pointer: Vec2,
    pub pointer_active: bool,
    pub intensity: f32,
    pub colors: ColorPair,
    pub state: ActivityState,
    pub wash_progress: f32,
    pub wash_angle: f32,
    pub current_image: Option<usize>,
    pub next_image: Option<usize>,
    pub current_cover: CoverTransform,
    pub next_cover: CoverTransform,
    /// False when the simulation is switched off; the stages then fall back
    /// to a circular reveal around the pointer.
    pub field_enabled: bool,
    /// Readable field buffer after this frame's step.
    pub field_parity: usize,
}

impl FrameParams {
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }

    /// Mid-crossfade: both images are bound and the wash mask is live.
    pub fn is_washing(&self) -> bool {
        self.state == ActivityState::Washing && self.next_image.is_some()
    }
}
