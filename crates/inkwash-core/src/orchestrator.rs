//! Per-frame driver.
//!
//! Owns every piece of mutable state in the core and advances it in a fixed
//! order each frame: simulation step, pointer smoothing, colour transition,
//! idle/wash timers. The result is a [`FrameParams`] snapshot for the
//! renderer. The orchestrator is the only writer; the host only forwards
//! events and reads snapshots.

use glam::Vec2;

use crate::clock::{self, Instant};
use crate::color::{ColorInterpolator, ColorPair};
use crate::compose::CoverTransform;
use crate::config::Config;
use crate::error::Error;
use crate::field::{DisplacementField, StepInput};
use crate::frame::FrameParams;
use crate::idle::{ActivityState, IdleEvent, IdleMachine};
use crate::images::ImageSet;
use crate::pointer::PointerSmoother;
use crate::viewport::Viewport;

pub struct Orchestrator<T> {
    config: Config,
    field: DisplacementField,
    pointer: PointerSmoother,
    colors: ColorInterpolator,
    idle: IdleMachine,
    images: ImageSet<T>,
    viewport: Viewport,
    start: Instant,
    /// Placement of the current image the field was painted under.
    field_cover: CoverTransform,
}

impl<T> Orchestrator<T> {
    pub fn new(config: Config, image_slots: usize, viewport: Viewport, now: Instant, seed: u64) -> Self {
        let field = DisplacementField::new(config.simulation.resolution);
        let colors = ColorInterpolator::new(config.initial_colors, config.timing.color_transition());
        let idle = IdleMachine::new(now, &config.timing, seed);
        Self {
            field,
            pointer: PointerSmoother::default(),
            colors,
            idle,
            images: ImageSet::with_slots(image_slots),
            viewport,
            start: now,
            field_cover: CoverTransform::IDENTITY,
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn field(&self) -> &DisplacementField {
        &self.field
    }

    pub fn images(&self) -> &ImageSet<T> {
        &self.images
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn state(&self) -> ActivityState {
        self.idle.state()
    }

    pub fn pointer_move(&mut self, uv: Vec2, now: Instant) {
        self.pointer.set_target(uv);
        self.note_activity(now);
    }

    pub fn pointer_enter(&mut self, uv: Vec2, now: Instant) {
        self.pointer.enter(uv);
        self.note_activity(now);
    }

    pub fn pointer_leave(&mut self) {
        self.pointer.leave();
    }

    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.sync_field_cover();
    }

    pub fn set_section_colors(&mut self, colors: ColorPair, now: Instant) {
        self.colors.set_target(colors, now);
    }

    /// Store a decoded image in its slot. A failure leaves the slot skipped.
    pub fn insert_image(&mut self, slot: usize, width: u32, height: u32, payload: T) -> Result<(), Error> {
        let res = self.images.insert(slot, width, height, payload);
        if res.is_ok() {
            log::info!("[assets] slot {} ready ({}x{})", slot, width, height);
            self.sync_field_cover();
        }
        res
    }

    pub fn mark_image_failed(&mut self, slot: usize) {
        self.images.mark_failed(slot);
        if self.images.all_failed() {
            log::warn!("[assets] no images loaded; staying on the procedural pattern");
        }
    }

    /// Advance the idle/wash timers. Called from the frame loop and from the
    /// host's periodic poll, so it must be cheap and idempotent per instant.
    pub fn poll_idle(&mut self, now: Instant) -> Option<IdleEvent> {
        let event = self.idle.poll(now, self.images.can_wash());
        match event {
            Some(IdleEvent::WentIdle) => log::debug!("[wash] idle"),
            Some(IdleEvent::WashStarted { angle }) => {
                let next = self.images.begin_crossfade();
                log::info!(
                    "[wash] start {:?} -> {:?} at {:.2} rad",
                    self.images.current_index(),
                    next,
                    angle
                );
            }
            Some(IdleEvent::WashCompleted) => {
                let current = self.images.complete_crossfade();
                log::info!("[wash] complete, showing slot {:?}", current);
                self.sync_field_cover();
            }
            Some(IdleEvent::Resumed) | None => {}
        }
        event
    }

    /// Advance one frame and snapshot the result.
    pub fn frame(&mut self, now: Instant) -> FrameParams {
        let time = clock::since(now, self.start).as_secs_f32();

        let input = StepInput {
            pointer: self.pointer.position(),
            pointer_active: self.pointer.is_active(),
            intensity: self.pointer.intensity(),
            aspect: self.viewport.aspect(),
            time,
        };
        if self.config.simulation.enabled {
            self.field.step(&self.config.simulation, &input);
        }

        self.pointer.update();
        let colors = self.colors.advance(now);
        self.poll_idle(now);

        FrameParams {
            time,
            width: self.viewport.width,
            height: self.viewport.height,
            pointer: self.pointer.position(),
            pointer_active: self.pointer.is_active(),
            intensity: self.pointer.intensity(),
            colors,
            state: self.idle.state(),
            wash_progress: self.idle.progress(),
            wash_angle: self.idle.angle(),
            current_image: self.images.current_index(),
            next_image: self.images.next_index(),
            current_cover: self.cover_for(self.images.current_index()),
            next_cover: self.cover_for(self.images.next_index()),
            field_enabled: self.config.simulation.enabled,
            field_parity: self.field.parity(),
        }
    }

    fn note_activity(&mut self, now: Instant) {
        if let Some(IdleEvent::Resumed) = self.idle.activity(now) {
            log::debug!("[wash] active");
        }
    }

    fn cover_for(&self, slot: Option<usize>) -> CoverTransform {
        slot.and_then(|i| self.images.get(i))
            .map(|img| CoverTransform::new(img.aspect, self.viewport.aspect()))
            .unwrap_or(CoverTransform::IDENTITY)
    }

    /// Clear the field when the current image's placement has changed.
    fn sync_field_cover(&mut self) {
        let cover = self.cover_for(self.images.current_index());
        if cover.differs_from(&self.field_cover) {
            self.field.clear();
        }
        self.field_cover = cover;
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn orchestrator(slots: usize) -> (Orchestrator<()>, Instant) {
        let t0 = Instant::now();
        let vp = Viewport::from_css(400.0, 400.0, 1.0, 2.0);
        (Orchestrator::new(Config::default(), slots, vp, t0, 11), t0)
    }

    #[test]
    fn frame_steps_the_field_once() {
        let (mut o, t0) = orchestrator(1);
        let p0 = o.frame(t0);
        let p1 = o.frame(t0 + Duration::from_millis(16));
        assert_eq!(o.field().steps(), 2);
        assert_ne!(p0.field_parity, p1.field_parity);
    }

    #[test]
    fn pointer_activity_wakes_idle_machine() {
        let (mut o, t0) = orchestrator(2);
        o.poll_idle(t0 + Duration::from_secs(15));
        assert_eq!(o.state(), ActivityState::Idle);
        o.pointer_move(Vec2::splat(0.5), t0 + Duration::from_secs(16));
        assert_eq!(o.state(), ActivityState::Active);
    }

    #[test]
    fn leaving_does_not_count_as_activity() {
        let (mut o, t0) = orchestrator(2);
        o.poll_idle(t0 + Duration::from_secs(15));
        o.pointer_leave();
        assert_eq!(o.state(), ActivityState::Idle);
    }

    #[test]
    fn resting_pointer_still_goes_idle() {
        let (mut o, t0) = orchestrator(2);
        o.pointer_enter(Vec2::splat(0.5), t0);
        o.poll_idle(t0 + Duration::from_secs(15));
        assert!(o.frame(t0 + Duration::from_secs(15)).pointer_active);
        assert_eq!(o.state(), ActivityState::Idle);
    }

    #[test]
    fn disabled_simulation_is_never_stepped() {
        let t0 = Instant::now();
        let mut cfg = Config::default();
        cfg.simulation.enabled = false;
        let vp = Viewport::from_css(400.0, 400.0, 1.0, 2.0);
        let mut o: Orchestrator<()> = Orchestrator::new(cfg, 1, vp, t0, 3);
        o.pointer_enter(Vec2::splat(0.5), t0);
        let p = o.frame(t0 + Duration::from_millis(16));
        assert!(!p.field_enabled);
        assert_eq!(o.field().steps(), 0);
        assert!(o.field().current().is_clear());
    }

    #[test]
    fn no_image_uses_identity_cover() {
        let (mut o, t0) = orchestrator(1);
        let p = o.frame(t0);
        assert_eq!(p.current_image, None);
        assert_eq!(p.current_cover, CoverTransform::IDENTITY);
    }
}
