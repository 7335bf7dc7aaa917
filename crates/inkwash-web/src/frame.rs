use std::cell::RefCell;
use std::rc::Rc;

use inkwash_core::clock::Instant;
use inkwash_core::Orchestrator;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

use crate::dom;
use crate::render::{self, ImageTexture};

pub struct FrameContext<'a> {
    pub canvas: web::HtmlCanvasElement,
    pub orchestrator: Orchestrator<ImageTexture>,
    pub gpu: render::GpuState<'a>,

    /// Host asked for a pause.
    pub paused: bool,
    /// Document is in a background tab.
    pub hidden: bool,
    pub stopped: bool,
}

impl<'a> FrameContext<'a> {
    pub fn running(&self) -> bool {
        !(self.paused || self.hidden || self.stopped)
    }

    pub fn frame(&mut self) {
        if !self.running() {
            return;
        }
        let params = self.orchestrator.frame(Instant::now());
        let result = self.gpu.render(
            &params,
            &self.orchestrator.config().pipeline,
            self.orchestrator.field().current(),
            self.orchestrator.images(),
        );
        match result {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("[gpu] surface lost; reconfiguring");
                self.gpu.reconfigure();
            }
            Err(e) => log::error!("[gpu] frame skipped: {:?}", e),
        }
    }

    /// The idle clock keeps running while frames are skipped, so a hidden or
    /// paused page still goes idle and washes.
    pub fn poll_idle(&mut self) {
        if !self.stopped {
            self.orchestrator.poll_idle(Instant::now());
        }
    }

    pub fn resize(&mut self) {
        let max_dpr = self.orchestrator.config().max_device_pixel_ratio;
        let vp = dom::sync_canvas_backing_size(&self.canvas, max_dpr);
        if vp != self.orchestrator.viewport() {
            log::info!("[gpu] resize {}x{} @{:.2}", vp.width, vp.height, vp.device_pixel_ratio);
            self.orchestrator.resize(vp);
            self.gpu.resize_if_needed(vp.width, vp.height);
        }
    }
}

pub async fn init_gpu(
    canvas: &web::HtmlCanvasElement,
    field_size: u32,
) -> Option<render::GpuState<'static>> {
    // leak a canvas clone to satisfy 'static lifetime for surface
    let leaked_canvas = Box::leak(Box::new(canvas.clone()));
    match render::GpuState::new(leaked_canvas, field_size).await {
        Ok(g) => Some(g),
        Err(e) => {
            log::error!("[gpu] {e}");
            None
        }
    }
}

type Tick = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// Drive the frame context from `requestAnimationFrame` until it is stopped.
pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext<'static>>>) {
    let tick: Tick = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        if frame_ctx.borrow().stopped {
            log::info!("[loop] stopped");
            return;
        }
        frame_ctx.borrow_mut().frame();
        request_frame(&tick_clone);
    }) as Box<dyn FnMut()>));
    request_frame(&tick);
}

fn request_frame(tick: &Tick) {
    if let (Some(w), Some(cb)) = (web::window(), tick.borrow().as_ref()) {
        let _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}
