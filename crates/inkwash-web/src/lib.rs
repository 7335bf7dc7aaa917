#![cfg(target_arch = "wasm32")]
//! Browser front-end: mounts the painterly background on a canvas and drives
//! it from `requestAnimationFrame`.
//!
//! ```js
//! import init, { mount } from "./pkg/inkwash_web.js";
//! await init();
//! const bg = await mount("bg-canvas", ["/img/a.jpg", "/img/b.jpg"]);
//! bg.set_section_colors([0.9, 0.4, 0.2], [0.1, 0.2, 0.5]);
//! ```
use std::cell::RefCell;
use std::rc::Rc;

use inkwash_core::clock::Instant;
use inkwash_core::{ColorPair, Config, Orchestrator};
use wasm_bindgen::prelude::*;

mod assets;
mod constants;
mod decode;
mod dom;
mod events;
mod frame;
mod input;
mod render;

use frame::FrameContext;

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("inkwash-web loaded");
    Ok(())
}

struct Mounted {
    ctx: Rc<RefCell<FrameContext<'static>>>,
    listeners: events::Listeners,
}

/// Handle returned by [`mount`]. A disabled handle (reduced motion, no
/// WebGPU) accepts every call and does nothing.
#[wasm_bindgen]
pub struct InkwashHandle {
    inner: Option<Mounted>,
}

impl InkwashHandle {
    fn disabled() -> Self {
        Self { inner: None }
    }
}

#[wasm_bindgen]
impl InkwashHandle {
    /// False when the effect is off and the page should show its static image.
    #[wasm_bindgen(getter)]
    pub fn enabled(&self) -> bool {
        self.inner.is_some()
    }

    /// Fade the procedural palette toward a new `[r, g, b]` pair.
    pub fn set_section_colors(&self, primary: Vec<f32>, secondary: Vec<f32>) -> Result<(), JsValue> {
        let (Some(p), Some(s)) = (input::color_from_js(&primary), input::color_from_js(&secondary))
        else {
            return Err(JsValue::from_str("colours must be [r, g, b] arrays"));
        };
        if let Some(m) = &self.inner {
            m.ctx
                .borrow_mut()
                .orchestrator
                .set_section_colors(ColorPair::new(p, s), Instant::now());
        }
        Ok(())
    }

    pub fn pause(&self) {
        if let Some(m) = &self.inner {
            m.ctx.borrow_mut().paused = true;
        }
    }

    pub fn resume(&self) {
        if let Some(m) = &self.inner {
            m.ctx.borrow_mut().paused = false;
        }
    }

    /// Stop the loop and remove every listener. The handle is inert afterwards.
    pub fn stop(&mut self) {
        if let Some(mut m) = self.inner.take() {
            m.ctx.borrow_mut().stopped = true;
            m.listeners.detach_all();
            log::info!("[inkwash] stopped");
        }
    }
}

/// Start the background on `<canvas id=canvas_id>`.
///
/// `config_json` is an optional, partial JSON config; a malformed one is
/// logged and replaced by the defaults.
#[wasm_bindgen]
pub async fn mount(
    canvas_id: String,
    image_urls: Vec<String>,
    config_json: Option<String>,
) -> Result<InkwashHandle, JsValue> {
    mount_inner(&canvas_id, image_urls, config_json.as_deref())
        .await
        .map_err(|e| JsValue::from_str(&format!("{:#}", e)))
}

async fn mount_inner(
    canvas_id: &str,
    image_urls: Vec<String>,
    config_json: Option<&str>,
) -> anyhow::Result<InkwashHandle> {
    let canvas = dom::find_canvas(canvas_id)?;
    let config = match config_json {
        Some(json) => Config::from_json(json).unwrap_or_else(|e| {
            log::warn!("[config] {}; using defaults", e);
            Config::default()
        }),
        None => Config::default(),
    };

    if dom::prefers_reduced_motion() {
        log::info!("[inkwash] reduced motion requested; effect disabled");
        dom::mark_disabled(&canvas);
        return Ok(InkwashHandle::disabled());
    }

    let viewport = dom::sync_canvas_backing_size(&canvas, config.max_device_pixel_ratio);
    let Some(gpu) = frame::init_gpu(&canvas, config.simulation.resolution).await else {
        log::error!("[inkwash] no usable GPU; effect disabled");
        dom::mark_disabled(&canvas);
        return Ok(InkwashHandle::disabled());
    };

    let slots = image_urls.len();
    let orchestrator = Orchestrator::new(config, slots, viewport, Instant::now(), rand::random());
    let ctx = Rc::new(RefCell::new(FrameContext {
        canvas,
        orchestrator,
        gpu,
        paused: false,
        hidden: dom::document_hidden(),
        stopped: false,
    }));

    let listeners = events::wire(ctx.clone());
    assets::spawn_image_loads(ctx.clone(), image_urls);
    frame::start_loop(ctx.clone());
    log::info!("[inkwash] mounted on #{} with {} image slot(s)", canvas_id, slots);

    Ok(InkwashHandle {
        inner: Some(Mounted { ctx, listeners }),
    })
}
