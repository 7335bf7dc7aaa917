use inkwash_core::Viewport;
use wasm_bindgen::JsCast;
use web_sys as web;

use crate::constants::{DISABLED_CLASS, REDUCED_MOTION_QUERY};

#[inline]
pub fn window_document() -> Option<web::Document> {
    web::window().and_then(|w| w.document())
}

pub fn find_canvas(canvas_id: &str) -> anyhow::Result<web::HtmlCanvasElement> {
    let document = window_document().ok_or_else(|| anyhow::anyhow!("no document"))?;
    document
        .get_element_by_id(canvas_id)
        .ok_or_else(|| anyhow::anyhow!("missing #{}", canvas_id))?
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|e| anyhow::anyhow!(format!("#{} is not a canvas: {:?}", canvas_id, e)))
}

/// Bounding rect as `[left, top, width, height]` in CSS pixels.
#[inline]
pub fn canvas_rect(canvas: &web::HtmlCanvasElement) -> [f64; 4] {
    let rect = canvas.get_bounding_client_rect();
    [rect.left(), rect.top(), rect.width(), rect.height()]
}

/// Measure the canvas and set its backing store to CSS size times the
/// (capped) device pixel ratio.
pub fn sync_canvas_backing_size(canvas: &web::HtmlCanvasElement, max_dpr: f64) -> Viewport {
    let dpr = web::window().map(|w| w.device_pixel_ratio()).unwrap_or(1.0);
    let rect = canvas.get_bounding_client_rect();
    let vp = Viewport::from_css(rect.width(), rect.height(), dpr, max_dpr);
    if canvas.width() != vp.width || canvas.height() != vp.height {
        canvas.set_width(vp.width);
        canvas.set_height(vp.height);
    }
    vp
}

pub fn prefers_reduced_motion() -> bool {
    web::window()
        .and_then(|w| w.match_media(REDUCED_MOTION_QUERY).ok().flatten())
        .map(|mq| mq.matches())
        .unwrap_or(false)
}

pub fn document_hidden() -> bool {
    window_document().map(|d| d.hidden()).unwrap_or(false)
}

pub fn mark_disabled(canvas: &web::HtmlCanvasElement) {
    let _ = canvas.class_list().add_1(DISABLED_CLASS);
}
