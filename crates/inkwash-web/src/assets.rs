use std::cell::RefCell;
use std::rc::Rc;

use anyhow::anyhow;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys as web;

use crate::decode::{self, DecodedImage};
use crate::frame::FrameContext;

fn js_err(e: wasm_bindgen::JsValue) -> anyhow::Error {
    anyhow!(format!("{:?}", e))
}

async fn fetch_bytes(url: &str) -> anyhow::Result<Vec<u8>> {
    let window = web::window().ok_or_else(|| anyhow!("no window"))?;
    let opts = web::RequestInit::new();
    opts.set_method("GET");
    opts.set_mode(web::RequestMode::Cors);
    let request = web::Request::new_with_str_and_init(url, &opts).map_err(js_err)?;
    let resp: web::Response = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(js_err)?
        .dyn_into()
        .map_err(js_err)?;
    if !resp.ok() {
        anyhow::bail!("HTTP {}", resp.status());
    }
    let buf = JsFuture::from(resp.array_buffer().map_err(js_err)?)
        .await
        .map_err(js_err)?;
    Ok(js_sys::Uint8Array::new(&buf).to_vec())
}

async fn load_image(url: &str, max_side: u32) -> anyhow::Result<DecodedImage> {
    let bytes = fetch_bytes(url).await?;
    decode::decode_image(&bytes, max_side)
}

/// Fetch every image concurrently. Each one lands in its own slot as soon as
/// it decodes; failures only drop that slot.
pub fn spawn_image_loads(ctx: Rc<RefCell<FrameContext<'static>>>, urls: Vec<String>) {
    let max_side = ctx.borrow().gpu.max_texture_side();
    for (slot, url) in urls.into_iter().enumerate() {
        let ctx = ctx.clone();
        spawn_local(async move {
            let loaded = load_image(&url, max_side).await;
            let mut guard = ctx.borrow_mut();
            let c = &mut *guard;
            if c.stopped {
                return;
            }
            match loaded {
                Ok(img) => {
                    let tex = c.gpu.upload_image(slot, img.width, img.height, &img.rgba);
                    if let Err(e) = c.orchestrator.insert_image(slot, img.width, img.height, tex) {
                        log::warn!("[assets] slot {} ({}) rejected: {}", slot, url, e);
                    }
                }
                Err(e) => {
                    log::warn!("[assets] slot {} ({}) failed: {:#}", slot, url, e);
                    c.orchestrator.mark_image_failed(slot);
                }
            }
        });
    }
}
