use std::cell::{Cell, RefCell};
use std::rc::Rc;

use inkwash_core::clock::Instant;
use inkwash_core::IDLE_POLL_MS;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

use crate::dom;
use crate::frame::FrameContext;
use crate::input;

type Handler = Closure<dyn FnMut(web::Event)>;

/// Every listener and timer the mount installed, kept so `stop` can take
/// them down again.
#[derive(Default)]
pub struct Listeners {
    attached: Vec<(web::EventTarget, &'static str, Handler)>,
    interval: Option<(i32, Closure<dyn FnMut()>)>,
}

impl Listeners {
    fn add(
        &mut self,
        target: &web::EventTarget,
        event: &'static str,
        handler: impl FnMut(web::Event) + 'static,
    ) {
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(web::Event)>);
        match target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref()) {
            Ok(()) => self.attached.push((target.clone(), event, closure)),
            Err(e) => log::warn!("[events] could not listen for {}: {:?}", event, e),
        }
    }

    pub fn detach_all(&mut self) {
        for (target, event, closure) in self.attached.drain(..) {
            let _ = target
                .remove_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
        }
        if let Some((id, _closure)) = self.interval.take() {
            if let Some(w) = web::window() {
                w.clear_interval_with_handle(id);
            }
        }
    }
}

/// Wire pointer, resize and visibility events plus the idle poll to the
/// frame context.
pub fn wire(ctx: Rc<RefCell<FrameContext<'static>>>) -> Listeners {
    let mut listeners = Listeners::default();
    let Some(window) = web::window() else {
        return listeners;
    };
    let window_target: &web::EventTarget = window.as_ref();

    // The canvas usually sits behind page content, so pointer events are
    // taken from the window and tested against the canvas rect.
    let inside = Rc::new(Cell::new(false));
    {
        let ctx = ctx.clone();
        let inside = inside.clone();
        listeners.add(window_target, "pointermove", move |ev| {
            let Some(ev) = ev.dyn_ref::<web::PointerEvent>() else {
                return;
            };
            let mut c = ctx.borrow_mut();
            let rect = dom::canvas_rect(&c.canvas);
            let (x, y) = (ev.client_x() as f64, ev.client_y() as f64);
            let now = Instant::now();
            if input::client_inside(x, y, rect) {
                let uv = input::client_to_uv(x, y, rect);
                if inside.replace(true) {
                    c.orchestrator.pointer_move(uv, now);
                } else {
                    c.orchestrator.pointer_enter(uv, now);
                }
            } else if inside.replace(false) {
                c.orchestrator.pointer_leave();
            }
        });
    }
    {
        let ctx = ctx.clone();
        let inside = inside.clone();
        listeners.add(window_target, "pointerout", move |ev| {
            // relatedTarget is null once the pointer has left the page
            let left_page = ev
                .dyn_ref::<web::PointerEvent>()
                .map(|p| p.related_target().is_none())
                .unwrap_or(false);
            if left_page && inside.replace(false) {
                ctx.borrow_mut().orchestrator.pointer_leave();
            }
        });
    }
    {
        let ctx = ctx.clone();
        listeners.add(window_target, "resize", move |_| {
            ctx.borrow_mut().resize();
        });
    }
    if let Some(document) = window.document() {
        let ctx = ctx.clone();
        listeners.add(document.as_ref(), "visibilitychange", move |_| {
            let hidden = dom::document_hidden();
            log::info!("[events] document {}", if hidden { "hidden" } else { "visible" });
            ctx.borrow_mut().hidden = hidden;
        });
    }

    {
        let ctx = ctx.clone();
        let poll = Closure::wrap(Box::new(move || {
            ctx.borrow_mut().poll_idle();
        }) as Box<dyn FnMut()>);
        match window.set_interval_with_callback_and_timeout_and_arguments_0(
            poll.as_ref().unchecked_ref(),
            IDLE_POLL_MS,
        ) {
            Ok(id) => listeners.interval = Some((id, poll)),
            Err(e) => log::warn!("[events] idle poll unavailable: {:?}", e),
        }
    }

    listeners
}
