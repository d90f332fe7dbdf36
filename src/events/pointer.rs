use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys as web;

use super::EventListener;
use crate::controller::GlobeController;
use crate::dom;

#[derive(Clone)]
pub struct PointerWiring {
    pub container: web::HtmlElement,
    pub controller: Rc<RefCell<GlobeController>>,
}

/// Pointer down and hover on the container; move, up and cancel on the window
/// so a drag keeps tracking after the pointer leaves the globe.
pub fn wire_pointer_handlers(
    window: &web::Window,
    w: PointerWiring,
) -> Vec<EventListener> {
    vec![
        wire_pointerdown(&w),
        wire_hover(&w),
        wire_drag_move(window, &w),
        wire_release(window, &w, "pointerup"),
        wire_release(window, &w, "pointercancel"),
    ]
}

fn pointer_event(ev: web::Event) -> Option<web::PointerEvent> {
    ev.dyn_into::<web::PointerEvent>().ok()
}

fn wire_pointerdown(w: &PointerWiring) -> EventListener {
    let w2 = w.clone();
    EventListener::new(w.container.as_ref(), "pointerdown", move |ev| {
        let Some(ev) = pointer_event(ev) else {
            return;
        };
        let px = dom::pointer_container_px(&ev, &w2.container);
        let cursor = w2.controller.borrow_mut().on_pointer_down(px);
        if let Some(cursor) = cursor {
            ev.prevent_default();
            dom::set_cursor(&w2.container, cursor);
        }
    })
}

fn wire_hover(w: &PointerWiring) -> EventListener {
    let w2 = w.clone();
    EventListener::new(w.container.as_ref(), "pointermove", move |ev| {
        let Some(ev) = pointer_event(ev) else {
            return;
        };
        let px = dom::pointer_container_px(&ev, &w2.container);
        let cursor = w2.controller.borrow_mut().on_hover(px);
        if let Some(cursor) = cursor {
            dom::set_cursor(&w2.container, cursor);
        }
    })
}

fn wire_drag_move(window: &web::Window, w: &PointerWiring) -> EventListener {
    let w2 = w.clone();
    EventListener::new(window.as_ref(), "pointermove", move |ev| {
        // Skip the layout query unless a drag is in progress
        if !w2.controller.borrow().is_dragging() {
            return;
        }
        let Some(ev) = pointer_event(ev) else {
            return;
        };
        let px = dom::pointer_container_px(&ev, &w2.container);
        w2.controller.borrow_mut().on_pointer_move(px);
    })
}

fn wire_release(window: &web::Window, w: &PointerWiring, event: &'static str) -> EventListener {
    let w2 = w.clone();
    EventListener::new(window.as_ref(), event, move |_ev| {
        let cursor = w2.controller.borrow_mut().on_pointer_up();
        dom::set_cursor(&w2.container, cursor);
    })
}
