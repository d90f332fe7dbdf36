use std::cell::RefCell;
use std::rc::Rc;
use web_sys as web;

use super::EventListener;
use crate::controller::GlobeController;
use crate::dom;

/// Keep camera aspect and canvas backing size in step with the container.
/// The renderer picks up the new backing size on the next frame.
pub fn wire_resize(
    window: &web::Window,
    container: web::HtmlElement,
    canvas: web::HtmlCanvasElement,
    controller: Rc<RefCell<GlobeController>>,
) -> EventListener {
    EventListener::new(window.as_ref(), "resize", move |_ev| {
        let viewport = dom::container_viewport(&container);
        controller.borrow_mut().on_resize(viewport);
        let (w, h) = dom::sync_canvas_backing_size(&canvas, viewport);
        log::debug!(
            "[resize] {}x{} css, {}x{} backing",
            viewport.width,
            viewport.height,
            w,
            h
        );
    })
}
