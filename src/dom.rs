use glam::Vec2;
use wasm_bindgen::JsCast;
use web_sys as web;

use crate::constants::MAX_PIXEL_RATIO;
use crate::state::{Cursor, ViewportState};

#[inline]
pub fn window_document() -> Option<web::Document> {
    web::window().and_then(|w| w.document())
}

/// Container size in CSS pixels.
pub fn container_viewport(container: &web::HtmlElement) -> ViewportState {
    ViewportState::new(
        container.client_width() as f32,
        container.client_height() as f32,
    )
}

/// Replace the container's children with a full-size canvas.
pub fn attach_canvas(
    document: &web::Document,
    container: &web::HtmlElement,
) -> anyhow::Result<web::HtmlCanvasElement> {
    while let Some(child) = container.first_child() {
        _ = container.remove_child(&child);
    }
    let canvas: web::HtmlCanvasElement = document
        .create_element("canvas")
        .map_err(|e| anyhow::anyhow!("create canvas: {:?}", e))?
        .dyn_into()
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;
    let style = canvas.style();
    _ = style.set_property("display", "block");
    _ = style.set_property("width", "100%");
    _ = style.set_property("height", "100%");
    // Pointer events, not browser panning, drive rotation on touch screens
    _ = style.set_property("touch-action", "none");
    container
        .append_child(&canvas)
        .map_err(|e| anyhow::anyhow!("append canvas: {:?}", e))?;
    Ok(canvas)
}

pub fn detach_canvas(container: &web::HtmlElement, canvas: &web::HtmlCanvasElement) {
    if canvas.parent_node().is_some() {
        _ = container.remove_child(canvas);
    }
}

/// Size the drawing buffer to the container at the device pixel ratio (capped).
/// Returns the backing size in physical pixels.
pub fn sync_canvas_backing_size(
    canvas: &web::HtmlCanvasElement,
    viewport: ViewportState,
) -> (u32, u32) {
    let dpr = web::window()
        .map(|w| w.device_pixel_ratio())
        .unwrap_or(1.0)
        .min(MAX_PIXEL_RATIO);
    let w_px = ((viewport.width as f64) * dpr) as u32;
    let h_px = ((viewport.height as f64) * dpr) as u32;
    canvas.set_width(w_px.max(1));
    canvas.set_height(h_px.max(1));
    (canvas.width(), canvas.height())
}

pub fn set_cursor(container: &web::HtmlElement, cursor: Cursor) {
    _ = container.style().set_property("cursor", cursor.as_css());
}

/// Pointer position relative to the container's top-left, in CSS pixels.
#[inline]
pub fn pointer_container_px(ev: &web::PointerEvent, container: &web::HtmlElement) -> Vec2 {
    let rect = container.get_bounding_client_rect();
    Vec2::new(
        ev.client_x() as f32 - rect.left() as f32,
        ev.client_y() as f32 - rect.top() as f32,
    )
}
