use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

use crate::controller::GlobeController;
use crate::render::GpuRenderer;
use crate::scene::SceneGraph;

pub struct FrameContext {
    pub controller: Rc<RefCell<GlobeController>>,
    pub scene: Rc<RefCell<SceneGraph>>,
    pub renderer: Rc<RefCell<GpuRenderer>>,
    pub canvas: web::HtmlCanvasElement,
}

impl FrameContext {
    pub fn frame(&mut self) {
        let rotation = self.controller.borrow_mut().tick();

        let mut renderer = self.renderer.borrow_mut();
        let mut scene = self.scene.borrow_mut();
        scene.apply_rotation(rotation);

        let (time, camera) = {
            let mut c = self.controller.borrow_mut();
            (c.advance_clock(), c.camera)
        };
        scene.animate(&mut *renderer, time);
        self.controller
            .borrow_mut()
            .set_pick_targets(scene.pick_targets());

        renderer.resize_if_needed(self.canvas.width(), self.canvas.height());
        match renderer.render(&scene, &camera, time) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("[gpu] surface lost; reconfiguring");
                renderer.reconfigure();
            }
            Err(e) => log::error!("[gpu] render error: {:?}", e),
        }
    }
}

/// Handle to a running requestAnimationFrame loop.
pub struct AnimationLoop {
    handle: Rc<Cell<Option<i32>>>,
    tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>>,
}

impl AnimationLoop {
    /// Cancel the pending frame and drop the callback, and with it the frame context.
    pub fn cancel(&self) {
        if let Some(id) = self.handle.take() {
            if let Some(w) = web::window() {
                _ = w.cancel_animation_frame(id);
            }
        }
        self.tick.borrow_mut().take();
    }
}

impl Drop for AnimationLoop {
    fn drop(&mut self) {
        self.cancel();
    }
}

fn request_frame(
    tick: &Rc<RefCell<Option<Closure<dyn FnMut()>>>>,
    handle: &Rc<Cell<Option<i32>>>,
) {
    let Some(w) = web::window() else {
        return;
    };
    if let Some(cb) = tick.borrow().as_ref() {
        match w.request_animation_frame(cb.as_ref().unchecked_ref()) {
            Ok(id) => handle.set(Some(id)),
            Err(e) => log::error!("[frame] requestAnimationFrame failed: {:?}", e),
        }
    }
}

pub fn start_loop(frame_ctx: FrameContext) -> AnimationLoop {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let handle: Rc<Cell<Option<i32>>> = Rc::new(Cell::new(None));
    // Weak so the closure does not keep its own slot alive after cancel
    let tick_weak = Rc::downgrade(&tick);
    let handle_tick = handle.clone();
    let mut frame_ctx = frame_ctx;
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        handle_tick.set(None);
        frame_ctx.frame();
        if let Some(tick) = tick_weak.upgrade() {
            request_frame(&tick, &handle_tick);
        }
    }) as Box<dyn FnMut()>));
    request_frame(&tick, &handle);
    AnimationLoop { handle, tick }
}
