use std::cell::RefCell;
use std::rc::Rc;
use web_sys as web;

use crate::config::GlobeConfig;
use crate::controller::GlobeController;
use crate::dom;
use crate::events::{self, EventListener};
use crate::frame::{self, AnimationLoop, FrameContext};
use crate::render::GpuRenderer;
use crate::scene::SceneGraph;
use crate::state::Cursor;

/// A globe mounted into a host element.
///
/// Everything created by [`Globe::mount`] is torn down by [`Globe::dispose`]:
/// the frame loop, all listeners, scene resources, the GPU device and the canvas.
pub struct Globe {
    container: web::HtmlElement,
    canvas: web::HtmlCanvasElement,
    controller: Rc<RefCell<GlobeController>>,
    scene: Rc<RefCell<SceneGraph>>,
    renderer: Rc<RefCell<GpuRenderer>>,
    listeners: Vec<EventListener>,
    animation: Option<AnimationLoop>,
}

impl Globe {
    pub async fn mount(container: web::HtmlElement, config: GlobeConfig) -> anyhow::Result<Self> {
        let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| anyhow::anyhow!("no document"))?;

        let viewport = dom::container_viewport(&container);
        let canvas = dom::attach_canvas(&document, &container)?;
        dom::sync_canvas_backing_size(&canvas, viewport);

        let mut renderer = match GpuRenderer::new(&canvas).await {
            Ok(r) => r,
            Err(e) => {
                dom::detach_canvas(&container, &canvas);
                return Err(e);
            }
        };
        let scene = SceneGraph::build(&mut renderer, &config);

        let mut controller = GlobeController::new(viewport, config.camera_distance);
        controller.set_pick_targets(scene.pick_targets());
        let controller = Rc::new(RefCell::new(controller));
        let scene = Rc::new(RefCell::new(scene));
        let renderer = Rc::new(RefCell::new(renderer));

        let mut listeners = events::wire_pointer_handlers(
            &window,
            events::PointerWiring {
                container: container.clone(),
                controller: controller.clone(),
            },
        );
        listeners.push(events::wire_resize(
            &window,
            container.clone(),
            canvas.clone(),
            controller.clone(),
        ));

        let animation = frame::start_loop(FrameContext {
            controller: controller.clone(),
            scene: scene.clone(),
            renderer: renderer.clone(),
            canvas: canvas.clone(),
        });

        log::info!(
            "[globe] mounted {}x{} distance={} decorations={}",
            viewport.width,
            viewport.height,
            config.camera_distance,
            config.decorations
        );

        Ok(Self {
            container,
            canvas,
            controller,
            scene,
            renderer,
            listeners,
            animation: Some(animation),
        })
    }

    pub fn controller(&self) -> &Rc<RefCell<GlobeController>> {
        &self.controller
    }

    /// Stop rendering and release everything. Idempotent.
    pub fn dispose(&mut self) {
        let Some(animation) = self.animation.take() else {
            return;
        };
        animation.cancel();
        self.listeners.clear();
        {
            let mut renderer = self.renderer.borrow_mut();
            self.scene.borrow_mut().dispose(&mut *renderer);
            renderer.destroy();
        }
        dom::detach_canvas(&self.container, &self.canvas);
        dom::set_cursor(&self.container, Cursor::Default);
        log::info!("[globe] disposed after {} frames", self.controller.borrow().frames());
    }
}

impl Drop for Globe {
    fn drop(&mut self) {
        self.dispose();
    }
}
