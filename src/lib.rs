#![cfg(target_arch = "wasm32")]
use std::cell::RefCell;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

mod camera;
mod color;
mod config;
mod constants;
mod controller;
mod dom;
mod events;
mod frame;
mod geometry;
mod globe;
mod glow;
mod particles;
mod picking;
mod render;
mod resources;
mod scene;
mod shaders;
mod state;

use config::GlobeConfig;
use globe::Globe;

const AUTO_MOUNT_SELECTOR: &str = "[data-interactive-globe]";

thread_local! {
    // Globes mounted from markup live for the lifetime of the page
    static AUTO_MOUNTED: RefCell<Vec<Globe>> = const { RefCell::new(Vec::new()) };
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("globe-web starting");

    spawn_local(async move {
        if let Err(e) = auto_mount().await {
            log::error!("auto-mount error: {:?}", e);
        }
    });
    Ok(())
}

async fn auto_mount() -> anyhow::Result<()> {
    let document = dom::window_document().ok_or_else(|| anyhow::anyhow!("no document"))?;
    let nodes = document
        .query_selector_all(AUTO_MOUNT_SELECTOR)
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    for i in 0..nodes.length() {
        let Some(el) = nodes.item(i).and_then(|n| n.dyn_into::<web::HtmlElement>().ok()) else {
            continue;
        };
        let config = GlobeConfig::from_attributes(
            el.get_attribute("data-camera-distance").as_deref(),
            el.get_attribute("data-decorations").as_deref(),
        );
        match Globe::mount(el, config).await {
            Ok(globe) => AUTO_MOUNTED.with(|g| g.borrow_mut().push(globe)),
            Err(e) => log::error!("mount error: {:?}", e),
        }
    }
    Ok(())
}

/// JS handle to a mounted globe.
#[wasm_bindgen]
pub struct GlobeHandle {
    globe: Option<Globe>,
}

#[wasm_bindgen]
impl GlobeHandle {
    /// Stop the globe and release its resources. Safe to call more than once.
    pub fn dispose(&mut self) {
        if let Some(mut globe) = self.globe.take() {
            globe.dispose();
        }
    }

    #[wasm_bindgen(getter)]
    pub fn dragging(&self) -> bool {
        self.globe
            .as_ref()
            .map(|g| g.controller().borrow().is_dragging())
            .unwrap_or(false)
    }
}

/// Mount a globe into `container`. Resolves once the GPU device is ready.
#[wasm_bindgen(js_name = mountGlobe)]
pub async fn mount_globe(
    container: web::HtmlElement,
    camera_distance: Option<f32>,
) -> Result<GlobeHandle, JsValue> {
    let config = GlobeConfig::default().with_camera_distance(camera_distance);
    Globe::mount(container, config)
        .await
        .map(|globe| GlobeHandle { globe: Some(globe) })
        .map_err(|e| js_sys::Error::new(&format!("{:#}", e)).into())
}
