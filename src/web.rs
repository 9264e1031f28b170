//! Browser bindings for the wasm build.

use futures::future::LocalBoxFuture;
use wasm_bindgen::{JsCast, closure::Closure};

use crate::{executor::LocalExecutor, window::HostWindow};

/// The browser window hosting the canvas.
#[derive(Debug, Clone)]
pub struct BrowserWindow(web_sys::Window);

impl BrowserWindow {
    pub fn current() -> anyhow::Result<Self> {
        let window = web_sys::window().ok_or_else(|| anyhow::anyhow!("no global window"))?;
        Ok(Self(window))
    }
}

impl HostWindow for BrowserWindow {
    fn on_resize(&self, listener: Box<dyn Fn()>) -> anyhow::Result<()> {
        let closure = Closure::<dyn FnMut()>::new(move || listener());
        self.0
            .add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())
            .map_err(|e| anyhow::anyhow!("could not add resize listener: {:?}", e))?;
        // Lives as long as the page; the engine is never replaced.
        closure.forget();
        Ok(())
    }
}

/// Find the canvas the engine should draw into.
pub fn canvas_by_id(id: &str) -> anyhow::Result<web_sys::HtmlCanvasElement> {
    let document = web_sys::window()
        .and_then(|window| window.document())
        .ok_or_else(|| anyhow::anyhow!("no document to look up #{id} in"))?;
    let element = document
        .get_element_by_id(id)
        .ok_or_else(|| anyhow::anyhow!("no element with id #{id}"))?;
    element
        .dyn_into::<web_sys::HtmlCanvasElement>()
        .map_err(|_| anyhow::anyhow!("element #{id} is not a canvas"))
}

/// Runs pipeline tasks on the browser's microtask queue.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpawnLocal;

impl LocalExecutor for SpawnLocal {
    fn spawn(&self, task: LocalBoxFuture<'static, ()>) {
        wasm_bindgen_futures::spawn_local(task);
    }
}
