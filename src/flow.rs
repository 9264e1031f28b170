//! The resource pipeline and its root composition.
//!
//! A [`Flow`] is built once by the application root and handed by reference
//! to the UI code that owns the drawing surface and the overlay button. It
//! wires the following graph at construction time:
//!
//! ```text
//! surface ─▶ engine ─▶ scene
//!              │ └──────┴──▶ join ─▶ render loop
//!              └─▶ window resize listener
//! scene ─┬─ surface ─▶ join ─▶ camera, light, material (once)
//!        └─ overlay triggers ─▶ with latest scene ─▶ load modules ─▶ flip overlay
//! ```
//!
//! # Lifecycle
//!
//! 1. `Flow::new()` subscribes every stage; nothing is created yet
//! 2. `Flow::mount()` pushes the surface; engine, scene, resize listener,
//!    render loop and scene resources are created synchronously, in that order
//! 3. `Flow::toggle_overlay()` flips the inspection overlay, loading its
//!    modules in the background on first use
//!
//! Stages that fail during `mount` are fatal: nothing downstream of them is
//! created and the first error is returned from `mount`.

use std::{cell::RefCell, fmt::Debug, rc::Rc};

use anyhow::Context as _;

use crate::{
    config::FlowConfig,
    context::SceneContext,
    engine::Backend,
    executor::LocalExecutor,
    material::NodeEditor,
    overlay::{OverlayState, OverlayToggle},
    render::RenderLoop,
    resources::{Memoized, ModuleLoader},
    stream::{Cached, Replay, join},
    window::{HostWindow, bind_resize},
};

/// External collaborators of a [`Flow`].
pub struct Host<B: Backend> {
    pub backend: B,
    pub window: Rc<dyn HostWindow>,
    pub editor: Rc<dyn NodeEditor<B::Material>>,
    /// Modules the overlay needs before it can be shown.
    pub overlay_modules: Box<dyn ModuleLoader>,
    pub executor: Rc<dyn LocalExecutor>,
}

/// First fatal error raised while the pipeline reacts to a push.
#[derive(Clone, Default)]
struct Fatal(Rc<RefCell<Option<anyhow::Error>>>);

impl Fatal {
    fn reporter(&self) -> Box<dyn Fn(anyhow::Error)> {
        let slot = self.0.clone();
        Box::new(move |e: anyhow::Error| {
            log::error!("Pipeline initialization failed: {:#}", e);
            let mut slot = slot.borrow_mut();
            if slot.is_none() {
                *slot = Some(e);
            }
        })
    }

    fn take(&self) -> Option<anyhow::Error> {
        self.0.borrow_mut().take()
    }
}

pub struct Flow<B: Backend> {
    surface: Replay<B::Surface>,
    engine: Replay<Rc<B::Engine>>,
    scene: Replay<Rc<B::Scene>>,
    context: Replay<Rc<SceneContext<B>>>,
    render_loop: Rc<RenderLoop>,
    overlay: OverlayToggle<B::Scene>,
    fatal: Fatal,
}

impl<B: Backend> Flow<B> {
    pub fn new(host: Host<B>, config: FlowConfig) -> Self {
        let backend = Rc::new(host.backend);
        let fatal = Fatal::default();
        let surface: Replay<B::Surface> = Replay::new();

        let engine = {
            let backend = backend.clone();
            Replay::derive(
                &surface,
                move |surface: &B::Surface| {
                    log::info!("creating engine");
                    let engine = backend
                        .create_engine(surface)
                        .context("could not create the engine")?;
                    Ok(Rc::new(engine))
                },
                fatal.reporter(),
            )
        };
        let scene = {
            let backend = backend.clone();
            Replay::derive(
                &engine,
                move |engine: &Rc<B::Engine>| {
                    log::info!("creating scene");
                    let scene = backend
                        .create_scene(engine)
                        .context("could not create the scene")?;
                    Ok(Rc::new(scene))
                },
                fatal.reporter(),
            )
        };

        bind_resize(host.window, &engine, fatal.reporter());
        let render_loop = RenderLoop::bind(&join(&engine, &scene));
        let context = SceneContext::bind(
            backend,
            host.editor,
            &join(&scene, &surface),
            config.clone(),
            fatal.reporter(),
        );
        let modules: Rc<dyn ModuleLoader> = Rc::new(Memoized::new(host.overlay_modules));
        let overlay = OverlayToggle::bind(&scene, modules, host.executor, config.overlay);

        Self {
            surface,
            engine,
            scene,
            context,
            render_loop,
            overlay,
            fatal,
        }
    }

    /// Hand the drawing surface to the pipeline.
    ///
    /// Called once from the host's mount callback. Everything that only needs
    /// the surface is created before this returns.
    pub fn mount(&self, surface: B::Surface) -> anyhow::Result<()> {
        if self.surface.is_ready() {
            anyhow::bail!("a drawing surface was already mounted for this session");
        }
        log::info!("drawing surface mounted");
        self.surface.emit(surface);
        match self.fatal.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    pub fn toggle_overlay(&self) {
        self.overlay.trigger();
    }

    pub fn overlay_state(&self) -> OverlayState {
        self.overlay.state()
    }

    pub fn overlay(&self) -> &OverlayToggle<B::Scene> {
        &self.overlay
    }

    pub fn engine(&self) -> Option<Rc<B::Engine>> {
        self.engine.latest()
    }

    pub fn scene(&self) -> Option<Rc<B::Scene>> {
        self.scene.latest()
    }

    pub fn context(&self) -> Option<Rc<SceneContext<B>>> {
        self.context.latest()
    }

    /// Engine stream, for late subscribers.
    pub fn engines(&self) -> Cached<Rc<B::Engine>> {
        self.engine.cached()
    }

    /// Scene stream, for late subscribers.
    pub fn scenes(&self) -> Cached<Rc<B::Scene>> {
        self.scene.cached()
    }

    /// Stream of the camera/light/material bundle, for late subscribers.
    pub fn contexts(&self) -> Cached<Rc<SceneContext<B>>> {
        self.context.cached()
    }

    pub fn render_loop(&self) -> &RenderLoop {
        &self.render_loop
    }
}

impl<B: Backend> Debug for Flow<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Flow")
            .field("mounted", &self.surface.is_ready())
            .field("engine", &self.engine.is_ready())
            .field("scene", &self.scene.is_ready())
            .field("context", &self.context.is_ready())
            .field("render_loop", &self.render_loop)
            .field("overlay", &self.overlay)
            .finish()
    }
}

/// Install the platform logger: `env_logger` natively, the browser console on wasm.
///
/// Safe to call more than once; later calls only report that a logger exists.
pub fn init_logging() {
    #[cfg(not(target_arch = "wasm32"))]
    {
        if let Err(e) = env_logger::try_init() {
            println!("Warning: Could not initialize logger: {}", e);
        };
    }

    #[cfg(target_arch = "wasm32")]
    {
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            log::warn!("Could not initialize logger: {}", e);
        }
    }
}
