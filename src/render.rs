//! The continuous render loop.
//!
//! The loop is started by the engine once an engine and a scene both exist.
//! Every tick renders the scene; a frame that fails to render is logged and
//! the loop keeps going, the same way a lost surface would simply be retried
//! on the next tick.
//!
//! # Key types
//!
//! - [`RenderLoop`] observes the loop: whether it runs and how many frames it drew

use std::{cell::Cell, fmt::Debug, rc::Rc};

use crate::{
    engine::{Engine, Scene},
    stream::{Replay, Source},
};

/// Handle to the session's single render loop.
pub struct RenderLoop {
    running: Cell<bool>,
    frames: Rc<Cell<u64>>,
    failed_frames: Rc<Cell<u64>>,
}

impl RenderLoop {
    /// Start the loop for the first (engine, scene) pair of `pairs`.
    ///
    /// Later pairs are ignored, there is exactly one loop per session.
    pub(crate) fn bind<E, S>(pairs: &Replay<(Rc<E>, Rc<S>)>) -> Rc<Self>
    where
        E: Engine,
        S: Scene,
    {
        let render_loop = Rc::new(Self {
            running: Cell::new(false),
            frames: Rc::new(Cell::new(0)),
            failed_frames: Rc::new(Cell::new(0)),
        });
        let handle = render_loop.clone();
        pairs.subscribe(move |(engine, scene): &(Rc<E>, Rc<S>)| {
            if handle.running.replace(true) {
                log::warn!("render loop already running, ignoring another (engine, scene) pair");
                return;
            }
            log::info!("starting render loop");
            let scene = scene.clone();
            let frames = handle.frames.clone();
            let failed_frames = handle.failed_frames.clone();
            engine.run_render_loop(Box::new(move || {
                frames.set(frames.get() + 1);
                if let Err(e) = scene.render() {
                    failed_frames.set(failed_frames.get() + 1);
                    log::error!("Unable to render {}", e);
                }
            }));
        });
        render_loop
    }

    pub fn is_running(&self) -> bool {
        self.running.get()
    }

    /// Number of ticks the engine has driven so far, failed ones included.
    pub fn frames(&self) -> u64 {
        self.frames.get()
    }

    pub fn failed_frames(&self) -> u64 {
        self.failed_frames.get()
    }
}

impl Debug for RenderLoop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderLoop")
            .field("running", &self.running.get())
            .field("frames", &self.frames.get())
            .finish()
    }
}
