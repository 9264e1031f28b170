//! Host window signals.

use std::{cell::Cell, rc::Rc};

use crate::{
    engine::Engine,
    stream::{Replay, Source},
};

/// The window that hosts the drawing surface.
pub trait HostWindow {
    /// Register `listener` for every resize of the window. Listeners are never
    /// removed.
    fn on_resize(&self, listener: Box<dyn Fn()>) -> anyhow::Result<()>;
}

/// Re-fit the engine whenever the host window resizes.
///
/// Registers one listener for the first engine only; the engine lives for the
/// whole session so the listener is never removed.
pub(crate) fn bind_resize<E, F>(window: Rc<dyn HostWindow>, engines: &Replay<Rc<E>>, on_error: F)
where
    E: Engine,
    F: Fn(anyhow::Error) + 'static,
{
    let bound = Cell::new(false);
    engines.subscribe(move |engine: &Rc<E>| {
        if bound.replace(true) {
            log::warn!("resize listener already bound, ignoring another engine");
            return;
        }
        let engine = engine.clone();
        if let Err(e) = window.on_resize(Box::new(move || engine.resize())) {
            on_error(e.context("could not listen for window resizes"));
        }
    });
}
