//! On-demand inspection overlay.
//!
//! Each trigger is paired with the latest scene. The overlay's modules are
//! then loaded (memoised, so only the first successful load does real work)
//! and, once they are available, the overlay's visibility is flipped:
//!
//! ```text
//!            trigger                 load ok, was hidden
//!   Hidden ───────────▶ Loading ─────────────────────────▶ Visible
//!     ▲                    │                                  │
//!     │   load failed      │            trigger, load ok      │
//!     └────────────────────┘◀─────────────────────────────────┘
//! ```
//!
//! Triggers fired before any scene exists are dropped. A failed load leaves
//! the visibility untouched and is retried by the next trigger.

use std::{cell::Cell, fmt::Debug, rc::Rc};

use instant::Instant;

use crate::{
    config::OverlayOptions,
    engine::{DebugLayer, Scene},
    executor::LocalExecutor,
    resources::ModuleLoader,
    stream::{Replay, Source, Subject, with_latest_from},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OverlayState {
    Hidden,
    Loading,
    Visible,
}

pub struct OverlayToggle<S: Scene> {
    triggers: Subject<()>,
    scenes: Replay<Rc<S>>,
    in_flight: Rc<Cell<usize>>,
    attempts: Rc<Cell<u64>>,
}

impl<S: Scene> OverlayToggle<S> {
    pub(crate) fn bind(
        scenes: &Replay<Rc<S>>,
        modules: Rc<dyn ModuleLoader>,
        executor: Rc<dyn LocalExecutor>,
        options: OverlayOptions,
    ) -> Self {
        let triggers = Subject::new();
        let in_flight = Rc::new(Cell::new(0));
        let attempts = Rc::new(Cell::new(0));

        let pending = in_flight.clone();
        let started = attempts.clone();
        with_latest_from(&triggers, scenes).subscribe(move |((), scene): &((), Rc<S>)| {
            started.set(started.get() + 1);
            pending.set(pending.get() + 1);
            let load = modules.load();
            let name = modules.name().to_string();
            let scene = scene.clone();
            let options = options.clone();
            let pending = pending.clone();
            let requested = Instant::now();
            executor.spawn(Box::pin(async move {
                match load.await {
                    Ok(()) => {
                        log::debug!("{} ready after {:?}", name, requested.elapsed());
                        if let Err(e) = show_hide(scene.as_ref(), &options) {
                            log::warn!("could not show the overlay: {:#}", e);
                        }
                    }
                    Err(e) => log::warn!("could not load {}: {:#}", name, e),
                }
                pending.set(pending.get() - 1);
            }));
        });

        Self {
            triggers,
            scenes: scenes.clone(),
            in_flight,
            attempts,
        }
    }

    /// Request a visibility flip. Inert until a scene exists.
    pub fn trigger(&self) {
        self.triggers.next(());
    }

    pub fn state(&self) -> OverlayState {
        if self.in_flight.get() > 0 {
            return OverlayState::Loading;
        }
        match self.scenes.latest() {
            Some(scene) if scene.debug_layer().is_visible() => OverlayState::Visible,
            _ => OverlayState::Hidden,
        }
    }

    /// Number of triggers that reached a scene and started a load.
    pub fn attempts(&self) -> u64 {
        self.attempts.get()
    }
}

fn show_hide<S: Scene>(scene: &S, options: &OverlayOptions) -> anyhow::Result<()> {
    let layer = scene.debug_layer();
    if layer.is_visible() {
        log::info!("hiding overlay");
        layer.hide();
        Ok(())
    } else {
        log::info!("showing overlay");
        layer.show(options)
    }
}

impl<S: Scene> Debug for OverlayToggle<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OverlayToggle")
            .field("state", &self.state())
            .field("attempts", &self.attempts.get())
            .finish()
    }
}
