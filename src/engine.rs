//! Capabilities the pipeline needs from a 3D engine runtime.
//!
//! The pipeline never draws anything itself. It only creates engine objects
//! through a [`Backend`] and calls the handful of operations below on them.
//! Implementations are expected to be cheap handles around the real runtime;
//! methods take `&self` where the object is shared between subscribers.

use std::rc::Rc;

use cgmath::{Point3, Vector3};

use crate::{config::OverlayOptions, material::MaterialOptions};

/// Rendering driver bound to one drawing surface.
pub trait Engine: 'static {
    /// Re-fit the drawing buffer to the current size of the surface.
    fn resize(&self);

    /// Start the continuous loop. `frame` is invoked on every animation tick
    /// scheduled by the engine, never synchronously from this call.
    fn run_render_loop(&self, frame: Box<dyn FnMut()>);
}

/// Container of renderable resources bound to one engine.
pub trait Scene: 'static {
    type DebugLayer: DebugLayer;

    fn render(&self) -> anyhow::Result<()>;

    fn debug_layer(&self) -> &Self::DebugLayer;
}

/// The inspection overlay attached to a scene.
pub trait DebugLayer {
    fn is_visible(&self) -> bool;

    fn show(&self, options: &OverlayOptions) -> anyhow::Result<()>;

    fn hide(&self);
}

pub trait Camera<S> {
    fn set_target(&mut self, target: Point3<f32>);

    /// Route input from `surface` to this camera.
    fn attach_control(&mut self, surface: &S, no_prevent_default: bool);
}

pub trait Light {
    fn set_intensity(&mut self, intensity: f32);
}

/// Factory for every engine object the pipeline creates.
///
/// Construction errors are treated as fatal by the pipeline: nothing that
/// depends on the failed object is ever created.
pub trait Backend: 'static {
    /// Handle to the drawing target provided by the host UI.
    type Surface: Clone + 'static;
    type Engine: Engine;
    type Scene: Scene;
    type Camera: Camera<Self::Surface> + 'static;
    type Light: Light + 'static;
    type Material: 'static;

    fn create_engine(&self, surface: &Self::Surface) -> anyhow::Result<Self::Engine>;

    fn create_scene(&self, engine: &Rc<Self::Engine>) -> anyhow::Result<Self::Scene>;

    fn create_camera(
        &self,
        name: &str,
        position: Vector3<f32>,
        scene: &Self::Scene,
    ) -> anyhow::Result<Self::Camera>;

    fn create_light(
        &self,
        name: &str,
        direction: Vector3<f32>,
        scene: &Self::Scene,
    ) -> anyhow::Result<Self::Light>;

    fn create_material(
        &self,
        name: &str,
        scene: &Self::Scene,
        options: &MaterialOptions,
    ) -> anyhow::Result<Self::Material>;
}
