//! surface-flow
//!
//! A small reactive pipeline that turns a drawing surface handed over by a UI
//! into a running engine, scene and render loop, builds the scene's camera,
//! light and node material exactly once, keeps the engine fitted to the window
//! and toggles an inspection overlay whose code is loaded on first use. The
//! engine runtime itself stays behind capability traits so the same pipeline
//! runs natively and on the web.
//!
//! High-level modules
//! - `config`: defaults for camera, light, material and overlay
//! - `context`: the camera/light/material bundle built once per scene
//! - `engine`: capability traits the engine runtime has to provide
//! - `executor`: where background tasks (module loads) run
//! - `flow`: the pipeline object and logger setup
//! - `material`: node material wrapper with a pluggable editor
//! - `overlay`: the inspection overlay's toggle state machine
//! - `render`: the session's single render loop
//! - `resources`: lazily loaded modules, memoised and grouped
//! - `stream`: push streams, replay and join operators
//! - `window`: host window signals (resize)
//! - `web`: browser bindings (wasm only)
//!

pub mod config;
pub mod context;
pub mod engine;
pub mod executor;
pub mod flow;
pub mod material;
pub mod overlay;
pub mod render;
pub mod resources;
pub mod stream;
#[cfg(target_arch = "wasm32")]
pub mod web;
pub mod window;

// Re-exports commonly used types for convenience in downstream code.
pub use cgmath::{Point3, Vector3};
pub use flow::{Flow, Host, init_logging};
