//! Defaults for the resources built once the scene and the surface exist.
//!
//! [`FlowConfig::default`] reproduces the stock setup: a camera looking at the
//! origin from slightly above and behind, a soft light from above, a node
//! material that emits diagnostic comments and an inspector shown as an
//! overlay that follows window resizes.

use cgmath::{Point3, Vector3};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct FlowConfig {
    pub camera: CameraConfig,
    pub light: LightConfig,
    pub material: MaterialConfig,
    pub overlay: OverlayOptions,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CameraConfig {
    pub name: String,
    pub position: Vector3<f32>,
    pub target: Point3<f32>,
    /// Passed to `attach_control`; `true` keeps the browser's default handling
    /// of input events on the surface.
    pub no_prevent_default: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LightConfig {
    pub name: String,
    pub direction: Vector3<f32>,
    pub intensity: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MaterialConfig {
    pub name: String,
    pub emit_comments: bool,
}

/// Options handed to the scene's debug layer when the overlay is shown.
#[derive(Clone, Debug, PartialEq)]
pub struct OverlayOptions {
    /// Re-fit the overlay whenever the host resizes.
    pub handle_resize: bool,
    /// Draw on top of the surface instead of next to it.
    pub overlay: bool,
    /// Id of the host element the overlay attaches to. `None` lets the
    /// debug layer pick its own root next to the surface.
    pub global_root: Option<String>,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            name: "camera1".to_string(),
            // right/left, height, forward/backward
            position: Vector3::new(0.0, 5.0, -10.0),
            target: Point3::new(0.0, 0.0, 0.0),
            no_prevent_default: true,
        }
    }
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            name: "light".to_string(),
            direction: Vector3::new(0.0, 1.0, 0.0),
            intensity: 0.7,
        }
    }
}

impl Default for MaterialConfig {
    fn default() -> Self {
        Self {
            name: "node material".to_string(),
            emit_comments: true,
        }
    }
}

impl Default for OverlayOptions {
    fn default() -> Self {
        Self {
            handle_resize: true,
            overlay: true,
            global_root: None,
        }
    }
}
