use std::{cell::Cell, fmt::Debug, rc::Rc};

use anyhow::Context as _;

use crate::{
    config::FlowConfig,
    engine::{Backend, Camera, Light},
    material::{EditableMaterial, MaterialOptions, NodeEditor},
    stream::{Replay, Source},
};

/// Resources built once the scene and the surface both exist.
pub struct SceneContext<B: Backend> {
    pub camera: B::Camera,
    pub light: B::Light,
    pub material: EditableMaterial<B::Material>,
}

impl<B: Backend> SceneContext<B> {
    /// Build camera, light and material, in that order.
    pub fn new(
        backend: &B,
        scene: &B::Scene,
        surface: &B::Surface,
        editor: Rc<dyn NodeEditor<B::Material>>,
        config: &FlowConfig,
    ) -> anyhow::Result<Self> {
        let mut camera = backend
            .create_camera(&config.camera.name, config.camera.position, scene)
            .context("could not create the camera")?;
        camera.set_target(config.camera.target);
        camera.attach_control(surface, config.camera.no_prevent_default);

        let mut light = backend
            .create_light(&config.light.name, config.light.direction, scene)
            .context("could not create the light")?;
        light.set_intensity(config.light.intensity);

        let options = MaterialOptions {
            emit_comments: config.material.emit_comments,
        };
        let material = backend
            .create_material(&config.material.name, scene, &options)
            .context("could not create the node material")?;

        Ok(Self {
            camera,
            light,
            material: EditableMaterial::new(material, editor),
        })
    }

    /// Build the context for the first (scene, surface) pair of `pairs`.
    ///
    /// Runs at most once; construction errors go to `on_error` and leave the
    /// returned stream empty.
    pub(crate) fn bind<F>(
        backend: Rc<B>,
        editor: Rc<dyn NodeEditor<B::Material>>,
        pairs: &Replay<(Rc<B::Scene>, B::Surface)>,
        config: FlowConfig,
        on_error: F,
    ) -> Replay<Rc<Self>>
    where
        F: Fn(anyhow::Error) + 'static,
    {
        let contexts = Replay::new();
        let out = contexts.clone();
        let built = Cell::new(false);
        pairs.subscribe(move |(scene, surface): &(Rc<B::Scene>, B::Surface)| {
            if built.replace(true) {
                log::debug!("scene already set up, ignoring another (scene, surface) pair");
                return;
            }
            log::info!("setting up camera, light and material");
            match Self::new(&backend, scene, surface, editor.clone(), &config) {
                Ok(ctx) => out.emit(Rc::new(ctx)),
                Err(e) => on_error(e),
            }
        });
        contexts
    }
}

impl<B: Backend> Debug for SceneContext<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneContext")
            .field("material", &self.material)
            .finish_non_exhaustive()
    }
}
