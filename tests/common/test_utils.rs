use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};

use anyhow::anyhow;
use futures::{
    channel::oneshot,
    executor::LocalPool,
    future::{self, LocalBoxFuture},
};
use surface_flow::{
    Flow, Host, Point3, Vector3,
    config::{FlowConfig, OverlayOptions},
    engine::{Backend, Camera, DebugLayer, Engine, Light, Scene},
    material::{EditorOptions, MaterialOptions, NodeEditor},
    resources::{ModuleLoader, ModuleSet},
    window::HostWindow,
};

/// Call counts shared by every mock created for one test.
#[derive(Debug, Default)]
pub(crate) struct Counters {
    pub engines: Cell<u32>,
    pub scenes: Cell<u32>,
    pub cameras: Cell<u32>,
    pub lights: Cell<u32>,
    pub materials: Cell<u32>,
    pub resizes: Cell<u32>,
    pub render_loops: Cell<u32>,
    pub renders: Cell<u32>,
    pub module_loads: Cell<u32>,
    /// Construction order of engine objects.
    pub created: RefCell<Vec<&'static str>>,
}

impl Counters {
    fn bump(cell: &Cell<u32>) {
        cell.set(cell.get() + 1);
    }

    fn record(&self, what: &'static str) {
        self.created.borrow_mut().push(what);
    }
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Canvas(pub &'static str);

pub(crate) struct MockEngine {
    counters: Rc<Counters>,
    pub surface: Canvas,
    frame: RefCell<Option<Box<dyn FnMut()>>>,
}

impl MockEngine {
    /// Simulate one animation frame.
    pub fn tick(&self) {
        let frame = self.frame.borrow_mut().take();
        if let Some(mut frame) = frame {
            frame();
            *self.frame.borrow_mut() = Some(frame);
        }
    }

    pub fn has_render_loop(&self) -> bool {
        self.frame.borrow().is_some()
    }
}

impl Engine for MockEngine {
    fn resize(&self) {
        Counters::bump(&self.counters.resizes);
    }

    fn run_render_loop(&self, frame: Box<dyn FnMut()>) {
        Counters::bump(&self.counters.render_loops);
        *self.frame.borrow_mut() = Some(frame);
    }
}

#[derive(Default)]
pub(crate) struct MockLayer {
    visible: Cell<bool>,
    pub shows: Cell<u32>,
    pub hides: Cell<u32>,
    pub last_options: RefCell<Option<OverlayOptions>>,
}

impl DebugLayer for MockLayer {
    fn is_visible(&self) -> bool {
        self.visible.get()
    }

    fn show(&self, options: &OverlayOptions) -> anyhow::Result<()> {
        Counters::bump(&self.shows);
        *self.last_options.borrow_mut() = Some(options.clone());
        self.visible.set(true);
        Ok(())
    }

    fn hide(&self) {
        Counters::bump(&self.hides);
        self.visible.set(false);
    }
}

pub(crate) struct MockScene {
    counters: Rc<Counters>,
    pub engine: Rc<MockEngine>,
    pub layer: MockLayer,
    pub fail_render: Cell<bool>,
}

impl Scene for MockScene {
    type DebugLayer = MockLayer;

    fn render(&self) -> anyhow::Result<()> {
        Counters::bump(&self.counters.renders);
        if self.fail_render.get() {
            anyhow::bail!("no camera defined");
        }
        Ok(())
    }

    fn debug_layer(&self) -> &MockLayer {
        &self.layer
    }
}

#[derive(Debug)]
pub(crate) struct MockCamera {
    pub name: String,
    pub position: Vector3<f32>,
    pub target: Option<Point3<f32>>,
    pub attached: Option<(Canvas, bool)>,
}

impl Camera<Canvas> for MockCamera {
    fn set_target(&mut self, target: Point3<f32>) {
        self.target = Some(target);
    }

    fn attach_control(&mut self, surface: &Canvas, no_prevent_default: bool) {
        self.attached = Some((surface.clone(), no_prevent_default));
    }
}

#[derive(Debug)]
pub(crate) struct MockLight {
    pub name: String,
    pub direction: Vector3<f32>,
    pub intensity: f32,
}

impl Light for MockLight {
    fn set_intensity(&mut self, intensity: f32) {
        self.intensity = intensity;
    }
}

#[derive(Debug)]
pub(crate) struct MockMaterial {
    pub name: String,
    pub options: MaterialOptions,
}

#[derive(Default)]
pub(crate) struct MockBackend {
    counters: Rc<Counters>,
    pub fail_engine: bool,
    pub fail_scene: bool,
    pub fail_light: bool,
}

impl Backend for MockBackend {
    type Surface = Canvas;
    type Engine = MockEngine;
    type Scene = MockScene;
    type Camera = MockCamera;
    type Light = MockLight;
    type Material = MockMaterial;

    fn create_engine(&self, surface: &Canvas) -> anyhow::Result<MockEngine> {
        if self.fail_engine {
            anyhow::bail!("WebGL not supported");
        }
        Counters::bump(&self.counters.engines);
        self.counters.record("engine");
        Ok(MockEngine {
            counters: self.counters.clone(),
            surface: surface.clone(),
            frame: RefCell::new(None),
        })
    }

    fn create_scene(&self, engine: &Rc<MockEngine>) -> anyhow::Result<MockScene> {
        if self.fail_scene {
            anyhow::bail!("engine lost its context");
        }
        Counters::bump(&self.counters.scenes);
        self.counters.record("scene");
        Ok(MockScene {
            counters: self.counters.clone(),
            engine: engine.clone(),
            layer: MockLayer::default(),
            fail_render: Cell::new(false),
        })
    }

    fn create_camera(
        &self,
        name: &str,
        position: Vector3<f32>,
        _: &MockScene,
    ) -> anyhow::Result<MockCamera> {
        Counters::bump(&self.counters.cameras);
        self.counters.record("camera");
        Ok(MockCamera {
            name: name.to_string(),
            position,
            target: None,
            attached: None,
        })
    }

    fn create_light(
        &self,
        name: &str,
        direction: Vector3<f32>,
        _: &MockScene,
    ) -> anyhow::Result<MockLight> {
        if self.fail_light {
            anyhow::bail!("too many lights");
        }
        Counters::bump(&self.counters.lights);
        self.counters.record("light");
        Ok(MockLight {
            name: name.to_string(),
            direction,
            intensity: 1.0,
        })
    }

    fn create_material(
        &self,
        name: &str,
        _: &MockScene,
        options: &MaterialOptions,
    ) -> anyhow::Result<MockMaterial> {
        Counters::bump(&self.counters.materials);
        self.counters.record("material");
        Ok(MockMaterial {
            name: name.to_string(),
            options: *options,
        })
    }
}

#[derive(Default)]
pub(crate) struct MockWindow {
    listeners: RefCell<Vec<Box<dyn Fn()>>>,
}

impl MockWindow {
    pub fn resize(&self) {
        for listener in self.listeners.borrow().iter() {
            listener();
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }
}

impl HostWindow for MockWindow {
    fn on_resize(&self, listener: Box<dyn Fn()>) -> anyhow::Result<()> {
        self.listeners.borrow_mut().push(listener);
        Ok(())
    }
}

#[derive(Default)]
pub(crate) struct MockEditor {
    pub opened: RefCell<Vec<String>>,
    pub fail: Cell<bool>,
}

impl NodeEditor<MockMaterial> for MockEditor {
    fn show(&self, material: &Rc<MockMaterial>, _: &EditorOptions) -> anyhow::Result<()> {
        if self.fail.get() {
            anyhow::bail!("editor bundle missing");
        }
        self.opened.borrow_mut().push(material.name.clone());
        Ok(())
    }
}

/// Module whose load resolves right away, successfully unless `fail` is set.
pub(crate) struct MockModule {
    name: &'static str,
    counters: Rc<Counters>,
    fail: Rc<Cell<bool>>,
}

impl MockModule {
    pub fn new(name: &'static str, counters: Rc<Counters>, fail: Rc<Cell<bool>>) -> Self {
        Self {
            name,
            counters,
            fail,
        }
    }
}

impl ModuleLoader for MockModule {
    fn name(&self) -> &str {
        self.name
    }

    fn load(&self) -> LocalBoxFuture<'static, anyhow::Result<()>> {
        Counters::bump(&self.counters.module_loads);
        let result = if self.fail.get() {
            Err(anyhow!("network unreachable"))
        } else {
            Ok(())
        };
        Box::pin(future::ready(result))
    }
}

/// Module whose load only resolves once the paired sender fires.
pub(crate) struct GatedModule {
    gate: RefCell<Option<oneshot::Receiver<()>>>,
    pub loads: Rc<Cell<u32>>,
}

impl GatedModule {
    pub fn new() -> (Self, oneshot::Sender<()>) {
        let (tx, rx) = oneshot::channel();
        let module = Self {
            gate: RefCell::new(Some(rx)),
            loads: Rc::new(Cell::new(0)),
        };
        (module, tx)
    }
}

impl ModuleLoader for GatedModule {
    fn name(&self) -> &str {
        "gated"
    }

    fn load(&self) -> LocalBoxFuture<'static, anyhow::Result<()>> {
        Counters::bump(&self.loads);
        let gate = self.gate.borrow_mut().take();
        Box::pin(async move {
            match gate {
                Some(gate) => gate.await.map_err(|_| anyhow!("gate dropped")),
                None => Err(anyhow!("gate already used")),
            }
        })
    }
}

/// A flow wired to mocks, plus handles to inspect them.
pub(crate) struct Harness {
    pub flow: Flow<MockBackend>,
    pub pool: LocalPool,
    pub counters: Rc<Counters>,
    pub window: Rc<MockWindow>,
    pub editor: Rc<MockEditor>,
    /// Makes every overlay module load fail while set.
    pub module_fail: Rc<Cell<bool>>,
}

impl Harness {
    pub fn new() -> Self {
        Self::build(|_| (), None, FlowConfig::default())
    }

    pub fn with_backend(configure: impl FnOnce(&mut MockBackend)) -> Self {
        Self::build(configure, None, FlowConfig::default())
    }

    pub fn with_modules(modules: Box<dyn ModuleLoader>) -> Self {
        Self::build(|_| (), Some(modules), FlowConfig::default())
    }

    pub fn with_config(config: FlowConfig) -> Self {
        Self::build(|_| (), None, config)
    }

    fn build(
        configure: impl FnOnce(&mut MockBackend),
        modules: Option<Box<dyn ModuleLoader>>,
        config: FlowConfig,
    ) -> Self {
        let _ = env_logger::builder().is_test(true).try_init();

        let counters = Rc::new(Counters::default());
        let mut backend = MockBackend {
            counters: counters.clone(),
            ..Default::default()
        };
        configure(&mut backend);

        let module_fail = Rc::new(Cell::new(false));
        let modules: Box<dyn ModuleLoader> = match modules {
            Some(modules) => modules,
            None => Box::new(
                ModuleSet::new("inspector")
                    .with(Rc::new(MockModule::new(
                        "debug layer",
                        counters.clone(),
                        module_fail.clone(),
                    )))
                    .with(Rc::new(MockModule::new(
                        "inspector",
                        counters.clone(),
                        module_fail.clone(),
                    ))),
            ),
        };

        let pool = LocalPool::new();
        let window = Rc::new(MockWindow::default());
        let editor = Rc::new(MockEditor::default());
        let flow = Flow::new(
            Host {
                backend,
                window: window.clone(),
                editor: editor.clone(),
                overlay_modules: modules,
                executor: Rc::new(pool.spawner()),
            },
            config,
        );

        Self {
            flow,
            pool,
            counters,
            window,
            editor,
            module_fail,
        }
    }

    /// Run background tasks until none can make progress.
    pub fn settle(&mut self) {
        self.pool.run_until_stalled();
    }

    pub fn mount(&self) {
        self.flow
            .mount(Canvas("renderCanvas"))
            .expect("mounting the canvas should succeed");
    }

    pub fn engine(&self) -> Rc<MockEngine> {
        self.flow.engine().expect("engine should exist after mount")
    }

    pub fn scene(&self) -> Rc<MockScene> {
        self.flow.scene().expect("scene should exist after mount")
    }

    /// Press the overlay button and let the load finish.
    pub fn toggle(&mut self) {
        self.flow.toggle_overlay();
        self.settle();
    }
}
