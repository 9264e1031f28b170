//! Lazily loaded code modules.
//!
//! The inspection overlay depends on modules that are only fetched the first
//! time the user asks for it. A [`ModuleLoader`] starts such a fetch; loaders
//! compose into a [`ModuleSet`] (all must succeed) and can be wrapped in
//! [`Memoized`] so a successful load is not repeated.

use std::{fmt::Debug, rc::Rc};

use anyhow::Context;
use futures::future::LocalBoxFuture;

pub mod memoized;

pub use memoized::Memoized;

pub trait ModuleLoader {
    /// Human readable name, used in log messages and errors.
    fn name(&self) -> &str;

    /// Start loading. The returned future resolves once the module is usable.
    fn load(&self) -> LocalBoxFuture<'static, anyhow::Result<()>>;
}

impl Debug for dyn ModuleLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ModuleLoader").field(&self.name()).finish()
    }
}

impl<L: ModuleLoader + ?Sized> ModuleLoader for Box<L> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn load(&self) -> LocalBoxFuture<'static, anyhow::Result<()>> {
        (**self).load()
    }
}

/// Several modules loaded concurrently; succeeds only if every one does.
#[derive(Debug, Default)]
pub struct ModuleSet {
    name: String,
    modules: Vec<Rc<dyn ModuleLoader>>,
}

impl ModuleSet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            modules: Vec::new(),
        }
    }

    pub fn with(mut self, module: Rc<dyn ModuleLoader>) -> Self {
        self.modules.push(module);
        self
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

impl ModuleLoader for ModuleSet {
    fn name(&self) -> &str {
        &self.name
    }

    fn load(&self) -> LocalBoxFuture<'static, anyhow::Result<()>> {
        // Every fetch starts now, not when the returned future is first polled.
        let loads: Vec<_> = self
            .modules
            .iter()
            .map(|module| {
                let name = module.name().to_string();
                let load = module.load();
                async move { load.await.with_context(|| format!("failed to load module {name}")) }
            })
            .collect();
        Box::pin(async move {
            futures::future::try_join_all(loads).await?;
            Ok(())
        })
    }
}
