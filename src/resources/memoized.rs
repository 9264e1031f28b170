use std::{cell::RefCell, rc::Rc};

use futures::{
    FutureExt,
    future::{LocalBoxFuture, Shared},
};

use crate::resources::ModuleLoader;

type SharedLoad = Shared<LocalBoxFuture<'static, Result<(), Rc<anyhow::Error>>>>;

/// Loads the wrapped module at most once successfully.
///
/// Callers that ask while a load is in flight share it. A completed success
/// is reused forever; a failure is forgotten, so the next caller starts a
/// fresh attempt.
pub struct Memoized<L> {
    inner: L,
    load: RefCell<Option<SharedLoad>>,
}

impl<L: ModuleLoader> Memoized<L> {
    pub fn new(inner: L) -> Self {
        Self {
            inner,
            load: RefCell::new(None),
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(
            self.load.borrow().as_ref().and_then(|load| load.peek()),
            Some(Ok(()))
        )
    }

    fn current(&self) -> SharedLoad {
        let mut slot = self.load.borrow_mut();
        if let Some(load) = slot.as_ref() {
            if !matches!(load.peek(), Some(Err(_))) {
                return load.clone();
            }
            log::debug!("retrying module {} after a failed load", self.inner.name());
        }
        let load = self.inner.load().map(|result| result.map_err(Rc::new));
        let load = load.boxed_local().shared();
        *slot = Some(load.clone());
        load
    }
}

impl<L: ModuleLoader> ModuleLoader for Memoized<L> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn load(&self) -> LocalBoxFuture<'static, anyhow::Result<()>> {
        let load = self.current();
        Box::pin(async move { load.await.map_err(|e| anyhow::anyhow!("{e:#}")) })
    }
}
