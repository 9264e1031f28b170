//! Where asynchronous pipeline work runs.
//!
//! Everything runs on the UI thread, so tasks are neither `Send` nor awaited
//! by the code that spawns them.

use futures::{future::LocalBoxFuture, task::LocalSpawn};

pub trait LocalExecutor {
    /// Run `task` to completion in the background on the current thread.
    fn spawn(&self, task: LocalBoxFuture<'static, ()>);
}

impl LocalExecutor for futures::executor::LocalSpawner {
    fn spawn(&self, task: LocalBoxFuture<'static, ()>) {
        if let Err(e) = self.spawn_local_obj(task.into()) {
            log::error!("Could not spawn a pipeline task: {}", e);
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl LocalExecutor for tokio::task::LocalSet {
    fn spawn(&self, task: LocalBoxFuture<'static, ()>) {
        // Detached, the handle is not needed.
        drop(self.spawn_local(task));
    }
}
