//! Push-based streams used to wire the resource pipeline together.
//!
//! Everything here is single-threaded (`Rc`/`RefCell`) and synchronous: a value
//! pushed into a stream reaches every subscriber before `next`/`emit` returns.
//! No borrow is held while subscribers run, so a subscriber may subscribe to or
//! push into other streams.
//!
//! - `subject` is a plain multicast stream without memory (user events)
//! - `replay` caches the latest value and replays it to late subscribers,
//!   and hosts the derive-once operator used for the engine and the scene;
//!   `Cached` is its read-only side
//! - `join` combines the latest values of several sources

pub mod join;
pub mod replay;
pub mod subject;

use std::rc::Rc;

pub use join::{join, with_latest_from};
pub use replay::{Cached, Replay};
pub use subject::Subject;

pub(crate) type Subscriber<T> = Rc<dyn Fn(&T)>;

/// Anything that can push values of type `T` to subscribers.
pub trait Source<T> {
    /// Register `subscriber`. It stays registered for the lifetime of the stream.
    fn subscribe<F>(&self, subscriber: F)
    where
        F: Fn(&T) + 'static;
}
