//! Replaying streams and the derive-once operator.

use std::{
    cell::{Cell, RefCell},
    fmt::Debug,
    rc::Rc,
};

use crate::stream::{Source, Subscriber};

struct Inner<T> {
    latest: Option<T>,
    subscribers: Vec<Subscriber<T>>,
}

/// Stream that remembers its latest value.
///
/// A subscriber that attaches after a value was emitted receives that value
/// immediately, before any later one. Clones share state.
pub struct Replay<T> {
    inner: Rc<RefCell<Inner<T>>>,
}

impl<T: Clone + 'static> Replay<T> {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                latest: None,
                subscribers: Vec::new(),
            })),
        }
    }

    /// Derive a stream whose value is computed from the first value of `source`.
    ///
    /// `derivation` runs at most once, never per subscriber; later source
    /// values are ignored. The result is cached and replayed. If `derivation`
    /// fails nothing is emitted and the error is handed to `on_error`. A source
    /// that never emits yields a stream that never emits.
    pub fn derive<S, Src, F, E>(source: &Src, derivation: F, on_error: E) -> Self
    where
        S: 'static,
        Src: Source<S>,
        F: Fn(&S) -> anyhow::Result<T> + 'static,
        E: Fn(anyhow::Error) + 'static,
    {
        let derived = Self::new();
        let target = derived.clone();
        let derived_once = Cell::new(false);
        source.subscribe(move |value| {
            if derived_once.replace(true) {
                log::debug!("source emitted again, keeping the first derived value");
                return;
            }
            match derivation(value) {
                Ok(value) => target.emit(value),
                Err(e) => on_error(e),
            }
        });
        derived
    }

    /// Store `value` as the latest one and push it to every subscriber.
    pub fn emit(&self, value: T) {
        let subscribers = {
            let mut inner = self.inner.borrow_mut();
            inner.latest = Some(value.clone());
            inner.subscribers.clone()
        };
        for subscriber in subscribers {
            subscriber(&value);
        }
    }

    pub fn latest(&self) -> Option<T> {
        self.inner.borrow().latest.clone()
    }

    pub fn is_ready(&self) -> bool {
        self.inner.borrow().latest.is_some()
    }

    /// Read-only handle sharing this stream's state.
    pub fn cached(&self) -> Cached<T> {
        Cached(self.clone())
    }
}

impl<T: Clone + 'static> Source<T> for Replay<T> {
    fn subscribe<F>(&self, subscriber: F)
    where
        F: Fn(&T) + 'static,
    {
        let subscriber: Subscriber<T> = Rc::new(subscriber);
        let current = {
            let mut inner = self.inner.borrow_mut();
            inner.subscribers.push(subscriber.clone());
            inner.latest.clone()
        };
        if let Some(value) = current {
            subscriber(&value);
        }
    }
}

impl<T: Clone + 'static> Default for Replay<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for Replay<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T> Debug for Replay<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Replay")
            .field("ready", &inner.latest.is_some())
            .field("subscribers", &inner.subscribers.len())
            .finish()
    }
}

/// Subscribe-and-peek side of a [`Replay`].
///
/// Handed out to code that observes a cached resource but must not push a
/// replacement into it.
pub struct Cached<T>(Replay<T>);

impl<T: Clone + 'static> Cached<T> {
    pub fn latest(&self) -> Option<T> {
        self.0.latest()
    }

    pub fn is_ready(&self) -> bool {
        self.0.is_ready()
    }
}

impl<T: Clone + 'static> Source<T> for Cached<T> {
    fn subscribe<F>(&self, subscriber: F)
    where
        F: Fn(&T) + 'static,
    {
        self.0.subscribe(subscriber);
    }
}

impl<T> Clone for Cached<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T> Debug for Cached<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Cached").field(&self.0).finish()
    }
}
