use std::{cell::RefCell, fmt::Debug, rc::Rc};

use crate::stream::{Source, Subscriber};

/// Multicast stream without memory.
///
/// Values are delivered to the subscribers registered at the time of `next`;
/// a subscriber added later never sees earlier values. Clones share the same
/// subscriber list.
pub struct Subject<T> {
    subscribers: Rc<RefCell<Vec<Subscriber<T>>>>,
}

impl<T: 'static> Subject<T> {
    pub fn new() -> Self {
        Self {
            subscribers: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn next(&self, value: T) {
        // Snapshot so subscribers can touch this subject while being notified.
        let subscribers = self.subscribers.borrow().clone();
        for subscriber in subscribers {
            subscriber(&value);
        }
    }
}

impl<T: 'static> Source<T> for Subject<T> {
    fn subscribe<F>(&self, subscriber: F)
    where
        F: Fn(&T) + 'static,
    {
        self.subscribers.borrow_mut().push(Rc::new(subscriber));
    }
}

impl<T: 'static> Default for Subject<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for Subject<T> {
    fn clone(&self) -> Self {
        Self {
            subscribers: self.subscribers.clone(),
        }
    }
}

impl<T> Debug for Subject<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subject")
            .field("subscribers", &self.subscribers.borrow().len())
            .finish()
    }
}
