//! Scroll signal dispatch
//!
//! The host forwards every scroll notification to a [`ScrollDispatcher`];
//! listeners subscribe explicitly and are removed when their
//! [`ScrollSubscription`] is dropped.

use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Handle to a registered scroll listener
    pub struct ListenerId;
}

/// Scroll listener callback, invoked with the absolute vertical offset
pub type ScrollListener = Box<dyn FnMut(f32) + Send>;

struct DispatcherInner {
    /// Taken out while the listener runs
    listeners: SlotMap<ListenerId, Option<ScrollListener>>,
    last_offset: Option<f32>,
}

/// Registry of scroll listeners
pub struct ScrollDispatcher {
    inner: Arc<Mutex<DispatcherInner>>,
}

impl ScrollDispatcher {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(DispatcherInner {
                listeners: SlotMap::with_key(),
                last_offset: None,
            })),
        }
    }

    /// Get a weak handle for subscribing
    pub fn handle(&self) -> ScrollHandle {
        ScrollHandle {
            inner: Arc::downgrade(&self.inner),
        }
    }

    /// Subscribe a listener; it stays registered while the subscription lives
    pub fn subscribe<F>(&self, listener: F) -> ScrollSubscription
    where
        F: FnMut(f32) + Send + 'static,
    {
        self.handle().subscribe(listener)
    }

    /// Deliver a scroll offset to every listener, in subscription order
    pub fn dispatch(&self, offset: f32) {
        let ids: Vec<ListenerId> = {
            let mut inner = self.inner.lock();
            inner.last_offset = Some(offset);
            inner.listeners.keys().collect()
        };

        for id in ids {
            let listener = {
                let mut inner = self.inner.lock();
                match inner.listeners.get_mut(id).and_then(Option::take) {
                    Some(listener) => listener,
                    None => continue,
                }
            };

            let mut listener = listener;
            listener(offset);

            // Put it back unless it unsubscribed while running
            if let Some(slot) = self.inner.lock().listeners.get_mut(id) {
                *slot = Some(listener);
            }
        }
    }

    /// Most recent dispatched offset
    pub fn last_offset(&self) -> Option<f32> {
        self.inner.lock().last_offset
    }

    pub fn listener_count(&self) -> usize {
        self.inner.lock().listeners.len()
    }
}

impl Default for ScrollDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

/// A weak handle to the scroll dispatcher
#[derive(Clone)]
pub struct ScrollHandle {
    inner: Weak<Mutex<DispatcherInner>>,
}

impl ScrollHandle {
    /// Subscribe a listener
    ///
    /// If the dispatcher is gone the subscription is inert.
    pub fn subscribe<F>(&self, listener: F) -> ScrollSubscription
    where
        F: FnMut(f32) + Send + 'static,
    {
        let id = self.inner.upgrade().map(|inner| {
            let boxed: ScrollListener = Box::new(listener);
            inner.lock().listeners.insert(Some(boxed))
        });
        ScrollSubscription {
            handle: self.clone(),
            id,
        }
    }

    fn remove(&self, id: ListenerId) -> bool {
        self.inner
            .upgrade()
            .map(|inner| inner.lock().listeners.remove(id).is_some())
            .unwrap_or(false)
    }

    pub fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }
}

/// Registration of one scroll listener
pub struct ScrollSubscription {
    handle: ScrollHandle,
    id: Option<ListenerId>,
}

impl ScrollSubscription {
    pub fn is_active(&self) -> bool {
        self.id.is_some() && self.handle.is_alive()
    }

    /// Unsubscribe; idempotent
    pub fn unsubscribe(&mut self) {
        if let Some(id) = self.id.take() {
            self.handle.remove(id);
        }
    }
}

impl Drop for ScrollSubscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch_reaches_listeners_in_order() {
        let dispatcher = ScrollDispatcher::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let seen_a = seen.clone();
        let _a = dispatcher.subscribe(move |offset| seen_a.lock().push(("a", offset)));
        let seen_b = seen.clone();
        let _b = dispatcher.subscribe(move |offset| seen_b.lock().push(("b", offset)));

        dispatcher.dispatch(42.0);
        assert_eq!(*seen.lock(), vec![("a", 42.0), ("b", 42.0)]);
        assert_eq!(dispatcher.last_offset(), Some(42.0));
    }

    #[test]
    fn test_drop_unsubscribes() {
        let dispatcher = ScrollDispatcher::new();
        let count = Arc::new(Mutex::new(0));

        let count_clone = count.clone();
        let subscription = dispatcher.subscribe(move |_| *count_clone.lock() += 1);
        dispatcher.dispatch(1.0);
        assert_eq!(dispatcher.listener_count(), 1);

        drop(subscription);
        dispatcher.dispatch(2.0);
        assert_eq!(*count.lock(), 1);
        assert_eq!(dispatcher.listener_count(), 0);
    }

    #[test]
    fn test_unsubscribe_is_idempotent() {
        let dispatcher = ScrollDispatcher::new();
        let mut subscription = dispatcher.subscribe(|_| {});
        assert!(subscription.is_active());

        subscription.unsubscribe();
        subscription.unsubscribe();
        assert!(!subscription.is_active());
        assert_eq!(dispatcher.listener_count(), 0);
    }

    #[test]
    fn test_no_replay_on_subscribe() {
        let dispatcher = ScrollDispatcher::new();
        dispatcher.dispatch(500.0);

        let count = Arc::new(Mutex::new(0));
        let count_clone = count.clone();
        let _subscription = dispatcher.subscribe(move |_| *count_clone.lock() += 1);
        assert_eq!(*count.lock(), 0);
    }
}
