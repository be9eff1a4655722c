//! Minimal publish/subscribe channel.
//!
//! # Design
//!
//! [`NotificationChannel<T>`] owns a registry mapping [`SubscriptionId`]s
//! to handlers, in shared `Rc<RefCell<..>>` storage. Cloning a channel
//! yields another handle to the same registry, so a handler can capture a
//! clone and unsubscribe itself.
//!
//! `publish` snapshots the registry before invoking anything: handlers run
//! synchronously on the calling thread, in subscription order, and may
//! subscribe or unsubscribe without invalidating the iteration. A handler
//! removed mid-publish still receives the current payload.
//!
//! # Failure Modes
//!
//! - **Handler panic**: not caught. The panic unwinds out of `publish` and
//!   later handlers for that payload are not called.
//! - **Subscriber leak**: handlers stay registered until `unsubscribe` is
//!   called with their id; nothing is removed automatically.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

type Handler<T> = Rc<dyn Fn(&T)>;

/// Token returned by [`NotificationChannel::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(u64);

struct Registry<T> {
    next_id: u64,
    /// Ids are allocated in increasing order, so key order is subscription order.
    handlers: BTreeMap<SubscriptionId, Handler<T>>,
}

/// A typed, synchronous notification channel.
pub struct NotificationChannel<T> {
    inner: Rc<RefCell<Registry<T>>>,
}

impl<T> Clone for NotificationChannel<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T> Default for NotificationChannel<T> {
    fn default() -> Self {
        Self {
            inner: Rc::new(RefCell::new(Registry {
                next_id: 0,
                handlers: BTreeMap::new(),
            })),
        }
    }
}

impl<T> fmt::Debug for NotificationChannel<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotificationChannel")
            .field("subscriber_count", &self.subscriber_count())
            .finish()
    }
}

impl<T> NotificationChannel<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler`. It stays registered until [`Self::unsubscribe`].
    pub fn subscribe(&self, handler: impl Fn(&T) + 'static) -> SubscriptionId {
        let mut registry = self.inner.borrow_mut();
        let id = SubscriptionId(registry.next_id);
        registry.next_id += 1;
        registry.handlers.insert(id, Rc::new(handler));
        id
    }

    /// Remove a handler. Returns `false` if `id` was not registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.inner.borrow_mut().handlers.remove(&id).is_some()
    }

    /// Invoke every currently registered handler once, in subscription order.
    pub fn publish(&self, payload: &T) {
        let snapshot: Vec<Handler<T>> = self.inner.borrow().handlers.values().cloned().collect();
        for handler in &snapshot {
            handler(payload);
        }
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().handlers.len()
    }

    /// Whether `other` is a handle to the same registry.
    #[must_use]
    pub fn same_channel(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn recorder() -> (Rc<RefCell<Vec<&'static str>>>, impl Fn(&'static str) -> Box<dyn Fn(&i32)>) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let log_for_make = Rc::clone(&log);
        let make = move |name: &'static str| -> Box<dyn Fn(&i32)> {
            let log = Rc::clone(&log_for_make);
            Box::new(move |_: &i32| log.borrow_mut().push(name))
        };
        (log, make)
    }

    #[test]
    fn publish_calls_each_handler_once_in_order() {
        let channel = NotificationChannel::new();
        let (log, make) = recorder();
        channel.subscribe(make("first"));
        channel.subscribe(make("second"));

        channel.publish(&7);
        assert_eq!(*log.borrow(), vec!["first", "second"]);
    }

    #[test]
    fn unsubscribed_handler_is_skipped() {
        let channel = NotificationChannel::new();
        let (log, make) = recorder();
        let first = channel.subscribe(make("first"));
        channel.subscribe(make("second"));

        assert!(channel.unsubscribe(first));
        assert!(!channel.unsubscribe(first));
        channel.publish(&1);
        assert_eq!(*log.borrow(), vec!["second"]);
        assert_eq!(channel.subscriber_count(), 1);
    }

    #[test]
    fn publish_without_subscribers_is_a_no_op() {
        let channel: NotificationChannel<String> = NotificationChannel::new();
        channel.publish(&"nobody".to_string());
        assert_eq!(channel.subscriber_count(), 0);
    }

    #[test]
    fn handler_can_unsubscribe_itself_during_publish() {
        let channel: NotificationChannel<i32> = NotificationChannel::new();
        let calls = Rc::new(Cell::new(0));
        let own_id: Rc<Cell<Option<SubscriptionId>>> = Rc::new(Cell::new(None));

        let id = {
            let channel = channel.clone();
            let calls = Rc::clone(&calls);
            let own_id = Rc::clone(&own_id);
            channel.clone().subscribe(move |_| {
                calls.set(calls.get() + 1);
                if let Some(id) = own_id.get() {
                    channel.unsubscribe(id);
                }
            })
        };
        own_id.set(Some(id));

        channel.publish(&0);
        channel.publish(&0);
        assert_eq!(calls.get(), 1);
        assert_eq!(channel.subscriber_count(), 0);
    }

    #[test]
    fn payload_is_delivered_to_handlers() {
        let channel: NotificationChannel<i32> = NotificationChannel::new();
        let total = Rc::new(Cell::new(0));
        let sink = Rc::clone(&total);
        channel.subscribe(move |v| sink.set(sink.get() + *v));
        channel.publish(&3);
        channel.publish(&4);
        assert_eq!(total.get(), 7);
    }

    #[test]
    #[should_panic(expected = "handler failed")]
    fn handler_panics_propagate() {
        let channel: NotificationChannel<()> = NotificationChannel::new();
        channel.subscribe(|_| panic!("handler failed"));
        channel.publish(&());
    }

    #[test]
    fn clones_share_the_registry() {
        let a: NotificationChannel<()> = NotificationChannel::new();
        let b = a.clone();
        b.subscribe(|_| {});
        assert_eq!(a.subscriber_count(), 1);
        assert!(a.same_channel(&b));
        assert!(!a.same_channel(&NotificationChannel::new()));
    }
}
