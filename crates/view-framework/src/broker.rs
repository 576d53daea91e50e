//! # Event Broker
//!
//! A publish/subscribe hub keyed by event type. Views that must not know
//! about each other (a movie list and a movie detail overlay, say) talk
//! through a shared [`EventBroker`] instead of holding references.
//!
//! ## Delivery semantics
//!
//! - Handlers for a type are invoked in registration order, each exactly once
//!   per publish, all with the same [`EventEnvelope`].
//! - Dispatch is synchronous: [`EventBroker::publish`] returns once every
//!   handler has been called. Async handlers registered with
//!   [`EventBroker::subscribe_async`] are spawned on the local task set and
//!   not awaited.
//! - The handler list is snapshotted when a publish starts. A handler removed
//!   before that point is not invoked; handlers added during dispatch only see
//!   later publishes.
//! - A handler returning `Err` stops the dispatch: later handlers of that
//!   publish are skipped and the error is returned to the publisher. The
//!   broker does not isolate handlers from each other.
//!
//! ## Lifetime
//!
//! The broker is an explicit object. Applications usually keep one per thread
//! and hand clones to the components that need it; tests build their own or
//! call [`EventBroker::reset`] between scenarios.

use crate::error::{FrameworkError, HandlerError};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt::Debug;
use std::future::Future;
use std::rc::Rc;
use tracing::{debug, warn};

/// Name of an event type, e.g. `"detailMovieEvent"`.
pub type EventType = &'static str;

/// Payload types carried by a broker.
///
/// Usually implemented by an application-level enum where every variant maps
/// to one event type.
pub trait BrokerEvent: Clone + Debug + 'static {
    fn event_type(&self) -> EventType;
}

/// The value delivered to handlers. Lives only for the duration of a dispatch.
#[derive(Debug, Clone, PartialEq)]
pub struct EventEnvelope<E> {
    pub event_type: EventType,
    pub detail: E,
}

/// Identifies a registration so it can be removed again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Handler<E> = Rc<dyn Fn(&EventEnvelope<E>) -> Result<(), HandlerError>>;

struct Registry<E> {
    next_id: u64,
    handlers: HashMap<EventType, Vec<(SubscriptionId, Handler<E>)>>,
}

/// A cheaply clonable handle to a publish/subscribe registry.
pub struct EventBroker<E: BrokerEvent> {
    inner: Rc<RefCell<Registry<E>>>,
}

impl<E: BrokerEvent> Clone for EventBroker<E> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<E: BrokerEvent> Default for EventBroker<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: BrokerEvent> EventBroker<E> {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(Registry {
                next_id: 1,
                handlers: HashMap::new(),
            })),
        }
    }

    /// Registers `handler` for `event_type`.
    pub fn subscribe(
        &self,
        event_type: EventType,
        handler: impl Fn(&EventEnvelope<E>) -> Result<(), HandlerError> + 'static,
    ) -> SubscriptionId {
        let mut registry = self.inner.borrow_mut();
        let id = SubscriptionId(registry.next_id);
        registry.next_id += 1;
        registry
            .handlers
            .entry(event_type)
            .or_default()
            .push((id, Rc::new(handler)));
        debug!(event_type, subscription = id.0, "Subscribed");
        id
    }

    /// Registers an asynchronous handler.
    ///
    /// Each delivery spawns the returned future with
    /// [`tokio::task::spawn_local`]; the publisher does not wait for it, and a
    /// failure inside the future cannot reach the publisher. Must be used from
    /// within a [`tokio::task::LocalSet`].
    pub fn subscribe_async<F, Fut>(&self, event_type: EventType, handler: F) -> SubscriptionId
    where
        F: Fn(EventEnvelope<E>) -> Fut + 'static,
        Fut: Future<Output = ()> + 'static,
    {
        self.subscribe(event_type, move |envelope| {
            tokio::task::spawn_local(handler(envelope.clone()));
            Ok(())
        })
    }

    /// Removes a registration. Returns `false` if it was already gone.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut registry = self.inner.borrow_mut();
        let mut removed = false;
        for handlers in registry.handlers.values_mut() {
            let before = handlers.len();
            handlers.retain(|(sub, _)| *sub != id);
            removed |= handlers.len() != before;
        }
        if removed {
            debug!(subscription = id.0, "Unsubscribed");
        }
        removed
    }

    /// Delivers `detail` to every handler of its event type.
    ///
    /// Returns how many handlers ran. The first failing handler aborts the
    /// dispatch and its error is returned.
    pub fn publish(&self, detail: E) -> Result<usize, FrameworkError> {
        let event_type = detail.event_type();
        let handlers: Vec<Handler<E>> = self
            .inner
            .borrow()
            .handlers
            .get(event_type)
            .map(|list| list.iter().map(|(_, h)| h.clone()).collect())
            .unwrap_or_default();

        debug!(event_type, handlers = handlers.len(), ?detail, "Publish");
        let envelope = EventEnvelope { event_type, detail };

        for (delivered, handler) in handlers.iter().enumerate() {
            if let Err(source) = handler(&envelope) {
                warn!(event_type, delivered, error = %source, "Handler failed, dispatch aborted");
                return Err(FrameworkError::HandlerFailed {
                    event_type: event_type.to_string(),
                    source,
                });
            }
        }
        Ok(handlers.len())
    }

    pub fn handler_count(&self, event_type: EventType) -> usize {
        self.inner
            .borrow()
            .handlers
            .get(event_type)
            .map_or(0, Vec::len)
    }

    /// Drops every registration.
    pub fn reset(&self) {
        self.inner.borrow_mut().handlers.clear();
        debug!("Broker reset");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Debug, Clone, PartialEq)]
    enum TestEvent {
        Ping(u32),
        Pong,
    }

    impl BrokerEvent for TestEvent {
        fn event_type(&self) -> EventType {
            match self {
                TestEvent::Ping(_) => "ping",
                TestEvent::Pong => "pong",
            }
        }
    }

    #[test]
    fn test_publish_in_registration_order() {
        let broker = EventBroker::<TestEvent>::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        for name in ["first", "second", "third"] {
            let log = log.clone();
            broker.subscribe("ping", move |envelope| {
                log.borrow_mut().push((name, envelope.detail.clone()));
                Ok(())
            });
        }

        let delivered = broker.publish(TestEvent::Ping(7)).unwrap();
        assert_eq!(delivered, 3);
        assert_eq!(
            *log.borrow(),
            vec![
                ("first", TestEvent::Ping(7)),
                ("second", TestEvent::Ping(7)),
                ("third", TestEvent::Ping(7)),
            ]
        );

        // Other event types are not delivered to ping handlers
        assert_eq!(broker.publish(TestEvent::Pong).unwrap(), 0);
        assert_eq!(log.borrow().len(), 3);
    }

    #[test]
    fn test_unsubscribed_handler_is_not_invoked() {
        let broker = EventBroker::<TestEvent>::new();
        let hits = Rc::new(RefCell::new(0));

        let hits_clone = hits.clone();
        let id = broker.subscribe("ping", move |_| {
            *hits_clone.borrow_mut() += 1;
            Ok(())
        });

        assert!(broker.unsubscribe(id));
        assert!(!broker.unsubscribe(id));
        broker.publish(TestEvent::Ping(1)).unwrap();
        assert_eq!(*hits.borrow(), 0);
    }

    #[test]
    fn test_failing_handler_aborts_dispatch() {
        let broker = EventBroker::<TestEvent>::new();
        let later_called = Rc::new(RefCell::new(false));

        broker.subscribe("ping", |_| Err("boom".into()));
        let later = later_called.clone();
        broker.subscribe("ping", move |_| {
            *later.borrow_mut() = true;
            Ok(())
        });

        let err = broker.publish(TestEvent::Ping(1)).unwrap_err();
        assert!(matches!(
            err,
            FrameworkError::HandlerFailed { ref event_type, .. } if event_type == "ping"
        ));
        assert!(!*later_called.borrow());
    }

    #[test]
    fn test_handler_may_publish_and_subscribe() {
        let broker = EventBroker::<TestEvent>::new();
        let pongs = Rc::new(RefCell::new(0));

        let pongs_clone = pongs.clone();
        broker.subscribe("pong", move |_| {
            *pongs_clone.borrow_mut() += 1;
            Ok(())
        });

        let inner = broker.clone();
        broker.subscribe("ping", move |_| {
            inner.subscribe("ping", |_| Ok(()));
            inner.publish(TestEvent::Pong).map(|_| ()).map_err(|e| e.to_string().into())
        });

        assert_eq!(broker.publish(TestEvent::Ping(1)).unwrap(), 1);
        assert_eq!(*pongs.borrow(), 1);
        assert_eq!(broker.handler_count("ping"), 2);
    }

    #[test]
    fn test_reset_clears_registrations() {
        let broker = EventBroker::<TestEvent>::new();
        broker.subscribe("ping", |_| Ok(()));
        broker.subscribe("pong", |_| Ok(()));

        broker.reset();
        assert_eq!(broker.handler_count("ping"), 0);
        assert_eq!(broker.publish(TestEvent::Pong).unwrap(), 0);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_async_handler_is_not_awaited() {
        let local = tokio::task::LocalSet::new();
        local
            .run_until(async {
                let broker = EventBroker::<TestEvent>::new();
                let (tx, rx) = tokio::sync::oneshot::channel::<u32>();
                let tx = Rc::new(RefCell::new(Some(tx)));

                broker.subscribe_async("ping", move |envelope| {
                    let tx = tx.clone();
                    async move {
                        tokio::task::yield_now().await;
                        let sender = tx.borrow_mut().take();
                        if let (TestEvent::Ping(n), Some(sender)) = (envelope.detail, sender) {
                            let _ = sender.send(n);
                        }
                    }
                });

                assert_eq!(broker.publish(TestEvent::Ping(42)).unwrap(), 1);
                assert_eq!(rx.await.unwrap(), 42);
            })
            .await;
    }
}
