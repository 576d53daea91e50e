//! # View Framework
//!
//! Building blocks for single-threaded, event-driven user interfaces that are
//! rendered into a headless element tree. The crate knows nothing about any
//! particular application; it provides the coordination plumbing:
//!
//! - [`element`]: an `Rc`-based element tree with classes, attributes,
//!   simple selectors, bubbling event listeners and HTML serialisation.
//! - [`broker`]: a typed publish/subscribe hub so that components that must
//!   not know about each other can still talk.
//! - [`component`]: the lifecycle contract every renderable unit follows
//!   (create, initialize state, render, attach, bind events).
//! - [`task`]: one cancellable in-flight async continuation per component.
//! - [`storage`]: a key-value persistence adapter with JSON collections.
//!
//! ## Runtime model
//!
//! Everything runs on one thread. Shared state uses `Rc`/`RefCell`, so none
//! of the types here are `Send`. Async work is spawned with
//! [`tokio::task::spawn_local`]; run the application (and async tests)
//! inside a [`tokio::task::LocalSet`] on a current-thread runtime:
//!
//! ```rust
//! use view_framework::{Element, TaskSlot};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let local = tokio::task::LocalSet::new();
//!     local
//!         .run_until(async {
//!             let doc = Element::document();
//!             let slot = TaskSlot::new();
//!             let target = doc.clone();
//!             slot.spawn(async move {
//!                 target.append_child(&Element::new("p").with_text("loaded"));
//!             });
//!             slot.settled().await;
//!             assert_eq!(doc.query("p").unwrap().text(), "loaded");
//!         })
//!         .await;
//! }
//! ```
//!
//! ## Errors
//!
//! All fallible framework operations return [`FrameworkError`]. Application
//! crates wrap it into their own error enum with `#[from]`.

pub mod broker;
pub mod component;
pub mod element;
pub mod error;
pub mod storage;
pub mod task;
pub mod tracing;

pub use broker::{BrokerEvent, EventBroker, EventEnvelope, EventType, SubscriptionId};
pub use component::{mount, Component, Mounted};
pub use element::{DomEvent, Element, EventKind, WeakElement};
pub use error::{FrameworkError, HandlerError};
pub use storage::{Collection, FileStore, KeyValueStore, MemoryStore};
pub use task::TaskSlot;
