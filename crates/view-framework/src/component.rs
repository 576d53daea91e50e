//! # Component Lifecycle
//!
//! Every renderable unit implements [`Component`]. The trait fixes what a
//! component is (props, a root element, a render step) and [`mount`] fixes
//! the order in which the steps run:
//!
//! 1. [`Component::create`] stores the props and creates the root element.
//! 2. [`Component::initialize_state`] seeds internal state. Runs exactly once.
//! 3. [`Component::render`] builds the subtree below the root.
//! 4. The root is attached to the supplied parent.
//! 5. [`Component::set_event`] binds listeners on the now-attached subtree.
//!
//! Re-rendering ([`Mounted::rerender`]) repeats only steps 3 and 5.
//!
//! ## Listener scoping
//!
//! Listeners belong on the component's own root (event delegation), never on
//! elements the component does not own. Detaching the root then drops every
//! listener of the subtree, so teardown is implicit. The only registrations
//! outside the subtree are broker subscriptions, which a component removes in
//! [`Component::teardown`].
//!
//! Listener closures must capture component state through `Weak` handles.
//! A strong `Rc` would form a cycle (root → listener → state → root) and the
//! subtree would never be freed.
//!
//! ## Example
//!
//! ```rust
//! use view_framework::{mount, Component, Element, EventKind, FrameworkError};
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! struct Counter {
//!     label: String,
//!     root: Element,
//!     clicks: Rc<Cell<u32>>,
//! }
//!
//! impl Component for Counter {
//!     type Props = String;
//!
//!     fn create(label: String) -> Self {
//!         Self { label, root: Element::new("button"), clicks: Rc::new(Cell::new(0)) }
//!     }
//!
//!     fn root(&self) -> &Element {
//!         &self.root
//!     }
//!
//!     fn render(&mut self) -> Result<(), FrameworkError> {
//!         self.root.set_text(self.label.clone());
//!         Ok(())
//!     }
//!
//!     fn set_event(&mut self) {
//!         let clicks = Rc::downgrade(&self.clicks);
//!         self.root.add_listener(EventKind::Click, move |_| {
//!             if let Some(clicks) = clicks.upgrade() {
//!                 clicks.set(clicks.get() + 1);
//!             }
//!         });
//!     }
//! }
//!
//! let doc = Element::document();
//! let counter = mount::<Counter>(&doc, "More".to_string()).unwrap();
//! counter.root().click();
//! assert_eq!(counter.component().clicks.get(), 1);
//! ```

use crate::element::Element;
use crate::error::FrameworkError;
use tracing::debug;

/// Contract shared by every renderable unit.
///
/// Only [`create`](Component::create), [`root`](Component::root) and
/// [`render`](Component::render) are required; the other hooks default to
/// no-ops.
pub trait Component: Sized + 'static {
    /// Immutable input supplied at construction.
    type Props;

    /// Stores the props and creates the (still detached) root element.
    fn create(props: Self::Props) -> Self;

    /// The element this component owns and renders into.
    fn root(&self) -> &Element;

    /// Seeds or derives internal mutable state. Called once, before the first render.
    fn initialize_state(&mut self) {}

    /// Builds the subtree below [`root`](Component::root).
    fn render(&mut self) -> Result<(), FrameworkError>;

    /// Binds listeners on the root. Called after the root is attached.
    fn set_event(&mut self) {}

    /// Releases anything registered outside the subtree (broker
    /// subscriptions, in-flight tasks). Called before the root is detached.
    fn teardown(&mut self) {}
}

/// A component whose root is attached to a parent.
pub struct Mounted<C: Component> {
    component: C,
}

impl<C: Component> std::fmt::Debug for Mounted<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mounted")
            .field("component", &component_name::<C>())
            .field("root", self.component.root())
            .finish()
    }
}

/// Constructs `C` from `props` and mounts it below `parent`, running the
/// lifecycle steps in their fixed order.
pub fn mount<C: Component>(
    parent: &Element,
    props: C::Props,
) -> Result<Mounted<C>, FrameworkError> {
    let mut component = C::create(props);
    component.initialize_state();
    component.render()?;
    parent.append_child(component.root());
    component.set_event();
    debug!(component = component_name::<C>(), "Mounted");
    Ok(Mounted { component })
}

impl<C: Component> Mounted<C> {
    pub fn component(&self) -> &C {
        &self.component
    }

    pub fn root(&self) -> &Element {
        self.component.root()
    }

    /// Replaces the whole subtree: clears the root's children and listeners,
    /// then runs `render` and `set_event` again. State is kept.
    pub fn rerender(&mut self) -> Result<(), FrameworkError> {
        let root = self.component.root();
        root.clear_children();
        root.clear_listeners();
        self.component.render()?;
        self.component.set_event();
        debug!(component = component_name::<C>(), "Re-rendered");
        Ok(())
    }

    /// Runs `teardown` and detaches the root.
    pub fn unmount(mut self) {
        self.component.teardown();
        self.component.root().remove();
        debug!(component = component_name::<C>(), "Unmounted");
    }
}

// Extract just the type name (e.g., "MovieList" instead of "movie_review::views::movie_list::MovieList")
fn component_name<C>() -> &'static str {
    std::any::type_name::<C>()
        .split("::")
        .last()
        .unwrap_or("Unknown")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::EventKind;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Probe {
        root: Element,
        log: Rc<RefCell<Vec<&'static str>>>,
    }

    impl Component for Probe {
        type Props = Rc<RefCell<Vec<&'static str>>>;

        fn create(log: Self::Props) -> Self {
            log.borrow_mut().push("create");
            Self {
                root: Element::new("div").with_class("probe"),
                log,
            }
        }

        fn root(&self) -> &Element {
            &self.root
        }

        fn initialize_state(&mut self) {
            self.log.borrow_mut().push("initialize_state");
        }

        fn render(&mut self) -> Result<(), FrameworkError> {
            // Not attached yet on the first render
            let attached = self.root.parent().is_some();
            self.log
                .borrow_mut()
                .push(if attached { "render(attached)" } else { "render" });
            self.root.append_child(&Element::new("button"));
            Ok(())
        }

        fn set_event(&mut self) {
            assert!(self.root.parent().is_some());
            self.log.borrow_mut().push("set_event");
            let log = Rc::downgrade(&self.log);
            self.root.add_listener(EventKind::Click, move |_| {
                if let Some(log) = log.upgrade() {
                    log.borrow_mut().push("click");
                }
            });
        }

        fn teardown(&mut self) {
            self.log.borrow_mut().push("teardown");
        }
    }

    #[test]
    fn test_lifecycle_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let doc = Element::document();
        let mut mounted = mount::<Probe>(&doc, log.clone()).unwrap();

        assert_eq!(
            *log.borrow(),
            vec!["create", "initialize_state", "render", "set_event"]
        );

        mounted.rerender().unwrap();
        assert_eq!(
            log.borrow()[4..].to_vec(),
            vec!["render(attached)", "set_event"]
        );
        // Old listeners were dropped: one click, one log entry
        assert_eq!(mounted.root().listener_count(), 1);
        assert_eq!(mounted.root().child_count(), 1);

        mounted.root().query("button").unwrap().click();
        assert_eq!(log.borrow().last(), Some(&"click"));

        let root = mounted.root().clone();
        mounted.unmount();
        assert_eq!(log.borrow().last(), Some(&"teardown"));
        assert!(!root.is_connected());
        assert!(doc.query(".probe").is_none());
    }
}
