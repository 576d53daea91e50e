//! # Error Surface
//!
//! Three ways to tell the user something went wrong, picked by how bad it is:
//!
//! | Presentation | Scope | Used for |
//! |--------------|-------|----------|
//! | [`ErrorModal`] | whole page, blocking | credential failures (published on the broker) |
//! | [`ToastHost`] | transient, auto-dismissed | recoverable failures, empty search terms |
//! | [`ErrorContainer`] | inline, inside a view | a detail that could not be loaded |

use crate::constants::TOAST_DURATION;
use crate::events::{MovieBroker, MovieEvent, CREDENTIAL_ERROR};
use tracing::{debug, warn};
use view_framework::{Component, Element, EventKind, FrameworkError, SubscriptionId};

/// Whether the error modal currently blocks the page.
///
/// Views that start work on user input check it first. Cheap to clone.
#[derive(Clone)]
pub struct PageGate {
    dialog: Element,
}

impl PageGate {
    pub fn is_blocked(&self) -> bool {
        self.dialog.has_attr("open")
    }
}

/// Host for transient toast messages.
///
/// Cheap to clone; clones share the same container, so views can keep one
/// to report their own failures.
#[derive(Clone)]
pub struct ToastHost {
    root: Element,
}

impl Component for ToastHost {
    type Props = ();

    fn create(_: ()) -> Self {
        Self {
            root: Element::new("div").with_id("toast-container"),
        }
    }

    fn root(&self) -> &Element {
        &self.root
    }

    fn render(&mut self) -> Result<(), FrameworkError> {
        Ok(())
    }
}

impl ToastHost {
    /// Appends a toast and schedules its removal after [`TOAST_DURATION`].
    ///
    /// Must be called inside a `LocalSet`.
    pub fn show(&self, message: impl Into<String>) -> Element {
        let message = message.into();
        debug!(%message, "Toast");
        let toast = Element::new("div")
            .with_class("toast")
            .with_text(message);
        self.root.append_child(&toast);

        let expiring = toast.downgrade();
        tokio::task::spawn_local(async move {
            tokio::time::sleep(TOAST_DURATION).await;
            if let Some(toast) = expiring.upgrade() {
                toast.remove();
            }
        });
        toast
    }

    /// Removes every toast on screen.
    pub fn clear(&self) {
        self.root.clear_children();
    }

    pub fn messages(&self) -> Vec<String> {
        self.root
            .query_all(".toast")
            .iter()
            .map(Element::text)
            .collect()
    }
}

/// An inline error block with a dismiss button.
pub struct ErrorContainer {
    message: String,
    root: Element,
}

impl Component for ErrorContainer {
    type Props = String;

    fn create(message: String) -> Self {
        Self {
            message,
            root: Element::new("div").with_class("error-container"),
        }
    }

    fn root(&self) -> &Element {
        &self.root
    }

    fn render(&mut self) -> Result<(), FrameworkError> {
        self.root.append_child(
            &Element::new("p")
                .with_class("error-message")
                .with_text(self.message.clone()),
        );
        self.root.append_child(
            &Element::new("button")
                .with_class("error-dismiss")
                .with_text("Dismiss"),
        );
        Ok(())
    }

    fn set_event(&mut self) {
        let root = self.root.downgrade();
        self.root.add_listener(EventKind::Click, move |event| {
            if event.target.matches(".error-dismiss") {
                if let Some(root) = root.upgrade() {
                    root.remove();
                }
            }
        });
    }
}

/// Page-level modal for failures the user has to acknowledge.
///
/// Opens on every [`MovieEvent::CredentialError`] and closes only through
/// its confirm button.
pub struct ErrorModal {
    broker: MovieBroker,
    root: Element,
    subscription: Option<SubscriptionId>,
}

impl Component for ErrorModal {
    type Props = MovieBroker;

    fn create(broker: MovieBroker) -> Self {
        Self {
            broker,
            root: Element::new("dialog").with_id("error-modal"),
            subscription: None,
        }
    }

    fn root(&self) -> &Element {
        &self.root
    }

    fn render(&mut self) -> Result<(), FrameworkError> {
        self.root
            .append_child(&Element::new("p").with_class("error-modal-message"));
        self.root.append_child(
            &Element::new("button")
                .with_class("error-modal-confirm")
                .with_text("OK"),
        );
        Ok(())
    }

    fn set_event(&mut self) {
        let root = self.root.downgrade();
        self.root.add_listener(EventKind::Click, move |event| {
            if event.target.matches("button.error-modal-confirm") {
                if let Some(root) = root.upgrade() {
                    root.remove_attr("open");
                }
            }
        });

        if self.subscription.is_none() {
            let root = self.root.downgrade();
            self.subscription = Some(self.broker.subscribe(CREDENTIAL_ERROR, move |envelope| {
                let MovieEvent::CredentialError { message } = &envelope.detail else {
                    return Ok(());
                };
                let Some(root) = root.upgrade() else {
                    return Ok(());
                };
                warn!(%message, "Credential error");
                if let Some(text) = root.query(".error-modal-message") {
                    text.set_text(message.clone());
                }
                root.set_attr("open", "");
                Ok(())
            }));
        }
    }

    fn teardown(&mut self) {
        if let Some(id) = self.subscription.take() {
            self.broker.unsubscribe(id);
        }
    }
}

impl ErrorModal {
    pub fn is_open(&self) -> bool {
        self.root.has_attr("open")
    }

    /// A gate that stays blocked while this modal is open.
    pub fn gate(&self) -> PageGate {
        PageGate {
            dialog: self.root.clone(),
        }
    }

    pub fn message(&self) -> String {
        self.root
            .query(".error-modal-message")
            .map(|el| el.text())
            .unwrap_or_default()
    }
}
