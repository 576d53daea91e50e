use tracing::debug;
use view_framework::{Component, Element, EventKind, FrameworkError};

/// Overlay dialog hosting the movie detail.
///
/// Any `.close-button` rendered inside the body closes it, as does a click on
/// the backdrop. Clones share the same dialog.
#[derive(Clone)]
pub struct Modal {
    root: Element,
    body: Element,
}

impl Component for Modal {
    type Props = ();

    fn create(_: ()) -> Self {
        Self {
            root: Element::new("dialog").with_id("movie-detail-modal"),
            body: Element::new("div").with_class("modal-body"),
        }
    }

    fn root(&self) -> &Element {
        &self.root
    }

    fn render(&mut self) -> Result<(), FrameworkError> {
        self.root
            .append_child(&Element::new("div").with_class("modal-backdrop"));
        self.root.append_child(&self.body);
        Ok(())
    }

    fn set_event(&mut self) {
        let modal = self.root.downgrade();
        self.root.add_listener(EventKind::Click, move |event| {
            let closes = event.target.closest(".close-button").is_some()
                || event.target.matches(".modal-backdrop");
            if closes {
                if let Some(modal) = modal.upgrade() {
                    modal.remove_attr("open");
                    debug!("Modal closed");
                }
            }
        });
    }
}

impl Modal {
    /// Where the detail view mounts itself.
    pub fn body(&self) -> &Element {
        &self.body
    }

    pub fn open(&self) {
        self.root.set_attr("open", "");
        debug!("Modal opened");
    }

    pub fn is_open(&self) -> bool {
        self.root.has_attr("open")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use view_framework::mount;

    #[test]
    fn test_close_button_inside_body_closes() {
        let doc = Element::document();
        let mounted = mount::<Modal>(&doc, ()).unwrap();
        let modal = mounted.component().clone();

        let header = Element::new("div")
            .with_child(Element::new("button").with_class("close-button"));
        modal.body().append_child(&header);

        modal.open();
        assert!(modal.is_open());
        header.click();
        assert!(modal.is_open());

        doc.query("#movie-detail-modal .close-button").unwrap().click();
        assert!(!modal.is_open());

        modal.open();
        doc.query(".modal-backdrop").unwrap().click();
        assert!(!modal.is_open());
    }
}
