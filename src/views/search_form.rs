use super::error_surface::ToastHost;
use crate::constants::EMPTY_SEARCH_MESSAGE;
use crate::model::QueryContext;
use std::rc::Rc;
use tracing::debug;
use view_framework::{Component, Element, EventKind, FrameworkError};

pub struct SearchFormProps {
    pub toasts: ToastHost,
    pub on_search: Rc<dyn Fn(QueryContext)>,
}

/// The search box in the page header.
///
/// A submitted term is trimmed first. An empty term shows a toast and
/// triggers nothing else.
pub struct SearchForm {
    props: SearchFormProps,
    root: Element,
}

impl Component for SearchForm {
    type Props = SearchFormProps;

    fn create(props: SearchFormProps) -> Self {
        Self {
            props,
            root: Element::new("form").with_id("search-form"),
        }
    }

    fn root(&self) -> &Element {
        &self.root
    }

    fn render(&mut self) -> Result<(), FrameworkError> {
        self.root.append_child(
            &Element::new("input")
                .with_class("search-input")
                .with_attr("type", "text")
                .with_attr("placeholder", "Search movies"),
        );
        self.root.append_child(
            &Element::new("button")
                .with_class("search-button")
                .with_attr("type", "submit")
                .with_text("Search"),
        );
        Ok(())
    }

    fn set_event(&mut self) {
        // A submit button click submits the form, as in a browser
        let form = self.root.downgrade();
        self.root.add_listener(EventKind::Click, move |event| {
            if event.target.matches("button[type=submit]") {
                if let Some(form) = form.upgrade() {
                    form.dispatch(EventKind::Submit, None);
                }
            }
        });

        let form = self.root.downgrade();
        let toasts = self.props.toasts.clone();
        let on_search = self.props.on_search.clone();
        self.root.add_listener(EventKind::Submit, move |event| {
            let term = event.value.clone().or_else(|| {
                form.upgrade()
                    .and_then(|form| form.query(".search-input"))
                    .and_then(|input| input.attr("value"))
            });
            let term = term.as_deref().map(str::trim).unwrap_or_default();
            if term.is_empty() {
                debug!("Empty search term");
                toasts.show(EMPTY_SEARCH_MESSAGE);
                return;
            }
            on_search(QueryContext::Search(term.to_string()));
        });
    }
}

impl SearchForm {
    /// Types `term` into the input and submits the form.
    pub fn submit(&self, term: &str) {
        if let Some(input) = self.root.query(".search-input") {
            input.set_attr("value", term);
        }
        self.root.dispatch(EventKind::Submit, None);
    }
}
