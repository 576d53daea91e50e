//! # Headless Element Tree
//!
//! A minimal, single-threaded stand-in for the DOM. Components build their
//! subtrees out of [`Element`]s, attach them to a parent, and bind listeners
//! on their own root. Events bubble from the target up through its ancestors,
//! which is what makes event delegation from a component root work.
//!
//! Elements are reference-counted handles (`Rc<RefCell<..>>`). Children are
//! owned by their parent, parents are referenced weakly, so detaching a
//! component's root drops the whole subtree together with its listeners.
//!
//! Selectors support the subset the views need: `tag`, `#id`, `.class`,
//! `[attr]`, `[attr=value]`, compounds of those, and the descendant (` `) and
//! child (`>`) combinators.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::{Rc, Weak};

/// Tag used for the root of a document. [`Element::is_connected`] walks up to it.
pub const DOCUMENT_TAG: &str = "#document";

const VOID_TAGS: [&str; 3] = ["img", "input", "br"];

/// Kinds of events the tree can dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Click,
    Submit,
    Load,
}

/// An event travelling from its target up to the document root.
#[derive(Clone)]
pub struct DomEvent {
    pub kind: EventKind,
    /// The element the event was dispatched on (not the listener's element).
    pub target: Element,
    /// Optional payload, e.g. the submitted value of a form.
    pub value: Option<String>,
}

type Listener = Rc<dyn Fn(&DomEvent)>;

struct Node {
    tag: String,
    id: Option<String>,
    classes: Vec<String>,
    attributes: BTreeMap<String, String>,
    text: String,
    children: Vec<Element>,
    parent: Weak<RefCell<Node>>,
    listeners: Vec<(EventKind, Listener)>,
}

/// A handle to a node of the element tree. Cloning the handle is cheap and
/// refers to the same node.
#[derive(Clone)]
pub struct Element {
    node: Rc<RefCell<Node>>,
}

impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.node, &other.node)
    }
}

impl Eq for Element {}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let node = self.node.borrow();
        write!(f, "Element(<{}", node.tag)?;
        if let Some(id) = &node.id {
            write!(f, "#{}", id)?;
        }
        for class in &node.classes {
            write!(f, ".{}", class)?;
        }
        write!(f, ">, children={})", node.children.len())
    }
}

/// A non-owning handle, for listeners and tasks that must not keep a subtree alive.
#[derive(Clone, Default)]
pub struct WeakElement {
    node: Weak<RefCell<Node>>,
}

impl WeakElement {
    pub fn upgrade(&self) -> Option<Element> {
        self.node.upgrade().map(|node| Element { node })
    }
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            node: Rc::new(RefCell::new(Node {
                tag: tag.into(),
                id: None,
                classes: Vec::new(),
                attributes: BTreeMap::new(),
                text: String::new(),
                children: Vec::new(),
                parent: Weak::new(),
                listeners: Vec::new(),
            })),
        }
    }

    /// Creates a document root. Elements attached below it are "connected".
    pub fn document() -> Self {
        Self::new(DOCUMENT_TAG)
    }

    pub fn downgrade(&self) -> WeakElement {
        WeakElement {
            node: Rc::downgrade(&self.node),
        }
    }

    // --- Builders ---

    pub fn with_id(self, id: impl Into<String>) -> Self {
        self.set_id(id);
        self
    }

    pub fn with_class(self, class: &str) -> Self {
        for name in class.split_whitespace() {
            self.add_class(name);
        }
        self
    }

    pub fn with_attr(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.set_text(text);
        self
    }

    pub fn with_child(self, child: Element) -> Self {
        self.append_child(&child);
        self
    }

    // --- Properties ---

    pub fn tag(&self) -> String {
        self.node.borrow().tag.clone()
    }

    pub fn id(&self) -> Option<String> {
        self.node.borrow().id.clone()
    }

    pub fn set_id(&self, id: impl Into<String>) {
        self.node.borrow_mut().id = Some(id.into());
    }

    pub fn add_class(&self, class: &str) {
        let mut node = self.node.borrow_mut();
        if !node.classes.iter().any(|c| c == class) {
            node.classes.push(class.to_string());
        }
    }

    pub fn remove_class(&self, class: &str) {
        self.node.borrow_mut().classes.retain(|c| c != class);
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.node.borrow().classes.iter().any(|c| c == class)
    }

    pub fn attr(&self, name: &str) -> Option<String> {
        self.node.borrow().attributes.get(name).cloned()
    }

    pub fn set_attr(&self, name: impl Into<String>, value: impl Into<String>) {
        self.node
            .borrow_mut()
            .attributes
            .insert(name.into(), value.into());
    }

    pub fn remove_attr(&self, name: &str) {
        self.node.borrow_mut().attributes.remove(name);
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.node.borrow().attributes.contains_key(name)
    }

    /// The element's own text, without descendants.
    pub fn text(&self) -> String {
        self.node.borrow().text.clone()
    }

    pub fn set_text(&self, text: impl Into<String>) {
        self.node.borrow_mut().text = text.into();
    }

    // --- Tree structure ---

    pub fn parent(&self) -> Option<Element> {
        self.node
            .borrow()
            .parent
            .upgrade()
            .map(|node| Element { node })
    }

    pub fn children(&self) -> Vec<Element> {
        self.node.borrow().children.clone()
    }

    pub fn child_count(&self) -> usize {
        self.node.borrow().children.len()
    }

    /// Appends `child` as the last child, detaching it from any previous parent.
    ///
    /// Appending an element to itself or to one of its descendants is ignored.
    pub fn append_child(&self, child: &Element) {
        if child.contains(self) {
            tracing::warn!(parent = ?self, child = ?child, "Refusing to create a cycle");
            return;
        }
        child.remove();
        child.node.borrow_mut().parent = Rc::downgrade(&self.node);
        self.node.borrow_mut().children.push(child.clone());
    }

    /// Detaches the element from its parent. Listeners stay on the element and
    /// are dropped together with it.
    pub fn remove(&self) {
        let parent = self.node.borrow().parent.upgrade();
        if let Some(parent) = parent {
            parent
                .borrow_mut()
                .children
                .retain(|c| !Rc::ptr_eq(&c.node, &self.node));
        }
        self.node.borrow_mut().parent = Weak::new();
    }

    pub fn clear_children(&self) {
        let children = std::mem::take(&mut self.node.borrow_mut().children);
        for child in children {
            child.node.borrow_mut().parent = Weak::new();
        }
    }

    /// True when `other` is this element or one of its descendants.
    pub fn contains(&self, other: &Element) -> bool {
        let mut current = Some(other.clone());
        while let Some(el) = current {
            if el == *self {
                return true;
            }
            current = el.parent();
        }
        false
    }

    /// True when the element hangs below a document root.
    pub fn is_connected(&self) -> bool {
        let mut current = self.clone();
        while let Some(parent) = current.parent() {
            current = parent;
        }
        let connected = current.node.borrow().tag == DOCUMENT_TAG;
        connected
    }

    // --- Selectors ---

    /// First descendant (pre-order, excluding `self`) matching `selector`.
    pub fn query(&self, selector: &str) -> Option<Element> {
        let selector = Selector::parse(selector)?;
        let mut stack: Vec<Element> = self.children().into_iter().rev().collect();
        while let Some(el) = stack.pop() {
            if selector.matches(&el) {
                return Some(el);
            }
            stack.extend(el.children().into_iter().rev());
        }
        None
    }

    /// All descendants matching `selector`, in document order.
    pub fn query_all(&self, selector: &str) -> Vec<Element> {
        let Some(selector) = Selector::parse(selector) else {
            return Vec::new();
        };
        let mut found = Vec::new();
        let mut stack: Vec<Element> = self.children().into_iter().rev().collect();
        while let Some(el) = stack.pop() {
            if selector.matches(&el) {
                found.push(el.clone());
            }
            stack.extend(el.children().into_iter().rev());
        }
        found
    }

    pub fn matches(&self, selector: &str) -> bool {
        Selector::parse(selector).is_some_and(|s| s.matches(self))
    }

    /// This element or its nearest ancestor matching `selector`.
    pub fn closest(&self, selector: &str) -> Option<Element> {
        let selector = Selector::parse(selector)?;
        let mut current = Some(self.clone());
        while let Some(el) = current {
            if selector.matches(&el) {
                return Some(el);
            }
            current = el.parent();
        }
        None
    }

    // --- Events ---

    pub fn add_listener(&self, kind: EventKind, listener: impl Fn(&DomEvent) + 'static) {
        self.node
            .borrow_mut()
            .listeners
            .push((kind, Rc::new(listener)));
    }

    pub fn clear_listeners(&self) {
        self.node.borrow_mut().listeners.clear();
    }

    pub fn listener_count(&self) -> usize {
        self.node.borrow().listeners.len()
    }

    /// Dispatches an event on this element and bubbles it to every ancestor.
    ///
    /// The propagation path is computed before any listener runs, so a
    /// listener that detaches part of the tree does not cut the bubbling
    /// short. Returns the number of listeners invoked.
    pub fn dispatch(&self, kind: EventKind, value: Option<String>) -> usize {
        let event = DomEvent {
            kind,
            target: self.clone(),
            value,
        };
        let mut path = vec![self.clone()];
        while let Some(parent) = path.last().and_then(Element::parent) {
            path.push(parent);
        }

        let mut invoked = 0;
        for el in path {
            let listeners: Vec<Listener> = el
                .node
                .borrow()
                .listeners
                .iter()
                .filter(|(k, _)| *k == kind)
                .map(|(_, l)| l.clone())
                .collect();
            for listener in listeners {
                listener(&event);
                invoked += 1;
            }
        }
        invoked
    }

    pub fn click(&self) -> usize {
        self.dispatch(EventKind::Click, None)
    }

    // --- Serialization ---

    /// Serializes the subtree as HTML. A document root renders only its children.
    pub fn outer_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        let node = self.node.borrow();
        if node.tag == DOCUMENT_TAG {
            for child in &node.children {
                child.write_html(out);
            }
            return;
        }
        out.push('<');
        out.push_str(&node.tag);
        if let Some(id) = &node.id {
            out.push_str(&format!(" id=\"{}\"", escape(id)));
        }
        if !node.classes.is_empty() {
            out.push_str(&format!(" class=\"{}\"", escape(&node.classes.join(" "))));
        }
        for (name, value) in &node.attributes {
            out.push_str(&format!(" {}=\"{}\"", name, escape(value)));
        }
        out.push('>');
        if VOID_TAGS.contains(&node.tag.as_str()) {
            return;
        }
        out.push_str(&escape(&node.text));
        for child in &node.children {
            child.write_html(out);
        }
        out.push_str(&format!("</{}>", node.tag));
    }
}

fn escape(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

// =============================================================================
// SELECTORS
// =============================================================================

#[derive(Debug, Default)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<(String, Option<String>)>,
}

impl Compound {
    fn parse(raw: &str) -> Option<Self> {
        let mut compound = Compound::default();
        let mut rest = raw;
        let tag_end = rest.find(['#', '.', '[']).unwrap_or(rest.len());
        if tag_end > 0 {
            compound.tag = Some(rest[..tag_end].to_string());
        }
        rest = &rest[tag_end..];

        while let Some(marker) = rest.chars().next() {
            match marker {
                '[' => {
                    let close = rest.find(']')?;
                    let inner = &rest[1..close];
                    let attr = match inner.split_once('=') {
                        Some((name, value)) => (
                            name.trim().to_string(),
                            Some(value.trim().trim_matches(['"', '\'']).to_string()),
                        ),
                        None => (inner.trim().to_string(), None),
                    };
                    compound.attrs.push(attr);
                    rest = &rest[close + 1..];
                }
                '#' | '.' => {
                    let body = &rest[1..];
                    let end = body.find(['#', '.', '[']).unwrap_or(body.len());
                    if end == 0 {
                        return None;
                    }
                    let name = body[..end].to_string();
                    if marker == '#' {
                        compound.id = Some(name);
                    } else {
                        compound.classes.push(name);
                    }
                    rest = &body[end..];
                }
                _ => return None,
            }
        }
        Some(compound)
    }

    fn matches(&self, el: &Element) -> bool {
        let node = el.node.borrow();
        if self.tag.as_ref().is_some_and(|tag| *tag != node.tag) {
            return false;
        }
        if self.id.is_some() && self.id != node.id {
            return false;
        }
        if !self
            .classes
            .iter()
            .all(|class| node.classes.iter().any(|c| c == class))
        {
            return false;
        }
        self.attrs.iter().all(|(name, value)| match value {
            Some(expected) => node.attributes.get(name) == Some(expected),
            None => node.attributes.contains_key(name),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Combinator {
    Descendant,
    Child,
}

#[derive(Debug)]
struct Selector {
    steps: Vec<Compound>,
    /// `combinators[i]` relates `steps[i]` to `steps[i + 1]`.
    combinators: Vec<Combinator>,
}

impl Selector {
    fn parse(raw: &str) -> Option<Self> {
        let spaced = raw.replace('>', " > ");
        let mut steps = Vec::new();
        let mut combinators = Vec::new();
        let mut pending = Combinator::Descendant;
        for token in spaced.split_whitespace() {
            if token == ">" {
                if steps.is_empty() {
                    return None;
                }
                pending = Combinator::Child;
                continue;
            }
            if !steps.is_empty() {
                combinators.push(pending);
            }
            steps.push(Compound::parse(token)?);
            pending = Combinator::Descendant;
        }
        if steps.is_empty() || pending == Combinator::Child {
            return None;
        }
        Some(Self { steps, combinators })
    }

    fn matches(&self, el: &Element) -> bool {
        self.matches_at(el, self.steps.len() - 1)
    }

    fn matches_at(&self, el: &Element, index: usize) -> bool {
        if !self.steps[index].matches(el) {
            return false;
        }
        if index == 0 {
            return true;
        }
        match self.combinators[index - 1] {
            Combinator::Child => el
                .parent()
                .is_some_and(|parent| self.matches_at(&parent, index - 1)),
            Combinator::Descendant => {
                let mut current = el.parent();
                while let Some(ancestor) = current {
                    if self.matches_at(&ancestor, index - 1) {
                        return true;
                    }
                    current = ancestor.parent();
                }
                false
            }
        }
    }
}
