use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use indexmap::{IndexMap, IndexSet};

use super::document::{Document, DocumentInner};
use super::event::{Event, EventHandler};
use super::observer::ObserverInner;
use super::validity::{self, ValidityState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ltr,
    Rtl,
}

/// Shared handle to a node of the headless DOM. Clones alias the same node.
#[derive(Clone)]
pub struct Element {
    node: Rc<NodeInner>,
}

#[derive(Clone, Default)]
pub struct WeakElement {
    node: Weak<NodeInner>,
}

pub(crate) struct NodeInner {
    id: u64,
    tag: String,
    document: Weak<DocumentInner>,
    parent: RefCell<Weak<NodeInner>>,
    children: RefCell<Vec<Element>>,
    classes: RefCell<IndexSet<String>>,
    attributes: RefCell<IndexMap<String, String>>,
    styles: RefCell<IndexMap<String, String>>,
    text: RefCell<String>,
    value: RefCell<String>,
    selection: Cell<Option<(usize, usize)>>,
    listeners: RefCell<Vec<Listener>>,
    observers: RefCell<Vec<Weak<ObserverInner>>>,
}

struct Listener {
    event_type: String,
    handler: EventHandler,
}

impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.node, &other.node)
    }
}

impl Eq for Element {}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}#{}", self.node.tag, self.node.id)?;
        let classes = self.node.classes.borrow();
        if !classes.is_empty() {
            write!(f, " class=\"{}\"", classes.iter().cloned().collect::<Vec<_>>().join(" "))?;
        }
        write!(f, ">")
    }
}

impl WeakElement {
    pub fn upgrade(&self) -> Option<Element> {
        self.node.upgrade().map(Element::from_node)
    }
}

impl Element {
    pub(crate) fn create(document: Weak<DocumentInner>, id: u64, tag: &str) -> Self {
        Self {
            node: Rc::new(NodeInner {
                id,
                tag: tag.to_ascii_lowercase(),
                document,
                parent: RefCell::new(Weak::new()),
                children: RefCell::new(Vec::new()),
                classes: RefCell::new(IndexSet::new()),
                attributes: RefCell::new(IndexMap::new()),
                styles: RefCell::new(IndexMap::new()),
                text: RefCell::new(String::new()),
                value: RefCell::new(String::new()),
                selection: Cell::new(None),
                listeners: RefCell::new(Vec::new()),
                observers: RefCell::new(Vec::new()),
            }),
        }
    }

    pub(crate) fn from_node(node: Rc<NodeInner>) -> Self {
        Self { node }
    }

    pub(crate) fn node(&self) -> &Rc<NodeInner> {
        &self.node
    }

    pub fn downgrade(&self) -> WeakElement {
        WeakElement {
            node: Rc::downgrade(&self.node),
        }
    }

    pub fn node_id(&self) -> u64 {
        self.node.id
    }

    pub fn tag_name(&self) -> &str {
        &self.node.tag
    }

    pub fn owner_document(&self) -> Option<Document> {
        self.node.document.upgrade().map(Document::from_inner)
    }

    // --- class list -------------------------------------------------------

    pub fn add_class(&self, name: &str) -> bool {
        self.node.classes.borrow_mut().insert(name.to_string())
    }

    pub fn remove_class(&self, name: &str) -> bool {
        self.node.classes.borrow_mut().shift_remove(name)
    }

    pub fn toggle_class(&self, name: &str, on: bool) -> bool {
        if on {
            self.add_class(name)
        } else {
            self.remove_class(name)
        }
    }

    pub fn has_class(&self, name: &str) -> bool {
        self.node.classes.borrow().contains(name)
    }

    pub fn class_list(&self) -> Vec<String> {
        self.node.classes.borrow().iter().cloned().collect()
    }

    // --- attributes -------------------------------------------------------

    pub fn attribute(&self, name: &str) -> Option<String> {
        self.node.attributes.borrow().get(name).cloned()
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.node.attributes.borrow().contains_key(name)
    }

    pub fn attributes(&self) -> IndexMap<String, String> {
        self.node.attributes.borrow().clone()
    }

    /// Returns `false` when the attribute already held `value`; no mutation
    /// record is produced in that case.
    pub fn set_attribute(&self, name: &str, value: &str) -> bool {
        let changed = {
            let mut attributes = self.node.attributes.borrow_mut();
            match attributes.get(name) {
                Some(current) if current == value => false,
                _ => {
                    attributes.insert(name.to_string(), value.to_string());
                    true
                }
            }
        };
        if changed {
            self.attribute_changed(name);
        }
        changed
    }

    pub fn remove_attribute(&self, name: &str) -> bool {
        let removed = self
            .node
            .attributes
            .borrow_mut()
            .shift_remove(name)
            .is_some();
        if removed {
            self.attribute_changed(name);
        }
        removed
    }

    /// Boolean attribute helper (`disabled`, `required`, ...).
    pub fn toggle_attribute(&self, name: &str, on: bool) -> bool {
        if on {
            self.set_attribute(name, "")
        } else {
            self.remove_attribute(name)
        }
    }

    /// Optional attribute helper: `None` removes the attribute.
    pub fn set_optional_attribute(&self, name: &str, value: Option<&str>) -> bool {
        match value {
            Some(value) => self.set_attribute(name, value),
            None => self.remove_attribute(name),
        }
    }

    fn attribute_changed(&self, name: &str) {
        let observers: Vec<Rc<ObserverInner>> = self
            .node
            .observers
            .borrow()
            .iter()
            .filter_map(Weak::upgrade)
            .collect();
        for observer in observers {
            ObserverInner::enqueue(&observer, name);
        }
        if name == "disabled" && self.has_attribute("disabled") {
            self.blur();
        }
    }

    pub(crate) fn add_observer(&self, observer: Weak<ObserverInner>) {
        self.node.observers.borrow_mut().push(observer);
    }

    pub(crate) fn remove_observer(&self, observer: &Rc<ObserverInner>) {
        self.node.observers.borrow_mut().retain(|candidate| {
            candidate
                .upgrade()
                .is_some_and(|live| !Rc::ptr_eq(&live, observer))
        });
    }

    // --- style / text / value ---------------------------------------------

    pub fn set_style(&self, property: &str, value: &str) {
        self.node
            .styles
            .borrow_mut()
            .insert(property.to_string(), value.to_string());
    }

    pub fn remove_style(&self, property: &str) {
        self.node.styles.borrow_mut().shift_remove(property);
    }

    pub fn style(&self, property: &str) -> Option<String> {
        self.node.styles.borrow().get(property).cloned()
    }

    pub fn text_content(&self) -> String {
        self.node.text.borrow().clone()
    }

    pub fn set_text_content(&self, text: &str) {
        *self.node.text.borrow_mut() = text.to_string();
    }

    /// Rendered width of the text content.
    pub fn scroll_width(&self) -> f64 {
        self.node
            .document
            .upgrade()
            .map(|document| document.metrics().measure(&self.node.text.borrow()))
            .unwrap_or(0.0)
    }

    /// The `value` IDL attribute: sanitized according to the current type.
    pub fn value(&self) -> String {
        let attributes = self.node.attributes.borrow();
        validity::sanitize(&self.node.value.borrow(), &attributes)
    }

    /// Script-side assignment. Fires no events.
    pub fn set_value(&self, value: &str) {
        let sanitized = validity::sanitize(value, &self.node.attributes.borrow());
        *self.node.value.borrow_mut() = sanitized;
    }

    /// Replace the value the way a user edit does and fire `input`.
    /// Returns `false` for disabled controls, which ignore user edits.
    pub fn type_text(&self, text: &str) -> bool {
        if self.has_attribute("disabled") {
            return false;
        }
        *self.node.value.borrow_mut() = text.to_string();
        self.dispatch_event(&Event::new("input"));
        true
    }

    pub fn validity(&self) -> ValidityState {
        validity::evaluate(&self.node.value.borrow(), &self.node.attributes.borrow())
    }

    pub fn select(&self) {
        let length = self.node.value.borrow().chars().count();
        self.node.selection.set(Some((0, length)));
    }

    pub fn selection(&self) -> Option<(usize, usize)> {
        self.node.selection.get()
    }

    // --- tree -------------------------------------------------------------

    pub fn append_child(&self, child: &Element) {
        child.remove();
        *child.node.parent.borrow_mut() = Rc::downgrade(&self.node);
        self.node.children.borrow_mut().push(child.clone());
    }

    pub fn remove_child(&self, child: &Element) -> bool {
        let removed = {
            let mut children = self.node.children.borrow_mut();
            let before = children.len();
            children.retain(|candidate| candidate != child);
            children.len() != before
        };
        if removed {
            *child.node.parent.borrow_mut() = Weak::new();
            child.blur();
        }
        removed
    }

    pub fn remove(&self) {
        if let Some(parent) = self.parent() {
            parent.remove_child(self);
        }
    }

    pub fn parent(&self) -> Option<Element> {
        self.node.parent.borrow().upgrade().map(Element::from_node)
    }

    pub fn children(&self) -> Vec<Element> {
        self.node.children.borrow().clone()
    }

    pub fn contains(&self, other: &Element) -> bool {
        let mut cursor = Some(other.clone());
        while let Some(node) = cursor {
            if &node == self {
                return true;
            }
            cursor = node.parent();
        }
        false
    }

    pub fn computed_direction(&self) -> Direction {
        let mut cursor = Some(self.clone());
        while let Some(node) = cursor {
            let declared = node
                .style("direction")
                .or_else(|| node.attribute("dir"));
            match declared.as_deref() {
                Some("rtl") => return Direction::Rtl,
                Some("ltr") => return Direction::Ltr,
                _ => cursor = node.parent(),
            }
        }
        Direction::Ltr
    }

    // --- focus ------------------------------------------------------------

    pub fn focus(&self) -> bool {
        let Some(document) = self.node.document.upgrade() else {
            return false;
        };
        if self.has_attribute("disabled") {
            return false;
        }
        if document.is_active(&self.node) {
            return true;
        }
        if let Some(previous) = document.replace_active(None) {
            previous.dispatch_event(&Event::new("blur"));
        }
        document.replace_active(Some(&self.node));
        self.dispatch_event(&Event::new("focus"));
        true
    }

    pub fn blur(&self) {
        let Some(document) = self.node.document.upgrade() else {
            return;
        };
        if document.is_active(&self.node) {
            document.replace_active(None);
            self.dispatch_event(&Event::new("blur"));
        }
    }

    pub fn is_focused(&self) -> bool {
        self.node
            .document
            .upgrade()
            .is_some_and(|document| document.is_active(&self.node))
    }

    // --- events -----------------------------------------------------------

    /// Registering the same handler twice for one event type is a no-op.
    pub fn add_event_listener(&self, event_type: &str, handler: EventHandler) -> bool {
        let mut listeners = self.node.listeners.borrow_mut();
        let duplicate = listeners.iter().any(|listener| {
            listener.event_type == event_type && Rc::ptr_eq(&listener.handler, &handler)
        });
        if duplicate {
            return false;
        }
        listeners.push(Listener {
            event_type: event_type.to_string(),
            handler,
        });
        true
    }

    pub fn remove_event_listener(&self, event_type: &str, handler: &EventHandler) -> bool {
        let mut listeners = self.node.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|listener| {
            !(listener.event_type == event_type && Rc::ptr_eq(&listener.handler, handler))
        });
        listeners.len() != before
    }

    pub fn listener_count(&self, event_type: &str) -> usize {
        self.node
            .listeners
            .borrow()
            .iter()
            .filter(|listener| listener.event_type == event_type)
            .count()
    }

    pub fn dispatch_event(&self, event: &Event) {
        let mut cursor = Some(self.clone());
        while let Some(node) = cursor {
            // Snapshot first: handlers may add or remove listeners.
            let handlers: Vec<EventHandler> = node
                .node
                .listeners
                .borrow()
                .iter()
                .filter(|listener| listener.event_type == event.event_type())
                .map(|listener| Rc::clone(&listener.handler))
                .collect();
            for handler in handlers {
                handler(event);
            }
            cursor = if event.bubbles() { node.parent() } else { None };
        }
    }

    pub fn click(&self) {
        self.dispatch_event(&Event::new("click"));
    }
}
