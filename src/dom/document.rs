use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use serde::{Deserialize, Serialize};
use unicode_width::UnicodeWidthStr;

use super::element::{Element, NodeInner};
use crate::runtime::EventLoop;

/// Whether the document is backed by an interactive rendering context.
/// Focus and text direction are only observable when it is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    #[default]
    Interactive,
    Headless,
}

impl Platform {
    pub fn is_interactive(self) -> bool {
        matches!(self, Platform::Interactive)
    }
}

/// Stand-in for text layout: widths are display columns times `char_width`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextMetrics {
    pub char_width: f64,
}

impl Default for TextMetrics {
    fn default() -> Self {
        Self { char_width: 8.0 }
    }
}

impl TextMetrics {
    pub fn measure(&self, text: &str) -> f64 {
        UnicodeWidthStr::width(text) as f64 * self.char_width
    }
}

#[derive(Clone)]
pub struct Document {
    inner: Rc<DocumentInner>,
}

pub(crate) struct DocumentInner {
    event_loop: EventLoop,
    platform: Platform,
    metrics: TextMetrics,
    active: RefCell<Weak<NodeInner>>,
    next_node: Cell<u64>,
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("platform", &self.inner.platform)
            .field("active", &self.active_element())
            .finish()
    }
}

impl Document {
    pub fn new(event_loop: EventLoop) -> Self {
        Self::with_environment(event_loop, Platform::default(), TextMetrics::default())
    }

    pub fn with_environment(event_loop: EventLoop, platform: Platform, metrics: TextMetrics) -> Self {
        Self {
            inner: Rc::new(DocumentInner {
                event_loop,
                platform,
                metrics,
                active: RefCell::new(Weak::new()),
                next_node: Cell::new(1),
            }),
        }
    }

    pub fn create_element(&self, tag: &str) -> Element {
        let id = self.inner.next_node.get();
        self.inner.next_node.set(id + 1);
        Element::create(Rc::downgrade(&self.inner), id, tag)
    }

    pub fn active_element(&self) -> Option<Element> {
        self.inner.active_element()
    }

    pub fn event_loop(&self) -> &EventLoop {
        &self.inner.event_loop
    }

    pub fn platform(&self) -> Platform {
        self.inner.platform
    }

    pub fn metrics(&self) -> TextMetrics {
        self.inner.metrics
    }

    pub(crate) fn from_inner(inner: Rc<DocumentInner>) -> Self {
        Self { inner }
    }
}

impl DocumentInner {
    pub(crate) fn active_element(&self) -> Option<Element> {
        self.active.borrow().upgrade().map(Element::from_node)
    }

    pub(crate) fn is_active(&self, node: &Rc<NodeInner>) -> bool {
        self.active
            .borrow()
            .upgrade()
            .is_some_and(|active| Rc::ptr_eq(&active, node))
    }

    pub(crate) fn replace_active(&self, node: Option<&Rc<NodeInner>>) -> Option<Element> {
        let next = node.map(Rc::downgrade).unwrap_or_default();
        let previous = self.active.replace(next);
        previous.upgrade().map(Element::from_node)
    }

    pub(crate) fn event_loop(&self) -> &EventLoop {
        &self.event_loop
    }

    pub(crate) fn metrics(&self) -> TextMetrics {
        self.metrics
    }
}
