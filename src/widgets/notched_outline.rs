use std::cell::Cell;

use crate::dom::{Document, Element};

pub const ROOT: &str = "mdc-notched-outline";
pub const NOTCHED: &str = "mdc-notched-outline--notched";
pub const NOTCH: &str = "mdc-notched-outline__notch";
pub const NOTCH_ELEMENT_PADDING: f64 = 8.0;

/// Border drawn around outlined text fields, with a gap ("notch") for the
/// floated label.
#[derive(Debug)]
pub struct NotchedOutline {
    root: Element,
    notch: Element,
    notch_width: Cell<Option<f64>>,
}

impl NotchedOutline {
    pub fn new(document: &Document) -> Self {
        let root = document.create_element("div");
        root.add_class(ROOT);
        let notch = document.create_element("div");
        notch.add_class(NOTCH);
        root.append_child(&notch);
        Self {
            root,
            notch,
            notch_width: Cell::new(None),
        }
    }

    pub fn element(&self) -> &Element {
        &self.root
    }

    pub fn notch(&self, width: f64, is_rtl: bool) {
        let padded = if width > 0.0 {
            width + NOTCH_ELEMENT_PADDING
        } else {
            0.0
        };
        self.root.add_class(NOTCHED);
        self.notch.set_style("width", &format!("{padded}px"));
        self.root
            .set_optional_attribute("dir", is_rtl.then_some("rtl"));
        self.notch_width.set(Some(padded));
    }

    pub fn close_notch(&self) {
        self.root.remove_class(NOTCHED);
        self.notch.remove_style("width");
        self.notch_width.set(None);
    }

    pub fn is_notched(&self) -> bool {
        self.root.has_class(NOTCHED)
    }

    /// Width of the open notch including padding, `None` when closed.
    pub fn notch_width(&self) -> Option<f64> {
        self.notch_width.get()
    }
}
