use crate::dom::{Document, Element};

pub const ROOT: &str = "mdc-floating-label";
pub const FLOAT_ABOVE: &str = "mdc-floating-label--float-above";
pub const SHAKE: &str = "mdc-floating-label--shake";

/// `<label>` that floats above the input once it holds a value or focus.
#[derive(Debug)]
pub struct FloatingLabel {
    root: Element,
}

impl FloatingLabel {
    pub fn new(document: &Document, for_id: &str, text: &str) -> Self {
        let root = document.create_element("label");
        root.add_class(ROOT);
        root.set_attribute("for", for_id);
        root.set_text_content(text);
        Self { root }
    }

    pub fn element(&self) -> &Element {
        &self.root
    }

    pub fn float(&self, should_float: bool) {
        if should_float {
            self.root.add_class(FLOAT_ABOVE);
        } else {
            self.root.remove_class(FLOAT_ABOVE);
            self.root.remove_class(SHAKE);
        }
    }

    pub fn shake(&self, should_shake: bool) {
        self.root.toggle_class(SHAKE, should_shake);
    }

    pub fn get_width(&self) -> f64 {
        self.root.scroll_width()
    }

    pub fn is_floating(&self) -> bool {
        self.root.has_class(FLOAT_ABOVE)
    }

    pub fn is_shaking(&self) -> bool {
        self.root.has_class(SHAKE)
    }

    pub(crate) fn sync(&self, for_id: &str, text: &str) {
        self.root.set_attribute("for", for_id);
        if self.root.text_content() != text {
            self.root.set_text_content(text);
        }
    }
}
