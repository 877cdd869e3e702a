use crate::dom::{Document, Element};

pub const ROOT: &str = "mdc-text-field-helper-text";
pub const PERSISTENT: &str = "mdc-text-field-helper-text--persistent";
pub const VALIDATION_MSG: &str = "mdc-text-field-helper-text--validation-msg";

/// The part of the helper text the text field foundation drives.
pub trait HelperTextFoundation {
    fn set_content(&self, content: &str);
    fn set_persistent(&self, persistent: bool);
    fn set_validation(&self, is_validation: bool);
    fn show_to_screen_reader(&self);
    fn set_validity(&self, input_is_valid: bool);
}

/// Hint or validation message rendered below a text field.
#[derive(Debug)]
pub struct HelperText {
    root: Element,
}

impl HelperText {
    pub fn new(document: &Document, content: &str) -> Self {
        let root = document.create_element("p");
        root.add_class(ROOT);
        root.set_attribute("aria-hidden", "true");
        root.set_text_content(content);
        Self { root }
    }

    pub fn element(&self) -> &Element {
        &self.root
    }

    pub fn is_hidden(&self) -> bool {
        self.root.attribute("aria-hidden").as_deref() == Some("true")
    }

    fn hide(&self) {
        self.root.set_attribute("aria-hidden", "true");
    }
}

impl HelperTextFoundation for HelperText {
    fn set_content(&self, content: &str) {
        self.root.set_text_content(content);
    }

    fn set_persistent(&self, persistent: bool) {
        self.root.toggle_class(PERSISTENT, persistent);
    }

    fn set_validation(&self, is_validation: bool) {
        self.root.toggle_class(VALIDATION_MSG, is_validation);
    }

    fn show_to_screen_reader(&self) {
        self.root.remove_attribute("aria-hidden");
    }

    fn set_validity(&self, input_is_valid: bool) {
        let persistent = self.root.has_class(PERSISTENT);
        let needs_display = self.root.has_class(VALIDATION_MSG) && !input_is_valid;

        if needs_display {
            self.root.set_attribute("role", "alert");
        } else {
            self.root.remove_attribute("role");
        }

        if !persistent && !needs_display {
            self.hide();
        }
    }
}
