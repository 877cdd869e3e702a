use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use tracing::trace;

use super::Foundation;
use super::constants::{DENSE_LABEL_SCALE, LABEL_SCALE, VALIDATION_ATTR_WHITELIST, css_classes};
use crate::dom::{Event, EventHandler, MutationObserver, handler};
use crate::field::adapter::{NativeInput, TextFieldAdapter};
use crate::field::value::FieldValue;
use crate::widgets::{HelperTextFoundation, IconFoundation};

const POINTER_EVENTS: [&str; 2] = ["mousedown", "touchstart"];
const INTERACTION_EVENTS: [&str; 2] = ["click", "keydown"];

/// Default text field state machine over
/// {focused, blurred} × {empty, filled} × {valid, invalid} × {enabled, disabled}.
pub struct TextFieldFoundation {
    this: Weak<TextFieldFoundation>,
    adapter: Rc<dyn TextFieldAdapter>,
    helper_text: Option<Rc<dyn HelperTextFoundation>>,
    icon: Option<Rc<dyn IconFoundation>>,
    is_focused: Cell<bool>,
    received_user_input: Cell<bool>,
    is_valid: Cell<bool>,
    use_native_validation: Cell<bool>,
    initialized: Cell<bool>,
    validation_observer: RefCell<Option<MutationObserver>>,
    handlers: Handlers,
}

struct Handlers {
    input_focus: EventHandler,
    input_blur: EventHandler,
    input_input: EventHandler,
    pointer: EventHandler,
    interaction: EventHandler,
}

impl fmt::Debug for TextFieldFoundation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextFieldFoundation")
            .field("is_focused", &self.is_focused.get())
            .field("received_user_input", &self.received_user_input.get())
            .field("is_valid", &self.is_valid.get())
            .field("use_native_validation", &self.use_native_validation.get())
            .field("initialized", &self.initialized.get())
            .finish()
    }
}

fn bind(this: &Weak<TextFieldFoundation>, f: fn(&TextFieldFoundation, &Event)) -> EventHandler {
    let this = this.clone();
    handler(move |event| {
        if let Some(foundation) = this.upgrade() {
            f(&foundation, event);
        }
    })
}

impl TextFieldFoundation {
    pub fn new(adapter: Rc<dyn TextFieldAdapter>) -> Rc<Self> {
        let helper_text = adapter.helper_text();
        let icon = adapter.icon();
        Rc::new_cyclic(|this| Self {
            this: this.clone(),
            adapter,
            helper_text,
            icon,
            is_focused: Cell::new(false),
            received_user_input: Cell::new(false),
            is_valid: Cell::new(true),
            use_native_validation: Cell::new(true),
            initialized: Cell::new(false),
            validation_observer: RefCell::new(None),
            handlers: Handlers {
                input_focus: bind(this, |foundation, _| foundation.activate_focus()),
                input_blur: bind(this, |foundation, _| foundation.deactivate_focus()),
                input_input: bind(this, |foundation, _| foundation.auto_complete_focus()),
                pointer: bind(this, |foundation, event| foundation.set_transform_origin(event)),
                interaction: bind(this, |foundation, _| foundation.handle_text_field_interaction()),
            },
        })
    }

    pub fn is_focused(&self) -> bool {
        self.is_focused.get()
    }

    pub fn should_shake(&self) -> bool {
        !self.is_valid() && !self.is_focused.get() && !self.native_input().value.is_empty()
    }

    pub fn should_float(&self) -> bool {
        let native = self.native_input();
        self.is_focused.get() || !native.value.is_empty() || native.validity.bad_input
    }

    fn native_input(&self) -> NativeInput {
        self.adapter.get_native_input().unwrap_or_default()
    }

    fn handle_text_field_interaction(&self) {
        if self.native_input().disabled {
            return;
        }
        self.received_user_input.set(true);
    }

    fn handle_validation_attribute_change(&self, attributes: &[String]) {
        let relevant = attributes
            .iter()
            .any(|name| VALIDATION_ATTR_WHITELIST.contains(&name.as_str()));
        if relevant {
            trace!(?attributes, "validation attributes changed");
            self.style_validity(true);
        }
    }

    fn activate_focus(&self) {
        self.is_focused.set(true);
        self.style_focused(true);
        self.adapter.activate_line_ripple();
        self.update_label();
        if let Some(helper_text) = &self.helper_text {
            helper_text.show_to_screen_reader();
        }
    }

    fn deactivate_focus(&self) {
        self.is_focused.set(false);
        self.adapter.deactivate_line_ripple();
        self.style_validity(self.is_valid());
        self.style_focused(false);
        self.update_label();
        if !self.should_float() {
            self.received_user_input.set(false);
        }
    }

    /// Focus styling for autofill, which fires `input` without `focus`.
    fn auto_complete_focus(&self) {
        if !self.received_user_input.get() {
            self.activate_focus();
        }
    }

    fn set_transform_origin(&self, event: &Event) {
        // Headless elements have no layout box, so the offset is the raw x.
        if let Some(normalized_x) = event.client_x() {
            self.adapter.set_line_ripple_transform_origin(normalized_x);
        }
    }

    fn update_label(&self) {
        if !self.adapter.has_label() {
            return;
        }
        let should_float = self.should_float();
        self.notch_outline(should_float);
        self.adapter.float_label(should_float);
        self.adapter.shake_label(self.should_shake());
    }

    fn style_validity(&self, is_valid: bool) {
        if is_valid {
            self.adapter.remove_class(css_classes::INVALID);
        } else {
            self.adapter.add_class(css_classes::INVALID);
        }
        if let Some(helper_text) = &self.helper_text {
            helper_text.set_validity(is_valid);
        }
    }

    fn style_focused(&self, is_focused: bool) {
        if is_focused {
            self.adapter.add_class(css_classes::FOCUSED);
        } else {
            self.adapter.remove_class(css_classes::FOCUSED);
        }
    }

    fn style_disabled(&self, is_disabled: bool) {
        if is_disabled {
            self.adapter.add_class(css_classes::DISABLED);
            self.adapter.remove_class(css_classes::INVALID);
        } else {
            self.adapter.remove_class(css_classes::DISABLED);
        }
        if let Some(icon) = &self.icon {
            icon.set_disabled(is_disabled);
        }
    }
}

impl Foundation for TextFieldFoundation {
    fn init(&self) {
        if self.initialized.replace(true) {
            return;
        }
        self.adapter.add_class(css_classes::UPGRADED);
        if self.adapter.is_focused() {
            self.activate_focus();
        } else if self.adapter.has_label() && self.should_float() {
            self.notch_outline(true);
            self.adapter.float_label(true);
        }

        let handlers = &self.handlers;
        self.adapter
            .register_input_interaction_handler("focus", Rc::clone(&handlers.input_focus));
        self.adapter
            .register_input_interaction_handler("blur", Rc::clone(&handlers.input_blur));
        self.adapter
            .register_input_interaction_handler("input", Rc::clone(&handlers.input_input));
        for event_type in POINTER_EVENTS {
            self.adapter
                .register_input_interaction_handler(event_type, Rc::clone(&handlers.pointer));
        }
        for event_type in INTERACTION_EVENTS {
            self.adapter
                .register_text_field_interaction_handler(event_type, Rc::clone(&handlers.interaction));
        }

        let this = self.this.clone();
        let observer = self.adapter.register_validation_attribute_change_handler(Box::new(
            move |attributes: &[String]| {
                if let Some(foundation) = this.upgrade() {
                    foundation.handle_validation_attribute_change(attributes);
                }
            },
        ));
        *self.validation_observer.borrow_mut() = Some(observer);
    }

    fn destroy(&self) {
        if !self.initialized.replace(false) {
            return;
        }
        self.adapter.remove_class(css_classes::UPGRADED);

        let handlers = &self.handlers;
        self.adapter
            .deregister_input_interaction_handler("focus", &handlers.input_focus);
        self.adapter
            .deregister_input_interaction_handler("blur", &handlers.input_blur);
        self.adapter
            .deregister_input_interaction_handler("input", &handlers.input_input);
        for event_type in POINTER_EVENTS {
            self.adapter
                .deregister_input_interaction_handler(event_type, &handlers.pointer);
        }
        for event_type in INTERACTION_EVENTS {
            self.adapter
                .deregister_text_field_interaction_handler(event_type, &handlers.interaction);
        }

        let observer = self.validation_observer.borrow_mut().take();
        self.adapter
            .deregister_validation_attribute_change_handler(observer.as_ref());
    }

    fn set_value(&self, value: &FieldValue) {
        let native = value.to_native();
        if self.native_input().value != native {
            self.adapter.set_native_input_value(&native);
        }
        self.style_validity(self.is_valid());
        self.update_label();
    }

    fn is_disabled(&self) -> bool {
        self.native_input().disabled
    }

    fn set_disabled(&self, disabled: bool) {
        self.adapter.set_native_input_disabled(disabled);
        self.style_disabled(disabled);
    }

    fn set_valid(&self, is_valid: bool) {
        self.is_valid.set(is_valid);
        self.style_validity(is_valid);
        if self.adapter.has_label() {
            self.adapter
                .shake_label(!is_valid && !self.is_focused.get());
        }
    }

    fn is_valid(&self) -> bool {
        if self.use_native_validation.get() {
            self.native_input().validity.valid()
        } else {
            self.is_valid.get()
        }
    }

    fn notch_outline(&self, open_notch: bool) {
        if !self.adapter.has_outline() {
            return;
        }
        if open_notch {
            let scale = if self.adapter.has_class(css_classes::DENSE) {
                DENSE_LABEL_SCALE
            } else {
                LABEL_SCALE
            };
            let label_width = self.adapter.get_label_width() * scale;
            self.adapter.notch_outline(label_width, self.adapter.is_rtl());
        } else {
            self.adapter.close_outline();
        }
    }

    fn set_use_native_validation(&self, use_native_validation: bool) {
        self.use_native_validation.set(use_native_validation);
    }
}
