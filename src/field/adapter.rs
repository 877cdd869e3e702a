//! Capability adapter: the only channel through which a foundation observes
//! or mutates the DOM of a text field.

use std::fmt;
use std::rc::{Rc, Weak};

use serde::Serialize;

use crate::dom::{Direction, EventHandler, MutationObserver, ValidityState};
use crate::widgets::{HelperText, HelperTextFoundation, IconFoundation};

use super::view::FieldView;

/// Read-only snapshot of the native input.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NativeInput {
    pub value: String,
    pub disabled: bool,
    pub validity: ValidityState,
}

/// Called with the names of the input attributes that changed.
pub type AttributeChangeHandler = Box<dyn Fn(&[String])>;

pub trait TextFieldAdapter {
    fn add_class(&self, class_name: &str);
    fn remove_class(&self, class_name: &str);
    fn has_class(&self, class_name: &str) -> bool;

    fn register_text_field_interaction_handler(&self, event_type: &str, handler: EventHandler);
    fn deregister_text_field_interaction_handler(&self, event_type: &str, handler: &EventHandler);
    fn register_input_interaction_handler(&self, event_type: &str, handler: EventHandler);
    fn deregister_input_interaction_handler(&self, event_type: &str, handler: &EventHandler);

    /// Observe attribute mutations of the input. The returned observer is
    /// the disposable handed back to `deregister_…`.
    fn register_validation_attribute_change_handler(
        &self,
        handler: AttributeChangeHandler,
    ) -> MutationObserver;
    fn deregister_validation_attribute_change_handler(&self, observer: Option<&MutationObserver>);

    /// False on headless platforms.
    fn is_focused(&self) -> bool;
    /// False on headless platforms.
    fn is_rtl(&self) -> bool;

    fn activate_line_ripple(&self);
    fn deactivate_line_ripple(&self);
    fn set_line_ripple_transform_origin(&self, normalized_x: f64);

    fn shake_label(&self, should_shake: bool);
    fn float_label(&self, should_float: bool);
    fn has_label(&self) -> bool;
    fn get_label_width(&self) -> f64;

    fn has_outline(&self) -> bool;
    fn notch_outline(&self, label_width: f64, is_rtl: bool);
    fn close_outline(&self);

    fn get_native_input(&self) -> Option<NativeInput>;
    fn set_native_input_value(&self, value: &str);
    fn set_native_input_disabled(&self, disabled: bool);

    fn helper_text(&self) -> Option<Rc<dyn HelperTextFoundation>>;
    fn icon(&self) -> Option<Rc<dyn IconFoundation>>;
}

/// Adapter over the rendered view of a [`TextField`](super::TextField).
///
/// Sub-widgets are looked up on every call, so a re-render that swaps the
/// line ripple for an outline is observed immediately. The helper text is
/// the one referenced when the adapter was built.
pub struct HostAdapter {
    view: Rc<FieldView>,
    helper_text: Option<Weak<HelperText>>,
}

impl fmt::Debug for HostAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostAdapter")
            .field("host", self.view.host())
            .field("helper_text", &self.helper_text.is_some())
            .finish()
    }
}

impl HostAdapter {
    pub fn new(view: Rc<FieldView>, helper_text: Option<Weak<HelperText>>) -> Self {
        Self { view, helper_text }
    }
}

impl TextFieldAdapter for HostAdapter {
    fn add_class(&self, class_name: &str) {
        self.view.host().add_class(class_name);
    }

    fn remove_class(&self, class_name: &str) {
        self.view.host().remove_class(class_name);
    }

    fn has_class(&self, class_name: &str) -> bool {
        self.view.host().has_class(class_name)
    }

    fn register_text_field_interaction_handler(&self, event_type: &str, handler: EventHandler) {
        self.view.host().add_event_listener(event_type, handler);
    }

    fn deregister_text_field_interaction_handler(&self, event_type: &str, handler: &EventHandler) {
        self.view.host().remove_event_listener(event_type, handler);
    }

    fn register_input_interaction_handler(&self, event_type: &str, handler: EventHandler) {
        self.view.input().add_event_listener(event_type, handler);
    }

    fn deregister_input_interaction_handler(&self, event_type: &str, handler: &EventHandler) {
        self.view.input().remove_event_listener(event_type, handler);
    }

    fn register_validation_attribute_change_handler(
        &self,
        handler: AttributeChangeHandler,
    ) -> MutationObserver {
        let observer = MutationObserver::new(self.view.document().event_loop(), handler);
        observer.observe(self.view.input());
        observer
    }

    fn deregister_validation_attribute_change_handler(&self, observer: Option<&MutationObserver>) {
        if let Some(observer) = observer {
            observer.disconnect();
        }
    }

    fn is_focused(&self) -> bool {
        self.view.is_interactive() && self.view.input().is_focused()
    }

    fn is_rtl(&self) -> bool {
        self.view.is_interactive() && self.view.host().computed_direction() == Direction::Rtl
    }

    fn activate_line_ripple(&self) {
        if let Some(line_ripple) = self.view.line_ripple().as_ref() {
            line_ripple.activate();
        }
    }

    fn deactivate_line_ripple(&self) {
        if let Some(line_ripple) = self.view.line_ripple().as_ref() {
            line_ripple.deactivate();
        }
    }

    fn set_line_ripple_transform_origin(&self, normalized_x: f64) {
        if let Some(line_ripple) = self.view.line_ripple().as_ref() {
            line_ripple.set_ripple_center(normalized_x);
        }
    }

    fn shake_label(&self, should_shake: bool) {
        if let Some(label) = self.view.label().as_ref() {
            label.shake(should_shake);
        }
    }

    fn float_label(&self, should_float: bool) {
        if let Some(label) = self.view.label().as_ref() {
            label.float(should_float);
        }
    }

    fn has_label(&self) -> bool {
        self.view.label().is_some()
    }

    fn get_label_width(&self) -> f64 {
        self.view
            .label()
            .as_ref()
            .map(|label| label.get_width())
            .unwrap_or(0.0)
    }

    fn has_outline(&self) -> bool {
        self.view.outline().is_some()
    }

    fn notch_outline(&self, label_width: f64, is_rtl: bool) {
        if let Some(outline) = self.view.outline().as_ref() {
            outline.notch(label_width, is_rtl);
        }
    }

    fn close_outline(&self) {
        if let Some(outline) = self.view.outline().as_ref() {
            outline.close_notch();
        }
    }

    fn get_native_input(&self) -> Option<NativeInput> {
        let input = self.view.input();
        Some(NativeInput {
            value: input.value(),
            disabled: input.has_attribute("disabled"),
            validity: input.validity(),
        })
    }

    fn set_native_input_value(&self, value: &str) {
        self.view.input().set_value(value);
    }

    fn set_native_input_disabled(&self, disabled: bool) {
        self.view.input().toggle_attribute("disabled", disabled);
    }

    fn helper_text(&self) -> Option<Rc<dyn HelperTextFoundation>> {
        let helper_text = self.helper_text.as_ref()?.upgrade()?;
        Some(helper_text)
    }

    fn icon(&self) -> Option<Rc<dyn IconFoundation>> {
        let icon = self.view.icons().first().cloned()?;
        Some(icon)
    }
}
