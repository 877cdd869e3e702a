//! The interaction state machine behind a text field.
//!
//! The host only ever talks to it through [`Foundation`]; the foundation only
//! ever talks to the DOM through a [`TextFieldAdapter`]. Any implementation
//! can be plugged into a [`TextField`](crate::field::TextField) with
//! [`TextFieldBuilder::foundation`](crate::field::TextFieldBuilder::foundation).

pub mod constants;
mod text_field;

use std::rc::Rc;

use super::adapter::TextFieldAdapter;
use super::value::FieldValue;

pub use text_field::TextFieldFoundation;

/// Operations the host drives the foundation with.
pub trait Foundation {
    /// Wire up every adapter-registered listener.
    fn init(&self);
    /// Tear down what `init` registered. Called once, before the DOM nodes
    /// bound to the adapter are dropped.
    fn destroy(&self);
    /// Inform the state machine of a new value. Emits no external
    /// notification.
    fn set_value(&self, value: &FieldValue);
    fn is_disabled(&self) -> bool;
    fn set_disabled(&self, disabled: bool);
    /// Override native validity, for custom validation.
    fn set_valid(&self, is_valid: bool);
    fn is_valid(&self) -> bool;
    /// Open or close the outline notch regardless of the value.
    fn notch_outline(&self, open_notch: bool);
    fn set_use_native_validation(&self, use_native_validation: bool);
}

/// Builds the foundation bound to a freshly attached adapter.
pub type FoundationFactory = Rc<dyn Fn(Rc<dyn TextFieldAdapter>) -> Rc<dyn Foundation>>;

pub fn default_factory() -> FoundationFactory {
    Rc::new(|adapter| TextFieldFoundation::new(adapter) as Rc<dyn Foundation>)
}
