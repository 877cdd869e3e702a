use serde_json::Value;

use super::value::FieldValue;

pub type OnChange = Box<dyn Fn(&FieldValue)>;
pub type OnTouched = Box<dyn Fn()>;

/// Form-binding contract between a form model and a control.
///
/// `write_value` flows model → control and never calls back into `on_change`;
/// the control reports user edits through `on_change` and blur through
/// `on_touched`.
pub trait ControlValueAccessor {
    fn write_value(&self, value: &Value);
    fn register_on_change(&self, on_change: OnChange);
    fn register_on_touched(&self, on_touched: OnTouched);
    fn set_disabled_state(&self, disabled: bool);
}
