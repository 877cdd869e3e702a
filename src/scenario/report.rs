use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

use crate::field::TextField;

/// Observable state of a field at one point of a scenario.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub step: usize,
    pub lifecycle: String,
    pub value: Value,
    pub native_value: String,
    pub focused: bool,
    pub disabled: bool,
    pub required: bool,
    pub required_attribute: bool,
    pub valid: bool,
    pub outlined: bool,
    pub has_label: bool,
    pub label_floating: bool,
    pub has_line_ripple: bool,
    pub line_ripple_active: bool,
    pub has_outline: bool,
    pub outline_notched: bool,
    pub notch_width: Option<f64>,
    pub ripple_attached: bool,
    pub host_classes: Vec<String>,
    pub input_attributes: IndexMap<String, String>,
}

impl Snapshot {
    pub fn capture(field: &TextField, step: usize, label: Option<String>) -> Self {
        let view = field.view();
        let (has_label, label_floating) = match view.label().as_ref() {
            Some(floating) => (true, floating.is_floating()),
            None => (false, false),
        };
        let (has_line_ripple, line_ripple_active) = match view.line_ripple().as_ref() {
            Some(line_ripple) => (true, line_ripple.is_active()),
            None => (false, false),
        };
        let (has_outline, outline_notched, notch_width) = match view.outline().as_ref() {
            Some(outline) => (true, outline.is_notched(), outline.notch_width()),
            None => (false, false, None),
        };

        Self {
            label,
            step,
            lifecycle: format!("{:?}", field.lifecycle()).to_lowercase(),
            value: field.value().to_json(),
            native_value: field.input().value(),
            focused: field.focused(),
            disabled: field.disabled(),
            required: field.required(),
            required_attribute: field.required_attribute(),
            valid: field.valid(),
            outlined: field.outlined(),
            has_label,
            label_floating,
            has_line_ripple,
            line_ripple_active,
            has_outline,
            outline_notched,
            notch_width,
            ripple_attached: field.ripple_attached(),
            host_classes: field.host().class_list(),
            input_attributes: field.input().attributes(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioReport {
    pub id: String,
    pub snapshots: Vec<Snapshot>,
    /// Values passed to the change callback, in order.
    pub changes: Vec<Value>,
    /// Values carried by blur notifications, in order.
    pub blurs: Vec<Value>,
    pub touched: usize,
    pub final_state: Snapshot,
}
