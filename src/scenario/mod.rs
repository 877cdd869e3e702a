//! Scripted interaction with a single text field, for the CLI and for
//! end-to-end tests.
//!
//! A [`Scenario`] describes the field's initial configuration and an ordered
//! list of [`Step`]s. [`run`] drives a real [`TextField`](crate::TextField)
//! through them on a fresh document and returns a [`ScenarioReport`].

mod report;
mod runner;

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use report::{ScenarioReport, Snapshot};
pub use runner::{ScenarioError, run};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Scenario {
    pub field: FieldSetup,
    pub steps: Vec<Step>,
}

/// Initial configuration, applied before the first step.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FieldSetup {
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub input_type: Option<String>,
    pub label: Option<String>,
    pub placeholder: Option<String>,
    pub value: Option<Value>,
    pub outlined: bool,
    pub disabled: bool,
    pub required: bool,
    pub fullwidth: bool,
    pub dense: bool,
    pub multiline: bool,
    pub use_native_validation: Option<bool>,
    pub valid: Option<bool>,
    pub pattern: Option<String>,
    pub maxlength: Option<u32>,
    pub minlength: Option<u32>,
    pub max: Option<f64>,
    pub min: Option<f64>,
    pub size: Option<u32>,
    pub step: Option<f64>,
    pub helper_text: Option<String>,
    pub icons: Vec<IconSetup>,
    /// Attach before running the steps.
    pub attach: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct IconSetup {
    pub name: String,
    pub leading: bool,
    pub trailing: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Step {
    Attach,
    Destroy,
    Focus,
    Blur,
    /// User edit of the native input.
    Type { text: String },
    Click,
    /// Form-model write; never reported as a change.
    WriteValue { value: Value },
    SetValue { value: Value },
    SetType { value: String },
    SetOutlined { value: bool },
    SetDisabled { value: bool },
    SetRequired { value: bool },
    SetValid { value: bool },
    SetFullwidth { value: bool },
    SetDense { value: bool },
    SetUseNativeValidation { value: bool },
    SetLabel { value: String },
    /// Run the microtasks and the macrotasks due now.
    Tick,
    /// Run until both queues are empty.
    Flush,
    Snapshot {
        #[serde(default)]
        label: Option<String>,
    },
}
