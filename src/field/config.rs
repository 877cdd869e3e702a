use std::sync::atomic::{AtomicU64, Ordering};

use super::value::{FieldValue, InputType};

static NEXT_UID: AtomicU64 = AtomicU64::new(0);

/// Process-wide fallback id, `<prefix>-<n>`.
pub fn next_uid(prefix: &str) -> String {
    let n = NEXT_UID.fetch_add(1, Ordering::Relaxed);
    format!("{prefix}-{n}")
}

/// Configuration staged on the host before and after attach. The template
/// renders from it and the foundation is seeded from it on attach.
#[derive(Debug, Clone)]
pub struct FieldConfig {
    pub uid: String,
    pub id: Option<String>,
    pub input_type: InputType,
    pub label: Option<String>,
    pub placeholder: Option<String>,
    pub tab_index: i32,
    pub maxlength: Option<u32>,
    pub minlength: Option<u32>,
    pub pattern: Option<String>,
    pub max: Option<f64>,
    pub min: Option<f64>,
    pub size: Option<u32>,
    pub step: Option<f64>,
    pub outlined: bool,
    pub disabled: bool,
    pub required: bool,
    pub fullwidth: bool,
    pub dense: bool,
    pub use_native_validation: bool,
    pub valid: Option<bool>,
    pub value: FieldValue,
}

impl FieldConfig {
    pub fn new(uid: String) -> Self {
        Self {
            uid,
            id: None,
            input_type: InputType::Text,
            label: None,
            placeholder: None,
            tab_index: 0,
            maxlength: None,
            minlength: None,
            pattern: None,
            max: None,
            min: None,
            size: None,
            step: None,
            outlined: false,
            disabled: false,
            required: false,
            fullwidth: false,
            dense: false,
            use_native_validation: true,
            valid: None,
            value: FieldValue::Null,
        }
    }

    /// Explicit id, or the generated one when unset or empty.
    pub fn id(&self) -> &str {
        match self.id.as_deref() {
            Some(id) if !id.is_empty() => id,
            _ => &self.uid,
        }
    }

    pub fn placeholder(&self) -> &str {
        self.placeholder.as_deref().unwrap_or("")
    }

    pub fn label(&self) -> &str {
        self.label.as_deref().unwrap_or("")
    }

    /// The floating label is rendered only without a placeholder.
    pub fn has_label(&self) -> bool {
        self.placeholder().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_unique_and_prefixed() {
        let first = next_uid("field");
        let second = next_uid("field");
        assert!(first.starts_with("field-"));
        assert_ne!(first, second);
    }

    #[test]
    fn empty_explicit_id_falls_back_to_uid() {
        let mut config = FieldConfig::new("field-99".into());
        config.id = Some(String::new());
        assert_eq!(config.id(), "field-99");
        config.id = Some("email".into());
        assert_eq!(config.id(), "email");
    }
}
