use std::fmt;
use std::str::FromStr;

use serde_json::{Number, Value};

use super::error::FieldError;

/// Value held by a text field.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum FieldValue {
    #[default]
    Null,
    Text(String),
    Number(f64),
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// `null`, empty text and numeric zero count as "no value" for the
    /// required re-arm and the outline notch.
    pub fn is_falsy(&self) -> bool {
        match self {
            FieldValue::Null => true,
            FieldValue::Text(text) => text.is_empty(),
            FieldValue::Number(number) => *number == 0.0 || number.is_nan(),
        }
    }

    pub fn is_truthy(&self) -> bool {
        !self.is_falsy()
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(number) => Some(*number),
            _ => None,
        }
    }

    /// Text written into the native input for this value.
    pub fn to_native(&self) -> String {
        match self {
            FieldValue::Null => String::new(),
            FieldValue::Text(text) => text.clone(),
            FieldValue::Number(number) => number.to_string(),
        }
    }

    /// Coerce according to the input type. Number fields only ever hold
    /// `Null` or a finite number; anything unparsable becomes `Null`.
    pub fn coerce(self, input_type: InputType) -> FieldValue {
        if input_type != InputType::Number {
            return self;
        }
        match self {
            FieldValue::Null => FieldValue::Null,
            FieldValue::Number(number) if number.is_finite() => FieldValue::Number(number),
            FieldValue::Number(_) => FieldValue::Null,
            FieldValue::Text(text) => parse_number(&text)
                .map(FieldValue::Number)
                .unwrap_or(FieldValue::Null),
        }
    }

    /// Form-model values: `null` becomes empty text, strings and numbers map
    /// directly, everything else is stringified.
    pub fn from_model(value: &Value) -> FieldValue {
        match value {
            Value::Null => FieldValue::Text(String::new()),
            Value::String(text) => FieldValue::Text(text.clone()),
            Value::Number(number) => number
                .as_f64()
                .map(FieldValue::Number)
                .unwrap_or_else(|| FieldValue::Text(number.to_string())),
            Value::Bool(flag) => FieldValue::Text(flag.to_string()),
            other => FieldValue::Text(other.to_string()),
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            FieldValue::Null => Value::Null,
            FieldValue::Text(text) => Value::String(text.clone()),
            FieldValue::Number(number) => Number::from_f64(*number)
                .map(Value::Number)
                .unwrap_or(Value::Null),
        }
    }
}

fn parse_number(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|number| number.is_finite())
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Number(value as f64)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(FieldValue::Null)
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Null => write!(f, "null"),
            FieldValue::Text(text) => write!(f, "{text}"),
            FieldValue::Number(number) => write!(f, "{number}"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum InputType {
    #[default]
    Text,
    Number,
    Email,
    Password,
    Search,
    Tel,
    Url,
}

impl InputType {
    pub fn as_str(self) -> &'static str {
        match self {
            InputType::Text => "text",
            InputType::Number => "number",
            InputType::Email => "email",
            InputType::Password => "password",
            InputType::Search => "search",
            InputType::Tel => "tel",
            InputType::Url => "url",
        }
    }
}

impl FromStr for InputType {
    type Err = FieldError;

    /// Empty names fall back to `text`.
    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let normalized = name.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "" | "text" => Ok(InputType::Text),
            "number" => Ok(InputType::Number),
            "email" => Ok(InputType::Email),
            "password" => Ok(InputType::Password),
            "search" => Ok(InputType::Search),
            "tel" => Ok(InputType::Tel),
            "url" => Ok(InputType::Url),
            _ => Err(FieldError::UnknownInputType(name.to_string())),
        }
    }
}

impl fmt::Display for InputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn number_coercion_never_yields_nan_or_empty_text() {
        let cases = [
            ("", FieldValue::Null),
            ("42", FieldValue::Number(42.0)),
            (" -3.5 ", FieldValue::Number(-3.5)),
            ("abc", FieldValue::Null),
            ("NaN", FieldValue::Null),
            ("inf", FieldValue::Null),
        ];
        for (raw, expected) in cases {
            assert_eq!(FieldValue::from(raw).coerce(InputType::Number), expected, "{raw:?}");
        }
        assert_eq!(
            FieldValue::Number(f64::NAN).coerce(InputType::Number),
            FieldValue::Null
        );
    }

    #[test]
    fn text_fields_keep_values_untouched() {
        assert_eq!(
            FieldValue::from("").coerce(InputType::Text),
            FieldValue::Text(String::new())
        );
        assert_eq!(
            FieldValue::Number(7.0).coerce(InputType::Email),
            FieldValue::Number(7.0)
        );
    }

    #[test]
    fn falsy_values_match_the_required_rearm_rule() {
        assert!(FieldValue::Null.is_falsy());
        assert!(FieldValue::from("").is_falsy());
        assert!(FieldValue::Number(0.0).is_falsy());
        assert!(FieldValue::from("0").is_truthy());
        assert!(FieldValue::Number(1.0).is_truthy());
    }

    #[test]
    fn model_values_map_onto_field_values() {
        assert_eq!(FieldValue::from_model(&json!(null)), FieldValue::from(""));
        assert_eq!(FieldValue::from_model(&json!(3)), FieldValue::Number(3.0));
        assert_eq!(FieldValue::from_model(&json!(true)), FieldValue::from("true"));
        assert_eq!(FieldValue::Number(2.5).to_json(), json!(2.5));
        assert_eq!(FieldValue::Null.to_json(), json!(null));
    }

    #[test]
    fn input_type_names() {
        assert_eq!("".parse::<InputType>(), Ok(InputType::Text));
        assert_eq!("NUMBER".parse::<InputType>(), Ok(InputType::Number));
        assert!(matches!(
            "checkbox".parse::<InputType>(),
            Err(FieldError::UnknownInputType(name)) if name == "checkbox"
        ));
    }
}
