use indexmap::IndexMap;
use regex::Regex;
use serde::Serialize;

/// Native constraint validation flags of an `<input>`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidityState {
    pub value_missing: bool,
    pub bad_input: bool,
    pub pattern_mismatch: bool,
    pub too_long: bool,
    pub too_short: bool,
    pub range_underflow: bool,
    pub range_overflow: bool,
}

impl ValidityState {
    pub fn valid(&self) -> bool {
        !(self.value_missing
            || self.bad_input
            || self.pattern_mismatch
            || self.too_long
            || self.too_short
            || self.range_underflow
            || self.range_overflow)
    }
}

pub(crate) fn is_number_type(attributes: &IndexMap<String, String>) -> bool {
    attributes
        .get("type")
        .is_some_and(|ty| ty.eq_ignore_ascii_case("number"))
}

pub(crate) fn parse_finite(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Value sanitization: number inputs expose `""` for anything unparsable.
pub(crate) fn sanitize(raw: &str, attributes: &IndexMap<String, String>) -> String {
    if is_number_type(attributes) && parse_finite(raw).is_none() {
        return String::new();
    }
    raw.to_string()
}

pub(crate) fn evaluate(raw: &str, attributes: &IndexMap<String, String>) -> ValidityState {
    // Disabled controls are barred from constraint validation.
    if attributes.contains_key("disabled") {
        return ValidityState::default();
    }

    let number = is_number_type(attributes);
    let value = sanitize(raw, attributes);
    let mut state = ValidityState {
        bad_input: number && !raw.trim().is_empty() && value.is_empty(),
        ..ValidityState::default()
    };

    if value.is_empty() {
        state.value_missing = attributes.contains_key("required") && !state.bad_input;
        return state;
    }

    if number {
        if let Some(current) = parse_finite(&value) {
            let bound = |name: &str| attributes.get(name).and_then(|raw| parse_finite(raw));
            state.range_underflow = bound("min").is_some_and(|min| current < min);
            state.range_overflow = bound("max").is_some_and(|max| current > max);
        }
        return state;
    }

    let length = value.chars().count();
    let limit = |name: &str| {
        attributes
            .get(name)
            .and_then(|raw| raw.trim().parse::<usize>().ok())
    };
    state.too_long = limit("maxlength").is_some_and(|max| length > max);
    state.too_short = limit("minlength").is_some_and(|min| length < min);

    if let Some(pattern) = attributes.get("pattern") {
        // An uncompilable pattern is ignored, as browsers do.
        if let Ok(regex) = Regex::new(&format!("^(?:{pattern})$")) {
            state.pattern_mismatch = !regex.is_match(&value);
        }
    }

    state
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs(pairs: &[(&str, &str)]) -> IndexMap<String, String> {
        pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect()
    }

    #[test]
    fn required_empty_value_is_missing() {
        let state = evaluate("", &attrs(&[("required", "")]));
        assert!(state.value_missing);
        assert!(!state.valid());
    }

    #[test]
    fn unparsable_number_is_bad_input_not_missing() {
        let attributes = attrs(&[("type", "number"), ("required", "")]);
        let state = evaluate("12abc", &attributes);
        assert!(state.bad_input);
        assert!(!state.value_missing);
        assert_eq!(sanitize("12abc", &attributes), "");
    }

    #[test]
    fn pattern_must_match_the_whole_value() {
        let attributes = attrs(&[("pattern", "[a-z]+")]);
        assert!(evaluate("abc", &attributes).valid());
        assert!(evaluate("abc1", &attributes).pattern_mismatch);
        assert!(evaluate("abc", &attrs(&[("pattern", "[")])).valid());
    }

    #[test]
    fn disabled_inputs_are_always_valid() {
        let state = evaluate("", &attrs(&[("required", ""), ("disabled", "")]));
        assert!(state.valid());
    }

    #[test]
    fn number_range_and_text_length_limits() {
        let numbers = attrs(&[("type", "number"), ("min", "1"), ("max", "10")]);
        assert!(evaluate("0", &numbers).range_underflow);
        assert!(evaluate("11", &numbers).range_overflow);
        assert!(evaluate("5", &numbers).valid());

        let text = attrs(&[("minlength", "2"), ("maxlength", "4")]);
        assert!(evaluate("a", &text).too_short);
        assert!(evaluate("abcde", &text).too_long);
    }
}
