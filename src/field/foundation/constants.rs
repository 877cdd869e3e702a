pub mod css_classes {
    pub const ROOT: &str = "mdc-text-field";
    pub const UPGRADED: &str = "mdc-text-field--upgraded";
    pub const DISABLED: &str = "mdc-text-field--disabled";
    pub const DENSE: &str = "mdc-text-field--dense";
    pub const FOCUSED: &str = "mdc-text-field--focused";
    pub const INVALID: &str = "mdc-text-field--invalid";
    pub const OUTLINED: &str = "mdc-text-field--outlined";
    pub const FULLWIDTH: &str = "mdc-text-field--fullwidth";
    pub const TEXTAREA: &str = "mdc-text-field--textarea";
    pub const WITH_LEADING_ICON: &str = "mdc-text-field--with-leading-icon";
    pub const WITH_TRAILING_ICON: &str = "mdc-text-field--with-trailing-icon";
    pub const INPUT: &str = "mdc-text-field__input";
}

/// Input attributes whose mutation re-styles the field as valid.
pub const VALIDATION_ATTR_WHITELIST: [&str; 7] = [
    "pattern",
    "min",
    "max",
    "required",
    "step",
    "minlength",
    "maxlength",
];

pub const LABEL_SCALE: f64 = 0.75;
pub const DENSE_LABEL_SCALE: f64 = 0.923;
