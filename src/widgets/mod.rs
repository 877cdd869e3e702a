//! Companion widgets of the text field. Each one is an imperative proxy over
//! its own element; none of them owns a state machine.

pub mod floating_label;
pub mod helper_text;
pub mod icon;
pub mod line_ripple;
pub mod notched_outline;
pub mod ripple;

pub use floating_label::FloatingLabel;
pub use helper_text::{HelperText, HelperTextFoundation};
pub use icon::{IconFoundation, TextFieldIcon};
pub use line_ripple::LineRipple;
pub use notched_outline::NotchedOutline;
pub use ripple::Ripple;
