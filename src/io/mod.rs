pub mod format;
pub mod input;
pub mod output;

pub use format::DocumentFormat;
pub use input::{
    options_from_str, options_from_value, parse_document_any, parse_document_str,
    scenario_from_str, scenario_from_value,
};
pub use output::{OutputDestination, OutputOptions, emit, render};
