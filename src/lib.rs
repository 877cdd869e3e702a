#![deny(rust_2018_idioms)]

pub mod dom;
pub mod field;
pub mod io;
pub mod options;
pub mod runtime;
pub mod scenario;
pub mod widgets;

pub use dom::{Document, Element, Platform};
pub use field::{
    ControlValueAccessor, FieldError, FieldValue, Foundation, InputType, Lifecycle, TextField,
    TextFieldAdapter, TextFieldBuilder, TextFieldFoundation,
};
pub use io::{DocumentFormat, OutputDestination, OutputOptions, parse_document_str};
pub use options::TextFieldOptions;
pub use runtime::{EventLoop, SchedulerError};
pub use scenario::{Scenario, ScenarioReport, Step};

pub mod prelude {
    pub use super::{
        ControlValueAccessor, Document, EventLoop, FieldValue, InputType, TextField,
        TextFieldOptions,
    };
}

#[cfg(test)]
mod tests;
