use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("text field `{id}` is already attached")]
    AlreadyAttached { id: String },
    #[error("text field `{id}` was destroyed and cannot be attached again")]
    Destroyed { id: String },
    #[error("unsupported input type `{0}`")]
    UnknownInputType(String),
}
