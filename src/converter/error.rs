use thiserror::Error;

/// Failure to read a markup document
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("malformed markup: {0}")]
    MalformedMarkup(String),

    #[error("markup is nested deeper than {limit} levels")]
    TooDeep { limit: usize },
}

/// Failure while converting a single form
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConvertError {
    #[error("element '{element}' has no component type")]
    MissingKind { element: String },

    #[error("cannot derive a component name from '{source_name}'")]
    InvalidComponentName { source_name: String },

    #[error("element '{element}' is nested deeper than {limit} levels")]
    TooDeep { element: String, limit: usize },
}
