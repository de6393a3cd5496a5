//! Error types for the property grid.

use thiserror::Error;

use crate::format::FormatterKind;

/// A value could not be validated, formatted or coerced.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormatError {
    /// The text is not a well-formed value of the formatter's type.
    #[error("'{input}' is not a valid {kind} value")]
    Invalid { kind: FormatterKind, input: String },

    /// The text parsed but lies outside the configured bounds.
    #[error("{value} is outside the allowed range {min}..={max}")]
    OutOfRange {
        value: String,
        min: String,
        max: String,
    },

    /// The text is not one of the labels of a choice or enum formatter.
    #[error("'{0}' is not one of the allowed choices")]
    UnknownChoice(String),

    /// The stored value has a type the formatter cannot render.
    #[error("{kind} formatter cannot format a {found} value")]
    TypeMismatch {
        kind: FormatterKind,
        found: &'static str,
    },

    /// A date or time failed to parse with the configured pattern.
    #[error("invalid date/time '{input}': {source}")]
    DateTime {
        input: String,
        #[source]
        source: chrono::ParseError,
    },

    /// The strftime pattern itself is malformed.
    #[error("invalid date/time pattern '{0}'")]
    Pattern(String),
}

/// An unknown control-style name was passed to `set_control_style`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown control style '{0}'")]
pub struct StyleError(pub String);

/// A call into the host toolkit failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    /// The toolkit could not create the requested editor.
    #[error("failed to create {kind} editor: {reason}")]
    EditorCreation { kind: String, reason: String },

    /// The editor was destroyed before the call reached it.
    #[error("editor {0} no longer exists")]
    EditorGone(u64),
}

/// Errors surfaced by grid-level operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PropGridError {
    #[error(transparent)]
    Format(#[from] FormatError),

    #[error(transparent)]
    Style(#[from] StyleError),

    #[error(transparent)]
    Host(#[from] HostError),

    /// No row matches the given key.
    #[error("no property matches {0}")]
    NotFound(String),

    /// Configuration text could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl From<toml::de::Error> for PropGridError {
    fn from(err: toml::de::Error) -> Self {
        PropGridError::Config(err.to_string())
    }
}

/// Result type for grid operations.
pub type PropGridResult<T> = Result<T, PropGridError>;
