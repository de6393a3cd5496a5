//! Error types for the core crate.

use thiserror::Error;

/// A string could not be parsed as a [`Color`](crate::Color).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid color '{0}': expected #RRGGBB or #RRGGBBAA")]
pub struct ParseColorError(pub String);

/// A string could not be parsed as a [`FontDesc`](crate::FontDesc).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid font descriptor '{0}': expected '<family> <size> [bold] [italic] [underline]'")]
pub struct ParseFontError(pub String);
