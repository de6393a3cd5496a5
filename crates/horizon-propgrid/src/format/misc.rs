//! Path, color and font formatters.

use std::path::PathBuf;

use horizon_propgrid_core::{Color, FontDesc};

use super::{FormatterKind, ValueFormat};
use crate::error::FormatError;
use crate::value::PropValue;

/// Whether a path row picks files or folders.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PathKind {
    #[default]
    File,
    Folder,
}

/// Filesystem paths. Existence is not checked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathFormatter {
    pub kind: PathKind,
}

impl PathFormatter {
    pub fn file() -> Self {
        Self {
            kind: PathKind::File,
        }
    }

    pub fn folder() -> Self {
        Self {
            kind: PathKind::Folder,
        }
    }

    fn formatter_kind(&self) -> FormatterKind {
        match self.kind {
            PathKind::File => FormatterKind::File,
            PathKind::Folder => FormatterKind::Folder,
        }
    }
}

impl ValueFormat for PathFormatter {
    fn format(&self, value: &PropValue) -> Result<String, FormatError> {
        match value {
            PropValue::Path(p) => Ok(p.display().to_string()),
            other => Err(FormatError::TypeMismatch {
                kind: self.formatter_kind(),
                found: other.type_name(),
            }),
        }
    }

    fn coerce(&self, text: &str) -> Result<PropValue, FormatError> {
        if text.contains('\0') {
            return Err(FormatError::Invalid {
                kind: self.formatter_kind(),
                input: text.replace('\0', "\\0"),
            });
        }
        Ok(PropValue::Path(PathBuf::from(text)))
    }
}

/// Colors as `#RRGGBB` (or `#RRGGBBAA` when translucent).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColorFormatter;

impl ValueFormat for ColorFormatter {
    fn format(&self, value: &PropValue) -> Result<String, FormatError> {
        match value {
            PropValue::Color(c) => Ok(c.to_hex()),
            other => Err(FormatError::TypeMismatch {
                kind: FormatterKind::Color,
                found: other.type_name(),
            }),
        }
    }

    fn coerce(&self, text: &str) -> Result<PropValue, FormatError> {
        text.trim()
            .parse::<Color>()
            .map(PropValue::Color)
            .map_err(|_| FormatError::Invalid {
                kind: FormatterKind::Color,
                input: text.to_string(),
            })
    }
}

/// Fonts as a descriptor string such as `"DejaVu Sans 10 bold"`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FontFormatter;

impl ValueFormat for FontFormatter {
    fn format(&self, value: &PropValue) -> Result<String, FormatError> {
        match value {
            PropValue::Font(f) => Ok(f.to_string()),
            other => Err(FormatError::TypeMismatch {
                kind: FormatterKind::Font,
                found: other.type_name(),
            }),
        }
    }

    fn coerce(&self, text: &str) -> Result<PropValue, FormatError> {
        text.parse::<FontDesc>()
            .map(PropValue::Font)
            .map_err(|_| FormatError::Invalid {
                kind: FormatterKind::Font,
                input: text.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path() {
        let f = PathFormatter::folder();
        let v = f.coerce("/tmp/does/not/exist").unwrap();
        assert_eq!(v, PropValue::Path(PathBuf::from("/tmp/does/not/exist")));
        assert_eq!(f.format(&v).unwrap(), "/tmp/does/not/exist");
        assert!(!f.validate("bad\0path"));
    }

    #[test]
    fn test_color() {
        let f = ColorFormatter;
        let v = f.coerce("#00ff80").unwrap();
        assert_eq!(f.format(&v).unwrap(), "#00FF80");
        assert_eq!(f.coerce(&f.format(&v).unwrap()).unwrap(), v);
        assert!(!f.validate("green"));
    }

    #[test]
    fn test_font() {
        let f = FontFormatter;
        let v = f.coerce("Noto Serif 11 italic").unwrap();
        assert_eq!(f.format(&v).unwrap(), "Noto Serif 11 italic");
        assert!(!f.validate("Noto Serif"));
    }
}
