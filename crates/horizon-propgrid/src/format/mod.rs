//! Value formatters.
//!
//! A formatter converts between a row's native [`PropValue`] and the text an
//! editor shows, and decides which text is acceptable. The set of formatter
//! kinds is closed: [`Formatter`] is an enum, and each variant maps to exactly
//! one default editor through [`Formatter::default_editor`]. New value types
//! are added as new variants.
//!
//! Formatters are immutable after construction and shared between rows as
//! `Arc<Formatter>`.
//!
//! # Example
//!
//! ```
//! use horizon_propgrid::format::{Formatter, ValueFormat};
//! use horizon_propgrid::PropValue;
//!
//! let f = Formatter::int_range(0, 10);
//! assert!(f.validate("7"));
//! assert!(!f.validate("70"));
//! assert_eq!(f.coerce("7").unwrap(), PropValue::Int(7));
//! assert_eq!(f.format(&PropValue::Int(7)).unwrap(), "7");
//! ```

mod choice;
mod datetime;
mod misc;
mod numeric;

use std::fmt;

pub use choice::{BoolFormatter, ChoiceFormatter, EnumFormatter};
pub use datetime::{
    DATE_PATTERN, DATETIME_PATTERN, DateFormatter, DateTimeFormatter, TIME_PATTERN, TimeFormatter,
};
pub use misc::{ColorFormatter, FontFormatter, PathFormatter, PathKind};
pub use numeric::{BinFormatter, FloatFormatter, HexFormatter, IntFormatter};

use crate::error::FormatError;
use crate::style::EditorKind;
use crate::value::PropValue;

/// One entry of a discrete-choice editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidValue {
    /// Stable key (the stored value's text, or the ordinal for enums).
    pub key: String,
    /// Text shown in the editor and accepted by `coerce`.
    pub label: String,
}

impl ValidValue {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
        }
    }
}

/// The value codec contract every formatter implements.
pub trait ValueFormat {
    /// Render a native value as editor text.
    fn format(&self, value: &PropValue) -> Result<String, FormatError>;

    /// Parse editor text into a native value.
    fn coerce(&self, text: &str) -> Result<PropValue, FormatError>;

    /// Whether `coerce` would accept `text`.
    fn validate(&self, text: &str) -> bool {
        self.coerce(text).is_ok()
    }

    /// The allowed entries, for formatters backed by a discrete set.
    fn valid_values(&self) -> Option<Vec<ValidValue>> {
        None
    }
}

/// Tag naming a formatter variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatterKind {
    Int,
    Hex,
    Bin,
    Float,
    Bool,
    Enum,
    Choice,
    File,
    Folder,
    Color,
    Font,
    Date,
    Time,
    DateTime,
}

impl fmt::Display for FormatterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FormatterKind::Int => "integer",
            FormatterKind::Hex => "hexadecimal",
            FormatterKind::Bin => "binary",
            FormatterKind::Float => "float",
            FormatterKind::Bool => "boolean",
            FormatterKind::Enum => "enum",
            FormatterKind::Choice => "choice",
            FormatterKind::File => "file path",
            FormatterKind::Folder => "folder path",
            FormatterKind::Color => "color",
            FormatterKind::Font => "font",
            FormatterKind::Date => "date",
            FormatterKind::Time => "time",
            FormatterKind::DateTime => "date-time",
        };
        f.write_str(name)
    }
}

/// A formatter of any supported kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Formatter {
    Int(IntFormatter),
    Hex(HexFormatter),
    Bin(BinFormatter),
    Float(FloatFormatter),
    Bool(BoolFormatter),
    Enum(EnumFormatter),
    Choice(ChoiceFormatter),
    Path(PathFormatter),
    Color(ColorFormatter),
    Font(FontFormatter),
    Date(DateFormatter),
    Time(TimeFormatter),
    DateTime(DateTimeFormatter),
}

impl Formatter {
    pub fn int() -> Self {
        Formatter::Int(IntFormatter::new())
    }

    pub fn int_range(min: i64, max: i64) -> Self {
        Formatter::Int(IntFormatter::with_range(min, max))
    }

    pub fn hex() -> Self {
        Formatter::Hex(HexFormatter)
    }

    pub fn bin() -> Self {
        Formatter::Bin(BinFormatter)
    }

    pub fn float() -> Self {
        Formatter::Float(FloatFormatter::new())
    }

    pub fn bool() -> Self {
        Formatter::Bool(BoolFormatter)
    }

    pub fn enumeration<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Formatter::Enum(EnumFormatter::new(names))
    }

    pub fn choice<I, S, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, V)>,
        S: Into<String>,
        V: Into<PropValue>,
    {
        Formatter::Choice(ChoiceFormatter::from_pairs(pairs))
    }

    pub fn choice_values<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<PropValue>,
    {
        Formatter::Choice(ChoiceFormatter::from_values(values))
    }

    pub fn file() -> Self {
        Formatter::Path(PathFormatter::file())
    }

    pub fn folder() -> Self {
        Formatter::Path(PathFormatter::folder())
    }

    pub fn color() -> Self {
        Formatter::Color(ColorFormatter)
    }

    pub fn font() -> Self {
        Formatter::Font(FontFormatter)
    }

    pub fn date() -> Self {
        Formatter::Date(DateFormatter::new())
    }

    pub fn time() -> Self {
        Formatter::Time(TimeFormatter::new())
    }

    pub fn datetime() -> Self {
        Formatter::DateTime(DateTimeFormatter::new())
    }

    pub fn kind(&self) -> FormatterKind {
        match self {
            Formatter::Int(_) => FormatterKind::Int,
            Formatter::Hex(_) => FormatterKind::Hex,
            Formatter::Bin(_) => FormatterKind::Bin,
            Formatter::Float(_) => FormatterKind::Float,
            Formatter::Bool(_) => FormatterKind::Bool,
            Formatter::Enum(_) => FormatterKind::Enum,
            Formatter::Choice(_) => FormatterKind::Choice,
            Formatter::Path(p) => match p.kind {
                PathKind::File => FormatterKind::File,
                PathKind::Folder => FormatterKind::Folder,
            },
            Formatter::Color(_) => FormatterKind::Color,
            Formatter::Font(_) => FormatterKind::Font,
            Formatter::Date(_) => FormatterKind::Date,
            Formatter::Time(_) => FormatterKind::Time,
            Formatter::DateTime(_) => FormatterKind::DateTime,
        }
    }

    /// The editor used when a row's control style is `Default`.
    pub fn default_editor(&self) -> EditorKind {
        match self.kind() {
            FormatterKind::Enum | FormatterKind::Choice => EditorKind::Dropdown,
            FormatterKind::Bool => EditorKind::CheckBox,
            FormatterKind::File => EditorKind::FilePicker,
            FormatterKind::Folder => EditorKind::FolderPicker,
            FormatterKind::Color => EditorKind::ColorPicker,
            FormatterKind::Font => EditorKind::FontPicker,
            FormatterKind::Date => EditorKind::DatePicker,
            FormatterKind::Time => EditorKind::TimePicker,
            FormatterKind::Int
            | FormatterKind::Hex
            | FormatterKind::Bin
            | FormatterKind::Float
            | FormatterKind::DateTime => EditorKind::TextBox,
        }
    }

    /// Integer bounds for slider and spin editors.
    pub fn int_bounds(&self) -> Option<(i64, i64)> {
        match self {
            Formatter::Int(f) => Some(f.bounds()),
            _ => None,
        }
    }

    fn codec(&self) -> &dyn ValueFormat {
        match self {
            Formatter::Int(f) => f,
            Formatter::Hex(f) => f,
            Formatter::Bin(f) => f,
            Formatter::Float(f) => f,
            Formatter::Bool(f) => f,
            Formatter::Enum(f) => f,
            Formatter::Choice(f) => f,
            Formatter::Path(f) => f,
            Formatter::Color(f) => f,
            Formatter::Font(f) => f,
            Formatter::Date(f) => f,
            Formatter::Time(f) => f,
            Formatter::DateTime(f) => f,
        }
    }
}

impl ValueFormat for Formatter {
    /// Text values pass through unchanged so callers can hand raw editor text
    /// to `set_value`; it is validated and coerced there.
    fn format(&self, value: &PropValue) -> Result<String, FormatError> {
        match value {
            PropValue::Text(s) => Ok(s.clone()),
            PropValue::Empty => Ok(String::new()),
            other => self.codec().format(other),
        }
    }

    fn coerce(&self, text: &str) -> Result<PropValue, FormatError> {
        self.codec().coerce(text)
    }

    fn validate(&self, text: &str) -> bool {
        self.codec().validate(text)
    }

    fn valid_values(&self) -> Option<Vec<ValidValue>> {
        self.codec().valid_values()
    }
}
