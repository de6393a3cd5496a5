//! Typed property values.

use std::fmt;
use std::path::PathBuf;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use horizon_propgrid_core::{Color, FontDesc};

/// The native value stored in a row.
///
/// Formatters convert between these and the text shown in editors. `Text` is
/// also what a row without a formatter stores.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum PropValue {
    #[default]
    Empty,
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Color(Color),
    Font(FontDesc),
    Date(NaiveDate),
    Time(NaiveTime),
    DateTime(NaiveDateTime),
    Path(PathBuf),
}

impl PropValue {
    /// Short name of the variant, for diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            PropValue::Empty => "empty",
            PropValue::Text(_) => "text",
            PropValue::Int(_) => "int",
            PropValue::Float(_) => "float",
            PropValue::Bool(_) => "bool",
            PropValue::Color(_) => "color",
            PropValue::Font(_) => "font",
            PropValue::Date(_) => "date",
            PropValue::Time(_) => "time",
            PropValue::DateTime(_) => "datetime",
            PropValue::Path(_) => "path",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            PropValue::Int(n) => Some(*n),
            PropValue::Bool(b) => Some(i64::from(*b)),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            PropValue::Float(f) => Some(*f),
            PropValue::Int(n) => Some(*n as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropValue::Bool(b) => Some(*b),
            PropValue::Int(n) => Some(*n != 0),
            _ => None,
        }
    }

    pub fn as_color(&self) -> Option<Color> {
        match self {
            PropValue::Color(c) => Some(*c),
            PropValue::Text(s) => Color::from_hex(s),
            _ => None,
        }
    }

    pub fn as_font(&self) -> Option<FontDesc> {
        match self {
            PropValue::Font(f) => Some(f.clone()),
            PropValue::Text(s) => s.parse().ok(),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, PropValue::Empty)
    }
}

impl fmt::Display for PropValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropValue::Empty => Ok(()),
            PropValue::Text(s) => f.write_str(s),
            PropValue::Int(n) => write!(f, "{n}"),
            PropValue::Float(v) => write!(f, "{v}"),
            PropValue::Bool(b) => write!(f, "{b}"),
            PropValue::Color(c) => write!(f, "{c}"),
            PropValue::Font(font) => write!(f, "{font}"),
            PropValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            PropValue::Time(t) => write!(f, "{}", t.format("%H:%M:%S")),
            PropValue::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
            PropValue::Path(p) => write!(f, "{}", p.display()),
        }
    }
}

impl From<&str> for PropValue {
    fn from(s: &str) -> Self {
        PropValue::Text(s.to_string())
    }
}

impl From<String> for PropValue {
    fn from(s: String) -> Self {
        PropValue::Text(s)
    }
}

impl From<i64> for PropValue {
    fn from(n: i64) -> Self {
        PropValue::Int(n)
    }
}

impl From<i32> for PropValue {
    fn from(n: i32) -> Self {
        PropValue::Int(n.into())
    }
}

impl From<u32> for PropValue {
    fn from(n: u32) -> Self {
        PropValue::Int(n.into())
    }
}

impl From<f64> for PropValue {
    fn from(v: f64) -> Self {
        PropValue::Float(v)
    }
}

impl From<bool> for PropValue {
    fn from(b: bool) -> Self {
        PropValue::Bool(b)
    }
}

impl From<Color> for PropValue {
    fn from(c: Color) -> Self {
        PropValue::Color(c)
    }
}

impl From<FontDesc> for PropValue {
    fn from(f: FontDesc) -> Self {
        PropValue::Font(f)
    }
}

impl From<NaiveDate> for PropValue {
    fn from(d: NaiveDate) -> Self {
        PropValue::Date(d)
    }
}

impl From<NaiveTime> for PropValue {
    fn from(t: NaiveTime) -> Self {
        PropValue::Time(t)
    }
}

impl From<NaiveDateTime> for PropValue {
    fn from(dt: NaiveDateTime) -> Self {
        PropValue::DateTime(dt)
    }
}

impl From<PathBuf> for PropValue {
    fn from(p: PathBuf) -> Self {
        PropValue::Path(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_generic() {
        assert_eq!(PropValue::Empty.to_string(), "");
        assert_eq!(PropValue::from(42).to_string(), "42");
        assert_eq!(PropValue::from(2.5).to_string(), "2.5");
        assert_eq!(PropValue::from(true).to_string(), "true");
        assert_eq!(PropValue::from(Color::from_rgb8(1, 2, 3)).to_string(), "#010203");
        let d = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert_eq!(PropValue::from(d).to_string(), "2024-02-29");
    }

    #[test]
    fn test_accessors() {
        assert_eq!(PropValue::from(3).as_int(), Some(3));
        assert_eq!(PropValue::from(true).as_int(), Some(1));
        assert_eq!(PropValue::from(3).as_float(), Some(3.0));
        assert_eq!(PropValue::from("x").as_int(), None);
        assert_eq!(PropValue::from("#FF0000").as_color(), Some(Color::from_rgb8(255, 0, 0)));
    }
}
