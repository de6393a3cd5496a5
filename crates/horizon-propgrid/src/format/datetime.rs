//! Date, time and date-time formatters backed by `chrono`.

use std::fmt::Write as _;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use super::{FormatterKind, ValueFormat};
use crate::error::FormatError;
use crate::value::PropValue;

/// Default pattern for dates.
pub const DATE_PATTERN: &str = "%Y-%m-%d";
/// Default pattern for times of day.
pub const TIME_PATTERN: &str = "%H:%M:%S";
/// Default pattern for date-times.
pub const DATETIME_PATTERN: &str = "%Y-%m-%d %H:%M:%S";

fn render(item: impl std::fmt::Display, pattern: &str) -> Result<String, FormatError> {
    let mut out = String::new();
    write!(out, "{item}").map_err(|_| FormatError::Pattern(pattern.to_string()))?;
    Ok(out)
}

fn mismatch(kind: FormatterKind, value: &PropValue) -> FormatError {
    FormatError::TypeMismatch {
        kind,
        found: value.type_name(),
    }
}

fn parse_err(text: &str) -> impl FnOnce(chrono::ParseError) -> FormatError + '_ {
    move |source| FormatError::DateTime {
        input: text.to_string(),
        source,
    }
}

macro_rules! chrono_formatter {
    ($(#[$doc:meta])* $name:ident, $native:ty, $variant:ident, $kind:ident, $default:expr) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub struct $name {
            pattern: String,
        }

        impl $name {
            pub fn new() -> Self {
                Self {
                    pattern: $default.to_string(),
                }
            }

            /// Use a custom strftime pattern.
            pub fn with_pattern(pattern: impl Into<String>) -> Self {
                Self {
                    pattern: pattern.into(),
                }
            }

            pub fn pattern(&self) -> &str {
                &self.pattern
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl ValueFormat for $name {
            fn format(&self, value: &PropValue) -> Result<String, FormatError> {
                match value {
                    PropValue::$variant(v) => render(v.format(&self.pattern), &self.pattern),
                    other => Err(mismatch(FormatterKind::$kind, other)),
                }
            }

            fn coerce(&self, text: &str) -> Result<PropValue, FormatError> {
                <$native>::parse_from_str(text.trim(), &self.pattern)
                    .map(PropValue::$variant)
                    .map_err(parse_err(text))
            }
        }
    };
}

chrono_formatter!(
    /// Calendar dates, `2024-02-29` by default.
    DateFormatter, NaiveDate, Date, Date, DATE_PATTERN
);
chrono_formatter!(
    /// Times of day, `13:05:00` by default.
    TimeFormatter, NaiveTime, Time, Time, TIME_PATTERN
);
chrono_formatter!(
    /// Date and time without zone, `2024-02-29 13:05:00` by default.
    DateTimeFormatter, NaiveDateTime, DateTime, DateTime, DATETIME_PATTERN
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_round_trip() {
        let f = DateFormatter::new();
        let d = PropValue::Date(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
        assert_eq!(f.format(&d).unwrap(), "2024-02-29");
        assert_eq!(f.coerce("2024-02-29").unwrap(), d);
        assert!(!f.validate("2023-02-29"));
    }

    #[test]
    fn test_time() {
        let f = TimeFormatter::new();
        assert_eq!(
            f.coerce("13:05:09").unwrap(),
            PropValue::Time(NaiveTime::from_hms_opt(13, 5, 9).unwrap())
        );
        assert!(!f.validate("25:00:00"));
    }

    #[test]
    fn test_datetime_custom_pattern() {
        let f = DateTimeFormatter::with_pattern("%d/%m/%Y %H:%M");
        let v = f.coerce("01/03/2025 08:30").unwrap();
        assert_eq!(f.format(&v).unwrap(), "01/03/2025 08:30");
    }

    #[test]
    fn test_mismatch() {
        assert!(matches!(
            DateFormatter::new().format(&PropValue::Int(3)),
            Err(FormatError::TypeMismatch { .. })
        ));
    }
}
