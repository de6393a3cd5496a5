//! Integer, hexadecimal, binary and floating-point formatters.

use std::sync::LazyLock;

use regex::Regex;

use super::{FormatterKind, ValueFormat};
use crate::error::FormatError;
use crate::value::PropValue;

static HEX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(-)?(?:0[xX])?([0-9a-fA-F]+)\s*$").expect("hex pattern is valid")
});

static BIN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(-)?(?:0[bB])?([01]+)\s*$").expect("binary pattern is valid"));

fn check_range<T: PartialOrd + ToString>(
    value: T,
    min: Option<T>,
    max: Option<T>,
    render: impl Fn(Option<T>) -> String,
) -> Result<T, FormatError>
where
    T: Copy,
{
    let below = min.is_some_and(|m| value < m);
    let above = max.is_some_and(|m| value > m);
    if below || above {
        return Err(FormatError::OutOfRange {
            value: value.to_string(),
            min: render(min),
            max: render(max),
        });
    }
    Ok(value)
}

fn bound_str<T: ToString>(b: Option<T>) -> String {
    b.map(|v| v.to_string()).unwrap_or_else(|| "*".to_string())
}

fn int_of(kind: FormatterKind, value: &PropValue) -> Result<i64, FormatError> {
    match value {
        PropValue::Int(n) => Ok(*n),
        PropValue::Bool(b) => Ok(i64::from(*b)),
        other => Err(FormatError::TypeMismatch {
            kind,
            found: other.type_name(),
        }),
    }
}

fn parse_radix(
    re: &Regex,
    radix: u32,
    kind: FormatterKind,
    text: &str,
) -> Result<i64, FormatError> {
    let invalid = || FormatError::Invalid {
        kind,
        input: text.to_string(),
    };
    let caps = re.captures(text).ok_or_else(invalid)?;
    let digits = caps.get(2).map(|m| m.as_str()).ok_or_else(invalid)?;
    let magnitude = i64::from_str_radix(digits, radix).map_err(|_| invalid())?;
    Ok(if caps.get(1).is_some() {
        -magnitude
    } else {
        magnitude
    })
}

/// Decimal integers with optional inclusive bounds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntFormatter {
    pub min: Option<i64>,
    pub max: Option<i64>,
}

impl IntFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_range(min: i64, max: i64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }

    /// Bounds for slider and spin editors. Missing bounds default to 0 and 100.
    pub fn bounds(&self) -> (i64, i64) {
        (self.min.unwrap_or(0), self.max.unwrap_or(100))
    }
}

impl ValueFormat for IntFormatter {
    fn format(&self, value: &PropValue) -> Result<String, FormatError> {
        int_of(FormatterKind::Int, value).map(|n| n.to_string())
    }

    fn coerce(&self, text: &str) -> Result<PropValue, FormatError> {
        let n: i64 = text.trim().parse().map_err(|_| FormatError::Invalid {
            kind: FormatterKind::Int,
            input: text.to_string(),
        })?;
        check_range(n, self.min, self.max, bound_str).map(PropValue::Int)
    }
}

/// Integers shown as `0x1F`. Input may omit the prefix.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HexFormatter;

impl ValueFormat for HexFormatter {
    fn format(&self, value: &PropValue) -> Result<String, FormatError> {
        let n = int_of(FormatterKind::Hex, value)?;
        Ok(if n < 0 {
            format!("-0x{:X}", n.unsigned_abs())
        } else {
            format!("0x{n:X}")
        })
    }

    fn coerce(&self, text: &str) -> Result<PropValue, FormatError> {
        parse_radix(&HEX_RE, 16, FormatterKind::Hex, text).map(PropValue::Int)
    }
}

/// Integers shown as `0b101`. Input may omit the prefix.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BinFormatter;

impl ValueFormat for BinFormatter {
    fn format(&self, value: &PropValue) -> Result<String, FormatError> {
        let n = int_of(FormatterKind::Bin, value)?;
        Ok(if n < 0 {
            format!("-0b{:b}", n.unsigned_abs())
        } else {
            format!("0b{n:b}")
        })
    }

    fn coerce(&self, text: &str) -> Result<PropValue, FormatError> {
        parse_radix(&BIN_RE, 2, FormatterKind::Bin, text).map(PropValue::Int)
    }
}

/// Finite floating-point numbers with optional bounds.
///
/// Without a precision the shortest text that parses back to the same value
/// is produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FloatFormatter {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub precision: Option<usize>,
}

impl FloatFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_range(min: f64, max: f64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
            precision: None,
        }
    }

    pub fn precision(mut self, digits: usize) -> Self {
        self.precision = Some(digits);
        self
    }
}

impl ValueFormat for FloatFormatter {
    fn format(&self, value: &PropValue) -> Result<String, FormatError> {
        let v = match value {
            PropValue::Float(v) => *v,
            PropValue::Int(n) => *n as f64,
            other => {
                return Err(FormatError::TypeMismatch {
                    kind: FormatterKind::Float,
                    found: other.type_name(),
                });
            }
        };
        Ok(match self.precision {
            Some(digits) => format!("{v:.digits$}"),
            None => v.to_string(),
        })
    }

    fn coerce(&self, text: &str) -> Result<PropValue, FormatError> {
        let invalid = || FormatError::Invalid {
            kind: FormatterKind::Float,
            input: text.to_string(),
        };
        let v: f64 = text.trim().parse().map_err(|_| invalid())?;
        if !v.is_finite() {
            return Err(invalid());
        }
        check_range(v, self.min, self.max, bound_str).map(PropValue::Float)
    }
}
