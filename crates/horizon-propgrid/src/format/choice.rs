//! Boolean and discrete-choice formatters.

use super::{FormatterKind, ValidValue, ValueFormat};
use crate::error::FormatError;
use crate::value::PropValue;

/// `true` / `false`. Also accepts `yes/no`, `on/off` and `1/0` on input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoolFormatter;

impl ValueFormat for BoolFormatter {
    fn format(&self, value: &PropValue) -> Result<String, FormatError> {
        value
            .as_bool()
            .map(|b| b.to_string())
            .ok_or_else(|| FormatError::TypeMismatch {
                kind: FormatterKind::Bool,
                found: value.type_name(),
            })
    }

    fn coerce(&self, text: &str) -> Result<PropValue, FormatError> {
        match text.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Ok(PropValue::Bool(true)),
            "false" | "no" | "off" | "0" => Ok(PropValue::Bool(false)),
            _ => Err(FormatError::Invalid {
                kind: FormatterKind::Bool,
                input: text.to_string(),
            }),
        }
    }

    fn valid_values(&self) -> Option<Vec<ValidValue>> {
        Some(vec![
            ValidValue::new("true", "true"),
            ValidValue::new("false", "false"),
        ])
    }
}

/// Ordinal enumeration: the value is the index into `names`, the text is
/// the name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnumFormatter {
    names: Vec<String>,
}

impl EnumFormatter {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }
}

impl ValueFormat for EnumFormatter {
    fn format(&self, value: &PropValue) -> Result<String, FormatError> {
        let ordinal = value.as_int().ok_or_else(|| FormatError::TypeMismatch {
            kind: FormatterKind::Enum,
            found: value.type_name(),
        })?;
        usize::try_from(ordinal)
            .ok()
            .and_then(|i| self.names.get(i))
            .cloned()
            .ok_or_else(|| FormatError::UnknownChoice(ordinal.to_string()))
    }

    fn coerce(&self, text: &str) -> Result<PropValue, FormatError> {
        let label = text.trim();
        self.names
            .iter()
            .position(|n| n == label)
            .map(|i| PropValue::Int(i as i64))
            .ok_or_else(|| FormatError::UnknownChoice(text.to_string()))
    }

    fn valid_values(&self) -> Option<Vec<ValidValue>> {
        Some(
            self.names
                .iter()
                .enumerate()
                .map(|(i, n)| ValidValue::new(i.to_string(), n.clone()))
                .collect(),
        )
    }
}

/// Choice by label: each label maps to an arbitrary stored value.
///
/// Built either from `(label, value)` pairs or from a plain list of values,
/// in which case each value's text is its label.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChoiceFormatter {
    entries: Vec<(String, PropValue)>,
}

impl ChoiceFormatter {
    pub fn from_pairs<I, S, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, V)>,
        S: Into<String>,
        V: Into<PropValue>,
    {
        Self {
            entries: pairs
                .into_iter()
                .map(|(label, value)| (label.into(), value.into()))
                .collect(),
        }
    }

    pub fn from_values<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<PropValue>,
    {
        Self {
            entries: values
                .into_iter()
                .map(|v| {
                    let v = v.into();
                    (v.to_string(), v)
                })
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Label of the entry holding `value`, if any.
    pub fn label_of(&self, value: &PropValue) -> Option<&str> {
        self.entries
            .iter()
            .find(|(_, v)| v == value)
            .map(|(label, _)| label.as_str())
    }
}

impl ValueFormat for ChoiceFormatter {
    fn format(&self, value: &PropValue) -> Result<String, FormatError> {
        self.label_of(value)
            .map(str::to_string)
            .ok_or_else(|| FormatError::UnknownChoice(value.to_string()))
    }

    fn coerce(&self, text: &str) -> Result<PropValue, FormatError> {
        self.entries
            .iter()
            .find(|(label, _)| label == text)
            .map(|(_, v)| v.clone())
            .ok_or_else(|| FormatError::UnknownChoice(text.to_string()))
    }

    fn valid_values(&self) -> Option<Vec<ValidValue>> {
        Some(
            self.entries
                .iter()
                .map(|(label, v)| ValidValue::new(v.to_string(), label.clone()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bool() {
        let f = BoolFormatter;
        assert_eq!(f.format(&PropValue::Bool(true)).unwrap(), "true");
        assert_eq!(f.format(&PropValue::Int(0)).unwrap(), "false");
        assert_eq!(f.coerce("Yes").unwrap(), PropValue::Bool(true));
        assert_eq!(f.coerce("0").unwrap(), PropValue::Bool(false));
        assert!(!f.validate("maybe"));
    }

    #[test]
    fn test_enum_by_ordinal() {
        let f = EnumFormatter::new(["Left", "Center", "Right"]);
        assert_eq!(f.format(&PropValue::Int(1)).unwrap(), "Center");
        assert_eq!(f.coerce("Right").unwrap(), PropValue::Int(2));
        assert!(f.format(&PropValue::Int(3)).is_err());
        assert!(f.format(&PropValue::Int(-1)).is_err());
        assert!(!f.validate("Up"));
        let values = f.valid_values().unwrap();
        assert_eq!(values.len(), 3);
        assert_eq!(values[2], ValidValue::new("2", "Right"));
    }

    #[test]
    fn test_choice_pairs() {
        let f = ChoiceFormatter::from_pairs([("item 1", 1), ("item 2", 2)]);
        assert_eq!(f.format(&PropValue::Int(2)).unwrap(), "item 2");
        assert_eq!(f.coerce("item 1").unwrap(), PropValue::Int(1));
        assert!(!f.validate("item 3"));
        let labels: Vec<_> = f.valid_values().unwrap().into_iter().map(|v| v.label).collect();
        assert_eq!(labels, ["item 1", "item 2"]);
    }

    #[test]
    fn test_choice_from_list() {
        let f = ChoiceFormatter::from_values(["red", "green"]);
        assert_eq!(f.len(), 2);
        assert_eq!(f.coerce("green").unwrap(), PropValue::from("green"));
        assert_eq!(f.label_of(&PropValue::from("red")), Some("red"));
    }
}
