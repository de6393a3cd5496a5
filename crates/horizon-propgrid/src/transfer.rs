//! Transfer between a row's value and its live editor.
//!
//! An [`EditorBinding`] ties one native editor to the formatter of the row
//! that owns it. It is the only path by which raw editor content becomes a
//! typed value. Transfers tolerate the editor having already been destroyed
//! by the toolkit: they report [`TransferOutcome::Detached`] instead of
//! failing.

use std::sync::Arc;

use horizon_propgrid_core::logging::targets;

use crate::error::FormatError;
use crate::format::{Formatter, ValidValue, ValueFormat};
use crate::host::{EditorContent, EditorId, GridHost};
use crate::style::EditorKind;
use crate::value::PropValue;

/// Result of reading an editor back.
#[derive(Debug, Clone, PartialEq)]
pub enum TransferOutcome {
    /// The editor holds the current value.
    Unchanged,
    /// The editor holds a different, valid value.
    Changed(PropValue),
    /// The editor content does not validate. The editor shows invalid state.
    Rejected(FormatError),
    /// The editor no longer exists.
    Detached,
}

/// A live editor and the formatter its content is checked against.
#[derive(Debug, Clone)]
pub struct EditorBinding {
    editor: EditorId,
    kind: EditorKind,
    formatter: Option<Arc<Formatter>>,
}

impl EditorBinding {
    pub fn new(editor: EditorId, kind: EditorKind, formatter: Option<Arc<Formatter>>) -> Self {
        Self {
            editor,
            kind,
            formatter,
        }
    }

    pub fn editor(&self) -> EditorId {
        self.editor
    }

    pub fn kind(&self) -> EditorKind {
        self.kind
    }

    /// Build the content an editor of `kind` starts with.
    ///
    /// `text` is the row's formatted value.
    pub fn seed(
        kind: EditorKind,
        formatter: Option<&Formatter>,
        value: &PropValue,
        text: &str,
    ) -> EditorContent {
        match kind {
            EditorKind::Dropdown | EditorKind::Radio => {
                let items = formatter
                    .and_then(|f| f.valid_values())
                    .unwrap_or_default();
                let selected = items.iter().position(|v| v.label == text);
                EditorContent::Choices { items, selected }
            }
            EditorKind::CheckBox => {
                let checked = value
                    .as_bool()
                    .or_else(|| formatter.and_then(|f| f.coerce(text).ok()?.as_bool()))
                    .unwrap_or(false);
                EditorContent::Bool(checked)
            }
            EditorKind::Slider | EditorKind::Spin => {
                let (min, max) = formatter.and_then(Formatter::int_bounds).unwrap_or((0, 100));
                let value = value
                    .as_int()
                    .or_else(|| text.trim().parse().ok())
                    .unwrap_or(min)
                    .clamp(min, max.max(min));
                EditorContent::Range { min, max, value }
            }
            _ => EditorContent::Text(text.to_string()),
        }
    }

    /// Write `content` into the editor and clear any invalid marking.
    ///
    /// Returns `false` if the editor is gone.
    pub fn transfer_to_window(&self, host: &mut dyn GridHost, content: &EditorContent) -> bool {
        if !host.write_editor(self.editor, content) {
            tracing::debug!(target: targets::EDITOR, editor = self.editor.0, "transfer to a destroyed editor ignored");
            return false;
        }
        host.set_editor_invalid(self.editor, false);
        true
    }

    /// Read the editor and convert its content to a value.
    pub fn transfer_from_window(
        &self,
        host: &mut dyn GridHost,
        current: &PropValue,
    ) -> TransferOutcome {
        let Some(content) = host.read_editor(self.editor) else {
            tracing::debug!(target: targets::EDITOR, editor = self.editor.0, "editor already destroyed");
            return TransferOutcome::Detached;
        };

        let candidate = match self.convert(&content) {
            Ok(Some(v)) => v,
            Ok(None) => return TransferOutcome::Unchanged,
            Err(err) => {
                tracing::debug!(target: targets::EDITOR, error = %err, "editor content rejected");
                host.set_editor_invalid(self.editor, true);
                return TransferOutcome::Rejected(err);
            }
        };

        host.set_editor_invalid(self.editor, false);
        if &candidate == current {
            TransferOutcome::Unchanged
        } else {
            TransferOutcome::Changed(candidate)
        }
    }

    /// Check the editor content without committing it and update the
    /// invalid marking. Returns whether the content is acceptable.
    pub fn validate_live(&self, host: &mut dyn GridHost) -> bool {
        let Some(content) = host.read_editor(self.editor) else {
            return false;
        };
        let ok = self.convert(&content).is_ok();
        host.set_editor_invalid(self.editor, !ok);
        ok
    }

    fn convert(&self, content: &EditorContent) -> Result<Option<PropValue>, FormatError> {
        let formatter = self.formatter.as_deref();
        let value = match content {
            EditorContent::Text(text) => match formatter {
                Some(f) => f.coerce(text)?,
                None => PropValue::Text(text.clone()),
            },
            EditorContent::Choices { items, selected } => {
                let Some(item) = selected.and_then(|i| items.get(i)) else {
                    return Ok(None);
                };
                Self::coerce_label(formatter, item)?
            }
            EditorContent::Bool(checked) => match formatter {
                Some(f) => f
                    .coerce(&checked.to_string())
                    .or_else(|_| f.coerce(if *checked { "1" } else { "0" }))?,
                None => PropValue::Bool(*checked),
            },
            EditorContent::Range { value, .. } => match formatter {
                Some(f) => f.coerce(&value.to_string())?,
                None => PropValue::Int(*value),
            },
        };
        Ok(Some(value))
    }

    fn coerce_label(
        formatter: Option<&Formatter>,
        item: &ValidValue,
    ) -> Result<PropValue, FormatError> {
        match formatter {
            Some(f) => f.coerce(&item.label),
            None => Ok(PropValue::Text(item.label.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::HeadlessHost;
    use crate::host::EditorRequest;
    use horizon_propgrid_core::Rect;

    fn open(host: &mut HeadlessHost, kind: EditorKind, content: EditorContent) -> EditorId {
        host.create_editor(&EditorRequest {
            kind,
            rect: Rect::new(0.0, 0.0, 100.0, 20.0),
            content,
        })
        .unwrap()
    }

    #[test]
    fn test_seed_choice_selects_current_label() {
        let f = Formatter::choice([("low", 1), ("high", 2)]);
        let content = EditorBinding::seed(EditorKind::Dropdown, Some(&f), &PropValue::Int(2), "high");
        match content {
            EditorContent::Choices { items, selected } => {
                assert_eq!(items.len(), 2);
                assert_eq!(selected, Some(1));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_seed_range_clamps() {
        let f = Formatter::int_range(0, 10);
        let content = EditorBinding::seed(EditorKind::Slider, Some(&f), &PropValue::Int(50), "50");
        assert_eq!(content, EditorContent::Range { min: 0, max: 10, value: 10 });
    }

    #[test]
    fn test_text_transfer_validates() {
        let mut host = HeadlessHost::new();
        let id = open(&mut host, EditorKind::TextBox, EditorContent::Text("1".into()));
        let binding = EditorBinding::new(id, EditorKind::TextBox, Some(Arc::new(Formatter::int())));

        host.type_text(id, "12");
        assert_eq!(
            binding.transfer_from_window(&mut host, &PropValue::Int(1)),
            TransferOutcome::Changed(PropValue::Int(12))
        );

        host.type_text(id, "twelve");
        assert!(matches!(
            binding.transfer_from_window(&mut host, &PropValue::Int(1)),
            TransferOutcome::Rejected(_)
        ));
        assert!(host.state().editor(id).unwrap().invalid);
    }

    #[test]
    fn test_unchanged_and_detached() {
        let mut host = HeadlessHost::new();
        let id = open(&mut host, EditorKind::TextBox, EditorContent::Text("abc".into()));
        let binding = EditorBinding::new(id, EditorKind::TextBox, None);
        assert_eq!(
            binding.transfer_from_window(&mut host, &PropValue::from("abc")),
            TransferOutcome::Unchanged
        );
        host.destroy_editor(id);
        assert_eq!(
            binding.transfer_from_window(&mut host, &PropValue::from("abc")),
            TransferOutcome::Detached
        );
        assert!(!binding.transfer_to_window(&mut host, &EditorContent::Text("x".into())));
    }

    #[test]
    fn test_checkbox_with_int_formatter() {
        let mut host = HeadlessHost::new();
        let id = open(&mut host, EditorKind::CheckBox, EditorContent::Bool(false));
        let binding = EditorBinding::new(id, EditorKind::CheckBox, Some(Arc::new(Formatter::int())));
        host.set_content(id, EditorContent::Bool(true));
        assert_eq!(
            binding.transfer_from_window(&mut host, &PropValue::Int(0)),
            TransferOutcome::Changed(PropValue::Int(1))
        );
    }

    #[test]
    fn test_validate_live_marks_invalid() {
        let mut host = HeadlessHost::new();
        let id = open(&mut host, EditorKind::TextBox, EditorContent::Text(String::new()));
        let binding = EditorBinding::new(id, EditorKind::TextBox, Some(Arc::new(Formatter::hex())));
        host.type_text(id, "0xZZ");
        assert!(!binding.validate_live(&mut host));
        assert!(host.state().editor(id).unwrap().invalid);
        host.type_text(id, "0x1F");
        assert!(binding.validate_live(&mut host));
        assert!(!host.state().editor(id).unwrap().invalid);
    }
}
