//! Notifications sent from the grid to its owner.

use std::fmt;

use crate::host::Key;
use crate::property::PropId;
use crate::value::PropValue;

/// Kinds of grid notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropEventKind {
    /// A row became the selection.
    Selected,
    /// An edit is about to commit. Cancelable: a veto rolls the value back.
    Changing,
    /// An edit committed.
    Changed,
    /// The pointer moved onto a row.
    Highlighted,
    RightClick,
    Collapsed,
    Expanded,
    DoubleClick,
    /// A row's indent changed.
    Indent,
    /// A key the grid did not consume.
    KeyDown,
    /// A row's size requirements changed.
    Resize,
    /// A row needs repainting.
    Refresh,
    Insert,
    /// A row is about to be deleted. Cancelable.
    Delete,
    /// Something was dropped that the grid does not handle itself.
    Drop,
    /// A row drag is about to start. Cancelable.
    BeginDrag,
    /// The check icon was clicked. Cancelable: a veto restores the state.
    ClickCheck,
}

impl PropEventKind {
    /// Whether a veto from the owner has an effect.
    pub fn is_cancelable(self) -> bool {
        matches!(
            self,
            PropEventKind::Changing
                | PropEventKind::Delete
                | PropEventKind::BeginDrag
                | PropEventKind::ClickCheck
        )
    }
}

impl fmt::Display for PropEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A notification with a snapshot of the row it concerns.
///
/// Listeners run while the grid is mid-operation, so they receive copies
/// rather than access to the grid.
#[derive(Debug, Clone, PartialEq)]
pub struct PropEvent {
    pub kind: PropEventKind,
    pub prop: Option<PropId>,
    /// Row index at the time of the event.
    pub index: Option<usize>,
    /// Row name; for `Drop`, the payload name.
    pub name: String,
    /// Row value, where relevant.
    pub value: Option<PropValue>,
    /// The key, for `KeyDown`.
    pub key: Option<Key>,
}

impl PropEvent {
    pub fn new(kind: PropEventKind) -> Self {
        Self {
            kind,
            prop: None,
            index: None,
            name: String::new(),
            value: None,
            key: None,
        }
    }

    pub fn is_cancelable(&self) -> bool {
        self.kind.is_cancelable()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancelable_kinds() {
        assert!(PropEventKind::Changing.is_cancelable());
        assert!(PropEventKind::ClickCheck.is_cancelable());
        assert!(PropEventKind::Delete.is_cancelable());
        assert!(PropEventKind::BeginDrag.is_cancelable());
        assert!(!PropEventKind::Changed.is_cancelable());
        assert!(!PropEventKind::Refresh.is_cancelable());
    }
}
