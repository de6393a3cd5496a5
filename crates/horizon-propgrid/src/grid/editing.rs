//! Inline editor lifecycle.
//!
//! An editor opens over a row's value region, and its content is committed
//! on Enter, when the row loses the selection, or (deferred) when the
//! editor loses focus. A commit that changes the value emits `Changing`,
//! which listeners may veto to restore the previous value, then `Changed`.

use horizon_propgrid_core::logging::{span_names, targets};
use horizon_propgrid_core::PerfSpan;

use super::PropGrid;
use crate::event::PropEventKind;
use crate::format::ValueFormat;
use crate::host::{EditorId, EditorRequest};
use crate::property::{PropId, Property};
use crate::style::EditorKind;
use crate::transfer::{EditorBinding, TransferOutcome};
use crate::value::PropValue;

/// Work queued by toolkit callbacks and run from [`PropGrid::run_pending_tasks`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DeferredTask {
    /// Commit and close an editor that lost focus. Skipped if the row or
    /// the editor is gone by then, or the row has a different editor.
    CommitEditor { prop: PropId, editor: EditorId },
}

impl DeferredTask {
    pub(crate) fn prop(&self) -> PropId {
        match self {
            DeferredTask::CommitEditor { prop, .. } => *prop,
        }
    }
}

/// Refresh the description of rows whose editor shows a label rather than
/// the raw value.
pub(crate) fn update_description(prop: &mut Property) {
    match prop.editor_kind() {
        Some(EditorKind::Dropdown | EditorKind::Radio) => {
            if let Some(label) = prop
                .formatter
                .as_deref()
                .and_then(|f| f.format(&prop.value).ok())
            {
                prop.description = label;
            }
        }
        Some(EditorKind::CheckBox) => {
            if let Some(checked) = prop.value.as_bool() {
                prop.description = checked.to_string();
            }
        }
        _ => {}
    }
}

impl PropGrid {
    /// Open an editor on a row. Does nothing if one is already open, or
    /// the row is a separator, disabled, read-only or not editable.
    pub fn create_editor(&mut self, id: PropId) -> bool {
        let Some(prop) = self.props.get(id) else {
            return false;
        };
        if prop.editor.is_some() || !prop.enable || prop.readonly {
            return false;
        }
        let Some(kind) = prop.editor_kind() else {
            return false;
        };
        let Some(region) = prop.regions.value else {
            tracing::debug!(target: targets::EDITOR, name = %prop.name, "row has no value region yet");
            return false;
        };

        let text = prop.value_as_string();
        let request = EditorRequest {
            kind,
            rect: self.to_client(region),
            content: EditorBinding::seed(kind, prop.formatter.as_deref(), &prop.value, &text),
        };
        let formatter = prop.formatter.clone();

        let editor = match self.host.create_editor(&request) {
            Ok(editor) => editor,
            Err(err) => {
                tracing::warn!(target: targets::EDITOR, error = %err, "editor creation failed");
                return false;
            }
        };
        tracing::debug!(target: targets::EDITOR, editor = editor.0, %kind, "editor opened");

        if let Some(prop) = self.props.get_mut(id) {
            prop.editor = Some(EditorBinding::new(editor, kind, formatter));
        }
        self.notify(PropEventKind::Resize, id);
        self.layout_editor(id);
        self.host.focus_editor(editor);
        true
    }

    /// Close a row's editor without committing.
    pub fn destroy_editor(&mut self, id: PropId) -> bool {
        let Some(binding) = self.props.get_mut(id).and_then(|p| p.editor.take()) else {
            return false;
        };
        self.host.destroy_editor(binding.editor());
        self.tasks.cancel_where(|t| t.prop() == id);
        tracing::debug!(target: targets::EDITOR, editor = binding.editor().0, "editor closed");
        true
    }

    /// Rewrite an open editor from the row's current value, dropping
    /// whatever was typed and any invalid marking.
    ///
    /// A destroyed editor is forgotten and `false` returned.
    pub fn reload_editor(&mut self, id: PropId) -> bool {
        let Some(prop) = self.props.get(id) else {
            return false;
        };
        let Some(binding) = prop.editor.clone() else {
            return false;
        };
        let text = prop.value_as_string();
        let content =
            EditorBinding::seed(binding.kind(), prop.formatter.as_deref(), &prop.value, &text);
        if binding.transfer_to_window(self.host.as_mut(), &content) {
            return true;
        }
        if let Some(prop) = self.props.get_mut(id) {
            prop.editor = None;
        }
        false
    }

    /// Read the editor back into the row's value.
    ///
    /// Returns `true` if a new value was committed, after which the editor
    /// shows the value in its formatted form. Invalid content is left in
    /// the editor, marked invalid, and nothing changes.
    pub fn commit_editor(&mut self, id: PropId) -> bool {
        let Some(prop) = self.props.get(id) else {
            return false;
        };
        let Some(binding) = prop.editor.clone() else {
            return false;
        };
        let old_value = prop.value.clone();
        let old_description = prop.description.clone();

        let value = match binding.transfer_from_window(self.host.as_mut(), &old_value) {
            TransferOutcome::Changed(value) => value,
            TransferOutcome::Unchanged => return false,
            TransferOutcome::Rejected(err) => {
                tracing::debug!(target: targets::EDITOR, error = %err, "commit skipped, editor content invalid");
                return false;
            }
            TransferOutcome::Detached => {
                if let Some(prop) = self.props.get_mut(id) {
                    prop.editor = None;
                }
                return false;
            }
        };

        if let Some(prop) = self.props.get_mut(id) {
            prop.value = value;
            prop.value_valid = true;
            update_description(prop);
        }

        if self.notify(PropEventKind::Changing, id).is_vetoed() {
            tracing::debug!(target: targets::EDITOR, "change vetoed, restoring value");
            self.restore_value(id, old_value, old_description);
            return false;
        }
        self.notify(PropEventKind::Changed, id);
        self.reload_editor(id);
        true
    }

    /// Put back a value after a veto. Bypasses the read-only check.
    pub(crate) fn restore_value(&mut self, id: PropId, value: PropValue, description: String) {
        if let Some(prop) = self.props.get_mut(id) {
            prop.value = value;
            prop.value_valid = true;
            prop.description = description;
        }
        self.destroy_editor(id);
        self.notify(PropEventKind::Refresh, id);
    }

    /// Commit, close and repaint. This is what Enter and deselection do.
    pub(crate) fn commit_and_close(&mut self, id: PropId) {
        self.commit_editor(id);
        self.destroy_editor(id);
        self.notify(PropEventKind::Refresh, id);
    }

    /// The row that owns an editor.
    pub fn prop_for_editor(&self, editor: EditorId) -> Option<PropId> {
        self.iter()
            .find(|(_, p)| p.editor.as_ref().is_some_and(|b| b.editor() == editor))
            .map(|(id, _)| id)
    }

    // -------------------------------------------------------------------------
    // Toolkit callbacks
    // -------------------------------------------------------------------------

    /// Enter was pressed in an editor. Invalid content keeps the editor open.
    pub fn on_editor_enter(&mut self, editor: EditorId) -> bool {
        let Some(id) = self.prop_for_editor(editor) else {
            return false;
        };
        let valid = self
            .props
            .get(id)
            .and_then(|p| p.editor.clone())
            .is_some_and(|b| b.validate_live(self.host.as_mut()));
        if !valid {
            return false;
        }
        self.commit_and_close(id);
        true
    }

    /// Escape was pressed in an editor: close it and keep the old value.
    pub fn on_editor_escape(&mut self, editor: EditorId) -> bool {
        let Some(id) = self.prop_for_editor(editor) else {
            return false;
        };
        self.destroy_editor(id);
        self.notify(PropEventKind::Refresh, id);
        true
    }

    /// The editor content changed. Updates the invalid marking only.
    pub fn on_editor_changed(&mut self, editor: EditorId) -> bool {
        let Some(binding) = self
            .prop_for_editor(editor)
            .and_then(|id| self.props.get(id))
            .and_then(|p| p.editor.clone())
        else {
            return false;
        };
        binding.validate_live(self.host.as_mut())
    }

    /// An editor lost focus. The commit runs later, from
    /// [`run_pending_tasks`](Self::run_pending_tasks), because the toolkit
    /// may be destroying the editor right now.
    pub fn on_editor_focus_lost(&mut self, editor: EditorId) {
        if let Some(prop) = self.prop_for_editor(editor) {
            self.tasks
                .post_unique(DeferredTask::CommitEditor { prop, editor });
        }
    }

    pub fn has_pending_tasks(&self) -> bool {
        self.tasks.has_pending()
    }

    /// Run deferred work. Call from the toolkit's idle handler.
    pub fn run_pending_tasks(&mut self) -> usize {
        let _span = PerfSpan::new(span_names::TASK);
        let tasks = self.tasks.drain();
        let mut ran = 0;
        for task in tasks {
            match task {
                DeferredTask::CommitEditor { prop, editor } => {
                    let current = self
                        .props
                        .get(prop)
                        .and_then(|p| p.editor.as_ref())
                        .map(EditorBinding::editor);
                    if current != Some(editor) {
                        tracing::debug!(target: targets::EDITOR, editor = editor.0, "deferred commit dropped, editor replaced or row gone");
                        continue;
                    }
                    if !self.host.editor_alive(editor) {
                        tracing::debug!(target: targets::EDITOR, editor = editor.0, "deferred commit dropped, editor destroyed by host");
                        self.destroy_editor(prop);
                        self.notify(PropEventKind::Refresh, prop);
                        continue;
                    }
                    self.commit_and_close(prop);
                    ran += 1;
                }
            }
        }
        ran
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use horizon_propgrid_core::{Size, Verdict};

    use super::*;
    use crate::headless::HeadlessHost;
    use crate::property::PropertyBuilder;

    fn grid_with(host: &HeadlessHost, prop: PropertyBuilder) -> (PropGrid, PropId) {
        let mut grid = PropGrid::new(host.clone());
        grid.set_client_size(Size::new(300.0, 200.0));
        let id = grid.append(prop);
        (grid, id)
    }

    #[test]
    fn test_create_editor_seeds_text() {
        let host = HeadlessHost::new();
        let (mut grid, id) = grid_with(&host, PropertyBuilder::int("n").value(7));
        assert!(grid.create_editor(id));
        assert!(!grid.create_editor(id));

        let editor = host.active_editor().unwrap();
        let state = host.state();
        let e = state.editor(editor).unwrap();
        assert_eq!(e.content, crate::host::EditorContent::Text("7".into()));
        assert!(e.focused);
        assert_eq!(e.rect, grid.get(id).unwrap().regions().value.unwrap());
    }

    #[test]
    fn test_reload_editor_drops_typing() {
        let host = HeadlessHost::new();
        let (mut grid, id) = grid_with(&host, PropertyBuilder::int("n").value(7));
        grid.create_editor(id);
        let editor = host.active_editor().unwrap();
        host.type_text(editor, "abc");
        assert!(!grid.on_editor_changed(editor));
        assert!(host.state().editor(editor).unwrap().invalid);

        assert!(grid.reload_editor(id));
        let state = host.state();
        let e = state.editor(editor).unwrap();
        assert_eq!(e.content, crate::host::EditorContent::Text("7".into()));
        assert!(!e.invalid);
    }

    #[test]
    fn test_commit_keeps_editor_in_sync() {
        let host = HeadlessHost::new();
        let (mut grid, id) = grid_with(&host, PropertyBuilder::int("n").value(1));
        grid.create_editor(id);
        let editor = host.active_editor().unwrap();
        host.type_text(editor, "12");
        assert!(grid.commit_editor(id));
        assert!(grid.get(id).unwrap().is_editing());
        assert_eq!(
            host.state().editor(editor).unwrap().content,
            crate::host::EditorContent::Text("12".into())
        );
    }

    #[test]
    fn test_reload_without_editor() {
        let host = HeadlessHost::new();
        let (mut grid, id) = grid_with(&host, PropertyBuilder::int("n"));
        assert!(!grid.reload_editor(id));
    }

    #[test]
    fn test_readonly_rows_do_not_edit() {
        let host = HeadlessHost::new();
        let (mut grid, id) = grid_with(&host, PropertyBuilder::text("t").readonly(true));
        assert!(!grid.create_editor(id));
        assert_eq!(host.state().live_editors(), 0);
    }

    #[test]
    fn test_enter_commits_and_emits() {
        let host = HeadlessHost::new();
        let (mut grid, id) = grid_with(&host, PropertyBuilder::int("n").value(1));
        let kinds = Rc::new(RefCell::new(Vec::new()));
        let sink = kinds.clone();
        grid.observe(move |e| sink.borrow_mut().push(e.kind));

        grid.create_editor(id);
        let editor = host.active_editor().unwrap();
        host.type_text(editor, "5");
        assert!(grid.on_editor_enter(editor));

        assert_eq!(grid.get(id).unwrap().value(), &PropValue::Int(5));
        assert!(!grid.get(id).unwrap().is_editing());
        let kinds = kinds.borrow();
        let changing = kinds.iter().position(|k| *k == PropEventKind::Changing);
        let changed = kinds.iter().position(|k| *k == PropEventKind::Changed);
        assert!(changing.is_some() && changing < changed);
    }

    #[test]
    fn test_enter_with_invalid_text_keeps_editor() {
        let host = HeadlessHost::new();
        let (mut grid, id) = grid_with(&host, PropertyBuilder::int("n").value(1));
        grid.create_editor(id);
        let editor = host.active_editor().unwrap();
        host.type_text(editor, "abc");
        assert!(!grid.on_editor_enter(editor));
        assert!(grid.get(id).unwrap().is_editing());
        assert!(host.state().editor(editor).unwrap().invalid);
        assert_eq!(grid.get(id).unwrap().value(), &PropValue::Int(1));
    }

    #[test]
    fn test_changing_veto_restores() {
        let host = HeadlessHost::new();
        let (mut grid, id) = grid_with(&host, PropertyBuilder::int("n").value(1));
        grid.connect(|e| Verdict::from(e.kind != PropEventKind::Changing));
        grid.create_editor(id);
        let editor = host.active_editor().unwrap();
        host.type_text(editor, "9");
        grid.on_editor_enter(editor);
        assert_eq!(grid.get(id).unwrap().value(), &PropValue::Int(1));
        assert_eq!(host.state().live_editors(), 0);
    }

    #[test]
    fn test_focus_loss_commits_later() {
        let host = HeadlessHost::new();
        let (mut grid, id) = grid_with(&host, PropertyBuilder::text("t"));
        grid.create_editor(id);
        let editor = host.active_editor().unwrap();
        host.type_text(editor, "hello");
        grid.on_editor_focus_lost(editor);
        grid.on_editor_focus_lost(editor);
        assert!(grid.get(id).unwrap().is_editing());
        assert_eq!(grid.run_pending_tasks(), 1);
        assert_eq!(grid.get(id).unwrap().value(), &PropValue::Text("hello".into()));
        assert!(!grid.has_pending_tasks());
    }

    #[test]
    fn test_deferred_commit_tolerates_dead_editor() {
        let host = HeadlessHost::new();
        let (mut grid, id) = grid_with(&host, PropertyBuilder::text("t"));
        grid.create_editor(id);
        let editor = host.active_editor().unwrap();
        grid.on_editor_focus_lost(editor);
        crate::host::GridHost::destroy_editor(&mut host.clone(), editor);
        assert_eq!(grid.run_pending_tasks(), 0);
        assert!(!grid.get(id).unwrap().is_editing());
    }

    #[test]
    fn test_deferred_commit_skips_removed_row() {
        let host = HeadlessHost::new();
        let (mut grid, id) = grid_with(&host, PropertyBuilder::text("t"));
        grid.create_editor(id);
        let editor = host.active_editor().unwrap();
        grid.on_editor_focus_lost(editor);
        grid.remove(id);
        assert_eq!(grid.run_pending_tasks(), 0);
    }

    #[test]
    fn test_escape_discards() {
        let host = HeadlessHost::new();
        let (mut grid, id) = grid_with(&host, PropertyBuilder::text("t").value("keep"));
        grid.create_editor(id);
        let editor = host.active_editor().unwrap();
        host.type_text(editor, "drop");
        grid.on_editor_escape(editor);
        assert_eq!(grid.get(id).unwrap().value(), &PropValue::Text("keep".into()));
    }

    #[test]
    fn test_choice_commit_updates_description() {
        let host = HeadlessHost::new();
        let (mut grid, id) = grid_with(
            &host,
            PropertyBuilder::choice("level", [("low", 1), ("high", 2)]).value(1),
        );
        grid.create_editor(id);
        let editor = host.active_editor().unwrap();
        assert!(host.select_label(editor, "high"));
        grid.on_editor_enter(editor);
        let prop = grid.get(id).unwrap();
        assert_eq!(prop.value(), &PropValue::Int(2));
        assert_eq!(prop.description(), "high");
    }
}
