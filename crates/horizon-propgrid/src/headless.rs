//! An in-memory toolkit.
//!
//! [`HeadlessHost`] implements [`GridHost`] without any windowing system:
//! editors are records in a table, and menus, drags and dialogs return
//! scripted answers. It is what the test suite drives grids with, and it is
//! usable for off-screen tooling. Clones share state, so a caller can keep a
//! handle after moving the host into a grid.
//!
//! [`RecordingContext`] is the matching [`DrawContext`]: it records every
//! primitive and measures text with a fixed-pitch font model.

use std::cell::{Ref, RefCell, RefMut};
use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::rc::Rc;

use horizon_propgrid_core::logging::targets;
use horizon_propgrid_core::{Color, FontDesc, Point, Rect, Size};

use crate::error::HostError;
use crate::host::{
    CursorShape, DialogResult, DragData, DragOutcome, DrawContext, EditorContent, EditorId,
    EditorRequest, Glyph, GlyphKind, GridHost, LineStyle, MenuCommand, MenuEntry,
};
use crate::settings::PropSettings;
use crate::style::EditorKind;

/// Natural editor height reported by the headless host.
pub const EDITOR_HEIGHT: f32 = 21.0;

/// A simulated native editor.
#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessEditor {
    pub kind: EditorKind,
    pub rect: Rect,
    pub content: EditorContent,
    pub invalid: bool,
    pub focused: bool,
}

type SettingsScript = Box<dyn FnMut(&mut PropSettings) -> DialogResult>;

/// Everything the headless host has been told, plus its scripted answers.
#[derive(Default)]
pub struct HeadlessState {
    next_editor: u64,
    editors: HashMap<EditorId, HeadlessEditor>,
    /// Editors in creation order, destroyed ones included.
    pub created: Vec<EditorId>,
    pub destroyed: Vec<EditorId>,
    pub virtual_size: Size,
    pub refreshes: usize,
    pub cursor: CursorShape,
    pub tooltip: Option<String>,
    pub captured: bool,
    /// Toolkit drag threshold; zero means the host default.
    pub drag_threshold: Size,
    pub drags: Vec<DragData>,
    pub drag_outcomes: VecDeque<DragOutcome>,
    pub menus: Vec<(Vec<MenuEntry>, Point)>,
    pub menu_picks: VecDeque<Option<MenuCommand>>,
    pub settings_shown: usize,
    settings_script: Option<SettingsScript>,
    /// Make the next editor creation fail.
    pub fail_next_editor: bool,
}

impl HeadlessState {
    pub fn editor(&self, id: EditorId) -> Option<&HeadlessEditor> {
        self.editors.get(&id)
    }

    pub fn editor_mut(&mut self, id: EditorId) -> Option<&mut HeadlessEditor> {
        self.editors.get_mut(&id)
    }

    pub fn live_editors(&self) -> usize {
        self.editors.len()
    }

    /// The most recently created editor that still exists.
    pub fn active_editor(&self) -> Option<EditorId> {
        self.created
            .iter()
            .rev()
            .copied()
            .find(|id| self.editors.contains_key(id))
    }
}

impl fmt::Debug for HeadlessState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HeadlessState")
            .field("editors", &self.editors)
            .field("created", &self.created)
            .field("destroyed", &self.destroyed)
            .field("virtual_size", &self.virtual_size)
            .field("refreshes", &self.refreshes)
            .field("cursor", &self.cursor)
            .field("tooltip", &self.tooltip)
            .field("captured", &self.captured)
            .field("drags", &self.drags)
            .field("menus", &self.menus.len())
            .finish_non_exhaustive()
    }
}

/// A [`GridHost`] backed by [`HeadlessState`].
#[derive(Debug, Clone, Default)]
pub struct HeadlessHost {
    state: Rc<RefCell<HeadlessState>>,
}

impl HeadlessHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> Ref<'_, HeadlessState> {
        self.state.borrow()
    }

    pub fn state_mut(&self) -> RefMut<'_, HeadlessState> {
        self.state.borrow_mut()
    }

    /// Replace an editor's text, as if the user typed it.
    pub fn type_text(&self, id: EditorId, text: &str) {
        self.set_content(id, EditorContent::Text(text.to_string()));
    }

    /// Replace an editor's content.
    pub fn set_content(&self, id: EditorId, content: EditorContent) {
        if let Some(editor) = self.state.borrow_mut().editors.get_mut(&id) {
            editor.content = content;
        }
    }

    /// Pick the entry labeled `label` in a choice editor.
    pub fn select_label(&self, id: EditorId, label: &str) -> bool {
        let mut state = self.state.borrow_mut();
        let Some(editor) = state.editors.get_mut(&id) else {
            return false;
        };
        let EditorContent::Choices { items, selected } = &mut editor.content else {
            return false;
        };
        match items.iter().position(|item| item.label == label) {
            Some(i) => {
                *selected = Some(i);
                true
            }
            None => false,
        }
    }

    pub fn active_editor(&self) -> Option<EditorId> {
        self.state.borrow().active_editor()
    }

    /// Queue the answer of the next popup menu.
    pub fn script_menu(&self, pick: Option<MenuCommand>) {
        self.state.borrow_mut().menu_picks.push_back(pick);
    }

    /// Queue the outcome of the next drag loop.
    pub fn script_drag(&self, outcome: DragOutcome) {
        self.state.borrow_mut().drag_outcomes.push_back(outcome);
    }

    /// Handle the next settings dialogs with `script`.
    pub fn script_settings<F>(&self, script: F)
    where
        F: FnMut(&mut PropSettings) -> DialogResult + 'static,
    {
        self.state.borrow_mut().settings_script = Some(Box::new(script));
    }
}

impl GridHost for HeadlessHost {
    fn create_editor(&mut self, request: &EditorRequest) -> Result<EditorId, HostError> {
        let mut state = self.state.borrow_mut();
        if std::mem::take(&mut state.fail_next_editor) {
            return Err(HostError::EditorCreation {
                kind: request.kind.to_string(),
                reason: "scripted failure".into(),
            });
        }
        state.next_editor += 1;
        let id = EditorId(state.next_editor);
        state.editors.insert(
            id,
            HeadlessEditor {
                kind: request.kind,
                rect: request.rect,
                content: request.content.clone(),
                invalid: false,
                focused: false,
            },
        );
        state.created.push(id);
        tracing::trace!(target: targets::EDITOR, editor = id.0, kind = %request.kind, "headless editor created");
        Ok(id)
    }

    fn destroy_editor(&mut self, id: EditorId) {
        let mut state = self.state.borrow_mut();
        if state.editors.remove(&id).is_some() {
            state.destroyed.push(id);
        }
    }

    fn editor_alive(&self, id: EditorId) -> bool {
        self.state.borrow().editors.contains_key(&id)
    }

    fn read_editor(&self, id: EditorId) -> Option<EditorContent> {
        self.state.borrow().editors.get(&id).map(|e| e.content.clone())
    }

    fn write_editor(&mut self, id: EditorId, content: &EditorContent) -> bool {
        match self.state.borrow_mut().editors.get_mut(&id) {
            Some(editor) => {
                editor.content = content.clone();
                true
            }
            None => false,
        }
    }

    fn set_editor_invalid(&mut self, id: EditorId, invalid: bool) {
        if let Some(editor) = self.state.borrow_mut().editors.get_mut(&id) {
            editor.invalid = invalid;
        }
    }

    fn move_editor(&mut self, id: EditorId, rect: Rect) {
        if let Some(editor) = self.state.borrow_mut().editors.get_mut(&id) {
            editor.rect = rect;
        }
    }

    fn editor_size(&self, id: EditorId) -> Option<Size> {
        self.state
            .borrow()
            .editors
            .get(&id)
            .map(|e| Size::new(e.rect.width(), EDITOR_HEIGHT))
    }

    fn focus_editor(&mut self, id: EditorId) {
        for (eid, editor) in self.state.borrow_mut().editors.iter_mut() {
            editor.focused = *eid == id;
        }
    }

    fn set_virtual_size(&mut self, size: Size) {
        self.state.borrow_mut().virtual_size = size;
    }

    fn refresh(&mut self, _area: Option<Rect>) {
        self.state.borrow_mut().refreshes += 1;
    }

    fn set_cursor(&mut self, cursor: CursorShape) {
        self.state.borrow_mut().cursor = cursor;
    }

    fn set_tooltip(&mut self, text: Option<&str>) {
        self.state.borrow_mut().tooltip = text.map(str::to_string);
    }

    fn capture_mouse(&mut self) {
        self.state.borrow_mut().captured = true;
    }

    fn release_mouse(&mut self) {
        self.state.borrow_mut().captured = false;
    }

    fn drag_threshold(&self) -> Size {
        let size = self.state.borrow().drag_threshold;
        if size.is_empty() {
            Size::new(4.0, 4.0)
        } else {
            size
        }
    }

    fn start_drag(&mut self, data: &DragData) -> DragOutcome {
        let mut state = self.state.borrow_mut();
        state.drags.push(data.clone());
        state
            .drag_outcomes
            .pop_front()
            .unwrap_or(DragOutcome::Cancelled)
    }

    fn popup_menu(&mut self, entries: &[MenuEntry], at: Point) -> Option<MenuCommand> {
        let mut state = self.state.borrow_mut();
        state.menus.push((entries.to_vec(), at));
        state.menu_picks.pop_front().flatten()
    }

    fn settings_host(&mut self) -> Option<Box<dyn GridHost>> {
        Some(Box::new(HeadlessHost::new()))
    }

    fn run_settings(&mut self, dialog: &mut PropSettings) -> DialogResult {
        // The script runs without the state borrowed so it may call back
        // into this host.
        let script = {
            let mut state = self.state.borrow_mut();
            state.settings_shown += 1;
            state.settings_script.take()
        };
        let Some(mut script) = script else {
            return DialogResult::Cancel;
        };
        let result = script(dialog);
        self.state.borrow_mut().settings_script = Some(script);
        result
    }
}

/// One recorded drawing primitive.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Save,
    Restore,
    Translate { dx: f32, dy: f32 },
    Clip(Rect),
    Fill { rect: Rect, color: Color },
    Stroke { rect: Rect, color: Color, style: LineStyle },
    Line { from: Point, to: Point, color: Color },
    Text { text: String, origin: Point, color: Color },
    Glyph { kind: GlyphKind, origin: Point },
}

/// A [`DrawContext`] that records what is drawn.
///
/// Text is measured as `char_width` per character by `line_height`.
#[derive(Debug, Clone)]
pub struct RecordingContext {
    ops: Vec<DrawOp>,
    pub char_width: f32,
    pub line_height: f32,
}

impl Default for RecordingContext {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingContext {
    pub fn new() -> Self {
        Self {
            ops: Vec::new(),
            char_width: 7.0,
            line_height: 14.0,
        }
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    pub fn clear(&mut self) {
        self.ops.clear();
    }

    /// All drawn strings, in order.
    pub fn texts(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Where `text` was first drawn.
    pub fn text_origin(&self, text: &str) -> Option<Point> {
        self.ops.iter().find_map(|op| match op {
            DrawOp::Text { text: t, origin, .. } if t == text => Some(*origin),
            _ => None,
        })
    }
}

impl DrawContext for RecordingContext {
    fn save(&mut self) {
        self.ops.push(DrawOp::Save);
    }

    fn restore(&mut self) {
        self.ops.push(DrawOp::Restore);
    }

    fn translate(&mut self, dx: f32, dy: f32) {
        self.ops.push(DrawOp::Translate { dx, dy });
    }

    fn clip_rect(&mut self, rect: Rect) {
        self.ops.push(DrawOp::Clip(rect));
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.ops.push(DrawOp::Fill { rect, color });
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color, style: LineStyle) {
        self.ops.push(DrawOp::Stroke { rect, color, style });
    }

    fn draw_line(&mut self, from: Point, to: Point, color: Color) {
        self.ops.push(DrawOp::Line { from, to, color });
    }

    fn text_extent(&mut self, text: &str, _font: &FontDesc) -> Size {
        Size::new(text.chars().count() as f32 * self.char_width, self.line_height)
    }

    fn draw_text(&mut self, text: &str, origin: Point, _font: &FontDesc, color: Color) {
        self.ops.push(DrawOp::Text {
            text: text.to_string(),
            origin,
            color,
        });
    }

    fn draw_glyph(&mut self, glyph: &Glyph, origin: Point) {
        self.ops.push(DrawOp::Glyph {
            kind: glyph.kind,
            origin,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::ValidValue;

    fn request(content: EditorContent) -> EditorRequest {
        EditorRequest {
            kind: EditorKind::TextBox,
            rect: Rect::new(0.0, 0.0, 80.0, 20.0),
            content,
        }
    }

    #[test]
    fn test_editor_table() {
        let mut host = HeadlessHost::new();
        let handle = host.clone();
        let id = host.create_editor(&request(EditorContent::Text("a".into()))).unwrap();
        assert!(host.editor_alive(id));
        assert_eq!(handle.active_editor(), Some(id));
        assert_eq!(host.editor_size(id), Some(Size::new(80.0, EDITOR_HEIGHT)));

        handle.type_text(id, "b");
        assert_eq!(host.read_editor(id), Some(EditorContent::Text("b".into())));

        host.destroy_editor(id);
        assert!(!host.editor_alive(id));
        assert_eq!(handle.state().destroyed, vec![id]);
        assert_eq!(handle.active_editor(), None);
    }

    #[test]
    fn test_scripted_creation_failure() {
        let mut host = HeadlessHost::new();
        host.state_mut().fail_next_editor = true;
        assert!(host.create_editor(&request(EditorContent::Bool(true))).is_err());
        assert!(host.create_editor(&request(EditorContent::Bool(true))).is_ok());
    }

    #[test]
    fn test_select_label() {
        let mut host = HeadlessHost::new();
        let id = host
            .create_editor(&request(EditorContent::Choices {
                items: vec![ValidValue::new("1", "one"), ValidValue::new("2", "two")],
                selected: None,
            }))
            .unwrap();
        assert!(host.select_label(id, "two"));
        assert!(!host.select_label(id, "three"));
        assert!(matches!(
            host.read_editor(id),
            Some(EditorContent::Choices { selected: Some(1), .. })
        ));
    }

    #[test]
    fn test_scripted_menu_and_drag() {
        let mut host = HeadlessHost::new();
        host.script_menu(Some(MenuCommand::Delete));
        assert_eq!(host.popup_menu(&[], Point::ZERO), Some(MenuCommand::Delete));
        assert_eq!(host.popup_menu(&[], Point::ZERO), None);

        host.script_drag(DragOutcome::DroppedElsewhere);
        let data = DragData::external("x");
        assert_eq!(host.start_drag(&data), DragOutcome::DroppedElsewhere);
        assert_eq!(host.start_drag(&data), DragOutcome::Cancelled);
        assert_eq!(host.state().drags.len(), 2);
    }

    #[test]
    fn test_recording_context_measures_text() {
        let mut dc = RecordingContext::new();
        assert_eq!(dc.text_extent("abc", &FontDesc::default()), Size::new(21.0, 14.0));
        dc.draw_text("abc", Point::new(1.0, 2.0), &FontDesc::default(), Color::BLACK);
        assert_eq!(dc.texts(), vec!["abc"]);
        assert_eq!(dc.text_origin("abc"), Some(Point::new(1.0, 2.0)));
    }
}
