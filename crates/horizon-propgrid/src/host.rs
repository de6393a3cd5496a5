//! Interfaces to the host GUI toolkit.
//!
//! The grid never talks to a windowing system directly. Everything that
//! needs a real toolkit (native editor controls, mouse capture, cursors,
//! tooltips, popup menus, the OS drag loop, drawing) goes through
//! [`GridHost`] and [`DrawContext`]. [`crate::headless::HeadlessHost`] is an
//! in-memory implementation used by tests and off-screen tooling.

use horizon_propgrid_core::{Color, FontDesc, Point, Rect, Size};

use crate::format::ValidValue;
use crate::grid::GridId;
use crate::property::PropId;
use crate::settings::PropSettings;
use crate::style::EditorKind;

/// Handle to a native editor control, minted by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EditorId(pub u64);

/// What a native editor shows, or what it currently holds.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorContent {
    /// Free text: text boxes and the text field of pickers.
    Text(String),
    /// A discrete list; `selected` indexes into `items`.
    Choices {
        items: Vec<ValidValue>,
        selected: Option<usize>,
    },
    /// A check box.
    Bool(bool),
    /// A slider or spin box.
    Range { min: i64, max: i64, value: i64 },
}

/// Request to create an inline editor.
#[derive(Debug, Clone, PartialEq)]
pub struct EditorRequest {
    pub kind: EditorKind,
    /// Value region in client (scrolled) coordinates.
    pub rect: Rect,
    pub content: EditorContent,
}

/// Mouse cursor shapes the grid asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorShape {
    #[default]
    Default,
    ResizeHorizontal,
    ResizeVertical,
}

/// Line style for outlines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineStyle {
    #[default]
    Solid,
    Dotted,
}

/// Small icons drawn by art providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GlyphKind {
    ExpanderCollapsed,
    ExpanderExpanded,
    RadioOff,
    RadioOffDisabled,
    RadioOn,
    RadioOnHighlighted,
}

/// An icon owned by an art provider: what to draw and how big it is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Glyph {
    pub kind: GlyphKind,
    pub size: Size,
}

/// Drawing primitives the art providers paint with.
pub trait DrawContext {
    /// Push the current transform and clip.
    fn save(&mut self);

    /// Pop the last pushed transform and clip.
    fn restore(&mut self);

    fn translate(&mut self, dx: f32, dy: f32);

    /// Intersect the clip region with `rect`.
    fn clip_rect(&mut self, rect: Rect);

    fn fill_rect(&mut self, rect: Rect, color: Color);

    fn stroke_rect(&mut self, rect: Rect, color: Color, style: LineStyle);

    fn draw_line(&mut self, from: Point, to: Point, color: Color);

    /// Size of `text` when drawn in `font`.
    fn text_extent(&mut self, text: &str, font: &FontDesc) -> Size;

    /// Draw `text` with its top-left corner at `origin`.
    fn draw_text(&mut self, text: &str, origin: Point, font: &FontDesc, color: Color);

    /// Draw an icon with its top-left corner at `origin`.
    fn draw_glyph(&mut self, glyph: &Glyph, origin: Point);
}

/// Keys the grid reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    Delete,
    Enter,
    Escape,
    Tab,
    Char(char),
    Other(u32),
}

/// Keyboard modifier state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyboardModifiers {
    /// The Shift key is held.
    pub shift: bool,
    /// The Control key is held (Cmd on macOS).
    pub control: bool,
    /// The Alt key is held (Option on macOS).
    pub alt: bool,
    /// The Meta/Super key is held.
    pub meta: bool,
}

impl KeyboardModifiers {
    /// No modifiers pressed.
    pub const NONE: Self = Self {
        shift: false,
        control: false,
        alt: false,
        meta: false,
    };

    /// Control modifier only.
    pub const CTRL: Self = Self {
        shift: false,
        control: true,
        alt: false,
        meta: false,
    };

    /// The platform command modifier: Control, or Cmd on macOS.
    pub fn command(&self) -> bool {
        self.control || self.meta
    }
}

/// Commands of the row context menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuCommand {
    AddSeparator,
    ToggleReadOnly,
    IndentIncrease,
    IndentDecrease,
    MoveUp,
    MoveDown,
    Delete,
    Properties,
}

/// One line of a popup menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuEntry {
    Item {
        command: MenuCommand,
        label: String,
        accelerator: Option<String>,
        /// `Some` for check items.
        checked: Option<bool>,
    },
    Separator,
}

/// The payload of a drag started by a grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragData {
    /// The row name, which is also the text payload for external targets.
    pub name: String,
    /// The grid the drag started in, `None` for foreign payloads.
    pub source: Option<GridId>,
    /// The dragged row inside the source grid.
    pub prop: Option<PropId>,
}

impl DragData {
    /// A text payload that did not come from a property grid.
    pub fn external(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: None,
            prop: None,
        }
    }
}

/// How the OS drag loop ended, as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragOutcome {
    /// Released over the source grid at this client point.
    DroppedHere(Point),
    /// Released over another target. That target handles the drop.
    DroppedElsewhere,
    Cancelled,
}

/// Result of a modal dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogResult {
    Ok,
    Cancel,
}

/// Capabilities the grid consumes from the toolkit.
///
/// Editor management is required. Everything else has a no-op default so a
/// minimal host only needs to deal with editors.
pub trait GridHost {
    /// Create a native editor control.
    fn create_editor(&mut self, request: &EditorRequest) -> Result<EditorId, crate::HostError>;

    /// Destroy an editor. Unknown ids are ignored.
    fn destroy_editor(&mut self, id: EditorId);

    /// Whether the editor still exists.
    fn editor_alive(&self, id: EditorId) -> bool;

    /// Current content of the editor, or `None` if it is gone.
    fn read_editor(&self, id: EditorId) -> Option<EditorContent>;

    /// Replace the editor content. Returns `false` if it is gone.
    fn write_editor(&mut self, id: EditorId, content: &EditorContent) -> bool;

    /// Show or clear invalid-input feedback (red text or equivalent).
    fn set_editor_invalid(&mut self, id: EditorId, invalid: bool);

    /// Reposition an editor. `rect` is in client coordinates.
    fn move_editor(&mut self, id: EditorId, rect: Rect);

    /// Natural size of the editor, used to grow its row.
    fn editor_size(&self, id: EditorId) -> Option<Size>;

    fn focus_editor(&mut self, id: EditorId);

    /// Update the scrollable area.
    fn set_virtual_size(&mut self, _size: Size) {}

    /// Request a repaint of `area` (client coordinates), or of everything.
    fn refresh(&mut self, _area: Option<Rect>) {}

    fn set_cursor(&mut self, _cursor: CursorShape) {}

    fn set_tooltip(&mut self, _text: Option<&str>) {}

    fn capture_mouse(&mut self) {}

    fn release_mouse(&mut self) {}

    /// System drag-start distance. The grid enforces at least 10x4 px.
    fn drag_threshold(&self) -> Size {
        Size::new(4.0, 4.0)
    }

    /// Run the platform drag loop. Mouse capture is already released.
    fn start_drag(&mut self, _data: &DragData) -> DragOutcome {
        DragOutcome::Cancelled
    }

    /// Show a popup menu at `at` (client coordinates) and return the pick.
    fn popup_menu(&mut self, _entries: &[MenuEntry], _at: Point) -> Option<MenuCommand> {
        None
    }

    /// A host for the grid embedded in a settings dialog.
    fn settings_host(&mut self) -> Option<Box<dyn GridHost>> {
        None
    }

    /// Show the settings dialog modally.
    fn run_settings(&mut self, _dialog: &mut PropSettings) -> DialogResult {
        DialogResult::Cancel
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_modifier() {
        assert!(KeyboardModifiers::CTRL.command());
        assert!(
            KeyboardModifiers {
                meta: true,
                ..Default::default()
            }
            .command()
        );
        assert!(!KeyboardModifiers::NONE.command());
    }

    #[test]
    fn test_external_payload() {
        let data = DragData::external("dropped");
        assert_eq!(data.source, None);
        assert_eq!(data.prop, None);
    }
}
