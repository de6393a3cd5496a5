//! Mouse and keyboard handling.
//!
//! All points are client coordinates, as delivered by the toolkit.

use horizon_propgrid_core::logging::targets;
use horizon_propgrid_core::{Point, Size};

use super::{PendingDrag, PropGrid, PropMut, ResizeMode};
use crate::event::PropEventKind;
use crate::host::{CursorShape, Key, KeyboardModifiers};
use crate::property::{HitRegion, PropId};

impl PropGrid {
    /// Left button pressed.
    pub fn on_mouse_down(&mut self, pt: Point) {
        let upt = self.to_unscrolled(pt);
        let mut index = self.hit_test_unscrolled(upt);
        self.interaction.pos_mouse_down = upt;
        self.interaction.resize = ResizeMode::None;
        self.interaction.drag = None;

        if let Some(i) = index {
            let id = self.order[i];
            let region = self.prop_mouse_down(id, upt);
            self.interaction.prop_under_mouse = Some(id);
            self.set_capture(true);

            match region {
                Some(HitRegion::Splitter) => self.interaction.resize = ResizeMode::Splitter,
                Some(HitRegion::BottomEdge) => self.interaction.resize = ResizeMode::BottomEdge,
                // The top band of a row resizes the row above it.
                Some(HitRegion::TopEdge) => {
                    if let Some(above) = i.checked_sub(1) {
                        index = Some(above);
                        self.interaction.prop_under_mouse = self.id_at(above);
                        self.interaction.resize = ResizeMode::BottomEdge;
                    }
                }
                Some(HitRegion::Label | HitRegion::Gripper) | None => {
                    let draggable = self.props.get(id).is_some_and(|p| p.draggable);
                    if self.config.draggable && draggable {
                        self.interaction.drag = Some(PendingDrag {
                            start: pt,
                            prop: id,
                            running: false,
                        });
                    }
                }
                _ => {}
            }
        }

        self.set_selection(index.and_then(|i| self.id_at(i)));
    }

    fn prop_mouse_down(&mut self, id: PropId, upt: Point) -> Option<HitRegion> {
        let prop = self.props.get(id)?;
        let region = prop.hit_test(upt);
        let editable = prop.enable && !prop.readonly;
        match region {
            Some(HitRegion::Expander) => {
                PropMut::new(self, id).toggle_expand();
            }
            Some(HitRegion::Splitter) | None => {
                self.commit_editor(id);
                self.destroy_editor(id);
            }
            Some(HitRegion::Value) if editable => {
                self.create_editor(id);
            }
            _ => {}
        }
        region
    }

    /// Left button released.
    pub fn on_mouse_up(&mut self, pt: Point) {
        let upt = self.to_unscrolled(pt);
        if let Some(id) = self.interaction.prop_under_mouse.take()
            && let Some(prop) = self.props.get(id)
            && prop.enable
            && prop.show_check
            && prop.hit_test(upt) == Some(HitRegion::Check)
        {
            let checked = prop.checked;
            PropMut::new(self, id).set_checked(!checked);
        }
        self.set_capture(false);
        self.interaction.pos_mouse_down = Point::ZERO;
        self.interaction.resize = ResizeMode::None;
        self.interaction.drag = None;
    }

    /// Pointer moved. `left_down` is the left button state.
    pub fn on_mouse_move(&mut self, pt: Point, left_down: bool) {
        let upt = self.to_unscrolled(pt);
        if left_down {
            self.maybe_start_drag(pt);
            if let Some(id) = self.interaction.prop_under_mouse {
                self.drag_resize(id, pt, upt);
            }
            return;
        }

        let index = self.hit_test_unscrolled(upt);
        let id = index.and_then(|i| self.id_at(i));
        let mut cursor = CursorShape::Default;
        let mut tooltip = None;
        if let (Some(i), Some(prop)) = (index, id.and_then(|id| self.props.get(id))) {
            let region = prop.hit_test(upt);
            cursor = match region {
                Some(HitRegion::Splitter) => CursorShape::ResizeHorizontal,
                Some(HitRegion::BottomEdge) => CursorShape::ResizeVertical,
                Some(HitRegion::TopEdge) if i > 0 => CursorShape::ResizeVertical,
                _ => CursorShape::Default,
            };
            tooltip = match region {
                Some(HitRegion::Label) if prop.show_label_tips => Some(prop.label_tip().to_string()),
                Some(HitRegion::Value) if prop.show_value_tips => Some(prop.value_tip()),
                Some(HitRegion::Expander) => Some(prop.label_tip().to_string()),
                _ => None,
            };
        }

        if tooltip != self.interaction.tooltip {
            self.host.set_tooltip(tooltip.as_deref());
            self.interaction.tooltip = tooltip;
        }
        if cursor != self.interaction.cursor {
            self.interaction.cursor = cursor;
            self.host.set_cursor(cursor);
        }
        if id != self.interaction.hover {
            self.interaction.hover = id;
            if let Some(id) = id {
                self.notify(PropEventKind::Highlighted, id);
            }
        }
    }

    fn drag_resize(&mut self, id: PropId, pt: Point, upt: Point) {
        match self.interaction.resize {
            ResizeMode::Splitter => {
                let width = pt.x.max(self.config.min_title_width);
                self.art.set_title_width(width);
                self.update_grid();
            }
            ResizeMode::BottomEdge => {
                let Some(size) = self.props.get(id).map(|p| p.min_size) else {
                    return;
                };
                let delta = upt.y - self.interaction.pos_mouse_down.y;
                let height = (size.height + delta).max(self.config.min_row_height);
                if height != size.height {
                    self.interaction.pos_mouse_down = upt;
                    PropMut::new(self, id).set_min_size(Size::new(size.width, height));
                }
            }
            ResizeMode::None => {}
        }
    }

    fn maybe_start_drag(&mut self, pt: Point) {
        let Some(drag) = self.interaction.drag else {
            return;
        };
        if drag.running {
            return;
        }
        let threshold = self.config.drag_threshold(self.host.drag_threshold());
        if (drag.start.x - pt.x).abs() <= threshold.width
            && (drag.start.y - pt.y).abs() <= threshold.height
        {
            return;
        }
        if self.notify(PropEventKind::BeginDrag, drag.prop).is_vetoed() {
            tracing::debug!(target: targets::DRAG, "drag vetoed");
            self.interaction.drag = None;
            return;
        }
        self.run_drag(drag.prop);
    }

    pub fn on_mouse_double_click(&mut self, pt: Point) {
        let upt = self.to_unscrolled(pt);
        let Some(id) = self.hit_test_unscrolled(upt).and_then(|i| self.id_at(i)) else {
            return;
        };
        let Some(prop) = self.props.get(id) else {
            return;
        };
        if !prop.enable {
            return;
        }
        if !prop.readonly && prop.hit_test(upt) == Some(HitRegion::Value) {
            self.create_editor(id);
        }
        self.notify(PropEventKind::DoubleClick, id);
    }

    /// Right button released. Selects the row and emits `RightClick`; unless
    /// vetoed, the context menu opens.
    pub fn on_mouse_right_click(&mut self, pt: Point) {
        let upt = self.to_unscrolled(pt);
        let id = self.hit_test_unscrolled(upt).and_then(|i| self.id_at(i));
        self.set_selection(id);
        let Some(id) = id else {
            return;
        };
        let Some(prop) = self.props.get(id) else {
            return;
        };
        if !prop.enable {
            return;
        }
        if prop.hit_test(upt).is_none() {
            self.commit_editor(id);
            self.destroy_editor(id);
        }
        self.interaction.menu_at = pt;
        self.notify(PropEventKind::RightClick, id);
    }

    /// Pointer left the window.
    pub fn on_mouse_leave(&mut self) {
        self.interaction.hover = None;
        if self.interaction.tooltip.take().is_some() {
            self.host.set_tooltip(None);
        }
        if self.interaction.cursor != CursorShape::Default {
            self.interaction.cursor = CursorShape::Default;
            self.host.set_cursor(CursorShape::Default);
        }
    }

    /// The toolkit took the mouse capture away.
    pub fn on_capture_lost(&mut self) {
        self.interaction.captured = false;
        self.interaction.prop_under_mouse = None;
        self.interaction.resize = ResizeMode::None;
        self.interaction.drag = None;
    }

    /// Key pressed while the grid has focus. Returns whether it was
    /// consumed; unconsumed keys are reported as `KeyDown`.
    pub fn on_key_down(&mut self, key: Key, modifiers: KeyboardModifiers) -> bool {
        let Some(id) = self.selected else {
            return false;
        };
        let command = modifiers.command();
        match key {
            Key::Left if command => {
                PropMut::new(self, id).shift_indent(-1);
            }
            Key::Left => {
                PropMut::new(self, id).set_expand(false);
            }
            Key::Right if command => {
                PropMut::new(self, id).shift_indent(1);
            }
            Key::Right => {
                PropMut::new(self, id).set_expand(true);
            }
            Key::Up if command => {
                self.move_up(id);
            }
            Key::Up => {
                self.navigate(false);
            }
            Key::Down if command => {
                self.move_down(id);
            }
            Key::Down => {
                self.navigate(true);
            }
            Key::Delete => {
                self.remove(id);
            }
            _ => {
                let mut event = self.event_for(PropEventKind::KeyDown, id);
                event.key = Some(key);
                self.emit(event);
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use horizon_propgrid_core::{Point, Size};

    use crate::grid::PropGrid;
    use crate::headless::HeadlessHost;
    use crate::host::{CursorShape, Key, KeyboardModifiers};
    use crate::property::PropertyBuilder;

    // Default native metrics on a 300 px wide grid: label 8..150,
    // splitter 152..160, value 160..300. Rows start at y = 1.
    fn grid(host: &HeadlessHost) -> PropGrid {
        let mut grid = PropGrid::new(host.clone());
        grid.set_client_size(Size::new(300.0, 200.0));
        grid.append(PropertyBuilder::text("a"));
        grid.append(PropertyBuilder::text("b").indent(1));
        grid.append(PropertyBuilder::text("c"));
        grid
    }

    #[test]
    fn test_click_value_selects_and_edits() {
        let host = HeadlessHost::new();
        let mut grid = grid(&host);
        grid.on_mouse_down(Point::new(200.0, 40.0));
        grid.on_mouse_up(Point::new(200.0, 40.0));
        assert_eq!(grid.selection(), Some(1));
        assert!(grid.get_index(1).unwrap().is_editing());
        assert!(!host.state().captured);
    }

    #[test]
    fn test_click_label_moves_selection_and_closes_editor() {
        let host = HeadlessHost::new();
        let mut grid = grid(&host);
        grid.on_mouse_down(Point::new(200.0, 40.0));
        let editor = host.active_editor().unwrap();
        host.type_text(editor, "typed");
        grid.on_mouse_up(Point::new(200.0, 40.0));

        grid.on_mouse_down(Point::new(20.0, 60.0));
        grid.on_mouse_up(Point::new(20.0, 60.0));
        assert_eq!(grid.selection(), Some(2));
        assert_eq!(host.state().live_editors(), 0);
        assert_eq!(grid.get_index(1).unwrap().value().to_string(), "typed");
    }

    #[test]
    fn test_click_empty_area_clears_selection() {
        let host = HeadlessHost::new();
        let mut grid = grid(&host);
        grid.set_selection_index(Some(0));
        grid.on_mouse_down(Point::new(20.0, 150.0));
        assert_eq!(grid.selection(), None);
    }

    #[test]
    fn test_splitter_drag_sets_title_width() {
        let host = HeadlessHost::new();
        let mut grid = grid(&host);
        grid.on_mouse_down(Point::new(155.0, 10.0));
        grid.on_mouse_move(Point::new(30.0, 10.0), true);
        assert_eq!(grid.art().title_width(), 50.0);
        grid.on_mouse_move(Point::new(180.0, 10.0), true);
        grid.on_mouse_up(Point::new(180.0, 10.0));
        assert_eq!(grid.art().title_width(), 180.0);
    }

    #[test]
    fn test_bottom_edge_resize_is_clamped() {
        let host = HeadlessHost::new();
        let mut grid = grid(&host);
        // Bottom band of row a is 24..26.
        grid.on_mouse_down(Point::new(100.0, 25.0));
        grid.on_mouse_move(Point::new(100.0, 45.0), true);
        assert_eq!(grid.get_index(0).unwrap().min_size().height, 45.0);
        grid.on_mouse_move(Point::new(100.0, 0.0), true);
        assert_eq!(grid.get_index(0).unwrap().min_size().height, 25.0);
        grid.on_mouse_up(Point::new(100.0, 0.0));
    }

    #[test]
    fn test_hover_cursor_and_tooltip() {
        let host = HeadlessHost::new();
        let mut grid = grid(&host);
        grid.on_mouse_move(Point::new(155.0, 10.0), false);
        assert_eq!(host.state().cursor, CursorShape::ResizeHorizontal);
        grid.on_mouse_move(Point::new(100.0, 25.0), false);
        assert_eq!(host.state().cursor, CursorShape::ResizeVertical);
        grid.on_mouse_leave();
        assert_eq!(host.state().cursor, CursorShape::Default);
    }

    #[test]
    fn test_keyboard_navigation_and_indent() {
        let host = HeadlessHost::new();
        let mut grid = grid(&host);
        grid.set_selection_index(Some(0));
        assert!(grid.on_key_down(Key::Down, KeyboardModifiers::NONE));
        assert_eq!(grid.selection(), Some(1));
        grid.on_key_down(Key::Right, KeyboardModifiers::CTRL);
        assert_eq!(grid.get_index(1).unwrap().indent(), 2);
        grid.on_key_down(Key::Left, KeyboardModifiers::CTRL);
        grid.on_key_down(Key::Left, KeyboardModifiers::CTRL);
        grid.on_key_down(Key::Left, KeyboardModifiers::CTRL);
        assert_eq!(grid.get_index(1).unwrap().indent(), 0);
        assert!(!grid.on_key_down(Key::Char('x'), KeyboardModifiers::NONE));
    }

    #[test]
    fn test_left_collapses_selected_parent() {
        let host = HeadlessHost::new();
        let mut grid = grid(&host);
        grid.set_selection_index(Some(0));
        grid.on_key_down(Key::Left, KeyboardModifiers::NONE);
        assert!(!grid.get_index(1).unwrap().is_visible());
        grid.on_key_down(Key::Right, KeyboardModifiers::NONE);
        assert!(grid.get_index(1).unwrap().is_visible());
    }

    #[test]
    fn test_delete_key_removes_selected() {
        let host = HeadlessHost::new();
        let mut grid = grid(&host);
        grid.set_selection_index(Some(2));
        grid.on_key_down(Key::Delete, KeyboardModifiers::NONE);
        assert_eq!(grid.count(), 2);
        assert_eq!(grid.selection(), Some(1));
    }
}
