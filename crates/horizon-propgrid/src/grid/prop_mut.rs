//! Runtime mutation of one row.

use std::any::Any;
use std::sync::Arc;

use horizon_propgrid_core::logging::targets;
use horizon_propgrid_core::{Color, FontDesc, Size};

use super::PropGrid;
use super::editing::update_description;
use crate::event::PropEventKind;
use crate::format::{Formatter, ValueFormat};
use crate::property::{Notify, PropId, Property, StateColors};
use crate::style::ControlStyle;
use crate::value::PropValue;

/// A mutation handle for one row of a [`PropGrid`].
///
/// Setters notify the grid so it can repaint, relayout or ask listeners.
/// Call [`silent`](Self::silent) first to change state without any of that,
/// then [`PropGrid::update_grid`] once when done:
///
/// ```
/// use horizon_propgrid::{HeadlessHost, PropGrid, PropertyBuilder};
///
/// let mut grid = PropGrid::new(HeadlessHost::new());
/// grid.append(PropertyBuilder::int("count"));
/// grid.prop_mut("count").unwrap().silent().set_label("Count").set_indent(1);
/// grid.update_grid();
/// assert_eq!(grid.get_index(0).unwrap().label(), "Count");
/// ```
pub struct PropMut<'g> {
    grid: &'g mut PropGrid,
    id: PropId,
    notify: Notify,
}

impl<'g> PropMut<'g> {
    pub(crate) fn new(grid: &'g mut PropGrid, id: PropId) -> Self {
        Self {
            grid,
            id,
            notify: Notify::Emit,
        }
    }

    /// Apply the following changes without notifications.
    pub fn silent(mut self) -> Self {
        self.notify = Notify::Silent;
        self
    }

    pub fn with_notify(mut self, notify: Notify) -> Self {
        self.notify = notify;
        self
    }

    pub fn id(&self) -> PropId {
        self.id
    }

    pub fn get(&self) -> Option<&Property> {
        self.grid.props.get(self.id)
    }

    fn update(&mut self, f: impl FnOnce(&mut Property)) -> &mut Self {
        if let Some(prop) = self.grid.props.get_mut(self.id) {
            f(prop);
        }
        self
    }

    fn refresh(&mut self) -> &mut Self {
        if !self.notify.is_silent() && self.get().is_some_and(|p| p.visible) {
            self.grid.notify(PropEventKind::Refresh, self.id);
        }
        self
    }

    fn resize(&mut self) -> &mut Self {
        if !self.notify.is_silent() {
            self.grid.notify(PropEventKind::Resize, self.id);
        }
        self
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> &mut Self {
        let name = name.into();
        self.update(|p| p.name = name).refresh()
    }

    pub fn set_label(&mut self, label: impl Into<String>) -> &mut Self {
        let label = label.into();
        self.update(|p| p.label = label).refresh()
    }

    /// Tooltip for the label. `None` falls back to the row name.
    pub fn set_label_tip(&mut self, tip: Option<String>) -> &mut Self {
        self.update(|p| p.label_tip = tip)
    }

    /// Tooltip for the value. `None` falls back to the formatted value.
    pub fn set_value_tip(&mut self, tip: Option<String>) -> &mut Self {
        self.update(|p| p.value_tip = tip)
    }

    pub fn set_description(&mut self, description: impl Into<String>) -> &mut Self {
        let description = description.into();
        self.update(|p| p.description = description).refresh()
    }

    pub fn set_data<T: Any + Send + Sync>(&mut self, data: T) -> &mut Self {
        self.update(|p| p.data = Some(Arc::new(data)))
    }

    /// Store a new value, normalized through the formatter.
    ///
    /// Fails on read-only rows and on values the formatter rejects. Any
    /// open editor is closed without committing.
    pub fn set_value(&mut self, value: impl Into<PropValue>) -> bool {
        let value = value.into();
        let Some(prop) = self.get() else {
            return false;
        };
        if prop.readonly {
            tracing::debug!(target: targets::PROPERTY, name = %prop.name, "value change refused, row is read-only");
            return false;
        }
        let normalized = match prop.formatter.as_deref() {
            Some(f) if !value.is_empty() => {
                match f.format(&value).and_then(|text| f.coerce(&text)) {
                    Ok(v) => v,
                    Err(err) => {
                        tracing::debug!(target: targets::PROPERTY, name = %prop.name, error = %err, "value rejected");
                        return false;
                    }
                }
            }
            _ => value,
        };

        self.grid.destroy_editor(self.id);
        self.update(|p| {
            p.value = normalized;
            p.value_valid = true;
            update_description(p);
        });
        self.refresh();
        true
    }

    /// Replace the formatter. An open editor is committed and closed first.
    pub fn set_formatter(&mut self, formatter: Option<Formatter>) -> &mut Self {
        self.grid.commit_and_close(self.id);
        self.update(|p| {
            p.formatter = formatter.map(Arc::new);
            if let Some(f) = p.formatter.clone()
                && !p.value.is_empty()
            {
                match f.format(&p.value).and_then(|text| f.coerce(&text)) {
                    Ok(v) => {
                        p.value = v;
                        p.value_valid = true;
                    }
                    Err(_) => p.value_valid = false,
                }
            } else {
                p.value_valid = true;
            }
        })
        .refresh()
    }

    /// Change the editor kind. An open editor is committed and closed first.
    pub fn set_control_style(&mut self, style: impl Into<ControlStyle>) -> &mut Self {
        let style = style.into();
        self.grid.commit_and_close(self.id);
        self.update(|p| p.control_style = style).refresh()
    }

    /// Change the editor kind by name. Unknown names leave the row as is.
    pub fn set_control_style_name(&mut self, name: &str) -> bool {
        match name.parse::<ControlStyle>() {
            Ok(style) => {
                self.set_control_style(style);
                true
            }
            Err(err) => {
                tracing::warn!(target: targets::PROPERTY, error = %err, "unknown control style");
                false
            }
        }
    }

    /// Change the indent. The grid recomputes the hierarchy.
    pub fn set_indent(&mut self, indent: usize) -> &mut Self {
        if self.get().is_none_or(|p| p.indent == indent) {
            return self;
        }
        self.update(|p| p.indent = indent);
        if !self.notify.is_silent() {
            self.grid.notify(PropEventKind::Indent, self.id);
        }
        self
    }

    /// Change the indent by `delta`, stopping at zero.
    pub fn shift_indent(&mut self, delta: isize) -> &mut Self {
        let indent = self.get().map_or(0, |p| p.indent);
        self.set_indent(indent.saturating_add_signed(delta))
    }

    /// Expand or collapse. Rows without children ignore this.
    pub fn set_expand(&mut self, expand: bool) -> &mut Self {
        if self
            .get()
            .is_none_or(|p| !p.has_children || p.expanded == expand)
        {
            return self;
        }
        self.update(|p| p.expanded = expand);
        if !self.notify.is_silent() {
            let kind = if expand {
                PropEventKind::Expanded
            } else {
                PropEventKind::Collapsed
            };
            self.grid.notify(kind, self.id);
        }
        self
    }

    pub fn toggle_expand(&mut self) -> &mut Self {
        let expanded = self.get().is_some_and(|p| p.expanded);
        self.set_expand(!expanded)
    }

    /// Set the check icon state. A change emits `ClickCheck`; a veto
    /// restores the previous state and returns `false`.
    pub fn set_checked(&mut self, checked: bool) -> bool {
        if self.get().is_none_or(|p| p.checked == checked) {
            return self.get().is_some();
        }
        self.update(|p| p.checked = checked);
        let verdict = self.grid.notify(PropEventKind::ClickCheck, self.id);
        if verdict.is_vetoed() {
            tracing::debug!(target: targets::PROPERTY, "check change vetoed");
            self.update(|p| p.checked = !checked);
        }
        self.refresh();
        verdict.is_accepted()
    }

    pub fn set_enable(&mut self, enable: bool) -> &mut Self {
        self.update(|p| p.enable = enable).refresh()
    }

    /// Make the row read-only. An open editor is closed without committing.
    pub fn set_readonly(&mut self, readonly: bool) -> &mut Self {
        if readonly {
            self.grid.destroy_editor(self.id);
        }
        self.update(|p| p.readonly = readonly).refresh()
    }

    pub fn set_separator(&mut self, separator: bool) -> &mut Self {
        self.grid.commit_and_close(self.id);
        self.update(|p| p.separator = separator).resize()
    }

    pub fn set_show_check(&mut self, show: bool) -> &mut Self {
        self.update(|p| p.show_check = show).resize()
    }

    pub fn set_draggable(&mut self, draggable: bool) -> &mut Self {
        self.update(|p| p.draggable = draggable)
    }

    pub fn set_configurable(&mut self, configurable: bool) -> &mut Self {
        self.update(|p| p.configurable = configurable)
    }

    pub fn set_italic(&mut self, italic: bool) -> &mut Self {
        self.update(|p| p.italic = italic).refresh()
    }

    /// `None` uses the art provider's font.
    pub fn set_font_label(&mut self, font: Option<FontDesc>) -> &mut Self {
        self.update(|p| p.font_label = font).refresh()
    }

    pub fn set_font_value(&mut self, font: Option<FontDesc>) -> &mut Self {
        self.update(|p| p.font_value = font).refresh()
    }

    pub fn set_text_colors(&mut self, colors: StateColors) -> &mut Self {
        self.update(|p| p.text_colors = colors).refresh()
    }

    pub fn set_bg_colors(&mut self, colors: StateColors) -> &mut Self {
        self.update(|p| p.bg_colors = colors).refresh()
    }

    pub fn set_gripper_color(&mut self, color: Option<Color>) -> &mut Self {
        self.update(|p| p.gripper_color = color).refresh()
    }

    /// Per-row label column width. `None` uses the art provider's.
    pub fn set_title_width(&mut self, width: Option<f32>) -> &mut Self {
        self.update(|p| p.title_width = width.map(|w| w.max(0.0)))
            .resize()
    }

    pub fn set_min_size(&mut self, size: Size) -> &mut Self {
        if self.get().is_none_or(|p| p.min_size == size) {
            return self;
        }
        self.update(|p| p.min_size = size).resize()
    }

    /// Make this row the selection.
    pub fn select(&mut self) -> bool {
        self.grid.set_selection(Some(self.id))
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use horizon_propgrid_core::{Size, Verdict};

    use crate::event::PropEventKind;
    use crate::grid::PropGrid;
    use crate::headless::HeadlessHost;
    use crate::property::PropertyBuilder;
    use crate::style::{ControlStyle, EditorKind};
    use crate::value::PropValue;

    fn grid() -> PropGrid {
        let mut grid = PropGrid::new(HeadlessHost::new());
        grid.set_client_size(Size::new(300.0, 200.0));
        grid.append(PropertyBuilder::int("n").value(3));
        grid.append(PropertyBuilder::text("t"));
        grid
    }

    fn record(grid: &mut PropGrid) -> Rc<RefCell<Vec<PropEventKind>>> {
        let kinds = Rc::new(RefCell::new(Vec::new()));
        let sink = kinds.clone();
        grid.observe(move |e| sink.borrow_mut().push(e.kind));
        kinds
    }

    #[test]
    fn test_set_value_normalizes() {
        let mut grid = grid();
        assert!(grid.prop_mut("n").unwrap().set_value("42"));
        assert_eq!(grid.get_index(0).unwrap().value(), &PropValue::Int(42));
        assert!(!grid.prop_mut("n").unwrap().set_value("forty"));
        assert_eq!(grid.get_index(0).unwrap().value(), &PropValue::Int(42));
    }

    #[test]
    fn test_readonly_refuses_value() {
        let mut grid = grid();
        grid.prop_mut("n").unwrap().set_readonly(true);
        assert!(!grid.prop_mut("n").unwrap().set_value(9));
        assert_eq!(grid.get_index(0).unwrap().value(), &PropValue::Int(3));
    }

    #[test]
    fn test_silent_skips_events() {
        let mut grid = grid();
        let kinds = record(&mut grid);
        grid.prop_mut("t").unwrap().silent().set_value("x");
        grid.prop_mut("t").unwrap().silent().set_indent(1);
        assert!(kinds.borrow().is_empty());
        grid.prop_mut("t").unwrap().set_value("y");
        assert_eq!(*kinds.borrow(), [PropEventKind::Refresh]);
    }

    #[test]
    fn test_indent_rebuilds_hierarchy() {
        let mut grid = grid();
        grid.prop_mut("t").unwrap().set_indent(1);
        assert!(grid.get_index(0).unwrap().has_children());
        grid.prop_mut("t").unwrap().shift_indent(-5);
        assert_eq!(grid.get_index(1).unwrap().indent(), 0);
        assert!(!grid.get_index(0).unwrap().has_children());
    }

    #[test]
    fn test_expand_needs_children() {
        let mut grid = grid();
        let kinds = record(&mut grid);
        grid.prop_mut("n").unwrap().set_expand(false);
        assert!(grid.get_index(0).unwrap().is_expanded());
        assert!(kinds.borrow().is_empty());
    }

    #[test]
    fn test_check_veto_rolls_back() {
        let mut grid = grid();
        grid.prop_mut("n").unwrap().set_show_check(true);
        grid.connect(|e| Verdict::from(e.kind != PropEventKind::ClickCheck));
        assert!(!grid.prop_mut("n").unwrap().set_checked(true));
        assert!(!grid.get_index(0).unwrap().is_checked());
    }

    #[test]
    fn test_control_style_name() {
        let mut grid = grid();
        assert!(grid.prop_mut("n").unwrap().set_control_style_name("spin"));
        assert_eq!(
            grid.get_index(0).unwrap().control_style(),
            ControlStyle::Editor(EditorKind::Spin)
        );
        assert!(!grid.prop_mut("n").unwrap().set_control_style_name("wheel"));
    }

    #[test]
    fn test_set_value_closes_editor() {
        let host = HeadlessHost::new();
        let mut grid = PropGrid::new(host.clone());
        grid.set_client_size(Size::new(300.0, 200.0));
        let id = grid.append(PropertyBuilder::text("t"));
        grid.create_editor(id);
        assert!(grid.prop_mut(id).unwrap().set_value("direct"));
        assert_eq!(host.state().live_editors(), 0);
    }
}
