//! The per-row settings dialog.
//!
//! [`PropSettings`] is a model for a modal dialog that edits one row's own
//! attributes (name, label, value, description, indent, flags, control
//! style, fonts and colors). It hosts a
//! second [`PropGrid`] with one row per attribute, so the dialog body is
//! itself a property grid. The owning grid builds it, hands it to
//! [`GridHost::run_settings`](crate::host::GridHost::run_settings) and, on
//! confirmation, calls [`PropSettings::apply`].

use horizon_propgrid_core::logging::targets;
use horizon_propgrid_core::{Color, FontDesc};

use crate::art::{ArtProvider, ColorSet, RowState};
use crate::config::GridConfig;
use crate::error::{PropGridError, PropGridResult};
use crate::grid::PropGrid;
use crate::host::GridHost;
use crate::property::{Notify, PropId, Property, PropertyBuilder, StateColors};
use crate::style::ControlStyle;
use crate::value::PropValue;

/// Width of the label column in the settings grid.
const SETTINGS_TITLE_WIDTH: f32 = 200.0;

/// One editable attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsField {
    Name,
    Label,
    Value,
    Description,
    Indent,
    ShowCheck,
    Enable,
    Italic,
    ReadOnly,
    ControlStyle,
    FontLabel,
    FontValue,
    TextColor(RowState),
    BgColor(RowState),
}

impl SettingsField {
    /// Fields offered for a row. Separators have no value, flags or colors.
    pub fn for_row(prop: &Property) -> Vec<SettingsField> {
        if prop.is_separator() {
            return vec![
                SettingsField::Name,
                SettingsField::Label,
                SettingsField::Indent,
                SettingsField::Italic,
                SettingsField::FontLabel,
                SettingsField::FontValue,
            ];
        }
        let mut fields = vec![
            SettingsField::Name,
            SettingsField::Label,
            SettingsField::Value,
            SettingsField::Description,
            SettingsField::Indent,
            SettingsField::ShowCheck,
            SettingsField::Enable,
            SettingsField::Italic,
            SettingsField::ReadOnly,
            SettingsField::ControlStyle,
            SettingsField::FontLabel,
            SettingsField::FontValue,
        ];
        for state in [RowState::Normal, RowState::Selected, RowState::Disabled] {
            fields.push(SettingsField::TextColor(state));
        }
        for state in [RowState::Normal, RowState::Selected, RowState::Disabled] {
            fields.push(SettingsField::BgColor(state));
        }
        fields
    }

    /// Row name inside the settings grid.
    pub fn key(self) -> &'static str {
        match self {
            SettingsField::Name => "name",
            SettingsField::Label => "label",
            SettingsField::Value => "value",
            SettingsField::Description => "description",
            SettingsField::Indent => "indent",
            SettingsField::ShowCheck => "show_check",
            SettingsField::Enable => "enable",
            SettingsField::Italic => "italic",
            SettingsField::ControlStyle => "ctrl_type",
            SettingsField::FontLabel => "font_label",
            SettingsField::FontValue => "font_value",
            SettingsField::ReadOnly => "readonly",
            SettingsField::TextColor(RowState::Normal) => "text_clr",
            SettingsField::TextColor(RowState::Selected) => "text_clr_sel",
            SettingsField::TextColor(RowState::Disabled) => "text_clr_disabled",
            SettingsField::BgColor(RowState::Normal) => "bg_clr",
            SettingsField::BgColor(RowState::Selected) => "bg_clr_sel",
            SettingsField::BgColor(RowState::Disabled) => "bg_clr_disabled",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SettingsField::Name => "Name",
            SettingsField::Label => "Label",
            SettingsField::Value => "Value",
            SettingsField::Description => "Description",
            SettingsField::Indent => "Indent",
            SettingsField::ShowCheck => "Show check icon",
            SettingsField::Enable => "Enable",
            SettingsField::Italic => "Italic",
            SettingsField::ControlStyle => "Control type",
            SettingsField::FontLabel => "Label font",
            SettingsField::FontValue => "Value font",
            SettingsField::ReadOnly => "Read only",
            SettingsField::TextColor(RowState::Normal) => "Text color",
            SettingsField::TextColor(RowState::Selected) => "Selected text color",
            SettingsField::TextColor(RowState::Disabled) => "Disabled text color",
            SettingsField::BgColor(RowState::Normal) => "Background color",
            SettingsField::BgColor(RowState::Selected) => "Selected background color",
            SettingsField::BgColor(RowState::Disabled) => "Disabled background color",
        }
    }

    fn row(self, prop: &Property, art: &dyn ArtProvider) -> PropertyBuilder {
        let builder = match self {
            SettingsField::Name => PropertyBuilder::text(self.key()).value(prop.name()),
            SettingsField::Label => PropertyBuilder::text(self.key()).value(prop.label()),
            SettingsField::Value => {
                PropertyBuilder::text(self.key()).value(prop.value_as_string())
            }
            SettingsField::Description => {
                PropertyBuilder::text(self.key()).value(prop.description())
            }
            SettingsField::Indent => {
                PropertyBuilder::spin(self.key(), 0, 100).value(prop.indent() as i64)
            }
            SettingsField::ShowCheck => {
                PropertyBuilder::checkbox(self.key()).value(prop.show_check())
            }
            SettingsField::Enable => PropertyBuilder::checkbox(self.key()).value(prop.is_enabled()),
            SettingsField::Italic => PropertyBuilder::checkbox(self.key()).value(prop.is_italic()),
            SettingsField::ControlStyle => PropertyBuilder::choice(
                self.key(),
                ControlStyle::ALL.map(|style| (style.name(), style.name())),
            )
            .value(prop.control_style().name()),
            SettingsField::ReadOnly => {
                PropertyBuilder::checkbox(self.key()).value(prop.is_readonly())
            }
            SettingsField::FontLabel => PropertyBuilder::font(self.key())
                .value(shown_font(prop.font_label(), art.font_label())),
            SettingsField::FontValue => PropertyBuilder::font(self.key())
                .value(shown_font(prop.font_value(), art.font_value())),
            SettingsField::TextColor(state) => PropertyBuilder::color(self.key())
                .value(art.text_colors().resolve(&prop.text_colors(), state)),
            SettingsField::BgColor(state) => PropertyBuilder::color(self.key())
                .value(art.bg_colors().resolve(&prop.bg_colors(), state)),
        };
        builder.label(self.label())
    }
}

fn shown_font(own: Option<&FontDesc>, default: &FontDesc) -> FontDesc {
    own.unwrap_or(default).clone()
}

fn state_entry(colors: &mut StateColors, state: RowState) -> &mut Option<Color> {
    match state {
        RowState::Normal => &mut colors.normal,
        RowState::Selected => &mut colors.selected,
        RowState::Disabled => &mut colors.disabled,
    }
}

/// Write `edited` into `overrides` if it differs from what was shown or the
/// row already overrode that state. Returns whether anything was written.
fn merge_color(
    overrides: &mut StateColors,
    defaults: ColorSet,
    state: RowState,
    edited: Color,
) -> bool {
    // The dialog holds colors at 8-bit precision.
    let shown = defaults.resolve(overrides, state).to_rgba8();
    let entry = state_entry(overrides, state);
    if edited.to_rgba8() == shown && entry.is_none() {
        return false;
    }
    *entry = Some(edited);
    true
}

/// A settings dialog for one row of a grid.
pub struct PropSettings {
    grid: PropGrid,
    target: PropId,
    fields: Vec<SettingsField>,
}

impl PropSettings {
    /// Build the dialog for row `target` of `source`. `host` hosts the
    /// dialog's own grid.
    pub fn new(
        source: &PropGrid,
        target: PropId,
        host: Box<dyn GridHost>,
    ) -> PropGridResult<Self> {
        let prop = source
            .get(target)
            .ok_or_else(|| PropGridError::NotFound(format!("{target:?}")))?;
        let config = GridConfig {
            draggable: false,
            configurable: false,
            ..source.config().clone()
        };
        let mut grid = PropGrid::from_host(host, config);
        grid.art_mut().set_title_width(SETTINGS_TITLE_WIDTH);

        let fields = SettingsField::for_row(prop);
        for field in &fields {
            grid.insert_with(field.row(prop, source.art()), None, Notify::Silent);
        }
        grid.update_grid();
        tracing::debug!(target: targets::GRID, name = %prop.name(), fields = fields.len(), "settings dialog built");

        Ok(Self {
            grid,
            target,
            fields,
        })
    }

    /// The dialog body.
    pub fn grid(&self) -> &PropGrid {
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut PropGrid {
        &mut self.grid
    }

    /// The row being edited, in the owning grid.
    pub fn target(&self) -> PropId {
        self.target
    }

    pub fn fields(&self) -> &[SettingsField] {
        &self.fields
    }

    /// Current value of a field, if it is offered and valid.
    pub fn value(&self, field: SettingsField) -> Option<&PropValue> {
        let id = self.grid.find(field.key()).single()?;
        self.grid
            .get(id)
            .filter(|p| p.is_value_valid())
            .map(Property::value)
    }

    /// Set a field as if the user had edited it.
    pub fn set_value(&mut self, field: SettingsField, value: impl Into<PropValue>) -> bool {
        self.grid
            .prop_mut(field.key())
            .is_some_and(|mut p| p.set_value(value))
    }

    /// Write the edited attributes back to the row in `owner`.
    ///
    /// Fonts and colors become per-row overrides only when they differ
    /// from what the dialog showed, or the row already had an override.
    pub fn apply(&mut self, owner: &mut PropGrid) -> PropGridResult<()> {
        if let Some(selected) = self.grid.selected() {
            self.grid.commit_and_close(selected);
        }
        let prop = owner
            .get(self.target)
            .ok_or_else(|| PropGridError::NotFound(format!("{:?}", self.target)))?;

        let shown_value = prop.value_as_string();
        let shown_description = prop.description().to_string();
        let shown_style = prop.control_style();
        let mut text_colors = prop.text_colors();
        let mut bg_colors = prop.bg_colors();
        let text_defaults = owner.art().text_colors();
        let bg_defaults = owner.art().bg_colors();
        let label_font = prop.font_label().cloned();
        let value_font = prop.font_value().cloned();
        let default_label_font = owner.art().font_label().clone();
        let default_value_font = owner.art().font_value().clone();

        let mut row = owner
            .prop_mut(self.target)
            .ok_or_else(|| PropGridError::NotFound(format!("{:?}", self.target)))?
            .silent();

        let (mut text_changed, mut bg_changed) = (false, false);
        for field in &self.fields {
            let Some(value) = self.value(*field) else {
                continue;
            };
            match *field {
                SettingsField::Name => {
                    row.set_name(value.to_string());
                }
                SettingsField::Label => {
                    row.set_label(value.to_string());
                }
                SettingsField::Value => {
                    let text = value.to_string();
                    if text != shown_value {
                        // The dialog edits read-only rows too.
                        let readonly = row.get().is_some_and(Property::is_readonly);
                        row.set_readonly(false);
                        if !row.set_value(text) {
                            tracing::debug!(target: targets::GRID, "settings value rejected by the row's formatter");
                        }
                        row.set_readonly(readonly);
                    }
                }
                SettingsField::Description => {
                    let text = value.to_string();
                    if text != shown_description {
                        row.set_description(text);
                    }
                }
                SettingsField::ShowCheck => {
                    if let Some(show) = value.as_bool() {
                        row.set_show_check(show);
                    }
                }
                SettingsField::Italic => {
                    if let Some(italic) = value.as_bool() {
                        row.set_italic(italic);
                    }
                }
                SettingsField::ControlStyle => {
                    if let Some(name) = value.as_str()
                        && name != shown_style.name()
                    {
                        row.set_control_style_name(name);
                    }
                }
                SettingsField::Indent => {
                    if let Some(indent) = value.as_int() {
                        row.set_indent(indent.max(0) as usize);
                    }
                }
                SettingsField::Enable => {
                    if let Some(enable) = value.as_bool() {
                        row.set_enable(enable);
                    }
                }
                SettingsField::ReadOnly => {
                    if let Some(readonly) = value.as_bool() {
                        row.set_readonly(readonly);
                    }
                }
                SettingsField::FontLabel => {
                    if let Some(font) = value.as_font()
                        && (label_font.is_some() || font != default_label_font)
                    {
                        row.set_font_label(Some(font));
                    }
                }
                SettingsField::FontValue => {
                    if let Some(font) = value.as_font()
                        && (value_font.is_some() || font != default_value_font)
                    {
                        row.set_font_value(Some(font));
                    }
                }
                SettingsField::TextColor(state) => {
                    if let Some(color) = value.as_color() {
                        text_changed |= merge_color(&mut text_colors, text_defaults, state, color);
                    }
                }
                SettingsField::BgColor(state) => {
                    if let Some(color) = value.as_color() {
                        bg_changed |= merge_color(&mut bg_colors, bg_defaults, state, color);
                    }
                }
            }
        }
        if text_changed {
            row.set_text_colors(text_colors);
        }
        if bg_changed {
            row.set_bg_colors(bg_colors);
        }

        owner.update_grid();
        Ok(())
    }
}

impl std::fmt::Debug for PropSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PropSettings")
            .field("target", &self.target)
            .field("fields", &self.fields)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use horizon_propgrid_core::Size;

    use super::*;
    use crate::headless::HeadlessHost;
    use crate::style::EditorKind;

    fn owner() -> (PropGrid, PropId) {
        let mut grid = PropGrid::new(HeadlessHost::new());
        grid.set_client_size(Size::new(300.0, 200.0));
        let id = grid.append(PropertyBuilder::int("speed").label("Speed"));
        (grid, id)
    }

    #[test]
    fn test_fields_for_separator() {
        let sep = PropertyBuilder::separator("s").build();
        let fields = SettingsField::for_row(&sep);
        assert!(!fields.contains(&SettingsField::Enable));
        assert!(!fields.contains(&SettingsField::Value));
        assert!(!fields.contains(&SettingsField::TextColor(RowState::Normal)));
        assert!(fields.contains(&SettingsField::Italic));
        assert!(fields.contains(&SettingsField::FontLabel));

        let plain = PropertyBuilder::text("t").build();
        assert_eq!(SettingsField::for_row(&plain).len(), 18);
    }

    #[test]
    fn test_dialog_grid_mirrors_row() {
        let (grid, id) = owner();
        let dialog = PropSettings::new(&grid, id, Box::new(HeadlessHost::new())).unwrap();
        assert_eq!(
            dialog.value(SettingsField::Label),
            Some(&PropValue::Text("Speed".into()))
        );
        assert_eq!(dialog.value(SettingsField::Indent), Some(&PropValue::Int(0)));
        assert!(!dialog.grid().is_configurable());
        assert!(!dialog.grid().is_draggable());
        assert_eq!(dialog.grid().art().title_width(), 200.0);
    }

    #[test]
    fn test_apply_writes_back() {
        let (mut grid, id) = owner();
        let mut dialog = PropSettings::new(&grid, id, Box::new(HeadlessHost::new())).unwrap();
        assert!(dialog.set_value(SettingsField::Label, "Velocity"));
        assert!(dialog.set_value(SettingsField::Indent, 2));
        assert!(dialog.set_value(SettingsField::ReadOnly, true));
        dialog.apply(&mut grid).unwrap();

        let prop = grid.get(id).unwrap();
        assert_eq!(prop.label(), "Velocity");
        assert_eq!(prop.indent(), 2);
        assert!(prop.is_readonly());
        assert!(!prop.text_colors().is_set());
        assert_eq!(prop.font_label(), None);
    }

    #[test]
    fn test_apply_value_flags_and_style() {
        let (mut grid, id) = owner();
        let mut dialog = PropSettings::new(&grid, id, Box::new(HeadlessHost::new())).unwrap();
        assert_eq!(dialog.value(SettingsField::Value), Some(&PropValue::Text("0".into())));
        assert_eq!(
            dialog.value(SettingsField::ControlStyle),
            Some(&PropValue::Text("default".into()))
        );
        assert!(dialog.set_value(SettingsField::Value, "42"));
        assert!(dialog.set_value(SettingsField::Description, "units per second"));
        assert!(dialog.set_value(SettingsField::ShowCheck, true));
        assert!(dialog.set_value(SettingsField::Italic, true));
        assert!(dialog.set_value(SettingsField::ControlStyle, "spin"));
        dialog.apply(&mut grid).unwrap();

        let prop = grid.get(id).unwrap();
        assert_eq!(prop.value(), &PropValue::Int(42));
        assert_eq!(prop.description(), "units per second");
        assert!(prop.show_check());
        assert!(prop.is_italic());
        assert_eq!(prop.control_style(), ControlStyle::Editor(EditorKind::Spin));
    }

    #[test]
    fn test_apply_value_to_readonly_row() {
        let (mut grid, id) = owner();
        grid.prop_mut(id).unwrap().set_readonly(true);
        let mut dialog = PropSettings::new(&grid, id, Box::new(HeadlessHost::new())).unwrap();
        dialog.set_value(SettingsField::Value, "7");
        dialog.apply(&mut grid).unwrap();
        let prop = grid.get(id).unwrap();
        assert_eq!(prop.value(), &PropValue::Int(7));
        assert!(prop.is_readonly());
    }

    #[test]
    fn test_rejected_value_keeps_row() {
        let (mut grid, id) = owner();
        let mut dialog = PropSettings::new(&grid, id, Box::new(HeadlessHost::new())).unwrap();
        dialog.set_value(SettingsField::Value, "fast");
        dialog.set_value(SettingsField::Label, "Velocity");
        dialog.apply(&mut grid).unwrap();
        let prop = grid.get(id).unwrap();
        assert_eq!(prop.value(), &PropValue::Int(0));
        assert_eq!(prop.label(), "Velocity");
    }

    #[test]
    fn test_changed_color_becomes_override() {
        let (mut grid, id) = owner();
        let mut dialog = PropSettings::new(&grid, id, Box::new(HeadlessHost::new())).unwrap();
        dialog.set_value(SettingsField::BgColor(RowState::Selected), Color::RED);
        dialog.apply(&mut grid).unwrap();
        let colors = grid.get(id).unwrap().bg_colors();
        assert_eq!(colors.selected, Some(Color::RED));
        assert_eq!(colors.normal, None);
    }

    #[test]
    fn test_missing_target() {
        let (mut grid, id) = owner();
        grid.remove(id);
        assert!(PropSettings::new(&grid, id, Box::new(HeadlessHost::new())).is_err());
    }
}
