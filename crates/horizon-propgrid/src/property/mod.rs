//! A single row of the grid.
//!
//! [`Property`] holds a row's identity, value, presentation attributes, the
//! hierarchy flags derived by the grid, its layout regions and, while it is
//! being edited, its live editor binding. Rows are created with
//! [`PropertyBuilder`] and live inside a [`PropGrid`](crate::PropGrid) arena;
//! runtime mutation goes through [`PropMut`](crate::PropMut) so the grid can
//! react to every change.

mod builder;

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use horizon_propgrid_core::logging::targets;
use horizon_propgrid_core::{Color, FontDesc, Point, Rect, Size};
use slotmap::new_key_type;

pub use builder::PropertyBuilder;

use crate::format::{Formatter, ValidValue, ValueFormat};
use crate::style::{ControlStyle, EditorKind};
use crate::transfer::EditorBinding;
use crate::value::PropValue;

new_key_type! {
    /// Stable handle to a row inside one grid.
    ///
    /// Handles survive reordering. A handle to a removed row resolves to
    /// nothing.
    pub struct PropId;
}

/// Default row minimum size.
pub const DEFAULT_MIN_SIZE: Size = Size::new(200.0, 25.0);

/// Thickness of the row-resize bands at the top and bottom of a row.
pub const EDGE_BAND: f32 = 2.0;

/// Whether a setter notifies the grid.
///
/// `Silent` is meant for bulk construction: the state changes but no
/// refresh, resize or layout is triggered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Notify {
    #[default]
    Emit,
    Silent,
}

impl Notify {
    pub fn is_silent(self) -> bool {
        self == Notify::Silent
    }
}

/// A named region of a row, as returned by hit-testing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HitRegion {
    BottomEdge,
    TopEdge,
    Expander,
    Check,
    Gripper,
    Label,
    Splitter,
    Value,
}

impl HitRegion {
    pub fn tag(self) -> &'static str {
        match self {
            HitRegion::BottomEdge => "bottom_edge",
            HitRegion::TopEdge => "top_edge",
            HitRegion::Expander => "expander",
            HitRegion::Check => "check",
            HitRegion::Gripper => "gripper",
            HitRegion::Label => "label",
            HitRegion::Splitter => "splitter",
            HitRegion::Value => "value",
        }
    }
}

/// Sub-rectangles of a row, computed by the art provider each layout pass.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Regions {
    pub gripper: Option<Rect>,
    pub expander: Option<Rect>,
    pub check: Option<Rect>,
    pub label: Option<Rect>,
    pub splitter: Option<Rect>,
    pub value: Option<Rect>,
}

impl Regions {
    pub fn get(&self, region: HitRegion) -> Option<Rect> {
        match region {
            HitRegion::Gripper => self.gripper,
            HitRegion::Expander => self.expander,
            HitRegion::Check => self.check,
            HitRegion::Label => self.label,
            HitRegion::Splitter => self.splitter,
            HitRegion::Value => self.value,
            HitRegion::BottomEdge | HitRegion::TopEdge => None,
        }
    }

    /// Interior regions in hit-test priority order.
    fn ordered(&self) -> [(HitRegion, Option<Rect>); 6] {
        [
            (HitRegion::Expander, self.expander),
            (HitRegion::Check, self.check),
            (HitRegion::Gripper, self.gripper),
            (HitRegion::Label, self.label),
            (HitRegion::Splitter, self.splitter),
            (HitRegion::Value, self.value),
        ]
    }
}

/// Per-state colors. `None` falls back to the art provider.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StateColors {
    pub normal: Option<Color>,
    pub selected: Option<Color>,
    pub disabled: Option<Color>,
}

impl StateColors {
    pub fn new(normal: Color, selected: Color, disabled: Color) -> Self {
        Self {
            normal: Some(normal),
            selected: Some(selected),
            disabled: Some(disabled),
        }
    }

    pub fn is_set(&self) -> bool {
        self.normal.is_some() || self.selected.is_some() || self.disabled.is_some()
    }
}

/// One row of a property grid.
#[derive(Clone)]
pub struct Property {
    pub(crate) name: String,
    pub(crate) label: String,
    pub(crate) label_tip: Option<String>,
    pub(crate) value_tip: Option<String>,
    pub(crate) description: String,
    pub(crate) data: Option<Arc<dyn Any + Send + Sync>>,

    pub(crate) value: PropValue,
    pub(crate) value_valid: bool,
    pub(crate) formatter: Option<Arc<Formatter>>,
    pub(crate) control_style: ControlStyle,

    pub(crate) indent: usize,
    pub(crate) parent: Option<PropId>,
    pub(crate) has_children: bool,
    pub(crate) expanded: bool,
    pub(crate) visible: bool,

    pub(crate) enable: bool,
    pub(crate) readonly: bool,
    pub(crate) activated: bool,
    pub(crate) separator: bool,
    pub(crate) show_check: bool,
    pub(crate) checked: bool,
    pub(crate) draggable: bool,
    pub(crate) configurable: bool,
    pub(crate) italic: bool,

    pub(crate) font_label: Option<FontDesc>,
    pub(crate) font_value: Option<FontDesc>,
    pub(crate) text_colors: StateColors,
    pub(crate) bg_colors: StateColors,
    pub(crate) gripper_color: Option<Color>,
    pub(crate) title_width: Option<f32>,
    pub(crate) min_size: Size,

    pub(crate) rect: Rect,
    pub(crate) regions: Regions,
    pub(crate) show_label_tips: bool,
    pub(crate) show_value_tips: bool,
    pub(crate) top_value_border: bool,
    pub(crate) bottom_value_border: bool,

    pub(crate) editor: Option<EditorBinding>,
}

impl Property {
    /// A plain text row with default attributes.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            label: name.clone(),
            name,
            label_tip: None,
            value_tip: None,
            description: String::new(),
            data: None,
            value: PropValue::Empty,
            value_valid: true,
            formatter: None,
            control_style: ControlStyle::Default,
            indent: 0,
            parent: None,
            has_children: false,
            expanded: true,
            visible: true,
            enable: true,
            readonly: false,
            activated: false,
            separator: false,
            show_check: false,
            checked: false,
            draggable: true,
            configurable: true,
            italic: false,
            font_label: None,
            font_value: None,
            text_colors: StateColors::default(),
            bg_colors: StateColors::default(),
            gripper_color: None,
            title_width: None,
            min_size: DEFAULT_MIN_SIZE,
            rect: Rect::ZERO,
            regions: Regions::default(),
            show_label_tips: false,
            show_value_tips: false,
            top_value_border: false,
            bottom_value_border: false,
            editor: None,
        }
    }

    /// Start building a row.
    pub fn builder(name: impl Into<String>) -> PropertyBuilder {
        PropertyBuilder::new(name)
    }

    /// A copy for insertion elsewhere: no live editor, not selected, and
    /// hierarchy links left for the target grid to derive.
    pub fn duplicate(&self) -> Property {
        Property {
            editor: None,
            activated: false,
            parent: None,
            has_children: false,
            show_label_tips: false,
            show_value_tips: false,
            ..self.clone()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Tooltip for the label. Defaults to the name.
    pub fn label_tip(&self) -> &str {
        self.label_tip.as_deref().unwrap_or(&self.name)
    }

    /// Tooltip for the value. Defaults to the formatted value.
    pub fn value_tip(&self) -> String {
        self.value_tip
            .clone()
            .unwrap_or_else(|| self.value_as_string())
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// The caller's payload, if it has type `T`.
    pub fn data<T: Any + Send + Sync>(&self) -> Option<&T> {
        self.data.as_deref()?.downcast_ref::<T>()
    }

    pub fn value(&self) -> &PropValue {
        &self.value
    }

    pub fn is_value_valid(&self) -> bool {
        self.value_valid
    }

    /// The value as shown to the user.
    ///
    /// Uses the formatter when there is one and the value is valid, and
    /// falls back to plain stringification otherwise. Never fails.
    pub fn value_as_string(&self) -> String {
        if self.value_valid
            && let Some(formatter) = &self.formatter
        {
            match formatter.format(&self.value) {
                Ok(text) => return text,
                Err(err) => {
                    tracing::warn!(target: targets::FORMAT, name = %self.name, error = %err, "formatting failed, using raw value");
                }
            }
        }
        self.value.to_string()
    }

    pub fn formatter(&self) -> Option<&Formatter> {
        self.formatter.as_deref()
    }

    /// Entries for discrete-choice editors.
    pub fn valid_values(&self) -> Option<Vec<ValidValue>> {
        self.formatter.as_deref()?.valid_values()
    }

    pub fn control_style(&self) -> ControlStyle {
        self.control_style
    }

    /// The editor this row opens, or `None` when it cannot be edited in place.
    pub fn editor_kind(&self) -> Option<EditorKind> {
        if self.separator {
            return None;
        }
        match self.control_style {
            ControlStyle::None => None,
            ControlStyle::Editor(kind) => Some(kind),
            ControlStyle::Default => Some(
                self.formatter
                    .as_deref()
                    .map_or(EditorKind::TextBox, Formatter::default_editor),
            ),
        }
    }

    pub fn indent(&self) -> usize {
        self.indent
    }

    /// The nearest preceding row with a smaller indent, as of the last
    /// hierarchy pass.
    pub fn parent(&self) -> Option<PropId> {
        self.parent
    }

    pub fn has_children(&self) -> bool {
        self.has_children
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_enabled(&self) -> bool {
        self.enable
    }

    pub fn is_readonly(&self) -> bool {
        self.readonly
    }

    pub fn is_activated(&self) -> bool {
        self.activated
    }

    pub fn is_separator(&self) -> bool {
        self.separator
    }

    pub fn show_check(&self) -> bool {
        self.show_check
    }

    pub fn is_checked(&self) -> bool {
        self.checked
    }

    pub fn is_draggable(&self) -> bool {
        self.draggable
    }

    pub fn is_configurable(&self) -> bool {
        self.configurable
    }

    pub fn is_italic(&self) -> bool {
        self.italic
    }

    pub fn font_label(&self) -> Option<&FontDesc> {
        self.font_label.as_ref()
    }

    pub fn font_value(&self) -> Option<&FontDesc> {
        self.font_value.as_ref()
    }

    pub fn text_colors(&self) -> StateColors {
        self.text_colors
    }

    pub fn bg_colors(&self) -> StateColors {
        self.bg_colors
    }

    pub fn gripper_color(&self) -> Option<Color> {
        self.gripper_color
    }

    /// Per-row title width; `None` inherits the art provider's.
    pub fn title_width(&self) -> Option<f32> {
        self.title_width
    }

    pub fn min_size(&self) -> Size {
        self.min_size
    }

    /// Bounding box in unscrolled coordinates, from the last layout pass.
    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn regions(&self) -> &Regions {
        &self.regions
    }

    /// Whether the last paint clipped the label.
    pub fn show_label_tips(&self) -> bool {
        self.show_label_tips
    }

    /// Whether the last paint clipped the value.
    pub fn show_value_tips(&self) -> bool {
        self.show_value_tips
    }

    pub fn top_value_border(&self) -> bool {
        self.top_value_border
    }

    pub fn bottom_value_border(&self) -> bool {
        self.bottom_value_border
    }

    /// Whether an inline editor is open.
    pub fn is_editing(&self) -> bool {
        self.editor.is_some()
    }

    pub fn editor(&self) -> Option<&EditorBinding> {
        self.editor.as_ref()
    }

    /// Classify `pt` (unscrolled coordinates).
    ///
    /// The 2px bottom and top bands win over every interior region so a
    /// row can always be resized.
    pub fn hit_test(&self, pt: Point) -> Option<HitRegion> {
        if self.rect.bottom_band(EDGE_BAND).contains(pt) {
            return Some(HitRegion::BottomEdge);
        }
        if self.rect.top_band(EDGE_BAND).contains(pt) {
            return Some(HitRegion::TopEdge);
        }
        self.regions
            .ordered()
            .into_iter()
            .find(|(_, rc)| rc.is_some_and(|rc| rc.contains(pt)))
            .map(|(region, _)| region)
    }
}

impl fmt::Debug for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property")
            .field("name", &self.name)
            .field("label", &self.label)
            .field("value", &self.value)
            .field("indent", &self.indent)
            .field("visible", &self.visible)
            .field("expanded", &self.expanded)
            .field("separator", &self.separator)
            .field("editing", &self.editor.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn laid_out() -> Property {
        let mut p = Property::new("p");
        p.rect = Rect::new(0.0, 1.0, 300.0, 25.0);
        p.regions = Regions {
            expander: Some(Rect::new(4.0, 1.0, 12.0, 25.0)),
            label: Some(Rect::new(20.0, 1.0, 130.0, 25.0)),
            splitter: Some(Rect::new(152.0, 1.0, 8.0, 25.0)),
            value: Some(Rect::new(160.0, 1.0, 140.0, 25.0)),
            ..Default::default()
        };
        p
    }

    #[test]
    fn test_hit_test_regions() {
        let p = laid_out();
        assert_eq!(p.hit_test(Point::new(8.0, 10.0)), Some(HitRegion::Expander));
        assert_eq!(p.hit_test(Point::new(50.0, 10.0)), Some(HitRegion::Label));
        assert_eq!(p.hit_test(Point::new(155.0, 10.0)), Some(HitRegion::Splitter));
        assert_eq!(p.hit_test(Point::new(200.0, 10.0)), Some(HitRegion::Value));
        assert_eq!(p.hit_test(Point::new(18.0, 10.0)), None);
    }

    #[test]
    fn test_edge_bands_win() {
        let p = laid_out();
        assert_eq!(p.hit_test(Point::new(200.0, 25.5)), Some(HitRegion::BottomEdge));
        assert_eq!(p.hit_test(Point::new(200.0, 1.5)), Some(HitRegion::TopEdge));
    }

    #[test]
    fn test_value_as_string_uses_formatter() {
        let p = Property::builder("n")
            .formatter(Formatter::hex())
            .value(255)
            .build();
        assert_eq!(p.value_as_string(), "0xFF");
    }

    #[test]
    fn test_value_as_string_falls_back() {
        let mut p = Property::new("n");
        p.formatter = Some(Arc::new(Formatter::date()));
        p.value = PropValue::Int(3);
        assert_eq!(p.value_as_string(), "3");
        p.value_valid = false;
        assert_eq!(p.value_as_string(), "3");
    }

    #[test]
    fn test_editor_kind() {
        assert_eq!(Property::new("t").editor_kind(), Some(EditorKind::TextBox));
        let b = Property::builder("b").formatter(Formatter::bool()).build();
        assert_eq!(b.editor_kind(), Some(EditorKind::CheckBox));
        let mut n = Property::new("n");
        n.control_style = ControlStyle::None;
        assert_eq!(n.editor_kind(), None);
        let s = PropertyBuilder::separator("sep").build();
        assert_eq!(s.editor_kind(), None);
    }

    #[test]
    fn test_tips_default() {
        let p = Property::builder("speed").label("Speed").value("fast").build();
        assert_eq!(p.label_tip(), "speed");
        assert_eq!(p.value_tip(), "fast");
    }

    #[test]
    fn test_data_downcast() {
        let p = Property::builder("d").data(42u32).build();
        assert_eq!(p.data::<u32>(), Some(&42));
        assert_eq!(p.data::<String>(), None);
    }

    #[test]
    fn test_duplicate_drops_runtime_state() {
        let mut p = Property::builder("x").text_colors(StateColors::new(
            Color::RED,
            Color::WHITE,
            Color::GRAY,
        )).build();
        p.activated = true;
        p.has_children = true;
        let copy = p.duplicate();
        assert!(!copy.activated);
        assert!(!copy.has_children);
        assert_eq!(copy.text_colors, p.text_colors);
    }
}
