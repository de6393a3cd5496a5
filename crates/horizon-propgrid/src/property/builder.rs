use std::any::Any;
use std::sync::Arc;

use horizon_propgrid_core::logging::targets;
use horizon_propgrid_core::{Color, FontDesc, Size};

use super::{Property, StateColors};
use crate::error::StyleError;
use crate::format::{Formatter, ValueFormat};
use crate::style::{ControlStyle, EditorKind};
use crate::value::PropValue;

/// Fluent construction of a [`Property`] before it is inserted.
///
/// Nothing here notifies anyone: a row under construction has no grid yet.
/// After insertion, use [`PropGrid::prop_mut`](crate::PropGrid::prop_mut).
///
/// ```
/// use horizon_propgrid::{PropertyBuilder, PropValue};
///
/// let p = PropertyBuilder::int("count").label("Count").value(42).build();
/// assert_eq!(p.value(), &PropValue::Int(42));
/// assert_eq!(p.value_as_string(), "42");
/// ```
#[derive(Debug, Clone)]
pub struct PropertyBuilder {
    prop: Property,
}

impl PropertyBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            prop: Property::new(name),
        }
    }

    fn with_formatter(name: impl Into<String>, formatter: Formatter) -> Self {
        Self::new(name).formatter(formatter)
    }

    fn with_editor(name: impl Into<String>, formatter: Formatter, kind: EditorKind) -> Self {
        Self::with_formatter(name, formatter).control_style(ControlStyle::Editor(kind))
    }

    pub fn text(name: impl Into<String>) -> Self {
        Self::new(name).value(PropValue::Text(String::new()))
    }

    pub fn int(name: impl Into<String>) -> Self {
        Self::with_formatter(name, Formatter::int()).value(0)
    }

    pub fn hex(name: impl Into<String>) -> Self {
        Self::with_formatter(name, Formatter::hex()).value(0)
    }

    pub fn bin(name: impl Into<String>) -> Self {
        Self::with_formatter(name, Formatter::bin()).value(0)
    }

    pub fn float(name: impl Into<String>) -> Self {
        Self::with_formatter(name, Formatter::float()).value(0.0)
    }

    /// A dropdown over `(label, value)` pairs.
    pub fn choice<I, S, V>(name: impl Into<String>, pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, V)>,
        S: Into<String>,
        V: Into<PropValue>,
    {
        Self::with_formatter(name, Formatter::choice(pairs))
    }

    /// A radio group over `(label, value)` pairs.
    pub fn radio<I, S, V>(name: impl Into<String>, pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, V)>,
        S: Into<String>,
        V: Into<PropValue>,
    {
        Self::with_editor(name, Formatter::choice(pairs), EditorKind::Radio)
    }

    pub fn checkbox(name: impl Into<String>) -> Self {
        Self::with_formatter(name, Formatter::bool()).value(false)
    }

    pub fn file(name: impl Into<String>) -> Self {
        Self::with_formatter(name, Formatter::file())
    }

    pub fn folder(name: impl Into<String>) -> Self {
        Self::with_formatter(name, Formatter::folder())
    }

    pub fn slider(name: impl Into<String>, min: i64, max: i64) -> Self {
        Self::with_editor(name, Formatter::int_range(min, max), EditorKind::Slider).value(min)
    }

    pub fn spin(name: impl Into<String>, min: i64, max: i64) -> Self {
        Self::with_editor(name, Formatter::int_range(min, max), EditorKind::Spin).value(min)
    }

    pub fn date(name: impl Into<String>) -> Self {
        Self::with_formatter(name, Formatter::date())
    }

    pub fn time(name: impl Into<String>) -> Self {
        Self::with_formatter(name, Formatter::time())
    }

    pub fn datetime(name: impl Into<String>) -> Self {
        Self::with_editor(name, Formatter::datetime(), EditorKind::DateTimePicker)
    }

    pub fn font(name: impl Into<String>) -> Self {
        Self::with_formatter(name, Formatter::font()).value(FontDesc::default())
    }

    pub fn color(name: impl Into<String>) -> Self {
        Self::with_formatter(name, Formatter::color()).value(Color::BLACK)
    }

    /// A separator row: a full-width label with no value.
    pub fn separator(name: impl Into<String>) -> Self {
        let mut b = Self::new(name);
        b.prop.separator = true;
        b.prop.control_style = ControlStyle::None;
        b
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.prop.label = label.into();
        self
    }

    pub fn label_tip(mut self, tip: impl Into<String>) -> Self {
        self.prop.label_tip = Some(tip.into());
        self
    }

    pub fn value_tip(mut self, tip: impl Into<String>) -> Self {
        self.prop.value_tip = Some(tip.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.prop.description = description.into();
        self
    }

    /// Attach a caller payload, retrievable with [`Property::data`].
    pub fn data<T: Any + Send + Sync>(mut self, data: T) -> Self {
        self.prop.data = Some(Arc::new(data));
        self
    }

    pub fn value(mut self, value: impl Into<PropValue>) -> Self {
        self.prop.value = value.into();
        self
    }

    pub fn formatter(mut self, formatter: impl Into<Arc<Formatter>>) -> Self {
        self.prop.formatter = Some(formatter.into());
        self
    }

    pub fn control_style(mut self, style: impl Into<ControlStyle>) -> Self {
        self.prop.control_style = style.into();
        self
    }

    /// Set the control style from its string name.
    pub fn control_style_name(self, name: &str) -> Result<Self, StyleError> {
        let style: ControlStyle = name.parse()?;
        Ok(self.control_style(style))
    }

    pub fn indent(mut self, indent: usize) -> Self {
        self.prop.indent = indent;
        self
    }

    pub fn expanded(mut self, expanded: bool) -> Self {
        self.prop.expanded = expanded;
        self
    }

    pub fn enable(mut self, enable: bool) -> Self {
        self.prop.enable = enable;
        self
    }

    pub fn readonly(mut self, readonly: bool) -> Self {
        self.prop.readonly = readonly;
        self
    }

    pub fn show_check(mut self, show: bool) -> Self {
        self.prop.show_check = show;
        self
    }

    pub fn checked(mut self, checked: bool) -> Self {
        self.prop.checked = checked;
        self
    }

    pub fn draggable(mut self, draggable: bool) -> Self {
        self.prop.draggable = draggable;
        self
    }

    pub fn configurable(mut self, configurable: bool) -> Self {
        self.prop.configurable = configurable;
        self
    }

    pub fn italic(mut self, italic: bool) -> Self {
        self.prop.italic = italic;
        self
    }

    pub fn font_label(mut self, font: FontDesc) -> Self {
        self.prop.font_label = Some(font);
        self
    }

    pub fn font_value(mut self, font: FontDesc) -> Self {
        self.prop.font_value = Some(font);
        self
    }

    pub fn text_colors(mut self, colors: StateColors) -> Self {
        self.prop.text_colors = colors;
        self
    }

    pub fn bg_colors(mut self, colors: StateColors) -> Self {
        self.prop.bg_colors = colors;
        self
    }

    pub fn gripper_color(mut self, color: Color) -> Self {
        self.prop.gripper_color = Some(color);
        self
    }

    pub fn title_width(mut self, width: f32) -> Self {
        self.prop.title_width = Some(width.max(0.0));
        self
    }

    pub fn min_size(mut self, size: Size) -> Self {
        self.prop.min_size = size;
        self
    }

    /// Finish the row.
    ///
    /// The initial value is normalized through the formatter. A value the
    /// formatter cannot represent is kept as given and marked invalid, so it
    /// displays raw until a valid value is set.
    pub fn build(mut self) -> Property {
        if let Some(formatter) = self.prop.formatter.clone()
            && !self.prop.value.is_empty()
        {
            let normalized = formatter
                .format(&self.prop.value)
                .and_then(|text| formatter.coerce(&text));
            match normalized {
                Ok(value) => {
                    self.prop.value = value;
                    self.prop.value_valid = true;
                }
                Err(err) => {
                    tracing::warn!(target: targets::PROPERTY, name = %self.prop.name, error = %err, "initial value does not fit its formatter");
                    self.prop.value_valid = false;
                }
            }
        }
        self.prop
    }
}

impl From<PropertyBuilder> for Property {
    fn from(builder: PropertyBuilder) -> Self {
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convenience_constructors_pick_editors() {
        assert_eq!(
            PropertyBuilder::checkbox("c").build().editor_kind(),
            Some(EditorKind::CheckBox)
        );
        assert_eq!(
            PropertyBuilder::radio("r", [("a", 1), ("b", 2)]).build().editor_kind(),
            Some(EditorKind::Radio)
        );
        assert_eq!(
            PropertyBuilder::choice("c", [("a", 1)]).build().editor_kind(),
            Some(EditorKind::Dropdown)
        );
        assert_eq!(
            PropertyBuilder::slider("s", 0, 10).build().editor_kind(),
            Some(EditorKind::Slider)
        );
        assert_eq!(
            PropertyBuilder::folder("f").build().editor_kind(),
            Some(EditorKind::FolderPicker)
        );
        assert_eq!(
            PropertyBuilder::color("c").build().editor_kind(),
            Some(EditorKind::ColorPicker)
        );
    }

    #[test]
    fn test_build_normalizes_value() {
        let p = PropertyBuilder::float("f").value(1.5).build();
        assert_eq!(p.value(), &PropValue::Float(1.5));
        assert!(p.is_value_valid());

        let p = PropertyBuilder::int("i").value("12").build();
        assert_eq!(p.value(), &PropValue::Int(12));

        let p = PropertyBuilder::int("i").value("abc").build();
        assert!(!p.is_value_valid());
        assert_eq!(p.value_as_string(), "abc");
    }

    #[test]
    fn test_separator_defaults() {
        let p = PropertyBuilder::separator("--").label("General").build();
        assert!(p.is_separator());
        assert_eq!(p.label(), "General");
        assert_eq!(p.name(), "--");
    }

    #[test]
    fn test_control_style_name() {
        let p = PropertyBuilder::int("i")
            .control_style_name("spin")
            .unwrap()
            .build();
        assert_eq!(p.editor_kind(), Some(EditorKind::Spin));
        assert!(PropertyBuilder::int("i").control_style_name("wheel").is_err());
    }

    #[test]
    fn test_chained_presentation() {
        let p = PropertyBuilder::text("t")
            .indent(2)
            .enable(false)
            .readonly(true)
            .draggable(false)
            .configurable(false)
            .title_width(80.0)
            .build();
        assert_eq!(p.indent(), 2);
        assert!(!p.is_enabled());
        assert!(p.is_readonly());
        assert!(!p.is_draggable());
        assert!(!p.is_configurable());
        assert_eq!(p.title_width(), Some(80.0));
    }
}
