//! Control styles: which inline editor a row uses.

use std::fmt;
use std::str::FromStr;

use crate::error::StyleError;

/// The native editor strategies the host toolkit is asked to create.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditorKind {
    TextBox,
    Dropdown,
    Radio,
    CheckBox,
    Slider,
    Spin,
    FilePicker,
    FolderPicker,
    ColorPicker,
    FontPicker,
    DatePicker,
    TimePicker,
    DateTimePicker,
}

impl EditorKind {
    /// Editors that present a fixed list of choices.
    pub fn is_discrete(self) -> bool {
        matches!(self, EditorKind::Dropdown | EditorKind::Radio)
    }

    /// Editors with an integer range.
    pub fn is_ranged(self) -> bool {
        matches!(self, EditorKind::Slider | EditorKind::Spin)
    }
}

impl fmt::Display for EditorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EditorKind::TextBox => "text box",
            EditorKind::Dropdown => "dropdown",
            EditorKind::Radio => "radio group",
            EditorKind::CheckBox => "check box",
            EditorKind::Slider => "slider",
            EditorKind::Spin => "spin box",
            EditorKind::FilePicker => "file picker",
            EditorKind::FolderPicker => "folder picker",
            EditorKind::ColorPicker => "color picker",
            EditorKind::FontPicker => "font picker",
            EditorKind::DatePicker => "date picker",
            EditorKind::TimePicker => "time picker",
            EditorKind::DateTimePicker => "date-time picker",
        };
        f.write_str(name)
    }
}

/// A row's control style.
///
/// `Default` infers the editor from the row's formatter; `None` makes the
/// value non-editable in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ControlStyle {
    #[default]
    Default,
    None,
    Editor(EditorKind),
}

impl ControlStyle {
    /// Every style, in the order a style picker lists them.
    pub const ALL: [ControlStyle; 15] = [
        ControlStyle::Default,
        ControlStyle::None,
        ControlStyle::Editor(EditorKind::TextBox),
        ControlStyle::Editor(EditorKind::Dropdown),
        ControlStyle::Editor(EditorKind::Radio),
        ControlStyle::Editor(EditorKind::CheckBox),
        ControlStyle::Editor(EditorKind::Slider),
        ControlStyle::Editor(EditorKind::Spin),
        ControlStyle::Editor(EditorKind::FilePicker),
        ControlStyle::Editor(EditorKind::FolderPicker),
        ControlStyle::Editor(EditorKind::ColorPicker),
        ControlStyle::Editor(EditorKind::FontPicker),
        ControlStyle::Editor(EditorKind::DatePicker),
        ControlStyle::Editor(EditorKind::TimePicker),
        ControlStyle::Editor(EditorKind::DateTimePicker),
    ];

    /// The canonical name, as accepted by `FromStr`.
    pub fn name(self) -> &'static str {
        match self {
            ControlStyle::Default => "default",
            ControlStyle::None => "none",
            ControlStyle::Editor(kind) => match kind {
                EditorKind::TextBox => "editbox",
                EditorKind::Dropdown => "choice",
                EditorKind::Radio => "radiobox",
                EditorKind::CheckBox => "checkbox",
                EditorKind::Slider => "slider",
                EditorKind::Spin => "spin",
                EditorKind::FilePicker => "file_dialog",
                EditorKind::FolderPicker => "dir_dialog",
                EditorKind::ColorPicker => "color",
                EditorKind::FontPicker => "font",
                EditorKind::DatePicker => "date",
                EditorKind::TimePicker => "time",
                EditorKind::DateTimePicker => "datetime",
            },
        }
    }
}

impl FromStr for ControlStyle {
    type Err = StyleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let kind = match s.trim().to_ascii_lowercase().as_str() {
            "default" => return Ok(ControlStyle::Default),
            "none" => return Ok(ControlStyle::None),
            "editbox" | "edit" => EditorKind::TextBox,
            "combobox" | "choice" => EditorKind::Dropdown,
            "file_sel_button" | "file_dialog" => EditorKind::FilePicker,
            "folder_sel_button" | "dir_dialog" => EditorKind::FolderPicker,
            "slider" => EditorKind::Slider,
            "spin" => EditorKind::Spin,
            "checkbox" => EditorKind::CheckBox,
            "radiobox" => EditorKind::Radio,
            "color" => EditorKind::ColorPicker,
            "font" => EditorKind::FontPicker,
            "date" => EditorKind::DatePicker,
            "time" => EditorKind::TimePicker,
            "datetime" => EditorKind::DateTimePicker,
            _ => return Err(StyleError(s.to_string())),
        };
        Ok(ControlStyle::Editor(kind))
    }
}

impl From<EditorKind> for ControlStyle {
    fn from(kind: EditorKind) -> Self {
        ControlStyle::Editor(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_aliases() {
        assert_eq!("default".parse(), Ok(ControlStyle::Default));
        assert_eq!("none".parse(), Ok(ControlStyle::None));
        assert_eq!("choice".parse(), Ok(ControlStyle::Editor(EditorKind::Dropdown)));
        assert_eq!("combobox".parse(), Ok(ControlStyle::Editor(EditorKind::Dropdown)));
        assert_eq!("dir_dialog".parse(), Ok(ControlStyle::Editor(EditorKind::FolderPicker)));
        assert_eq!("Spin".parse(), Ok(ControlStyle::Editor(EditorKind::Spin)));
    }

    #[test]
    fn test_canonical_names_parse_back() {
        for style in ControlStyle::ALL {
            assert_eq!(style.name().parse(), Ok(style));
        }
    }

    #[test]
    fn test_unknown_style() {
        assert_eq!(
            "dial".parse::<ControlStyle>(),
            Err(StyleError("dial".to_string()))
        );
    }

    #[test]
    fn test_kind_classes() {
        assert!(EditorKind::Radio.is_discrete());
        assert!(EditorKind::Slider.is_ranged());
        assert!(!EditorKind::TextBox.is_discrete());
    }
}
