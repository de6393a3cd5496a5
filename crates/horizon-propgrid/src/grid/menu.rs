//! The row context menu and the settings dialog it opens.

use horizon_propgrid_core::logging::targets;

use super::{PropGrid, PropKey, PropMut};
use crate::event::PropEventKind;
use crate::host::{DialogResult, MenuCommand, MenuEntry};
use crate::property::PropId;
use crate::settings::PropSettings;

fn item(command: MenuCommand, label: &str, accelerator: Option<&str>) -> MenuEntry {
    MenuEntry::Item {
        command,
        label: label.to_string(),
        accelerator: accelerator.map(str::to_string),
        checked: None,
    }
}

impl PropGrid {
    /// Entries of the context menu for a row.
    pub fn context_menu(&self, id: PropId) -> Vec<MenuEntry> {
        let readonly = self.props.get(id).is_some_and(|p| p.readonly);
        vec![
            item(MenuCommand::AddSeparator, "&Add separator", None),
            MenuEntry::Item {
                command: MenuCommand::ToggleReadOnly,
                label: "&Read only".to_string(),
                accelerator: None,
                checked: Some(readonly),
            },
            MenuEntry::Separator,
            item(MenuCommand::IndentIncrease, "Increase Indent", Some("Ctrl-Right")),
            item(MenuCommand::IndentDecrease, "Decrease Indent", Some("Ctrl-Left")),
            MenuEntry::Separator,
            item(MenuCommand::MoveUp, "Move up", Some("Ctrl-Up")),
            item(MenuCommand::MoveDown, "Move down", Some("Ctrl-Down")),
            MenuEntry::Separator,
            item(MenuCommand::Delete, "&Delete", None),
            MenuEntry::Separator,
            item(MenuCommand::Properties, "&Properties", None),
        ]
    }

    /// Show the context menu if both the grid and the row allow it.
    pub(crate) fn show_context_menu(&mut self, id: PropId) {
        let Some(prop) = self.props.get(id) else {
            return;
        };
        if !self.config.configurable || !prop.configurable {
            return;
        }
        let entries = self.context_menu(id);
        let at = self.interaction.menu_at;
        if let Some(command) = self.host.popup_menu(&entries, at) {
            self.process_command(command, id);
        }
    }

    /// Run a context-menu command on a row.
    pub fn process_command(&mut self, command: MenuCommand, id: PropId) -> bool {
        let Some(prop) = self.props.get(id) else {
            return false;
        };
        tracing::debug!(target: targets::GRID, ?command, name = %prop.name, "menu command");
        match command {
            MenuCommand::AddSeparator => {
                let index = self.index_of(id);
                self.insert_separator("Separator", "", index);
            }
            MenuCommand::ToggleReadOnly => {
                let readonly = prop.readonly;
                PropMut::new(self, id).set_readonly(!readonly);
            }
            MenuCommand::IndentIncrease => {
                PropMut::new(self, id).shift_indent(1);
            }
            MenuCommand::IndentDecrease => {
                PropMut::new(self, id).shift_indent(-1);
            }
            MenuCommand::MoveUp => return self.move_up(id),
            MenuCommand::MoveDown => return self.move_down(id),
            MenuCommand::Delete => return self.delete(id),
            MenuCommand::Properties => return self.show_settings(id),
        }
        true
    }

    /// Edit a row's own attributes in a settings dialog. Changes are written
    /// back when the dialog is confirmed.
    pub fn show_settings<'k>(&mut self, key: impl Into<PropKey<'k>>) -> bool {
        let Some(id) = self.resolve(key) else {
            return false;
        };
        let Some(host) = self.host.settings_host() else {
            tracing::debug!(target: targets::GRID, "host has no settings dialog");
            return false;
        };
        let mut dialog = match PropSettings::new(self, id, host) {
            Ok(dialog) => dialog,
            Err(err) => {
                tracing::warn!(target: targets::GRID, error = %err, "settings dialog unavailable");
                return false;
            }
        };
        match self.host.run_settings(&mut dialog) {
            DialogResult::Ok => match dialog.apply(self) {
                Ok(()) => {
                    self.notify(PropEventKind::Refresh, id);
                    true
                }
                Err(err) => {
                    tracing::warn!(target: targets::GRID, error = %err, "settings not applied");
                    false
                }
            },
            DialogResult::Cancel => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use horizon_propgrid_core::{Point, Size};

    use crate::grid::PropGrid;
    use crate::headless::HeadlessHost;
    use crate::host::{MenuCommand, MenuEntry};
    use crate::property::PropertyBuilder;

    fn grid(host: &HeadlessHost) -> PropGrid {
        let mut grid = PropGrid::new(host.clone());
        grid.set_client_size(Size::new(300.0, 200.0));
        grid.append(PropertyBuilder::text("a"));
        grid.append(PropertyBuilder::text("b"));
        grid
    }

    #[test]
    fn test_right_click_opens_menu() {
        let host = HeadlessHost::new();
        let mut grid = grid(&host);
        host.script_menu(Some(MenuCommand::ToggleReadOnly));
        grid.on_mouse_right_click(Point::new(20.0, 30.0));
        assert_eq!(grid.selection(), Some(1));
        assert!(grid.get_index(1).unwrap().is_readonly());

        let state = host.state();
        let (entries, at) = &state.menus[0];
        assert_eq!(*at, Point::new(20.0, 30.0));
        assert!(entries.contains(&MenuEntry::Separator));
    }

    #[test]
    fn test_menu_respects_configurable() {
        let host = HeadlessHost::new();
        let mut grid = grid(&host);
        grid.set_configurable(false);
        grid.on_mouse_right_click(Point::new(20.0, 10.0));
        assert!(host.state().menus.is_empty());

        grid.set_configurable(true);
        grid.prop_mut("a").unwrap().set_configurable(false);
        grid.on_mouse_right_click(Point::new(20.0, 10.0));
        assert!(host.state().menus.is_empty());
    }

    #[test]
    fn test_readonly_item_is_checked() {
        let host = HeadlessHost::new();
        let mut grid = grid(&host);
        grid.prop_mut("a").unwrap().set_readonly(true);
        let id = grid.resolve("a").unwrap();
        let checked = grid.context_menu(id).into_iter().find_map(|e| match e {
            MenuEntry::Item {
                command: MenuCommand::ToggleReadOnly,
                checked,
                ..
            } => checked,
            _ => None,
        });
        assert_eq!(checked, Some(true));
    }

    #[test]
    fn test_add_separator_goes_before_row() {
        let host = HeadlessHost::new();
        let mut grid = grid(&host);
        let b = grid.resolve("b").unwrap();
        grid.process_command(MenuCommand::AddSeparator, b);
        assert_eq!(grid.count(), 3);
        assert!(grid.get_index(1).unwrap().is_separator());
        assert_eq!(grid.get_index(1).unwrap().label(), "Separator");
    }

    #[test]
    fn test_delete_command() {
        let host = HeadlessHost::new();
        let mut grid = grid(&host);
        let a = grid.resolve("a").unwrap();
        assert!(grid.process_command(MenuCommand::Delete, a));
        assert_eq!(grid.count(), 1);
    }
}
