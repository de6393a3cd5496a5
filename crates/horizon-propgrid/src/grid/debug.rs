//! Tree dump of a grid's rows, for logs and test failure messages.

use std::fmt::{self, Write};

use horizon_propgrid_core::TreeFormatOptions;

use super::PropGrid;

/// Formats the row hierarchy of a grid as a tree.
///
/// ```
/// use horizon_propgrid::{GridTreeDebug, HeadlessHost, PropGrid, PropertyBuilder};
/// use horizon_propgrid_core::TreeFormatOptions;
///
/// let mut grid = PropGrid::new(HeadlessHost::new());
/// grid.append(PropertyBuilder::text("window"));
/// grid.append(PropertyBuilder::int("width").indent(1));
/// let out = GridTreeDebug::with_options(&grid, TreeFormatOptions::minimal()).to_string();
/// assert!(out.contains("window"));
/// assert!(out.contains("width"));
/// ```
#[derive(Debug, Clone)]
pub struct GridTreeDebug<'g> {
    grid: &'g PropGrid,
    options: TreeFormatOptions,
}

impl<'g> GridTreeDebug<'g> {
    pub fn new(grid: &'g PropGrid) -> Self {
        Self::with_options(grid, TreeFormatOptions::default())
    }

    pub fn with_options(grid: &'g PropGrid, options: TreeFormatOptions) -> Self {
        Self { grid, options }
    }

    /// Whether no later row at the same depth follows before the parent ends.
    fn is_last_sibling(&self, index: usize, indent: usize) -> bool {
        for (_, prop) in self.grid.iter().skip(index + 1) {
            if prop.indent() < indent {
                return true;
            }
            if prop.indent() == indent {
                return false;
            }
        }
        true
    }

    pub fn format(&self) -> String {
        let mut out = String::new();
        // Writing to a String cannot fail.
        let _ = writeln!(out, "PropGrid ({} rows):", self.grid.count());
        if self.grid.is_empty() {
            let _ = writeln!(out, "  (empty)");
            return out;
        }

        for (index, (id, prop)) in self.grid.iter().enumerate() {
            if !prop.is_visible() && !self.options.show_hidden {
                continue;
            }
            if self.options.max_depth.is_some_and(|max| prop.indent() > max) {
                continue;
            }

            out.push_str(&self.options.prefix(
                prop.indent(),
                self.is_last_sibling(index, prop.indent()),
            ));
            if self.options.show_indices {
                let _ = write!(out, "[{index}] ");
            }
            if prop.is_separator() {
                let _ = write!(out, "-- {} --", prop.label());
            } else {
                out.push_str(prop.name());
            }
            if self.options.show_values && !prop.is_separator() {
                let _ = write!(out, " = {}", prop.value_as_string());
            }

            let mut flags = Vec::new();
            if prop.has_children() && !prop.is_expanded() {
                flags.push("collapsed");
            }
            if !prop.is_visible() {
                flags.push("hidden");
            }
            if self.grid.selected() == Some(id) {
                flags.push("selected");
            }
            if prop.is_editing() {
                flags.push("editing");
            }
            if prop.is_readonly() {
                flags.push("readonly");
            }
            if !prop.is_enabled() {
                flags.push("disabled");
            }
            if !flags.is_empty() {
                let _ = write!(out, " ({})", flags.join(", "));
            }
            out.push('\n');
        }
        out
    }
}

impl fmt::Display for GridTreeDebug<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format())
    }
}

impl PropGrid {
    /// A tree dump of the rows with default options.
    pub fn dump_tree(&self) -> String {
        GridTreeDebug::new(self).format()
    }
}

#[cfg(test)]
mod tests {
    use horizon_propgrid_core::{TreeFormatOptions, TreeStyle};

    use super::*;
    use crate::headless::HeadlessHost;
    use crate::property::PropertyBuilder;

    fn grid() -> PropGrid {
        let mut grid = PropGrid::new(HeadlessHost::new());
        grid.append(PropertyBuilder::text("root").value("r"));
        grid.append(PropertyBuilder::int("a").indent(1).value(1));
        grid.append(PropertyBuilder::int("b").indent(1).value(2));
        grid.append(PropertyBuilder::text("next"));
        grid
    }

    #[test]
    fn test_ascii_tree() {
        let options = TreeFormatOptions {
            style: TreeStyle::Ascii,
            ..TreeFormatOptions::default()
        };
        let out = GridTreeDebug::with_options(&grid(), options).format();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "PropGrid (4 rows):");
        assert_eq!(lines[1], "[0] root = r");
        assert_eq!(lines[2], "+-- [1] a = 1");
        assert_eq!(lines[3], "`-- [2] b = 2");
        assert_eq!(lines[4], "[3] next = ");
    }

    #[test]
    fn test_hidden_rows_and_flags() {
        let mut grid = grid();
        grid.prop_mut("root").unwrap().set_expand(false);
        grid.set_selection_index(Some(3));

        let options = TreeFormatOptions {
            show_hidden: false,
            ..TreeFormatOptions::minimal()
        };
        let out = GridTreeDebug::with_options(&grid, options).format();
        assert!(out.contains("root (collapsed)"));
        assert!(out.contains("next (selected)"));
        assert!(!out.contains(" a"));
    }

    #[test]
    fn test_empty_grid() {
        let grid = PropGrid::new(HeadlessHost::new());
        assert!(grid.dump_tree().contains("(empty)"));
    }
}
