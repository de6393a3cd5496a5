//! Logging and debugging facilities for Horizon PropGrid.
//!
//! This module provides:
//! - Target and span names for filtering `tracing` output per subsystem
//! - Tree-drawing helpers used to dump a property hierarchy
//! - Performance tracing hooks for profiling
//!
//! # Tracing Integration
//!
//! Horizon PropGrid uses the `tracing` crate for instrumentation. To see logs,
//! install a subscriber in your application:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("horizon_propgrid::grid=debug")
//!     .init();
//! ```

/// Span names used throughout Horizon PropGrid for tracing.
pub mod span_names {
    /// Full hierarchy + layout pass.
    pub const LAYOUT: &str = "horizon_propgrid::layout";
    /// One repaint of the grid.
    pub const PAINT: &str = "horizon_propgrid::paint";
    /// Deferred task processing.
    pub const TASK: &str = "horizon_propgrid::task";
}

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Listener dispatch.
    pub const DISPATCH: &str = "horizon_propgrid_core::dispatch";
    /// Deferred task queue.
    pub const TASK: &str = "horizon_propgrid_core::task";
    /// Value formatters and coercion.
    pub const FORMAT: &str = "horizon_propgrid::format";
    /// Per-row state changes.
    pub const PROPERTY: &str = "horizon_propgrid::property";
    /// Inline editor lifecycle and transfer.
    pub const EDITOR: &str = "horizon_propgrid::editor";
    /// Grid structure: insert, remove, move, selection.
    pub const GRID: &str = "horizon_propgrid::grid";
    /// Hierarchy derivation and row layout.
    pub const LAYOUT: &str = "horizon_propgrid::layout";
    /// Drag-and-drop protocol.
    pub const DRAG: &str = "horizon_propgrid::drag";
}

/// Style options for tree visualization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TreeStyle {
    /// ASCII characters for tree branches.
    Ascii,
    /// Unicode box-drawing characters.
    #[default]
    Unicode,
    /// Compact single-line representation.
    Compact,
}

/// Configuration for tree debug output.
#[derive(Debug, Clone)]
pub struct TreeFormatOptions {
    /// The style of tree visualization.
    pub style: TreeStyle,
    /// Whether to show row indices.
    pub show_indices: bool,
    /// Whether to show the formatted value next to the name.
    pub show_values: bool,
    /// Whether to include rows hidden by a collapsed ancestor.
    pub show_hidden: bool,
    /// Maximum depth to traverse (None for unlimited).
    pub max_depth: Option<usize>,
    /// Indent size for each level.
    pub indent_size: usize,
}

impl Default for TreeFormatOptions {
    fn default() -> Self {
        Self {
            style: TreeStyle::default(),
            show_indices: true,
            show_values: true,
            show_hidden: true,
            max_depth: None,
            indent_size: 2,
        }
    }
}

impl TreeFormatOptions {
    /// Create options for minimal output.
    pub fn minimal() -> Self {
        Self {
            show_indices: false,
            show_values: false,
            ..Default::default()
        }
    }

    /// Build the prefix string for a tree node at `depth`.
    pub fn prefix(&self, depth: usize, is_last: bool) -> String {
        if depth == 0 {
            return String::new();
        }

        let (branch, corner, last) = match self.style {
            TreeStyle::Ascii => ("|", "+--", "`--"),
            TreeStyle::Unicode => ("\u{2502}", "\u{251c}\u{2500}\u{2500}", "\u{2514}\u{2500}\u{2500}"),
            TreeStyle::Compact => ("", "-", "-"),
        };

        let mut prefix = String::new();
        for _ in 0..(depth - 1) {
            prefix.push_str(branch);
            for _ in 0..self.indent_size {
                prefix.push(' ');
            }
        }
        prefix.push_str(if is_last { last } else { corner });
        prefix.push(' ');
        prefix
    }
}

/// A guard that emits a tracing span when dropped.
///
/// This is useful for tracking the duration of operations.
#[derive(Debug)]
pub struct PerfSpan {
    #[allow(dead_code)]
    span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Create a new performance span.
    ///
    /// The span will be active until the guard is dropped.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::info_span!(target: "horizon_propgrid::perf", "perf", operation = name);
        Self {
            span: span.entered(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_root_is_empty() {
        assert_eq!(TreeFormatOptions::default().prefix(0, true), "");
    }

    #[test]
    fn test_prefix_ascii() {
        let opts = TreeFormatOptions {
            style: TreeStyle::Ascii,
            ..Default::default()
        };
        assert_eq!(opts.prefix(1, false), "+-- ");
        assert_eq!(opts.prefix(1, true), "`-- ");
        assert_eq!(opts.prefix(2, true), "|  `-- ");
    }

    #[test]
    fn test_perf_span_does_not_panic() {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
        let _span = PerfSpan::new("test");
    }
}
