//! Grid behavior settings.
//!
//! [`GridConfig`] collects the interaction constants of a grid. It can be
//! loaded from TOML so an application can tune them without recompiling:
//!
//! ```
//! use horizon_propgrid::{CopyPolicy, GridConfig};
//!
//! let config = GridConfig::from_toml_str(r#"
//!     scroll_unit = 10.0
//!     copy_policy = "reset_style"
//! "#).unwrap();
//! assert_eq!(config.scroll_unit, 10.0);
//! assert_eq!(config.copy_policy, CopyPolicy::ResetStyle);
//! assert_eq!(config.min_row_height, 25.0);
//! ```

use horizon_propgrid_core::Size;
use serde::{Deserialize, Serialize};

use crate::error::PropGridResult;

/// What a cross-grid drop does with the per-row styling of the copies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CopyPolicy {
    /// Keep colors and fonts as they were in the source grid.
    #[default]
    Verbatim,
    /// Clear colors and fonts so the target grid's art provider applies.
    ResetStyle,
}

/// Behavior settings of one grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Scroll step in pixels.
    pub scroll_unit: f32,
    /// Lower bound for interactive row-height resizing.
    pub min_row_height: f32,
    /// Minimum row size given to rows created by the grid itself.
    pub default_min_width: f32,
    pub default_min_height: f32,
    /// Lower bounds for the drag-start distance, whatever the toolkit says.
    pub drag_threshold_x: f32,
    pub drag_threshold_y: f32,
    /// Height of the auto-scroll band at the top and bottom while dragging.
    pub autoscroll_margin: f32,
    /// Lower bound for the title column while dragging the splitter.
    pub min_title_width: f32,
    pub draggable: bool,
    pub configurable: bool,
    pub copy_policy: CopyPolicy,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            scroll_unit: 5.0,
            min_row_height: 25.0,
            default_min_width: 200.0,
            default_min_height: 25.0,
            drag_threshold_x: 10.0,
            drag_threshold_y: 4.0,
            autoscroll_margin: 15.0,
            min_title_width: 50.0,
            draggable: true,
            configurable: true,
            copy_policy: CopyPolicy::Verbatim,
        }
    }
}

impl GridConfig {
    /// Parse a TOML document. Missing keys keep their defaults.
    pub fn from_toml_str(text: &str) -> PropGridResult<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Serialize to TOML.
    pub fn to_toml_string(&self) -> PropGridResult<String> {
        toml::to_string(self).map_err(|e| crate::PropGridError::Config(e.to_string()))
    }

    pub fn default_min_size(&self) -> Size {
        Size::new(self.default_min_width, self.default_min_height)
    }

    /// Effective drag-start distance given the toolkit's own threshold.
    pub fn drag_threshold(&self, system: Size) -> Size {
        Size::new(
            self.drag_threshold_x.max(system.width),
            self.drag_threshold_y.max(system.height),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GridConfig::default();
        assert_eq!(config.scroll_unit, 5.0);
        assert_eq!(config.default_min_size(), Size::new(200.0, 25.0));
        assert!(config.draggable);
        assert!(config.configurable);
    }

    #[test]
    fn test_drag_threshold_floor() {
        let config = GridConfig::default();
        assert_eq!(config.drag_threshold(Size::new(4.0, 4.0)), Size::new(10.0, 4.0));
        assert_eq!(config.drag_threshold(Size::new(16.0, 8.0)), Size::new(16.0, 8.0));
    }

    #[test]
    fn test_toml_round_trip() {
        let config = GridConfig {
            draggable: false,
            copy_policy: CopyPolicy::ResetStyle,
            ..Default::default()
        };
        let text = config.to_toml_string().unwrap();
        assert_eq!(GridConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_bad_toml() {
        let err = GridConfig::from_toml_str("scroll_unit = \"fast\"").unwrap_err();
        assert!(matches!(err, crate::PropGridError::Config(_)));
    }
}
