//! Horizon PropGrid - a property grid widget core.
//!
//! A property grid is a scrollable list of labeled, typed, editable rows.
//! Rows form a hierarchy through their indent level, can be collapsed,
//! reordered by keyboard or drag-and-drop, copied between grids, and
//! reconfigured at run time through a context menu and a settings dialog.
//!
//! The crate is toolkit-independent. Everything it needs from a windowing
//! toolkit goes through the [`GridHost`] trait: editor widgets, drawing,
//! menus, drag sessions and dialogs. [`HeadlessHost`] implements it in
//! memory for tests and tooling.
//!
//! - **Grid**: [`PropGrid`] owns the rows, the selection and the layout
//! - **Rows**: [`Property`] built with [`PropertyBuilder`], mutated through [`PropMut`]
//! - **Values**: [`PropValue`] converted to and from text by a [`Formatter`]
//! - **Events**: [`PropEvent`]s, some vetoable, delivered to listeners
//! - **Art**: [`ArtProvider`] computes row regions and draws rows
//!
//! # Example
//!
//! ```
//! use horizon_propgrid::{HeadlessHost, PropEventKind, PropGrid, PropertyBuilder, Verdict};
//!
//! let mut grid = PropGrid::new(HeadlessHost::new());
//! grid.connect(|event| Verdict::from(event.kind != PropEventKind::Delete));
//!
//! let id = grid.append(PropertyBuilder::int("width").label("Width").value(640));
//! assert_eq!(grid.get(id).unwrap().value_as_string(), "640");
//!
//! // Deletion is vetoed by the listener.
//! assert!(!grid.delete(id));
//! assert_eq!(grid.count(), 1);
//! ```

pub mod art;
pub mod config;
pub mod error;
pub mod event;
pub mod format;
pub mod grid;
pub mod headless;
pub mod host;
pub mod property;
pub mod settings;
pub mod style;
pub mod transfer;
pub mod value;

pub use art::{ArtMetrics, ArtProvider, ArtStyle, ClassicArt, ColorSet, NativeArt, RowState};
pub use config::{CopyPolicy, GridConfig};
pub use error::{FormatError, HostError, PropGridError, PropGridResult, StyleError};
pub use event::{PropEvent, PropEventKind};
pub use format::{Formatter, FormatterKind, ValidValue, ValueFormat};
pub use grid::{DropAction, GridId, GridTreeDebug, Lookup, PropGrid, PropKey, PropMut};
pub use headless::{HeadlessHost, RecordingContext};
pub use host::{
    CursorShape, DialogResult, DragData, DragOutcome, DrawContext, EditorContent, EditorId,
    EditorRequest, GridHost, Key, KeyboardModifiers, MenuCommand, MenuEntry,
};
pub use property::{HitRegion, Notify, PropId, Property, PropertyBuilder, Regions, StateColors};
pub use settings::{PropSettings, SettingsField};
pub use style::{ControlStyle, EditorKind};
pub use value::PropValue;

pub use horizon_propgrid_core::{Color, FontDesc, Point, Rect, Size, Verdict};
