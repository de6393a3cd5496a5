//! Core types for Horizon PropGrid.
//!
//! This crate holds the toolkit-independent pieces the property grid is
//! built from:
//!
//! - **Geometry**: [`Point`], [`Size`], [`Rect`]
//! - **Appearance**: [`Color`], [`FontDesc`]
//! - **Dispatch**: [`Dispatcher`] with vetoable [`Verdict`]s
//! - **Task Queue**: deferred work drained once per event-loop tick
//! - **Logging**: tracing targets, span names and tree-dump options
//!
//! # Dispatch Example
//!
//! ```
//! use horizon_propgrid_core::{Dispatcher, Verdict};
//!
//! let mut deleting = Dispatcher::<String>::new();
//! deleting.connect(|name| Verdict::from(name != "locked"));
//!
//! assert!(deleting.emit(&"scratch".to_string()).is_accepted());
//! assert!(deleting.emit(&"locked".to_string()).is_vetoed());
//! ```

pub mod dispatch;
pub mod error;
pub mod logging;
pub mod task;
pub mod types;

pub use dispatch::{ConnectionId, Dispatcher, Verdict};
pub use error::{ParseColorError, ParseFontError};
pub use logging::{PerfSpan, TreeFormatOptions, TreeStyle};
pub use task::{TaskId, TaskQueue};
pub use types::{Color, FontDesc, Point, Rect, Size};
