//! liveplot-lasso crate root: re-exports and module wiring.
//!
//! A freehand lasso selector for egui plots. The user drags a closed curve
//! over the plot area; every attached mark view records which of its data
//! points fall inside. Curves can be toggled by clicking and removed with the
//! delete key, which also clears their membership.
//!
//! Modules:
//! - `lasso`: the lasso selector and its gesture/curve logic
//! - `selector`: base selector hooks, scales and mark-view rendezvous
//! - `mark`: mark views (`MarkView` trait, `ScatterMarkView`)
//! - `surface`: retained element tree the curves live in
//! - `model`: attribute model with change listeners
//! - `keyboard`: window-scoped key dispatch with scoped registrations
//! - `events`: event kinds and subscriber controller
//! - `ui` / `export`: egui painting and SVG/PNG snapshots
//! - `config`: YAML-backed appearance and key-binding settings

mod color;
mod drag;
mod ready;
mod ui;

pub mod config;
pub mod error;
pub mod events;
pub mod export;
pub mod geometry;
pub mod keyboard;
pub mod lasso;
pub mod mark;
pub mod model;
pub mod scales;
pub mod selector;
pub mod surface;

// Public re-exports for a compact external API
pub use color::{parse_css_color, to_hex};
pub use config::LassoConfig;
pub use drag::{DragBehavior, DragEvent, DragState, PointerEvent};
pub use error::{LassoError, Result};
pub use events::{EventController, EventFilter, EventKind, SelectorEvent};
pub use export::{surface_to_png, surface_to_svg};
pub use geometry::{point_in_lasso, LineGenerator, PointInLasso};
pub use keyboard::{KeyEvent, KeyListener, KeyboardHub, DELETE_KEY_CODE};
pub use lasso::LassoSelector;
pub use mark::{MarkView, ScatterMarkView};
pub use model::WidgetModel;
pub use ready::ReadySignal;
pub use scales::{LinearScale, Scales};
pub use selector::{BaseSelector, XySelector};
pub use surface::{OverlayRect, PathElement, Surface, SELECTED_CLASS};
pub use ui::{fill_mesh, paint_surface};
