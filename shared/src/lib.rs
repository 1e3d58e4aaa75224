//! Shared core for the courier app.
//!
//! The shells render `ViewModel` and carry out the effects requested through
//! `Capabilities`; every decision about sheets, picks, routes and auth lives
//! here.

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::too_many_lines)]

pub mod app;
pub mod capabilities;
pub mod config;
pub mod error;
pub mod event;
pub mod forms;
pub mod geo;
pub mod model;
pub mod navigation;
pub mod route;
pub mod sheet;
pub mod view;

pub use app::App;
pub use capabilities::{Capabilities, Effect};
pub use config::InteractionConfig;
pub use crux_core::App as CruxApp;
pub use error::{AppError, ErrorKind, ErrorSeverity};
pub use event::Event;
pub use geo::{distance_km, GeoPoint, MapRegion};
pub use model::{Model, Screen};
pub use route::{PickTarget, RouteState};
pub use sheet::{DragRelease, QuickActionsState, SheetPanel, SheetState};
pub use view::ViewModel;
