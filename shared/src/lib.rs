//! Application core for the camping trip planner.
//!
//! The shell forwards user actions as [`Event`]s and renders the
//! [`ViewModel`]. Storage, the map snapshot and the delete prompt are
//! requested through [`Capabilities`].

#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod app;
pub mod capabilities;
pub mod catalog;
pub mod checklist;
pub mod config;
pub mod event;
pub mod library;
pub mod model;
pub mod view;

pub use app::{App, DELETE_PROMPT};
pub use capabilities::{Capabilities, Effect, StorageKey};
pub use catalog::{CampingType, ChecklistCategory};
pub use config::PlannerConfig;
pub use event::{DraftEdit, Event};
pub use model::{LatLon, MapImage, Model, Screen, Trip, TripArchive, TripDraft, TripError};
pub use view::{ViewModel, ViewState};
