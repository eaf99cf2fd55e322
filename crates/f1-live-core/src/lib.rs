//! # F1 Live Core
//!
//! Feed records, client state and HTML rendering for the live timing view.
//!
//! This crate provides:
//! - Typed, tolerant records for every feed kind (all fields optional)
//! - `ClientState` with shallow per-car merge semantics
//! - Pure dispatch: an [`Inbound`] message becomes a state change plus a
//!   [`RenderInstruction`]
//! - HTML fragment rendering and a [`Dom`] seam for writing fragments into a page
//! - [`Updater`], which ties the three together

#![warn(missing_docs)]
#![warn(clippy::all)]

mod de;
pub mod dom;
pub mod feed;
pub mod format;
pub mod model;
pub mod render;
pub mod state;
pub mod updater;

pub use dom::{Dom, ElementId, Page};
pub use feed::{ConnectionStatus, DataSource, FeedError, FeedKind, FeedUpdate, Inbound};
pub use model::{
    DriverInfo, DriverList, Interval, Meeting, RaceControl, RaceControlMessage, SessionInfo, TimedValue,
    TimingData, TimingEntry, TrackFlag, TrackStatus, Tyre, TyreCompound, WeatherData,
};
pub use render::Fragment;
pub use state::{ClientState, RenderInstruction, TimingRow};
pub use updater::{Updater, UpdaterConfig};
