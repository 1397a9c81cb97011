//! # Photodet Core
//!
//! Detector description and per-event bookkeeping for a photomultiplier
//! test stand simulated by an external particle-transport toolkit. The host
//! calls [`construction::DetectorConstruction::construct`] once at start-up
//! and drives an [`event::EventAccumulator`] once per simulated event.
//!
//! ## Modules
//!
//! - [`config`] — Build constants of the detector, overridable via serde.
//! - [`construction`] — Material definition and placement of the world,
//!   envelope, tube and optional photocathode volumes.
//! - [`event`] — The per-event energy deposit accumulator.

pub mod config;
pub mod construction;
pub mod event;

pub use config::DetectorConfig;
pub use construction::{ConstructionError, Detector, DetectorConstruction, PmtConstruction};
pub use event::{EventAccumulator, EventError, EventState};
