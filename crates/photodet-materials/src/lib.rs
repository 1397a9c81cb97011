//! # Photodet Materials
//!
//! Material definitions for the photodet detector model. This crate provides:
//!
//! - **Elements** ([`element`]) — Immutable (name, symbol, Z, molar mass) records.
//! - **Materials** ([`material`]) — Fixed-composition materials built from
//!   elements by atom count or by mass fraction at an explicit density.
//! - **Reference database** ([`nist`]) — Embedded standard elements and
//!   materials resolved by canonical name (`G4_AIR`, `G4_Galactic`, ...).
//! - **Material table** ([`table`]) — The write-once registry every volume
//!   refers to. It is frozen once the geometry is built.
//! - **Units** ([`units`]) — The internal unit system (mm, rad, g/cm³, g/mole).
//!
//! ## Lookup sources
//!
//! | Source | Module | Lookup |
//! |--------|--------|--------|
//! | Reference database | [`nist`] | canonical name, e.g. `G4_AIR` |
//! | User-defined | [`material::MaterialBuilder`] | name given at construction |

pub mod database;
pub mod element;
pub mod material;
pub mod nist;
pub mod table;
pub mod units;

pub use database::{MaterialDatabase, MaterialError};
pub use element::Element;
pub use material::{Component, Material, MaterialBuilder};
pub use nist::NistDatabase;
pub use table::{MaterialId, MaterialTable};
