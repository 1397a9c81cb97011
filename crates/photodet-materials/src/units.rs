//! Internal system of units.
//!
//! Quantities are stored as plain `f64` in the internal units below and are
//! written in source as `value * UNIT`, e.g. `18.6 / 2.0 * MM` or
//! `1.7295 * G_PER_CM3`.
//!
//! | Quantity | Base unit |
//! |----------|-----------|
//! | length | millimetre |
//! | angle | radian |
//! | density | g/cm³ |
//! | molar mass | g/mole |

pub const MM: f64 = 1.0;
pub const CM: f64 = 10.0 * MM;
pub const M: f64 = 1000.0 * MM;
pub const UM: f64 = 1.0e-3 * MM;
pub const NM: f64 = 1.0e-6 * MM;

pub const RAD: f64 = 1.0;
pub const DEG: f64 = std::f64::consts::PI / 180.0;

pub const G_PER_CM3: f64 = 1.0;
pub const MG_PER_CM3: f64 = 1.0e-3 * G_PER_CM3;

pub const G_PER_MOLE: f64 = 1.0;

/// Avogadro constant (1/mole).
pub const AVOGADRO: f64 = 6.022_140_76e23;
