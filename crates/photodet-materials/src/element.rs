//! Chemical elements.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::database::MaterialError;
use crate::units::G_PER_MOLE;

/// A chemical element: name, symbol, atomic number and molar mass.
///
/// Elements are inputs to material construction and are never mutated
/// after creation; fields are read through accessors only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    name: String,
    symbol: String,
    z: u32,
    /// Molar mass (g/mole).
    molar_mass: f64,
}

impl Element {
    /// Create an element after validating its atomic number and molar mass.
    ///
    /// # Errors
    /// [`MaterialError::InvalidElement`] if `z` is zero, the symbol is empty,
    /// or `molar_mass` is not finite and positive.
    pub fn new(
        name: impl Into<String>,
        symbol: impl Into<String>,
        z: u32,
        molar_mass: f64,
    ) -> Result<Self, MaterialError> {
        let name = name.into();
        let symbol = symbol.into();
        if z == 0 {
            return Err(MaterialError::InvalidElement {
                name,
                reason: "atomic number must be at least 1".into(),
            });
        }
        if symbol.trim().is_empty() {
            return Err(MaterialError::InvalidElement {
                name,
                reason: "symbol must not be empty".into(),
            });
        }
        if !molar_mass.is_finite() || molar_mass <= 0.0 {
            return Err(MaterialError::InvalidElement {
                name,
                reason: format!("molar mass must be finite and > 0, got {molar_mass}"),
            });
        }
        Ok(Self {
            name,
            symbol,
            z,
            molar_mass,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn z(&self) -> u32 {
        self.z
    }

    /// Molar mass in internal units (g/mole).
    pub fn molar_mass(&self) -> f64 {
        self.molar_mass
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Element: {:<12} ({:>2})  Z = {:>3}  A = {:>9.4} g/mole",
            self.name,
            self.symbol,
            self.z,
            self.molar_mass / G_PER_MOLE
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_element_ok() {
        let cs = Element::new("caesium", "Cs", 55, 132.90543 * G_PER_MOLE).unwrap();
        assert_eq!(cs.name(), "caesium");
        assert_eq!(cs.symbol(), "Cs");
        assert_eq!(cs.z(), 55);
        assert_eq!(cs.molar_mass(), 132.90543);
    }

    #[test]
    fn zero_atomic_number_rejected() {
        let err = Element::new("nothing", "X", 0, 1.0).unwrap_err();
        assert!(err.to_string().contains("atomic number"));
    }

    #[test]
    fn non_positive_molar_mass_rejected() {
        assert!(Element::new("kalium", "K", 19, 0.0).is_err());
        assert!(Element::new("kalium", "K", 19, f64::NAN).is_err());
    }

    #[test]
    fn display_shows_symbol_and_mass() {
        let sb = Element::new("antimony", "Sb", 51, 121.760).unwrap();
        let text = sb.to_string();
        assert!(text.contains("Sb"));
        assert!(text.contains("121.7600"));
    }
}
