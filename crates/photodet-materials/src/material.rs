//! Fixed-composition materials.
//!
//! A [`Material`] is a named mixture of [`Element`]s at an explicitly given
//! mass density. Compositions are declared either by atom count per
//! formula unit (CsK₂Sb → Cs 1, K 2, Sb 1) or by mass fraction, never both.
//! Mass fractions are always derived and stored; they cannot change once
//! [`MaterialBuilder::build`] succeeds.
//!
//! Atom counts are converted with
//! $w_i = n_i A_i / \sum_j n_j A_j$
//! and the number density of each element is
//! $N_i = N_A \rho w_i / A_i$.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::database::MaterialError;
use crate::element::Element;
use crate::units::{AVOGADRO, G_PER_CM3, G_PER_MOLE};

/// Allowed deviation of declared mass fractions from unity.
pub const FRACTION_SUM_TOLERANCE: f64 = 1.0e-6;

/// One element of a material's composition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    pub element: Element,
    /// Atoms per formula unit, when the material was declared by atom count.
    pub atoms: Option<u32>,
    /// Mass fraction in [0, 1].
    pub mass_fraction: f64,
}

/// An immutable material definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    name: String,
    /// Density (g/cm³).
    density: f64,
    components: Vec<Component>,
}

impl Material {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Mass density in internal units (g/cm³).
    pub fn density(&self) -> f64 {
        self.density
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    /// Mass fraction of the element with the given symbol, zero if absent.
    pub fn mass_fraction_of(&self, symbol: &str) -> f64 {
        self.components
            .iter()
            .filter(|c| c.element.symbol() == symbol)
            .map(|c| c.mass_fraction)
            .sum()
    }

    /// Number of atoms per cm³ for each component, in component order.
    pub fn atoms_per_volume(&self) -> Vec<f64> {
        let rho = self.density / G_PER_CM3;
        self.components
            .iter()
            .map(|c| AVOGADRO * rho * c.mass_fraction / (c.element.molar_mass() / G_PER_MOLE))
            .collect()
    }

    /// Total number of atoms per cm³.
    pub fn total_atoms_per_volume(&self) -> f64 {
        self.atoms_per_volume().iter().sum()
    }

    /// Mean molar mass per atom (g/mole), weighted by atom number.
    pub fn mean_molar_mass(&self) -> f64 {
        let inv: f64 = self
            .components
            .iter()
            .map(|c| c.mass_fraction / c.element.molar_mass())
            .sum();
        1.0 / inv
    }
}

impl fmt::Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            " Material: {:>16}    density: {:.6e} g/cm3   components: {}",
            self.name,
            self.density / G_PER_CM3,
            self.components.len()
        )?;
        let densities = self.atoms_per_volume();
        for (c, n) in self.components.iter().zip(densities) {
            write!(f, "   ---> {}", c.element)?;
            match c.atoms {
                Some(atoms) => write!(f, "  atoms: {atoms:>3}")?,
                None => write!(f, "            ")?,
            }
            writeln!(
                f,
                "  ElmMassFraction: {:>7.3} %  ElmAbundance: {:.4e} /cm3",
                100.0 * c.mass_fraction,
                n
            )?;
        }
        Ok(())
    }
}

#[derive(Debug)]
enum Declared {
    Atoms(Element, u32),
    Fraction(Element, f64),
}

/// Builder for user-defined materials.
///
/// ```
/// use photodet_materials::{Element, MaterialBuilder};
/// use photodet_materials::units::{G_PER_CM3, G_PER_MOLE};
///
/// let h = Element::new("hydrogen", "H", 1, 1.00794 * G_PER_MOLE).unwrap();
/// let o = Element::new("oxygen", "O", 8, 15.9994 * G_PER_MOLE).unwrap();
/// let water = MaterialBuilder::new("Water", 1.0 * G_PER_CM3, 2)
///     .add_element_atoms(&h, 2)
///     .add_element_atoms(&o, 1)
///     .build()
///     .unwrap();
/// assert!((water.mass_fraction_of("H") - 0.1119).abs() < 1e-4);
/// ```
#[derive(Debug)]
pub struct MaterialBuilder {
    name: String,
    density: f64,
    expected_components: usize,
    declared: Vec<Declared>,
}

impl MaterialBuilder {
    /// Start a material with `n_components` elements at the given density.
    pub fn new(name: impl Into<String>, density: f64, n_components: usize) -> Self {
        Self {
            name: name.into(),
            density,
            expected_components: n_components,
            declared: Vec::with_capacity(n_components),
        }
    }

    /// Add an element with a number of atoms per formula unit.
    pub fn add_element_atoms(mut self, element: &Element, atoms: u32) -> Self {
        self.declared.push(Declared::Atoms(element.clone(), atoms));
        self
    }

    /// Add an element by mass fraction.
    pub fn add_element_fraction(mut self, element: &Element, fraction: f64) -> Self {
        self.declared
            .push(Declared::Fraction(element.clone(), fraction));
        self
    }

    /// Validate the declared composition and derive mass fractions.
    ///
    /// # Errors
    /// [`MaterialError::InvalidComposition`] when the density is not positive,
    /// the declared component count is not met, atom counts and fractions
    /// are mixed, an element appears twice, or fractions do not sum to one.
    pub fn build(self) -> Result<Material, MaterialError> {
        let invalid = |reason: String| MaterialError::InvalidComposition {
            name: self.name.clone(),
            reason,
        };

        if self.name.trim().is_empty() {
            return Err(invalid("material name must not be empty".into()));
        }
        if !self.density.is_finite() || self.density <= 0.0 {
            return Err(invalid(format!(
                "density must be finite and > 0, got {}",
                self.density
            )));
        }
        if self.declared.is_empty() {
            return Err(invalid("no components declared".into()));
        }
        if self.declared.len() != self.expected_components {
            return Err(invalid(format!(
                "expected {} components, got {}",
                self.expected_components,
                self.declared.len()
            )));
        }
        for (i, d) in self.declared.iter().enumerate() {
            let el = match d {
                Declared::Atoms(e, _) | Declared::Fraction(e, _) => e,
            };
            let repeated = self.declared[..i].iter().any(|prev| match prev {
                Declared::Atoms(p, _) | Declared::Fraction(p, _) => p.symbol() == el.symbol(),
            });
            if repeated {
                return Err(invalid(format!("element {} declared twice", el.symbol())));
            }
        }

        let by_atoms = self
            .declared
            .iter()
            .all(|d| matches!(d, Declared::Atoms(..)));
        let by_fraction = self
            .declared
            .iter()
            .all(|d| matches!(d, Declared::Fraction(..)));

        let components = if by_atoms {
            let mut total = 0.0;
            for d in &self.declared {
                if let Declared::Atoms(e, n) = d {
                    if *n == 0 {
                        return Err(invalid(format!("zero atoms of {}", e.symbol())));
                    }
                    total += f64::from(*n) * e.molar_mass();
                }
            }
            self.declared
                .iter()
                .filter_map(|d| match d {
                    Declared::Atoms(e, n) => Some(Component {
                        element: e.clone(),
                        atoms: Some(*n),
                        mass_fraction: f64::from(*n) * e.molar_mass() / total,
                    }),
                    Declared::Fraction(..) => None,
                })
                .collect::<Vec<_>>()
        } else if by_fraction {
            let mut sum = 0.0;
            for d in &self.declared {
                if let Declared::Fraction(e, w) = d {
                    if !w.is_finite() || *w <= 0.0 || *w > 1.0 {
                        return Err(invalid(format!(
                            "mass fraction of {} must be in (0, 1], got {w}",
                            e.symbol()
                        )));
                    }
                    sum += w;
                }
            }
            if (sum - 1.0).abs() > FRACTION_SUM_TOLERANCE {
                return Err(invalid(format!("mass fractions sum to {sum}, expected 1")));
            }
            self.declared
                .iter()
                .filter_map(|d| match d {
                    Declared::Fraction(e, w) => Some(Component {
                        element: e.clone(),
                        atoms: None,
                        mass_fraction: *w,
                    }),
                    Declared::Atoms(..) => None,
                })
                .collect::<Vec<_>>()
        } else {
            return Err(invalid(
                "cannot mix atom counts and mass fractions".into(),
            ));
        };

        log::debug!(
            "built material '{}' ({} components, {:.4e} g/cm3)",
            self.name,
            components.len(),
            self.density / G_PER_CM3
        );

        Ok(Material {
            name: self.name,
            density: self.density,
            components,
        })
    }
}
