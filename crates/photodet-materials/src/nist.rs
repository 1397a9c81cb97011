//! Embedded reference database of standard elements and materials.
//!
//! Values follow the NIST compositions used by Geant4's material builder:
//! natural-abundance molar masses for elements, and mass-fraction
//! compositions with tabulated densities for compounds and mixtures.
//!
//! ## Available materials
//!
//! | Identifier | Density (g/cm³) | Composition |
//! |-----------|-----------------|-------------|
//! | `G4_Galactic` | 1e-25 | H |
//! | `G4_AIR` | 1.20479e-3 | C, N, O, Ar |
//! | `G4_WATER` | 1.0 | H, O |
//! | `G4_Al` | 2.699 | Al |
//! | `G4_Si` | 2.33 | Si |
//! | `G4_K` | 0.862 | K |
//! | `G4_Sb` | 6.691 | Sb |
//! | `G4_Cs` | 1.873 | Cs |
//! | `G4_Pb` | 11.35 | Pb |
//! | `G4_PYREX_GLASS` | 2.23 | B, O, Na, Al, Si, K |
//! | `G4_GLASS_PLATE` | 2.4 | O, Na, Si, Ca |

use crate::database::{MaterialDatabase, MaterialError};
use crate::element::Element;
use crate::material::{Material, MaterialBuilder};
use crate::units::{G_PER_CM3, G_PER_MOLE};

/// (Z, symbol, name, molar mass in g/mole)
const ELEMENTS: &[(u32, &str, &str, f64)] = &[
    (1, "H", "Hydrogen", 1.00794),
    (5, "B", "Boron", 10.811),
    (6, "C", "Carbon", 12.0107),
    (7, "N", "Nitrogen", 14.0067),
    (8, "O", "Oxygen", 15.9994),
    (11, "Na", "Sodium", 22.98977),
    (13, "Al", "Aluminium", 26.981538),
    (14, "Si", "Silicon", 28.0855),
    (18, "Ar", "Argon", 39.948),
    (19, "K", "Potassium", 39.0983),
    (20, "Ca", "Calcium", 40.078),
    (51, "Sb", "Antimony", 121.760),
    (55, "Cs", "Caesium", 132.90545),
    (82, "Pb", "Lead", 207.2),
];

/// (name, density in g/cm³, [(Z, mass fraction)])
type MaterialRow = (&'static str, f64, &'static [(u32, f64)]);

const MATERIALS: &[MaterialRow] = &[
    ("G4_Galactic", 1.0e-25, &[(1, 1.0)]),
    (
        "G4_AIR",
        0.00120479,
        &[(6, 0.000124), (7, 0.755268), (8, 0.231781), (18, 0.012827)],
    ),
    ("G4_WATER", 1.0, &[(1, 0.111894), (8, 0.888106)]),
    ("G4_Al", 2.699, &[(13, 1.0)]),
    ("G4_Si", 2.33, &[(14, 1.0)]),
    ("G4_K", 0.862, &[(19, 1.0)]),
    ("G4_Sb", 6.691, &[(51, 1.0)]),
    ("G4_Cs", 1.873, &[(55, 1.0)]),
    ("G4_Pb", 11.35, &[(82, 1.0)]),
    (
        "G4_PYREX_GLASS",
        2.23,
        &[
            (5, 0.040064),
            (8, 0.539562),
            (11, 0.028191),
            (13, 0.011644),
            (14, 0.377218),
            (19, 0.003321),
        ],
    ),
    (
        "G4_GLASS_PLATE",
        2.4,
        &[(8, 0.459801), (11, 0.096441), (14, 0.336553), (20, 0.107205)],
    ),
];

/// The embedded NIST reference database.
#[derive(Debug, Clone, Copy, Default)]
pub struct NistDatabase;

impl NistDatabase {
    pub fn new() -> Self {
        Self
    }

    /// Look up an element by atomic number.
    pub fn element_by_z(&self, z: u32) -> Result<Element, MaterialError> {
        let (z, symbol, name, a) = ELEMENTS
            .iter()
            .find(|(ez, ..)| *ez == z)
            .ok_or_else(|| MaterialError::ElementNotFound(format!("Z = {z}")))?;
        Element::new(*name, *symbol, *z, a * G_PER_MOLE)
    }
}

impl MaterialDatabase for NistDatabase {
    fn name(&self) -> &str {
        "NIST"
    }

    fn find_element(&self, symbol: &str) -> Result<Element, MaterialError> {
        let (z, symbol, name, a) = ELEMENTS
            .iter()
            .find(|(_, s, ..)| *s == symbol)
            .ok_or_else(|| MaterialError::ElementNotFound(symbol.to_string()))?;
        Element::new(*name, *symbol, *z, a * G_PER_MOLE)
    }

    fn find_material(&self, name: &str) -> Result<Material, MaterialError> {
        let (name, density, composition) = MATERIALS
            .iter()
            .find(|(n, ..)| *n == name)
            .ok_or_else(|| MaterialError::NotFound(name.to_string()))?;

        let mut builder = MaterialBuilder::new(*name, density * G_PER_CM3, composition.len());
        for (z, fraction) in composition.iter() {
            builder = builder.add_element_fraction(&self.element_by_z(*z)?, *fraction);
        }
        builder.build()
    }

    fn material_names(&self) -> Vec<&str> {
        MATERIALS.iter().map(|(n, ..)| *n).collect()
    }
}
