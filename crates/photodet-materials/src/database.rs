//! Material database trait and the crate error type.
//!
//! Reference sources implement [`MaterialDatabase`], which resolves
//! canonical material and element names into fully built definitions.

use thiserror::Error;

use crate::element::Element;
use crate::material::Material;

/// Errors from material definition and lookup.
#[derive(Debug, Error)]
pub enum MaterialError {
    #[error("Material not found: {0}")]
    NotFound(String),

    #[error("Element not found: {0}")]
    ElementNotFound(String),

    #[error("Name already registered: {0}")]
    DuplicateName(String),

    #[error("Material table is frozen, cannot register '{0}'")]
    FrozenTable(String),

    #[error("Invalid element '{name}': {reason}")]
    InvalidElement { name: String, reason: String },

    #[error("Invalid composition for '{name}': {reason}")]
    InvalidComposition { name: String, reason: String },
}

/// Resolves standard elements and materials by canonical name.
///
/// Implementations hold reference data only; they never cache or mutate.
/// Registration into a run happens through
/// [`MaterialTable::find_or_build`](crate::table::MaterialTable::find_or_build).
pub trait MaterialDatabase: Send + Sync {
    /// Human-readable name of this data source.
    fn name(&self) -> &str;

    /// Look up an element by its chemical symbol (e.g. "Cs").
    fn find_element(&self, symbol: &str) -> Result<Element, MaterialError>;

    /// Build a material from its canonical name (e.g. "G4_AIR").
    fn find_material(&self, name: &str) -> Result<Material, MaterialError>;

    /// Canonical names of every material this source can build.
    fn material_names(&self) -> Vec<&str>;

    /// Whether `name` resolves in this source.
    fn contains(&self, name: &str) -> bool {
        self.material_names().iter().any(|n| *n == name)
    }
}
