//! The write-once material table.
//!
//! Every element and material used by a detector is registered here under a
//! unique name while materials are being defined. Geometry refers to
//! materials through stable [`MaterialId`] handles. Once the geometry is
//! built the table is frozen and any further registration fails with
//! [`MaterialError::FrozenTable`]; lookups keep working.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::database::{MaterialDatabase, MaterialError};
use crate::element::Element;
use crate::material::Material;

/// Stable handle to a material registered in a [`MaterialTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MaterialId(usize);

impl MaterialId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Registry of elements and materials for one run.
#[derive(Debug, Default)]
pub struct MaterialTable {
    elements: Vec<Element>,
    materials: Vec<Material>,
    frozen: bool,
}

impl MaterialTable {
    pub fn new() -> Self {
        Self::default()
    }

    fn ensure_writable(&self, name: &str) -> Result<(), MaterialError> {
        if self.frozen {
            return Err(MaterialError::FrozenTable(name.to_string()));
        }
        Ok(())
    }

    /// Register an element under its unique name.
    pub fn register_element(&mut self, element: Element) -> Result<&Element, MaterialError> {
        self.ensure_writable(element.name())?;
        if self.elements.iter().any(|e| e.name() == element.name()) {
            return Err(MaterialError::DuplicateName(element.name().to_string()));
        }
        log::debug!("registered element {} ({})", element.name(), element.symbol());
        self.elements.push(element);
        let last = self.elements.len() - 1;
        Ok(&self.elements[last])
    }

    /// Register a fully built material under its unique name.
    ///
    /// Elements of the material that are not yet in the table are
    /// registered alongside it.
    pub fn add_material(&mut self, material: Material) -> Result<MaterialId, MaterialError> {
        self.ensure_writable(material.name())?;
        if self.materials.iter().any(|m| m.name() == material.name()) {
            return Err(MaterialError::DuplicateName(material.name().to_string()));
        }
        for c in material.components() {
            if !self.elements.iter().any(|e| e.name() == c.element.name()) {
                self.elements.push(c.element.clone());
            }
        }
        log::debug!("registered material {}", material.name());
        self.materials.push(material);
        Ok(MaterialId(self.materials.len() - 1))
    }

    /// Return the material named `name`, building it from `db` on first use.
    ///
    /// A material already in the table is returned as-is, even when frozen.
    ///
    /// # Errors
    /// [`MaterialError::NotFound`] if `db` does not know the name, or
    /// [`MaterialError::FrozenTable`] if it would have to be registered now.
    pub fn find_or_build(
        &mut self,
        db: &dyn MaterialDatabase,
        name: &str,
    ) -> Result<MaterialId, MaterialError> {
        if let Ok(id) = self.id(name) {
            return Ok(id);
        }
        self.ensure_writable(name)?;
        let material = db.find_material(name)?;
        log::debug!("resolved {} from the {} database", name, db.name());
        self.add_material(material)
    }

    /// Handle of the material named `name`.
    pub fn id(&self, name: &str) -> Result<MaterialId, MaterialError> {
        self.materials
            .iter()
            .position(|m| m.name() == name)
            .map(MaterialId)
            .ok_or_else(|| MaterialError::NotFound(name.to_string()))
    }

    /// Material by name.
    pub fn get(&self, name: &str) -> Result<&Material, MaterialError> {
        self.id(name).map(|id| &self.materials[id.0])
    }

    /// Material by handle. `None` for a handle issued by a different table.
    pub fn material(&self, id: MaterialId) -> Option<&Material> {
        self.materials.get(id.0)
    }

    /// Element by name.
    pub fn element(&self, name: &str) -> Result<&Element, MaterialError> {
        self.elements
            .iter()
            .find(|e| e.name() == name)
            .ok_or_else(|| MaterialError::ElementNotFound(name.to_string()))
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn iter(&self) -> impl Iterator<Item = (MaterialId, &Material)> {
        self.materials
            .iter()
            .enumerate()
            .map(|(i, m)| (MaterialId(i), m))
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    /// Make the table read-only. Idempotent.
    pub fn freeze(&mut self) {
        if !self.frozen {
            log::info!(
                "material table frozen with {} materials and {} elements",
                self.materials.len(),
                self.elements.len()
            );
        }
        self.frozen = true;
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }
}

impl fmt::Display for MaterialTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "***** Table : Nb of materials = {} *****", self.materials.len())?;
        for m in &self.materials {
            writeln!(f)?;
            write!(f, "{m}")?;
        }
        Ok(())
    }
}
