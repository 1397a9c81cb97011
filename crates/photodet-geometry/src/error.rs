use thiserror::Error;

/// Errors raised while building the volume hierarchy.
///
/// All of them are fatal for detector construction: a geometry that
/// failed to build is never handed out partially.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("Invalid shape parameter for '{volume}': {reason}")]
    InvalidShapeParameter { volume: String, reason: String },

    #[error("Overlap detected: '{volume}' intersects sibling '{other}'")]
    Overlap { volume: String, other: String },

    #[error("Overlap detected: '{volume}' extrudes its mother volume '{mother}'")]
    ExtrudesMother { volume: String, mother: String },

    #[error("A world volume is already placed: '{0}'")]
    DuplicateWorld(String),

    #[error("No world volume has been placed")]
    NoWorld,

    #[error("Logical volume name already used: '{0}'")]
    DuplicateName(String),

    #[error("Placement '{name}' with copy number {copy_no} already exists under '{parent}'")]
    DuplicatePlacement {
        name: String,
        copy_no: u32,
        parent: String,
    },

    #[error("Unknown placement handle {0}")]
    UnknownPlacement(usize),

    #[error("Unknown logical volume handle {0}")]
    UnknownLogical(usize),
}
