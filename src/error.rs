//! Error types for the simulation core

use thiserror::Error;

use crate::sim::{Entity, SystemId};

/// Simulation errors
///
/// Geometry never fails; these only cover bookkeeping misuse and
/// configuration loading.
#[derive(Debug, Error)]
pub enum SimError {
    /// Entity has no component in the given subsystem
    #[error("{entity} has no {system:?} component")]
    NotFound { entity: Entity, system: SystemId },

    /// Entity already owns a component in the given subsystem
    #[error("{entity} already has a {system:?} component")]
    AlreadyAttached { entity: Entity, system: SystemId },

    /// Settings file could not be parsed
    #[error("Invalid settings: {0}")]
    Settings(#[from] serde_json::Error),

    /// Settings file could not be read
    #[error("Failed to read settings: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for simulation operations
pub type Result<T> = std::result::Result<T, SimError>;
