//! Skirmish - simulation core for a small real-time 2D game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, component indexing, collisions)
//! - `settings`: Data-driven runtime configuration
//! - `error`: Error taxonomy for bookkeeping misuse and config loading

pub mod error;
pub mod settings;
pub mod sim;

pub use error::{Result, SimError};
pub use settings::{DemoSettings, SimSettings};

/// Simulation configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Below this a determinant or squared length counts as zero
    pub const GEOMETRY_EPSILON: f32 = 1e-6;

    /// Hurt FSM defaults (ticks at 120 Hz)
    pub const DEFAULT_HURT_TICKS: u32 = 30;
    pub const DEFAULT_HURT_COOLDOWN_TICKS: u32 = 60;
}
