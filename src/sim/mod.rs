//! Deterministic simulation module
//!
//! Entity bookkeeping and collision detection. This module must stay pure
//! and deterministic:
//! - Fixed timestep only
//! - Single owner (`World`), no globals
//! - No rendering or platform dependencies

pub mod collision;
pub mod deriv;
pub mod entity;
pub mod hurt;
pub mod index;
pub mod physics;
pub mod registry;
pub mod shapes;
pub mod transform;
pub mod world;

pub use deriv::Deriv;
pub use entity::Entity;
pub use hurt::{HurtState, HurtTracker};
pub use index::{ComponentIndexTable, ComponentTag, DenseVec, Locator, Slot, Subsystem, SystemId};
pub use physics::{CollisionRecord, Physics};
pub use registry::EntityRegistry;
pub use shapes::{Circle, Collider, ColliderKind, PolygonMesh, Ray, Triangle};
pub use transform::{TransformProvider, TransformStore};
pub use world::{TickReport, World};
