//! Transform provider seam
//!
//! Colliders pull their world-space placement from a `TransformProvider`.
//! The spatial hierarchy itself lives outside this crate; `TransformStore`
//! is the flat provider the simulation ships with, where local and world
//! transforms coincide.

use glam::{Affine2, Vec2};

use super::Entity;
use super::index::{ComponentIndexTable, DenseVec, Locator, Subsystem, SystemId, detach};
use crate::error::Result;

/// Source of world transforms
pub trait TransformProvider {
    /// World transform of `entity`: translation is the position,
    /// `matrix2.x_axis`/`y_axis` the basis vectors
    fn world(&self, entity: Entity) -> Affine2;
}

/// Position, x basis and y basis of a transform
#[inline]
pub fn basis(tfm: &Affine2) -> (Vec2, Vec2, Vec2) {
    (tfm.translation, tfm.matrix2.x_axis, tfm.matrix2.y_axis)
}

/// Flat per-entity transforms
#[derive(Debug)]
pub struct TransformStore {
    index: ComponentIndexTable,
    transforms: DenseVec<Affine2>,
}

impl Default for TransformStore {
    fn default() -> Self {
        Self {
            index: ComponentIndexTable::new(SystemId::Transform),
            transforms: DenseVec::new(),
        }
    }
}

impl TransformStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attach(&mut self, entity: Entity, tfm: Affine2) -> Result<()> {
        self.index.ensure_vacant(entity)?;
        let offset = self.transforms.push(entity, tfm);
        self.index.add(entity, Locator::new((), offset))
    }

    /// Overwrite `entity`'s transform, attaching one if missing
    pub fn set(&mut self, entity: Entity, tfm: Affine2) -> Result<()> {
        if let Some(slot) = self.referential_mut(entity) {
            *slot = tfm;
            return Ok(());
        }
        self.attach(entity, tfm)
    }

    /// Mutable local transform of `entity`
    pub fn referential_mut(&mut self, entity: Entity) -> Option<&mut Affine2> {
        let loc = self.index.locate(entity).ok()?;
        self.transforms.get_mut(loc.offset).map(|slot| &mut slot.value)
    }

    pub fn referential(&self, entity: Entity) -> Option<&Affine2> {
        let loc = self.index.locate(entity).ok()?;
        self.transforms.get(loc.offset).map(|slot| &slot.value)
    }

    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }
}

impl TransformProvider for TransformStore {
    /// All-zero for entities without a transform, so their shapes collapse
    /// to a zero-radius point at the origin
    fn world(&self, entity: Entity) -> Affine2 {
        self.referential(entity).copied().unwrap_or(Affine2::ZERO)
    }
}

impl Subsystem for TransformStore {
    fn id(&self) -> SystemId {
        SystemId::Transform
    }

    fn has(&self, entity: Entity) -> bool {
        self.index.has(entity)
    }

    fn locate_raw(&self, entity: Entity) -> Result<Locator<u8>> {
        self.index.locate(entity).map(Locator::erase)
    }

    fn remove(&mut self, entity: Entity) -> Result<()> {
        let loc = self.index.locate(entity)?;
        detach(&mut self.index, &mut self.transforms, entity, loc);
        Ok(())
    }

    fn forget(&mut self, entity: Entity) {
        self.index.remove(entity);
    }
}
