//! First-order transform integration
//!
//! Pairs an entity's transform with a "derivative" entity whose transform
//! is the rate of change, and steps `X ← X + dt·(X′·X)` each tick.

use glam::{Affine2, Mat3};

use super::Entity;
use super::index::{ComponentIndexTable, DenseVec, Locator, Subsystem, SystemId, detach};
use super::transform::TransformStore;
use crate::error::Result;

#[derive(Debug)]
pub struct Deriv {
    index: ComponentIndexTable,
    /// Owner is the integrated entity, value its derivative
    pairs: DenseVec<Entity>,
}

impl Default for Deriv {
    fn default() -> Self {
        Self {
            index: ComponentIndexTable::new(SystemId::Deriv),
            pairs: DenseVec::new(),
        }
    }
}

impl Deriv {
    pub fn new() -> Self {
        Self::default()
    }

    /// Integrate `x` using `x_prime`'s transform as its derivative
    pub fn derive_from(&mut self, x: Entity, x_prime: Entity) -> Result<()> {
        self.index.ensure_vacant(x)?;
        let offset = self.pairs.push(x, x_prime);
        self.index.add(x, Locator::new((), offset))
    }

    /// Derivative entity driving `x`
    pub fn derivative_of(&self, x: Entity) -> Option<Entity> {
        let loc = self.index.locate(x).ok()?;
        self.pairs.get(loc.offset).map(|slot| slot.value)
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Step every integrated transform by `dt`
    ///
    /// Pairs where either side lacks a transform are skipped.
    pub fn update(&self, dt: f32, transforms: &mut TransformStore) {
        for slot in self.pairs.iter() {
            let Some(x_prime) = transforms.referential(slot.value).copied() else {
                continue;
            };
            let Some(x) = transforms.referential_mut(slot.owner) else {
                continue;
            };
            // TODO: rotation rates drift off-orthonormal; renormalise the basis
            let tx = Mat3::from(*x);
            let stepped = tx + Mat3::from(x_prime) * tx * dt;
            *x = Affine2::from_mat3(stepped);
        }
    }
}

impl Subsystem for Deriv {
    fn id(&self) -> SystemId {
        SystemId::Deriv
    }

    fn has(&self, entity: Entity) -> bool {
        self.index.has(entity)
    }

    fn locate_raw(&self, entity: Entity) -> Result<Locator<u8>> {
        self.index.locate(entity).map(Locator::erase)
    }

    fn remove(&mut self, entity: Entity) -> Result<()> {
        let loc = self.index.locate(entity)?;
        detach(&mut self.index, &mut self.pairs, entity, loc);
        Ok(())
    }

    fn forget(&mut self, entity: Entity) {
        self.index.remove(entity);
    }
}
