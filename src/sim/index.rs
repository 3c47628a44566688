//! Per-subsystem component indexing
//!
//! Every subsystem keeps its components in one or more dense arrays and a
//! `ComponentIndexTable` mapping each entity to a `Locator` (which array,
//! which slot). Removal is swap-remove: the last slot moves into the hole
//! and its owner's locator is patched, so arrays stay contiguous and both
//! lookup and removal are O(1). Iteration order is not preserved.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::Entity;
use crate::error::{Result, SimError};

/// Subsystems that own components
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SystemId {
    Transform,
    Physics,
    Deriv,
    Hurt,
}

impl SystemId {
    pub const ALL: [SystemId; 4] = [
        SystemId::Transform,
        SystemId::Physics,
        SystemId::Deriv,
        SystemId::Hurt,
    ];
}

/// Discriminates the dense arrays inside one subsystem
pub trait ComponentTag: Copy + Eq + fmt::Debug {
    /// Numeric tag, must fit in `Locator::TAG_BITS`
    fn bits(self) -> u8;
}

/// Single-array subsystems
impl ComponentTag for () {
    #[inline]
    fn bits(self) -> u8 {
        0
    }
}

impl ComponentTag for u8 {
    #[inline]
    fn bits(self) -> u8 {
        self
    }
}

/// Where an entity's component lives: dense array `kind`, slot `offset`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Locator<K = ()> {
    pub kind: K,
    pub offset: u32,
}

impl<K: ComponentTag> Locator<K> {
    /// Width of the tag field in the packed form
    pub const TAG_BITS: u32 = 2;

    #[inline]
    pub fn new(kind: K, offset: u32) -> Self {
        Self { kind, offset }
    }

    /// Type-erased view for cross-subsystem queries
    #[inline]
    pub fn erase(self) -> Locator<u8> {
        Locator {
            kind: self.kind.bits(),
            offset: self.offset,
        }
    }

    /// `tag | offset << TAG_BITS`, the single-word form used in logs
    #[inline]
    pub fn packed(self) -> u32 {
        u32::from(self.kind.bits()) | (self.offset << Self::TAG_BITS)
    }
}

/// Entity → locator map for one subsystem
#[derive(Debug, Clone)]
pub struct ComponentIndexTable<K = ()> {
    system: SystemId,
    entries: HashMap<Entity, Locator<K>>,
}

impl<K: ComponentTag> ComponentIndexTable<K> {
    pub fn new(system: SystemId) -> Self {
        Self {
            system,
            entries: HashMap::new(),
        }
    }

    pub fn system(&self) -> SystemId {
        self.system
    }

    /// `AlreadyAttached` if `entity` has a component here
    pub fn ensure_vacant(&self, entity: Entity) -> Result<()> {
        if self.entries.contains_key(&entity) {
            return Err(SimError::AlreadyAttached {
                entity,
                system: self.system,
            });
        }
        Ok(())
    }

    /// Install the locator of a freshly attached component
    ///
    /// Rejects a second attach instead of overwriting the first.
    pub fn add(&mut self, entity: Entity, locator: Locator<K>) -> Result<()> {
        self.ensure_vacant(entity)?;
        log::trace!("{:?}: {entity} at {:#x}", self.system, locator.packed());
        self.entries.insert(entity, locator);
        Ok(())
    }

    /// Point `entity` at the slot its component was moved to
    #[inline]
    pub fn reindex(&mut self, entity: Entity, locator: Locator<K>) {
        debug_assert!(
            self.entries.contains_key(&entity),
            "reindex of {entity} which has no {:?} component",
            self.system
        );
        self.entries.insert(entity, locator);
    }

    /// Erase the entry; the dense array is the caller's business
    #[inline]
    pub fn remove(&mut self, entity: Entity) -> Option<Locator<K>> {
        self.entries.remove(&entity)
    }

    pub fn locate(&self, entity: Entity) -> Result<Locator<K>> {
        self.entries
            .get(&entity)
            .copied()
            .ok_or(SimError::NotFound {
                entity,
                system: self.system,
            })
    }

    #[inline]
    pub fn has(&self, entity: Entity) -> bool {
        self.entries.contains_key(&entity)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A component colocated with its owner
#[derive(Debug, Clone, PartialEq)]
pub struct Slot<T> {
    pub value: T,
    pub owner: Entity,
}

/// Contiguous component storage with back-references to owners
#[derive(Debug, Clone)]
pub struct DenseVec<T> {
    slots: Vec<Slot<T>>,
}

impl<T> Default for DenseVec<T> {
    fn default() -> Self {
        Self { slots: Vec::new() }
    }
}

impl<T> DenseVec<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append and return the new slot's offset
    pub fn push(&mut self, owner: Entity, value: T) -> u32 {
        let offset = self.slots.len() as u32;
        self.slots.push(Slot { value, owner });
        offset
    }

    /// Move the last slot into `offset`
    ///
    /// Returns the removed value and the owner of the slot that now sits
    /// at `offset`, if any slot had to move.
    pub fn swap_remove(&mut self, offset: u32) -> (T, Option<Entity>) {
        let removed = self.slots.swap_remove(offset as usize);
        let moved = self.slots.get(offset as usize).map(|s| s.owner);
        (removed.value, moved)
    }

    #[inline]
    pub fn get(&self, offset: u32) -> Option<&Slot<T>> {
        self.slots.get(offset as usize)
    }

    #[inline]
    pub fn get_mut(&mut self, offset: u32) -> Option<&mut Slot<T>> {
        self.slots.get_mut(offset as usize)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Slot<T>> {
        self.slots.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Slot<T>> {
        self.slots.iter_mut()
    }

    pub fn as_slice(&self) -> &[Slot<T>] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// Swap-remove `entity`'s component out of `dense`
///
/// The relocated owner (previously last) is reindexed to `locator`, then
/// `entity`'s own entry is erased.
pub fn detach<T, K: ComponentTag>(
    table: &mut ComponentIndexTable<K>,
    dense: &mut DenseVec<T>,
    entity: Entity,
    locator: Locator<K>,
) -> T {
    debug_assert_eq!(
        dense.get(locator.offset).map(|s| s.owner),
        Some(entity),
        "{:?} table out of sync with storage",
        table.system()
    );
    let (value, moved) = dense.swap_remove(locator.offset);
    if let Some(moved) = moved {
        log::trace!(
            "{:?}: {moved} relocated to {:#x}",
            table.system(),
            locator.packed()
        );
        table.reindex(moved, locator);
    }
    table.remove(entity);
    value
}

/// Uniform capability set the entity registry drives on every subsystem
pub trait Subsystem {
    fn id(&self) -> SystemId;

    fn has(&self, entity: Entity) -> bool;

    fn locate_raw(&self, entity: Entity) -> Result<Locator<u8>>;

    /// Drop `entity`'s component, `NotFound` if it has none
    fn remove(&mut self, entity: Entity) -> Result<()>;

    /// Erase a residual table entry without touching storage
    fn forget(&mut self, entity: Entity);
}
