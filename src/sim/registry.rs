//! Entity allocation and deferred destruction
//!
//! `despawn` only queues; components are torn down in `flush` at the tick
//! boundary so no subsystem sees a half-destroyed entity mid-tick.

use std::collections::HashSet;

use super::index::Subsystem;
use super::Entity;

/// Allocates entity ids and owns the pending-destruction queue
#[derive(Debug, Default)]
pub struct EntityRegistry {
    /// Last id handed out (0 before the first spawn)
    current: u32,
    pending: Vec<Entity>,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next id; ids are never reused
    ///
    /// Running past `u32::MAX` spawns is an unchecked precondition.
    pub fn spawn(&mut self) -> Entity {
        self.current += 1;
        Entity::from_raw(self.current).expect("entity id space exhausted")
    }

    /// Queue `entity` for destruction at the next flush
    pub fn despawn(&mut self, entity: Entity) {
        log::trace!("despawn queued for {entity}");
        self.pending.push(entity);
    }

    /// Entities queued since the last flush, duplicates included
    pub fn pending_this_tick(&self) -> &[Entity] {
        &self.pending
    }

    /// Number of ids handed out so far
    pub fn spawned(&self) -> u32 {
        self.current
    }

    /// Tear down every queued entity across `systems`
    ///
    /// The queue is deduplicated first (first occurrence wins), each
    /// subsystem holding a component removes it, then residual table
    /// entries are erased. Returns the destroyed entities in queue order.
    pub fn flush(&mut self, systems: &mut [&mut dyn Subsystem]) -> Vec<Entity> {
        let mut seen = HashSet::with_capacity(self.pending.len());
        let mut destroyed = std::mem::take(&mut self.pending);
        destroyed.retain(|e| seen.insert(*e));

        for &entity in &destroyed {
            for system in systems.iter_mut() {
                if system.has(entity) {
                    if let Err(err) = system.remove(entity) {
                        log::warn!("flush of {entity} from {:?}: {err}", system.id());
                    }
                }
                system.forget(entity);
            }
        }

        if !destroyed.is_empty() {
            log::debug!("flushed {} entities", destroyed.len());
        }
        destroyed
    }
}
