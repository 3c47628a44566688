//! Hurt state machine driven by collision records
//!
//! Consumers that want to react to contact (damage flashes, knockback)
//! query `is_hurt` instead of scanning the collision list per entity.
//!
//! ```text
//! Idle --contact--> Hurt(n) --n ticks--> Cooldown(m) --m ticks--> Idle
//! ```
//!
//! Contacts during `Hurt` or `Cooldown` are ignored.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::Entity;
use super::index::{ComponentIndexTable, DenseVec, Locator, Subsystem, SystemId, detach};
use super::physics::CollisionRecord;
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HurtState {
    #[default]
    Idle,
    Hurt {
        ticks_left: u32,
    },
    Cooldown {
        ticks_left: u32,
    },
}

impl HurtState {
    /// Advance one tick
    fn step(self, in_contact: bool, hurt_ticks: u32, cooldown_ticks: u32) -> Self {
        match self {
            HurtState::Idle if in_contact && hurt_ticks > 0 => HurtState::Hurt {
                ticks_left: hurt_ticks,
            },
            HurtState::Idle => HurtState::Idle,
            HurtState::Hurt { ticks_left } if ticks_left > 1 => HurtState::Hurt {
                ticks_left: ticks_left - 1,
            },
            HurtState::Hurt { .. } if cooldown_ticks > 0 => HurtState::Cooldown {
                ticks_left: cooldown_ticks,
            },
            HurtState::Hurt { .. } => HurtState::Idle,
            HurtState::Cooldown { ticks_left } if ticks_left > 1 => HurtState::Cooldown {
                ticks_left: ticks_left - 1,
            },
            HurtState::Cooldown { .. } => HurtState::Idle,
        }
    }
}

/// Per-entity hurt tracking
#[derive(Debug)]
pub struct HurtTracker {
    index: ComponentIndexTable,
    states: DenseVec<HurtState>,
    hurt_ticks: u32,
    cooldown_ticks: u32,
}

impl HurtTracker {
    pub fn new(hurt_ticks: u32, cooldown_ticks: u32) -> Self {
        Self {
            index: ComponentIndexTable::new(SystemId::Hurt),
            states: DenseVec::new(),
            hurt_ticks,
            cooldown_ticks,
        }
    }

    /// Start tracking `entity` in the idle state
    pub fn track(&mut self, entity: Entity) -> Result<()> {
        self.index.ensure_vacant(entity)?;
        let offset = self.states.push(entity, HurtState::Idle);
        self.index.add(entity, Locator::new((), offset))
    }

    /// Current state, `None` if untracked
    pub fn state(&self, entity: Entity) -> Option<HurtState> {
        let loc = self.index.locate(entity).ok()?;
        self.states.get(loc.offset).map(|slot| slot.value)
    }

    pub fn is_hurt(&self, entity: Entity) -> bool {
        matches!(self.state(entity), Some(HurtState::Hurt { .. }))
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Advance every tracked entity using this tick's collisions
    pub fn update(&mut self, collisions: &[CollisionRecord]) {
        let touching: HashSet<Entity> = collisions.iter().map(|rec| rec.subject).collect();
        for slot in self.states.iter_mut() {
            let next = slot.value.step(
                touching.contains(&slot.owner),
                self.hurt_ticks,
                self.cooldown_ticks,
            );
            if next != slot.value {
                log::trace!("{}: {:?} -> {:?}", slot.owner, slot.value, next);
            }
            slot.value = next;
        }
    }
}

impl Subsystem for HurtTracker {
    fn id(&self) -> SystemId {
        SystemId::Hurt
    }

    fn has(&self, entity: Entity) -> bool {
        self.index.has(entity)
    }

    fn locate_raw(&self, entity: Entity) -> Result<Locator<u8>> {
        self.index.locate(entity).map(Locator::erase)
    }

    fn remove(&mut self, entity: Entity) -> Result<()> {
        let loc = self.index.locate(entity)?;
        detach(&mut self.index, &mut self.states, entity, loc);
        Ok(())
    }

    fn forget(&mut self, entity: Entity) {
        self.index.remove(entity);
    }
}
