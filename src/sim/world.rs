//! Simulation world and tick orchestration
//!
//! Owns the entity registry and every subsystem. A tick is:
//! flush deferred destruction → integrate transforms → refresh colliders and
//! sweep → advance hurt states. The collision list is then read-only until
//! the next tick rebuilds it.

use serde::Serialize;

use super::Entity;
use super::deriv::Deriv;
use super::hurt::HurtTracker;
use super::index::{Locator, Subsystem, SystemId};
use super::physics::{CollisionRecord, Physics};
use super::registry::EntityRegistry;
use super::shapes::ColliderKind;
use super::transform::TransformStore;
use crate::error::Result;
use crate::settings::SimSettings;

/// Summary of one tick
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TickReport {
    /// Tick number, starting at 1
    pub tick: u64,
    /// Entities torn down by this tick's flush
    pub destroyed: Vec<Entity>,
    /// Unordered colliding pairs found by the sweep
    pub collision_pairs: usize,
}

#[derive(Debug)]
pub struct World {
    registry: EntityRegistry,
    pub transforms: TransformStore,
    pub physics: Physics,
    pub deriv: Deriv,
    pub hurt: HurtTracker,
    ticks: u64,
}

impl Default for World {
    fn default() -> Self {
        Self::new(&SimSettings::default())
    }
}

impl World {
    pub fn new(settings: &SimSettings) -> Self {
        log::info!(
            "World created ({} Hz, hurt {} ticks, cooldown {} ticks)",
            settings.tick_rate_hz,
            settings.hurt_ticks,
            settings.hurt_cooldown_ticks
        );
        Self {
            registry: EntityRegistry::new(),
            transforms: TransformStore::new(),
            physics: Physics::new(),
            deriv: Deriv::new(),
            hurt: HurtTracker::new(settings.hurt_ticks, settings.hurt_cooldown_ticks),
            ticks: 0,
        }
    }

    pub fn spawn(&mut self) -> Entity {
        self.registry.spawn()
    }

    /// Queue `entity` for destruction; its components stay live until the
    /// next flush
    pub fn despawn(&mut self, entity: Entity) {
        self.registry.despawn(entity);
    }

    pub fn pending_this_tick(&self) -> &[Entity] {
        self.registry.pending_this_tick()
    }

    /// Remove every queued entity's components from all subsystems
    pub fn flush(&mut self) -> Vec<Entity> {
        self.registry.flush(&mut [
            &mut self.transforms,
            &mut self.physics,
            &mut self.deriv,
            &mut self.hurt,
        ])
    }

    /// Run one fixed step of `dt` seconds
    pub fn tick(&mut self, dt: f32) -> TickReport {
        let destroyed = self.flush();
        self.deriv.update(dt, &mut self.transforms);
        self.physics.update(&self.transforms);
        self.hurt.update(self.physics.collisions());
        self.ticks += 1;

        let report = TickReport {
            tick: self.ticks,
            destroyed,
            collision_pairs: self.physics.collisions().len() / 2,
        };
        log::debug!(
            "tick {}: {} destroyed, {} pairs",
            report.tick,
            report.destroyed.len(),
            report.collision_pairs
        );
        report
    }

    /// Ticks run so far
    pub fn tick_count(&self) -> u64 {
        self.ticks
    }

    /// Ids handed out so far
    pub fn spawned(&self) -> u32 {
        self.registry.spawned()
    }

    fn system(&self, id: SystemId) -> &dyn Subsystem {
        match id {
            SystemId::Transform => &self.transforms,
            SystemId::Physics => &self.physics,
            SystemId::Deriv => &self.deriv,
            SystemId::Hurt => &self.hurt,
        }
    }

    /// Does `entity` have a component in `system`?
    pub fn has(&self, entity: Entity, system: SystemId) -> bool {
        self.system(system).has(entity)
    }

    /// Type-erased locator of `entity`'s component in `system`
    pub fn locate(&self, entity: Entity, system: SystemId) -> Result<Locator<u8>> {
        self.system(system).locate_raw(entity)
    }

    pub fn collider_kind(&self, entity: Entity) -> Result<ColliderKind> {
        self.physics.collider_kind(entity)
    }

    /// This tick's collision records, both directions of every pair
    pub fn collisions(&self) -> &[CollisionRecord] {
        self.physics.collisions()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::error::SimError;
    use glam::{Affine2, Vec2};

    fn disc(pos: Vec2, radius: f32) -> Affine2 {
        Affine2::from_scale_angle_translation(Vec2::splat(2.0 * radius), 0.0, pos)
    }

    fn circle_at(world: &mut World, pos: Vec2, radius: f32) -> Entity {
        let e = world.spawn();
        world.transforms.attach(e, disc(pos, radius)).unwrap();
        world.physics.add_circle(e).unwrap();
        e
    }

    #[test]
    fn test_tick_counts_pairs() {
        let mut world = World::default();
        let a = circle_at(&mut world, Vec2::ZERO, 1.0);
        let b = circle_at(&mut world, Vec2::new(1.5, 0.0), 1.0);
        let report = world.tick(SIM_DT);
        assert_eq!(report.tick, 1);
        assert_eq!(report.collision_pairs, 1);
        assert!(world.collisions().contains(&CollisionRecord { subject: a, other: b }));
    }

    #[test]
    fn test_flush_clears_every_subsystem() {
        let mut world = World::default();
        let a = circle_at(&mut world, Vec2::ZERO, 1.0);
        let rate = world.spawn();
        world.deriv.derive_from(a, rate).unwrap();
        world.hurt.track(a).unwrap();

        world.despawn(a);
        for id in [SystemId::Transform, SystemId::Physics, SystemId::Deriv, SystemId::Hurt] {
            assert!(world.has(a, id), "{id:?} dropped before flush");
        }

        let report = world.tick(SIM_DT);
        assert_eq!(report.destroyed, vec![a]);
        for id in SystemId::ALL {
            assert!(!world.has(a, id));
            assert!(matches!(world.locate(a, id), Err(SimError::NotFound { .. })));
        }
    }

    #[test]
    fn test_hurt_follows_collisions() {
        let mut world = World::default();
        let a = circle_at(&mut world, Vec2::ZERO, 1.0);
        let b = circle_at(&mut world, Vec2::new(1.0, 0.0), 1.0);
        world.hurt.track(a).unwrap();
        world.tick(SIM_DT);
        assert!(world.hurt.is_hurt(a));
        assert!(!world.hurt.is_hurt(b));
    }

    #[test]
    fn test_subsystems_report_their_id() {
        let world = World::default();
        for id in SystemId::ALL {
            assert_eq!(world.system(id).id(), id);
        }
    }

    #[test]
    fn test_locate_erases_kind() {
        let mut world = World::default();
        let _ = circle_at(&mut world, Vec2::ZERO, 1.0);
        let r = world.spawn();
        world.physics.add_ray(r).unwrap();
        let loc = world.locate(r, SystemId::Physics).unwrap();
        assert_eq!(loc, Locator::new(2u8, 0));
        assert_eq!(world.collider_kind(r).unwrap(), ColliderKind::Ray);
    }
}
