//! Property tests over random operation sequences and random geometry

use glam::{Affine2, Vec2};
use proptest::prelude::*;

use skirmish::SimError;
use skirmish::consts::SIM_DT;
use skirmish::sim::collision::{circle_mesh, circle_ray, ray_ray};
use skirmish::sim::{
    Circle, ColliderKind, CollisionRecord, Entity, EntityRegistry, PolygonMesh, Ray, SystemId,
    World,
};

#[derive(Debug, Clone)]
enum Op {
    Spawn,
    Attach(usize, u8),
    Move(usize, f32, f32),
    Despawn(usize),
    Flush,
    Tick,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => Just(Op::Spawn),
        4 => (any::<usize>(), 0u8..5).prop_map(|(i, k)| Op::Attach(i, k)),
        3 => (any::<usize>(), -4.0f32..4.0, -4.0f32..4.0).prop_map(|(i, x, y)| Op::Move(i, x, y)),
        2 => any::<usize>().prop_map(Op::Despawn),
        1 => Just(Op::Flush),
        2 => Just(Op::Tick),
    ]
}

fn pick(alive: &[Entity], i: usize) -> Option<Entity> {
    if alive.is_empty() {
        None
    } else {
        Some(alive[i % alive.len()])
    }
}

/// Attach kind `k` (4 = hurt tracking) to `e`
fn attach(world: &mut World, e: Entity, k: u8) -> skirmish::Result<()> {
    match k {
        0 => world.physics.add_circle(e).map(drop),
        1 => world.physics.add_triangle(e).map(drop),
        2 => world.physics.add_ray(e).map(drop),
        3 => world
            .physics
            .add_polygon_mesh(e, vec![Vec2::new(-1.0, -1.0), Vec2::new(1.0, -1.0), Vec2::Y])
            .map(drop),
        _ => world.hurt.track(e),
    }
}

/// Every indexed collider points at a slot owned by its entity
fn assert_table_consistent(world: &World, alive: &[Entity]) -> Result<(), TestCaseError> {
    let mut indexed = 0;
    for &e in alive {
        if let Ok(loc) = world.physics.locate(e) {
            prop_assert_eq!(world.physics.owner_at(loc), Some(e));
            indexed += 1;
        }
    }
    let stored: usize = [
        ColliderKind::Circle,
        ColliderKind::Triangle,
        ColliderKind::Ray,
        ColliderKind::PolygonMesh,
    ]
    .into_iter()
    .map(|kind| world.physics.count(kind))
    .sum();
    prop_assert_eq!(indexed, stored);
    prop_assert_eq!(world.physics.len(), stored);
    Ok(())
}

fn assert_symmetric(records: &[CollisionRecord]) -> Result<(), TestCaseError> {
    for rec in records {
        let mirrored = CollisionRecord {
            subject: rec.other,
            other: rec.subject,
        };
        prop_assert!(records.contains(&mirrored), "{:?} has no mirror", rec);
    }
    Ok(())
}

proptest! {
    #[test]
    fn operation_sequences_keep_tables_consistent(ops in prop::collection::vec(op(), 1..120)) {
        let mut world = World::default();
        let mut alive: Vec<Entity> = Vec::new();

        for op in ops {
            match op {
                Op::Spawn => alive.push(world.spawn()),
                Op::Attach(i, k) => {
                    if let Some(e) = pick(&alive, i) {
                        let system = if k == 4 { SystemId::Hurt } else { SystemId::Physics };
                        let had = world.has(e, system);
                        match attach(&mut world, e, k) {
                            Ok(()) => prop_assert!(!had),
                            Err(SimError::AlreadyAttached { .. }) => prop_assert!(had),
                            Err(err) => prop_assert!(false, "unexpected {}", err),
                        }
                    }
                }
                Op::Move(i, x, y) => {
                    if let Some(e) = pick(&alive, i) {
                        world.transforms.set(e, Affine2::from_translation(Vec2::new(x, y))).unwrap();
                    }
                }
                Op::Despawn(i) => {
                    if let Some(e) = pick(&alive, i) {
                        world.despawn(e);
                    }
                }
                Op::Flush | Op::Tick => {
                    let destroyed = if matches!(op, Op::Tick) {
                        let report = world.tick(SIM_DT);
                        assert_symmetric(world.collisions())?;
                        prop_assert_eq!(world.collisions().len(), report.collision_pairs * 2);
                        report.destroyed
                    } else {
                        world.flush()
                    };
                    prop_assert!(world.pending_this_tick().is_empty());
                    for e in &destroyed {
                        for id in SystemId::ALL {
                            prop_assert!(!world.has(*e, id));
                        }
                    }
                    alive.retain(|e| !destroyed.contains(e));
                }
            }
            assert_table_consistent(&world, &alive)?;
        }
    }

    #[test]
    fn spawned_ids_strictly_increase(n in 1usize..300) {
        let mut registry = EntityRegistry::new();
        let mut prev = registry.spawn();
        prop_assert_eq!(prev.raw(), 1);
        for _ in 1..n {
            let next = registry.spawn();
            prop_assert_eq!(next.raw(), prev.raw() + 1);
            prev = next;
        }
    }

    #[test]
    fn ray_through_center_hits(
        cx in -50.0f32..50.0,
        cy in -50.0f32..50.0,
        radius in 0.1f32..10.0,
        swept in (-10.0f32..10.0, -10.0f32..10.0)
            .prop_map(|(x, y)| Vec2::new(x, y))
            .prop_filter("non-degenerate sweep", |s| s.length() > 0.5),
    ) {
        let center = Vec2::new(cx, cy);
        let ray = Ray::new(center - swept * 0.5, swept);
        prop_assert!(circle_ray(&Circle::new(center, radius), &ray));
    }

    #[test]
    fn ray_beside_circle_misses(
        radius in 0.1f32..10.0,
        gap in 0.01f32..5.0,
        ox in 0.0f32..5.0,
        oy in -20.0f32..20.0,
        sx in 0.0f32..10.0,
        sy in -10.0f32..10.0,
    ) {
        // the whole segment stays right of the circle's bounding box
        let ray = Ray::new(Vec2::new(radius + gap + ox, oy), Vec2::new(sx, sy));
        prop_assume!(ray.swept.length() > 1e-2);
        prop_assert!(!circle_ray(&Circle::new(Vec2::ZERO, radius), &ray));
    }

    #[test]
    fn parallel_rays_never_collide(
        ox in -10.0f32..10.0,
        oy in -10.0f32..10.0,
        offset in (-10.0f32..10.0, -10.0f32..10.0),
        swept in (-10.0f32..10.0, -10.0f32..10.0),
    ) {
        let swept = Vec2::new(swept.0, swept.1);
        let a = Ray::new(Vec2::new(ox, oy), swept);
        let b = Ray::new(a.origin + Vec2::new(offset.0, offset.1), swept);
        prop_assert!(!ray_ray(&a, &b));
    }

    #[test]
    fn single_vertex_mesh_never_collides(
        vx in -5.0f32..5.0,
        vy in -5.0f32..5.0,
        radius in 0.0f32..100.0,
    ) {
        let mesh = PolygonMesh::new(vec![Vec2::new(vx, vy)]);
        prop_assert!(!circle_mesh(&Circle::new(Vec2::ZERO, radius), &mesh));
    }
}
