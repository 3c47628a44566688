//! Collider storage and the per-tick collision sweep
//!
//! One dense array per collider kind, addressed through a single
//! `ComponentIndexTable<ColliderKind>`. Every tick the circle, triangle and
//! ray colliders are rebuilt from their owners' world transforms, then all
//! supported kind pairs are tested brute force.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::Entity;
use super::collision::{
    circle_circle, circle_mesh, circle_ray, circle_triangle, triangle_mesh, triangle_ray,
};
use super::index::{ComponentIndexTable, DenseVec, Locator, Slot, Subsystem, SystemId, detach};
use super::shapes::{Circle, Collider, ColliderKind, PolygonMesh, Ray, Triangle};
use super::transform::{TransformProvider, basis};
use crate::error::{Result, SimError};

/// `subject` overlapped `other` this tick
///
/// Always recorded in both directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CollisionRecord {
    pub subject: Entity,
    pub other: Entity,
}

/// The physics subsystem
#[derive(Debug)]
pub struct Physics {
    index: ComponentIndexTable<ColliderKind>,
    circles: DenseVec<Circle>,
    triangles: DenseVec<Triangle>,
    rays: DenseVec<Ray>,
    meshes: DenseVec<PolygonMesh>,
    /// Rebuilt from scratch every sweep
    colliding: Vec<CollisionRecord>,
}

impl Default for Physics {
    fn default() -> Self {
        Self {
            index: ComponentIndexTable::new(SystemId::Physics),
            circles: DenseVec::new(),
            triangles: DenseVec::new(),
            rays: DenseVec::new(),
            meshes: DenseVec::new(),
            colliding: Vec::new(),
        }
    }
}

/// Append `value` to `dense` and index it for `entity`
fn insert<T>(
    index: &mut ComponentIndexTable<ColliderKind>,
    dense: &mut DenseVec<T>,
    kind: ColliderKind,
    entity: Entity,
    value: T,
) -> Result<Locator<ColliderKind>> {
    index.ensure_vacant(entity)?;
    let locator = Locator::new(kind, dense.push(entity, value));
    index.add(entity, locator)?;
    Ok(locator)
}

/// Test every `lhs × rhs` pair, recording hits both ways
fn sweep_pairs<A, B>(
    out: &mut Vec<CollisionRecord>,
    lhs: &[Slot<A>],
    rhs: &[Slot<B>],
    hit: impl Fn(&A, &B) -> bool,
) {
    for a in lhs {
        for b in rhs {
            if hit(&a.value, &b.value) {
                record(out, a.owner, b.owner);
            }
        }
    }
}

#[inline]
fn record(out: &mut Vec<CollisionRecord>, a: Entity, b: Entity) {
    out.push(CollisionRecord {
        subject: a,
        other: b,
    });
    out.push(CollisionRecord {
        subject: b,
        other: a,
    });
}

impl Physics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a circle collider, sized from the transform each tick
    pub fn add_circle(&mut self, entity: Entity) -> Result<Locator<ColliderKind>> {
        insert(
            &mut self.index,
            &mut self.circles,
            ColliderKind::Circle,
            entity,
            Circle::default(),
        )
    }

    /// Attach a triangle collider spanned by the transform's basis
    pub fn add_triangle(&mut self, entity: Entity) -> Result<Locator<ColliderKind>> {
        insert(
            &mut self.index,
            &mut self.triangles,
            ColliderKind::Triangle,
            entity,
            Triangle::default(),
        )
    }

    /// Attach a ray collider swept along the transform's x axis
    pub fn add_ray(&mut self, entity: Entity) -> Result<Locator<ColliderKind>> {
        insert(
            &mut self.index,
            &mut self.rays,
            ColliderKind::Ray,
            entity,
            Ray::default(),
        )
    }

    /// Attach a static polygon mesh in world coordinates
    pub fn add_polygon_mesh(
        &mut self,
        entity: Entity,
        vertices: Vec<Vec2>,
    ) -> Result<Locator<ColliderKind>> {
        insert(
            &mut self.index,
            &mut self.meshes,
            ColliderKind::PolygonMesh,
            entity,
            PolygonMesh::new(vertices),
        )
    }

    /// Shape kind of `entity`'s collider
    pub fn collider_kind(&self, entity: Entity) -> Result<ColliderKind> {
        self.index.locate(entity).map(|loc| loc.kind)
    }

    pub fn locate(&self, entity: Entity) -> Result<Locator<ColliderKind>> {
        self.index.locate(entity)
    }

    /// Copy of `entity`'s current shape
    pub fn collider(&self, entity: Entity) -> Result<Collider> {
        let loc = self.index.locate(entity)?;
        let not_found = || SimError::NotFound {
            entity,
            system: SystemId::Physics,
        };
        let offset = loc.offset;
        Ok(match loc.kind {
            ColliderKind::Circle => {
                Collider::Circle(self.circles.get(offset).ok_or_else(not_found)?.value)
            }
            ColliderKind::Triangle => {
                Collider::Triangle(self.triangles.get(offset).ok_or_else(not_found)?.value)
            }
            ColliderKind::Ray => Collider::Ray(self.rays.get(offset).ok_or_else(not_found)?.value),
            ColliderKind::PolygonMesh => Collider::PolygonMesh(
                self.meshes.get(offset).ok_or_else(not_found)?.value.clone(),
            ),
        })
    }

    /// Owner of the slot at `locator`, if that slot exists
    pub fn owner_at(&self, locator: Locator<ColliderKind>) -> Option<Entity> {
        let offset = locator.offset;
        match locator.kind {
            ColliderKind::Circle => self.circles.get(offset).map(|s| s.owner),
            ColliderKind::Triangle => self.triangles.get(offset).map(|s| s.owner),
            ColliderKind::Ray => self.rays.get(offset).map(|s| s.owner),
            ColliderKind::PolygonMesh => self.meshes.get(offset).map(|s| s.owner),
        }
    }

    /// Number of colliders of `kind`
    pub fn count(&self, kind: ColliderKind) -> usize {
        match kind {
            ColliderKind::Circle => self.circles.len(),
            ColliderKind::Triangle => self.triangles.len(),
            ColliderKind::Ray => self.rays.len(),
            ColliderKind::PolygonMesh => self.meshes.len(),
        }
    }

    /// Entities with a collider
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// This tick's collision records
    pub fn collisions(&self) -> &[CollisionRecord] {
        &self.colliding
    }

    /// Everything `entity` touched this tick
    pub fn colliding_with(&self, entity: Entity) -> impl Iterator<Item = Entity> + '_ {
        self.colliding
            .iter()
            .filter(move |rec| rec.subject == entity)
            .map(|rec| rec.other)
    }

    /// Refresh shapes from transforms, then sweep
    pub fn update(&mut self, transforms: &impl TransformProvider) {
        self.refresh(transforms);
        self.sweep();
    }

    /// Rebuild circle, triangle and ray shapes from world transforms
    ///
    /// Circle radius is half the x basis length; triangles take the basis
    /// vectors as edges; rays sweep along the x basis.
    pub fn refresh(&mut self, transforms: &impl TransformProvider) {
        for slot in self.circles.iter_mut() {
            let (pos, x_axis, _) = basis(&transforms.world(slot.owner));
            slot.value = Circle::new(pos, 0.5 * x_axis.length());
        }
        for slot in self.triangles.iter_mut() {
            let (pos, x_axis, y_axis) = basis(&transforms.world(slot.owner));
            slot.value = Triangle::new(pos, x_axis, y_axis);
        }
        for slot in self.rays.iter_mut() {
            let (pos, x_axis, _) = basis(&transforms.world(slot.owner));
            slot.value = Ray::new(pos, x_axis);
        }
    }

    /// Brute-force sweep over the supported kind pairs
    ///
    /// Covers circle×{circle, triangle, ray, mesh} and triangle×{ray, mesh}.
    /// Triangle×triangle, ray×ray and mesh×mesh are never tested.
    pub fn sweep(&mut self) {
        self.colliding.clear();
        let out = &mut self.colliding;
        let circles = self.circles.as_slice();
        let triangles = self.triangles.as_slice();
        let rays = self.rays.as_slice();
        let meshes = self.meshes.as_slice();

        for (i, c1) in circles.iter().enumerate() {
            for c2 in &circles[i + 1..] {
                if circle_circle(&c1.value, &c2.value) {
                    record(out, c1.owner, c2.owner);
                }
            }
        }
        sweep_pairs(out, circles, triangles, circle_triangle);
        sweep_pairs(out, circles, rays, circle_ray);
        sweep_pairs(out, circles, meshes, circle_mesh);
        sweep_pairs(out, triangles, rays, triangle_ray);
        sweep_pairs(out, triangles, meshes, triangle_mesh);
    }
}

impl Subsystem for Physics {
    fn id(&self) -> SystemId {
        SystemId::Physics
    }

    fn has(&self, entity: Entity) -> bool {
        self.index.has(entity)
    }

    fn locate_raw(&self, entity: Entity) -> Result<Locator<u8>> {
        self.index.locate(entity).map(Locator::erase)
    }

    fn remove(&mut self, entity: Entity) -> Result<()> {
        let loc = self.index.locate(entity)?;
        match loc.kind {
            ColliderKind::Circle => {
                detach(&mut self.index, &mut self.circles, entity, loc);
            }
            ColliderKind::Triangle => {
                detach(&mut self.index, &mut self.triangles, entity, loc);
            }
            ColliderKind::Ray => {
                detach(&mut self.index, &mut self.rays, entity, loc);
            }
            ColliderKind::PolygonMesh => {
                detach(&mut self.index, &mut self.meshes, entity, loc);
            }
        }
        Ok(())
    }

    fn forget(&mut self, entity: Entity) {
        self.index.remove(entity);
    }
}
