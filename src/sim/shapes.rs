//! Collider shapes
//!
//! All shapes live in world space and are rewritten from the transform
//! provider every tick, except polygon meshes which keep the vertices they
//! were attached with.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::index::ComponentTag;

/// Which dense array a collider lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColliderKind {
    Circle,
    Triangle,
    Ray,
    PolygonMesh,
}

impl ComponentTag for ColliderKind {
    #[inline]
    fn bits(self) -> u8 {
        match self {
            ColliderKind::Circle => 0,
            ColliderKind::Triangle => 1,
            ColliderKind::Ray => 2,
            ColliderKind::PolygonMesh => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub origin: Vec2,
    pub radius: f32,
}

impl Circle {
    pub fn new(origin: Vec2, radius: f32) -> Self {
        Self { origin, radius }
    }
}

/// Triangle with vertices `origin`, `origin + u`, `origin + v`
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Triangle {
    pub origin: Vec2,
    pub u: Vec2,
    pub v: Vec2,
}

impl Triangle {
    pub fn new(origin: Vec2, u: Vec2, v: Vec2) -> Self {
        Self { origin, u, v }
    }

    /// The three edges as segments: `origin→u`, `origin→v`, `u→v`
    pub fn edges(&self) -> [Ray; 3] {
        [
            Ray::new(self.origin, self.u),
            Ray::new(self.origin, self.v),
            Ray::new(self.origin + self.u, self.v - self.u),
        ]
    }
}

/// Segment from `origin` to `origin + swept`
///
/// Doubles as the swept volume of a point moving `swept` in one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Ray {
    pub origin: Vec2,
    pub swept: Vec2,
}

impl Ray {
    pub fn new(origin: Vec2, swept: Vec2) -> Self {
        Self { origin, swept }
    }

    /// Segment between two points
    pub fn between(from: Vec2, to: Vec2) -> Self {
        Self::new(from, to - from)
    }

    #[inline]
    pub fn at(&self, t: f32) -> Vec2 {
        self.origin + self.swept * t
    }
}

/// Closed polygon: consecutive vertices plus the last→first edge
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PolygonMesh {
    pub vertices: Vec<Vec2>,
}

impl PolygonMesh {
    pub fn new(vertices: Vec<Vec2>) -> Self {
        Self { vertices }
    }

    /// Every edge as a segment, wrap-around edge first
    ///
    /// Meshes with fewer than two vertices have no edges.
    pub fn edges(&self) -> impl Iterator<Item = Ray> + '_ {
        let closing = match (self.vertices.first(), self.vertices.last()) {
            (Some(&first), Some(&last)) if self.vertices.len() >= 2 => {
                Some(Ray::between(last, first))
            }
            _ => None,
        };
        closing.into_iter().chain(
            self.vertices
                .windows(2)
                .map(|pair| Ray::between(pair[0], pair[1])),
        )
    }
}

/// A collider of any kind, for attach calls that take the shape by value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Collider {
    Circle(Circle),
    Triangle(Triangle),
    Ray(Ray),
    PolygonMesh(PolygonMesh),
}

impl Collider {
    pub fn kind(&self) -> ColliderKind {
        match self {
            Collider::Circle(_) => ColliderKind::Circle,
            Collider::Triangle(_) => ColliderKind::Triangle,
            Collider::Ray(_) => ColliderKind::Ray,
            Collider::PolygonMesh(_) => ColliderKind::PolygonMesh,
        }
    }
}
