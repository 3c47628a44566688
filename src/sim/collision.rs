//! Pairwise collision predicates
//!
//! Pure functions over world-space shapes. Degenerate inputs (zero-length
//! segments, parallel rays) resolve to "no collision" instead of leaking
//! NaNs into the comparisons.

use super::shapes::{Circle, PolygonMesh, Ray, Triangle};
use crate::consts::GEOMETRY_EPSILON;

/// Overlap when the squared center distance is within the squared radius sum
#[inline]
pub fn circle_circle(a: &Circle, b: &Circle) -> bool {
    let reach = a.radius + b.radius;
    (a.origin - b.origin).length_squared() <= reach * reach
}

/// Does the segment pass within `radius` of the circle's center?
///
/// Solves `|diff + t·swept|² = r²` for the entry/exit times and accepts if
/// that interval overlaps `[0, 1]`.
pub fn circle_ray(c: &Circle, r: &Ray) -> bool {
    let swept2 = r.swept.length_squared();
    if swept2 < GEOMETRY_EPSILON {
        return false;
    }
    let diff = r.origin - c.origin;
    let dot = diff.dot(r.swept);
    let delta_over_4 = dot * dot - swept2 * (diff.length_squared() - c.radius * c.radius);
    if delta_over_4 < 0.0 {
        return false;
    }
    let root = delta_over_4.sqrt();
    let time_lo = (-dot - root) / swept2;
    let time_hi = (-dot + root) / swept2;
    // entirely behind the origin, or entirely past the end
    !(time_hi < 0.0 || time_lo > 1.0)
}

/// Circle against a triangle
///
/// Hits if the triangle's origin corner is inside the circle, the circle's
/// center is inside the triangle, or the circle crosses any edge.
pub fn circle_triangle(c: &Circle, t: &Triangle) -> bool {
    if (c.origin - t.origin).length_squared() <= c.radius * c.radius {
        return true;
    }
    if triangle_contains(t, c.origin) {
        return true;
    }
    t.edges().iter().any(|edge| circle_ray(c, edge))
}

/// Point-in-triangle via the three edge half-planes, winding agnostic
pub fn triangle_contains(t: &Triangle, p: glam::Vec2) -> bool {
    let a = t.origin;
    let b = t.origin + t.u;
    let c = t.origin + t.v;
    let side1 = (b - a).perp_dot(p - a);
    let side2 = (c - b).perp_dot(p - b);
    let side3 = (a - c).perp_dot(p - c);
    let all_left = side1 >= 0.0 && side2 >= 0.0 && side3 >= 0.0;
    let all_right = side1 <= 0.0 && side2 <= 0.0 && side3 <= 0.0;
    // a zero-area triangle would satisfy both
    (all_left || all_right) && t.u.perp_dot(t.v).abs() >= GEOMETRY_EPSILON
}

/// Segment against segment
///
/// Solves `[s1 | s2]·(t1, -t2) = o2 - o1`. Near-parallel segments never
/// collide, even when collinear and overlapping.
pub fn ray_ray(r1: &Ray, r2: &Ray) -> bool {
    let system = glam::Mat2::from_cols(r1.swept, r2.swept);
    let det = system.determinant();
    if det.abs() < GEOMETRY_EPSILON {
        return false;
    }
    let solution = system.inverse() * (r2.origin - r1.origin);
    let (t1, minus_t2) = (solution.x, solution.y);
    (0.0..=1.0).contains(&t1) && (-1.0..=0.0).contains(&minus_t2)
}

/// Triangle against segment, assuming a thin triangle
///
/// Only the `origin → origin + u` edge is tested.
#[inline]
pub fn triangle_ray(t: &Triangle, r: &Ray) -> bool {
    ray_ray(&Ray::new(t.origin, t.u), r)
}

/// True if `hit` reports a collision against any mesh edge
#[inline]
fn any_edge(m: &PolygonMesh, hit: impl Fn(&Ray) -> bool) -> bool {
    m.edges().any(|edge| hit(&edge))
}

pub fn circle_mesh(c: &Circle, m: &PolygonMesh) -> bool {
    any_edge(m, |edge| circle_ray(c, edge))
}

pub fn triangle_mesh(t: &Triangle, m: &PolygonMesh) -> bool {
    any_edge(m, |edge| triangle_ray(t, edge))
}

pub fn ray_mesh(r: &Ray, m: &PolygonMesh) -> bool {
    any_edge(m, |edge| ray_ray(r, edge))
}
