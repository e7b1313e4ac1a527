//! Box and ray primitives
//!
//! Every collidable thing in a course is an axis-aligned box: blocks, the
//! player body and trigger volumes alike. Queries reduce to box overlap
//! tests plus ray casts against boxes and the ground plane.

use glam::Vec3;

/// Information about a ray hitting a surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// World-space position where the ray hit
    pub point: Vec3,
    /// Outward surface normal at the hit point
    pub normal: Vec3,
    /// Distance from ray origin to hit point
    pub distance: f32,
}

impl RayHit {
    pub fn new(point: Vec3, normal: Vec3, distance: f32) -> Self {
        Self {
            point,
            normal,
            distance,
        }
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Box centered on `center` with full extents `size`.
    pub fn from_center_size(center: Vec3, size: Vec3) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Box standing on `feet` (bottom-center point) with the given footprint radius and height.
    pub fn from_feet(feet: Vec3, radius: f32, height: f32) -> Self {
        Self {
            min: Vec3::new(feet.x - radius, feet.y, feet.z - radius),
            max: Vec3::new(feet.x + radius, feet.y + height, feet.z + radius),
        }
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// True if the boxes share interior volume. Touching faces do not count.
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
            && self.min.z < other.max.z
            && self.max.z > other.min.z
    }

    /// True if the XZ footprints overlap (ignores height).
    pub fn overlaps_xz(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.z < other.max.z
            && self.max.z > other.min.z
    }

    /// Strict containment; points on the surface are outside.
    pub fn contains_point(&self, point: Vec3) -> bool {
        point.x > self.min.x
            && point.x < self.max.x
            && point.y > self.min.y
            && point.y < self.max.y
            && point.z > self.min.z
            && point.z < self.max.z
    }

    pub fn translated(&self, offset: Vec3) -> Self {
        Self {
            min: self.min + offset,
            max: self.max + offset,
        }
    }

    /// Parametric interval `(enter, exit)` over which the ray is inside the box.
    ///
    /// Each axis clips the interval to the pair of planes bounding that axis.
    /// Axes the ray runs parallel to either keep the interval untouched or
    /// empty it, depending on whether the origin lies between the planes.
    pub fn ray_interval(&self, origin: Vec3, direction: Vec3) -> Option<(f32, f32)> {
        let mut enter = f32::NEG_INFINITY;
        let mut exit = f32::INFINITY;

        for axis in 0..3 {
            let (o, d) = (origin[axis], direction[axis]);
            let (lo, hi) = (self.min[axis], self.max[axis]);

            if d.abs() <= 1e-10 {
                if o < lo || o > hi {
                    return None;
                }
                continue;
            }

            let inv = d.recip();
            let (near, far) = {
                let a = (lo - o) * inv;
                let b = (hi - o) * inv;
                if a <= b { (a, b) } else { (b, a) }
            };
            enter = enter.max(near);
            exit = exit.min(far);
            if enter > exit {
                return None;
            }
        }

        (exit >= 0.0).then_some((enter, exit))
    }

    /// Outward normal of the face nearest to `point`.
    ///
    /// Ties on edges and corners resolve X first, then Y, then Z.
    pub fn face_normal(&self, point: Vec3) -> Vec3 {
        let half = self.size() * 0.5;
        let rel = (point - self.center()) / half;
        let mag = rel.abs();

        if mag.x >= mag.y && mag.x >= mag.z {
            Vec3::X * rel.x.signum()
        } else if mag.y >= mag.z {
            Vec3::Y * rel.y.signum()
        } else {
            Vec3::Z * rel.z.signum()
        }
    }
}

/// Casts a ray against a single box, returning the entry hit.
///
/// Rays starting inside the box report no hit: a body standing inside a
/// volume must not see that volume as a wall in front of it.
pub fn ray_aabb_hit(origin: Vec3, direction: Vec3, aabb: &Aabb) -> Option<RayHit> {
    if aabb.contains_point(origin) {
        return None;
    }
    let (enter, _) = aabb.ray_interval(origin, direction)?;
    // Origin on the surface: enter may be a hair negative
    let t = enter.max(0.0);
    let point = origin + direction * t;
    Some(RayHit::new(point, aabb.face_normal(point), t))
}

/// Intersects a ray with the horizontal plane `y = height`, seen from above.
///
/// Only downward rays starting above the plane can hit it.
pub fn ray_ground_hit(origin: Vec3, direction: Vec3, height: f32) -> Option<RayHit> {
    if direction.y >= -1e-6 || origin.y < height {
        return None;
    }
    let t = (height - origin.y) / direction.y;
    if t < 0.0 {
        return None;
    }
    let point = origin + direction * t;
    Some(RayHit::new(Vec3::new(point.x, height, point.z), Vec3::Y, t))
}
