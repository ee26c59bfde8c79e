//! Rays, axis-aligned boxes and the slab intersection test.

use crate::math::{Point3, Vector3};

/// A half-line `origin + t * direction` for `t >= 0`.
#[derive(Clone, Copy, Debug)]
pub struct Ray {
    pub origin: Point3,
    /// Expected to be unit length; the slab test itself does not require it,
    /// but ray parameters are only distances when it is.
    pub direction: Vector3,
}

impl Ray {
    pub fn new(origin: Point3, direction: Vector3) -> Self {
        Self { origin, direction }
    }

    pub fn at(&self, t: f64) -> Point3 {
        self.origin + self.direction * t
    }
}

/// Closed range `[entry, exit]` of ray parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayInterval {
    pub entry: f64,
    pub exit: f64,
}

impl RayInterval {
    pub fn new(entry: f64, exit: f64) -> Self {
        Self { entry, exit }
    }

    /// The whole real line: no constraint.
    pub fn entire() -> Self {
        Self::new(f64::NEG_INFINITY, f64::INFINITY)
    }

    pub fn empty() -> Self {
        Self::new(f64::INFINITY, f64::NEG_INFINITY)
    }

    pub fn is_empty(&self) -> bool {
        self.entry > self.exit
    }

    pub fn contains(&self, t: f64) -> bool {
        self.entry <= t && t <= self.exit
    }

    pub fn intersect(self, other: RayInterval) -> RayInterval {
        RayInterval::new(self.entry.max(other.entry), self.exit.min(other.exit))
    }
}

/// Axis-aligned bounding box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: Point3,
    pub max: Point3,
}

impl Aabb {
    pub fn new(min: Point3, max: Point3) -> Self {
        Self { min, max }
    }

    pub fn center(&self) -> Point3 {
        nalgebra::center(&self.min, &self.max)
    }

    pub fn size(&self) -> Vector3 {
        self.max - self.min
    }

    pub fn contains(&self, p: &Point3) -> bool {
        (0..3).all(|axis| p[axis] >= self.min[axis] && p[axis] <= self.max[axis])
    }

    /// Ray parameters for which the supporting line of `ray` is inside the
    /// box, without discarding the part behind the origin.
    ///
    /// Each axis contributes the range between its two bounding planes; the
    /// box range is the intersection of the three.
    pub fn slab_interval(&self, ray: &Ray) -> RayInterval {
        (0..3).fold(RayInterval::entire(), |acc, axis| {
            acc.intersect(slab(
                self.min[axis],
                self.max[axis],
                ray.origin[axis],
                ray.direction[axis],
            ))
        })
    }

    /// Forward intersection of `ray` with the box.
    ///
    /// The entry parameter is clamped at zero since rays never hit anything
    /// behind their origin. Returns `None` when the clamped range is empty.
    pub fn intersect_ray(&self, ray: &Ray) -> Option<RayInterval> {
        let iv = self.slab_interval(ray);
        let iv = RayInterval::new(iv.entry.max(0.0), iv.exit);
        if iv.is_empty() {
            None
        } else {
            Some(iv)
        }
    }
}

/// Parameter range between the planes `lo` and `hi` on one axis.
///
/// A ray parallel to the planes is either always between them (no
/// constraint) or never (empty), depending on where its origin lies.
fn slab(lo: f64, hi: f64, origin: f64, direction: f64) -> RayInterval {
    if direction == 0.0 {
        return if origin >= lo && origin <= hi {
            RayInterval::entire()
        } else {
            RayInterval::empty()
        };
    }
    let t0 = (lo - origin) / direction;
    let t1 = (hi - origin) / direction;
    RayInterval::new(t0.min(t1), t0.max(t1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parallel_slab_inside_is_unconstrained() {
        let iv = slab(0.0, 1.0, 0.5, 0.0);
        assert_eq!(iv, RayInterval::entire());
    }

    #[test]
    fn parallel_slab_on_plane_is_unconstrained() {
        // 0/0 would be NaN; the origin sits on the boundary so it counts as inside.
        let iv = slab(0.0, 1.0, 0.0, 0.0);
        assert_eq!(iv, RayInterval::entire());
    }

    #[test]
    fn parallel_slab_outside_is_empty() {
        assert!(slab(0.0, 1.0, 2.0, 0.0).is_empty());
    }

    #[test]
    fn negative_direction_orders_entry_before_exit() {
        let iv = slab(0.0, 1.0, 3.0, -1.0);
        assert_eq!(iv, RayInterval::new(2.0, 3.0));
    }
}
