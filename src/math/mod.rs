//! Linear algebra type aliases and geometric tolerances.

pub type Point3 = nalgebra::Point3<f64>;
pub type Vector3 = nalgebra::Vector3<f64>;

/// Three-channel radiance sample (multiples of W/sr/m, non-negative).
pub type Radiance = nalgebra::Vector3<f64>;

/// Edges shorter than this (meters) are treated as zero-length.
pub const TOLERANCE: f64 = 1e-12;

/// Up axis of the simulation frame; shoots grow along +Z.
pub fn up() -> Vector3 {
    Vector3::z()
}

/// Unit vector of `v`, or `None` when `v` is too short to carry a direction.
pub fn try_normalize(v: &Vector3) -> Option<Vector3> {
    v.try_normalize(TOLERANCE)
}
