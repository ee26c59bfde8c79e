//! Sparse voxel light field with nearest-hit ray sampling.
//!
//! Each occupied cell carries a radiance. A ray query tests every occupied
//! cell with the slab method and returns the radiance of the closest one,
//! or the field's escaped radiance when nothing is hit. There is no
//! acceleration structure: cost is linear in the number of occupied cells,
//! which stays in the hundreds to low thousands for a growing plant.

use rand::Rng;

use crate::error::{invalid_argument, Result};
use crate::geometry::Ray;
use crate::math::{Point3, Radiance, Vector3};
use crate::voxel::{CellIndex, VoxelOccupancy};

/// Radiance returned by rays that leave the field without hitting a voxel.
pub fn default_escaped_radiance() -> Radiance {
    Radiance::new(100.0, 50.0, 50.0)
}

/// A light-emitting voxel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LightVoxel {
    pub radiance: Radiance,
}

impl LightVoxel {
    pub fn new(radiance: Radiance) -> Self {
        Self { radiance }
    }
}

impl Default for LightVoxel {
    fn default() -> Self {
        Self::new(Radiance::new(100.0, 200.0, 100.0))
    }
}

/// The voxel a ray hit first.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hit {
    pub cell: CellIndex,
    /// Ray parameter where the ray enters the cell (0 if it starts inside).
    pub t: f64,
    pub radiance: Radiance,
}

/// Occupied cells of edge length `cell_size`, each with a radiance.
///
/// A `None` payload is a present but empty cell: rays pass through it.
#[derive(Clone, Debug)]
pub struct LightField {
    cell_size: f64,
    escaped: Radiance,
    voxels: VoxelOccupancy<Option<LightVoxel>>,
}

impl LightField {
    /// An empty field with cells of edge length `cell_size` (meters).
    pub fn new(cell_size: f64) -> Result<Self> {
        if !(cell_size.is_finite() && cell_size > 0.0) {
            return Err(invalid_argument(format!("cell size must be positive, got {cell_size}")));
        }
        Ok(Self {
            cell_size,
            escaped: default_escaped_radiance(),
            voxels: VoxelOccupancy::new(),
        })
    }

    /// Field holding one voxel of `radiance` per occupied cell of `occupancy`.
    pub fn from_occupancy(
        occupancy: &VoxelOccupancy<bool>,
        cell_size: f64,
        radiance: Radiance,
    ) -> Result<Self> {
        let mut field = Self::new(cell_size)?;
        field.populate(occupancy, |_| radiance);
        Ok(field)
    }

    /// A reproducible test fixture: `count` voxels of default radiance at
    /// indices drawn uniformly from `[-half_extent, half_extent]` per axis.
    /// Draws that land on an already occupied cell collapse into it.
    pub fn random<R: Rng>(
        rng: &mut R,
        count: usize,
        half_extent: i32,
        cell_size: f64,
    ) -> Result<Self> {
        if half_extent < 0 {
            return Err(invalid_argument(format!(
                "half extent must be non-negative, got {half_extent}"
            )));
        }
        let mut field = Self::new(cell_size)?;
        for _ in 0..count {
            let cell = CellIndex::new(
                rng.gen_range(-half_extent..=half_extent),
                rng.gen_range(-half_extent..=half_extent),
                rng.gen_range(-half_extent..=half_extent),
            );
            field.insert(cell, LightVoxel::default());
        }
        Ok(field)
    }

    pub fn with_escaped(mut self, radiance: Radiance) -> Self {
        self.escaped = radiance;
        self
    }

    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    pub fn escaped(&self) -> Radiance {
        self.escaped
    }

    /// Number of stored cells, placeholders included.
    pub fn len(&self) -> usize {
        self.voxels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voxels.is_empty()
    }

    pub fn voxels(&self) -> &VoxelOccupancy<Option<LightVoxel>> {
        &self.voxels
    }

    pub fn insert(&mut self, cell: CellIndex, voxel: LightVoxel) {
        self.voxels.insert(cell, Some(voxel));
    }

    pub fn insert_placeholder(&mut self, cell: CellIndex) {
        self.voxels.insert(cell, None);
    }

    /// Install a voxel for every cell marked `true` in `occupancy`, with the
    /// radiance chosen by `radiance_for_cell`.
    pub fn populate<F>(&mut self, occupancy: &VoxelOccupancy<bool>, mut radiance_for_cell: F)
    where
        F: FnMut(CellIndex) -> Radiance,
    {
        for (&cell, &occupied) in occupancy {
            if occupied {
                self.insert(cell, LightVoxel::new(radiance_for_cell(cell)));
            }
        }
    }

    /// Closest voxel hit by the ray from `origin` along `direction`.
    ///
    /// Cells are scanned in ascending `(x, y, z)` order and only a strictly
    /// smaller entry parameter replaces the current best, so among voxels
    /// entered at the same parameter the smallest cell index wins.
    pub fn nearest_hit(&self, origin: Point3, direction: Vector3) -> Option<Hit> {
        let ray = Ray::new(origin, direction);
        let mut best: Option<Hit> = None;

        for (&cell, voxel) in &self.voxels {
            let Some(voxel) = voxel else {
                continue;
            };
            let Some(iv) = cell.bounds(self.cell_size).intersect_ray(&ray) else {
                continue;
            };
            if best.map_or(true, |b| iv.entry < b.t) {
                best = Some(Hit {
                    cell,
                    t: iv.entry,
                    radiance: voxel.radiance,
                });
            }
        }
        best
    }

    /// Radiance seen from `origin` along unit `direction`.
    pub fn sample(&self, origin: Point3, direction: Vector3) -> Radiance {
        self.nearest_hit(origin, direction)
            .map_or(self.escaped, |hit| hit.radiance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_positive_cell_size() {
        assert!(LightField::new(0.0).is_err());
        assert!(LightField::new(-1.0).is_err());
        assert!(LightField::new(f64::INFINITY).is_err());
    }

    #[test]
    fn populate_skips_cells_marked_false() {
        let mut occ = VoxelOccupancy::new();
        occ.insert(CellIndex::new(0, 0, 0), true);
        occ.insert(CellIndex::new(1, 0, 0), false);
        let field = LightField::from_occupancy(&occ, 1.0, Radiance::new(1.0, 1.0, 1.0)).unwrap();
        assert_eq!(field.len(), 1);
    }
}
