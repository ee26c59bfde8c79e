//! Sparse voxel occupancy keyed by integer cell index.
//!
//! Cell `i` covers the half-open cube `[i * size, (i + 1) * size)` on every
//! axis. A missing key means the cell is empty. Storage is a `BTreeMap`, so
//! iteration always runs in ascending `(x, y, z)` order regardless of the
//! order cells were inserted in.

use std::collections::btree_map::{self, BTreeMap};

use crate::geometry::Aabb;
use crate::math::{Point3, Vector3};

/// Integer coordinates of a cubic cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellIndex {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl CellIndex {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// The cell containing `point` for cells of edge length `cell_size`.
    ///
    /// Uses `floor`, so points at negative coordinates land in negative cells
    /// rather than being pulled toward zero.
    pub fn containing(point: &Point3, cell_size: f64) -> Self {
        let p = point.coords / cell_size;
        Self::new(
            p.x.floor() as i32,
            p.y.floor() as i32,
            p.z.floor() as i32,
        )
    }

    pub fn min_corner(&self, cell_size: f64) -> Point3 {
        Point3::new(self.x as f64, self.y as f64, self.z as f64) * cell_size
    }

    pub fn center(&self, cell_size: f64) -> Point3 {
        self.min_corner(cell_size) + Vector3::from_element(0.5 * cell_size)
    }

    pub fn bounds(&self, cell_size: f64) -> Aabb {
        let min = self.min_corner(cell_size);
        Aabb::new(min, min + Vector3::from_element(cell_size))
    }
}

/// Sparse mapping from cell index to a payload.
#[derive(Clone, Debug, PartialEq)]
pub struct VoxelOccupancy<T> {
    cells: BTreeMap<CellIndex, T>,
}

impl<T> Default for VoxelOccupancy<T> {
    fn default() -> Self {
        Self {
            cells: BTreeMap::new(),
        }
    }
}

impl<T> VoxelOccupancy<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value` at `cell`, returning the previous payload if any.
    pub fn insert(&mut self, cell: CellIndex, value: T) -> Option<T> {
        self.cells.insert(cell, value)
    }

    pub fn get(&self, cell: &CellIndex) -> Option<&T> {
        self.cells.get(cell)
    }

    pub fn contains(&self, cell: &CellIndex) -> bool {
        self.cells.contains_key(cell)
    }

    pub fn remove(&mut self, cell: &CellIndex) -> Option<T> {
        self.cells.remove(cell)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, CellIndex, T> {
        self.cells.iter()
    }

    pub fn cells(&self) -> impl Iterator<Item = CellIndex> + '_ {
        self.cells.keys().copied()
    }
}

impl<T> FromIterator<(CellIndex, T)> for VoxelOccupancy<T> {
    fn from_iter<I: IntoIterator<Item = (CellIndex, T)>>(iter: I) -> Self {
        Self {
            cells: iter.into_iter().collect(),
        }
    }
}

impl<'a, T> IntoIterator for &'a VoxelOccupancy<T> {
    type Item = (&'a CellIndex, &'a T);
    type IntoIter = btree_map::Iter<'a, CellIndex, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.cells.iter()
    }
}
