//! Rasterization of the branching structure into occupied voxel cells.
//!
//! Every edge is walked from parent to child in steps of one cell edge
//! length; each sample marks the cell containing it, and the child's own
//! cell is always marked so both endpoints are covered.

use log::debug;

use crate::error::{invalid_argument, Result};
use crate::math::{Point3, TOLERANCE};
use crate::plant::{BranchTree, NodeId};
use crate::voxel::{CellIndex, VoxelOccupancy};

/// Voxel edge length used by [`rasterize`] (1 mm).
pub const DEFAULT_CELL_SIZE: f64 = 0.001;

/// Rasterize `tree` with 1 mm cells.
pub fn rasterize(tree: &BranchTree) -> VoxelOccupancy<bool> {
    rasterize_tree(tree, DEFAULT_CELL_SIZE)
}

/// Rasterize `tree` with cells of edge length `cell_size` (meters).
pub fn rasterize_with_cell_size(
    tree: &BranchTree,
    cell_size: f64,
) -> Result<VoxelOccupancy<bool>> {
    if !(cell_size.is_finite() && cell_size > 0.0) {
        return Err(invalid_argument(format!("cell size must be positive, got {cell_size}")));
    }
    Ok(rasterize_tree(tree, cell_size))
}

/// Depth-first walk from the shoot anchor. The anchor-to-tip edge is
/// included; the root anchor's subtree is not rasterized.
fn rasterize_tree(tree: &BranchTree, cell_size: f64) -> VoxelOccupancy<bool> {
    let mut result = VoxelOccupancy::new();
    let mut stack: Vec<NodeId> = vec![tree.shoot_anchor()];
    let mut edges = 0usize;

    while let Some(id) = stack.pop() {
        let from = tree.node(id).position;
        for &child in tree.children(id) {
            rasterize_edge(from, tree.node(child).position, cell_size, &mut result);
            stack.push(child);
            edges += 1;
        }
    }

    debug!("rasterized {edges} edges into {} cells", result.len());
    result
}

fn rasterize_edge(a: Point3, b: Point3, cell_size: f64, result: &mut VoxelOccupancy<bool>) {
    let edge = b - a;
    let length = edge.norm();
    if length <= TOLERANCE {
        result.insert(CellIndex::containing(&a, cell_size), true);
        return;
    }

    let dir = edge / length;
    let samples = (length / cell_size).floor() as usize;
    for i in 0..=samples {
        let p = a + dir * (i as f64 * cell_size);
        result.insert(CellIndex::containing(&p, cell_size), true);
    }
    result.insert(CellIndex::containing(&b, cell_size), true);
}
