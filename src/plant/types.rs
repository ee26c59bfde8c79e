//! Node type and typed index handle.

use crate::math::Point3;

/// Handle of a node inside its `BranchTree` arena. Cheap to copy and compare.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// Which half of the plant a node belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum System {
    /// Above ground.
    Shoot,
    /// Below ground.
    Root,
}

/// A point of the plant's branching structure.
#[derive(Clone, Debug)]
pub struct BranchNode {
    /// Position in meters.
    pub position: Point3,
    /// Stem radius in meters.
    pub radius: f64,
    /// Growth tips may have their incoming edge split; the two anchors may not.
    pub can_replicate: bool,
    pub system: System,
    /// Back-reference only. The two anchors name each other here.
    pub parent: NodeId,
    pub children: Vec<NodeId>,
}
