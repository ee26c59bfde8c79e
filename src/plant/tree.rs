//! Growth and adaptive subdivision of the branching structure.
//!
//! The tree starts as two synthetic anchors 0.1 mm apart (root below, shoot
//! above) plus one growth tip above the shoot anchor. Each step first
//! elongates every edge at constant speed, then splits edges that have
//! grown past the split threshold by inserting a midpoint node.

use log::{debug, trace};

use super::types::*;
use crate::config::GrowthSettings;
use crate::error::{degenerate, invalid_argument, Result};
use crate::math::{self, Point3, Vector3, TOLERANCE};

/// Arena owning every node of one plant.
#[derive(Clone, Debug)]
pub struct BranchTree {
    nodes: Vec<BranchNode>,
    root_anchor: NodeId,
    shoot_anchor: NodeId,
    settings: GrowthSettings,
}

impl BranchTree {
    /// Create a plant at `origin` with default growth settings.
    pub fn new(origin: Point3) -> Self {
        Self::build(origin, GrowthSettings::default())
    }

    /// Create a plant at `origin`: root anchor `anchor_offset` below, shoot
    /// anchor at `origin`, and one growth tip `initial_edge_length` above it.
    ///
    /// Fails if `settings` does not pass [`GrowthSettings::validate`].
    pub fn with_settings(origin: Point3, settings: GrowthSettings) -> Result<Self> {
        settings.validate()?;
        Ok(Self::build(origin, settings))
    }

    fn build(origin: Point3, settings: GrowthSettings) -> Self {
        let root_anchor = NodeId(0);
        let shoot_anchor = NodeId(1);
        let nodes = vec![
            BranchNode {
                position: origin - math::up() * settings.anchor_offset,
                radius: settings.node_radius,
                can_replicate: false,
                system: System::Root,
                parent: shoot_anchor,
                children: Vec::new(),
            },
            BranchNode {
                position: origin,
                radius: settings.node_radius,
                can_replicate: false,
                system: System::Shoot,
                parent: root_anchor,
                children: Vec::new(),
            },
        ];
        let tip_position = origin + math::up() * settings.initial_edge_length;

        let mut tree = Self {
            nodes,
            root_anchor,
            shoot_anchor,
            settings,
        };
        tree.push_child(shoot_anchor, tip_position, true);
        tree
    }

    // --- Access ---

    pub fn settings(&self) -> &GrowthSettings {
        &self.settings
    }

    /// Number of nodes, anchors included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: a tree holds at least its two anchors.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn root_anchor(&self) -> NodeId {
        self.root_anchor
    }

    pub fn shoot_anchor(&self) -> NodeId {
        self.shoot_anchor
    }

    /// First child of the shoot anchor: the start of the above-ground stem.
    pub fn growth_root(&self) -> Option<NodeId> {
        self.node(self.shoot_anchor).children.first().copied()
    }

    /// Panics if `id` does not belong to this tree.
    pub fn node(&self, id: NodeId) -> &BranchNode {
        &self.nodes[id.0]
    }

    pub fn get(&self, id: NodeId) -> Option<&BranchNode> {
        self.nodes.get(id.0)
    }

    pub fn parent(&self, id: NodeId) -> NodeId {
        self.node(id).parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    pub fn is_anchor(&self, id: NodeId) -> bool {
        id == self.root_anchor || id == self.shoot_anchor
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &BranchNode)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    /// Every `(parent, child)` pair, in arena order.
    pub fn edges(&self) -> Vec<(NodeId, NodeId)> {
        self.iter()
            .flat_map(|(id, node)| node.children.iter().map(move |&c| (id, c)))
            .collect()
    }

    pub fn edge_length(&self, parent: NodeId, child: NodeId) -> f64 {
        (self.node(child).position - self.node(parent).position).norm()
    }

    /// Unit vector from `id` toward its parent: the local growth axis.
    pub fn normal(&self, id: NodeId) -> Result<Vector3> {
        let node = self.checked(id)?;
        let toward_parent = self.node(node.parent).position - node.position;
        math::try_normalize(&toward_parent)
            .ok_or_else(|| degenerate(format!("node {id:?} coincides with its parent")))
    }

    // --- Structural edits ---

    /// Add a child of `parent` at an explicit position.
    pub fn attach(
        &mut self,
        parent: NodeId,
        position: Point3,
        can_replicate: bool,
    ) -> Result<NodeId> {
        self.checked(parent)?;
        Ok(self.push_child(parent, position, can_replicate))
    }

    /// Add a growth tip to `parent`, continuing away from the parent's own
    /// parent at `initial_edge_length`.
    pub fn sprout(&mut self, parent: NodeId) -> Result<NodeId> {
        let outward = -self.normal(parent)?;
        let position = self.node(parent).position + outward * self.settings.initial_edge_length;
        Ok(self.push_child(parent, position, true))
    }

    /// Insert a node at the midpoint of the edge `parent -> child`.
    ///
    /// The new node takes over `child`'s slot in `parent.children` and
    /// becomes `child`'s parent. All three handle writes happen inside this
    /// call, so no caller ever sees a half-rewired edge.
    pub fn subdivide(&mut self, parent: NodeId, child: NodeId) -> Result<NodeId> {
        self.checked(parent)?;
        self.checked(child)?;
        let slot = self
            .node(parent)
            .children
            .iter()
            .position(|&c| c == child)
            .ok_or_else(|| invalid_argument(format!("{child:?} is not a child of {parent:?}")))?;

        let p = self.node(parent);
        let c = self.node(child);
        let mid = BranchNode {
            position: nalgebra::center(&p.position, &c.position),
            radius: 0.5 * (p.radius + c.radius),
            can_replicate: true,
            system: p.system,
            parent,
            children: vec![child],
        };
        let mid_id = NodeId(self.nodes.len());
        self.nodes.push(mid);
        self.nodes[parent.0].children[slot] = mid_id;
        self.nodes[child.0].parent = mid_id;

        debug!("subdivided {parent:?} -> {child:?} at {mid_id:?}");
        Ok(mid_id)
    }

    /// Translate `id` and every descendant by `displacement`.
    pub fn translate(&mut self, id: NodeId, displacement: Vector3) -> Result<()> {
        self.checked(id)?;
        let mut stack = vec![id];
        while let Some(n) = stack.pop() {
            let node = &mut self.nodes[n.0];
            node.position += displacement;
            stack.extend_from_slice(&node.children);
        }
        Ok(())
    }

    // --- Simulation ---

    /// Advance the plant by `dt` seconds: grow every edge, then split the
    /// ones that crossed the split threshold.
    ///
    /// On error the tree is left untouched.
    pub fn step(&mut self, dt: f64) -> Result<()> {
        self.grow(dt)?;
        self.replicate();
        Ok(())
    }

    /// Elongate every edge shorter than `saturation_length` by `speed * dt`
    /// (capped at the saturation length), carrying the child's whole subtree
    /// outward along the edge. Returns the number of edges that grew.
    ///
    /// Each edge's displacement is derived from positions read before any
    /// write, so the result does not depend on the order edges are visited.
    pub fn grow(&mut self, dt: f64) -> Result<usize> {
        self.check_dt(dt)?;
        let s = &self.settings;

        // Own displacement of each node caused by the growth of its incoming edge.
        let mut own = vec![Vector3::zeros(); self.nodes.len()];
        let mut grown = 0;
        for (parent, child) in self.edges() {
            let delta = self.node(child).position - self.node(parent).position;
            let length = delta.norm();
            // Clamped edges land within rounding of the cap.
            if length >= s.saturation_length - TOLERANCE {
                continue;
            }
            if length <= TOLERANCE {
                return Err(degenerate(format!(
                    "edge {parent:?} -> {child:?} has zero length and no growth direction"
                )));
            }
            let new_length = (length + s.speed * dt).min(s.saturation_length);
            trace!("edge {parent:?} -> {child:?}: {length:.6} -> {new_length:.6}");
            own[child.0] = delta * (new_length / length - 1.0);
            grown += 1;
        }

        // A node moves by the sum of the displacements along its ancestry.
        let mut stack: Vec<(NodeId, Vector3)> = vec![
            (self.root_anchor, Vector3::zeros()),
            (self.shoot_anchor, Vector3::zeros()),
        ];
        while let Some((id, carried)) = stack.pop() {
            let total = carried + own[id.0];
            let node = &mut self.nodes[id.0];
            node.position += total;
            stack.extend(node.children.iter().map(|&c| (c, total)));
        }
        Ok(grown)
    }

    /// Split every edge longer than `split_threshold` whose child can
    /// replicate. Edges are collected before any split, so each qualifying
    /// edge is split exactly once per call and new halves are not revisited.
    /// Returns the number of subdivisions.
    pub fn replicate(&mut self) -> usize {
        let threshold = self.settings.split_threshold;
        let targets: Vec<(NodeId, NodeId)> = self
            .edges()
            .into_iter()
            .filter(|&(p, c)| self.node(c).can_replicate && self.edge_length(p, c) > threshold)
            .collect();

        let mut count = 0;
        for (parent, child) in targets {
            // Both handles come from `edges()`, so the slot exists.
            let split = self.subdivide(parent, child);
            debug_assert!(split.is_ok(), "{split:?}");
            if split.is_ok() {
                count += 1;
            }
        }
        if count > 0 {
            debug!("replicate: {count} edges split, {} nodes", self.nodes.len());
        }
        count
    }

    fn check_dt(&self, dt: f64) -> Result<()> {
        if !dt.is_finite() || dt < 0.0 {
            return Err(invalid_argument(format!(
                "time step must be finite and non-negative, got {dt}"
            )));
        }
        if dt > self.settings.max_step {
            return Err(invalid_argument(format!(
                "time step {dt} s exceeds the {} s limit growth is calibrated for",
                self.settings.max_step
            )));
        }
        Ok(())
    }

    fn checked(&self, id: NodeId) -> Result<&BranchNode> {
        self.get(id)
            .ok_or_else(|| invalid_argument(format!("{id:?} is not a node of this tree")))
    }

    fn push_child(&mut self, parent: NodeId, position: Point3, can_replicate: bool) -> NodeId {
        let id = NodeId(self.nodes.len());
        let p = &self.nodes[parent.0];
        let node = BranchNode {
            position,
            radius: self.settings.node_radius,
            can_replicate,
            system: p.system,
            parent,
            children: Vec::new(),
        };
        self.nodes.push(node);
        self.nodes[parent.0].children.push(id);
        id
    }

    #[cfg(test)]
    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut BranchNode {
        &mut self.nodes[id.0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dt_limit_is_inclusive() {
        let tree = BranchTree::new(Point3::origin());
        assert!(tree.check_dt(60.0).is_ok());
        assert!(tree.check_dt(60.5).is_err());
        assert!(tree.check_dt(-1.0).is_err());
        assert!(tree.check_dt(f64::NAN).is_err());
    }

    #[test]
    fn failed_grow_leaves_tree_untouched() {
        let mut tree = BranchTree::new(Point3::origin());
        let tip = tree.growth_root().unwrap();
        let before = tree.node(tip).position;
        // Zero-length edge hanging off the tip.
        tree.attach(tip, before, true).unwrap();
        assert!(tree.grow(60.0).is_err());
        assert_eq!(tree.node(tip).position, before);
    }
}
