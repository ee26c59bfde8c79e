//! Structural validation of a branch tree.
//!
//! Checks the invariants every edit must preserve:
//! - The two anchors name each other as parent and never replicate
//! - Every child slot points at a node whose parent handle points back
//! - Every non-anchor node sits in exactly one child slot
//! - Anchors never appear as anyone's child

use super::tree::BranchTree;
use super::types::*;

/// Result of tree validation.
#[derive(Debug)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<String>,
}

/// Validate the parent/child bookkeeping of `tree`.
pub fn validate_tree(tree: &BranchTree) -> ValidationResult {
    let mut errors = Vec::new();
    let root = tree.root_anchor();
    let shoot = tree.shoot_anchor();

    // 1. Anchors
    if tree.parent(root) != shoot || tree.parent(shoot) != root {
        errors.push(format!(
            "Anchors are not mutual parents: {root:?} -> {:?}, {shoot:?} -> {:?}",
            tree.parent(root),
            tree.parent(shoot)
        ));
    }
    for anchor in [root, shoot] {
        if tree.node(anchor).can_replicate {
            errors.push(format!("Anchor {anchor:?} is marked as able to replicate"));
        }
    }

    // 2. Child slots agree with parent handles
    let mut slot_count = vec![0usize; tree.len()];
    for (id, node) in tree.iter() {
        for &child in &node.children {
            let Some(c) = tree.get(child) else {
                errors.push(format!("Node {id:?} lists unknown child {child:?}"));
                continue;
            };
            slot_count[child.0] += 1;
            if tree.is_anchor(child) {
                errors.push(format!("Anchor {child:?} is listed as a child of {id:?}"));
            }
            if c.parent != id {
                errors.push(format!(
                    "Node {child:?} is a child of {id:?} but its parent handle is {:?}",
                    c.parent
                ));
            }
        }
    }

    // 3. Every other node is owned exactly once
    for (id, _) in tree.iter() {
        if tree.is_anchor(id) {
            continue;
        }
        match slot_count[id.0] {
            1 => {}
            0 => errors.push(format!("Node {id:?} is not a child of any node")),
            n => errors.push(format!("Node {id:?} appears in {n} child slots (expected 1)")),
        }
    }

    ValidationResult {
        valid: errors.is_empty(),
        errors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Point3;

    #[test]
    fn fresh_tree_is_valid() {
        let tree = BranchTree::new(Point3::origin());
        let result = validate_tree(&tree);
        assert!(result.valid, "{:?}", result.errors);
    }

    #[test]
    fn stale_parent_handle_is_reported() {
        let mut tree = BranchTree::new(Point3::origin());
        let tip = tree.growth_root().unwrap();
        let root = tree.root_anchor();
        tree.node_mut(tip).parent = root;
        let result = validate_tree(&tree);
        assert!(!result.valid);
        assert_eq!(result.errors.len(), 1);
    }

    #[test]
    fn replicating_anchor_is_reported() {
        let mut tree = BranchTree::new(Point3::origin());
        let anchor = tree.root_anchor();
        tree.node_mut(anchor).can_replicate = true;
        assert!(!validate_tree(&tree).valid);
    }
}
