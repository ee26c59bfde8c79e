//! Arena-based branching structure of a plant.
//!
//! Every node lives in the `BranchTree` arena and refers to its parent and
//! children through `NodeId` handles, so structural edits never leave a
//! dangling reference behind.

pub mod tree;
pub mod types;
pub mod validate;

pub use tree::BranchTree;
pub use types::*;
pub use validate::{validate_tree, ValidationResult};
