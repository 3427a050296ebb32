pub mod handlers;
pub mod walker;

pub use walker::{build_descendants, build_tree, TreeNode};
