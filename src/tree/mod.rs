pub mod builder;
pub mod node;

pub use builder::PathTreeBuilder;
pub use node::{Node, NodeId, NodeKind, NodeSnapshot, Tree};
