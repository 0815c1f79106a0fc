//! Persistent bounding-volume hierarchy
//!
//! The hierarchy produced by the builder, its node arena, the
//! recursion-free pre-order iterator and the construction algorithm.

mod builder;
mod node;
mod pre_order;

pub use builder::{Statistics, TreeBuilder};
pub use node::{Hierarchy, Node, NodeId};
pub use pre_order::PreOrderIterator;
