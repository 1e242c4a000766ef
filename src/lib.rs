//! `rb_augment_tree` is a red-black tree with an augmentation hook, plus an
//! interval tree built on top of it.
//!
//! [`RbTree`] supports search, insertion and in-place update. Every rotation
//! is reported through the [`Augment`] trait, so per-node statistics derived
//! from a subtree can be kept consistent while the tree rebalances.
//!
//! [`IntervalTree`] is the canonical user of the hook: each node stores the
//! largest upper endpoint of its subtree, which lets overlap queries skip
//! whole subtrees.
//!
//! Nodes live in a vector and refer to each other by index, so parent links
//! never own their target and the trees are `Send` whenever their contents are.
//!
//! Nodes cannot be removed. Mutation is single threaded; wrap the tree in a
//! lock to share it.
//!
//! # Example
//!
//! ```rust
//! use rb_augment_tree::{Interval, IntervalTree};
//!
//! let mut tree = IntervalTree::new();
//! let int = Interval::new(1, 2);
//! tree.insert(int.clone(), 123456);
//! assert_eq!(tree.get(&int), Some(&123456));
//! assert_eq!(tree.max_endpoint(), Some(&2));
//! ```
//!

#[macro_use]
mod trace;

mod augment;
mod dot;
mod index;
mod interval;
mod interval_tree;
mod iter;
mod node;
mod tree;

#[cfg(test)]
mod tests;

pub use augment::Augment;
pub use index::{DefaultIx, IndexType, NodeIndex};
pub use interval::Interval;
pub use interval_tree::{Augmented, IntervalTree, MaxEndpoint};
pub use iter::{IntervalIter, Iter};
pub use node::{Color, Dir, Node};
pub use tree::{RbTree, Search};
