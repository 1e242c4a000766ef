//! Hook through which derived per-node data is kept in sync with the tree shape.

use crate::index::{IndexType, NodeIndex};
use crate::tree::RbTree;

/// Recomputes derived per-node statistics after a structural move.
///
/// [`RbTree`] calls [`Augment::after_move`] once for every rotation, after all
/// links have been rewired. `moved` is the node whose parent changed and
/// `old_parent` is the parent it had before (`None` if it was the root).
///
/// A rotation can leave two ancestor chains stale: the one above `old_parent`
/// and the one above `moved`. An implementation must repair both and keep
/// going until no statistic changes any more.
///
/// Values may be rewritten freely through the tree; keys and links must not be
/// touched.
pub trait Augment<K, V, Ix>: Sized
where
    Ix: IndexType,
{
    fn after_move(
        tree: &mut RbTree<K, V, Self, Ix>,
        old_parent: Option<NodeIndex<Ix>>,
        moved: NodeIndex<Ix>,
    );
}

/// No augmentation: rotations are not observed.
impl<K, V, Ix> Augment<K, V, Ix> for ()
where
    Ix: IndexType,
{
    #[inline]
    fn after_move(
        _tree: &mut RbTree<K, V, Self, Ix>,
        _old_parent: Option<NodeIndex<Ix>>,
        _moved: NodeIndex<Ix>,
    ) {
    }
}
