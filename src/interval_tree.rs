use std::collections::VecDeque;

use crate::augment::Augment;
use crate::index::{DefaultIx, IndexType, NodeIndex};
use crate::interval::Interval;
use crate::iter::IntervalIter;
use crate::node::Node;
use crate::tree::{RbTree, Search};

/// Value stored in the engine for every interval: the payload plus the
/// largest `high` found in the node's subtree.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Augmented<T, V> {
    /// Maximum upper endpoint across the subtree
    pub(crate) max: T,
    /// User value
    pub(crate) payload: V,
}

impl<T, V> Augmented<T, V> {
    #[inline]
    pub fn max(&self) -> &T {
        &self.max
    }

    #[inline]
    pub fn payload(&self) -> &V {
        &self.payload
    }
}

/// Augmentation keeping [`Augmented::max`] consistent across rotations.
#[derive(Debug, Clone, Copy, Default)]
pub struct MaxEndpoint;

type Engine<T, V, Ix> = RbTree<Interval<T>, Augmented<T, V>, MaxEndpoint, Ix>;

impl<T, V, Ix> Augment<Interval<T>, Augmented<T, V>, Ix> for MaxEndpoint
where
    T: Ord + Clone,
    Ix: IndexType,
{
    fn after_move(
        tree: &mut Engine<T, V, Ix>,
        old_parent: Option<NodeIndex<Ix>>,
        moved: NodeIndex<Ix>,
    ) {
        // `moved` lost a subtree and its new parent gained one; the old
        // parent now sees a different child.
        loop {
            let lifted = tree.node_ref(moved, Node::parent);
            let changed = recompute_augmentation(tree, Some(moved))
                | recompute_augmentation(tree, lifted)
                | recompute_augmentation(tree, old_parent);
            if !changed {
                break;
            }
            debug_log!(node = ?moved, old_parent = ?old_parent, "after_move: maxima changed, repeating");
        }
    }
}

/// Recalculate the subtree maximum of `node` from its own interval and its
/// children, walking up while the stored value changes.
///
/// Returns whether `node` itself was updated.
fn recompute_augmentation<T, V, Ix>(
    tree: &mut Engine<T, V, Ix>,
    node: Option<NodeIndex<Ix>>,
) -> bool
where
    T: Ord + Clone,
    Ix: IndexType,
{
    let Some(mut x) = node else {
        return false;
    };
    let mut changed = false;
    loop {
        let xn = tree.node(x);
        let mut candidate = &xn.key.high;
        for child in xn.children.iter().flatten() {
            let child_max = &tree.node(*child).value.max;
            if child_max > candidate {
                candidate = child_max;
            }
        }
        if *candidate == xn.value.max {
            return changed;
        }
        let candidate = candidate.clone();
        let parent = xn.parent;
        tree.node_mut(x, |xn| xn.value.max = candidate);
        changed = true;
        match parent {
            Some(p) => x = p,
            None => return changed,
        }
    }
}

/// An interval-value map, which supports overlap queries on a dynamic set of
/// intervals.
///
/// # Example
/// ```rust
/// use rb_augment_tree::{Interval, IntervalTree};
///
/// let mut tree = IntervalTree::new();
/// tree.insert(Interval::new(1, 3), "a");
/// tree.insert(Interval::new(5, 9), "b");
/// assert_eq!(tree.max_endpoint(), Some(&9));
/// assert!(tree.overlaps(&Interval::new(3, 4)));
/// assert!(!tree.overlaps(&Interval::new(4, 4)));
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(bound(
        serialize = "T: serde::Serialize, V: serde::Serialize, Ix: serde::Serialize",
        deserialize = "T: serde::Deserialize<'de>, V: serde::Deserialize<'de>, Ix: serde::Deserialize<'de>"
    ))
)]
pub struct IntervalTree<T, V, Ix = DefaultIx> {
    pub(crate) tree: Engine<T, V, Ix>,
}

impl<T, V> IntervalTree<T, V>
where
    T: Ord + Clone,
{
    /// Create an empty `IntervalTree`
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(0)
    }
}

impl<T, V> Default for IntervalTree<T, V>
where
    T: Ord + Clone,
{
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T, V, Ix> IntervalTree<T, V, Ix>
where
    T: Ord + Clone,
    Ix: IndexType,
{
    /// Creates a new `IntervalTree` with estimated capacity.
    #[inline]
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        IntervalTree {
            tree: RbTree::with_capacity(capacity),
        }
    }

    /// Insert an interval-payload pair into the tree.
    ///
    /// Returns the node holding `interval`, and the previous payload if the
    /// interval was already present.
    ///
    /// # Panics
    ///
    /// This method panics when the tree is at the maximum number of nodes for its index
    ///
    /// # Example
    /// ```rust
    /// use rb_augment_tree::{Interval, IntervalTree};
    ///
    /// let mut tree = IntervalTree::new();
    /// assert_eq!(tree.insert(Interval::new(1, 3), 1).1, None);
    /// assert_eq!(tree.insert(Interval::new(1, 3), 2).1, Some(1));
    /// assert_eq!(tree.get(&Interval::new(1, 3)), Some(&2));
    /// ```
    pub fn insert(&mut self, interval: Interval<T>, payload: V) -> (NodeIndex<Ix>, Option<V>) {
        let max = interval.high.clone();
        let (node, replaced) = self.tree.insert(interval, Augmented { max, payload });
        let replaced = replaced.map(|old| {
            // same subtree as before the update
            self.tree.node_mut(node, |xn| xn.value.max = old.max);
            old.payload
        });
        let parent = self.tree.node_ref(node, Node::parent);
        let _ignore = recompute_augmentation(&mut self.tree, parent);
        (node, replaced)
    }

    /// Return reference to the payload stored for the interval.
    #[inline]
    pub fn get(&self, interval: &Interval<T>) -> Option<&V> {
        self.tree.get(interval).map(Augmented::payload)
    }

    /// Return a mutable reference to the payload stored for the interval.
    ///
    /// # Example
    /// ```rust
    /// use rb_augment_tree::{Interval, IntervalTree};
    ///
    /// let mut tree = IntervalTree::new();
    /// tree.insert(Interval::new(3, 5), 0);
    /// tree.get_mut(&Interval::new(3, 5)).map(|v| *v += 1);
    /// assert_eq!(tree.get(&Interval::new(3, 5)), Some(&1));
    /// ```
    #[inline]
    pub fn get_mut(&mut self, interval: &Interval<T>) -> Option<&mut V> {
        self.tree.get_mut(interval).map(|value| &mut value.payload)
    }

    /// Largest upper endpoint of any stored interval.
    #[inline]
    pub fn max_endpoint(&self) -> Option<&T> {
        self.tree.root().map(|root| self.subtree_max(root))
    }

    /// Largest upper endpoint within the subtree rooted at `node`.
    #[inline]
    pub fn subtree_max(&self, node: NodeIndex<Ix>) -> &T {
        &self.tree.node(node).value.max
    }

    /// Check if an interval in the tree overlaps with the given interval.
    ///
    /// # Example
    /// ```rust
    /// use rb_augment_tree::{Interval, IntervalTree};
    ///
    /// let mut tree = IntervalTree::new();
    /// tree.insert(Interval::new(1, 3), ());
    /// tree.insert(Interval::new(6, 7), ());
    /// tree.insert(Interval::new(9, 11), ());
    /// assert!(tree.overlaps(&Interval::new(2, 5)));
    /// assert!(tree.overlaps(&Interval::new(7, 8)));
    /// assert!(!tree.overlaps(&Interval::new(4, 5)));
    /// assert!(!tree.overlaps(&Interval::new(12, 23)));
    /// ```
    pub fn overlaps(&self, interval: &Interval<T>) -> bool {
        let mut x = self.tree.root();
        while let Some(idx) = x {
            let xn = self.tree.node(idx);
            if xn.key.overlap(interval) {
                return true;
            }
            x = match xn.left() {
                Some(left) if self.subtree_max(left) >= &interval.low => Some(left),
                _ => xn.right(),
            };
        }
        false
    }

    /// Find all intervals in the tree that overlap with the given interval.
    ///
    /// The result is unordered because of breadth-first search to save stack size
    ///
    /// # Example
    /// ```rust
    /// use rb_augment_tree::{Interval, IntervalTree};
    ///
    /// let mut tree = IntervalTree::new();
    /// tree.insert(Interval::new(1, 3), ());
    /// tree.insert(Interval::new(2, 4), ());
    /// tree.insert(Interval::new(6, 7), ());
    /// tree.insert(Interval::new(8, 11), ());
    /// assert_eq!(tree.find_all_overlap(&Interval::new(3, 7)).len(), 3);
    /// ```
    pub fn find_all_overlap(&self, interval: &Interval<T>) -> Vec<(&Interval<T>, &V)> {
        let mut list = Vec::new();
        let mut queue: VecDeque<_> = self.tree.root().into_iter().collect();
        while let Some(p) = queue.pop_front() {
            let pn = self.tree.node(p);
            if pn.key.overlap(interval) {
                list.push((&pn.key, &pn.value.payload));
            }
            if let Some(left) = pn.left() {
                if self.subtree_max(left) >= &interval.low {
                    queue.push_back(left);
                }
            }
            if let Some(right) = pn.right() {
                if pn.key.low <= interval.high && self.subtree_max(right) >= &interval.low {
                    queue.push_back(right);
                }
            }
        }
        list
    }

    /// Get an iterator over the entries of the tree, sorted by interval.
    #[inline]
    #[must_use]
    pub fn iter(&self) -> IntervalIter<'_, T, V, Ix> {
        IntervalIter::new(&self.tree)
    }

    #[inline]
    pub fn contains(&self, interval: &Interval<T>) -> bool {
        matches!(self.tree.search(interval), Search::Found(_))
    }

    /// Read-only access to the underlying red-black tree.
    #[inline]
    pub fn as_tree(&self) -> &RbTree<Interval<T>, Augmented<T, V>, MaxEndpoint, Ix> {
        &self.tree
    }

    /// Return the number of intervals in the tree.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    /// Return `true` if the tree contains no intervals.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Remove all intervals from the tree
    #[inline]
    pub fn clear(&mut self) {
        self.tree.clear();
    }
}
