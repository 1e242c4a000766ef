use crate::index::{IndexType, NodeIndex};
use crate::interval::Interval;
use crate::interval_tree::{Augmented, IntervalTree, MaxEndpoint};
use crate::node::Node;
use crate::tree::RbTree;

/// An iterator over the entries of a `RbTree`, sorted by key.
#[derive(Debug)]
pub struct Iter<'a, K, V, A, Ix> {
    /// Reference to the tree
    tree_ref: &'a RbTree<K, V, A, Ix>,
    /// Stack for iteration
    stack: Vec<NodeIndex<Ix>>,
}

impl<'a, K, V, A, Ix> Iter<'a, K, V, A, Ix>
where
    Ix: IndexType,
{
    pub(crate) fn new(tree_ref: &'a RbTree<K, V, A, Ix>) -> Self {
        let mut iter = Iter {
            tree_ref,
            stack: Vec::new(),
        };
        iter.push_left_link(tree_ref.root());
        iter
    }

    /// Pushes a link of nodes on the left to stack.
    fn push_left_link(&mut self, mut x: Option<NodeIndex<Ix>>) {
        while let Some(idx) = x {
            self.stack.push(idx);
            x = self.tree_ref.node_ref(idx, Node::left);
        }
    }
}

impl<'a, K, V, A, Ix> Iterator for Iter<'a, K, V, A, Ix>
where
    Ix: IndexType,
{
    type Item = (&'a K, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let x = self.stack.pop()?;
        let tree_ref = self.tree_ref;
        self.push_left_link(tree_ref.node_ref(x, Node::right));
        Some(tree_ref.node_ref(x, |xn| (xn.key(), xn.value())))
    }
}

impl<'a, K, V, A, Ix> IntoIterator for &'a RbTree<K, V, A, Ix>
where
    Ix: IndexType,
{
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V, A, Ix>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An iterator over the entries of an `IntervalTree`, sorted by interval.
#[derive(Debug)]
pub struct IntervalIter<'a, T, V, Ix> {
    inner: Iter<'a, Interval<T>, Augmented<T, V>, MaxEndpoint, Ix>,
}

impl<'a, T, V, Ix> IntervalIter<'a, T, V, Ix>
where
    Ix: IndexType,
{
    pub(crate) fn new(
        tree_ref: &'a RbTree<Interval<T>, Augmented<T, V>, MaxEndpoint, Ix>,
    ) -> Self {
        IntervalIter {
            inner: Iter::new(tree_ref),
        }
    }
}

impl<'a, T, V, Ix> Iterator for IntervalIter<'a, T, V, Ix>
where
    Ix: IndexType,
{
    type Item = (&'a Interval<T>, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner
            .next()
            .map(|(interval, value)| (interval, value.payload()))
    }
}

impl<'a, T, V, Ix> IntoIterator for &'a IntervalTree<T, V, Ix>
where
    T: Ord + Clone,
    Ix: IndexType,
{
    type Item = (&'a Interval<T>, &'a V);
    type IntoIter = IntervalIter<'a, T, V, Ix>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
