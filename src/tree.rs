use std::cmp::Ordering;
use std::marker::PhantomData;

use crate::augment::Augment;
use crate::index::{DefaultIx, IndexType, NodeIndex};
use crate::iter::Iter;
use crate::node::{Color, Dir, Node};

/// Outcome of [`RbTree::search`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Search<Ix = DefaultIx> {
    /// The tree has no root.
    Empty,
    /// A node with an equal key.
    Found(NodeIndex<Ix>),
    /// No equal key; a new node belongs in slot `dir` of `parent`.
    Vacant {
        /// Would-be parent of the new node
        parent: NodeIndex<Ix>,
        /// Free child slot of `parent`
        dir: Dir,
    },
}

/// A red-black tree whose rotations are reported to the augmentation `A`.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(bound(
        serialize = "K: serde::Serialize, V: serde::Serialize, Ix: serde::Serialize",
        deserialize = "K: serde::Deserialize<'de>, V: serde::Deserialize<'de>, Ix: serde::Deserialize<'de>"
    ))
)]
pub struct RbTree<K, V, A = (), Ix = DefaultIx> {
    /// Vector that stores nodes
    pub(crate) nodes: Vec<Node<K, V, Ix>>,
    /// Root of the tree
    pub(crate) root: Option<NodeIndex<Ix>>,
    #[cfg_attr(feature = "serde", serde(skip))]
    augment: PhantomData<fn() -> A>,
}

impl<K, V> RbTree<K, V> {
    /// Create an empty tree without augmentation.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(0)
    }
}

impl<K, V> Default for RbTree<K, V> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, A, Ix> RbTree<K, V, A, Ix>
where
    Ix: IndexType,
{
    /// Creates an empty tree with room for `capacity` nodes.
    #[inline]
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        RbTree {
            nodes: Vec::with_capacity(capacity),
            root: None,
            augment: PhantomData,
        }
    }

    /// Return the number of nodes in the tree.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Return `true` if the tree has no nodes.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Remove all nodes.
    #[inline]
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
    }

    #[inline]
    #[must_use]
    pub fn root(&self) -> Option<NodeIndex<Ix>> {
        self.root
    }

    /// Read-only view of a node.
    ///
    /// # Panics
    ///
    /// This method panics when `idx` was not handed out by this tree
    #[inline]
    pub fn node(&self, idx: NodeIndex<Ix>) -> &Node<K, V, Ix> {
        &self.nodes[idx.index()]
    }

    /// Number of nodes on the longest path from the root down to a leaf.
    #[must_use]
    pub fn height(&self) -> usize {
        let mut height = 0;
        let mut stack: Vec<_> = self.root.map(|root| (root, 1)).into_iter().collect();
        while let Some((x, depth)) = stack.pop() {
            height = height.max(depth);
            stack.extend(
                self.node_ref(x, |xn| xn.children)
                    .into_iter()
                    .flatten()
                    .map(|child| (child, depth + 1)),
            );
        }
        height
    }

    /// Get an iterator over the entries of the tree, sorted by key.
    #[inline]
    #[must_use]
    pub fn iter(&self) -> Iter<'_, K, V, A, Ix> {
        Iter::new(self)
    }

    /// Slot that `node` occupies under its parent.
    ///
    /// # Panics
    ///
    /// This method panics when `node` is the root
    pub(crate) fn child_dir(&self, node: NodeIndex<Ix>) -> Dir {
        let parent = self
            .node_ref(node, Node::parent)
            .expect("the root has no child direction");
        if self.node_ref(parent, Node::right) == Some(node) {
            Dir::Right
        } else {
            Dir::Left
        }
    }

    /// Append a detached node to the arena.
    fn push_node(&mut self, node: Node<K, V, Ix>) -> NodeIndex<Ix> {
        let idx = NodeIndex::new(self.nodes.len());
        assert!(
            idx < NodeIndex::end(),
            "the tree is at the maximum number of nodes for its index type"
        );
        self.nodes.push(node);
        idx
    }

    /// Link a fresh node below `parent`, or make it the root.
    fn attach(&mut self, z: NodeIndex<Ix>, parent: Option<NodeIndex<Ix>>, dir: Dir) {
        self.node_mut(z, Node::set_parent(parent));
        match parent {
            Some(p) => self.node_mut(p, Node::set_child(dir, Some(z))),
            None => self.root = Some(z),
        }
    }
}

impl<K, V, A, Ix> RbTree<K, V, A, Ix>
where
    K: Ord,
    Ix: IndexType,
{
    /// Walk down from the root following key comparisons.
    ///
    /// # Example
    /// ```rust
    /// use rb_augment_tree::{Dir, RbTree, Search};
    ///
    /// let mut tree = RbTree::new();
    /// assert_eq!(tree.search(&5), Search::Empty);
    /// let (five, _) = tree.insert(5, "five");
    /// assert_eq!(tree.search(&5), Search::Found(five));
    /// assert_eq!(
    ///     tree.search(&7),
    ///     Search::Vacant { parent: five, dir: Dir::Right }
    /// );
    /// ```
    pub fn search(&self, key: &K) -> Search<Ix> {
        let Some(mut x) = self.root else {
            return Search::Empty;
        };
        loop {
            let dir = match key.cmp(self.node_ref(x, Node::key)) {
                Ordering::Less => Dir::Left,
                Ordering::Equal => return Search::Found(x),
                Ordering::Greater => Dir::Right,
            };
            match self.node_ref(x, |xn| xn.child(dir)) {
                Some(child) => x = child,
                None => return Search::Vacant { parent: x, dir },
            }
        }
    }

    /// Return reference to the value corresponding to the key.
    #[inline]
    pub fn get(&self, key: &K) -> Option<&V> {
        match self.search(key) {
            Search::Found(x) => Some(self.node_ref(x, Node::value)),
            _ => None,
        }
    }

    /// Return a mutable reference to the value corresponding to the key.
    ///
    /// # Example
    /// ```rust
    /// use rb_augment_tree::RbTree;
    ///
    /// let mut tree = RbTree::new();
    /// tree.insert(3, 0);
    /// tree.get_mut(&3).map(|v| *v += 1);
    /// assert_eq!(tree.get(&3), Some(&1));
    /// ```
    #[inline]
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        match self.search(key) {
            Search::Found(x) => Some(self.node_mut(x, Node::value_mut)),
            _ => None,
        }
    }

    #[inline]
    pub fn contains_key(&self, key: &K) -> bool {
        matches!(self.search(key), Search::Found(_))
    }
}

impl<K, V, A, Ix> RbTree<K, V, A, Ix>
where
    K: Ord,
    A: Augment<K, V, Ix>,
    Ix: IndexType,
{
    /// Insert a key-value pair into the tree.
    ///
    /// Returns the node holding `key`, and the previous value if the key was
    /// already present. An update leaves the shape untouched and does not
    /// call the augmentation hook.
    ///
    /// # Panics
    ///
    /// This method panics when the tree is at the maximum number of nodes for its index
    ///
    /// # Example
    /// ```rust
    /// use rb_augment_tree::RbTree;
    ///
    /// let mut tree = RbTree::new();
    /// let (node, old) = tree.insert(1, "a");
    /// assert_eq!(old, None);
    /// assert_eq!(tree.insert(1, "b"), (node, Some("a")));
    /// assert_eq!(tree.len(), 1);
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> (NodeIndex<Ix>, Option<V>) {
        let (parent, dir) = match self.search(&key) {
            Search::Found(x) => {
                trace_log!(node = ?x, "insert: key present, value replaced");
                let old = self.node_mut(x, Node::set_value(value));
                return (x, Some(old));
            }
            Search::Empty => (None, Dir::Left),
            Search::Vacant { parent, dir } => (Some(parent), dir),
        };
        let z = self.push_node(Node::new(key, value));
        self.attach(z, parent, dir);
        trace_log!(node = ?z, parent = ?parent, dir = ?dir, "insert: new node");
        self.insert_fixup(z);
        (z, None)
    }

    /// Restore red-black tree properties after an insert.
    fn insert_fixup(&mut self, mut n: NodeIndex<Ix>) {
        loop {
            let Some(mut p) = self.node_ref(n, Node::parent) else {
                self.node_mut(n, Node::set_color(Color::Black));
                return;
            };
            if self.node_ref(p, Node::is_black) {
                return;
            }
            let Some(g) = self.node_ref(p, Node::parent) else {
                self.node_mut(p, Node::set_color(Color::Black));
                return;
            };

            let dir = self.child_dir(p);
            let uncle = self
                .node_ref(g, |gn| gn.child(dir.opposite()))
                .filter(|&u| self.node_ref(u, Node::is_red));
            if let Some(u) = uncle {
                trace_log!(grand_parent = ?g, "insert_fixup: red uncle, recolor");
                self.node_mut(p, Node::set_color(Color::Black));
                self.node_mut(u, Node::set_color(Color::Black));
                self.node_mut(g, Node::set_color(Color::Red));
                n = g;
                continue;
            }

            if self.node_ref(p, |pn| pn.child(dir.opposite())) == Some(n) {
                // `n` takes the place of `p`, which becomes its child
                p = self.rotate(p, dir);
            }
            self.rotate(g, dir.opposite());
            self.node_mut(p, Node::set_color(Color::Black));
            self.node_mut(g, Node::set_color(Color::Red));
            return;
        }
    }

    /// Binary tree rotation of `p` toward `dir`.
    ///
    /// The child of `p` on the opposite side takes its place and is returned.
    /// Reports `p` and its former parent to the augmentation.
    ///
    /// # Panics
    ///
    /// This method panics when `p` has no child opposite to `dir`
    pub(crate) fn rotate(&mut self, p: NodeIndex<Ix>, dir: Dir) -> NodeIndex<Ix> {
        let g = self.node_ref(p, Node::parent);
        let slot = g.map(|_| self.child_dir(p));
        let s = self
            .node_ref(p, |pn| pn.child(dir.opposite()))
            .expect("rotation needs a child opposite to its direction");
        let c = self.node_ref(s, |sn| sn.child(dir));

        self.node_mut(p, Node::set_child(dir.opposite(), c));
        if let Some(c) = c {
            self.node_mut(c, Node::set_parent(Some(p)));
        }
        self.node_mut(s, Node::set_child(dir, Some(p)));
        self.node_mut(p, Node::set_parent(Some(s)));
        self.node_mut(s, Node::set_parent(g));
        match g.zip(slot) {
            Some((g, slot)) => self.node_mut(g, Node::set_child(slot, Some(s))),
            None => self.root = Some(s),
        }

        trace_log!(node = ?p, lifted = ?s, dir = ?dir, "rotate");
        A::after_move(self, g, p);
        s
    }
}

// Convenient methods for reference or mutate a node
impl<K, V, A, Ix> RbTree<K, V, A, Ix>
where
    Ix: IndexType,
{
    pub(crate) fn node_ref<'a, F, R>(&'a self, node: NodeIndex<Ix>, op: F) -> R
    where
        R: 'a,
        F: FnOnce(&'a Node<K, V, Ix>) -> R,
    {
        op(&self.nodes[node.index()])
    }

    pub(crate) fn node_mut<'a, F, R>(&'a mut self, node: NodeIndex<Ix>, op: F) -> R
    where
        R: 'a,
        F: FnOnce(&'a mut Node<K, V, Ix>) -> R,
    {
        op(&mut self.nodes[node.index()])
    }
}
