use crate::index::{IndexType, NodeIndex};

/// Child slot of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Dir {
    /// Left child, keys ordered before the node
    Left = 0,
    /// Right child, keys ordered after the node
    Right = 1,
}

impl Dir {
    /// The other slot.
    #[inline]
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Dir::Left => Dir::Right,
            Dir::Right => Dir::Left,
        }
    }

    #[inline]
    pub(crate) fn slot(self) -> usize {
        self as usize
    }
}

/// The color of the node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Color {
    /// Red node
    Red,
    /// Black node
    Black,
}

/// Node of the red-black tree.
///
/// Children are owned by position in the tree's arena; the parent link is a
/// plain back-reference and never keeps a node alive.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Node<K, V, Ix> {
    /// Key of the node, never modified after insertion
    pub(crate) key: K,
    /// Value of the node
    pub(crate) value: V,
    /// Color of the node
    pub(crate) color: Color,
    /// Left and right children
    pub(crate) children: [Option<NodeIndex<Ix>>; 2],
    /// Parent, absent for the root
    pub(crate) parent: Option<NodeIndex<Ix>>,
}

impl<K, V, Ix> Node<K, V, Ix>
where
    Ix: IndexType,
{
    /// New detached red node.
    pub(crate) fn new(key: K, value: V) -> Self {
        Node {
            key,
            value,
            color: Color::Red,
            children: [None, None],
            parent: None,
        }
    }

    #[inline]
    pub fn key(&self) -> &K {
        &self.key
    }

    #[inline]
    pub fn value(&self) -> &V {
        &self.value
    }

    #[inline]
    pub fn color(&self) -> Color {
        self.color
    }

    #[inline]
    pub fn is_red(&self) -> bool {
        matches!(self.color, Color::Red)
    }

    #[inline]
    pub fn is_black(&self) -> bool {
        matches!(self.color, Color::Black)
    }

    #[inline]
    pub fn child(&self, dir: Dir) -> Option<NodeIndex<Ix>> {
        self.children[dir.slot()]
    }

    #[inline]
    pub fn left(&self) -> Option<NodeIndex<Ix>> {
        self.child(Dir::Left)
    }

    #[inline]
    pub fn right(&self) -> Option<NodeIndex<Ix>> {
        self.child(Dir::Right)
    }

    #[inline]
    pub fn parent(&self) -> Option<NodeIndex<Ix>> {
        self.parent
    }

    pub(crate) fn value_mut(&mut self) -> &mut V {
        &mut self.value
    }

    pub(crate) fn set_value(value: V) -> impl FnOnce(&mut Node<K, V, Ix>) -> V {
        move |node: &mut Node<K, V, Ix>| std::mem::replace(&mut node.value, value)
    }

    pub(crate) fn set_color(color: Color) -> impl FnOnce(&mut Node<K, V, Ix>) {
        move |node: &mut Node<K, V, Ix>| {
            node.color = color;
        }
    }

    pub(crate) fn set_child(
        dir: Dir,
        child: Option<NodeIndex<Ix>>,
    ) -> impl FnOnce(&mut Node<K, V, Ix>) {
        move |node: &mut Node<K, V, Ix>| {
            node.children[dir.slot()] = child;
        }
    }

    pub(crate) fn set_parent(parent: Option<NodeIndex<Ix>>) -> impl FnOnce(&mut Node<K, V, Ix>) {
        move |node: &mut Node<K, V, Ix>| {
            node.parent = parent;
        }
    }
}
