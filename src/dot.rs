//! Graphviz export of the tree shape, for debugging.
//!
//! Every node becomes `n<index>` with its label and color. Missing children are
//! drawn as invisible placeholders so left and right stay apart when rendered.

use std::fmt::Debug;
use std::io::{self, Write};

use crate::index::{IndexType, NodeIndex};
use crate::interval::Interval;
use crate::interval_tree::{Augmented, IntervalTree};
use crate::node::{Color, Dir, Node};
use crate::tree::RbTree;

type Label<'f, K, V, Ix> = &'f dyn Fn(&Node<K, V, Ix>) -> String;
type Annotate<'f, K, V, Ix> = &'f dyn Fn(&Node<K, V, Ix>) -> Option<String>;

impl<K, V, A, Ix> RbTree<K, V, A, Ix>
where
    Ix: IndexType,
{
    /// Write the tree as a DOT digraph, each node labelled `key = value`.
    ///
    /// # Errors
    ///
    /// Returns the first error reported by `w`. The tree is left untouched.
    ///
    /// # Example
    /// ```rust
    /// use rb_augment_tree::RbTree;
    ///
    /// let mut tree = RbTree::new();
    /// tree.insert(1, 'a');
    /// let mut out = Vec::new();
    /// tree.write_dot(&mut out).unwrap();
    /// let dot = String::from_utf8(out).unwrap();
    /// assert!(dot.contains(r#"n0 [label="1 = 'a'", color=black];"#));
    /// ```
    pub fn write_dot<W: Write>(&self, w: &mut W) -> io::Result<()>
    where
        K: Debug,
        V: Debug,
    {
        self.write_dot_with(w, |_| None)
    }

    /// Like [`RbTree::write_dot`], adding a second label line for every node
    /// for which `annotate` returns `Some`.
    ///
    /// # Errors
    ///
    /// Returns the first error reported by `w`.
    pub fn write_dot_with<W, F>(&self, w: &mut W, annotate: F) -> io::Result<()>
    where
        W: Write,
        F: Fn(&Node<K, V, Ix>) -> Option<String>,
        K: Debug,
        V: Debug,
    {
        self.write_dot_labelled(
            w,
            &|xn: &Node<K, V, Ix>| format!("{:?} = {:?}", xn.key(), xn.value()),
            &annotate,
        )
    }

    /// Write the tree to the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be created or written.
    #[cfg(feature = "graphviz")]
    pub fn draw(&self, path: impl AsRef<std::path::Path>) -> io::Result<()>
    where
        K: Debug,
        V: Debug,
    {
        let mut w = io::BufWriter::new(std::fs::File::create(path)?);
        self.write_dot(&mut w)?;
        w.flush()
    }

    pub(crate) fn write_dot_labelled<W: Write>(
        &self,
        w: &mut W,
        label: Label<'_, K, V, Ix>,
        annotate: Annotate<'_, K, V, Ix>,
    ) -> io::Result<()> {
        writeln!(w, "digraph {{")?;
        writeln!(w, "graph [ordering=out];")?;
        if let Some(root) = self.root() {
            self.write_dot_node(w, root, label, annotate)?;
        }
        writeln!(w, "}}")
    }

    fn write_dot_node<W: Write>(
        &self,
        w: &mut W,
        x: NodeIndex<Ix>,
        label: Label<'_, K, V, Ix>,
        annotate: Annotate<'_, K, V, Ix>,
    ) -> io::Result<()> {
        let xn = self.node(x);
        let id = x.index();
        let mut text = escape(&label(xn));
        if let Some(meta) = annotate(xn) {
            text.push_str("\\n");
            text.push_str(&escape(&meta));
        }
        let color = match xn.color() {
            Color::Red => "red",
            Color::Black => "black",
        };
        writeln!(w, "n{id} [label=\"{text}\", color={color}];")?;

        for dir in [Dir::Left, Dir::Right] {
            match xn.child(dir) {
                Some(child) => {
                    self.write_dot_node(w, child, label, annotate)?;
                    writeln!(w, "n{id} -> n{};", child.index())?;
                }
                None => {
                    let slot = dir.slot();
                    writeln!(w, "n{id}c{slot} [label=nil, style=invis];")?;
                    writeln!(w, "n{id} -> n{id}c{slot} [style=invis];")?;
                }
            }
        }
        Ok(())
    }
}

impl<T, V, Ix> IntervalTree<T, V, Ix>
where
    T: Ord + Clone + Debug,
    V: Debug,
    Ix: IndexType,
{
    /// Write the tree as a DOT digraph. Nodes are labelled
    /// `[low, high] = payload` and annotated with their subtree maximum.
    ///
    /// # Errors
    ///
    /// Returns the first error reported by `w`.
    pub fn write_dot<W: Write>(&self, w: &mut W) -> io::Result<()> {
        self.tree.write_dot_labelled(
            w,
            &|xn: &Node<Interval<T>, Augmented<T, V>, Ix>| {
                format!(
                    "[{:?}, {:?}] = {:?}",
                    xn.key().low,
                    xn.key().high,
                    xn.value().payload()
                )
            },
            &|xn: &Node<Interval<T>, Augmented<T, V>, Ix>| {
                Some(format!("max = {:?}", xn.value().max()))
            },
        )
    }

    /// Write the annotated tree to the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be created or written.
    #[cfg(feature = "graphviz")]
    pub fn draw(&self, path: impl AsRef<std::path::Path>) -> io::Result<()> {
        let mut w = io::BufWriter::new(std::fs::File::create(path)?);
        self.write_dot(&mut w)?;
        w.flush()
    }
}

/// Escape a label for a double-quoted DOT string.
fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            _ => out.push(c),
        }
    }
    out
}
