use std::collections::{HashMap, HashSet};

use crate::index::{IndexType, NodeIndex};
use crate::node::Color;
use rand::{rngs::StdRng, Rng, SeedableRng};

use super::*;

struct IntervalGenerator {
    rng: StdRng,
    unique: HashSet<Interval<i32>>,
    limit: i32,
}

impl IntervalGenerator {
    fn new(seed: [u8; 32]) -> Self {
        const LIMIT: i32 = 1000;
        Self {
            rng: SeedableRng::from_seed(seed),
            unique: HashSet::new(),
            limit: LIMIT,
        }
    }

    fn next(&mut self) -> Interval<i32> {
        let low = self.rng.gen_range(0..self.limit - 1);
        let high = self.rng.gen_range(low..self.limit);
        Interval::new(low, high)
    }

    fn next_unique(&mut self) -> Interval<i32> {
        let mut interval = self.next();
        while self.unique.contains(&interval) {
            interval = self.next();
        }
        self.unique.insert(interval.clone());
        interval
    }

    fn next_with_range(&mut self, range: i32) -> Interval<i32> {
        let low = self.rng.gen_range(0..self.limit - 1);
        let high = self.rng.gen_range(low..self.limit.min(low + 1 + range));
        Interval::new(low, high)
    }
}

type Shape = Vec<(Color, Option<usize>, [Option<usize>; 2])>;

impl<K, V, A, Ix> RbTree<K, V, A, Ix>
where
    K: Ord,
    Ix: IndexType,
{
    /// 1. Every node is either red or black.
    /// 2. The root is black.
    /// 3. Every leaf (NIL) is black.
    /// 4. If a node is red, then both its children are black.
    /// 5. For each node, all simple paths from the node to descendant leaves contain the
    ///    same number of black nodes.
    ///
    /// Also checks parent links and in-order key ordering.
    pub(crate) fn check_rb_properties(&self) {
        if let Some(root) = self.root {
            assert!(self.node(root).is_black());
            assert_eq!(self.node(root).parent(), None);
        }
        self.check_links(self.root);
        self.check_children_color(self.root);
        let _ignore = self.check_black_height(self.root);
        let keys: Vec<_> = self.iter().map(|(k, _)| k).collect();
        assert_eq!(keys.len(), self.len());
        assert!(keys.windows(2).all(|w| w[0] < w[1]));
    }

    fn check_links(&self, x: Option<NodeIndex<Ix>>) {
        let Some(x) = x else {
            return;
        };
        for child in [self.node(x).left(), self.node(x).right()].into_iter().flatten() {
            assert_eq!(self.node(child).parent(), Some(x));
            self.check_links(Some(child));
        }
    }

    fn check_children_color(&self, x: Option<NodeIndex<Ix>>) {
        let Some(x) = x else {
            return;
        };
        let xn = self.node(x);
        self.check_children_color(xn.left());
        self.check_children_color(xn.right());
        if xn.is_red() {
            for child in [xn.left(), xn.right()].into_iter().flatten() {
                assert!(self.node(child).is_black());
            }
        }
    }

    fn check_black_height(&self, x: Option<NodeIndex<Ix>>) -> usize {
        let Some(x) = x else {
            return 0;
        };
        let lefth = self.check_black_height(self.node(x).left());
        let righth = self.check_black_height(self.node(x).right());
        assert_eq!(lefth, righth);
        if self.node(x).is_black() {
            return lefth + 1;
        }
        lefth
    }

    /// Color and links of every node, by arena position.
    pub(crate) fn shape(&self) -> Shape {
        self.nodes
            .iter()
            .map(|xn| {
                (
                    xn.color(),
                    xn.parent().map(NodeIndex::index),
                    [xn.left(), xn.right()].map(|c| c.map(NodeIndex::index)),
                )
            })
            .collect()
    }
}

impl<V> IntervalTree<i32, V> {
    /// Every node's maximum equals the largest `high` in its subtree.
    pub(crate) fn check_max(&self) {
        let _ignore = self.check_max_inner(self.tree.root());
    }

    fn check_max_inner(&self, x: Option<NodeIndex<u32>>) -> i32 {
        let Some(x) = x else {
            return i32::MIN;
        };
        let l_max = self.check_max_inner(self.tree.node(x).left());
        let r_max = self.check_max_inner(self.tree.node(x).right());
        let max = self.tree.node(x).key().high.max(l_max).max(r_max);
        assert_eq!(self.subtree_max(x), &max);
        max
    }
}

/// Install a subscriber filtered by `RUST_LOG`. Only the first call takes effect.
#[cfg(feature = "tracing")]
fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let _ignore = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[cfg(not(feature = "tracing"))]
fn init_tracing() {}

fn with_tree_and_generator<V>(test_fn: impl Fn(IntervalTree<i32, V>, IntervalGenerator)) {
    init_tracing();
    let seeds = vec![[0; 32], [1; 32], [2; 32]];
    for seed in seeds {
        let gen = IntervalGenerator::new(seed);
        let tree = IntervalTree::new();
        test_fn(tree, gen);
    }
}

fn height_bound(n: usize) -> f64 {
    2.0 * ((n + 1) as f64).log2()
}

#[test]
fn red_black_tree_properties_is_satisfied() {
    with_tree_and_generator(|mut tree, mut gen| {
        let intervals: Vec<_> = std::iter::repeat_with(|| gen.next_unique())
            .take(1000)
            .collect();
        for (n, i) in intervals.into_iter().enumerate() {
            let _ignore = tree.insert(i, ());
            tree.tree.check_rb_properties();
            assert!(tree.tree.height() as f64 <= height_bound(n + 1));
        }
    });
}

#[test]
fn check_max_is_ok() {
    with_tree_and_generator(|mut tree, mut gen| {
        let intervals: Vec<_> = std::iter::repeat_with(|| gen.next_unique())
            .take(1000)
            .collect();
        for i in intervals {
            let _ignore = tree.insert(i, ());
            tree.check_max();
        }
        assert_eq!(tree.len(), 1000);
    });
}

#[test]
fn repeated_intervals_update_in_place() {
    with_tree_and_generator(|mut tree, mut gen| {
        let mut expected = HashMap::new();
        for v in 0..2000 {
            let i = gen.next_with_range(3);
            let (node, old) = tree.insert(i.clone(), v);
            assert_eq!(old, expected.insert(i.clone(), v));
            assert_eq!(tree.as_tree().node(node).key(), &i);
            tree.check_max();
        }
        assert_eq!(tree.len(), expected.len());
        for (i, v) in &expected {
            assert_eq!(tree.get(i), Some(v));
        }
        tree.tree.check_rb_properties();
    });
}

#[test]
fn check_overlap_is_ok() {
    with_tree_and_generator(|mut tree, mut gen| {
        let intervals: Vec<_> = std::iter::repeat_with(|| gen.next_with_range(10))
            .take(100)
            .collect();
        for i in intervals.clone() {
            let _ignore = tree.insert(i, ());
        }
        let to_check: Vec<_> = std::iter::repeat_with(|| gen.next_with_range(10))
            .take(1000)
            .collect();
        let expects: Vec<_> = to_check
            .iter()
            .map(|ci| intervals.iter().any(|i| ci.overlap(i)))
            .collect();

        for (ci, expect) in to_check.into_iter().zip(expects.into_iter()) {
            assert_eq!(tree.overlaps(&ci), expect);
        }
    });
}

#[test]
fn find_all_overlap_is_ok() {
    with_tree_and_generator(|mut tree, mut gen| {
        let intervals: Vec<_> = std::iter::repeat_with(|| gen.next_unique())
            .take(1000)
            .collect();
        for i in intervals.clone() {
            let _ignore = tree.insert(i, ());
        }
        let to_find: Vec<_> = std::iter::repeat_with(|| gen.next()).take(1000).collect();

        let expects: Vec<Vec<_>> = to_find
            .iter()
            .map(|ti| intervals.iter().filter(|i| ti.overlap(i)).collect())
            .collect();

        for (ti, mut expect) in to_find.into_iter().zip(expects.into_iter()) {
            let mut result = tree.find_all_overlap(&ti);
            expect.sort_unstable();
            result.sort_unstable();
            assert_eq!(expect.len(), result.len());
            for (e, r) in expect.into_iter().zip(result.into_iter()) {
                assert_eq!(e, r.0);
            }
        }
    });
}

#[test]
fn iterate_through_tree_is_sorted() {
    with_tree_and_generator(|mut tree, mut gen| {
        let mut intervals: Vec<_> = std::iter::repeat_with(|| gen.next_unique())
            .enumerate()
            .take(1000)
            .collect();
        for (v, i) in intervals.clone() {
            let _ignore = tree.insert(i, v);
        }
        intervals.sort_unstable_by(|a, b| a.1.cmp(&b.1));

        assert_eq!(tree.iter().count(), intervals.len());
        for ((ei, ev), (v, i)) in tree.iter().zip(intervals.iter()) {
            assert_eq!(ei, i);
            assert_eq!(ev, v);
        }
    });
}

#[test]
fn sorted_insertions_stay_balanced() {
    let mut ascending = RbTree::new();
    let mut descending = RbTree::new();
    for k in 0..1024 {
        let _ignore = ascending.insert(k, ());
        let _ignore = descending.insert(1023 - k, ());
    }
    for tree in [&ascending, &descending] {
        tree.check_rb_properties();
        assert!(tree.height() as f64 <= height_bound(tree.len()));
    }
}

#[test]
fn nested_intervals_propagate_max_through_rotations() {
    // Every new interval starts later and ends later, so each insert both
    // rotates and raises the maximum along the right spine.
    let mut tree = IntervalTree::new();
    for k in 0..256 {
        let _ignore = tree.insert(Interval::new(k, 2 * k + 10), k);
        tree.check_max();
    }
    assert_eq!(tree.max_endpoint(), Some(&(2 * 255 + 10)));

    let mut shrinking = IntervalTree::new();
    for k in 0..256 {
        let _ignore = shrinking.insert(Interval::new(-k, 1000 - k), k);
        shrinking.check_max();
    }
    assert_eq!(shrinking.max_endpoint(), Some(&1000));
    shrinking.tree.check_rb_properties();
}

#[test]
fn interval_tree_clear_is_ok() {
    let mut tree = IntervalTree::new();
    let _ignore = tree.insert(Interval::new(1, 3), 1);
    let _ignore = tree.insert(Interval::new(2, 4), 2);
    let _ignore = tree.insert(Interval::new(6, 7), 3);
    assert_eq!(tree.len(), 3);
    tree.clear();
    assert_eq!(tree.len(), 0);
    assert!(tree.is_empty());
    assert_eq!(tree.max_endpoint(), None);
}

#[test]
fn narrow_index_type_addresses_nodes() {
    let mut tree = IntervalTree::<i32, (), u16>::with_capacity(16);
    for k in 0..16 {
        let _ignore = tree.insert(Interval::point(k), ());
    }
    assert_eq!(tree.max_endpoint(), Some(&15));
    tree.tree.check_rb_properties();
}

#[cfg(feature = "serde")]
#[test]
fn test_serde_interval_tree() {
    use serde_json::{json, Value};

    let mut tree = IntervalTree::<i32, i32>::new();
    let _ignore = tree.insert(Interval::new(1, 5), 10);
    let _ignore = tree.insert(Interval::new(3, 7), 20);
    let _ignore = tree.insert(Interval::new(2, 6), 15);

    let serialized = serde_json::to_string(&tree).unwrap();
    let expected = json!({
        "tree": {
            "nodes": [
                {
                    "key": { "low": 1, "high": 5 },
                    "value": { "max": 5, "payload": 10 },
                    "color": "Red",
                    "children": [null, null],
                    "parent": 2
                },
                {
                    "key": { "low": 3, "high": 7 },
                    "value": { "max": 7, "payload": 20 },
                    "color": "Red",
                    "children": [null, null],
                    "parent": 2
                },
                {
                    "key": { "low": 2, "high": 6 },
                    "value": { "max": 7, "payload": 15 },
                    "color": "Black",
                    "children": [0, 1],
                    "parent": null
                }
            ],
            "root": 2
        }
    });
    let actual: Value = serde_json::from_str(&serialized).unwrap();
    assert_eq!(expected, actual);

    let deserialized: IntervalTree<i32, i32> = serde_json::from_str(&serialized).unwrap();
    let dv: Vec<_> = deserialized.iter().collect();
    let ev: Vec<_> = tree.iter().collect();
    assert_eq!(ev, dv);
}

#[cfg(feature = "tracing")]
#[test]
fn structural_steps_are_traced() {
    use std::io;
    use std::sync::{Arc, Mutex};

    use tracing::Level;

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    let captured = Captured::default();
    let writer = captured.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(Level::TRACE)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();

    tracing::subscriber::with_default(subscriber, || {
        let mut tree = IntervalTree::new();
        for k in [1, 2, 3] {
            let _ignore = tree.insert(Interval::new(k, k + 10), ());
        }
        let _ignore = tree.insert(Interval::new(2, 12), ());
    });

    let logs = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
    assert_eq!(logs.matches("insert: new node").count(), 3);
    assert_eq!(logs.matches(" rotate").count(), 1);
    assert!(logs.contains("insert: key present, value replaced"));
    assert!(logs.contains("after_move: maxima changed"));
}
