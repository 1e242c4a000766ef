//! Insert random intervals and print the tree as a Graphviz digraph.
//!
//! ```bash
//! cargo run --example random_intervals | dot -Tsvg > tree.svg
//! ```
//!
//! With `--features tracing`, `RUST_LOG` selects which tree events go to stderr.

use std::io::{self, Write};

use rand::{rngs::StdRng, Rng, SeedableRng};
use rb_augment_tree::{Interval, IntervalTree};

#[cfg(feature = "tracing")]
fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();
}

#[cfg(not(feature = "tracing"))]
fn init_tracing() {}

fn main() -> io::Result<()> {
    init_tracing();
    let mut rng = StdRng::seed_from_u64(42);
    let mut tree = IntervalTree::<u32, ()>::new();
    for _ in 0..100 {
        let high = rng.gen_range(0..500);
        let low = rng.gen_range(0..=high);
        tree.insert(Interval::new(low, high), ());
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    tree.write_dot(&mut out)?;
    out.flush()
}
