//! Feature-gated logging macros.
//!
//! With the `tracing` feature these forward to the `tracing` crate, otherwise
//! they expand to nothing. The property tests install a `tracing-subscriber`
//! filtered by `RUST_LOG`:
//!
//! ```bash
//! RUST_LOG=rb_augment_tree=trace cargo test --features tracing
//! ```

#![allow(unused_macros)]

/// Trace-level event, one per structural step.
#[cfg(feature = "tracing")]
macro_rules! trace_log {
    ($($arg:tt)*) => {
        tracing::trace!($($arg)*)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_log {
    ($($arg:tt)*) => {};
}

/// Debug-level event.
#[cfg(feature = "tracing")]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        tracing::debug!($($arg)*)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! debug_log {
    ($($arg:tt)*) => {};
}
