//! Deterministic logic behind the shell verbs.
//!
//! Core modules perform no I/O of their own. They see the container only
//! through the [`Tree`](crate::tree::Tree) trait and return plain values, so
//! every transition can be tested against an in-memory tree.

pub mod listing;
pub mod navigation;
pub mod resolver;
pub mod stats;
