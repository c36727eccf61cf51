//! Interactive navigation of hierarchical array containers.
//!
//! A container is a tree of groups and datasets. The shell keeps a current
//! group and offers filesystem-like verbs over it (`ls`, `cd`, `print`, `rm`,
//! ...). The crate is layered:
//!
//! - **[`core`]**: name resolution, the `cd` transition function, listings and
//!   statistics. Pure logic over the [`tree::Tree`] trait.
//! - **[`io`]**: the file-backed container, exporters, config and subprocesses.
//! - **[`session`]** and **[`commands`]**: the verb implementations and the
//!   table that dispatches typed lines to them.
//! - **[`repl`]**: the line editor loop and `-c` scripts.

pub mod commands;
pub mod core;
pub mod error;
pub mod exit_codes;
pub mod interrupt;
pub mod io;
pub mod logging;
pub mod render;
pub mod repl;
pub mod session;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
pub mod tree;
