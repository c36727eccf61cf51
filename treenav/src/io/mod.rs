//! Side-effecting helpers: container files, exports, config and subprocesses.

pub mod config;
pub mod container;
pub mod export;
pub mod shell;
