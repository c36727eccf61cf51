//! Process exit codes.

/// Normal termination (`exit`, end-of-input, or a script that succeeded).
pub const OK: i32 = 0;
/// Startup failed (bad config, unreadable file) or a `-c` script reported an error.
pub const INVALID: i32 = 1;
