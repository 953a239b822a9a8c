//! Exit code constants for the CLI application.

/// Success exit code, also used when some decision points were skipped.
pub const SUCCESS: i32 = 0;

/// Fatal error: bad arguments, unreadable input, broken store or config.
pub const ERROR: i32 = 2;
