//! Process exit codes

/// Successful termination (also used for help/version output)
pub const OK: i32 = 0;

/// Any failure: bad arguments, unreachable engine, failed engine call
pub const FAILURE: i32 = 1;
