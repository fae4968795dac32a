//! Process exit codes. These are part of the CLI contract.

pub const SUCCESS: i32 = 0;
pub const TRANSFORM_FAILED: i32 = 1; // Stylesheet could not be parsed or resolved
pub const CONFIG_ERROR: i32 = 2; // Bad config, bad usage or I/O failure
