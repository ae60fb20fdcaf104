/// Standard Unix exit codes for the linklog CLI.
///
/// Successful termination
pub const SUCCESS: i32 = 0;

/// Command line usage error or failed command
pub const USAGE: i32 = 64;
