//! Exit codes for fleetmon.

/// Exit code for success (clean interrupt included)
pub const EXIT_SUCCESS: i32 = 0;

/// Exit code for general errors (bad config, bad flags)
pub const EXIT_GENERAL_ERROR: i32 = 1;

/// Exit code when the store is unreachable, at startup or after the
/// consecutive read-failure limit trips mid-loop
pub const EXIT_STORE_UNAVAILABLE: i32 = 70;
