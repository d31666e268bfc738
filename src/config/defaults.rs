//! Default configuration values

/// Lock directory, relative to the project directory
pub const LOCK_DIR: &str = "dependency-locks";

/// Suffix of every lock file
pub const LOCK_FILE_SUFFIX: &str = ".lockfile";

/// Tool name written into the lock file header
pub const TOOL_NAME: &str = "deplock";

/// Reason attached to every injected constraint
pub const CONSTRAINT_REASON: &str = "dependency-locking in place";

/// Optional per-project settings file
pub const SETTINGS_FILE: &str = "deplock.toml";

/// Environment variable overriding the lock directory
pub const ENV_LOCK_DIR: &str = "DEPLOCK_LOCK_DIR";

/// Minimum proptest iterations
pub const MIN_PROPTEST_ITERATIONS: u32 = 100;
