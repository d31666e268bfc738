//! Write trigger
//!
//! One flag per build deciding whether resolved configurations validate
//! against their lock files or overwrite them. It starts unset and can be set
//! exactly once.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// How a post-resolution hook treats its snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResolutionMode {
    /// Compare against the existing lock file
    #[default]
    Validate,
    /// Replace the lock file with the snapshot
    Write,
}

impl fmt::Display for ResolutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validate => write!(f, "validate"),
            Self::Write => write!(f, "write"),
        }
    }
}

/// Shared, monotonic "write locks" flag
///
/// Clones share the same flag.
#[derive(Debug, Clone, Default)]
pub struct WriteTrigger {
    flag: Arc<AtomicBool>,
}

impl WriteTrigger {
    /// Create an unset trigger
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a trigger already reflecting `mode`
    pub fn with_mode(mode: ResolutionMode) -> Self {
        Self {
            flag: Arc::new(AtomicBool::new(mode == ResolutionMode::Write)),
        }
    }

    /// Request lock writing
    ///
    /// Returns `true` only for the call that actually set the flag.
    pub fn request_write(&self) -> bool {
        self.flag
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Whether lock writing was requested
    pub fn should_write(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }

    /// Current mode
    pub fn mode(&self) -> ResolutionMode {
        if self.should_write() {
            ResolutionMode::Write
        } else {
            ResolutionMode::Validate
        }
    }
}
