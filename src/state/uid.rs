//! Session identifier generation.

use std::sync::atomic::{AtomicU64, Ordering};

/// Unique identifier for a connection, never reused within a process.
pub type SessionId = u64;

/// Generates monotonically increasing session identifiers.
#[derive(Debug)]
pub struct UidGenerator {
    counter: AtomicU64,
}

impl UidGenerator {
    /// Create a generator whose first identifier is 1.
    pub fn new() -> Self {
        Self {
            counter: AtomicU64::new(1),
        }
    }

    /// Generate the next unique identifier.
    pub fn next(&self) -> SessionId {
        self.counter.fetch_add(1, Ordering::Relaxed)
    }
}

impl Default for UidGenerator {
    fn default() -> Self {
        Self::new()
    }
}
