//! Supersession of in-flight pipeline runs.
//!
//! Each pipeline (photo capture, compression) owns a [`Generation`]. Starting
//! a run takes a [`Ticket`]; starting another run invalidates every earlier
//! ticket. A step that completes with a stale ticket must drop its result
//! instead of applying it, so the most recently started run always wins.

use std::sync::atomic::{AtomicU64, Ordering};

/// Proof that a pipeline run was started; only the newest ticket is current.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

impl Ticket {
    pub fn id(self) -> u64 {
        self.0
    }
}

/// Monotonic run counter. `Sync`, so tickets can be checked from worker threads.
#[derive(Debug, Default)]
pub struct Generation {
    current: AtomicU64,
}

impl Generation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new run, superseding all previously issued tickets.
    pub fn begin(&self) -> Ticket {
        Ticket(self.current.fetch_add(1, Ordering::AcqRel) + 1)
    }

    /// Whether `ticket` belongs to the most recently started run.
    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.current.load(Ordering::Acquire) == ticket.0
    }

    /// Invalidate every outstanding ticket without starting a run.
    pub fn cancel(&self) {
        self.current.fetch_add(1, Ordering::AcqRel);
    }
}
