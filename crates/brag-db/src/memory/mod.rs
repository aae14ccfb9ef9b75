//! In-process store implementing every repository port
//!
//! All tables sit behind one `parking_lot` mutex and each port method holds
//! it for its whole body, so every method is one atomic unit with the same
//! observable semantics as its PostgreSQL counterpart. The lock is never
//! held across an `.await`.

mod ports;
mod tables;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use tables::Tables;

/// Shared in-memory store; clones share the same tables
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
    notifications_down: Arc<AtomicBool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make notification inserts fail, simulating an unavailable table
    pub fn set_notifications_down(&self, down: bool) {
        self.notifications_down.store(down, Ordering::SeqCst);
    }

    fn notifications_down(&self) -> bool {
        self.notifications_down.load(Ordering::SeqCst)
    }
}
