//! Bounded dispatch concurrency.
//!
//! # Responsibilities
//! - Limit how many requests run handler code at once
//! - Hand out permits that release their slot when dropped
//!
//! # Design Decisions
//! - Semaphore based; waiting requests queue instead of failing
//! - The permit travels into the blocking call, so the slot stays taken until the
//!   handler returns, even when the request was abandoned or the handler panicked
//! - Closing the pool at shutdown turns queued requests away

use std::sync::Arc;

use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Semaphore guarding handler dispatch.
#[derive(Debug, Clone)]
pub struct DispatchPool {
    slots: Arc<Semaphore>,
    max_concurrent: usize,
}

impl DispatchPool {
    pub fn new(max_concurrent: usize) -> Self {
        Self {
            slots: Arc::new(Semaphore::new(max_concurrent)),
            max_concurrent,
        }
    }

    /// Wait for a free slot. Returns `None` once the pool is closed.
    pub async fn acquire(&self) -> Option<DispatchPermit> {
        let permit = Arc::clone(&self.slots).acquire_owned().await.ok()?;
        tracing::trace!(
            available_permits = self.slots.available_permits(),
            "Dispatch slot acquired"
        );
        Some(DispatchPermit { _permit: permit })
    }

    /// Stop handing out permits; waiters get `None`.
    pub fn close(&self) {
        self.slots.close();
    }

    pub fn available_permits(&self) -> usize {
        self.slots.available_permits()
    }

    pub fn max_concurrent(&self) -> usize {
        self.max_concurrent
    }
}

/// One dispatch slot. Dropping it frees the slot.
#[derive(Debug)]
pub struct DispatchPermit {
    _permit: OwnedSemaphorePermit,
}
