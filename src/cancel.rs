//! Cooperative cancellation shared between a running pipeline and its caller.

use crate::error::Dir2TxtError;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// A cloneable flag checked by long-running operations at every loop boundary.
///
/// Cloning is cheap; all clones observe the same flag, so the caller can keep one
/// handle and pass another into the worker thread.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation. Idempotent.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Returns [`Dir2TxtError::Cancelled`] once cancellation has been requested.
    pub fn check(&self) -> Result<(), Dir2TxtError> {
        if self.is_cancelled() {
            #[cfg(feature = "logging")]
            tracing::debug!("Cancellation observed");
            return Err(Dir2TxtError::Cancelled);
        }
        Ok(())
    }
}
