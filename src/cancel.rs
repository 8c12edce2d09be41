use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::{AnalyzerError, Result};

/// Cooperative cancellation signal threaded through every stage that may
/// block. Stages check it at least at every outer loop boundary.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Fails with [`AnalyzerError::Cancelled`] once `cancel` has been called.
    pub fn checkpoint(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(AnalyzerError::Cancelled)
        } else {
            Ok(())
        }
    }
}
