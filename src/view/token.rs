use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Ticket for one outstanding request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestToken(u64);

/// Latest-wins request tracking.
///
/// Each `begin` supersedes every earlier token; a response may only be applied while
/// its token is still current. `invalidate` supersedes everything, e.g. on teardown.
#[derive(Debug, Clone, Default)]
pub struct LatestRequest {
    current: Arc<AtomicU64>,
}

impl LatestRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&self) -> RequestToken {
        RequestToken(self.current.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, token: RequestToken) -> bool {
        self.current.load(Ordering::SeqCst) == token.0
    }

    pub fn invalidate(&self) {
        self.current.fetch_add(1, Ordering::SeqCst);
    }
}
