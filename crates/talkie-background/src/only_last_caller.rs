//! Generation counter used to cancel superseded speech flows.
//!
//! A flow captures the current generation when it starts and checks it at
//! every await boundary. Incrementing the counter makes every token captured
//! before the increment stale.

use std::sync::atomic::{AtomicU64, Ordering};

/// A captured generation value.
pub type Generation = u64;

/// Monotonically increasing cancellation counter.
#[derive(Debug, Default)]
pub struct OnlyLastCaller {
    caller_id: AtomicU64,
}

impl OnlyLastCaller {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current generation; capture this as the token of a new flow.
    pub fn current(&self) -> Generation {
        self.caller_id.load(Ordering::SeqCst)
    }

    /// Invalidate every outstanding token. Returns the new generation.
    pub fn increment_caller_id(&self) -> Generation {
        self.caller_id.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Whether a token captured earlier is still current.
    pub fn is_valid(&self, token: Generation) -> bool {
        self.current() == token
    }

    /// Increment only if `token` is still current.
    ///
    /// Used when a flow completes normally so that later checks by the same
    /// token fail, without invalidating a flow that started after it.
    pub fn increment_if_current(&self, token: Generation) -> bool {
        self.caller_id
            .compare_exchange(token, token + 1, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_increment_invalidates_token() {
        let caller = OnlyLastCaller::new();
        let token = caller.current();
        assert!(caller.is_valid(token));

        let next = caller.increment_caller_id();
        assert_eq!(next, token + 1);
        assert!(!caller.is_valid(token));
        assert!(caller.is_valid(next));
    }

    #[test]
    fn test_increment_if_current_ignores_stale_token() {
        let caller = OnlyLastCaller::new();
        let stale = caller.current();
        let fresh = caller.increment_caller_id();

        assert!(!caller.increment_if_current(stale));
        assert!(caller.is_valid(fresh));

        assert!(caller.increment_if_current(fresh));
        assert!(!caller.is_valid(fresh));
    }
}
