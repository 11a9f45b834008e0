//! Strictly increasing request nonces
//!
//! Poloniex rejects any private request whose nonce is not greater than the
//! last one it accepted for the same key. Nonces are nanoseconds since the
//! Unix epoch, forced to advance by at least one on every draw so that
//! back-to-back or concurrent requests never collide, and a wall clock that
//! steps backwards never produces a smaller value.

use crate::error::{AuthError, AuthResult};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Lock-free source of strictly increasing nonces
#[derive(Debug, Default)]
pub struct NonceSource {
    last: AtomicU64,
}

impl NonceSource {
    /// Create a source seeded from the clock on first use
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a source whose first nonce is greater than `floor`
    ///
    /// Use this when nonces issued by an earlier process for the same key
    /// may be ahead of the local clock.
    pub fn starting_after(floor: u64) -> Self {
        Self {
            last: AtomicU64::new(floor),
        }
    }

    /// Draw the next nonce
    ///
    /// Fails with [`AuthError::NonceExhausted`] once `u64::MAX` has been
    /// issued, rather than repeating it.
    pub fn next(&self) -> AuthResult<u64> {
        let now = now_nanos();
        let mut last = self.last.load(Ordering::Acquire);
        loop {
            let candidate = now.max(last.checked_add(1).ok_or(AuthError::NonceExhausted)?);
            match self
                .last
                .compare_exchange_weak(last, candidate, Ordering::AcqRel, Ordering::Acquire)
            {
                Ok(_) => return Ok(candidate),
                Err(actual) => last = actual,
            }
        }
    }

    /// The most recently issued nonce (0 if none yet)
    pub fn last(&self) -> u64 {
        self.last.load(Ordering::Acquire)
    }
}

fn now_nanos() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| u64::try_from(d.as_nanos()).unwrap_or(u64::MAX))
        .unwrap_or(0)
}
