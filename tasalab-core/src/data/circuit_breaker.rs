//! Circuit breaker for the remote rate API.
//!
//! HTTP 403 trips the breaker immediately; repeated failures (429, 5xx,
//! timeouts) trip it once the threshold is reached. While open, every request
//! is refused until the cooldown has elapsed.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BreakerState {
    Closed { consecutive_failures: u32 },
    Open { tripped_at: Instant },
}

/// Shared breaker; cheap to wrap in an `Arc` and hand to several providers.
#[derive(Debug)]
pub struct CircuitBreaker {
    state: Mutex<BreakerState>,
    cooldown: Duration,
    failure_threshold: u32,
}

impl CircuitBreaker {
    pub fn new(cooldown: Duration, failure_threshold: u32) -> Self {
        Self {
            state: Mutex::new(BreakerState::Closed {
                consecutive_failures: 0,
            }),
            cooldown,
            failure_threshold: failure_threshold.max(1),
        }
    }

    /// 30-minute cooldown, trips after 3 consecutive failures.
    pub fn default_provider() -> Self {
        Self::new(Duration::from_secs(30 * 60), 3)
    }

    fn lock(&self) -> MutexGuard<'_, BreakerState> {
        // plain Copy state: poisoning is harmless
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Whether a request may be sent now. Resets after the cooldown.
    pub fn is_allowed(&self) -> bool {
        let mut state = self.lock();
        match *state {
            BreakerState::Closed { .. } => true,
            BreakerState::Open { tripped_at } if tripped_at.elapsed() >= self.cooldown => {
                *state = BreakerState::Closed {
                    consecutive_failures: 0,
                };
                true
            }
            BreakerState::Open { .. } => false,
        }
    }

    pub fn record_success(&self) {
        let mut state = self.lock();
        if let BreakerState::Closed { .. } = *state {
            *state = BreakerState::Closed {
                consecutive_failures: 0,
            };
        }
    }

    pub fn record_failure(&self) {
        let mut state = self.lock();
        if let BreakerState::Closed {
            consecutive_failures,
        } = *state
        {
            let failures = consecutive_failures + 1;
            *state = if failures >= self.failure_threshold {
                BreakerState::Open {
                    tripped_at: Instant::now(),
                }
            } else {
                BreakerState::Closed {
                    consecutive_failures: failures,
                }
            };
        }
    }

    /// Trip immediately (403 / IP ban).
    pub fn trip(&self) {
        *self.lock() = BreakerState::Open {
            tripped_at: Instant::now(),
        };
    }

    /// Remaining cooldown (zero when closed).
    pub fn remaining_cooldown(&self) -> Duration {
        match *self.lock() {
            BreakerState::Closed { .. } => Duration::ZERO,
            BreakerState::Open { tripped_at } => self.cooldown.saturating_sub(tripped_at.elapsed()),
        }
    }
}
