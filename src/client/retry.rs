//! Retry policy for "forced" requests.
//!
//! A forced request keeps retrying instead of surfacing the first failure.
//! The policy is explicit and injectable: callers pick a bounded attempt
//! count with a fixed delay (the default), or opt into retry-forever when
//! they really do want to block until the server answers.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::clock::Clock;

/// How a forced request behaves when the transport fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RetryPolicy {
    /// Single attempt, failure surfaced immediately.
    None,
    /// Up to `max_attempts` attempts, sleeping `delay_ms` between them.
    Fixed { max_attempts: u32, delay_ms: u32 },
    /// Retry until success, sleeping `delay_ms` between attempts. Can block
    /// the caller indefinitely if the server never answers — opt-in only.
    UntilSuccess { delay_ms: u32 },
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::Fixed {
            max_attempts: 3,
            delay_ms: 500,
        }
    }
}

/// Run `op` under `policy`, sleeping on the clock between attempts.
///
/// Returns the first success, or the last error once the policy is
/// exhausted. `RetryPolicy::None` is exactly one attempt.
pub fn with_retry<T, E>(
    policy: RetryPolicy,
    clock: &impl Clock,
    mut op: impl FnMut() -> Result<T, E>,
) -> Result<T, E>
where
    E: core::fmt::Display,
{
    match policy {
        RetryPolicy::None => op(),
        RetryPolicy::Fixed {
            max_attempts,
            delay_ms,
        } => {
            // A zero-attempt policy still performs one attempt.
            let max_attempts = max_attempts.max(1);
            let mut attempt = 1;
            loop {
                match op() {
                    Ok(value) => return Ok(value),
                    Err(e) if attempt < max_attempts => {
                        debug!("attempt {attempt}/{max_attempts} failed: {e}");
                        clock.sleep_ms(delay_ms);
                        attempt += 1;
                    }
                    Err(e) => {
                        warn!("giving up after {max_attempts} attempts: {e}");
                        return Err(e);
                    }
                }
            }
        }
        RetryPolicy::UntilSuccess { delay_ms } => loop {
            match op() {
                Ok(value) => return Ok(value),
                Err(e) => {
                    debug!("retrying until success: {e}");
                    clock.sleep_ms(delay_ms);
                }
            }
        },
    }
}
