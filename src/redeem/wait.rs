//! Bounded polling for page controls

use std::{future::Future, time::Duration};

use thiserror::Error;
use tokio::time::sleep;

use super::clock::Clock;

/// The condition never held within the allotted time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("condition not met within {timeout:?}")]
pub struct Timeout {
    pub timeout: Duration,
}

/// Poll `check` until it yields a value or `timeout` elapses
///
/// The first check runs immediately; later ones are spaced by `interval`.
/// Gives up once strictly more than `timeout` has passed on `clock`. Errors
/// from the check are returned as-is.
pub async fn await_condition<T, E, F, Fut>(
    clock: &dyn Clock,
    mut check: F,
    interval: Duration,
    timeout: Duration,
) -> Result<Result<T, Timeout>, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Option<T>, E>>,
{
    let started = clock.now_ms();
    let limit = timeout.as_millis() as i64;

    loop {
        if let Some(value) = check().await? {
            return Ok(Ok(value));
        }
        if clock.now_ms() - started > limit {
            return Ok(Err(Timeout { timeout }));
        }
        sleep(interval).await;
    }
}
