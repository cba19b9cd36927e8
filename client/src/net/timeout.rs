//! Request deadlines on top of `gloo-timers`.

use std::time::Duration;

/// Milliseconds for browser timer APIs, saturating at `u32::MAX`.
pub fn timeout_millis(timeout: Duration) -> u32 {
    u32::try_from(timeout.as_millis()).unwrap_or(u32::MAX)
}

/// Race `future` against a timer. `None` means the deadline won.
#[cfg(feature = "hydrate")]
pub async fn with_timeout<F: std::future::Future>(timeout: Duration, future: F) -> Option<F::Output> {
    use futures::future::{Either, select};

    let future = std::pin::pin!(future);
    let timer = std::pin::pin!(gloo_timers::future::TimeoutFuture::new(timeout_millis(timeout)));
    match select(future, timer).await {
        Either::Left((output, _)) => Some(output),
        Either::Right(((), _)) => None,
    }
}

#[cfg(test)]
#[path = "timeout_test.rs"]
mod timeout_test;
