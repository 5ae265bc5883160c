//! Request cancellation.
//!
//! Dropping a reqwest future aborts the request, so cancelling is a race
//! between the request and a [`CancellationToken`].

use std::future::Future;
use std::sync::{Mutex, PoisonError};

use tokio_util::sync::CancellationToken;

use super::ApiError;

/// Run `request` until it completes or `token` is cancelled, whichever
/// happens first.
///
/// # Errors
///
/// Returns `ApiError::Cancelled` if the token fires first, otherwise the
/// request's own result.
pub async fn cancellable<T, F>(token: &CancellationToken, request: F) -> Result<T, ApiError>
where
    F: Future<Output = Result<T, ApiError>>,
{
    tokio::select! {
        biased;
        () = token.cancelled() => Err(ApiError::Cancelled),
        result = request => result,
    }
}

/// Latest-request-wins guard for one screen or widget.
///
/// Each [`Supersede::run`] cancels whatever the previous call started, so a
/// slow stale search can never overwrite the results of a newer one.
#[derive(Debug, Default)]
pub struct Supersede {
    current: Mutex<Option<CancellationToken>>,
}

impl Supersede {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel the previous request and hand out a token for the next one.
    pub fn begin(&self) -> CancellationToken {
        let token = CancellationToken::new();
        let previous = self
            .current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(token.clone());
        if let Some(previous) = previous {
            previous.cancel();
        }
        token
    }

    /// Cancel the in-flight request, if any (the screen went away).
    pub fn cancel(&self) {
        if let Some(token) = self
            .current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            token.cancel();
        }
    }

    /// Run `request` as the latest one, superseding any earlier call.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Cancelled` if a later call superseded this one.
    pub async fn run<T, F>(&self, request: F) -> Result<T, ApiError>
    where
        F: Future<Output = Result<T, ApiError>>,
    {
        let token = self.begin();
        cancellable(&token, request).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use super::*;

    async fn respond_after(ms: u64, value: u32) -> Result<u32, ApiError> {
        tokio::time::sleep(Duration::from_millis(ms)).await;
        Ok(value)
    }

    #[tokio::test]
    async fn test_cancelled_token_wins() {
        let token = CancellationToken::new();
        token.cancel();
        let result = cancellable(&token, respond_after(10, 1)).await;
        assert!(matches!(result, Err(ApiError::Cancelled)));
    }

    #[tokio::test]
    async fn test_uncancelled_request_completes() {
        let token = CancellationToken::new();
        assert_eq!(cancellable(&token, respond_after(1, 7)).await.unwrap(), 7);
    }

    #[tokio::test]
    async fn test_second_request_supersedes_first() {
        let guard = Supersede::new();
        let (first, second) = tokio::join!(
            guard.run(respond_after(200, 1)),
            guard.run(respond_after(10, 2)),
        );
        assert!(matches!(first, Err(ApiError::Cancelled)));
        assert_eq!(second.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_cancel_aborts_in_flight() {
        let guard = Supersede::new();
        let (result, ()) = tokio::join!(guard.run(respond_after(200, 1)), async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            guard.cancel();
        });
        assert!(matches!(result, Err(ApiError::Cancelled)));
    }
}
