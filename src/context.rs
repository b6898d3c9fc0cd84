//! Per-request context supplied by the host platform.

use std::future::Future;

use tokio_util::sync::CancellationToken;

use crate::errors::BackendError;

/// Caller identity and cancellation for a single platform request.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    /// Display name of the requesting identity, when the platform has one.
    pub display_name: Option<String>,

    /// Fires when the platform abandons the request.
    pub cancellation: CancellationToken,
}

impl RequestContext {
    /// Context with no display name that is never cancelled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach the requester's display name.
    #[must_use]
    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    /// Use an externally owned cancellation token.
    #[must_use]
    pub fn with_cancellation(mut self, cancellation: CancellationToken) -> Self {
        self.cancellation = cancellation;
        self
    }

    /// Drive `future` to completion unless the request is cancelled first.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Cancelled`] if the token fires before the
    /// future resolves, otherwise whatever the future returns.
    pub async fn run<T, E, F>(&self, future: F) -> Result<T, BackendError>
    where
        F: Future<Output = Result<T, E>>,
        E: Into<BackendError>,
    {
        tokio::select! {
            biased;
            () = self.cancellation.cancelled() => Err(BackendError::Cancelled),
            result = future => result.map_err(Into::into),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::future::pending;

    use testresult::TestResult;

    use super::*;

    #[tokio::test]
    async fn run_returns_future_output() -> TestResult {
        let ctx = RequestContext::new();

        let value = ctx.run(async { Ok::<_, BackendError>(7) }).await?;

        assert_eq!(value, 7);

        Ok(())
    }

    #[tokio::test]
    async fn run_aborts_pending_future_when_cancelled() {
        let ctx = RequestContext::new();
        ctx.cancellation.cancel();

        let result = ctx.run(pending::<Result<(), BackendError>>()).await;

        assert!(
            matches!(result, Err(BackendError::Cancelled)),
            "expected Cancelled, got {result:?}"
        );
    }

    #[tokio::test]
    async fn run_aborts_when_cancelled_mid_flight() {
        let ctx = RequestContext::new();
        let token = ctx.cancellation.clone();

        let canceller = tokio::spawn(async move {
            tokio::task::yield_now().await;
            token.cancel();
        });

        let result = ctx.run(pending::<Result<(), BackendError>>()).await;

        assert!(
            matches!(result, Err(BackendError::Cancelled)),
            "expected Cancelled, got {result:?}"
        );
        assert!(canceller.await.is_ok(), "canceller task failed");
    }

    #[tokio::test]
    async fn cancellation_wins_over_ready_future() {
        let ctx = RequestContext::new();
        ctx.cancellation.cancel();

        let result = ctx.run(async { Ok::<_, BackendError>(1) }).await;

        assert!(matches!(result, Err(BackendError::Cancelled)));
    }
}
