//! Future wrapper over a background sign or verify task

use crate::error::{PqJwtError, Result};
use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};
use tokio::sync::oneshot;

/// Result of a spawned JWT operation, delivered through a oneshot channel
#[must_use = "futures do nothing unless awaited"]
pub struct AsyncJwtResult<T> {
    receiver: oneshot::Receiver<Result<T>>,
}

impl<T: Send + 'static> AsyncJwtResult<T> {
    pub(crate) fn new(receiver: oneshot::Receiver<Result<T>>) -> Self {
        Self { receiver }
    }

    /// Run `op` on the tokio runtime and resolve to its result.
    pub(crate) fn spawn<F>(op: F) -> Self
    where
        F: FnOnce() -> Result<T> + Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        tokio::spawn(async move {
            let _ = tx.send(op());
        });
        Self::new(rx)
    }
}

impl<T> Future for AsyncJwtResult<T> {
    type Output = Result<T>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.receiver).poll(cx) {
            Poll::Ready(Ok(result)) => Poll::Ready(result),
            Poll::Ready(Err(_)) => Poll::Ready(Err(PqJwtError::internal("Channel closed"))),
            Poll::Pending => Poll::Pending,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn dropped_sender_is_internal_error() {
        let (tx, rx) = oneshot::channel::<Result<()>>();
        drop(tx);
        assert_eq!(
            AsyncJwtResult::new(rx).await,
            Err(PqJwtError::Internal("Channel closed".to_string()))
        );
    }

    #[tokio::test]
    async fn spawned_result_is_delivered() {
        assert_eq!(AsyncJwtResult::spawn(|| Ok(7)).await, Ok(7));
    }
}
