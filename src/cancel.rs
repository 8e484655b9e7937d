//! Scoped cancellation for in-flight requests
//!
//! A [`CancelGuard`] owns the cancellation of every request started with one
//! of its [`CancelSignal`]s. Dropping the guard (or calling `cancel`) fires
//! the signal; requests observe it through [`CancelSignal::run`].

use crate::error::FetchError;
use futures::future::{select, Either};
use std::future::Future;
use std::pin::pin;
use tokio::sync::watch;

/// RAII owner of a cancellation scope
#[derive(Debug)]
pub struct CancelGuard {
    tx: watch::Sender<bool>,
}

impl CancelGuard {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx }
    }

    /// A signal observing this guard
    pub fn signal(&self) -> CancelSignal {
        CancelSignal {
            rx: Some(self.tx.subscribe()),
        }
    }

    /// Fires the signal without dropping the guard
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_canceled(&self) -> bool {
        *self.tx.borrow()
    }
}

impl Default for CancelGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for CancelGuard {
    fn drop(&mut self) {
        self.tx.send_replace(true);
    }
}

/// Cloneable observer of a [`CancelGuard`]
#[derive(Debug, Clone)]
pub struct CancelSignal {
    rx: Option<watch::Receiver<bool>>,
}

impl CancelSignal {
    /// A signal that never fires
    pub fn none() -> Self {
        Self { rx: None }
    }

    /// True once the guard canceled or went away
    pub fn is_canceled(&self) -> bool {
        match &self.rx {
            Some(rx) => *rx.borrow() || rx.has_changed().is_err(),
            None => false,
        }
    }

    /// Resolves when the guard cancels or is dropped
    pub async fn cancelled(&self) {
        match &self.rx {
            Some(rx) => {
                let mut rx = rx.clone();
                // Err means the guard is gone, which counts as canceled.
                let _ = rx.wait_for(|canceled| *canceled).await;
            }
            None => std::future::pending().await,
        }
    }

    /// Drives `fut` unless the signal fires first
    ///
    /// Cancellation wins when both are ready, and the dropped future takes
    /// its in-flight HTTP request with it.
    pub async fn run<F, T>(&self, fut: F) -> Result<T, FetchError>
    where
        F: Future<Output = Result<T, FetchError>>,
    {
        let cancelled = pin!(self.cancelled());
        let fut = pin!(fut);
        match select(cancelled, fut).await {
            Either::Left(_) => Err(FetchError::Canceled),
            Either::Right((result, _)) => result,
        }
    }
}
