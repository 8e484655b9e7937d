//! Debounced value propagation
//!
//! A [`Debouncer`] republishes the latest value only after it has been stable
//! for the configured delay. Rapid updates coalesce into a single callback.

use std::time::Duration;
use tokio::sync::watch;
use tokio::time::sleep;

/// Handle to a debouncing task
///
/// Dropping the handle stops the task; a value still inside its quiet window
/// is never published.
pub struct Debouncer<T> {
    tx: watch::Sender<T>,
}

impl<T> Debouncer<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Spawns the debouncing task on the current tokio runtime
    ///
    /// `on_settle` runs on that task once per quiet period.
    pub fn spawn<F>(initial: T, delay: Duration, mut on_settle: F) -> Self
    where
        F: FnMut(T) + Send + 'static,
    {
        let (tx, mut rx) = watch::channel(initial);

        tokio::spawn(async move {
            loop {
                if rx.changed().await.is_err() {
                    return;
                }

                // Restart the quiet window on every further change.
                loop {
                    tokio::select! {
                        _ = sleep(delay) => break,
                        changed = rx.changed() => {
                            if changed.is_err() {
                                return;
                            }
                        }
                    }
                }

                let value = rx.borrow_and_update().clone();
                on_settle(value);
            }
        });

        Self { tx }
    }

    /// Records a new value and restarts the quiet window
    pub fn set(&self, value: T) {
        self.tx.send_replace(value);
    }
}
