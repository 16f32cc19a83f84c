// SPDX-License-Identifier: MIT OR Apache-2.0

//! Query debouncer: settles raw keystroke input into a stable query.
//!
//! The initial value settles immediately. After that, each raw change
//! restarts the quiet-period timer and a value settles only once no
//! further change arrives within `delay`. A settled value equal to the
//! previous one is not re-emitted.

use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

pub struct QueryDebouncer {
    raw_tx: watch::Sender<String>,
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl QueryDebouncer {
    /// Start the debouncer. Settled values arrive on the returned receiver,
    /// beginning with `initial`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(
        initial: impl Into<String>,
        delay: Duration,
    ) -> (Self, mpsc::UnboundedReceiver<String>) {
        let initial = initial.into();
        let (raw_tx, raw_rx) = watch::channel(initial.clone());
        let (settled_tx, settled_rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();

        let task = tokio::spawn(run(initial, delay, raw_rx, settled_tx, cancel.clone()));

        (
            Self {
                raw_tx,
                cancel,
                task: Some(task),
            },
            settled_rx,
        )
    }

    /// Record a raw input change
    pub fn push(&self, raw: impl Into<String>) {
        self.raw_tx.send_replace(raw.into());
    }

    /// Latest raw value, settled or not
    pub fn raw(&self) -> String {
        self.raw_tx.borrow().clone()
    }

    /// Stop the debouncer; a pending emission is dropped.
    pub async fn shutdown(mut self) {
        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for QueryDebouncer {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn run(
    initial: String,
    delay: Duration,
    mut raw_rx: watch::Receiver<String>,
    settled_tx: mpsc::UnboundedSender<String>,
    cancel: CancellationToken,
) {
    let mut last_settled = initial.clone();
    if settled_tx.send(initial).is_err() {
        return;
    }

    loop {
        tokio::select! {
            _ = cancel.cancelled() => return,
            changed = raw_rx.changed() => {
                if changed.is_err() {
                    return;
                }
            }
        }

        // Quiet period: any further change restarts the timer.
        loop {
            tokio::select! {
                _ = cancel.cancelled() => return,
                changed = raw_rx.changed() => {
                    if changed.is_err() {
                        return;
                    }
                }
                _ = tokio::time::sleep(delay) => break,
            }
        }

        let value = raw_rx.borrow_and_update().clone();
        if value == last_settled {
            tracing::trace!(query = %value, "settled query unchanged");
            continue;
        }
        last_settled = value.clone();
        if settled_tx.send(value).is_err() {
            return;
        }
    }
}
