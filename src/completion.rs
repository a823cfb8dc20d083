// Write-once completion signal between a scan task and whoever started it.

use std::time::Duration;
use tokio::sync::oneshot;
use tokio::sync::oneshot::error::TryRecvError;

/// Creates a linked writer/reader pair.
pub fn completion_channel() -> (Completion, CompletionWaiter) {
    let (tx, rx) = oneshot::channel();
    (
        Completion { tx: Some(tx) },
        CompletionWaiter { rx, done: false },
    )
}

/// Writer half. `signal` consumes it; dropping it unsignaled signals too, so the reader
/// observes exactly one write whatever path the owner exits by.
#[derive(Debug)]
pub struct Completion {
    tx: Option<oneshot::Sender<()>>,
}

impl Completion {
    pub fn signal(mut self) {
        self.fire();
    }

    fn fire(&mut self) {
        if let Some(tx) = self.tx.take() {
            // Reader gone is fine: nobody is waiting.
            let _ = tx.send(());
        }
    }
}

impl Drop for Completion {
    fn drop(&mut self) {
        self.fire();
    }
}

/// Reader half.
#[derive(Debug)]
pub struct CompletionWaiter {
    rx: oneshot::Receiver<()>,
    done: bool,
}

impl CompletionWaiter {
    /// Non-blocking check. Stays true once observed.
    pub fn is_done(&mut self) -> bool {
        if !self.done {
            match self.rx.try_recv() {
                Ok(()) | Err(TryRecvError::Closed) => self.done = true,
                Err(TryRecvError::Empty) => {}
            }
        }
        self.done
    }

    /// Waits without polling.
    pub async fn wait(mut self) {
        if !self.done {
            let _ = (&mut self.rx).await;
        }
    }

    /// Checks every `period`, calling `on_wait` each time the signal has not arrived yet.
    /// Returns how many times `on_wait` ran.
    pub async fn wait_polling<F>(mut self, period: Duration, mut on_wait: F) -> u64
    where
        F: FnMut(),
    {
        let mut waits = 0;
        while !self.is_done() {
            on_wait();
            waits += 1;
            tokio::time::sleep(period).await;
        }
        waits
    }
}
