//! Cooperative cancellation for in-flight discovery and probe calls.

use tokio::sync::watch;

/// Caller-side handle that cancels every linked [`CancelSignal`].
#[derive(Debug)]
pub struct CancelTrigger {
    sender: watch::Sender<bool>,
}

impl CancelTrigger {
    /// Requests cancellation. Calling this more than once has no further effect.
    pub fn cancel(&self) {
        self.sender.send_replace(true);
    }
}

/// Observer side of a cancellation request.
///
/// Dropping the [`CancelTrigger`] without calling
/// [`cancel`](CancelTrigger::cancel) leaves the signal permanently
/// un-cancelled.
#[derive(Debug, Clone)]
pub struct CancelSignal {
    receiver: watch::Receiver<bool>,
}

impl CancelSignal {
    /// Creates a linked trigger and signal pair.
    #[must_use]
    pub fn pair() -> (CancelTrigger, Self) {
        let (sender, receiver) = watch::channel(false);
        (CancelTrigger { sender }, Self { receiver })
    }

    /// Creates a signal that never fires.
    #[must_use]
    pub fn never() -> Self {
        let (_, signal) = Self::pair();
        signal
    }

    /// Returns whether cancellation has been requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        *self.receiver.borrow()
    }

    /// Resolves once cancellation is requested; pends forever otherwise.
    pub async fn cancelled(&self) {
        let mut receiver = self.receiver.clone();
        loop {
            if *receiver.borrow_and_update() {
                return;
            }
            if receiver.changed().await.is_err() {
                std::future::pending::<()>().await;
            }
        }
    }
}

impl Default for CancelSignal {
    fn default() -> Self {
        Self::never()
    }
}
