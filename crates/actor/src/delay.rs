use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::sleep;

/// Guard for a message scheduled with [`crate::Actor::send_after`].
///
/// The delivery is cancelled when this guard is dropped, so holders must
/// keep it alive until the delay elapses. This makes timer cleanup on
/// owner teardown structural rather than a convention: state that stores
/// its pending deliveries cancels them by being dropped.
#[derive(Debug)]
pub struct DelayedSend {
    task: JoinHandle<()>,
}

impl DelayedSend {
    pub(crate) fn spawn(
        delay: Duration,
        deliver: impl FnOnce() + Send + 'static,
    ) -> Self {
        let task = tokio::spawn(async move {
            sleep(delay).await;
            deliver();
        });
        Self { task }
    }

    /// Cancels the pending delivery.
    ///
    /// Has no effect if the message has already been delivered.
    #[inline]
    pub fn cancel(&self) {
        self.task.abort();
    }
}

impl Drop for DelayedSend {
    fn drop(&mut self) {
        self.task.abort();
    }
}
