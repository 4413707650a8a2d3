//! One-shot stop signal shared by the shutdown endpoint, OS signal handlers,
//! and the serve loop.
//!
//! The pending to fired transition happens at most once; every waiter observes
//! it, including waiters that subscribe after it happened.

use std::sync::Arc;

use tokio::sync::watch;

/// Write-once shutdown flag backed by a `watch` channel.
#[derive(Debug, Clone)]
pub struct ShutdownSignal {
    sender: Arc<watch::Sender<bool>>,
}

impl ShutdownSignal {
    /// Create a signal in the pending state.
    #[must_use]
    pub fn new() -> Self {
        let (sender, _receiver) = watch::channel(false);
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Fire the signal. Returns `true` only for the call that performed the
    /// transition; later calls are no-ops.
    pub fn fire(&self) -> bool {
        self.sender.send_if_modified(|fired| {
            if *fired {
                false
            } else {
                *fired = true;
                true
            }
        })
    }

    /// Whether the signal has fired.
    #[must_use]
    pub fn is_fired(&self) -> bool {
        *self.sender.borrow()
    }

    /// Resolve once the signal has fired.
    pub async fn wait(&self) {
        let mut receiver = self.sender.subscribe();
        // The sender lives as long as `self`, so the channel cannot close here.
        let _ = receiver.wait_for(|fired| *fired).await;
    }
}

impl Default for ShutdownSignal {
    fn default() -> Self {
        Self::new()
    }
}
