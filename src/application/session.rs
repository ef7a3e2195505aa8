//! Session token persistence port and the process-wide expiry signal.

use std::sync::Arc;

use metrics::counter;
use thiserror::Error;
use tokio::sync::watch;
use tracing::warn;

const METRIC_SESSION_EXPIRED: &str = "devlink_session_expired_total";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenStoreError {
    #[error("token storage failed: {0}")]
    Io(String),
}

impl TokenStoreError {
    pub fn io(err: impl std::fmt::Display) -> Self {
        Self::Io(err.to_string())
    }
}

/// Where the bearer token lives between runs.
///
/// Reads happen on every request, writes on login and deletes on logout or
/// expiry. Implementations must tolerate deleting an absent token.
pub trait TokenStore: Send + Sync {
    fn load(&self) -> Result<Option<String>, TokenStoreError>;
    fn save(&self, token: &str) -> Result<(), TokenStoreError>;
    fn clear(&self) -> Result<(), TokenStoreError>;
}

/// Broadcast raised whenever the backend rejects the current session.
///
/// The HTTP client holds one clone and bumps the epoch on a 401; the auth gate
/// holds a [`SessionWatcher`] and reacts to every bump.
#[derive(Debug, Clone)]
pub struct SessionSignal {
    tx: Arc<watch::Sender<u64>>,
}

impl SessionSignal {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(0);
        Self { tx: Arc::new(tx) }
    }

    pub fn notify_expired(&self) {
        self.tx.send_modify(|epoch| *epoch += 1);
        counter!(METRIC_SESSION_EXPIRED).increment(1);
        warn!(
            epoch = *self.tx.borrow(),
            "session token rejected by backend"
        );
    }

    /// Number of expiry notifications raised so far.
    pub fn epoch(&self) -> u64 {
        *self.tx.borrow()
    }

    /// Watcher that only sees expiries raised after this call.
    pub fn subscribe(&self) -> SessionWatcher {
        SessionWatcher {
            rx: self.tx.subscribe(),
        }
    }
}

impl Default for SessionSignal {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug)]
pub struct SessionWatcher {
    rx: watch::Receiver<u64>,
}

impl SessionWatcher {
    /// Consume a pending expiry without waiting.
    pub fn take_expired(&mut self) -> bool {
        match self.rx.has_changed() {
            Ok(true) => {
                self.rx.borrow_and_update();
                true
            }
            Ok(false) | Err(_) => false,
        }
    }

    /// Wait for the next expiry. Returns `false` once every signal handle is gone.
    pub async fn expired(&mut self) -> bool {
        match self.rx.changed().await {
            Ok(()) => {
                self.rx.borrow_and_update();
                true
            }
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn watcher_sees_only_later_expiries() {
        let signal = SessionSignal::new();
        signal.notify_expired();

        let mut watcher = signal.subscribe();
        assert!(!watcher.take_expired());

        signal.notify_expired();
        signal.notify_expired();
        assert!(watcher.take_expired());
        assert!(!watcher.take_expired());
        assert_eq!(signal.epoch(), 3);
    }

    #[tokio::test]
    async fn expired_wakes_on_notify() {
        let signal = SessionSignal::new();
        let mut watcher = signal.subscribe();
        let notifier = signal.clone();

        let task = tokio::spawn(async move { watcher.expired().await });
        notifier.notify_expired();
        assert!(task.await.expect("join"));
    }

    #[tokio::test]
    async fn expired_returns_false_when_signal_dropped() {
        let signal = SessionSignal::new();
        let mut watcher = signal.subscribe();
        drop(signal);
        assert!(!watcher.expired().await);
    }
}
