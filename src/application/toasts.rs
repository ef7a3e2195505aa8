//! Transient notification queue.
//!
//! Every toast with a non-zero duration owns a Tokio timer that removes it
//! when it elapses. Timers hold only a weak reference to the queue, and the
//! queue aborts whatever is still pending when its last handle goes away.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;

use metrics::counter;
use tokio::runtime::Handle;
use tokio::task::AbortHandle;
use tracing::{debug, warn};

use crate::domain::toast::{DEFAULT_TOAST_DURATION, Toast, ToastId, ToastKind};
use crate::util::lock::mutex_lock;

const SOURCE: &str = "application::toasts";
const METRIC_TOASTS_SHOWN: &str = "devlink_toasts_shown_total";

#[derive(Clone)]
pub struct ToastQueue {
    inner: Arc<Inner>,
}

struct Inner {
    default_duration: Duration,
    state: Mutex<QueueState>,
}

#[derive(Default)]
struct QueueState {
    toasts: Vec<Toast>,
    timers: HashMap<ToastId, AbortHandle>,
}

impl ToastQueue {
    pub fn new(default_duration: Duration) -> Self {
        Self {
            inner: Arc::new(Inner {
                default_duration,
                state: Mutex::new(QueueState::default()),
            }),
        }
    }

    pub fn default_duration(&self) -> Duration {
        self.inner.default_duration
    }

    /// Append a toast and schedule its removal. `None` uses the queue default.
    pub fn show(
        &self,
        message: impl Into<String>,
        kind: ToastKind,
        duration: Option<Duration>,
    ) -> ToastId {
        let duration = duration.unwrap_or(self.inner.default_duration);
        let toast = Toast::new(message, kind, duration);
        let id = toast.id;

        counter!(METRIC_TOASTS_SHOWN, "kind" => kind.as_str()).increment(1);
        debug!(toast_id = %id, kind = kind.as_str(), message = %toast.message, "toast shown");

        let mut state = mutex_lock(&self.inner.state, SOURCE, "show");
        state.toasts.push(toast);

        if !duration.is_zero() {
            match Handle::try_current() {
                Ok(handle) => {
                    let weak = Arc::downgrade(&self.inner);
                    let task = handle.spawn(expire_after(weak, id, duration));
                    state.timers.insert(id, task.abort_handle());
                }
                Err(_) => {
                    warn!(toast_id = %id, "no async runtime, toast will not expire on its own");
                }
            }
        }

        id
    }

    pub fn success(&self, message: impl Into<String>) -> ToastId {
        self.show(message, ToastKind::Success, None)
    }

    pub fn error(&self, message: impl Into<String>) -> ToastId {
        self.show(message, ToastKind::Error, None)
    }

    pub fn info(&self, message: impl Into<String>) -> ToastId {
        self.show(message, ToastKind::Info, None)
    }

    pub fn warning(&self, message: impl Into<String>) -> ToastId {
        self.show(message, ToastKind::Warning, None)
    }

    /// Dismiss a toast. Returns `false` when it was already gone.
    pub fn remove(&self, id: ToastId) -> bool {
        let mut state = mutex_lock(&self.inner.state, SOURCE, "remove");
        if let Some(timer) = state.timers.remove(&id) {
            timer.abort();
        }
        state.take(id).is_some()
    }

    pub fn snapshot(&self) -> Vec<Toast> {
        mutex_lock(&self.inner.state, SOURCE, "snapshot")
            .toasts
            .clone()
    }

    pub fn len(&self) -> usize {
        mutex_lock(&self.inner.state, SOURCE, "len").toasts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove every toast in display order and cancel their timers.
    pub fn drain(&self) -> Vec<Toast> {
        let mut state = mutex_lock(&self.inner.state, SOURCE, "drain");
        state.abort_timers();
        std::mem::take(&mut state.toasts)
    }
}

impl Default for ToastQueue {
    fn default() -> Self {
        Self::new(DEFAULT_TOAST_DURATION)
    }
}

impl std::fmt::Debug for ToastQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToastQueue")
            .field("default_duration", &self.inner.default_duration)
            .field("len", &self.len())
            .finish()
    }
}

impl Inner {
    fn expire(&self, id: ToastId) {
        let mut state = mutex_lock(&self.state, SOURCE, "expire");
        state.timers.remove(&id);
        if state.take(id).is_some() {
            debug!(toast_id = %id, "toast expired");
        }
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        let state = match self.state.get_mut() {
            Ok(state) => state,
            Err(poisoned) => poisoned.into_inner(),
        };
        state.abort_timers();
    }
}

impl QueueState {
    fn take(&mut self, id: ToastId) -> Option<Toast> {
        let index = self.toasts.iter().position(|toast| toast.id == id)?;
        Some(self.toasts.remove(index))
    }

    fn abort_timers(&mut self) {
        for (_, timer) in self.timers.drain() {
            timer.abort();
        }
    }
}

async fn expire_after(queue: Weak<Inner>, id: ToastId, duration: Duration) {
    tokio::time::sleep(duration).await;
    if let Some(inner) = queue.upgrade() {
        inner.expire(id);
    }
}
