// Per-request Context
//
// Created by the host adapter for each inbound call and lent to the handler.

use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tokio::sync::watch;

/// Cancellation signal observed by handlers
#[derive(Clone)]
pub struct CancelSignal {
    rx: watch::Receiver<bool>,
}

impl CancelSignal {
    /// Check if the call was cancelled
    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Wait until the call is cancelled.
    ///
    /// Resolves immediately if the trigger was dropped without firing, since
    /// nothing can cancel the call any more; callers should re-check
    /// [`is_cancelled`](Self::is_cancelled).
    pub async fn cancelled(&mut self) {
        if self.is_cancelled() {
            return;
        }
        let _ = self.rx.changed().await;
    }
}

/// Fires the matching [`CancelSignal`]
pub struct CancelTrigger {
    tx: watch::Sender<bool>,
}

impl CancelTrigger {
    pub fn cancel(&self) {
        let _ = self.tx.send(true);
    }

    /// Cancel when the returned guard is dropped (e.g. when the host drops
    /// the in-flight request future).
    pub fn cancel_on_drop(self) -> CancelOnDrop {
        CancelOnDrop {
            trigger: Some(self),
        }
    }
}

/// Fires its trigger on drop unless disarmed
pub struct CancelOnDrop {
    trigger: Option<CancelTrigger>,
}

impl CancelOnDrop {
    /// Call finished normally; drop without cancelling.
    pub fn disarm(mut self) {
        self.trigger = None;
    }
}

impl Drop for CancelOnDrop {
    fn drop(&mut self) {
        if let Some(trigger) = self.trigger.take() {
            trigger.cancel();
        }
    }
}

/// Create a cancel channel
pub fn cancel_channel() -> (CancelTrigger, CancelSignal) {
    let (tx, rx) = watch::channel(false);
    (CancelTrigger { tx }, CancelSignal { rx })
}

/// Context handed to every handler by shared reference.
///
/// Owned by exactly one in-flight call. `data` is the optional extension
/// map for values middleware wants to pass along.
pub struct RequestContext {
    pub request_id: String,
    pub trace_id: Option<String>,
    pub started_at: Instant,
    cancel: CancelSignal,
    data: Mutex<HashMap<String, Value>>,
}

impl RequestContext {
    /// New context with a random request id and no cancellation source
    pub fn new() -> Self {
        let (_trigger, cancel) = cancel_channel();
        Self::with_cancel(cancel)
    }

    pub fn with_cancel(cancel: CancelSignal) -> Self {
        Self {
            request_id: uuid::Uuid::new_v4().to_string(),
            trace_id: None,
            started_at: Instant::now(),
            cancel,
            data: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_trace_id(mut self, trace_id: impl Into<String>) -> Self {
        self.trace_id = Some(trace_id.into());
        self
    }

    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }

    pub fn cancel_signal(&self) -> CancelSignal {
        self.cancel.clone()
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub fn set(&self, key: impl Into<String>, value: Value) {
        let mut data = self.data.lock().unwrap_or_else(|e| e.into_inner());
        data.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        let data = self.data.lock().unwrap_or_else(|e| e.into_inner());
        data.get(key).cloned()
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RequestContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestContext")
            .field("request_id", &self.request_id)
            .field("trace_id", &self.trace_id)
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_ids_are_unique() {
        let a = RequestContext::new();
        let b = RequestContext::new();
        assert_ne!(a.request_id, b.request_id);
        assert!(a.trace_id.is_none());
    }

    #[test]
    fn test_extension_map() {
        let ctx = RequestContext::new().with_trace_id("trace-1");
        ctx.set("pingedAt", json!("2026-01-01T00:00:00Z"));
        assert_eq!(ctx.get("pingedAt"), Some(json!("2026-01-01T00:00:00Z")));
        assert_eq!(ctx.get("missing"), None);
        assert_eq!(ctx.trace_id.as_deref(), Some("trace-1"));
    }

    #[tokio::test]
    async fn test_cancel_signal() {
        let (trigger, signal) = cancel_channel();
        let ctx = RequestContext::with_cancel(signal);
        assert!(!ctx.is_cancelled());

        let mut waiter = ctx.cancel_signal();
        let handle = tokio::spawn(async move {
            waiter.cancelled().await;
            waiter.is_cancelled()
        });

        trigger.cancel();
        assert!(handle.await.unwrap());
        assert!(ctx.is_cancelled());
    }

    #[test]
    fn test_cancel_on_drop() {
        let (trigger, signal) = cancel_channel();
        let guard = trigger.cancel_on_drop();
        assert!(!signal.is_cancelled());
        drop(guard);
        assert!(signal.is_cancelled());

        let (trigger, signal) = cancel_channel();
        trigger.cancel_on_drop().disarm();
        assert!(!signal.is_cancelled());
    }
}
