//! Speech lifecycle event broadcasting.
//!
//! Listeners register against an [`EventKind`]; [`Broadcaster::broadcast_event`]
//! runs every listener for the event's kind in registration order. A failing
//! or panicking listener is logged and does not stop the ones after it.
//!
//! A dispatch works on the listener list as it was when the dispatch
//! started; listeners registered meanwhile see only later events.

use std::collections::HashMap;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, PoisonError, RwLock};

use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use talkie_core::{EventKind, SpeechEvent};
use tracing::{debug, error, warn};

/// A registered listener.
type Listener = Arc<dyn Fn(SpeechEvent) -> BoxFuture<'static, anyhow::Result<()>> + Send + Sync>;

/// Process-wide publish/subscribe bus for [`SpeechEvent`]s.
#[derive(Default)]
pub struct Broadcaster {
    listeners: RwLock<HashMap<EventKind, Vec<Listener>>>,
}

impl Broadcaster {
    /// Create a broadcaster without listeners.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a listener for `kind`.
    ///
    /// There is no duplicate detection; registering the same handler twice
    /// makes it run twice.
    pub fn register_listening_action<F, Fut>(&self, kind: EventKind, handler: F)
    where
        F: Fn(SpeechEvent) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        let listener: Listener = Arc::new(move |event| handler(event).boxed());
        self.listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(kind)
            .or_default()
            .push(listener);
    }

    /// Run every listener registered for the event's kind, in order.
    ///
    /// Listener results are logged, never returned.
    pub async fn broadcast_event(&self, event: SpeechEvent) {
        let kind = event.kind();
        let listeners = self.snapshot(kind);

        debug!(event = %kind, listeners = listeners.len(), "Broadcasting speech event");

        for (index, listener) in listeners.iter().enumerate() {
            match AssertUnwindSafe(listener(event.clone()))
                .catch_unwind()
                .await
            {
                Ok(Ok(())) => {}
                Ok(Err(error)) => {
                    warn!(event = %kind, index, error = %error, "Speech event listener failed");
                }
                Err(_) => {
                    error!(event = %kind, index, "Speech event listener panicked");
                }
            }
        }
    }

    /// Number of listeners registered for `kind`.
    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&kind)
            .map_or(0, Vec::len)
    }

    fn snapshot(&self, kind: EventKind) -> Vec<Listener> {
        self.listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&kind)
            .cloned()
            .unwrap_or_default()
    }
}
