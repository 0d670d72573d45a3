//! Serial task queue.
//!
//! Each linked task starts only after the previous one has settled, whether
//! it succeeded, failed or panicked. A failing link is logged and the chain
//! keeps going; its result is still delivered to whoever holds the receiver.

use std::convert::Infallible;
use std::fmt::Display;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};

use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, warn};

type Job = Box<dyn FnOnce() -> BoxFuture<'static, ()> + Send>;

/// Serial executor for speech flows.
pub struct Chain {
    sender: mpsc::UnboundedSender<Job>,
    next_link: AtomicU64,
}

impl Chain {
    /// Create a chain and spawn its worker.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        tokio::spawn(run_links(receiver));
        Self {
            sender,
            next_link: AtomicU64::new(0),
        }
    }

    /// Queue a task after every task linked before it.
    ///
    /// The factory is not called until the task's turn comes. Dropping the
    /// returned receiver does not cancel the task.
    pub fn link<F, Fut, T, E>(&self, factory: F) -> oneshot::Receiver<Result<T, E>>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        T: Send + 'static,
        E: Display + Send + 'static,
    {
        let link = self.next_link.fetch_add(1, Ordering::Relaxed) + 1;
        let (result_tx, result_rx) = oneshot::channel();

        let job: Job = Box::new(move || {
            async move {
                debug!(link, "Chain link started");
                let result = factory().await;
                match &result {
                    Ok(_) => debug!(link, "Chain link done"),
                    Err(error) => {
                        warn!(link, error = %error, "Chain link failed, continuing with next link");
                    }
                }
                let _ = result_tx.send(result);
            }
            .boxed()
        });

        if self.sender.send(job).is_err() {
            error!(link, "Chain worker is gone, dropping link");
        }

        result_rx
    }

    /// Wait until every task linked so far has settled.
    pub async fn settled(&self) {
        let marker = self.link(|| async { Ok::<(), Infallible>(()) });
        let _ = marker.await;
    }
}

impl Default for Chain {
    fn default() -> Self {
        Self::new()
    }
}

async fn run_links(mut receiver: mpsc::UnboundedReceiver<Job>) {
    while let Some(job) = receiver.recv().await {
        if let Err(join_error) = tokio::spawn(job()).await {
            error!(error = %join_error, "Chain link panicked, continuing with next link");
        }
    }
    debug!("Chain closed");
}
