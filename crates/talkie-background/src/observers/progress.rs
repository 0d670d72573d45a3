//! Speaking progress, measured in characters.
//!
//! The popup subscribes to the snapshot channel; the speaker's lifecycle
//! events drive the updates.

use serde::Serialize;
use tokio::sync::watch;
use tracing::trace;

/// Progress of the current utterance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSnapshot {
    pub min: usize,
    pub max: usize,
    pub current: usize,
    /// Length of the segment being spoken, if any.
    pub segment_length: Option<usize>,
}

impl ProgressSnapshot {
    /// Completed share in `0.0..=1.0`.
    #[allow(clippy::cast_precision_loss)]
    pub fn fraction(&self) -> f64 {
        let span = self.max.saturating_sub(self.min);
        if span == 0 {
            return 0.0;
        }
        (self.current.saturating_sub(self.min)) as f64 / span as f64
    }
}

/// Publishes [`ProgressSnapshot`]s.
pub struct TalkieProgress {
    sender: watch::Sender<ProgressSnapshot>,
}

impl Default for TalkieProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl TalkieProgress {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(ProgressSnapshot::default());
        Self { sender }
    }

    pub fn subscribe(&self) -> watch::Receiver<ProgressSnapshot> {
        self.sender.subscribe()
    }

    pub fn snapshot(&self) -> ProgressSnapshot {
        *self.sender.borrow()
    }

    pub fn reset_progress(&self, min: usize, max: usize, current: usize) {
        self.update(|progress| {
            *progress = ProgressSnapshot {
                min,
                max,
                current: current.clamp(min, max.max(min)),
                segment_length: None,
            };
        });
    }

    pub fn start_segment(&self, length: usize) {
        self.update(|progress| progress.segment_length = Some(length));
    }

    /// Count the current segment as spoken.
    pub fn end_segment(&self) {
        self.update(|progress| {
            if let Some(length) = progress.segment_length.take() {
                progress.current = progress.current.saturating_add(length).min(progress.max);
            }
        });
    }

    pub fn finish_progress(&self) {
        self.update(|progress| {
            progress.current = progress.max;
            progress.segment_length = None;
        });
    }

    fn update(&self, modify: impl FnOnce(&mut ProgressSnapshot)) {
        self.sender.send_modify(modify);
        trace!(progress = ?*self.sender.borrow(), "Progress updated");
    }
}
