use std::sync::Arc;
use std::time::Duration;

use talkie_core::{ActionButton, IconMode, PortError};
use tokio::sync::{mpsc, oneshot};
use tokio::time::Instant;
use tracing::{debug, warn};

struct IconUpdate {
    mode: IconMode,
    due: Instant,
    applied: oneshot::Sender<()>,
}

/// Switches the action button icon between playing and stopped.
///
/// Delayed updates go through one worker and are applied in the order they
/// were scheduled.
#[derive(Clone)]
pub struct IconManager {
    button: Arc<dyn ActionButton>,
    update_delay: Duration,
    updates: mpsc::UnboundedSender<IconUpdate>,
}

impl IconManager {
    /// Must be called from within a Tokio runtime.
    pub fn new(button: Arc<dyn ActionButton>, update_delay: Duration) -> Self {
        let (updates, receiver) = mpsc::unbounded_channel();
        tokio::spawn(run_icon_updates(button.clone(), receiver));
        Self {
            button,
            update_delay,
            updates,
        }
    }

    pub async fn set_icon_mode_playing(&self) -> Result<(), PortError> {
        apply_icon_mode(self.button.as_ref(), IconMode::Playing).await
    }

    pub async fn set_icon_mode_stopped(&self) -> Result<(), PortError> {
        apply_icon_mode(self.button.as_ref(), IconMode::Stopped).await
    }

    /// Apply `mode` after the configured delay without blocking the caller.
    ///
    /// The returned receiver resolves once the update has been applied.
    pub fn schedule(&self, mode: IconMode) -> oneshot::Receiver<()> {
        let (applied, done) = oneshot::channel();
        let update = IconUpdate {
            mode,
            due: Instant::now() + self.update_delay,
            applied,
        };
        if self.updates.send(update).is_err() {
            warn!(?mode, "Icon worker is gone, dropping update");
        }
        done
    }
}

async fn run_icon_updates(
    button: Arc<dyn ActionButton>,
    mut receiver: mpsc::UnboundedReceiver<IconUpdate>,
) {
    while let Some(update) = receiver.recv().await {
        tokio::time::sleep_until(update.due).await;
        if let Err(error) = apply_icon_mode(button.as_ref(), update.mode).await {
            warn!(mode = ?update.mode, error = %error, "Could not update the icon");
        }
        let _ = update.applied.send(());
    }
    debug!("Icon updates closed");
}

async fn apply_icon_mode(button: &dyn ActionButton, mode: IconMode) -> Result<(), PortError> {
    button.set_icon_mode(mode).await?;
    debug!(?mode, "Icon updated");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingButton {
        modes: Mutex<Vec<IconMode>>,
    }

    #[async_trait]
    impl ActionButton for RecordingButton {
        async fn set_icon_mode(&self, mode: IconMode) -> Result<(), PortError> {
            self.modes.lock().unwrap().push(mode);
            Ok(())
        }

        async fn enable_popup(&self) -> Result<(), PortError> {
            Ok(())
        }

        async fn disable_popup(&self) -> Result<(), PortError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_scheduled_updates_apply_in_order() {
        let button = Arc::new(RecordingButton::default());
        let icon = IconManager::new(button.clone(), Duration::from_millis(1));

        icon.schedule(IconMode::Playing).await.unwrap();
        icon.schedule(IconMode::Stopped).await.unwrap();
        icon.set_icon_mode_playing().await.unwrap();

        assert_eq!(
            *button.modes.lock().unwrap(),
            vec![IconMode::Playing, IconMode::Stopped, IconMode::Playing]
        );
    }

    /// Yields inside the port on `Playing` so a racing update could overtake it.
    #[derive(Default)]
    struct SlowPlayingButton {
        modes: Mutex<Vec<IconMode>>,
    }

    #[async_trait]
    impl ActionButton for SlowPlayingButton {
        async fn set_icon_mode(&self, mode: IconMode) -> Result<(), PortError> {
            if mode == IconMode::Playing {
                tokio::task::yield_now().await;
            }
            self.modes.lock().unwrap().push(mode);
            Ok(())
        }

        async fn enable_popup(&self) -> Result<(), PortError> {
            Ok(())
        }

        async fn disable_popup(&self) -> Result<(), PortError> {
            Ok(())
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_stopped_update_lands_last_on_multi_thread_runtime() {
        for _ in 0..100 {
            let button = Arc::new(SlowPlayingButton::default());
            let icon = IconManager::new(button.clone(), Duration::from_millis(1));

            drop(icon.schedule(IconMode::Playing));
            icon.schedule(IconMode::Stopped).await.unwrap();

            assert_eq!(
                *button.modes.lock().unwrap(),
                vec![IconMode::Playing, IconMode::Stopped]
            );
        }
    }
}
