//! Which tab, if any, is currently being spoken for.

use std::sync::{Arc, Mutex, PoisonError};

use talkie_core::{TabHost, TabId};
use tracing::debug;

/// Records the tab that was active when speech started.
pub struct SpeakingStatus {
    tab_host: Arc<dyn TabHost>,
    speaking_tab: Mutex<Option<TabId>>,
}

impl SpeakingStatus {
    pub fn new(tab_host: Arc<dyn TabHost>) -> Self {
        Self {
            tab_host,
            speaking_tab: Mutex::new(None),
        }
    }

    /// Mark the active tab as speaking. No active tab means no change.
    pub async fn set_active_tab_as_speaking(&self) {
        let Some(tab_id) = self.tab_host.active_tab().await else {
            debug!("No active tab, not marking any tab as speaking");
            return;
        };

        let previous = self.lock().replace(tab_id);
        debug!(tab = %tab_id, previous = ?previous, "Marked tab as speaking");
    }

    /// Clear the speaking record.
    ///
    /// The record is cleared even when focus has moved to another tab since
    /// speech started, so a finished session never leaves a stale flag behind.
    pub async fn set_active_tab_is_done_speaking(&self) {
        if let Some(tab_id) = self.lock().take() {
            debug!(tab = %tab_id, "Marked tab as done speaking");
        }
    }

    /// Clear the record if it points at `tab_id`.
    pub fn set_tab_is_done_speaking(&self, tab_id: TabId) {
        let mut speaking = self.lock();
        if *speaking == Some(tab_id) {
            *speaking = None;
            debug!(tab = %tab_id, "Marked tab as done speaking");
        }
    }

    pub fn is_speaking(&self) -> bool {
        self.lock().is_some()
    }

    pub fn is_speaking_tab_id(&self, tab_id: TabId) -> bool {
        *self.lock() == Some(tab_id)
    }

    pub fn speaking_tab(&self) -> Option<TabId> {
        *self.lock()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<TabId>> {
        self.speaking_tab
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
