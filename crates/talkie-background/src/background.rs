//! Top-level orchestration of user-facing speech actions.
//!
//! Every action that starts speech first stops whatever is playing, then
//! links the new flow onto the root [`Chain`] so flows never overlap.

use std::sync::Arc;

use talkie_core::{
    LocaleProvider, NOT_ABLE_TO_SPEAK_KEY, TabChangeInfo, TabHost, TabId, TextSelection,
    VoiceDescriptor,
};
use tracing::{debug, info, warn};

use crate::chain::Chain;
use crate::error::BackgroundError;
use crate::speaker::Speaker;
use crate::speaking_status::SpeakingStatus;

/// Orchestrator for the background's speech actions.
#[derive(Clone)]
pub struct Background {
    root_chain: Arc<Chain>,
    speaker: Arc<Speaker>,
    speaking_status: Arc<SpeakingStatus>,
    tab_host: Arc<dyn TabHost>,
    locale: Arc<dyn LocaleProvider>,
}

impl Background {
    pub fn new(
        root_chain: Arc<Chain>,
        speaker: Arc<Speaker>,
        speaking_status: Arc<SpeakingStatus>,
        tab_host: Arc<dyn TabHost>,
        locale: Arc<dyn LocaleProvider>,
    ) -> Self {
        Self {
            root_chain,
            speaker,
            speaking_status,
            tab_host,
            locale,
        }
    }

    pub fn speaker(&self) -> &Arc<Speaker> {
        &self.speaker
    }

    pub fn speaking_status(&self) -> &Arc<SpeakingStatus> {
        &self.speaking_status
    }

    /// Speak the active tab's selection.
    ///
    /// On a tab the extension cannot script, a localized notice is spoken
    /// instead, unless the tab is one of the browser's own pages.
    pub async fn speak_selection_on_page(&self) -> Result<(), BackgroundError> {
        if self.tab_host.can_run_in_tab().await {
            return Ok(self.speaker.speak_user_selection().await?);
        }

        info!("Did not detect a normal tab, skipping selection");

        if self.tab_host.is_internal_page().await {
            info!("Detected an internal page, skipping the notice");
            return Ok(());
        }

        let Some(notice) = self.locale.message(NOT_ABLE_TO_SPEAK_KEY) else {
            warn!(key = NOT_ABLE_TO_SPEAK_KEY, "Missing localized notice");
            return Ok(());
        };
        let language = self.locale.messages_locale();

        Ok(self
            .speaker
            .speak_text_in_language(&notice, &language)
            .await?)
    }

    /// Toggle: stop if speaking, otherwise speak the page selection.
    pub async fn start_stop_speak_selection_on_page(&self) -> Result<(), BackgroundError> {
        let was_speaking = self.speaking_status.is_speaking();

        self.speaker.stop_speaking().await?;

        if was_speaking {
            debug!("Was speaking, stopped");
            return Ok(());
        }

        let this = self.clone();
        drop(
            self.root_chain
                .link(move || async move { this.speak_selection_on_page().await }),
        );
        Ok(())
    }

    /// Speak arbitrary text, detecting its language.
    ///
    /// The active page's language is the fallback when it can be read.
    pub async fn start_speaking_custom_text_detect_language(
        &self,
        text: String,
    ) -> Result<(), BackgroundError> {
        self.speaker.stop_speaking().await?;

        let this = self.clone();
        drop(self.root_chain.link(move || async move {
            let page_language = this.page_language().await;
            let selections = [TextSelection::new(text)];
            this.speaker
                .detect_languages_and_speak_all_selections(&selections, page_language.as_deref())
                .await
                .map_err(BackgroundError::from)
        }));
        Ok(())
    }

    /// Speak text in a voice chosen by the caller.
    pub async fn start_speaking_text_in_voice_action(
        &self,
        text: String,
        voice: VoiceDescriptor,
    ) -> Result<(), BackgroundError> {
        self.speaker.stop_speaking().await?;

        let this = self.clone();
        drop(self.root_chain.link(move || async move {
            this.speaker
                .speak_text_in_voice(&text, &voice)
                .await
                .map_err(BackgroundError::from)
        }));
        Ok(())
    }

    pub async fn stop_speaking_action(&self) -> Result<(), BackgroundError> {
        Ok(self.speaker.stop_speaking().await?)
    }

    /// Stop speech if the removed tab is the one being spoken for.
    pub async fn on_tab_removed_handler(&self, tab_id: TabId) -> Result<(), BackgroundError> {
        if !self.speaking_status.is_speaking_tab_id(tab_id) {
            return Ok(());
        }

        info!(tab = %tab_id, "Speaking tab was closed, stopping");
        let stopped = self.speaker.stop_speaking().await;
        self.speaking_status.set_tab_is_done_speaking(tab_id);
        Ok(stopped?)
    }

    /// Stop speech if the speaking tab navigated away.
    ///
    /// Updates that do not change the URL (title, load status) are ignored.
    pub async fn on_tab_updated_handler(
        &self,
        tab_id: TabId,
        change_info: &TabChangeInfo,
    ) -> Result<(), BackgroundError> {
        if !change_info.url_changed() || !self.speaking_status.is_speaking_tab_id(tab_id) {
            return Ok(());
        }

        info!(tab = %tab_id, url = ?change_info.url, "Speaking tab navigated, stopping");
        let stopped = self.speaker.stop_speaking().await;
        self.speaking_status.set_tab_is_done_speaking(tab_id);
        Ok(stopped?)
    }

    /// Stop speech before the background is suspended.
    pub async fn on_extension_suspend_handler(&self) -> Result<(), BackgroundError> {
        info!("Suspending background");

        if self.speaking_status.is_speaking() {
            self.speaker.stop_speaking().await?;
        }

        info!("Background suspended");
        Ok(())
    }

    /// Wait for every flow linked so far to settle.
    pub async fn idle(&self) {
        self.root_chain.settled().await;
    }

    async fn page_language(&self) -> Option<String> {
        if !self.tab_host.can_run_in_tab().await {
            debug!("Did not detect a normal tab, skipping page language detection");
            return None;
        }

        match self.tab_host.detect_page_language().await {
            Ok(language) => language,
            Err(error) => {
                warn!(error = %error, "Could not detect the page language");
                None
            }
        }
    }
}
