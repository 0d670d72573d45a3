//! Speech sessions.
//!
//! The speaker splits text into segments, resolves a voice and drives the
//! engine one segment at a time, broadcasting lifecycle events as it goes.
//!
//! # Session lifecycle
//!
//! ```text
//! Idle ──speak──► Resolving ──voice ready──► SpeakingSegments ──done──► Idle
//!   ▲                 │                            │
//!   └─────────────────┴──────── stop_speaking ─────┘
//! ```
//!
//! Every flow captures a generation token from [`OnlyLastCaller`] and checks
//! it after each await. `stop_speaking` bumps the generation, so a superseded
//! flow emits nothing further and returns `Ok(())`.
//!
//! Exactly one `AfterSpeaking` follows each `BeforeSpeaking`: whichever of the
//! finishing flow or `stop_speaking` takes the speaking record emits it. The
//! session gate is held while the record changes and its event goes out, so
//! a new session's `BeforeSpeaking` never precedes the previous `AfterSpeaking`.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use talkie_core::voices::best_voice_for_language;
use talkie_core::{
    LanguageDetector, Settings, SpeechEngine, SpeechEvent, TabHost, TextSelection, Voice,
    VoiceDescriptor, split_into_segments,
};
use tracing::{debug, error, info, warn};

use crate::broadcaster::Broadcaster;
use crate::error::SpeakerError;
use crate::language::{has_markup_language, pick_language};
use crate::only_last_caller::{Generation, OnlyLastCaller};

/// Where a speaker is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeakerState {
    Idle,
    Resolving,
    SpeakingSegments,
}

/// Tunables for the speaker, taken from [`Settings`].
#[derive(Debug, Clone)]
pub struct SpeakerConfig {
    pub default_language: String,
    pub max_segment_chars: usize,
}

impl From<&Settings> for SpeakerConfig {
    fn from(settings: &Settings) -> Self {
        Self {
            default_language: settings.default_language.clone(),
            max_segment_chars: settings.max_segment_chars,
        }
    }
}

/// Drives the speech engine for one session at a time.
pub struct Speaker {
    engine: Arc<dyn SpeechEngine>,
    tab_host: Arc<dyn TabHost>,
    language_detector: Arc<dyn LanguageDetector>,
    broadcaster: Arc<Broadcaster>,
    only_last_caller: Arc<OnlyLastCaller>,
    config: SpeakerConfig,
    speaking: Mutex<Option<Generation>>,
    session_gate: tokio::sync::Mutex<()>,
    state: Mutex<SpeakerState>,
}

impl Speaker {
    pub fn new(
        engine: Arc<dyn SpeechEngine>,
        tab_host: Arc<dyn TabHost>,
        language_detector: Arc<dyn LanguageDetector>,
        broadcaster: Arc<Broadcaster>,
        config: SpeakerConfig,
    ) -> Self {
        Self {
            engine,
            tab_host,
            language_detector,
            broadcaster,
            only_last_caller: Arc::new(OnlyLastCaller::new()),
            config,
            speaking: Mutex::new(None),
            session_gate: tokio::sync::Mutex::new(()),
            state: Mutex::new(SpeakerState::Idle),
        }
    }

    pub fn state(&self) -> SpeakerState {
        *lock(&self.state)
    }

    /// Whether a session has emitted `BeforeSpeaking` without its
    /// `AfterSpeaking` yet.
    pub fn is_speaking(&self) -> bool {
        lock(&self.speaking).is_some()
    }

    /// Every voice the engine offers.
    pub async fn get_all_voices(&self) -> Result<Vec<Voice>, SpeakerError> {
        Ok(self.engine.list_voices().await?)
    }

    /// Speak `text` in exactly the given voice.
    pub async fn speak_text_in_voice(
        &self,
        text: &str,
        voice: &VoiceDescriptor,
    ) -> Result<(), SpeakerError> {
        let token = self.only_last_caller.current();
        let result = self.speak_guarded(text, voice, token).await;
        self.finish_flow(token);
        result
    }

    /// Speak `text` in the best voice the engine has for `language`.
    pub async fn speak_text_in_language(
        &self,
        text: &str,
        language: &str,
    ) -> Result<(), SpeakerError> {
        let token = self.only_last_caller.current();
        self.set_state(SpeakerState::Resolving);
        let voice = self.resolve_voice(language).await;
        let result = if self.only_last_caller.is_valid(token) {
            self.speak_guarded(text, &voice, token).await
        } else {
            debug!("Speech superseded while resolving voice");
            Ok(())
        };
        self.finish_flow(token);
        result
    }

    /// Read the selection from the active tab and speak it.
    ///
    /// The page's detected language is used as the fallback for selections
    /// without any other language hint.
    pub async fn speak_user_selection(&self) -> Result<(), SpeakerError> {
        let token = self.only_last_caller.current();
        self.set_state(SpeakerState::Resolving);
        let result = self.speak_user_selection_guarded(token).await;
        self.finish_flow(token);
        result
    }

    /// Speak each selection in turn, each in its own resolved language.
    ///
    /// All selections belong to one flow: a stop during any of them skips
    /// the rest.
    pub async fn detect_languages_and_speak_all_selections(
        &self,
        selections: &[TextSelection],
        fallback_language: Option<&str>,
    ) -> Result<(), SpeakerError> {
        let token = self.only_last_caller.current();
        self.set_state(SpeakerState::Resolving);
        let result = self
            .speak_selections_guarded(selections, fallback_language, token)
            .await;
        self.finish_flow(token);
        result
    }

    /// Resolve the speaking language of every non-blank selection, in order.
    pub async fn resolve_selection_languages(
        &self,
        selections: &[TextSelection],
        fallback_language: Option<&str>,
    ) -> Vec<String> {
        let mut languages = Vec::with_capacity(selections.len());
        for selection in selections.iter().filter(|selection| !selection.is_blank()) {
            languages.push(self.resolve_language(selection, fallback_language).await);
        }
        languages
    }

    /// Cancel whatever is being spoken or prepared.
    ///
    /// Always broadcasts `StopSpeaking`. If a session was in progress its
    /// `AfterSpeaking` follows. Calling this while idle is harmless.
    pub async fn stop_speaking(&self) -> Result<(), SpeakerError> {
        let generation = self.only_last_caller.increment_caller_id();
        debug!(generation, "Stopping speech");

        self.broadcaster
            .broadcast_event(SpeechEvent::StopSpeaking)
            .await;

        let stopped = self.engine.stop().await;

        {
            let _gate = self.session_gate.lock().await;
            let interrupted = lock(&self.speaking).take();
            self.set_state(SpeakerState::Idle);
            if let Some(session) = interrupted {
                info!(session, "Speech stopped");
                self.broadcaster
                    .broadcast_event(SpeechEvent::AfterSpeaking)
                    .await;
            }
        }

        stopped.map_err(|error| {
            error!(error = %error, "Speech engine failed to stop");
            SpeakerError::from(error)
        })
    }

    async fn speak_user_selection_guarded(&self, token: Generation) -> Result<(), SpeakerError> {
        let selections = self.tab_host.read_selection().await.map_err(|error| {
            warn!(error = %error, "Could not read the selection from the active tab");
            SpeakerError::from(error)
        })?;
        if !self.only_last_caller.is_valid(token) {
            return Ok(());
        }

        let page_language = match self.tab_host.detect_page_language().await {
            Ok(language) => language,
            Err(error) => {
                warn!(error = %error, "Could not detect the page language");
                None
            }
        };
        if !self.only_last_caller.is_valid(token) {
            return Ok(());
        }

        self.speak_selections_guarded(&selections, page_language.as_deref(), token)
            .await
    }

    async fn speak_selections_guarded(
        &self,
        selections: &[TextSelection],
        fallback_language: Option<&str>,
        token: Generation,
    ) -> Result<(), SpeakerError> {
        let speakable: Vec<&TextSelection> = selections
            .iter()
            .filter(|selection| !selection.is_blank())
            .collect();

        if speakable.is_empty() {
            info!("No text selected, nothing to speak");
            return Ok(());
        }

        debug!(selections = speakable.len(), "Speaking selections");

        for selection in speakable {
            if !self.only_last_caller.is_valid(token) {
                debug!("Speech superseded, skipping remaining selections");
                return Ok(());
            }

            self.set_state(SpeakerState::Resolving);
            let language = self.resolve_language(selection, fallback_language).await;
            let voice = self.resolve_voice(&language).await;
            if !self.only_last_caller.is_valid(token) {
                return Ok(());
            }

            self.speak_guarded(&selection.text, &voice, token).await?;
        }

        Ok(())
    }

    async fn resolve_language(
        &self,
        selection: &TextSelection,
        fallback_language: Option<&str>,
    ) -> String {
        let detected = if has_markup_language(selection) {
            None
        } else {
            self.language_detector
                .detect_text_language(&selection.text)
                .await
        };

        pick_language(
            selection,
            detected.as_deref(),
            fallback_language,
            &self.config.default_language,
        )
    }

    async fn resolve_voice(&self, language: &str) -> VoiceDescriptor {
        match self.engine.list_voices().await {
            Ok(voices) => best_voice_for_language(&voices, language).map_or_else(
                || {
                    debug!(language, "No matching voice, using the engine default");
                    VoiceDescriptor::for_language(language)
                },
                VoiceDescriptor::from,
            ),
            Err(error) => {
                warn!(language, error = %error, "Could not list voices, using the engine default");
                VoiceDescriptor::for_language(language)
            }
        }
    }

    /// Speak one text as one session. Emits nothing once `token` is stale.
    async fn speak_guarded(
        &self,
        text: &str,
        voice: &VoiceDescriptor,
        token: Generation,
    ) -> Result<(), SpeakerError> {
        let segments = split_into_segments(text, self.config.max_segment_chars);
        if segments.is_empty() {
            debug!("Text is empty, nothing to speak");
            return Ok(());
        }
        if !self.begin_session(text, token).await {
            return Ok(());
        }
        info!(
            chars = text.chars().count(),
            segments = segments.len(),
            lang = %voice.lang,
            voice = voice.name.as_deref().unwrap_or("default"),
            "Speaking text"
        );

        for segment in segments {
            if !self.only_last_caller.is_valid(token) {
                debug!("Speech superseded, skipping remaining segments");
                return Ok(());
            }

            self.broadcaster
                .broadcast_event(SpeechEvent::before_speaking_part(segment.clone()))
                .await;

            if !self.only_last_caller.is_valid(token) {
                debug!("Speech superseded while announcing a segment");
                return Ok(());
            }

            if let Err(error) = self.engine.speak(&segment, voice).await {
                if !self.only_last_caller.is_valid(token) {
                    // Interrupted by a stop; not a failure.
                    return Ok(());
                }
                error!(error = %error, "Speech engine failed, ending session");
                self.end_session(token).await;
                return Err(error.into());
            }

            if !self.only_last_caller.is_valid(token) {
                return Ok(());
            }

            self.broadcaster
                .broadcast_event(SpeechEvent::after_speaking_part(segment))
                .await;
        }

        self.end_session(token).await;
        Ok(())
    }

    /// Open a session for `token` unless it has been superseded.
    async fn begin_session(&self, text: &str, token: Generation) -> bool {
        let _gate = self.session_gate.lock().await;
        if !self.only_last_caller.is_valid(token) {
            return false;
        }

        if let Some(previous) = lock(&self.speaking).replace(token) {
            warn!(previous, session = token, "Session started while another was unfinished");
        }
        self.set_state(SpeakerState::SpeakingSegments);
        self.broadcaster
            .broadcast_event(SpeechEvent::before_speaking(text))
            .await;
        true
    }

    async fn end_session(&self, token: Generation) {
        let _gate = self.session_gate.lock().await;
        let owned = {
            let mut speaking = lock(&self.speaking);
            if *speaking == Some(token) {
                *speaking = None;
                true
            } else {
                false
            }
        };

        if owned {
            debug!(session = token, "Done speaking");
            self.broadcaster
                .broadcast_event(SpeechEvent::AfterSpeaking)
                .await;
        }
    }

    fn finish_flow(&self, token: Generation) {
        if self.only_last_caller.increment_if_current(token) {
            self.set_state(SpeakerState::Idle);
        }
    }

    fn set_state(&self, state: SpeakerState) {
        *lock(&self.state) = state;
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
