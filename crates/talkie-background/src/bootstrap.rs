//! Composition root for the background.
//!
//! Builds every component over the host ports, registers the lifecycle
//! listeners and the command map, and returns the [`TalkieApp`] handle the
//! host calls into.

use std::sync::Arc;
use std::time::Duration;

use talkie_core::{
    ActionButton, ContextMenuHost, EventKind, IconMode, LanguageDetector, LocaleProvider,
    PortError, Settings, SpeechEngine, SpeechEvent, SuspensionControl, TabChangeInfo, TabHost,
    TabId, UrlOpener, Voice, VoiceDescriptor,
};
use tokio::sync::watch;
use tracing::info;

use crate::background::Background;
use crate::broadcaster::Broadcaster;
use crate::chain::Chain;
use crate::commands::{
    CommandHandler, CommandMap, CommandName, ContextMenuClick, ContextMenuManager,
    ShortcutKeyManager,
};
use crate::error::{BackgroundError, CommandError, SpeakerError};
use crate::observers::{
    ButtonPopupManager, IconManager, ProgressSnapshot, SuspensionManager, TalkieProgress,
};
use crate::speaker::{Speaker, SpeakerConfig};
use crate::speaking_status::SpeakingStatus;

/// Host capabilities the background is built over.
pub struct Ports {
    pub engine: Arc<dyn SpeechEngine>,
    pub tab_host: Arc<dyn TabHost>,
    pub language_detector: Arc<dyn LanguageDetector>,
    pub action_button: Arc<dyn ActionButton>,
    pub suspension: Arc<dyn SuspensionControl>,
    pub url_opener: Arc<dyn UrlOpener>,
    pub context_menu_host: Arc<dyn ContextMenuHost>,
    pub locale: Arc<dyn LocaleProvider>,
}

/// Handle to a running background.
pub struct TalkieApp {
    broadcaster: Arc<Broadcaster>,
    background: Background,
    shortcut_key_manager: ShortcutKeyManager,
    context_menu_manager: ContextMenuManager,
    command_handler: Arc<CommandHandler>,
    popup: Arc<ButtonPopupManager>,
    progress: Arc<TalkieProgress>,
}

/// Wire the background together.
///
/// Must be called from within a Tokio runtime.
pub fn build(settings: &Settings, ports: Ports) -> TalkieApp {
    let broadcaster = Arc::new(Broadcaster::new());
    let speaker = Arc::new(Speaker::new(
        ports.engine,
        ports.tab_host.clone(),
        ports.language_detector,
        broadcaster.clone(),
        SpeakerConfig::from(settings),
    ));
    let speaking_status = Arc::new(SpeakingStatus::new(ports.tab_host.clone()));
    let background = Background::new(
        Arc::new(Chain::new()),
        speaker,
        speaking_status.clone(),
        ports.tab_host,
        ports.locale.clone(),
    );

    let icon = IconManager::new(
        ports.action_button.clone(),
        Duration::from_millis(settings.icon_update_delay_ms),
    );
    let popup = Arc::new(ButtonPopupManager::new(ports.action_button));
    let suspension = Arc::new(SuspensionManager::new(ports.suspension));
    let progress = Arc::new(TalkieProgress::new());

    register_speaking_status(&broadcaster, &speaking_status);
    register_icon(&broadcaster, &icon);
    register_popup(&broadcaster, &popup);
    register_suspension(&broadcaster, &suspension);
    register_progress(&broadcaster, &progress);

    let command_handler = Arc::new(CommandHandler::new(command_map(
        settings,
        &background,
        &ports.url_opener,
    )));
    let shortcut_key_manager = ShortcutKeyManager::new(command_handler.clone());
    let context_menu_manager = ContextMenuManager::new(
        command_handler.clone(),
        ports.context_menu_host,
        ports.locale,
    );

    info!("Background ready");

    TalkieApp {
        broadcaster,
        background,
        shortcut_key_manager,
        context_menu_manager,
        command_handler,
        popup,
        progress,
    }
}

fn register_speaking_status(broadcaster: &Broadcaster, status: &Arc<SpeakingStatus>) {
    let on_start = status.clone();
    broadcaster.register_listening_action(EventKind::BeforeSpeaking, move |_| {
        let status = on_start.clone();
        async move {
            status.set_active_tab_as_speaking().await;
            Ok(())
        }
    });

    let on_done = status.clone();
    broadcaster.register_listening_action(EventKind::AfterSpeaking, move |_| {
        let status = on_done.clone();
        async move {
            status.set_active_tab_is_done_speaking().await;
            Ok(())
        }
    });
}

fn register_icon(broadcaster: &Broadcaster, icon: &IconManager) {
    for (kind, mode) in [
        (EventKind::BeforeSpeaking, IconMode::Playing),
        (EventKind::AfterSpeaking, IconMode::Stopped),
    ] {
        let icon = icon.clone();
        broadcaster.register_listening_action(kind, move |_| {
            drop(icon.schedule(mode));
            async { Ok::<(), anyhow::Error>(()) }
        });
    }
}

fn register_popup(broadcaster: &Broadcaster, popup: &Arc<ButtonPopupManager>) {
    let on_start = popup.clone();
    broadcaster.register_listening_action(EventKind::BeforeSpeaking, move |_| {
        let popup = on_start.clone();
        async move { popup.disable_popup().await.map_err(anyhow::Error::from) }
    });

    let on_done = popup.clone();
    broadcaster.register_listening_action(EventKind::AfterSpeaking, move |_| {
        let popup = on_done.clone();
        async move { popup.enable_popup().await.map_err(anyhow::Error::from) }
    });
}

fn register_suspension(broadcaster: &Broadcaster, suspension: &Arc<SuspensionManager>) {
    let on_start = suspension.clone();
    broadcaster.register_listening_action(EventKind::BeforeSpeaking, move |_| {
        let suspension = on_start.clone();
        async move {
            suspension
                .prevent_extension_suspend()
                .await
                .map_err(anyhow::Error::from)
        }
    });

    let on_done = suspension.clone();
    broadcaster.register_listening_action(EventKind::AfterSpeaking, move |_| {
        let suspension = on_done.clone();
        async move {
            suspension
                .allow_extension_suspend()
                .await
                .map_err(anyhow::Error::from)
        }
    });
}

fn register_progress(broadcaster: &Broadcaster, progress: &Arc<TalkieProgress>) {
    let on_event = progress.clone();
    let handler = move |event: SpeechEvent| {
        match &event {
            SpeechEvent::BeforeSpeaking { .. } => {
                on_event.reset_progress(0, event.text_length(), 0);
            }
            SpeechEvent::BeforeSpeakingPart { .. } => on_event.start_segment(event.text_length()),
            SpeechEvent::AfterSpeakingPart { .. } => on_event.end_segment(),
            SpeechEvent::AfterSpeaking => on_event.finish_progress(),
            SpeechEvent::StopSpeaking => {}
        }
        async { Ok::<(), anyhow::Error>(()) }
    };

    let handler = Arc::new(handler);
    for kind in [
        EventKind::BeforeSpeaking,
        EventKind::BeforeSpeakingPart,
        EventKind::AfterSpeakingPart,
        EventKind::AfterSpeaking,
    ] {
        let handler = handler.clone();
        broadcaster.register_listening_action(kind, move |event| handler(event));
    }
}

fn command_map(
    settings: &Settings,
    background: &Background,
    url_opener: &Arc<dyn UrlOpener>,
) -> CommandMap {
    let start_stop = background.clone();
    let start_text = background.clone();

    let mut map = CommandMap::new()
        .with(CommandName::StartStop, move |_| {
            let background = start_stop.clone();
            async move {
                background
                    .start_stop_speak_selection_on_page()
                    .await
                    .map_err(anyhow::Error::from)
            }
        })
        .with(CommandName::StartText, move |argument| {
            let background = start_text.clone();
            async move {
                let text = argument.ok_or(CommandError::MissingArgument(CommandName::StartText))?;
                background
                    .start_speaking_custom_text_detect_language(text)
                    .await?;
                Ok::<(), anyhow::Error>(())
            }
        });

    for (name, url) in [
        (CommandName::OpenWebsiteMain, &settings.websites.main),
        (
            CommandName::OpenWebsiteChromeWebStore,
            &settings.websites.chromewebstore,
        ),
        (CommandName::OpenWebsiteDonate, &settings.websites.donate),
    ] {
        let opener = url_opener.clone();
        let url = url.clone();
        map = map.with(name, move |_| {
            let opener = opener.clone();
            let url = url.clone();
            async move { opener.open_url_in_new_tab(&url).await.map_err(anyhow::Error::from) }
        });
    }

    map
}

impl TalkieApp {
    /// Put the action button into its idle state.
    pub async fn start(&self) -> Result<(), PortError> {
        self.popup.enable_popup().await
    }

    /// First install: create the context menus.
    pub async fn on_installed(&self) -> Result<(), PortError> {
        self.context_menu_manager.create_context_menus().await
    }

    pub fn background(&self) -> &Background {
        &self.background
    }

    pub fn broadcaster(&self) -> &Arc<Broadcaster> {
        &self.broadcaster
    }

    pub fn command_handler(&self) -> &Arc<CommandHandler> {
        &self.command_handler
    }

    pub fn subscribe_progress(&self) -> watch::Receiver<ProgressSnapshot> {
        self.progress.subscribe()
    }

    pub fn progress(&self) -> ProgressSnapshot {
        self.progress.snapshot()
    }

    pub fn is_speaking(&self) -> bool {
        self.background.speaking_status().is_speaking()
    }

    /// Action button clicked while the popup is disabled.
    pub async fn icon_click(&self) -> Result<(), BackgroundError> {
        self.background.start_stop_speak_selection_on_page().await
    }

    pub async fn on_command(&self, command: &str) -> Result<(), CommandError> {
        self.shortcut_key_manager.handler(command).await
    }

    pub async fn on_context_menu_click(
        &self,
        click: &ContextMenuClick,
    ) -> Result<(), CommandError> {
        self.context_menu_manager.context_menu_click_action(click).await
    }

    pub async fn on_tab_removed(&self, tab_id: TabId) -> Result<(), BackgroundError> {
        self.background.on_tab_removed_handler(tab_id).await
    }

    pub async fn on_tab_updated(
        &self,
        tab_id: TabId,
        change_info: &TabChangeInfo,
    ) -> Result<(), BackgroundError> {
        self.background
            .on_tab_updated_handler(tab_id, change_info)
            .await
    }

    pub async fn on_suspend(&self) -> Result<(), BackgroundError> {
        self.background.on_extension_suspend_handler().await
    }

    pub async fn get_all_voices_from_frontend(&self) -> Result<Vec<Voice>, SpeakerError> {
        self.background.speaker().get_all_voices().await
    }

    pub async fn stop_speak_from_frontend(&self) -> Result<(), BackgroundError> {
        self.background.stop_speaking_action().await
    }

    pub async fn start_speak_from_frontend(
        &self,
        text: String,
        voice: VoiceDescriptor,
    ) -> Result<(), BackgroundError> {
        self.background
            .start_speaking_text_in_voice_action(text, voice)
            .await
    }

    /// Wait for every queued speech flow to settle.
    pub async fn idle(&self) {
        self.background.idle().await;
    }
}
