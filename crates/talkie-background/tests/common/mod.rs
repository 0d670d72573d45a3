//! Fake host ports shared by the integration tests.
//!
//! The fake engine records what it was asked to say and, when holding,
//! keeps each utterance "playing" until it is stopped or released.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use talkie_background::{Broadcaster, Ports, TalkieApp, build};
use talkie_core::{
    ActionButton, ContextMenuHost, ContextMenuItem, EngineError, EventKind, IconMode,
    NoopLanguageDetector, PortError, Settings, SpeechEngine, SpeechEvent, StaticLocale,
    SuspensionControl, TabHost, TabHostError, TabId, TextSelection, UrlOpener, Voice,
    VoiceDescriptor,
};
use tokio::sync::oneshot;

pub const NOTICE: &str = "Talkie cannot read text from this tab.";

// ── Speech engine ──────────────────────────────────────────────────

pub struct FakeEngine {
    voices: Vec<Voice>,
    hold: bool,
    delay: Duration,
    fail_on: Option<String>,
    spoken: Mutex<Vec<(String, VoiceDescriptor)>>,
    interrupt: Mutex<Option<oneshot::Sender<()>>>,
    stops: AtomicUsize,
}

impl FakeEngine {
    pub fn new() -> Self {
        Self {
            voices: Vec::new(),
            hold: false,
            delay: Duration::ZERO,
            fail_on: None,
            spoken: Mutex::new(Vec::new()),
            interrupt: Mutex::new(None),
            stops: AtomicUsize::new(0),
        }
    }

    /// Each utterance plays until stopped or released.
    pub fn holding(mut self) -> Self {
        self.hold = true;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_voices(mut self, voices: Vec<Voice>) -> Self {
        self.voices = voices;
        self
    }

    pub fn failing_on(mut self, text: impl Into<String>) -> Self {
        self.fail_on = Some(text.into());
        self
    }

    pub fn spoken_texts(&self) -> Vec<String> {
        self.spoken
            .lock()
            .unwrap()
            .iter()
            .map(|(text, _)| text.clone())
            .collect()
    }

    pub fn spoken_languages(&self) -> Vec<String> {
        self.spoken
            .lock()
            .unwrap()
            .iter()
            .map(|(_, voice)| voice.lang.clone())
            .collect()
    }

    pub fn spoken_count(&self) -> usize {
        self.spoken.lock().unwrap().len()
    }

    pub fn stop_count(&self) -> usize {
        self.stops.load(Ordering::SeqCst)
    }

    /// Let the current utterance finish normally.
    pub fn release(&self) {
        if let Some(interrupt) = self.interrupt.lock().unwrap().take() {
            let _ = interrupt.send(());
        }
    }
}

#[async_trait]
impl SpeechEngine for FakeEngine {
    async fn speak(&self, text: &str, voice: &VoiceDescriptor) -> Result<(), EngineError> {
        self.spoken
            .lock()
            .unwrap()
            .push((text.to_string(), voice.clone()));

        if self.fail_on.as_deref() == Some(text) {
            return Err(EngineError::Synthesis(format!("cannot say {text:?}")));
        }

        let (interrupt, interrupted) = oneshot::channel();
        *self.interrupt.lock().unwrap() = Some(interrupt);

        if self.hold {
            let _ = interrupted.await;
        } else {
            tokio::select! {
                _ = interrupted => {}
                () = tokio::time::sleep(self.delay) => {}
            }
        }
        Ok(())
    }

    async fn stop(&self) -> Result<(), EngineError> {
        self.stops.fetch_add(1, Ordering::SeqCst);
        self.release();
        Ok(())
    }

    async fn list_voices(&self) -> Result<Vec<Voice>, EngineError> {
        Ok(self.voices.clone())
    }
}

// ── Tab host ───────────────────────────────────────────────────────

pub struct FakeTabHost {
    active_tab: Mutex<Option<TabId>>,
    can_run: AtomicBool,
    internal: AtomicBool,
    selections: Mutex<Vec<TextSelection>>,
    page_language: Mutex<Option<String>>,
    selection_reads: AtomicUsize,
}

impl FakeTabHost {
    pub fn new() -> Self {
        Self {
            active_tab: Mutex::new(Some(TabId(1))),
            can_run: AtomicBool::new(true),
            internal: AtomicBool::new(false),
            selections: Mutex::new(Vec::new()),
            page_language: Mutex::new(None),
            selection_reads: AtomicUsize::new(0),
        }
    }

    pub fn with_selection(self, selection: TextSelection) -> Self {
        self.selections.lock().unwrap().push(selection);
        self
    }

    pub fn with_page_language(self, language: impl Into<String>) -> Self {
        *self.page_language.lock().unwrap() = Some(language.into());
        self
    }

    /// A tab the extension may not script, such as the web store.
    pub fn restricted(self) -> Self {
        self.can_run.store(false, Ordering::SeqCst);
        self
    }

    /// One of the browser's own pages.
    pub fn internal(self) -> Self {
        self.can_run.store(false, Ordering::SeqCst);
        self.internal.store(true, Ordering::SeqCst);
        self
    }

    pub fn set_active_tab(&self, tab: Option<TabId>) {
        *self.active_tab.lock().unwrap() = tab;
    }

    pub fn selection_reads(&self) -> usize {
        self.selection_reads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TabHost for FakeTabHost {
    async fn active_tab(&self) -> Option<TabId> {
        *self.active_tab.lock().unwrap()
    }

    async fn can_run_in_tab(&self) -> bool {
        self.can_run.load(Ordering::SeqCst)
    }

    async fn is_internal_page(&self) -> bool {
        self.internal.load(Ordering::SeqCst)
    }

    async fn read_selection(&self) -> Result<Vec<TextSelection>, TabHostError> {
        self.selection_reads.fetch_add(1, Ordering::SeqCst);
        Ok(self.selections.lock().unwrap().clone())
    }

    async fn detect_page_language(&self) -> Result<Option<String>, TabHostError> {
        Ok(self.page_language.lock().unwrap().clone())
    }
}

// ── Recording ports ────────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingButton {
    pub icon_modes: Mutex<Vec<IconMode>>,
    pub popup_states: Mutex<Vec<bool>>,
}

#[async_trait]
impl ActionButton for RecordingButton {
    async fn set_icon_mode(&self, mode: IconMode) -> Result<(), PortError> {
        self.icon_modes.lock().unwrap().push(mode);
        Ok(())
    }

    async fn enable_popup(&self) -> Result<(), PortError> {
        self.popup_states.lock().unwrap().push(true);
        Ok(())
    }

    async fn disable_popup(&self) -> Result<(), PortError> {
        self.popup_states.lock().unwrap().push(false);
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingSuspension {
    pub calls: Mutex<Vec<&'static str>>,
}

#[async_trait]
impl SuspensionControl for RecordingSuspension {
    async fn prevent_suspend(&self) -> Result<(), PortError> {
        self.calls.lock().unwrap().push("prevent");
        Ok(())
    }

    async fn allow_suspend(&self) -> Result<(), PortError> {
        self.calls.lock().unwrap().push("allow");
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingUrlOpener {
    pub opened: Mutex<Vec<String>>,
}

#[async_trait]
impl UrlOpener for RecordingUrlOpener {
    async fn open_url_in_new_tab(&self, url: &str) -> Result<(), PortError> {
        self.opened.lock().unwrap().push(url.to_string());
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingMenuHost {
    pub created: Mutex<Vec<ContextMenuItem>>,
}

#[async_trait]
impl ContextMenuHost for RecordingMenuHost {
    async fn create_item(&self, item: &ContextMenuItem) -> Result<(), PortError> {
        self.created.lock().unwrap().push(item.clone());
        Ok(())
    }
}

// ── Event log ──────────────────────────────────────────────────────

/// Records every broadcast event, in order.
#[derive(Clone, Default)]
pub struct EventLog {
    events: Arc<Mutex<Vec<SpeechEvent>>>,
}

impl EventLog {
    pub fn attach(broadcaster: &Broadcaster) -> Self {
        let log = Self::default();
        for kind in EventKind::ALL {
            let events = log.events.clone();
            broadcaster.register_listening_action(kind, move |event| {
                let events = events.clone();
                async move {
                    events.lock().unwrap().push(event);
                    Ok(())
                }
            });
        }
        log
    }

    pub fn events(&self) -> Vec<SpeechEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn kinds(&self) -> Vec<EventKind> {
        self.events().iter().map(SpeechEvent::kind).collect()
    }

    pub fn count(&self, kind: EventKind) -> usize {
        self.kinds().into_iter().filter(|k| *k == kind).count()
    }

    /// Every `BeforeSpeaking` is closed by exactly one `AfterSpeaking`
    /// before the next one opens.
    pub fn assert_sessions_balanced(&self) {
        let mut open = 0_i32;
        for kind in self.kinds() {
            match kind {
                EventKind::BeforeSpeaking => {
                    open += 1;
                    assert_eq!(open, 1, "overlapping sessions in {:?}", self.kinds());
                }
                EventKind::AfterSpeaking => {
                    open -= 1;
                    assert_eq!(open, 0, "unmatched AfterSpeaking in {:?}", self.kinds());
                }
                _ => {}
            }
        }
        assert_eq!(open, 0, "unfinished session in {:?}", self.kinds());
    }
}

// ── Harness ────────────────────────────────────────────────────────

pub fn test_settings() -> Settings {
    Settings {
        icon_update_delay_ms: 0,
        not_able_to_speak_message: NOTICE.to_string(),
        ..Settings::with_defaults()
    }
}

pub struct Harness {
    pub app: TalkieApp,
    pub engine: Arc<FakeEngine>,
    pub host: Arc<FakeTabHost>,
    pub button: Arc<RecordingButton>,
    pub suspension: Arc<RecordingSuspension>,
    pub opener: Arc<RecordingUrlOpener>,
    pub menus: Arc<RecordingMenuHost>,
    pub events: EventLog,
}

pub fn harness(engine: FakeEngine, host: FakeTabHost) -> Harness {
    harness_with_settings(engine, host, &test_settings())
}

pub fn harness_with_settings(
    engine: FakeEngine,
    host: FakeTabHost,
    settings: &Settings,
) -> Harness {
    let engine = Arc::new(engine);
    let host = Arc::new(host);
    let button = Arc::new(RecordingButton::default());
    let suspension = Arc::new(RecordingSuspension::default());
    let opener = Arc::new(RecordingUrlOpener::default());
    let menus = Arc::new(RecordingMenuHost::default());

    let app = build(
        settings,
        Ports {
            engine: engine.clone(),
            tab_host: host.clone(),
            language_detector: Arc::new(NoopLanguageDetector),
            action_button: button.clone(),
            suspension: suspension.clone(),
            url_opener: opener.clone(),
            context_menu_host: menus.clone(),
            locale: Arc::new(StaticLocale::from_settings(settings)),
        },
    );
    let events = EventLog::attach(app.broadcaster());

    Harness {
        app,
        engine,
        host,
        button,
        suspension,
        opener,
        menus,
        events,
    }
}

/// Poll `condition` until it holds, failing the test after five seconds.
pub async fn wait_until(mut condition: impl FnMut() -> bool) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while !condition() {
            tokio::time::sleep(Duration::from_millis(2)).await;
        }
    })
    .await
    .expect("condition not reached in time");
}
