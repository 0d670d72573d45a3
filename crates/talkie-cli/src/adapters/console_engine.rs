//! Simulated speech engine that "speaks" by printing.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use talkie_core::{EngineError, SpeechEngine, Voice, VoiceDescriptor};
use tokio::sync::oneshot;
use tracing::debug;

/// Prints each utterance and takes as long as reading it aloud would.
pub struct ConsoleEngine {
    voices: Vec<Voice>,
    chars_per_second: u32,
    interrupt: Mutex<Option<oneshot::Sender<()>>>,
}

impl ConsoleEngine {
    pub fn new(chars_per_second: u32) -> Self {
        Self {
            voices: builtin_voices(),
            chars_per_second: chars_per_second.max(1),
            interrupt: Mutex::new(None),
        }
    }

    fn duration_for(&self, text: &str) -> Duration {
        let chars = u64::try_from(text.chars().count()).unwrap_or(u64::MAX);
        Duration::from_millis(chars.saturating_mul(1000) / u64::from(self.chars_per_second))
    }

    fn interrupt_current(&self) -> bool {
        self.interrupt
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .is_some_and(|interrupt| interrupt.send(()).is_ok())
    }
}

fn builtin_voices() -> Vec<Voice> {
    let mut voices = vec![
        Voice::new("Samantha", "en-US"),
        Voice::new("Daniel", "en-GB"),
        Voice::new("Thomas", "fr-FR"),
        Voice::new("Anna", "de-DE"),
        Voice::new("Alva", "sv-SE"),
        Voice::new("Kyoko", "ja-JP"),
    ];
    for voice in &mut voices {
        voice.local_service = true;
    }
    voices[0].default = true;
    voices
}

#[async_trait]
impl SpeechEngine for ConsoleEngine {
    async fn speak(&self, text: &str, voice: &VoiceDescriptor) -> Result<(), EngineError> {
        let (interrupt, interrupted) = oneshot::channel();
        *self
            .interrupt
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(interrupt);

        let name = voice.name.as_deref().unwrap_or("default");
        println!("🔊 [{name}, {}] {text}", voice.lang);

        tokio::select! {
            _ = interrupted => debug!("Utterance interrupted"),
            () = tokio::time::sleep(self.duration_for(text)) => {}
        }
        Ok(())
    }

    async fn stop(&self) -> Result<(), EngineError> {
        if self.interrupt_current() {
            println!("⏹  stopped");
        }
        Ok(())
    }

    async fn list_voices(&self) -> Result<Vec<Voice>, EngineError> {
        Ok(self.voices.clone())
    }
}
