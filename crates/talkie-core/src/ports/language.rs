//! Text language detection port.

use async_trait::async_trait;

/// Port for detecting the language of a piece of text.
#[async_trait]
pub trait LanguageDetector: Send + Sync {
    /// Best guess for the language of `text`, or `None` when unreliable.
    async fn detect_text_language(&self, text: &str) -> Option<String>;
}

/// A detector that never detects anything.
///
/// Used where no detector is available; language resolution then relies on
/// page hints and fallbacks only.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLanguageDetector;

#[async_trait]
impl LanguageDetector for NoopLanguageDetector {
    async fn detect_text_language(&self, _text: &str) -> Option<String> {
        None
    }
}
