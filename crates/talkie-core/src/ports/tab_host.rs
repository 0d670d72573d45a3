//! Tab/page host port.
//!
//! Everything the background needs to know about the browser's active tab:
//! whether the extension may run there, its selection, and its language.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{TabId, TextSelection};

/// Errors reported by the tab host.
#[derive(Debug, Error)]
pub enum TabHostError {
    /// There is no active tab to operate on.
    #[error("No active tab")]
    NoActiveTab,

    /// Script injection or page access failed.
    #[error("Page script failed: {0}")]
    ScriptFailed(String),

    /// The tab API is not available in this context.
    #[error("Tab host unavailable: {0}")]
    Unavailable(String),
}

/// Port for the browser's tab and page APIs.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TabHost: Send + Sync {
    /// The tab currently in foreground focus, if any.
    async fn active_tab(&self) -> Option<TabId>;

    /// Whether the extension can run scripts in the active tab.
    ///
    /// `false` for restricted pages (browser settings, web stores, ...).
    async fn can_run_in_tab(&self) -> bool;

    /// Whether the active tab shows one of the extension's own pages.
    async fn is_internal_page(&self) -> bool;

    /// Selected text in the active tab, with language hints, in document order.
    async fn read_selection(&self) -> Result<Vec<TextSelection>, TabHostError>;

    /// Language the browser detected for the active tab's page.
    async fn detect_page_language(&self) -> Result<Option<String>, TabHostError>;
}
