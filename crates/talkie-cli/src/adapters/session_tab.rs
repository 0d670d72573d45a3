//! In-memory stand-in for the browser's active tab.

use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use talkie_core::{TabHost, TabHostError, TabId, TextSelection};

/// Kind of page at a URL, as far as the extension is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    /// A normal web page the extension may script.
    Normal,
    /// A page the browser forbids extensions to script.
    Restricted,
    /// One of the browser's own pages.
    Internal,
}

impl PageKind {
    pub fn of_url(url: &str) -> Self {
        const INTERNAL: [&str; 5] = [
            "chrome://",
            "chrome-extension://",
            "edge://",
            "about:",
            "view-source:",
        ];
        const RESTRICTED: [&str; 2] = [
            "https://chrome.google.com/webstore",
            "https://chromewebstore.google.com",
        ];

        if INTERNAL.iter().any(|prefix| url.starts_with(prefix)) {
            Self::Internal
        } else if RESTRICTED.iter().any(|prefix| url.starts_with(prefix))
            || !["http://", "https://", "file://"]
                .iter()
                .any(|scheme| url.starts_with(scheme))
        {
            Self::Restricted
        } else {
            Self::Normal
        }
    }
}

#[derive(Debug)]
struct Page {
    tab_id: Option<TabId>,
    url: String,
    selections: Vec<TextSelection>,
    language: Option<String>,
}

/// The single tab of a terminal session.
#[derive(Debug)]
pub struct SessionTab {
    page: Mutex<Page>,
}

impl Default for SessionTab {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionTab {
    pub fn new() -> Self {
        Self {
            page: Mutex::new(Page {
                tab_id: Some(TabId(1)),
                url: "https://example.org/".to_string(),
                selections: Vec::new(),
                language: None,
            }),
        }
    }

    pub fn tab_id(&self) -> Option<TabId> {
        self.lock().tab_id
    }

    pub fn url(&self) -> String {
        self.lock().url.clone()
    }

    /// Replace the selection with a single text.
    pub fn select(&self, selection: TextSelection) {
        self.lock().selections = vec![selection];
    }

    /// Add another selected range.
    pub fn add_selection(&self, selection: TextSelection) {
        self.lock().selections.push(selection);
    }

    pub fn clear_selection(&self) {
        self.lock().selections.clear();
    }

    pub fn set_page_language(&self, language: Option<String>) {
        self.lock().language = language;
    }

    /// Load `url` in the tab, dropping the selection.
    pub fn navigate(&self, url: impl Into<String>) {
        let mut page = self.lock();
        page.url = url.into();
        page.selections.clear();
        page.language = None;
    }

    /// Close the tab. Returns the id it had.
    pub fn close(&self) -> Option<TabId> {
        let mut page = self.lock();
        page.selections.clear();
        page.tab_id.take()
    }

    /// Open a fresh tab with the next id.
    pub fn open(&self, url: impl Into<String>) -> TabId {
        let mut page = self.lock();
        let next = TabId(page.tab_id.map_or(1, |TabId(id)| id) + 1);
        *page = Page {
            tab_id: Some(next),
            url: url.into(),
            selections: Vec::new(),
            language: None,
        };
        next
    }

    fn page_kind(&self) -> PageKind {
        PageKind::of_url(&self.lock().url)
    }

    fn lock(&self) -> MutexGuard<'_, Page> {
        self.page.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl TabHost for SessionTab {
    async fn active_tab(&self) -> Option<TabId> {
        self.tab_id()
    }

    async fn can_run_in_tab(&self) -> bool {
        self.tab_id().is_some() && self.page_kind() == PageKind::Normal
    }

    async fn is_internal_page(&self) -> bool {
        self.page_kind() == PageKind::Internal
    }

    async fn read_selection(&self) -> Result<Vec<TextSelection>, TabHostError> {
        let page = self.lock();
        if page.tab_id.is_none() {
            return Err(TabHostError::NoActiveTab);
        }
        Ok(page.selections.clone())
    }

    async fn detect_page_language(&self) -> Result<Option<String>, TabHostError> {
        Ok(self.lock().language.clone())
    }
}
