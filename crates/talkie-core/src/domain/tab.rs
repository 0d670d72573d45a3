//! Browser tab identity and change notifications.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a browser tab, as handed out by the host browser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TabId(pub i64);

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for TabId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// Page loading status reported with tab updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TabLoadStatus {
    Loading,
    Complete,
}

/// Properties of a tab that changed in an update notification.
///
/// Only the properties which actually changed are set; everything else is
/// `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabChangeInfo {
    /// New URL, if the tab navigated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// New loading status.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TabLoadStatus>,

    /// New page title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl TabChangeInfo {
    /// Change info for a navigation to `url`.
    pub fn navigated_to(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Self::default()
        }
    }

    /// Whether the update carries a URL change.
    #[must_use]
    pub const fn url_changed(&self) -> bool {
        self.url.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_changed() {
        assert!(TabChangeInfo::navigated_to("https://example.com/").url_changed());

        let title_only = TabChangeInfo {
            title: Some("New title".to_string()),
            ..Default::default()
        };
        assert!(!title_only.url_changed());
    }

    #[test]
    fn test_change_info_deserializes_partial_payload() {
        let info: TabChangeInfo = serde_json::from_str(r#"{"status":"loading"}"#).unwrap();
        assert_eq!(info.status, Some(TabLoadStatus::Loading));
        assert!(info.url.is_none());
    }
}
