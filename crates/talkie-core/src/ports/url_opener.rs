//! URL opening port.

use async_trait::async_trait;

use super::PortError;

/// Port for opening links in the browser.
#[async_trait]
pub trait UrlOpener: Send + Sync {
    async fn open_url_in_new_tab(&self, url: &str) -> Result<(), PortError>;
}
