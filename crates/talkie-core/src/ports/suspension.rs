//! Extension suspension port.

use async_trait::async_trait;

use super::PortError;

/// Port for keeping the background alive while speech is playing.
#[async_trait]
pub trait SuspensionControl: Send + Sync {
    async fn prevent_suspend(&self) -> Result<(), PortError>;

    async fn allow_suspend(&self) -> Result<(), PortError>;
}
