//! Host-side interfaces the pipeline talks to.

use crate::error::NotifyError;
use crate::types::{ChannelDescriptor, NotificationRecord};
use log::info;

/// Channel registration API provided by the host notification subsystem.
pub trait ChannelHost: Send + Sync {
    /// Whether the host needs channels registered before posting to them.
    fn requires_channel_registration(&self) -> bool;

    /// Register a channel. Must be a no-op for an already known id.
    fn create_channel(&self, channel: &ChannelDescriptor) -> Result<(), NotifyError>;
}

/// Display API provided by the host notification subsystem.
pub trait DisplayHost: Send + Sync {
    /// Show a notification now. A record whose id matches a still visible
    /// notification replaces it.
    fn display(&self, record: &NotificationRecord) -> Result<(), NotifyError>;
}

/// External collaborator that receives refreshed push tokens.
pub trait TokenForwarder: Send + Sync {
    fn forward(&self, token: &str) -> Result<(), NotifyError>;
}

/// Forwarder used when no registration backend is configured.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogTokenForwarder;

impl TokenForwarder for LogTokenForwarder {
    fn forward(&self, token: &str) -> Result<(), NotifyError> {
        info!("Push token refreshed ({} chars), no backend configured", token.len());
        Ok(())
    }
}
