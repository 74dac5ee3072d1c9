//! Channel assurance

use crate::host::ChannelHost;
use crate::types::ChannelDescriptor;
use log::{debug, warn};
use std::sync::Arc;

/// Makes sure a channel exists before anything is posted to it.
pub struct ChannelManager {
    host: Arc<dyn ChannelHost>,
}

impl ChannelManager {
    pub fn new(host: Arc<dyn ChannelHost>) -> Self {
        Self { host }
    }

    /// Register `channel` if the host requires explicit registration.
    ///
    /// Safe to call on every message; the host keeps the first registration
    /// of an id. Failures are logged and dropped.
    pub fn ensure_channel(&self, channel: &ChannelDescriptor) {
        if !self.host.requires_channel_registration() {
            debug!("Host has no channel registration, skipping '{}'", channel.id);
            return;
        }

        match self.host.create_channel(channel) {
            Ok(()) => debug!("Channel '{}' ensured", channel.id),
            Err(e) => warn!("Could not register channel '{}': {}", channel.id, e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryHost;
    use crate::types::Importance;

    fn channel(id: &str, name: &str, importance: Importance) -> ChannelDescriptor {
        ChannelDescriptor {
            id: id.to_string(),
            name: name.to_string(),
            description: String::new(),
            importance,
        }
    }

    #[test]
    fn test_ensure_channel_idempotent() {
        let host = Arc::new(MemoryHost::new());
        let manager = ChannelManager::new(host.clone());
        let alerts = channel("alerts", "Alerts", Importance::High);

        manager.ensure_channel(&alerts);
        let once = host.channels();
        manager.ensure_channel(&alerts);

        assert_eq!(host.channels(), once);
        assert_eq!(host.channels().len(), 1);
    }

    #[test]
    fn test_reregister_keeps_first_registration() {
        let host = Arc::new(MemoryHost::new());
        let manager = ChannelManager::new(host.clone());

        manager.ensure_channel(&channel("alerts", "Alerts", Importance::High));
        manager.ensure_channel(&channel("alerts", "Renamed", Importance::Low));

        let registered = host.channel("alerts").unwrap();
        assert_eq!(registered.name, "Alerts");
        assert_eq!(registered.importance, Importance::High);
    }

    #[test]
    fn test_gate_skips_registration() {
        let host = Arc::new(MemoryHost::new());
        host.set_requires_registration(false);
        let manager = ChannelManager::new(host.clone());

        manager.ensure_channel(&channel("alerts", "Alerts", Importance::High));

        assert!(host.channels().is_empty());
    }

    #[test]
    fn test_registration_failure_is_silent() {
        let host = Arc::new(MemoryHost::new());
        host.set_fail_registration(true);
        let manager = ChannelManager::new(host.clone());

        manager.ensure_channel(&channel("alerts", "Alerts", Importance::High));

        assert!(host.channels().is_empty());
    }
}
