//! Entry point for host-delivered push callbacks.

use crate::channel::ChannelManager;
use crate::host::{ChannelHost, DisplayHost, LogTokenForwarder, TokenForwarder};
use crate::presenter::NotificationPresenter;
use crate::types::{
    ChannelDescriptor, DEFAULT_NOTIFICATION_ID, NotificationDefaults, NotificationRecord,
    PushEvent,
};
use log::{debug, error, warn};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

/// Callbacks the host runtime invokes. The host owns scheduling; each call
/// is independent and must return normally.
pub trait PushListener: Send + Sync {
    fn on_token_refresh(&self, token: &str);

    fn on_message_received(&self, event: PushEvent);
}

/// Dispatches push callbacks to channel assurance and presentation.
pub struct EventListener {
    channels: ChannelManager,
    presenter: NotificationPresenter,
    forwarder: Arc<dyn TokenForwarder>,
    channel: ChannelDescriptor,
    defaults: NotificationDefaults,
}

impl EventListener {
    /// Listener using one host for both channel registration and display.
    pub fn new<H>(host: Arc<H>) -> Self
    where
        H: ChannelHost + DisplayHost + 'static,
    {
        Self::from_parts(host.clone(), host)
    }

    pub fn from_parts(
        channel_host: Arc<dyn ChannelHost>,
        display_host: Arc<dyn DisplayHost>,
    ) -> Self {
        Self {
            channels: ChannelManager::new(channel_host),
            presenter: NotificationPresenter::new(display_host),
            forwarder: Arc::new(LogTokenForwarder),
            channel: ChannelDescriptor::default(),
            defaults: NotificationDefaults::default(),
        }
    }

    pub fn with_forwarder(mut self, forwarder: Arc<dyn TokenForwarder>) -> Self {
        self.forwarder = forwarder;
        self
    }

    /// Channel every notification is posted to.
    pub fn with_channel(mut self, channel: ChannelDescriptor) -> Self {
        self.channel = channel;
        self
    }

    pub fn with_defaults(mut self, defaults: NotificationDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn channel(&self) -> &ChannelDescriptor {
        &self.channel
    }

    fn deliver(&self, event: PushEvent) {
        self.channels.ensure_channel(&self.channel);

        let record = NotificationRecord::from_event(
            event,
            DEFAULT_NOTIFICATION_ID,
            &self.channel.id,
            &self.defaults,
        );
        self.presenter.present(&record);
    }
}

impl PushListener for EventListener {
    fn on_token_refresh(&self, token: &str) {
        let result = panic::catch_unwind(AssertUnwindSafe(|| self.forwarder.forward(token)));
        match result {
            Ok(Ok(())) => debug!("Token forwarded"),
            Ok(Err(e)) => warn!("Token forward failed: {}", e),
            Err(_) => error!("Token forwarder panicked"),
        }
    }

    fn on_message_received(&self, event: PushEvent) {
        if panic::catch_unwind(AssertUnwindSafe(|| self.deliver(event))).is_err() {
            error!("Push delivery panicked, message dropped");
        }
    }
}
