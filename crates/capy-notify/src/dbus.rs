//! Freedesktop notification host
//!
//! Shows notifications through `org.freedesktop.Notifications` on the
//! session bus. The daemon has no notion of channels, so registered channels
//! are kept here and mapped onto the `urgency` and `category` hints.

use crate::error::NotifyError;
use crate::host::{ChannelHost, DisplayHost};
use crate::types::{ChannelDescriptor, Importance, NotificationRecord};
use log::{debug, info};
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError, RwLock};
use zbus::blocking::Connection;
use zbus::zvariant::Value;

/// Let the notification daemon pick the timeout.
pub const EXPIRE_DEFAULT: i32 = -1;

/// D-Bus proxy for the desktop notification daemon
#[zbus::proxy(
    interface = "org.freedesktop.Notifications",
    default_service = "org.freedesktop.Notifications",
    default_path = "/org/freedesktop/Notifications"
)]
trait Notifications {
    fn notify(
        &self,
        app_name: &str,
        replaces_id: u32,
        app_icon: &str,
        summary: &str,
        body: &str,
        actions: &[&str],
        hints: HashMap<&str, Value<'_>>,
        expire_timeout: i32,
    ) -> zbus::Result<u32>;

    fn get_capabilities(&self) -> zbus::Result<Vec<String>>;

    fn get_server_information(&self) -> zbus::Result<(String, String, String, String)>;
}

/// Settings for [`FreedesktopHost`].
#[derive(Clone, Debug)]
pub struct FreedesktopOptions {
    /// Sent as `app_name` with every notification.
    pub app_name: String,
    /// Desktop file id (without `.desktop`), used by daemons for grouping.
    pub desktop_entry: Option<String>,
    /// Milliseconds, or [`EXPIRE_DEFAULT`].
    pub expire_timeout: i32,
}

impl Default for FreedesktopOptions {
    fn default() -> Self {
        Self {
            app_name: "capy-push".to_string(),
            desktop_entry: None,
            expire_timeout: EXPIRE_DEFAULT,
        }
    }
}

/// Notification server identity as reported by the daemon.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ServerInfo {
    pub name: String,
    pub vendor: String,
    pub version: String,
    pub spec_version: String,
}

pub struct FreedesktopHost {
    proxy: NotificationsProxyBlocking<'static>,
    options: FreedesktopOptions,
    channels: RwLock<HashMap<String, ChannelDescriptor>>,
    server_ids: Mutex<ServerIds>,
}

/// Caller-assigned id -> id the daemon handed back for it.
#[derive(Debug, Default)]
struct ServerIds(HashMap<u32, u32>);

impl ServerIds {
    /// `replaces_id` for the next display of `id`; 0 asks for a new one.
    fn replaces_id(&self, id: u32) -> u32 {
        self.0.get(&id).copied().unwrap_or(0)
    }

    fn shown(&mut self, id: u32, server_id: u32) {
        self.0.insert(id, server_id);
    }
}

impl FreedesktopHost {
    /// Connect to the notification daemon on the session bus.
    pub fn connect(options: FreedesktopOptions) -> Result<Self, NotifyError> {
        let connection = Connection::session()?;
        let proxy = NotificationsProxyBlocking::new(&connection)?;

        Ok(Self {
            proxy,
            options,
            channels: RwLock::new(HashMap::new()),
            server_ids: Mutex::new(ServerIds::default()),
        })
    }

    pub fn server_information(&self) -> Result<ServerInfo, NotifyError> {
        let (name, vendor, version, spec_version) = self.proxy.get_server_information()?;
        Ok(ServerInfo {
            name,
            vendor,
            version,
            spec_version,
        })
    }

    pub fn capabilities(&self) -> Result<Vec<String>, NotifyError> {
        Ok(self.proxy.get_capabilities()?)
    }

    fn channel(&self, id: &str) -> Option<ChannelDescriptor> {
        self.channels
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
    }
}

impl ChannelHost for FreedesktopHost {
    fn requires_channel_registration(&self) -> bool {
        // Urgency comes from the registered channel.
        true
    }

    fn create_channel(&self, channel: &ChannelDescriptor) -> Result<(), NotifyError> {
        let mut channels = self.channels.write().unwrap_or_else(PoisonError::into_inner);
        if !channels.contains_key(&channel.id) {
            info!(
                "Registered channel '{}' ({}, {:?})",
                channel.id, channel.name, channel.importance
            );
            channels.insert(channel.id.clone(), channel.clone());
        }
        Ok(())
    }
}

impl DisplayHost for FreedesktopHost {
    fn display(&self, record: &NotificationRecord) -> Result<(), NotifyError> {
        let channel = self.channel(&record.channel_id);
        let hints = build_hints(
            record,
            channel.as_ref(),
            self.options.desktop_entry.as_deref(),
        );

        // Held across the call so the last display for an id always wins.
        let mut server_ids = self.server_ids.lock().unwrap_or_else(PoisonError::into_inner);
        let replaces_id = server_ids.replaces_id(record.id);

        let server_id = self.proxy.notify(
            &self.options.app_name,
            replaces_id,
            &record.icon,
            &record.title,
            &record.body,
            &[],
            hints,
            self.options.expire_timeout,
        )?;

        debug!(
            "Notification {} shown as server id {} (replaces {})",
            record.id, server_id, replaces_id
        );
        server_ids.shown(record.id, server_id);
        Ok(())
    }
}

/// Hints for a record. Unknown channels get normal urgency.
fn build_hints<'a>(
    record: &'a NotificationRecord,
    channel: Option<&ChannelDescriptor>,
    desktop_entry: Option<&'a str>,
) -> HashMap<&'static str, Value<'a>> {
    let importance = channel.map(|c| c.importance).unwrap_or(Importance::Default);

    let mut hints = HashMap::new();
    hints.insert("urgency", Value::from(importance.urgency()));
    hints.insert("category", Value::from(record.channel_id.as_str()));
    if !record.auto_dismiss {
        hints.insert("resident", Value::from(true));
    }
    if let Some(entry) = desktop_entry {
        hints.insert("desktop-entry", Value::from(entry));
    }
    hints
}
