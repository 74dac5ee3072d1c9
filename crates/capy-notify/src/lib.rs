//! capy-notify - Push event to desktop notification pipeline
//!
//! Flow per message: ensure the channel exists, build the record, display it.
//! - `listener` - host callback boundary (`PushListener`)
//! - `channel` / `presenter` - the two pipeline steps
//! - `dbus` - freedesktop notification daemon host
//! - `memory` - in-process host (fallback and tests)

pub mod channel;
pub mod dbus;
pub mod error;
pub mod host;
pub mod listener;
pub mod memory;
pub mod presenter;
pub mod types;

pub use channel::ChannelManager;
pub use dbus::{FreedesktopHost, FreedesktopOptions, ServerInfo};
pub use error::NotifyError;
pub use host::{ChannelHost, DisplayHost, LogTokenForwarder, TokenForwarder};
pub use listener::{EventListener, PushListener};
pub use memory::MemoryHost;
pub use presenter::NotificationPresenter;
pub use types::{
    ChannelDescriptor, DEFAULT_NOTIFICATION_ID, Importance, NotificationDefaults,
    NotificationRecord, PushEvent,
};
