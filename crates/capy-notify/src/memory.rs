//! In-process notification host.
//!
//! Used as the fallback when no session bus is reachable: notifications are
//! written to the log and kept in memory instead of shown on screen. Also
//! makes the pipeline observable in tests.

use crate::error::NotifyError;
use crate::host::{ChannelHost, DisplayHost};
use crate::types::{ChannelDescriptor, NotificationRecord};
use log::info;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// A host call, in the order the host received it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HostCall {
    CreateChannel(String),
    Display(u32),
}

#[derive(Default)]
struct State {
    channels: BTreeMap<String, ChannelDescriptor>,
    visible: Vec<NotificationRecord>,
    calls: Vec<HostCall>,
}

pub struct MemoryHost {
    state: Mutex<State>,
    requires_registration: AtomicBool,
    fail_registration: AtomicBool,
    fail_display: AtomicBool,
}

impl Default for MemoryHost {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryHost {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State::default()),
            requires_registration: AtomicBool::new(true),
            fail_registration: AtomicBool::new(false),
            fail_display: AtomicBool::new(false),
        }
    }

    pub fn set_requires_registration(&self, value: bool) {
        self.requires_registration.store(value, Ordering::SeqCst);
    }

    /// Make `create_channel` fail as an unsupported host would.
    pub fn set_fail_registration(&self, value: bool) {
        self.fail_registration.store(value, Ordering::SeqCst);
    }

    /// Make `display` fail as if permission was not granted.
    pub fn set_fail_display(&self, value: bool) {
        self.fail_display.store(value, Ordering::SeqCst);
    }

    /// Registered channels, sorted by id.
    pub fn channels(&self) -> Vec<ChannelDescriptor> {
        self.state().channels.values().cloned().collect()
    }

    pub fn channel(&self, id: &str) -> Option<ChannelDescriptor> {
        self.state().channels.get(id).cloned()
    }

    /// Currently visible notifications, oldest first.
    pub fn visible(&self) -> Vec<NotificationRecord> {
        self.state().visible.clone()
    }

    pub fn calls(&self) -> Vec<HostCall> {
        self.state().calls.clone()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ChannelHost for MemoryHost {
    fn requires_channel_registration(&self) -> bool {
        self.requires_registration.load(Ordering::SeqCst)
    }

    fn create_channel(&self, channel: &ChannelDescriptor) -> Result<(), NotifyError> {
        if self.fail_registration.load(Ordering::SeqCst) {
            return Err(NotifyError::Unsupported);
        }

        let mut state = self.state();
        state.calls.push(HostCall::CreateChannel(channel.id.clone()));
        state
            .channels
            .entry(channel.id.clone())
            .or_insert_with(|| channel.clone());
        Ok(())
    }
}

impl DisplayHost for MemoryHost {
    fn display(&self, record: &NotificationRecord) -> Result<(), NotifyError> {
        if self.fail_display.load(Ordering::SeqCst) {
            return Err(NotifyError::PermissionDenied);
        }

        info!(
            "[{}] {}: {}",
            record.channel_id, record.title, record.body
        );

        let mut state = self.state();
        state.calls.push(HostCall::Display(record.id));
        match state.visible.iter_mut().find(|r| r.id == record.id) {
            Some(existing) => *existing = record.clone(),
            None => state.visible.push(record.clone()),
        }
        Ok(())
    }
}
