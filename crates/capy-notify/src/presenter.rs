//! Notification presentation

use crate::host::DisplayHost;
use crate::types::NotificationRecord;
use log::{debug, warn};
use std::sync::Arc;

/// Hands finished records to the host display subsystem.
pub struct NotificationPresenter {
    host: Arc<dyn DisplayHost>,
}

impl NotificationPresenter {
    pub fn new(host: Arc<dyn DisplayHost>) -> Self {
        Self { host }
    }

    /// Request immediate display. Display failures are not retried or
    /// reported upward.
    pub fn present(&self, record: &NotificationRecord) {
        match self.host.display(record) {
            Ok(()) => debug!(
                "Presented notification {} on channel '{}'",
                record.id, record.channel_id
            ),
            Err(e) => warn!("Notification {} not shown: {}", record.id, e),
        }
    }
}
