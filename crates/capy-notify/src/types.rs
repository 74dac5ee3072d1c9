//! Core types for capy-notify

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Identifier used for every presentation.
///
/// Reusing one id means each new push replaces the previous notification,
/// so at most one is visible at a time.
pub const DEFAULT_NOTIFICATION_ID: u32 = 0;

/// A push message as delivered by the host runtime.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PushEvent {
    pub title: Option<String>,
    pub body: Option<String>,
    /// Remaining message data, carried but never interpreted.
    pub payload: Map<String, Value>,
}

impl PushEvent {
    pub fn new(title: Option<String>, body: Option<String>) -> Self {
        Self {
            title,
            body,
            payload: Map::new(),
        }
    }
}

/// Importance of a notification channel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Importance {
    Low,
    #[default]
    Default,
    High,
}

impl Importance {
    pub fn from_str(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "low" => Importance::Low,
            "high" => Importance::High,
            _ => Importance::Default,
        }
    }

    /// Freedesktop `urgency` hint byte (0 low, 1 normal, 2 critical).
    pub fn urgency(&self) -> u8 {
        match self {
            Importance::Low => 0,
            Importance::Default => 1,
            Importance::High => 2,
        }
    }
}

impl From<String> for Importance {
    fn from(s: String) -> Self {
        Importance::from_str(&s)
    }
}

/// A named notification category registered with the host.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelDescriptor {
    /// Stable identifier; uniquely determines the descriptor.
    pub id: String,
    pub name: String,
    pub description: String,
    pub importance: Importance,
}

impl Default for ChannelDescriptor {
    fn default() -> Self {
        Self {
            id: "important_notifications".to_string(),
            name: "Important Notifications".to_string(),
            description: "Channel for important notifications".to_string(),
            importance: Importance::High,
        }
    }
}

/// Presentation settings shared by every notification.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationDefaults {
    /// Icon name or `file://` URI.
    pub icon: String,
    /// Dismiss the notification once the user activates it.
    pub auto_dismiss: bool,
}

impl Default for NotificationDefaults {
    fn default() -> Self {
        Self {
            icon: "capy-push".to_string(),
            auto_dismiss: true,
        }
    }
}

/// A notification ready to hand to the display host.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NotificationRecord {
    pub id: u32,
    pub title: String,
    pub body: String,
    pub icon: String,
    pub auto_dismiss: bool,
    pub channel_id: String,
}

impl NotificationRecord {
    /// Build a record from a push event. Missing fields become empty strings.
    pub fn from_event(
        event: PushEvent,
        id: u32,
        channel_id: &str,
        defaults: &NotificationDefaults,
    ) -> Self {
        Self {
            id,
            title: event.title.unwrap_or_default(),
            body: event.body.unwrap_or_default(),
            icon: defaults.icon.clone(),
            auto_dismiss: defaults.auto_dismiss,
            channel_id: channel_id.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_become_empty() {
        let defaults = NotificationDefaults::default();

        let record = NotificationRecord::from_event(
            PushEvent::new(None, Some("hello".to_string())),
            DEFAULT_NOTIFICATION_ID,
            "alerts",
            &defaults,
        );
        assert_eq!(record.title, "");
        assert_eq!(record.body, "hello");

        let record = NotificationRecord::from_event(
            PushEvent::default(),
            DEFAULT_NOTIFICATION_ID,
            "alerts",
            &defaults,
        );
        assert_eq!(record.title, "");
        assert_eq!(record.body, "");
        assert_eq!(record.channel_id, "alerts");
        assert_eq!(record.icon, "capy-push");
        assert!(record.auto_dismiss);
    }

    #[test]
    fn test_importance_urgency() {
        assert_eq!(Importance::Low.urgency(), 0);
        assert_eq!(Importance::Default.urgency(), 1);
        assert_eq!(Importance::High.urgency(), 2);
    }

    #[test]
    fn test_importance_from_str() {
        assert_eq!(Importance::from_str("HIGH"), Importance::High);
        assert_eq!(Importance::from_str("low"), Importance::Low);
        assert_eq!(Importance::from_str("whatever"), Importance::Default);
    }

    #[test]
    fn test_channel_descriptor_serde() {
        let json = r#"{"id":"news","name":"News","description":"Daily","importance":"LOW"}"#;
        let channel: ChannelDescriptor = serde_json::from_str(json).unwrap();
        assert_eq!(channel.id, "news");
        assert_eq!(channel.importance, Importance::Low);

        let partial: ChannelDescriptor = serde_json::from_str(r#"{"id":"news"}"#).unwrap();
        assert_eq!(partial.id, "news");
        assert_eq!(partial.importance, Importance::High);
    }
}
