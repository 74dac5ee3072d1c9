//! Inbound host events.
//!
//! The push bridge writes one JSON object per line:
//!
//! ```text
//! {"type":"message","notification":{"title":"A","body":"1"},"data":{"k":"v"}}
//! {"type":"token","token":"abc123"}
//! ```

use capy_notify::{PushEvent, PushListener};
use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct NotificationPayload {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum HostEvent {
    Message {
        #[serde(default)]
        notification: Option<NotificationPayload>,
        #[serde(default)]
        data: Map<String, Value>,
    },
    Token {
        token: String,
    },
}

impl HostEvent {
    pub fn parse(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }
}

/// Invoke the matching listener callback for one event.
pub fn dispatch(listener: &dyn PushListener, event: HostEvent) {
    match event {
        HostEvent::Message { notification, data } => {
            let notification = notification.unwrap_or_default();
            listener.on_message_received(PushEvent {
                title: notification.title,
                body: notification.body,
                payload: data,
            });
        }
        HostEvent::Token { token } => listener.on_token_refresh(&token),
    }
}
