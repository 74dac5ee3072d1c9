//! Token forwarding to the registration backend.

use capy_notify::{NotifyError, TokenForwarder};
use log::{debug, warn};
use std::thread;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// POSTs refreshed tokens as `{"token": "..."}` to a backend URL.
///
/// The request runs on its own thread; `forward` only reports whether it
/// could be started. The outcome is logged, never retried.
pub struct HttpTokenForwarder {
    endpoint: String,
    agent: ureq::Agent,
}

impl HttpTokenForwarder {
    /// `endpoint` must be an `http://` or `https://` URL.
    pub fn new(endpoint: String) -> Result<Self, NotifyError> {
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            return Err(NotifyError::Forward(format!(
                "unsupported token endpoint '{}'",
                endpoint
            )));
        }

        let agent = ureq::AgentBuilder::new().timeout(REQUEST_TIMEOUT).build();
        Ok(Self { endpoint, agent })
    }
}

impl TokenForwarder for HttpTokenForwarder {
    fn forward(&self, token: &str) -> Result<(), NotifyError> {
        let body = token_body(token);
        let endpoint = self.endpoint.clone();
        let agent = self.agent.clone();

        thread::Builder::new()
            .name("token-forward".to_string())
            .spawn(move || {
                match agent
                    .post(&endpoint)
                    .set("Content-Type", "application/json")
                    .send_string(&body)
                {
                    Ok(response) => debug!("Token sent to {} ({})", endpoint, response.status()),
                    Err(e) => warn!("Token not sent to {}: {}", endpoint, e),
                }
            })?;

        Ok(())
    }
}

fn token_body(token: &str) -> String {
    serde_json::json!({ "token": token }).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_body_escapes() {
        assert_eq!(token_body("abc"), r#"{"token":"abc"}"#);
        assert_eq!(token_body("a\"b"), r#"{"token":"a\"b"}"#);
    }

    #[test]
    fn test_unreachable_endpoint_does_not_fail() {
        let forwarder = HttpTokenForwarder::new("http://127.0.0.1:9/tokens".to_string()).unwrap();
        assert!(forwarder.forward("abc").is_ok());
    }

    #[test]
    fn test_rejects_non_http_endpoint() {
        for endpoint in ["", "ftp://example.org/tokens", "localhost:9000"] {
            match HttpTokenForwarder::new(endpoint.to_string()) {
                Err(NotifyError::Forward(msg)) => assert!(msg.contains("unsupported")),
                Err(e) => panic!("unexpected error for '{}': {}", endpoint, e),
                Ok(_) => panic!("accepted '{}'", endpoint),
            }
        }
        assert!(HttpTokenForwarder::new("https://push.example.org/tokens".to_string()).is_ok());
    }
}
