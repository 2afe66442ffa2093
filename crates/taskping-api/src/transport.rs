//! Mock push transport.
//!
//! A real implementation would speak the web-push protocol with VAPID
//! signing; this system deliberately ships only a transport seam and a mock
//! that logs the delivery.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use taskping_core::{NotificationAction, Result};

/// Payload fanned out to subscriptions by the push send endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PushPayload {
    pub title: String,
    pub body: String,
    pub icon: String,
    pub badge: String,
    pub data: Value,
    pub tag: String,
    pub require_interaction: bool,
    pub actions: Vec<NotificationAction>,
}

impl PushPayload {
    pub fn new(title: String, body: String, data: Option<Value>, tag: Option<String>) -> Self {
        Self {
            title,
            body,
            icon: "/icon-192.png".to_string(),
            badge: "/icon-192.png".to_string(),
            data: data.unwrap_or_else(|| Value::Object(Default::default())),
            tag: tag.unwrap_or_else(|| "default".to_string()),
            require_interaction: true,
            actions: vec![NotificationAction::view(), NotificationAction::dismiss()],
        }
    }
}

/// Delivery of one payload to one subscription endpoint.
#[async_trait]
pub trait PushTransport: Send + Sync {
    async fn send(&self, endpoint: &str, payload: &PushPayload) -> Result<()>;
}

/// Transport that logs the delivery and reports success.
pub struct MockPushTransport;

#[async_trait]
impl PushTransport for MockPushTransport {
    async fn send(&self, endpoint: &str, payload: &PushPayload) -> Result<()> {
        info!(endpoint, title = %payload.title, tag = %payload.tag, "mock push delivery");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_defaults() {
        let payload = PushPayload::new("Hi".to_string(), "Body".to_string(), None, None);
        assert_eq!(payload.tag, "default");
        assert_eq!(payload.icon, "/icon-192.png");
        assert!(payload.require_interaction);
        assert_eq!(payload.actions.len(), 2);

        let json = serde_json::to_string(&payload).unwrap();
        assert!(json.contains(r#""requireInteraction":true"#));
        assert!(json.contains(r#""action":"view""#));
    }

    #[tokio::test]
    async fn test_mock_transport_always_succeeds() {
        let payload = PushPayload::new("T".to_string(), "B".to_string(), None, None);
        assert!(MockPushTransport
            .send("https://push.example/a", &payload)
            .await
            .is_ok());
    }
}
