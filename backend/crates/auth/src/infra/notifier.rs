//! Reset Notice Delivery
//!
//! - `HttpNotifier` posts the notice to an external messaging service
//! - `LogNotifier` only writes a log line (development, no provider configured)

use std::time::Duration;

use serde::Serialize;

use crate::domain::notifier::{NotifyError, PasswordResetNotifier, ResetNotice};

const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

// ============================================================================
// Log channel
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

impl PasswordResetNotifier for LogNotifier {
    async fn send_password_reset_notice(&self, notice: &ResetNotice) -> Result<(), NotifyError> {
        tracing::info!(
            to = %notice.to,
            code = %notice.code.masked(),
            expires_in_minutes = notice.expires_in_minutes,
            "Password reset notice (log channel)"
        );
        Ok(())
    }
}

// ============================================================================
// HTTP channel
// ============================================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MessagePayload<'a> {
    channel: &'static str,
    to: &'a str,
    name: &'a str,
    code: &'a str,
    expires_in_minutes: i64,
}

/// Delivers notices through `POST {base_url}/messages`
#[derive(Clone)]
pub struct HttpNotifier {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl HttpNotifier {
    pub fn new(base_url: &str, api_key: Option<String>) -> Result<Self, NotifyError> {
        let client = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(|e| NotifyError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: format!("{}/messages", base_url.trim_end_matches('/')),
            api_key,
        })
    }
}

impl PasswordResetNotifier for HttpNotifier {
    async fn send_password_reset_notice(&self, notice: &ResetNotice) -> Result<(), NotifyError> {
        let payload = MessagePayload {
            channel: "password_reset",
            to: notice.to.as_str(),
            name: notice.name.as_str(),
            code: notice.code.as_str(),
            expires_in_minutes: notice.expires_in_minutes,
        };

        let mut req = self.client.post(&self.endpoint).json(&payload);
        if let Some(key) = &self.api_key {
            req = req.bearer_auth(key);
        }

        let response = req
            .send()
            .await
            .map_err(|e| NotifyError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(NotifyError::Rejected {
                status: response.status().as_u16(),
            });
        }

        Ok(())
    }
}

// ============================================================================
// Runtime selection
// ============================================================================

/// Channel picked at startup from configuration
#[derive(Clone)]
pub enum DeliveryChannel {
    Http(HttpNotifier),
    Log(LogNotifier),
}

impl DeliveryChannel {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Http(_) => "http",
            Self::Log(_) => "log",
        }
    }
}

impl PasswordResetNotifier for DeliveryChannel {
    async fn send_password_reset_notice(&self, notice: &ResetNotice) -> Result<(), NotifyError> {
        match self {
            Self::Http(n) => n.send_password_reset_notice(notice).await,
            Self::Log(n) => n.send_password_reset_notice(notice).await,
        }
    }
}

// ============================================================================
// Test channel
// ============================================================================

/// Captures notices so tests can read the issued code
#[cfg(test)]
pub(crate) struct RecordingNotifier {
    sent: Option<tokio::sync::mpsc::UnboundedSender<ResetNotice>>,
}

#[cfg(test)]
impl RecordingNotifier {
    pub(crate) fn new() -> (Self, tokio::sync::mpsc::UnboundedReceiver<ResetNotice>) {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        (Self { sent: Some(tx) }, rx)
    }

    /// Every delivery fails
    pub(crate) fn failing() -> Self {
        Self { sent: None }
    }
}

#[cfg(test)]
impl PasswordResetNotifier for RecordingNotifier {
    async fn send_password_reset_notice(&self, notice: &ResetNotice) -> Result<(), NotifyError> {
        let tx = self
            .sent
            .as_ref()
            .ok_or_else(|| NotifyError::Transport("recording notifier is failing".to_string()))?;
        tx.send(notice.clone())
            .map_err(|e| NotifyError::Transport(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::{
        display_name::DisplayName, email::Email, reset_code::ResetCode,
    };

    fn notice() -> ResetNotice {
        ResetNotice {
            to: Email::new("jane@x.com").unwrap(),
            name: DisplayName::new("Jane Doe").unwrap(),
            code: ResetCode::from_db("123456"),
            expires_in_minutes: 15,
        }
    }

    #[tokio::test]
    async fn test_log_channel_always_succeeds() {
        let channel = DeliveryChannel::Log(LogNotifier);
        assert_eq!(channel.name(), "log");
        assert!(channel.send_password_reset_notice(&notice()).await.is_ok());
    }

    #[test]
    fn test_http_endpoint_joins_base() {
        let n = HttpNotifier::new("https://notify.example.com/", None).unwrap();
        assert_eq!(n.endpoint, "https://notify.example.com/messages");
    }

    #[test]
    fn test_payload_shape() {
        let n = notice();
        let payload = MessagePayload {
            channel: "password_reset",
            to: n.to.as_str(),
            name: n.name.as_str(),
            code: n.code.as_str(),
            expires_in_minutes: n.expires_in_minutes,
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["to"], "jane@x.com");
        assert_eq!(json["code"], "123456");
        assert_eq!(json["expiresInMinutes"], 15);
    }

    #[tokio::test]
    async fn test_recording_and_failing() {
        let (recorder, mut rx) = RecordingNotifier::new();
        recorder.send_password_reset_notice(&notice()).await.unwrap();
        assert_eq!(rx.recv().await.unwrap().code.as_str(), "123456");

        assert!(
            RecordingNotifier::failing()
                .send_password_reset_notice(&notice())
                .await
                .is_err()
        );
    }
}
