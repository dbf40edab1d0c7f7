use async_trait::async_trait;
use log::debug;
use serde::Serialize;

use super::MessageSender;
use crate::cli::Args;
use crate::error::DeliveryError;

#[derive(Serialize)]
struct OutboundText<'a> {
    messaging_product: &'static str,
    recipient_type: &'static str,
    to: &'a str,
    #[serde(rename = "type")]
    kind: &'static str,
    text: TextPayload<'a>,
}

#[derive(Serialize)]
struct TextPayload<'a> {
    preview_url: bool,
    body: &'a str,
}

/// Sends text messages through the WhatsApp Cloud API.
pub struct WhatsAppSender {
    client: reqwest::Client,
    api_base: String,
    phone_number_id: String,
    access_token: String,
}

impl WhatsAppSender {
    pub fn new(api_base: &str, phone_number_id: &str, access_token: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base: api_base.trim_end_matches('/').to_string(),
            phone_number_id: phone_number_id.to_string(),
            access_token: access_token.to_string(),
        }
    }

    pub fn from_args(args: &Args) -> Self {
        Self::new(&args.whatsapp_api_base, &args.whatsapp_phone_number_id, &args.whatsapp_token)
    }

    fn messages_url(&self) -> String {
        format!("{}/{}/messages", self.api_base, self.phone_number_id)
    }
}

#[async_trait]
impl MessageSender for WhatsAppSender {
    async fn try_send(&self, to: &str, text: &str) -> Result<(), DeliveryError> {
        if self.access_token.is_empty() {
            return Err(DeliveryError::NotConfigured("WHATSAPP_TOKEN is empty"));
        }
        if self.phone_number_id.is_empty() {
            return Err(DeliveryError::NotConfigured("WHATSAPP_PHONE_NUMBER_ID is empty"));
        }

        let payload = OutboundText {
            messaging_product: "whatsapp",
            recipient_type: "individual",
            to,
            kind: "text",
            text: TextPayload { preview_url: false, body: text },
        };

        let resp = self.client
            .post(self.messages_url())
            .bearer_auth(&self.access_token)
            .json(&payload)
            .send().await?;

        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        if !status.is_success() {
            return Err(DeliveryError::Rejected { status: status.as_u16(), body });
        }

        debug!("WhatsApp API accepted message for {}: {}", to, body);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_joins_base_and_phone_id() {
        let sender = WhatsAppSender::new("https://graph.facebook.com/v21.0/", "12345", "token");
        assert_eq!(sender.messages_url(), "https://graph.facebook.com/v21.0/12345/messages");
    }

    #[test]
    fn payload_matches_cloud_api_shape() {
        let payload = OutboundText {
            messaging_product: "whatsapp",
            recipient_type: "individual",
            to: "1555",
            kind: "text",
            text: TextPayload { preview_url: false, body: "hello" },
        };
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            serde_json::json!({
                "messaging_product": "whatsapp",
                "recipient_type": "individual",
                "to": "1555",
                "type": "text",
                "text": { "preview_url": false, "body": "hello" }
            })
        );
    }

    #[tokio::test]
    async fn missing_token_fails_without_request() {
        let sender = WhatsAppSender::new("http://127.0.0.1:9", "12345", "");
        assert!(matches!(
            sender.try_send("1555", "hello").await,
            Err(DeliveryError::NotConfigured(_))
        ));
        assert!(!sender.send_message("1555", "hello").await);
    }

    #[tokio::test]
    async fn unreachable_api_reports_failure() {
        let sender = WhatsAppSender::new("http://127.0.0.1:9", "12345", "token");
        assert!(!sender.send_message("1555", "hello").await);
    }
}
