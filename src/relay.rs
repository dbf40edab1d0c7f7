use crate::error::RelayError;
use crate::history::HistoryStore;
use crate::llm::ReplyGenerator;
use crate::messaging::MessageSender;
use crate::models::chat::{ ChatMessage, Conversation };
use crate::models::webhook::{
    InboundText,
    Notification,
    WebhookNotification,
    WebhookVerificationRequest,
    WebhookVerificationResponse,
};

use log::{ debug, error, info, warn };
use serde::Deserialize;
use serde_json::Value as JsonValue;
use std::sync::Arc;

const SUBSCRIBE_MODE: &str = "subscribe";

pub fn parse_notification(payload: &JsonValue) -> Notification {
    match WebhookNotification::deserialize(payload) {
        Ok(notification) => notification.classify(),
        Err(e) => Notification::Malformed(e.to_string()),
    }
}

/// Turns inbound WhatsApp events into Gemini replies sent back to the user.
#[derive(Clone)]
pub struct WebhookRelay {
    history_store: Arc<dyn HistoryStore>,
    generator: Arc<dyn ReplyGenerator>,
    sender: Arc<dyn MessageSender>,
    verify_token: String,
}

impl WebhookRelay {
    pub fn new(
        history_store: Arc<dyn HistoryStore>,
        generator: Arc<dyn ReplyGenerator>,
        sender: Arc<dyn MessageSender>,
        verify_token: String
    ) -> Self {
        if verify_token.is_empty() {
            warn!("WEBHOOK_VERIFY_TOKEN is not set; webhook verification only accepts an empty token.");
        }
        Self { history_store, generator, sender, verify_token }
    }

    pub fn verify_webhook(&self, req: &WebhookVerificationRequest) -> WebhookVerificationResponse {
        if req.mode == SUBSCRIBE_MODE && req.verify_token == self.verify_token {
            info!("Webhook verification succeeded");
            return WebhookVerificationResponse::accepted(&req.challenge);
        }
        warn!("Webhook verification rejected (mode={:?})", req.mode);
        WebhookVerificationResponse::rejected()
    }

    /// Returns `false` only when the reply could not be delivered. Malformed
    /// payloads, status updates and storage failures are logged and count as
    /// handled.
    pub async fn handle_notification(&self, payload: &JsonValue) -> bool {
        match parse_notification(payload) {
            Notification::Malformed(reason) => {
                warn!("Ignoring malformed webhook payload: {}", reason);
                true
            }
            Notification::StatusUpdate(statuses) => {
                for status in &statuses {
                    debug!(
                        "Status update {:?} for message {:?} to {:?}",
                        status.status,
                        status.id,
                        status.recipient_id
                    );
                }
                true
            }
            Notification::Ignored(reason) => {
                debug!("Ignoring webhook event: {}", reason);
                true
            }
            Notification::Message(inbound) => {
                match self.relay_message(&inbound).await {
                    Ok(delivered) => delivered,
                    Err(e) => {
                        error!("Failed to relay message from {}: {}", inbound.sender_id, e);
                        true
                    }
                }
            }
        }
    }

    async fn relay_message(&self, inbound: &InboundText) -> Result<bool, RelayError> {
        info!("Relaying inbound message ({} chars)", inbound.text.len());
        debug!("Message from {} ({})", inbound.sender_id, inbound.sender_name);

        let history = match self.history_store.recent_history(&inbound.sender_id).await {
            Ok(history) => history,
            Err(e) => {
                warn!("History unavailable for {}, continuing without it: {}", inbound.sender_id, e);
                Conversation::empty(&inbound.sender_id)
            }
        };

        let reply = self.generator.generate_reply(&inbound.text, &history).await;

        self.history_store.append(
            &[
                ChatMessage::user(&inbound.sender_id, &inbound.text),
                ChatMessage::model(&inbound.sender_id, reply.text()),
            ]
        ).await?;

        Ok(self.sender.send_message(&inbound.sender_id, reply.text()).await)
    }
}
