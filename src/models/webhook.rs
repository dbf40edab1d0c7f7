//! Payloads exchanged with the WhatsApp Cloud API webhook.
//!
//! Only the fields the relay reads are modelled; everything else in the
//! envelope is ignored by serde.

use serde::{ Serialize, Deserialize };

/// Query of the `GET /webhook` subscription handshake.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebhookVerificationRequest {
    #[serde(rename = "hub.mode", alias = "mode", default)]
    pub mode: String,
    #[serde(rename = "hub.verify_token", alias = "verify_token", default)]
    pub verify_token: String,
    #[serde(rename = "hub.challenge", alias = "challenge", default)]
    pub challenge: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WebhookVerificationResponse {
    pub status: bool,
    pub challenge: String,
}

impl WebhookVerificationResponse {
    pub fn accepted(challenge: &str) -> Self {
        Self { status: true, challenge: challenge.to_string() }
    }

    pub fn rejected() -> Self {
        Self { status: false, challenge: String::new() }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebhookNotification {
    pub entry: Vec<Entry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Entry {
    pub changes: Vec<Change>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Change {
    pub value: ChangeValue,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChangeValue {
    #[serde(default)]
    pub contacts: Vec<Contact>,
    #[serde(default)]
    pub messages: Vec<InboundMessage>,
    #[serde(default)]
    pub statuses: Vec<StatusUpdate>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Contact {
    pub wa_id: String,
    #[serde(default)]
    pub profile: Option<Profile>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InboundMessage {
    pub from: String,
    #[serde(default)]
    pub text: Option<TextBody>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TextBody {
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StatusUpdate {
    #[serde(default)]
    pub id: Option<String>,
    pub status: String,
    #[serde(default)]
    pub recipient_id: Option<String>,
}

/// Text message extracted from a notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundText {
    pub sender_id: String,
    pub sender_name: String,
    pub text: String,
}

/// What a webhook delivery turned out to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    Message(InboundText),
    StatusUpdate(Vec<StatusUpdate>),
    Ignored(&'static str),
    Malformed(String),
}

impl WebhookNotification {
    /// Classifies the first change of the first entry, which is the only one
    /// WhatsApp populates for message and status events.
    pub fn classify(self) -> Notification {
        let Some(value) = self
            .entry
            .into_iter()
            .next()
            .and_then(|entry| entry.changes.into_iter().next())
            .map(|change| change.value)
        else {
            return Notification::Malformed("notification has no entry or change".to_string());
        };

        let Some(message) = value.messages.into_iter().next() else {
            if value.statuses.is_empty() {
                return Notification::Ignored("neither message nor status present");
            }
            return Notification::StatusUpdate(value.statuses);
        };

        let text = match message.text {
            Some(TextBody { body }) if !body.is_empty() => body,
            _ => return Notification::Ignored("message carries no text"),
        };

        let contact = value.contacts.into_iter().next();
        let sender_name = contact
            .as_ref()
            .and_then(|c| c.profile.as_ref())
            .map(|p| p.name.clone())
            .unwrap_or_default();
        let sender_id = contact.map(|c| c.wa_id).unwrap_or(message.from);

        Notification::Message(InboundText { sender_id, sender_name, text })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SendMessageRequest {
    pub to: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SendMessageResponse {
    pub success: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: serde_json::Value) -> Notification {
        serde_json::from_value::<WebhookNotification>(value).unwrap().classify()
    }

    #[test]
    fn text_message_uses_contact_identity() {
        let notification = parse(json!({
            "object": "whatsapp_business_account",
            "entry": [{
                "id": "WABA",
                "changes": [{
                    "field": "messages",
                    "value": {
                        "messaging_product": "whatsapp",
                        "contacts": [{ "wa_id": "1555", "profile": { "name": "Ana" } }],
                        "messages": [{ "from": "1555", "id": "wamid.1", "type": "text", "text": { "body": "hi" } }]
                    }
                }]
            }]
        }));

        assert_eq!(
            notification,
            Notification::Message(InboundText {
                sender_id: "1555".into(),
                sender_name: "Ana".into(),
                text: "hi".into(),
            })
        );
    }

    #[test]
    fn sender_falls_back_to_message_origin() {
        let notification = parse(json!({
            "entry": [{ "changes": [{ "value": {
                "messages": [{ "from": "1777", "type": "text", "text": { "body": "yo" } }]
            } }] }]
        }));

        match notification {
            Notification::Message(msg) => {
                assert_eq!(msg.sender_id, "1777");
                assert_eq!(msg.sender_name, "");
            }
            other => panic!("expected message, got {:?}", other),
        }
    }

    #[test]
    fn status_only_change_is_a_status_update() {
        let notification = parse(json!({
            "entry": [{ "changes": [{ "value": {
                "statuses": [{ "id": "wamid.1", "status": "delivered", "recipient_id": "1555" }]
            } }] }]
        }));

        assert!(matches!(notification, Notification::StatusUpdate(ref s) if s[0].status == "delivered"));
    }

    #[test]
    fn non_text_message_is_ignored() {
        let notification = parse(json!({
            "entry": [{ "changes": [{ "value": {
                "contacts": [{ "wa_id": "1555" }],
                "messages": [{ "from": "1555", "type": "image" }]
            } }] }]
        }));

        assert!(matches!(notification, Notification::Ignored(_)));
    }

    #[test]
    fn whitespace_text_is_still_a_message() {
        let notification = parse(json!({
            "entry": [{ "changes": [{ "value": {
                "contacts": [{ "wa_id": "1555" }],
                "messages": [{ "from": "1555", "type": "text", "text": { "body": "  " } }]
            } }] }]
        }));
        assert!(matches!(notification, Notification::Message(ref m) if m.text == "  "));

        let empty = parse(json!({
            "entry": [{ "changes": [{ "value": {
                "messages": [{ "from": "1555", "type": "text", "text": { "body": "" } }]
            } }] }]
        }));
        assert!(matches!(empty, Notification::Ignored(_)));
    }

    #[test]
    fn empty_value_is_ignored() {
        let notification = parse(json!({ "entry": [{ "changes": [{ "value": {} }] }] }));
        assert!(matches!(notification, Notification::Ignored(_)));
    }

    #[test]
    fn missing_changes_is_malformed() {
        let notification = parse(json!({ "entry": [] }));
        assert!(matches!(notification, Notification::Malformed(_)));
    }

    #[test]
    fn verification_query_accepts_hub_and_bare_keys() {
        let hub: WebhookVerificationRequest = serde_json::from_value(json!({
            "hub.mode": "subscribe", "hub.verify_token": "t", "hub.challenge": "42"
        })).unwrap();
        let bare: WebhookVerificationRequest = serde_json::from_value(json!({
            "mode": "subscribe", "verify_token": "t", "challenge": "42"
        })).unwrap();

        for req in [hub, bare] {
            assert_eq!(req.mode, "subscribe");
            assert_eq!(req.verify_token, "t");
            assert_eq!(req.challenge, "42");
        }
    }
}
