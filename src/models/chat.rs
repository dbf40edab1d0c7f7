use chrono::Utc;
use serde::{ Serialize, Deserialize };

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub user_id: String,
    pub role: Role,
    pub content: String,
    pub timestamp: i64,
}

impl ChatMessage {
    pub fn new(user_id: &str, role: Role, content: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            role,
            content: content.to_string(),
            timestamp: Utc::now().timestamp_millis(),
        }
    }

    pub fn user(user_id: &str, content: &str) -> Self {
        Self::new(user_id, Role::User, content)
    }

    pub fn model(user_id: &str, content: &str) -> Self {
        Self::new(user_id, Role::Model, content)
    }
}

/// Recent messages of one user, oldest first.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: String,
    pub messages: Vec<ChatMessage>,
}

impl Conversation {
    pub fn empty(id: &str) -> Self {
        Self {
            id: id.to_string(),
            messages: Vec::new(),
        }
    }
}
