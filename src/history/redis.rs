use async_trait::async_trait;
use crate::error::StorageError;
use crate::models::chat::{ ChatMessage, Conversation, Role };
use crate::history::HistoryStore;
use log::error;
use redis::{ Client, AsyncCommands };
use serde::{ Serialize, Deserialize };

#[derive(Serialize, Deserialize)]
struct StoredMessage {
    role: Role,
    content: String,
    timestamp: i64,
}

/// Turns an `LRANGE` result (newest first) into chronological messages,
/// skipping entries that do not parse.
fn decode_entries(user_id: &str, json_entries: Vec<String>) -> Vec<ChatMessage> {
    let mut messages: Vec<ChatMessage> = json_entries
        .iter()
        .filter_map(|json_entry| match serde_json::from_str::<StoredMessage>(json_entry) {
            Ok(msg) => Some(ChatMessage {
                user_id: user_id.to_string(),
                role: msg.role,
                content: msg.content,
                timestamp: msg.timestamp,
            }),
            Err(e) => {
                error!("Error parsing history entry for {}: {}", user_id, e);
                None
            }
        })
        .collect();
    messages.reverse();
    messages
}

/// One Redis list per user, newest message at the head.
pub struct RedisHistoryStore {
    client: Client,
    key_prefix: String,
}

impl RedisHistoryStore {
    pub fn new(host: &str, key_prefix: &str) -> Result<Self, StorageError> {
        Ok(Self {
            client: Client::open(host)?,
            key_prefix: key_prefix.to_string(),
        })
    }

    async fn get_connection(&self) -> Result<redis::aio::MultiplexedConnection, redis::RedisError> {
        self.client.get_multiplexed_async_connection().await
    }

    fn key(&self, user_id: &str) -> String {
        format!("{}{}", self.key_prefix, user_id)
    }
}

#[async_trait]
impl HistoryStore for RedisHistoryStore {
    async fn append(&self, messages: &[ChatMessage]) -> Result<(), StorageError> {
        if messages.is_empty() {
            return Ok(());
        }

        let mut pipe = redis::pipe();
        pipe.atomic();
        for message in messages {
            let stored = StoredMessage {
                role: message.role,
                content: message.content.clone(),
                timestamp: message.timestamp,
            };
            let json_msg = serde_json::to_string(&stored)?;
            pipe.lpush(self.key(&message.user_id), json_msg).ignore();
        }

        let mut conn = self.get_connection().await?;
        pipe.query_async::<_, ()>(&mut conn).await?;
        Ok(())
    }

    async fn get_conversation(
        &self,
        user_id: &str,
        limit: usize
    ) -> Result<Conversation, StorageError> {
        if limit == 0 {
            return Ok(Conversation::empty(user_id));
        }

        let mut conn = self.get_connection().await?;
        let json_entries: Vec<String> = conn.lrange(self.key(user_id), 0, (limit as isize) - 1).await?;

        Ok(Conversation {
            id: user_id.to_string(),
            messages: decode_entries(user_id, json_entries),
        })
    }

    async fn ping(&self) -> Result<(), StorageError> {
        let mut conn = self.get_connection().await?;
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }
}
