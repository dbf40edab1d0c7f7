use async_trait::async_trait;
use crate::error::StorageError;
use crate::history::HistoryStore;
use crate::models::chat::{ ChatMessage, Conversation };
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Process-local history, lost on restart.
#[derive(Default)]
pub struct MemoryHistoryStore {
    conversations: RwLock<HashMap<String, Vec<ChatMessage>>>,
}

impl MemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HistoryStore for MemoryHistoryStore {
    async fn append(&self, messages: &[ChatMessage]) -> Result<(), StorageError> {
        let mut conversations = self.conversations.write().await;
        for message in messages {
            conversations
                .entry(message.user_id.clone())
                .or_default()
                .push(message.clone());
        }
        Ok(())
    }

    async fn get_conversation(
        &self,
        user_id: &str,
        limit: usize
    ) -> Result<Conversation, StorageError> {
        let conversations = self.conversations.read().await;
        let messages = conversations
            .get(user_id)
            .map(|all| all[all.len().saturating_sub(limit)..].to_vec())
            .unwrap_or_default();

        Ok(Conversation {
            id: user_id.to_string(),
            messages,
        })
    }

    async fn ping(&self) -> Result<(), StorageError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::chat::Role;

    fn contents(conversation: &Conversation) -> Vec<&str> {
        conversation.messages.iter().map(|m| m.content.as_str()).collect()
    }

    #[tokio::test]
    async fn unknown_user_has_empty_history() {
        let store = MemoryHistoryStore::new();
        let conversation = store.recent_history("ghost").await.unwrap();
        assert_eq!(conversation.id, "ghost");
        assert!(conversation.messages.is_empty());
    }

    #[tokio::test]
    async fn batch_is_returned_in_insertion_order() {
        let store = MemoryHistoryStore::new();
        store
            .append(&[ChatMessage::user("1555", "hi"), ChatMessage::model("1555", "hello")])
            .await
            .unwrap();

        let conversation = store.recent_history("1555").await.unwrap();
        assert_eq!(contents(&conversation), vec!["hi", "hello"]);
        assert_eq!(conversation.messages[0].role, Role::User);
        assert_eq!(conversation.messages[1].role, Role::Model);
    }

    #[tokio::test]
    async fn history_keeps_the_five_most_recent() {
        let store = MemoryHistoryStore::new();
        for i in 1..=5 {
            store.append(&[ChatMessage::user("1555", &format!("m{}", i))]).await.unwrap();
        }
        store.append(&[ChatMessage::model("1555", "m6")]).await.unwrap();

        let conversation = store.recent_history("1555").await.unwrap();
        assert_eq!(contents(&conversation), vec!["m2", "m3", "m4", "m5", "m6"]);
    }

    #[tokio::test]
    async fn users_do_not_share_history() {
        let store = MemoryHistoryStore::new();
        store
            .append(&[ChatMessage::user("a", "from a"), ChatMessage::user("b", "from b")])
            .await
            .unwrap();

        assert_eq!(contents(&store.recent_history("a").await.unwrap()), vec!["from a"]);
        assert_eq!(contents(&store.recent_history("b").await.unwrap()), vec!["from b"]);
    }
}
