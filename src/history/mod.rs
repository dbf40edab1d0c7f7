mod memory;
mod redis;

pub use self::memory::MemoryHistoryStore;
pub use self::redis::RedisHistoryStore;

use async_trait::async_trait;
use log::info;
use crate::cli::Args;
use crate::error::StorageError;
use std::sync::Arc;
use crate::models::chat::{ ChatMessage, Conversation };

/// Number of past messages handed to the model as context.
pub const HISTORY_FOR_PROMPT_LEN: usize = 5;

#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Persists a batch of messages in input order, all or nothing.
    async fn append(&self, messages: &[ChatMessage]) -> Result<(), StorageError>;

    /// Returns up to `limit` most recent messages of `user_id`, oldest first.
    async fn get_conversation(
        &self,
        user_id: &str,
        limit: usize
    ) -> Result<Conversation, StorageError>;

    async fn ping(&self) -> Result<(), StorageError>;

    async fn recent_history(&self, user_id: &str) -> Result<Conversation, StorageError> {
        self.get_conversation(user_id, HISTORY_FOR_PROMPT_LEN).await
    }
}

pub fn create_history_store(args: &Args) -> Result<Arc<dyn HistoryStore>, StorageError> {
    match args.history_type.to_lowercase().as_str() {
        "redis" => {
            let store = RedisHistoryStore::new(&args.history_host, &args.history_redis_prefix)?;
            Ok(Arc::new(store))
        }
        "memory" => Ok(Arc::new(MemoryHistoryStore::new())),
        _ => Err(StorageError::Unsupported(args.history_type.clone())),
    }
}

/// Builds the configured store and checks it is reachable.
pub async fn initialize_history_store(args: &Args) -> Result<Arc<dyn HistoryStore>, StorageError> {
    info!("Chat history will be stored in: {} at {}", args.history_type, args.history_host);
    let store = create_history_store(args)?;
    store.ping().await?;
    info!("History store reachable");
    Ok(store)
}
