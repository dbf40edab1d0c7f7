pub mod gemini;

use async_trait::async_trait;
use log::{ error, warn };
use std::sync::Arc;
use crate::error::GenerationError;
use crate::models::chat::Conversation;
use self::gemini::GeminiReplyGenerator;

/// Sent back to the user whenever the model cannot produce a reply.
pub const FALLBACK_REPLY: &str = "Cannot generate reply";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Generated(String),
    Fallback,
}

impl Reply {
    pub fn text(&self) -> &str {
        match self {
            Reply::Generated(text) => text.as_str(),
            Reply::Fallback => FALLBACK_REPLY,
        }
    }
}

#[async_trait]
pub trait ReplyGenerator: Send + Sync {
    async fn try_generate(
        &self,
        message: &str,
        history: &Conversation
    ) -> Result<String, GenerationError>;

    /// Never fails: provider errors and blank output become `Reply::Fallback`.
    async fn generate_reply(&self, message: &str, history: &Conversation) -> Reply {
        match self.try_generate(message, history).await {
            Ok(text) if !text.trim().is_empty() => Reply::Generated(text),
            Ok(_) => {
                warn!("Chat model returned blank text for {}, using fallback reply", history.id);
                Reply::Fallback
            }
            Err(e) => {
                error!("Reply generation failed for {}: {}", history.id, e);
                Reply::Fallback
            }
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct LlmConfig {
    pub api_key: Option<String>,
    pub completion_model: Option<String>,
    pub base_url: Option<String>,
}

pub fn new_generator(config: &LlmConfig) -> Arc<dyn ReplyGenerator> {
    Arc::new(GeminiReplyGenerator::from_config(config))
}
