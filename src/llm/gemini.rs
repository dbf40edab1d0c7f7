use async_trait::async_trait;
use log::{ info, warn };

use super::{ LlmConfig, ReplyGenerator };
use crate::error::GenerationError;
use crate::models::chat::{ Conversation, Role };
use rllm::chat::{ ChatMessage, ChatRole, MessageType };
use rllm::builder::{ LLMBackend, LLMBuilder };
use rllm::LLMProvider;

const DEFAULT_MODEL: &str = "gemini-2.5-flash";

pub struct GeminiReplyGenerator {
    // `None` when the provider could not be built, e.g. without an API key.
    llm: Option<Box<dyn LLMProvider>>,
    model: String,
    base_url: Option<String>,
}

impl GeminiReplyGenerator {
    pub fn new(api_key: Option<String>, model: Option<String>, base_url: Option<String>) -> Self {
        let chat_model = model.unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let llm = match api_key.filter(|k| !k.trim().is_empty()) {
            Some(key) => {
                let mut builder = LLMBuilder::new()
                    .backend(LLMBackend::Google)
                    .api_key(key)
                    .model(&chat_model)
                    .stream(false);

                if let Some(url) = &base_url {
                    builder = builder.base_url(url);
                }

                match builder.build() {
                    Ok(provider) => Some(provider),
                    Err(e) => {
                        warn!("Failed to build Gemini provider, replies will fall back: {}", e);
                        None
                    }
                }
            }
            None => {
                warn!("GEMINI_API_KEY is not set, replies will fall back");
                None
            }
        };

        Self { llm, model: chat_model, base_url }
    }

    pub fn from_config(config: &LlmConfig) -> Self {
        Self::new(config.api_key.clone(), config.completion_model.clone(), config.base_url.clone())
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

/// Prior turns followed by the new user message.
fn build_messages(message: &str, history: &Conversation) -> Vec<ChatMessage> {
    history
        .messages
        .iter()
        .map(|turn| (turn.role, turn.content.clone()))
        .chain(std::iter::once((Role::User, message.to_string())))
        .map(|(role, content)| ChatMessage {
            role: match role {
                Role::User => ChatRole::User,
                Role::Model => ChatRole::Assistant,
            },
            content,
            message_type: MessageType::Text,
        })
        .collect()
}

#[async_trait]
impl ReplyGenerator for GeminiReplyGenerator {
    async fn try_generate(
        &self,
        message: &str,
        history: &Conversation
    ) -> Result<String, GenerationError> {
        let llm = self.llm
            .as_ref()
            .ok_or_else(|| GenerationError::NotConfigured("Gemini provider unavailable".into()))?;

        let messages = build_messages(message, history);
        info!(
            "GeminiReplyGenerator::try_generate() → model={} base_url={:?} turns={}",
            self.model,
            self.base_url,
            messages.len()
        );

        let resp = llm.chat(&messages).await.map_err(|e| GenerationError::Provider(e.to_string()))?;
        resp.text().ok_or(GenerationError::EmptyResponse)
    }
}
