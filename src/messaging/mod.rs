pub mod whatsapp;

use async_trait::async_trait;
use log::error;
use crate::error::DeliveryError;

pub use self::whatsapp::WhatsAppSender;

#[async_trait]
pub trait MessageSender: Send + Sync {
    async fn try_send(&self, to: &str, text: &str) -> Result<(), DeliveryError>;

    /// Delivers `text` to `to`, reporting only whether it went through.
    async fn send_message(&self, to: &str, text: &str) -> bool {
        match self.try_send(to, text).await {
            Ok(()) => true,
            Err(e) => {
                error!("Failed to deliver message to {}: {}", to, e);
                false
            }
        }
    }
}
