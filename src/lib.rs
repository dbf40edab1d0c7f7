pub mod cli;
pub mod error;
pub mod history;
pub mod llm;
pub mod messaging;
pub mod models;
pub mod relay;
pub mod server;

use cli::Args;
use history::initialize_history_store;
use llm::{ new_generator, LlmConfig };
use log::{ error, info };
use messaging::{ MessageSender, WhatsAppSender };
use relay::WebhookRelay;
use server::api::AppState;
use server::Server;
use std::error::Error;
use std::sync::Arc;

fn mask(secret: &str) -> &'static str {
    if secret.is_empty() { "<not set>" } else { "<set>" }
}

pub async fn run(args: Args) -> Result<(), Box<dyn Error + Send + Sync>> {
    info!("--- Core Configuration ---");
    info!("Server Address: {}", args.server_addr);
    info!("History Store Type: {}", args.history_type);
    info!("History Store Host: {}", args.history_host);
    info!("Chat Model: {}", args.chat_model);
    info!("Chat Base URL: {}", args.chat_base_url.as_deref().unwrap_or("provider default"));
    info!("Gemini API Key: {}", mask(&args.chat_api_key));
    info!("WhatsApp API Base: {}", args.whatsapp_api_base);
    info!("WhatsApp Phone Number Id: {}", args.whatsapp_phone_number_id);
    info!("WhatsApp Token: {}", mask(&args.whatsapp_token));
    info!("Webhook Verify Token: {}", mask(&args.webhook_verify_token));
    info!("-------------------------");

    let history_store = match initialize_history_store(&args).await {
        Ok(store) => store,
        Err(e) => {
            error!("Failed to connect to history store at {}: {}", args.history_host, e);
            return Err(e.into());
        }
    };

    let generator = new_generator(&LlmConfig {
        api_key: Some(args.chat_api_key.clone()).filter(|k| !k.is_empty()),
        completion_model: Some(args.chat_model.clone()),
        base_url: args.chat_base_url.clone(),
    });
    let sender: Arc<dyn MessageSender> = Arc::new(WhatsAppSender::from_args(&args));

    let relay = Arc::new(
        WebhookRelay::new(
            history_store,
            generator,
            Arc::clone(&sender),
            args.webhook_verify_token.clone()
        )
    );

    let server = Server::new(args.server_addr.clone(), AppState::new(relay, sender));
    server.run().await?;

    Ok(())
}
