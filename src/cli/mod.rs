use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    // --- History Store Args ---
    /// History chat store type (redis, memory)
    #[arg(long, env = "HISTORY_TYPE", default_value = "redis")]
    pub history_type: String,

    /// History chat store host endpoint (e.g., redis://127.0.0.1:6379)
    #[arg(long, env = "HISTORY_HOST", default_value = "redis://127.0.0.1:6379")]
    pub history_host: String,

    /// Prefix for Redis history keys.
    #[arg(long, env = "HISTORY_REDIS_PREFIX", default_value = "history:")]
    pub history_redis_prefix: String,

    // --- Chat LLM Provider Args ---
    /// API Key for the Gemini chat model. Left empty, every reply falls back.
    #[arg(long, env = "GEMINI_API_KEY", default_value = "")]
    pub chat_api_key: String,

    /// Model name for reply generation (e.g., gemini-2.5-flash)
    #[arg(long, env = "CHAT_MODEL", default_value = "gemini-2.5-flash")]
    pub chat_model: String,

    /// Base URL override for the Gemini API
    #[arg(long, env = "CHAT_BASE_URL")] // No default, let rllm use the public endpoint
    pub chat_base_url: Option<String>,

    // --- WhatsApp Args ---
    /// Secret expected in `hub.verify_token` when the platform verifies the webhook.
    #[arg(long, env = "WEBHOOK_VERIFY_TOKEN", default_value = "")]
    pub webhook_verify_token: String,

    /// Access token for the WhatsApp Cloud API.
    #[arg(long, env = "WHATSAPP_TOKEN", default_value = "")]
    pub whatsapp_token: String,

    /// Phone number id replies are sent from.
    #[arg(long, env = "WHATSAPP_PHONE_NUMBER_ID", default_value = "")]
    pub whatsapp_phone_number_id: String,

    /// Graph API base URL, including the version segment.
    #[arg(long, env = "WHATSAPP_API_BASE", default_value = "https://graph.facebook.com/v21.0")]
    pub whatsapp_api_base: String,

    // --- General App Args ---
    /// Host address and port for the server to listen on.
    #[arg(long, env = "SERVER_ADDR", default_value = "0.0.0.0:8558")]
    pub server_addr: String,

    /// Enable debug logging/output
    #[arg(long, env = "DEBUG", default_value = "false")]
    pub debug: bool,
}
