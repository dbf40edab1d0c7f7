use clap::Parser;
use dotenv::dotenv;
use std::error::Error;
use whatsapp_relay::cli::Args;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    dotenv().ok();
    let args = Args::parse();
    let default_level = if args.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    whatsapp_relay::run(args).await
}
