pub mod api;

use self::api::AppState;
use std::error::Error;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use log::info;

pub struct Server {
    addr: String,
    state: AppState,
}

impl Server {
    pub fn new(addr: String, state: AppState) -> Self {
        Self { addr, state }
    }

    pub async fn run(&self) -> Result<(), Box<dyn Error + Send + Sync>> {
        let addr = self.addr.parse::<SocketAddr>()?;
        let listener = TcpListener::bind(addr).await?;
        info!("HTTP server listening on: http://{}", addr);

        let app = api::router(self.state.clone());
        axum::serve(listener, app.into_make_service()).await?;

        Ok(())
    }
}
