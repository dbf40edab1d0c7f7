use crate::messaging::MessageSender;
use crate::models::webhook::{ SendMessageRequest, SendMessageResponse, WebhookVerificationRequest };
use crate::relay::WebhookRelay;
use std::sync::Arc;
use axum::{
    routing::{ get, post },
    Router,
    Json,
    body::Bytes,
    extract::{ State, Query },
    response::IntoResponse,
    http::StatusCode,
};
use serde_json::Value as JsonValue;
use tower_http::cors::{ Any, CorsLayer };
use log::{ info, warn };

/// Services shared by every request, built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub relay: Arc<WebhookRelay>,
    pub sender: Arc<dyn MessageSender>,
}

impl AppState {
    pub fn new(relay: Arc<WebhookRelay>, sender: Arc<dyn MessageSender>) -> Self {
        Self { relay, sender }
    }
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/send-message", post(send_message_handler))
        .route("/webhook", get(verify_webhook_handler).post(webhook_message_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .with_state(state)
}

async fn send_message_handler(
    State(state): State<AppState>,
    Json(req): Json<SendMessageRequest>,
) -> impl IntoResponse {
    let success = state.sender.send_message(&req.to, &req.message).await;
    let code = if success { StatusCode::OK } else { StatusCode::BAD_GATEWAY };
    (code, Json(SendMessageResponse { success }))
}

async fn verify_webhook_handler(
    State(state): State<AppState>,
    Query(req): Query<WebhookVerificationRequest>,
) -> impl IntoResponse {
    let result = state.relay.verify_webhook(&req);
    if result.status {
        (StatusCode::OK, result.challenge).into_response()
    } else {
        StatusCode::FORBIDDEN.into_response()
    }
}

// Always 200: the platform retries anything else.
async fn webhook_message_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> StatusCode {
    match serde_json::from_slice::<JsonValue>(&body) {
        Ok(payload) => {
            let handled = state.relay.handle_notification(&payload).await;
            info!("Webhook event processed (handled={})", handled);
        }
        Err(e) => warn!("Webhook body is not JSON: {}", e),
    }
    StatusCode::OK
}

async fn health_handler() -> &'static str {
    "OK"
}
