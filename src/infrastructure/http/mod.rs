//! HTTP transport - webhook endpoints for the WhatsApp Cloud API

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::Instrument;
use uuid::Uuid;

use crate::application::errors::BotError;
use crate::application::AppContext;

/// Query sent by Meta when subscribing the webhook
#[derive(Debug, Default, Deserialize)]
pub struct VerifyParams {
    #[serde(rename = "hub.mode")]
    pub mode: Option<String>,
    #[serde(rename = "hub.verify_token")]
    pub verify_token: Option<String>,
    #[serde(rename = "hub.challenge")]
    pub challenge: Option<String>,
}

pub fn router(ctx: Arc<AppContext>) -> Router {
    Router::new()
        .route("/", get(health_check))
        .route("/status", get(status))
        .route("/webhook", get(verify_webhook).post(receive_webhook))
        .with_state(ctx)
}

/// Bind the configured address and serve until Ctrl-C
pub async fn serve(ctx: Arc<AppContext>) -> Result<(), BotError> {
    let addr = ctx.config.listen_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| BotError::Network(format!("Failed to bind {}: {}", addr, e)))?;

    tracing::info!("Webhook server listening on {}", addr);

    axum::serve(listener, router(ctx))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| BotError::Network(e.to_string()))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}

async fn health_check() -> &'static str {
    "WhatsApp bot online!"
}

async fn status(State(ctx): State<Arc<AppContext>>) -> Json<Value> {
    let whatsapp = &ctx.config.whatsapp;
    Json(json!({
        "status": "online",
        "environment": {
            "META_WHATSAPP_PHONE_ID": whatsapp.phone_number_id.is_some(),
            "META_WHATSAPP_TOKEN": whatsapp.token.is_some(),
            "META_VERIFY_TOKEN": !whatsapp.verify_token.is_empty(),
        },
        "commands": ctx.commands.command_names(),
    }))
}

async fn verify_webhook(
    State(ctx): State<Arc<AppContext>>,
    Query(params): Query<VerifyParams>,
) -> (StatusCode, String) {
    let (Some(mode), Some(token)) = (params.mode.as_deref(), params.verify_token.as_deref()) else {
        return (StatusCode::OK, "Hello World".to_string());
    };

    if mode == "subscribe" && token == ctx.config.whatsapp.verify_token {
        tracing::info!("Webhook verified");
        (StatusCode::OK, params.challenge.unwrap_or_default())
    } else {
        tracing::warn!("Webhook verification failed (mode: {})", mode);
        (StatusCode::FORBIDDEN, "Verification failed".to_string())
    }
}

/// Always acknowledges with 200 so the platform does not redeliver
async fn receive_webhook(State(ctx): State<Arc<AppContext>>, body: Bytes) -> Json<Value> {
    let span = tracing::info_span!("webhook", request_id = %Uuid::new_v4());

    async move {
        let payload: Value = match serde_json::from_slice(&body) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!("Unparsable webhook body: {}", e);
                return Json(json!({ "status": "received" }));
            }
        };
        tracing::debug!("Webhook payload: {}", payload);

        let outcome = ctx.messages.handle_payload(&payload).await;
        let status = if outcome.had_message() { "success" } else { "received" };
        Json(json!({ "status": status }))
    }
    .instrument(span)
    .await
}
