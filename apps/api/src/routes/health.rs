use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns a status object with service version and which collaborators are configured.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    let config = &state.config;
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "informa-api",
        "integrations": {
            "firecrawl": config.firecrawl_api_key.is_some(),
            "openrouter": config.openrouter_api_key.is_some(),
            "convex": config.convex_deployment_url.is_some(),
            "resend": config.resend_api_key.is_some() && config.recipients.is_some(),
        }
    }))
}
