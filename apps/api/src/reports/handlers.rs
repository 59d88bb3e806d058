use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use serde::Serialize;
use tracing::info;

use crate::errors::AppError;
use crate::reports::activity::collect_24h_activity;
use crate::reports::generator::generate_report;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct DailyReportResponse {
    pub status: String,
    pub message: String,
}

/// POST /reports/daily
///
/// Collects the last 24 hours of activity, generates the intelligence brief
/// and emails it to the configured recipients.
pub async fn handle_daily_report(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<DailyReportResponse>), AppError> {
    info!("Starting daily report generation");

    // Fail on missing email or model settings before querying Convex.
    state.mailer.ensure_configured()?;
    state.llm.ensure_configured()?;

    let now = Utc::now();
    let activity = collect_24h_activity(&state.convex, now).await?;
    let report = generate_report(&state.llm, &activity, now).await?;
    state.mailer.send_report(&report, now).await?;

    Ok((
        StatusCode::ACCEPTED,
        Json(DailyReportResponse {
            status: "success".to_string(),
            message: "Report generated and sent successfully".to_string(),
        }),
    ))
}
