use std::collections::BTreeSet;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{error, info, warn};

use crate::convex::{created_at_ms, ConvexClient, ConvexError};

/// Everything that happened in the collection window.
#[derive(Debug, Clone, Serialize)]
pub struct ActivitySnapshot {
    pub incidents: Vec<Value>,
    pub criminals: Vec<Value>,
    pub tips: Vec<Value>,
    pub collected_at: DateTime<Utc>,
}

/// Collects crime reports, tips and the criminals linked to those reports
/// from the 24 hours before `now`.
///
/// A failing list query degrades to an empty list; only a missing Convex
/// deployment is an error.
pub async fn collect_24h_activity(
    convex: &ConvexClient,
    now: DateTime<Utc>,
) -> Result<ActivitySnapshot, ConvexError> {
    if !convex.is_configured() {
        return Err(ConvexError::MissingDeploymentUrl);
    }

    let cutoff = now - Duration::hours(24);
    let cutoff_ms = cutoff.timestamp_millis();
    info!("Collecting activity since {}", cutoff.to_rfc3339());

    let incidents = fetch_since(convex, "crimeReports:list", cutoff_ms).await;
    let criminal_ids = linked_criminal_ids(&incidents);
    let criminals = fetch_criminals(convex, &criminal_ids).await;
    let tips = fetch_since(convex, "tips:list", cutoff_ms).await;

    info!(
        "Collected {} incidents, {} criminals, {} tips",
        incidents.len(),
        criminals.len(),
        tips.len()
    );

    Ok(ActivitySnapshot {
        incidents,
        criminals,
        tips,
        collected_at: now,
    })
}

async fn fetch_since(convex: &ConvexClient, path: &str, cutoff_ms: i64) -> Vec<Value> {
    match convex.query_list(path, json!({})).await {
        Ok(docs) => filter_since(docs, cutoff_ms),
        Err(e) => {
            error!("Failed to fetch {path}: {e}");
            Vec::new()
        }
    }
}

async fn fetch_criminals(convex: &ConvexClient, ids: &BTreeSet<String>) -> Vec<Value> {
    let mut criminals = Vec::new();
    for id in ids {
        match convex.query("criminals:get", json!({ "id": id })).await {
            Ok(Value::Null) => {}
            Ok(criminal) => criminals.push(criminal),
            Err(e) => warn!("Failed to fetch criminal {id}: {e}"),
        }
    }
    criminals
}

/// Keeps documents created at or after the cutoff.
pub fn filter_since(docs: Vec<Value>, cutoff_ms: i64) -> Vec<Value> {
    docs.into_iter()
        .filter(|doc| created_at_ms(doc) >= cutoff_ms)
        .collect()
}

/// Distinct, non-empty `criminalId`s referenced by the incidents.
pub fn linked_criminal_ids(incidents: &[Value]) -> BTreeSet<String> {
    incidents
        .iter()
        .filter_map(|inc| inc.get("criminalId").and_then(Value::as_str))
        .filter(|id| !id.is_empty())
        .map(String::from)
        .collect()
}
