// src/api/handlers.rs
// HTTP handlers: two ingestion endpoints and read-only dashboard queries

use crate::alerts::models::{AttackEvent, BlockEvent};
use crate::alerts::{AlertRelay, NetworkStats, Receipt};
use crate::api::models::*;
use crate::error::{RelayError, Result};
use crate::logging::LogLevel;
use axum::extract::rejection::JsonRejection;
use axum::{extract::State, Json};
use std::sync::Arc;

pub struct AppState {
    pub relay: AlertRelay,
}

fn body_or_validation<T>(payload: std::result::Result<Json<T>, JsonRejection>) -> Result<T> {
    payload.map(|Json(body)| body).map_err(|rejection| {
        alert_log!(LogLevel::Error, "Invalid request body: {}", rejection.body_text());
        RelayError::Validation(rejection.body_text())
    })
}

fn log_receipt(receipt: &Receipt) {
    alert_log!(
        LogLevel::Debug,
        "Processed {:?} delivery={:?} persistence_error={:?}",
        receipt.outcome,
        receipt.delivery,
        receipt.persistence_error
    );
}

pub async fn ddos_alert(
    State(app_state): State<Arc<AppState>>,
    payload: std::result::Result<Json<AttackAlertRequest>, JsonRejection>,
) -> Result<&'static str> {
    let request = body_or_validation(payload)?;
    let event = AttackEvent::try_from(request.clone()).map_err(|e| {
        alert_log!(LogLevel::Error, "Invalid request data {:?}: {}", request, e);
        e
    })?;

    let receipt = app_state.relay.ingest_attack(event).await?;
    log_receipt(&receipt);
    Ok("Alert received")
}

pub async fn ip_blocked(
    State(app_state): State<Arc<AppState>>,
    payload: std::result::Result<Json<IpBlockedRequest>, JsonRejection>,
) -> Result<&'static str> {
    let request = body_or_validation(payload)?;
    let event = BlockEvent::try_from(request).map_err(|e| {
        alert_log!(LogLevel::Error, "Invalid block notification: {}", e);
        e
    })?;

    let receipt = app_state.relay.ingest_block(event).await?;
    log_receipt(&receipt);
    Ok("IP block notification sent")
}

pub async fn status(State(app_state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let online = app_state.relay.notifier().is_online().await;
    Json(StatusResponse {
        status: if online { "Online" } else { "Offline" }.to_string(),
    })
}

pub async fn ongoing_attacks(State(app_state): State<Arc<AppState>>) -> Json<OngoingAttacksResponse> {
    let engine = app_state.relay.engine().lock().await;
    Json(OngoingAttacksResponse {
        attacks: engine.ongoing_attacks(),
    })
}

pub async fn recent_alerts(State(app_state): State<Arc<AppState>>) -> Json<RecentAlertsResponse> {
    let engine = app_state.relay.engine().lock().await;
    Json(RecentAlertsResponse {
        alerts: engine.recent_alerts(),
    })
}

pub async fn blocked_ips(State(app_state): State<Arc<AppState>>) -> Json<BlockedIpsResponse> {
    let engine = app_state.relay.engine().lock().await;
    Json(BlockedIpsResponse {
        blocked_ips: engine.blocked_ips(),
    })
}

pub async fn network_stats(State(app_state): State<Arc<AppState>>) -> Json<NetworkStats> {
    let engine = app_state.relay.engine().lock().await;
    Json(engine.stats())
}
