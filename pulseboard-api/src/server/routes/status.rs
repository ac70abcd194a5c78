use crate::{
    poller::{CycleOutcome, DashboardPoller},
    server::{Result, ServerError, ServerRouter, json::Json, views::StatusEntry},
};
use axum::extract::State;
use axum_extra::routing::{RouterExt, TypedPath};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

pub fn routes() -> ServerRouter {
    ServerRouter::new()
        .typed_get(get_status)
        .typed_post(refresh)
}

#[derive(TypedPath, Deserialize)]
#[typed_path("/status", rejection(ServerError))]
struct StatusPath();

async fn get_status(
    StatusPath(): StatusPath,
    State(poller): State<Arc<DashboardPoller>>,
) -> Json<StatusEntry> {
    let state = poller.state();

    Json(StatusEntry::from(&state))
}

#[derive(TypedPath, Deserialize)]
#[typed_path("/refresh", rejection(ServerError))]
struct RefreshPath();

#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash, Serialize)]
struct RefreshResponse {
    outcome: CycleOutcome,
}

async fn refresh(
    RefreshPath(): RefreshPath,
    State(poller): State<Arc<DashboardPoller>>,
) -> Result<Json<RefreshResponse>> {
    info!("Manual refresh requested");
    let outcome = poller.spawn_refresh().await?;

    Ok(Json(RefreshResponse { outcome }))
}
