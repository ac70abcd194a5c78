use crate::{
    poller::DashboardPoller,
    server::{
        Result, ServerError, ServerRouter, current_view, json::Json, views::RankedUserEntry,
    },
};
use axum::extract::{Query, State, rejection::QueryRejection};
use axum_extra::routing::{RouterExt, TypedPath};
use serde::Deserialize;
use std::{num::NonZeroUsize, sync::Arc};

const DEFAULT_TOP_USERS_LIMIT: NonZeroUsize = NonZeroUsize::new(5).unwrap();

pub fn routes() -> ServerRouter {
    ServerRouter::new().typed_get(get_top_users)
}

#[derive(TypedPath, Deserialize)]
#[typed_path("/users/top", rejection(ServerError))]
struct TopUsersPath();

#[derive(Deserialize)]
struct TopUsersQuery {
    limit: Option<NonZeroUsize>,
}

async fn get_top_users(
    TopUsersPath(): TopUsersPath,
    State(poller): State<Arc<DashboardPoller>>,
    query: Result<Query<TopUsersQuery>, QueryRejection>,
) -> Result<Json<Vec<RankedUserEntry>>> {
    let Query(TopUsersQuery { limit }) = query?;
    let view = current_view(&poller)?;

    let top_users = view
        .top_users(limit.unwrap_or(DEFAULT_TOP_USERS_LIMIT))
        .into_iter()
        .map(RankedUserEntry::from)
        .collect();

    Ok(Json(top_users))
}
