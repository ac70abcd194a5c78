use crate::{
    poller::DashboardPoller,
    server::{Result, ServerError, ServerRouter, current_view, json::Json, views::PostEntry},
};
use axum::extract::State;
use axum_extra::routing::{RouterExt, TypedPath};
use serde::Deserialize;
use std::sync::Arc;

pub fn routes() -> ServerRouter {
    ServerRouter::new().typed_get(get_trending_posts)
}

#[derive(TypedPath, Deserialize)]
#[typed_path("/posts/trending", rejection(ServerError))]
struct TrendingPostsPath();

async fn get_trending_posts(
    TrendingPostsPath(): TrendingPostsPath,
    State(poller): State<Arc<DashboardPoller>>,
) -> Result<Json<Vec<PostEntry>>> {
    let view = current_view(&poller)?;

    Ok(Json(PostEntry::list(view.trending(), &view)))
}
