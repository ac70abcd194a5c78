use crate::server::ServerRouter;
use axum::Router;

mod feed;
mod images;
mod posts;
mod status;
mod users;

pub fn routes() -> ServerRouter {
    Router::new()
        .merge(feed::routes())
        .merge(images::routes())
        .merge(posts::routes())
        .merge(status::routes())
        .merge(users::routes())
}
