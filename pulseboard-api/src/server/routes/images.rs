use crate::server::{ServerError, ServerRouter, json::Json, views::ImageEntry};
use axum_extra::routing::{RouterExt, TypedPath};
use pulseboard_common::image::{ImageKind, select_image};
use serde::Deserialize;

pub fn routes() -> ServerRouter {
    ServerRouter::new().typed_get(get_image)
}

#[derive(TypedPath, Deserialize)]
#[typed_path("/images/{kind}/{id}", rejection(ServerError))]
struct ImagePath {
    kind: ImageKind,
    id: u64,
}

async fn get_image(ImagePath { kind, id }: ImagePath) -> Json<ImageEntry> {
    Json(ImageEntry {
        url: select_image(id, kind),
    })
}
