//! Embedded chat page.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use rust_embed::Embed;

#[derive(Embed)]
#[folder = "static"]
struct Assets;

const INDEX: &str = "index.html";

/// Serves the chat page.
pub async fn index() -> Response {
    let Some(content) = Assets::get(INDEX) else {
        return (StatusCode::NOT_FOUND, "Not found").into_response();
    };

    let mime = mime_guess::from_path(INDEX).first_or_octet_stream();

    (
        [(header::CONTENT_TYPE, mime.as_ref())],
        content.data.into_owned(),
    )
        .into_response()
}
