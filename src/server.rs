//! HTTP surface: an axum router serving cards as PNG.

use std::sync::Arc;

use axum::extract::{RawQuery, State};
use axum::http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;

use crate::card::{CardRequest, CardService};
use crate::rendering::RenderedImage;

/// Router serving cards at `/api/github` and `/`.
pub fn router(service: Arc<CardService>) -> Router {
    Router::new()
        .route("/", get(card_handler))
        .route("/api/github", get(card_handler))
        .with_state(service)
}

async fn card_handler(
    State(service): State<Arc<CardService>>,
    RawQuery(query): RawQuery,
) -> Response {
    let request = CardRequest::from_query(query.as_deref());
    log::info!(
        "card request username={:?} theme={:?}",
        request.username,
        request.theme
    );

    match service.render(&request).await {
        Ok(image) => image_response(image),
        Err(e) => {
            log::error!("failed to render card: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "failed to render card").into_response()
        }
    }
}

fn image_response(image: RenderedImage) -> Response {
    let mut headers = HeaderMap::new();
    for (name, value) in image.headers() {
        headers.insert(HeaderName::from_static(name), HeaderValue::from_static(value));
    }
    (headers, image.data).into_response()
}
