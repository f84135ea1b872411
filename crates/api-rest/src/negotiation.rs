//! Content negotiation guards.
//!
//! These run as `route_layer` middleware in front of the handlers, so a request that cannot
//! be answered in JSON, or whose body is of the wrong type, never reaches the library.

use crate::error::ApiError;
use axum::extract::Request;
use axum::http::{header, HeaderMap, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

pub const APPLICATION_JSON: &str = "application/json";
pub const MULTIPART_FORM_DATA: &str = "multipart/form-data";

/// Rejects requests whose `Accept` header does not admit `application/json` (406).
pub async fn accept_json(req: Request, next: Next) -> Response {
    if accepts(req.headers(), APPLICATION_JSON) {
        return next.run(req).await;
    }
    tracing::warn!("{} {} does not accept JSON", req.method(), req.uri().path());
    ApiError::new(
        StatusCode::NOT_ACCEPTABLE,
        format!("Request must accept {APPLICATION_JSON} data"),
    )
    .into_response()
}

/// Rejects requests whose body is not `application/json` (415).
pub async fn require_json(req: Request, next: Next) -> Response {
    require(req, next, APPLICATION_JSON).await
}

/// Rejects requests whose body is not `multipart/form-data` (415).
pub async fn require_multipart(req: Request, next: Next) -> Response {
    require(req, next, MULTIPART_FORM_DATA).await
}

async fn require(req: Request, next: Next, media_type: &str) -> Response {
    if content_type_is(req.headers(), media_type) {
        return next.run(req).await;
    }
    tracing::warn!(
        "{} {} has wrong content type, expected {}",
        req.method(),
        req.uri().path(),
        media_type
    );
    ApiError::new(
        StatusCode::UNSUPPORTED_MEDIA_TYPE,
        format!("Request must contain {media_type} data"),
    )
    .into_response()
}

/// Whether the `Accept` header admits `media_type`.
///
/// The most specific matching range decides (`type/subtype` over `type/*` over `*/*`),
/// taking the highest quality among equally specific ranges. A quality of zero means
/// "not acceptable". A missing header admits nothing.
pub fn accepts(headers: &HeaderMap, media_type: &str) -> bool {
    let Some((main_type, _)) = media_type.split_once('/') else {
        return false;
    };
    let type_wildcard = format!("{main_type}/*");

    let mut best: Option<(u8, f32)> = None;
    let ranges = headers
        .get_all(header::ACCEPT)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','));

    for range in ranges {
        let mut parts = range.split(';');
        let essence = parts.next().unwrap_or_default().trim().to_ascii_lowercase();

        let specificity = if essence == media_type {
            2
        } else if essence == type_wildcard {
            1
        } else if essence == "*/*" {
            0
        } else {
            continue;
        };

        let quality = parts
            .filter_map(|param| param.trim().split_once('='))
            .find(|(key, _)| key.trim().eq_ignore_ascii_case("q"))
            .and_then(|(_, value)| value.trim().parse::<f32>().ok())
            .unwrap_or(1.0);

        best = match best {
            Some((s, q)) if s > specificity || (s == specificity && q >= quality) => best,
            _ => Some((specificity, quality)),
        };
    }

    matches!(best, Some((_, quality)) if quality > 0.0)
}

/// Whether the `Content-Type` essence (ignoring parameters) equals `media_type`.
pub fn content_type_is(headers: &HeaderMap, media_type: &str) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .map(|essence| essence.trim().eq_ignore_ascii_case(media_type))
        .unwrap_or(false)
}
