use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};

pub fn page(html: String) -> Response {
    (StatusCode::OK, Html(html)).into_response()
}

/// A page re-rendered after an input error; the alert carries the message.
pub fn rejected(html: String) -> Response {
    (StatusCode::BAD_REQUEST, Html(html)).into_response()
}
