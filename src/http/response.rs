//! Responses the proxy produces itself.
//!
//! # Responsibilities
//! - Reject non-proxy requests with 400
//! - Map transport failures to 502 / 504 (or 500 under the exit policy)
//!
//! # Design Decisions
//! - Plain-text bodies terminated by a newline, never sniffed by browsers
//! - Origin responses are not built here; the relay streams them through

use axum::body::Body;
use axum::http::header::{HeaderValue, CONTENT_TYPE, X_CONTENT_TYPE_OPTIONS};
use axum::http::{Response, StatusCode};

use crate::http::transport::TransportError;

/// Plain-text error response.
pub fn plain_text(status: StatusCode, message: &str) -> Response<Body> {
    let mut response = Response::new(Body::from(format!("{message}\n")));
    *response.status_mut() = status;

    let headers = response.headers_mut();
    headers.insert(
        CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    headers.insert(X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
    response
}

/// 400 for a request whose target is not an `http`/`https` absolute URL.
///
/// The message has no separator before the scheme; clients match on it.
pub fn unsupported_scheme(scheme: &str) -> Response<Body> {
    plain_text(
        StatusCode::BAD_REQUEST,
        &format!("Unsupported scheme{scheme}"),
    )
}

/// 504 when the deadline expired, 502 for every other transport failure.
pub fn transport_failure(err: &TransportError) -> Response<Body> {
    if err.is_timeout() {
        plain_text(StatusCode::GATEWAY_TIMEOUT, "Gateway Timeout")
    } else {
        plain_text(StatusCode::BAD_GATEWAY, "Bad Gateway")
    }
}

/// 500 written just before the server shuts itself down.
pub fn server_error() -> Response<Body> {
    plain_text(StatusCode::INTERNAL_SERVER_ERROR, "Server Error")
}
