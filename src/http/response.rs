//! HTTP response building module
//!
//! Response builders decoupled from the responder's decision logic. Every
//! response uses one boxed body type so buffered error pages and streamed
//! file bodies share a single `Response` signature.

use std::io;

use http_body_util::combinators::BoxBody;
use http_body_util::{BodyExt, Full};
use hyper::body::Bytes;
use hyper::Response;

use crate::logger;
use crate::responder::types::ResponsePlan;

/// Body type for every response, buffered or streamed from a file
pub type AssetBody = BoxBody<Bytes, io::Error>;

/// Buffered body from in-memory bytes
pub fn full_body(data: impl Into<Bytes>) -> AssetBody {
    Full::new(data.into()).map_err(|err| match err {}).boxed()
}

/// Zero-length body (304, 416, and HEAD responses)
pub fn empty_body() -> AssetBody {
    full_body(Bytes::new())
}

/// Turn a `ResponsePlan` into a response, attaching the prepared body
///
/// The plan's headers are taken as-is; nothing is added or reordered here.
pub fn apply_plan(plan: ResponsePlan, body: AssetBody) -> Response<AssetBody> {
    let mut response = Response::new(body);
    *response.status_mut() = plan.status;
    *response.headers_mut() = plan.headers;
    response
}

/// Build 404 Not Found response
pub fn build_404_response() -> Response<AssetBody> {
    Response::builder()
        .status(404)
        .header("Content-Type", "text/plain")
        .body(full_body("404 Not Found"))
        .unwrap_or_else(|e| {
            log_build_error("404", &e);
            Response::new(full_body("404 Not Found"))
        })
}

/// Build 405 Method Not Allowed response
pub fn build_405_response() -> Response<AssetBody> {
    Response::builder()
        .status(405)
        .header("Content-Type", "text/plain")
        .header("Allow", "GET, HEAD, OPTIONS")
        .body(full_body("405 Method Not Allowed"))
        .unwrap_or_else(|e| {
            log_build_error("405", &e);
            Response::new(full_body("405 Method Not Allowed"))
        })
}

/// Build OPTIONS response (preflight request)
pub fn build_options_response(enable_cors: bool) -> Response<AssetBody> {
    let mut builder = Response::builder()
        .status(204)
        .header("Allow", "GET, HEAD, OPTIONS");

    if enable_cors {
        builder = builder
            .header("Access-Control-Allow-Origin", "*")
            .header("Access-Control-Allow-Methods", "GET, HEAD, OPTIONS")
            .header("Access-Control-Allow-Headers", "Range, If-Modified-Since")
            .header("Access-Control-Max-Age", "86400");
    }

    builder.body(empty_body()).unwrap_or_else(|e| {
        log_build_error("OPTIONS", &e);
        Response::new(empty_body())
    })
}

/// Build health check response
pub fn build_health_response(status: &str) -> Response<AssetBody> {
    Response::builder()
        .status(200)
        .header("Content-Type", "text/plain")
        .header("Cache-Control", "no-store")
        .body(full_body(status.to_owned()))
        .unwrap_or_else(|e| {
            log_build_error("health", &e);
            Response::new(empty_body())
        })
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    logger::log_error(&format!("Failed to build {status} response: {error}"));
}
