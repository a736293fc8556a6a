//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: method validation, health
//! endpoints, path resolution, and dispatch into the static responder.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use hyper::body::Incoming;
use hyper::{Method, Request, Response, Version};

use crate::config::AppState;
use crate::handler::resolve::resolve_path;
use crate::http::{self, response::AssetBody};
use crate::logger::{self, AccessLogEntry};
use crate::responder::{self, AssetRequest};

/// Main entry point for HTTP request handling
pub async fn handle_request(
    req: Request<Incoming>,
    state: Arc<AppState>,
    remote_addr: SocketAddr,
) -> Result<Response<AssetBody>, Infallible> {
    let started = Instant::now();
    let is_head = req.method() == Method::HEAD;

    // 1. Method gate: only GET and HEAD reach the responder
    if let Some(response) = check_http_method(req.method(), state.config.http.enable_cors) {
        return Ok(response);
    }

    // 2. Health check endpoints (always fast, never cached)
    let health = &state.config.health;
    if health.enabled
        && (req.uri().path() == health.liveness_path || req.uri().path() == health.readiness_path)
    {
        return Ok(http::build_health_response("ok"));
    }

    // 3. Resolve the target under the asset root and serve it
    let response = match resolve_path(&state.config.assets.root, req.uri().path()) {
        Some(path) => {
            let asset_request = AssetRequest {
                path,
                if_modified_since: header_string(&req, "if-modified-since"),
                range: header_string(&req, "range"),
            };
            responder::serve_asset(&asset_request, &state.responder, is_head).await
        }
        None => http::build_404_response(),
    };

    // 4. Access log
    if state.access_log_enabled() {
        let entry = access_entry(&req, &response, remote_addr, started);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Check HTTP method and return appropriate response for non-GET/HEAD methods
fn check_http_method(method: &Method, enable_cors: bool) -> Option<Response<AssetBody>> {
    match *method {
        Method::GET | Method::HEAD => None,
        Method::OPTIONS => Some(http::build_options_response(enable_cors)),
        _ => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            Some(http::build_405_response())
        }
    }
}

/// Extract a header as an owned string, skipping non-UTF-8 values
fn header_string(req: &Request<Incoming>, name: &str) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(ToString::to_string)
}

/// Build the access log entry for a completed request
fn access_entry(
    req: &Request<Incoming>,
    response: &Response<AssetBody>,
    remote_addr: SocketAddr,
    started: Instant,
) -> AccessLogEntry {
    let mut entry = AccessLogEntry::new(
        remote_addr.to_string(),
        req.method().to_string(),
        req.uri().path().to_string(),
    );
    entry.query = req.uri().query().map(ToString::to_string);
    entry.http_version = version_label(req.version()).to_string();
    entry.status = response.status().as_u16();
    entry.body_bytes = response
        .headers()
        .get("content-length")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse().ok())
        .unwrap_or(0);
    entry.referer = header_string(req, "referer");
    entry.user_agent = header_string(req, "user-agent");
    entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
    entry
}

const fn version_label(version: Version) -> &'static str {
    match version {
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        _ => "1.1",
    }
}
