//! staticd - asynchronous static asset server
//!
//! Serves files over HTTP/1.1 with conditional-request and byte-range
//! support. The 200/206/304/404/416 decision is made by a pure response
//! planner, bodies are streamed in bounded chunks, and every request
//! re-stats its file: there is no metadata cache to invalidate.

pub mod config;
pub mod handler;
pub mod http;
pub mod logger;
pub mod responder;
