//! Request handler module
//!
//! Responsible for request routing dispatch: method validation, path
//! resolution, and handing the request to the static responder.

pub mod resolve;
pub mod router;

// Re-export main entry point
pub use router::handle_request;
