//! HTTP protocol layer module
//!
//! Provides HTTP protocol-related base functionality, decoupled from the
//! responder's business logic: byte-range parsing and response construction.

pub mod range;
pub mod response;

// Re-export commonly used types
pub use range::{parse_ranges, ByteRange};
pub use response::{
    build_404_response, build_405_response, build_health_response, build_options_response,
    AssetBody,
};
