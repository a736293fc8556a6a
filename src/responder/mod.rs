//! Static asset responder
//!
//! The core of the server: decide 200/206/304/404/416 for a resolved file
//! path plus the request's conditional and range headers, then stream the
//! body without buffering whole files. Planning is pure and synchronous;
//! all filesystem work happens in `serve` and `stream`.

pub mod etag;
pub mod plan;
pub mod serve;
pub mod stream;
pub mod types;

// Re-export the types that make up the responder's surface
pub use etag::{auto_etag, EtagFn, EtagPolicy};
pub use plan::plan_response;
pub use serve::serve_asset;
pub use types::{
    AssetMetadata, AssetRequest, BodyPlan, ResponderOptions, ResponsePlan, ServeError, StatOutcome,
};
