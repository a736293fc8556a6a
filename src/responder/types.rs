//! Core types for the static responder

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use hyper::header::HeaderMap;
use hyper::StatusCode;
use thiserror::Error;

use crate::http::range::ByteRange;
use crate::responder::etag::EtagPolicy;

/// Request headers relevant to serving one asset
///
/// Built per incoming request, immutable, discarded after dispatch.
#[derive(Debug, Clone)]
pub struct AssetRequest {
    /// Filesystem-resolved target path; the resolver has already vetted it
    pub path: PathBuf,
    /// Raw `If-Modified-Since` header value
    pub if_modified_since: Option<String>,
    /// Raw `Range` header value
    pub range: Option<String>,
}

/// File metadata captured from a fresh stat
///
/// Never cached across requests: every request re-stats the file so a
/// changed file is picked up immediately.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssetMetadata {
    pub size: u64,
    pub modified: SystemTime,
    /// Filesystem identity token, folded into the auto ETag
    pub inode: u64,
}

impl AssetMetadata {
    /// Capture the fields the responder needs from a stat result
    pub fn from_fs(metadata: &std::fs::Metadata) -> Self {
        Self {
            size: metadata.len(),
            modified: metadata.modified().unwrap_or(UNIX_EPOCH),
            inode: inode_of(metadata),
        }
    }

    /// Modification time as milliseconds since the Unix epoch
    pub fn modified_millis(&self) -> u128 {
        self.modified
            .duration_since(UNIX_EPOCH)
            .map_or(0, |elapsed| elapsed.as_millis())
    }
}

#[cfg(unix)]
fn inode_of(metadata: &std::fs::Metadata) -> u64 {
    std::os::unix::fs::MetadataExt::ino(metadata)
}

#[cfg(not(unix))]
fn inode_of(_metadata: &std::fs::Metadata) -> u64 {
    0
}

/// Result of the stat lookup as consumed by the planner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatOutcome {
    Found(AssetMetadata),
    /// Directory targets are served as not-found, never listed
    Directory,
    Missing,
}

/// How the response body is produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyPlan {
    /// No body at all (304, 416)
    Empty,
    /// Stream the whole file
    Whole,
    /// Stream the given byte range
    Range(ByteRange),
    /// Fixed text body (error pages)
    Message(&'static str),
}

/// The planner's sole output: status, headers, and a body directive
///
/// Derived deterministically from the request and the stat result; no I/O
/// happens until the plan is rendered.
#[derive(Debug)]
pub struct ResponsePlan {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: BodyPlan,
}

/// Serving policy shared by every request
#[derive(Debug, Clone)]
pub struct ResponderOptions {
    /// Leading Cache-Control directive, e.g. "public"
    pub cache_directive: String,
    /// max-age seconds; also drives the Expires header
    pub max_age: u64,
    /// Advertise and honor byte-range requests
    pub accept_ranges: bool,
    pub etag: EtagPolicy,
}

/// Errors raised while opening or reading an asset body
#[derive(Debug, Error)]
pub enum ServeError {
    /// Missing path, directory target, or hidden file
    #[error("asset not found")]
    NotFound,
    #[error("failed to read asset: {0}")]
    Io(#[from] std::io::Error),
}
