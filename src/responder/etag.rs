//! ETag generation policy
//!
//! The policy is chosen once at configuration time: disabled, the built-in
//! stat-derived token, or a caller-supplied generator.

use std::fmt;
use std::sync::Arc;

use crate::responder::types::AssetMetadata;

/// Caller-supplied ETag generator over the stat result
pub type EtagFn = Arc<dyn Fn(&AssetMetadata) -> String + Send + Sync>;

/// How ETags are produced for served assets
#[derive(Clone, Default)]
pub enum EtagPolicy {
    /// No ETag header is emitted
    Disabled,
    /// Deterministic token from the (inode, size, mtime) triple
    #[default]
    Auto,
    /// Custom generator installed by the embedding application
    Custom(EtagFn),
}

impl EtagPolicy {
    /// Compute the ETag for a stat result, or `None` when disabled
    pub fn compute(&self, metadata: &AssetMetadata) -> Option<String> {
        match self {
            Self::Disabled => None,
            Self::Auto => Some(auto_etag(metadata)),
            Self::Custom(generator) => Some(generator(metadata)),
        }
    }
}

impl fmt::Debug for EtagPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disabled => write!(f, "Disabled"),
            Self::Auto => write!(f, "Auto"),
            Self::Custom(_) => write!(f, "Custom(..)"),
        }
    }
}

/// Deterministic ETag from the file's identity triple
///
/// The token is `inode-size-mtime_millis` serialized as a JSON string, so
/// the emitted value is already quoted the way the ETag header requires.
/// Any change to one of the three fields produces a different token.
pub fn auto_etag(metadata: &AssetMetadata) -> String {
    let token = format!(
        "{}-{}-{}",
        metadata.inode,
        metadata.size,
        metadata.modified_millis()
    );
    serde_json::Value::String(token).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, UNIX_EPOCH};

    fn metadata(inode: u64, size: u64, mtime_millis: u64) -> AssetMetadata {
        AssetMetadata {
            size,
            modified: UNIX_EPOCH + Duration::from_millis(mtime_millis),
            inode,
        }
    }

    #[test]
    fn auto_etag_is_quoted_identity_triple() {
        assert_eq!(auto_etag(&metadata(5, 10, 1000)), "\"5-10-1000\"");
    }

    #[test]
    fn identical_triples_agree() {
        assert_eq!(
            auto_etag(&metadata(42, 4096, 1_700_000_000_000)),
            auto_etag(&metadata(42, 4096, 1_700_000_000_000))
        );
    }

    #[test]
    fn changing_any_field_changes_the_token() {
        let base = auto_etag(&metadata(42, 4096, 1_700_000_000_000));
        assert_ne!(base, auto_etag(&metadata(43, 4096, 1_700_000_000_000)));
        assert_ne!(base, auto_etag(&metadata(42, 4097, 1_700_000_000_000)));
        assert_ne!(base, auto_etag(&metadata(42, 4096, 1_700_000_000_001)));
    }

    #[test]
    fn disabled_policy_yields_nothing() {
        assert!(EtagPolicy::Disabled.compute(&metadata(1, 2, 3)).is_none());
    }

    #[test]
    fn custom_policy_uses_the_generator() {
        let policy = EtagPolicy::Custom(Arc::new(|m| format!("\"v{}\"", m.size)));
        assert_eq!(policy.compute(&metadata(1, 2, 3)).unwrap(), "\"v2\"");
    }
}
