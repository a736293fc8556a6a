// Application state module
// Immutable configuration plus the serving policy handed to the responder

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::types::{Config, EtagMode};
use crate::responder::{EtagFn, EtagPolicy, ResponderOptions};

/// Application state shared by every connection task
///
/// Requests share nothing mutable: the responder options are read-only and
/// each request performs its own stat and stream.
pub struct AppState {
    pub config: Config,
    /// Serving policy handed to the responder on every request
    pub responder: Arc<ResponderOptions>,

    // Cached config value for fast access without locks
    cached_access_log: AtomicBool,
}

impl AppState {
    /// Create `AppState` with the ETag policy taken from configuration
    pub fn new(config: &Config) -> Self {
        let etag = match config.assets.etags {
            EtagMode::Disabled => EtagPolicy::Disabled,
            EtagMode::Auto => EtagPolicy::Auto,
        };
        Self::with_etag_policy(config, etag)
    }

    /// Create `AppState` with a caller-supplied ETag generator
    ///
    /// Overrides the configured mode; used when the embedding application
    /// wants version tokens the stat triple cannot express.
    pub fn with_etag_fn(config: &Config, generator: EtagFn) -> Self {
        Self::with_etag_policy(config, EtagPolicy::Custom(generator))
    }

    fn with_etag_policy(config: &Config, etag: EtagPolicy) -> Self {
        let responder = Arc::new(ResponderOptions {
            cache_directive: config.cache_control.directive.clone(),
            max_age: config.cache_control.max_age,
            accept_ranges: config.assets.accept_ranges,
            etag,
        });
        Self {
            config: config.clone(),
            responder,
            cached_access_log: AtomicBool::new(config.logging.access_log),
        }
    }

    pub fn access_log_enabled(&self) -> bool {
        self.cached_access_log.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config::load_from("no-such-config").unwrap()
    }

    #[test]
    fn etag_mode_maps_onto_the_policy() {
        let mut cfg = config();
        let state = AppState::new(&cfg);
        assert!(matches!(state.responder.etag, EtagPolicy::Auto));

        cfg.assets.etags = EtagMode::Disabled;
        let state = AppState::new(&cfg);
        assert!(matches!(state.responder.etag, EtagPolicy::Disabled));
    }

    #[test]
    fn custom_generator_overrides_the_configured_mode() {
        let cfg = config();
        let state = AppState::with_etag_fn(&cfg, Arc::new(|m| format!("\"{}\"", m.size)));
        assert!(matches!(state.responder.etag, EtagPolicy::Custom(_)));
    }

    #[test]
    fn responder_options_mirror_the_config() {
        let state = AppState::new(&config());
        assert_eq!(state.responder.cache_directive, "public");
        assert_eq!(state.responder.max_age, 3600);
        assert!(state.responder.accept_ranges);
        assert!(state.access_log_enabled());
    }
}
