//! URL path to filesystem path resolution
//!
//! Maps a request path onto the configured asset root. The resolved path
//! is what the responder trusts, so everything suspicious is rejected
//! here; rejections surface as 404 at the HTTP boundary.

use std::path::{Path, PathBuf};

use crate::logger;

/// Resolve a URL path to a file path under `root`
///
/// Any `..` component is rejected outright so a request can never escape
/// the asset root.
pub fn resolve_path(root: &str, url_path: &str) -> Option<PathBuf> {
    let relative = url_path.trim_start_matches('/');

    if relative.split('/').any(|component| component == "..") {
        logger::log_warning(&format!("Path traversal attempt blocked: {url_path}"));
        return None;
    }

    Some(Path::new(root).join(relative))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_under_the_root() {
        assert_eq!(
            resolve_path("public", "/css/site.css").unwrap(),
            PathBuf::from("public/css/site.css")
        );
    }

    #[test]
    fn root_request_maps_to_the_root_directory() {
        // The responder turns directory targets into 404s downstream
        assert_eq!(resolve_path("public", "/").unwrap(), PathBuf::from("public"));
    }

    #[test]
    fn parent_components_are_rejected() {
        assert!(resolve_path("public", "/../etc/passwd").is_none());
        assert!(resolve_path("public", "/css/../../secret").is_none());
    }

    #[test]
    fn dotted_filenames_pass_through_to_the_hidden_file_gate() {
        // Rejecting dotfiles is the responder's job, before any stat
        assert_eq!(
            resolve_path("public", "/.well-known").unwrap(),
            PathBuf::from("public/.well-known")
        );
    }
}
