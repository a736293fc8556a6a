//! Asset serving orchestration
//!
//! Glues the hidden-file gate, the stat lookup, the response planner, and
//! the streaming body together for one request. Each request performs its
//! own stat and stream; nothing is shared or coalesced across requests.

use std::ffi::OsStr;
use std::path::Path;
use std::time::SystemTime;

use hyper::Response;
use tokio::fs;

use crate::http::response::{self, AssetBody};
use crate::responder::plan::{not_found_plan, plan_response};
use crate::responder::stream;
use crate::responder::types::{
    AssetMetadata, AssetRequest, BodyPlan, ResponderOptions, ResponsePlan, StatOutcome,
};

/// Serve one static asset request end to end
///
/// Hidden files (leading-dot basename) are rejected before the stat call
/// ever happens. Stat failures and directory targets map to 404, and so
/// do stream-open failures since no header has been committed yet.
pub async fn serve_asset(
    request: &AssetRequest,
    options: &ResponderOptions,
    is_head: bool,
) -> Response<AssetBody> {
    if is_hidden(&request.path) {
        return render(not_found_plan(), &request.path, is_head).await;
    }

    let stat = stat_path(&request.path).await;
    let plan = plan_response(request, &stat, options, SystemTime::now());
    render(plan, &request.path, is_head).await
}

/// A basename whose first character is `.` is never served
pub fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(OsStr::to_str)
        .is_some_and(|name| name.starts_with('.'))
}

/// Fresh metadata lookup for the target path
async fn stat_path(path: &Path) -> StatOutcome {
    match fs::metadata(path).await {
        Ok(metadata) if metadata.is_dir() => StatOutcome::Directory,
        Ok(metadata) => StatOutcome::Found(AssetMetadata::from_fs(&metadata)),
        Err(_) => StatOutcome::Missing,
    }
}

/// Attach a body to the plan and build the final response
///
/// HEAD requests get the full header set with an empty body and skip the
/// file open entirely.
async fn render(plan: ResponsePlan, path: &Path, is_head: bool) -> Response<AssetBody> {
    let body = if is_head {
        response::empty_body()
    } else {
        match plan.body {
            BodyPlan::Empty => response::empty_body(),
            BodyPlan::Message(text) => response::full_body(text),
            BodyPlan::Whole => match stream::open_body(path, None).await {
                Ok(body) => body,
                Err(_) => return response::build_404_response(),
            },
            BodyPlan::Range(range) => match stream::open_body(path, Some(range)).await {
                Ok(body) => body,
                Err(_) => return response::build_404_response(),
            },
        }
    };

    response::apply_plan(plan, body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::responder::etag::EtagPolicy;
    use http_body_util::BodyExt;
    use std::path::PathBuf;

    fn options() -> ResponderOptions {
        ResponderOptions {
            cache_directive: "public".to_string(),
            max_age: 3600,
            accept_ranges: true,
            etag: EtagPolicy::Auto,
        }
    }

    fn request(path: PathBuf, range: Option<&str>) -> AssetRequest {
        AssetRequest {
            path,
            if_modified_since: None,
            range: range.map(ToString::to_string),
        }
    }

    async fn body_bytes(response: Response<AssetBody>) -> Vec<u8> {
        response
            .into_body()
            .collect()
            .await
            .unwrap()
            .to_bytes()
            .to_vec()
    }

    #[test]
    fn dot_basenames_are_hidden() {
        assert!(is_hidden(Path::new("public/.htaccess")));
        assert!(is_hidden(Path::new(".env")));
        assert!(!is_hidden(Path::new("public/site.css")));
        // Only the basename matters, not intermediate components
        assert!(!is_hidden(Path::new("public/assets/app.js")));
    }

    #[tokio::test]
    async fn existing_hidden_file_is_served_as_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".secret");
        std::fs::write(&path, b"do not serve").unwrap();

        let response = serve_asset(&request(path, None), &options(), false).await;
        assert_eq!(response.status(), 404);
        assert_eq!(body_bytes(response).await, b"404 Not Found");
    }

    #[tokio::test]
    async fn directory_target_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let response =
            serve_asset(&request(dir.path().to_path_buf(), None), &options(), false).await;
        assert_eq!(response.status(), 404);
    }

    #[tokio::test]
    async fn missing_path_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let response = serve_asset(
            &request(dir.path().join("absent.txt"), None),
            &options(),
            false,
        )
        .await;
        assert_eq!(response.status(), 404);
    }

    #[tokio::test]
    async fn whole_file_is_served_with_headers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("site.css");
        std::fs::write(&path, b"body { margin: 0 }").unwrap();

        let response = serve_asset(&request(path, None), &options(), false).await;
        assert_eq!(response.status(), 200);
        assert_eq!(response.headers()["Content-Type"], "text/css");
        assert_eq!(response.headers()["Content-Length"], "18");
        assert_eq!(response.headers()["Accept-Ranges"], "bytes");
        assert!(response.headers().contains_key("ETag"));
        assert_eq!(body_bytes(response).await, b"body { margin: 0 }");
    }

    #[tokio::test]
    async fn head_request_has_headers_but_no_body() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("site.css");
        std::fs::write(&path, b"body { margin: 0 }").unwrap();

        let response = serve_asset(&request(path, None), &options(), true).await;
        assert_eq!(response.status(), 200);
        assert_eq!(response.headers()["Content-Length"], "18");
        assert!(body_bytes(response).await.is_empty());
    }

    #[tokio::test]
    async fn range_request_streams_the_slice() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.bin");
        std::fs::write(&path, b"0123456789").unwrap();

        let response = serve_asset(&request(path, Some("bytes=3-6")), &options(), false).await;
        assert_eq!(response.status(), 206);
        assert_eq!(response.headers()["Content-Range"], "bytes 3-6/10");
        assert_eq!(body_bytes(response).await, b"3456");
    }

    #[tokio::test]
    async fn concurrent_ranges_on_one_path_are_independent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.bin");
        std::fs::write(&path, b"abcdefghij").unwrap();

        let opts = options();
        let req_first = request(path.clone(), Some("bytes=0-3"));
        let req_second = request(path.clone(), Some("bytes=6-9"));
        let first = serve_asset(&req_first, &opts, false);
        let second = serve_asset(&req_second, &opts, false);
        let (first, second) = tokio::join!(first, second);

        assert_eq!(first.headers()["Content-Range"], "bytes 0-3/10");
        assert_eq!(second.headers()["Content-Range"], "bytes 6-9/10");
        assert_eq!(body_bytes(first).await, b"abcd");
        assert_eq!(body_bytes(second).await, b"ghij");
    }

    #[tokio::test]
    async fn unsatisfiable_range_has_empty_body() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.bin");
        std::fs::write(&path, b"0123456789").unwrap();

        let response = serve_asset(&request(path, Some("bytes=50-60")), &options(), false).await;
        assert_eq!(response.status(), 416);
        assert_eq!(response.headers()["Connection"], "close");
        assert!(body_bytes(response).await.is_empty());
    }
}
