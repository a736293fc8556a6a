//! Response planning for static assets
//!
//! The planner is a pure function from request headers plus a stat result
//! to a `ResponsePlan`. Every status and header decision happens here;
//! file I/O lives in `stream` and `serve`. Keeping the planner pure makes
//! the whole decision table testable without touching the filesystem.

use std::time::{Duration, SystemTime};

use httpdate::fmt_http_date;
use hyper::header::{
    HeaderMap, HeaderName, HeaderValue, ACCEPT_RANGES, CACHE_CONTROL, CONNECTION, CONTENT_LENGTH,
    CONTENT_RANGE, CONTENT_TYPE, ETAG, EXPIRES, LAST_MODIFIED,
};
use hyper::StatusCode;

use crate::http::range::{parse_ranges, ByteRange};
use crate::logger;
use crate::responder::types::{
    AssetRequest, BodyPlan, ResponderOptions, ResponsePlan, StatOutcome,
};

/// How the body is served once metadata checks pass
#[derive(Clone, Copy)]
enum Disposition {
    NotModified,
    Full,
    Partial(ByteRange),
    Unsatisfiable,
}

/// Decide status, headers, and body range for an asset request
///
/// Evaluation order:
/// 1. stat failure or directory target is a 404
/// 2. `If-Modified-Since` equal to `Last-Modified` is a 304
/// 3. a `Range` header (when range support is on) is a 206 or 416
/// 4. everything else is a 200 serving the whole file
///
/// The hidden-file rejection happens before the stat call and therefore
/// before this function; see `serve::serve_asset`.
pub fn plan_response(
    request: &AssetRequest,
    stat: &StatOutcome,
    options: &ResponderOptions,
    now: SystemTime,
) -> ResponsePlan {
    let metadata = match stat {
        StatOutcome::Found(metadata) => metadata,
        StatOutcome::Directory | StatOutcome::Missing => return not_found_plan(),
    };

    let last_modified = fmt_http_date(metadata.modified);

    // The conditional check is exact string equality against the formatted
    // Last-Modified value, not a date-order comparison. A client echoing a
    // reformatted but equivalent date gets a full response.
    let disposition = if request.if_modified_since.as_deref() == Some(last_modified.as_str()) {
        Disposition::NotModified
    } else if options.accept_ranges {
        match request.range.as_deref() {
            // Multi-range requests degrade to single-range service: only
            // the first parsed range is used.
            Some(header) => match parse_ranges(metadata.size, header)
                .and_then(|ranges| ranges.into_iter().next())
            {
                Some(range) => Disposition::Partial(range),
                None => Disposition::Unsatisfiable,
            },
            None => Disposition::Full,
        }
    } else {
        Disposition::Full
    };

    let mut headers = HeaderMap::new();
    let mime = mime_guess::from_path(&request.path).first_or_octet_stream();
    insert_header(&mut headers, CONTENT_TYPE, mime.as_ref());
    insert_header(
        &mut headers,
        CACHE_CONTROL,
        &format!("{}, max-age={}", options.cache_directive, options.max_age),
    );
    insert_header(&mut headers, LAST_MODIFIED, &last_modified);

    // Content-Length is omitted on 304 and 416: both send no body
    match disposition {
        Disposition::Full => {
            headers.insert(CONTENT_LENGTH, HeaderValue::from(metadata.size));
        }
        Disposition::Partial(range) => {
            headers.insert(CONTENT_LENGTH, HeaderValue::from(range.byte_count()));
        }
        Disposition::NotModified | Disposition::Unsatisfiable => {}
    }

    let expires = now + Duration::from_secs(options.max_age);
    insert_header(&mut headers, EXPIRES, &fmt_http_date(expires));

    if let Some(etag) = options.etag.compute(metadata) {
        insert_header(&mut headers, ETAG, &etag);
    }

    match disposition {
        Disposition::NotModified => ResponsePlan {
            status: StatusCode::NOT_MODIFIED,
            headers,
            body: BodyPlan::Empty,
        },
        Disposition::Full => {
            if options.accept_ranges {
                insert_header(&mut headers, ACCEPT_RANGES, "bytes");
            }
            ResponsePlan {
                status: StatusCode::OK,
                headers,
                body: BodyPlan::Whole,
            }
        }
        Disposition::Partial(range) => {
            insert_header(&mut headers, ACCEPT_RANGES, "bytes");
            insert_header(
                &mut headers,
                CONTENT_RANGE,
                &format!("bytes {}-{}/{}", range.start, range.end, metadata.size),
            );
            ResponsePlan {
                status: StatusCode::PARTIAL_CONTENT,
                headers,
                body: BodyPlan::Range(range),
            }
        }
        Disposition::Unsatisfiable => {
            insert_header(&mut headers, ACCEPT_RANGES, "bytes");
            insert_header(
                &mut headers,
                CONTENT_RANGE,
                &format!("bytes */{}", metadata.size),
            );
            insert_header(&mut headers, CONNECTION, "close");
            ResponsePlan {
                status: StatusCode::RANGE_NOT_SATISFIABLE,
                headers,
                body: BodyPlan::Empty,
            }
        }
    }
}

/// Plan for a missing, directory, or hidden target
pub fn not_found_plan() -> ResponsePlan {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("text/plain"));
    ResponsePlan {
        status: StatusCode::NOT_FOUND,
        headers,
        body: BodyPlan::Message("404 Not Found"),
    }
}

/// Insert a header, dropping values that cannot be encoded
///
/// Only a custom ETag generator can produce an invalid value; everything
/// else in the plan is built from known-clean strings.
fn insert_header(headers: &mut HeaderMap, name: HeaderName, value: &str) {
    match HeaderValue::from_str(value) {
        Ok(value) => {
            headers.insert(name, value);
        }
        Err(_) => logger::log_warning(&format!("Dropping invalid {name} header value")),
    }
}
