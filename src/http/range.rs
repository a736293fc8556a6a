//! HTTP Range request parsing module
//!
//! Range header parsing for resumable downloads, compliant with RFC 7233.
//! The parser returns every satisfiable range in the header; callers that
//! serve a single range use the first entry.

/// One satisfiable byte range, inclusive on both ends
///
/// Invariant: `0 <= start <= end < total_size` for the size the range was
/// parsed against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    /// Start byte position
    pub start: u64,
    /// End byte position (inclusive)
    pub end: u64,
}

impl ByteRange {
    /// Number of bytes the range covers
    #[inline]
    pub const fn byte_count(&self) -> u64 {
        self.end - self.start + 1
    }
}

/// Outcome of parsing one range spec within the header
enum PartOutcome {
    Valid(ByteRange),
    /// Syntactically valid but out of bounds for this file
    Unsatisfiable,
    Malformed,
}

/// Parse an HTTP Range header value against a resource of `total_size` bytes
///
/// Supported forms:
/// - `bytes=start-end` - Specific range
/// - `bytes=start-` - From start to end of file
/// - `bytes=-suffix` - Last suffix bytes
/// - Comma-separated combinations of the above
///
/// Returns `None` when the header is malformed, uses a non-bytes unit, or
/// contains no satisfiable range; `None` maps to 416 at the HTTP boundary.
/// Ends past EOF are clamped to the last byte.
///
/// # Examples
/// ```
/// use staticd::http::range::{parse_ranges, ByteRange};
///
/// let ranges = parse_ranges(1000, "bytes=0-99").unwrap();
/// assert_eq!(ranges[0], ByteRange { start: 0, end: 99 });
///
/// // Start past EOF is not satisfiable
/// assert!(parse_ranges(1000, "bytes=2000-").is_none());
/// ```
pub fn parse_ranges(total_size: u64, header: &str) -> Option<Vec<ByteRange>> {
    let spec_list = header.strip_prefix("bytes=")?;
    if total_size == 0 {
        return None;
    }

    let mut ranges = Vec::new();
    for part in spec_list.split(',') {
        match parse_part(total_size, part.trim()) {
            PartOutcome::Valid(range) => ranges.push(range),
            PartOutcome::Unsatisfiable => {}
            PartOutcome::Malformed => return None,
        }
    }

    if ranges.is_empty() {
        None
    } else {
        Some(ranges)
    }
}

/// Parse a single range spec (e.g. `0-99`, `100-`, `-500`)
fn parse_part(total_size: u64, part: &str) -> PartOutcome {
    let Some((start_str, end_str)) = part.split_once('-') else {
        return PartOutcome::Malformed;
    };
    let (start_str, end_str) = (start_str.trim(), end_str.trim());

    // Suffix range: "-500" means the last 500 bytes
    if start_str.is_empty() {
        let Ok(suffix) = end_str.parse::<u64>() else {
            return PartOutcome::Malformed;
        };
        if suffix == 0 {
            return PartOutcome::Unsatisfiable;
        }
        // Suffix larger than the file covers the whole file
        return PartOutcome::Valid(ByteRange {
            start: total_size.saturating_sub(suffix),
            end: total_size - 1,
        });
    }

    let Ok(start) = start_str.parse::<u64>() else {
        return PartOutcome::Malformed;
    };
    if start >= total_size {
        return PartOutcome::Unsatisfiable;
    }

    let end = if end_str.is_empty() {
        // Open-ended range: through EOF
        total_size - 1
    } else {
        let Ok(end) = end_str.parse::<u64>() else {
            return PartOutcome::Malformed;
        };
        end.min(total_size - 1)
    };

    if start > end {
        return PartOutcome::Malformed;
    }

    PartOutcome::Valid(ByteRange { start, end })
}
