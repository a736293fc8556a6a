//! Bounded-chunk file streaming
//!
//! Bodies are produced as a stream of fixed-capacity chunks so a large
//! file never occupies more than one chunk of memory per in-flight
//! request. Dropping the body (client disconnect) closes the underlying
//! file handle on every exit path.

use std::io::SeekFrom;
use std::path::Path;

use futures_util::TryStreamExt;
use http_body_util::{BodyExt, StreamBody};
use hyper::body::Frame;
use tokio::fs::File;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncSeekExt};
use tokio_util::io::ReaderStream;

use crate::http::range::ByteRange;
use crate::http::response::AssetBody;
use crate::logger;
use crate::responder::types::ServeError;

/// Upper bound on bytes held in memory per in-flight body
pub const STREAM_CHUNK_SIZE: usize = 64 * 1024;

/// Open the file and position it for the requested byte range
///
/// Errors here happen before any header has been written, so callers can
/// still downgrade them to a 404. Errors after this point surface through
/// the stream itself.
pub async fn open_body(path: &Path, range: Option<ByteRange>) -> Result<AssetBody, ServeError> {
    let mut file = File::open(path).await.map_err(|err| {
        if err.kind() == std::io::ErrorKind::NotFound {
            ServeError::NotFound
        } else {
            ServeError::Io(err)
        }
    })?;

    match range {
        Some(range) => {
            file.seek(SeekFrom::Start(range.start)).await?;
            Ok(reader_body(file.take(range.byte_count()), path))
        }
        None => Ok(reader_body(file, path)),
    }
}

/// Wrap a reader into a streaming response body
///
/// A read error mid-stream is reported to the error log only: the status
/// line is already committed by then, so the connection is torn down
/// instead of being answered twice.
fn reader_body<R>(reader: R, path: &Path) -> AssetBody
where
    R: AsyncRead + Send + Sync + 'static,
{
    let target = path.display().to_string();
    let stream = ReaderStream::with_capacity(reader, STREAM_CHUNK_SIZE)
        .inspect_err(move |err| logger::log_stream_error(&target, err))
        .map_ok(Frame::data);
    StreamBody::new(stream).boxed()
}
