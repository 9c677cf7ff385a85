use crate::state::AppState;
use axum::{
    body::{Body, HttpBody},
    extract::{Request, State},
    http::{header, header::AsHeaderName, HeaderMap},
    Json,
};
use beta_stack_core::constants::FILE_NAME_HEADER;
use beta_stack_core::{ByteStream, UploadRequest, UploadResult};
use futures::{StreamExt, TryStreamExt};
use std::io;
use std::sync::Arc;

/// Raw-body upload. The request body is written to disk as it arrives.
///
/// Always answers 200; clients must check `success` in the returned document.
#[utoipa::path(
    post,
    path = "/upload/stream",
    tag = "uploads",
    params(
        ("X-File-Name" = Option<String>, Header, description = "Suggested file name; a timestamped name is generated when absent")
    ),
    request_body(content = Vec<u8>, content_type = "application/octet-stream", description = "File bytes, any content type"),
    responses(
        (status = 200, description = "Upload outcome; inspect `success`", body = UploadResult)
    )
)]
#[tracing::instrument(skip_all)]
pub async fn stream_upload(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Json<UploadResult> {
    let (parts, body) = request.into_parts();

    let upload = UploadRequest::new(
        header_string(&parts.headers, header::CONTENT_TYPE),
        header_string(&parts.headers, FILE_NAME_HEADER),
        body_stream(&parts.headers, body),
    );

    Json(state.uploads.handle(upload).await)
}

/// Header value as text. Non-UTF-8 bytes are replaced rather than rejected.
fn header_string<K: AsHeaderName>(headers: &HeaderMap, name: K) -> Option<String> {
    headers
        .get(name)
        .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned())
}

/// The request body as a chunk stream, or `None` when the request carried no body.
///
/// A body is absent when it is already at its end and the client declared neither
/// `Content-Length` nor `Transfer-Encoding`. An explicit `Content-Length: 0` is an
/// empty upload, not a missing one.
fn body_stream(headers: &HeaderMap, body: Body) -> Option<ByteStream> {
    let declared =
        headers.contains_key(header::CONTENT_LENGTH) || headers.contains_key(header::TRANSFER_ENCODING);

    if !declared && body.is_end_stream() {
        return None;
    }

    Some(body.into_data_stream().map_err(io::Error::other).boxed())
}
