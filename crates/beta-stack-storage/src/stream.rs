//! Chunk-by-chunk copy from a byte stream into a writer.

use crate::traits::{StorageError, StorageResult};
use bytes::Bytes;
use futures::{Stream, StreamExt};
use std::io;
use std::time::Duration;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio_util::sync::CancellationToken;

/// Copy `stream` into `writer`, returning the number of bytes written.
///
/// Each chunk is written completely before the next one is polled, so at most one
/// chunk is held at a time. Both the wait for the next chunk and each write race
/// against `cancel` and the optional `deadline`. The writer is flushed on success.
pub async fn copy_stream<S, W>(
    stream: &mut S,
    writer: &mut W,
    cancel: &CancellationToken,
    deadline: Option<Duration>,
) -> StorageResult<u64>
where
    S: Stream<Item = io::Result<Bytes>> + Unpin + ?Sized,
    W: AsyncWrite + Unpin + ?Sized,
{
    let expired = async {
        match deadline {
            Some(after) => tokio::time::sleep(after).await,
            None => std::future::pending::<()>().await,
        }
    };
    tokio::pin!(expired);

    let mut total: u64 = 0;

    loop {
        let next = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                return Err(StorageError::Cancelled(format!("aborted after {} bytes", total)));
            }
            _ = &mut expired => {
                return Err(StorageError::TimedOut(deadline.unwrap_or_default()));
            }
            next = stream.next() => next,
        };

        let chunk = match next {
            None => break,
            Some(Ok(chunk)) => chunk,
            Some(Err(e)) => return Err(StorageError::StreamFailed(e.to_string())),
        };

        if chunk.is_empty() {
            continue;
        }

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                return Err(StorageError::Cancelled(format!("aborted after {} bytes", total)));
            }
            _ = &mut expired => {
                return Err(StorageError::TimedOut(deadline.unwrap_or_default()));
            }
            written = writer.write_all(&chunk) => {
                written.map_err(|e| StorageError::WriteFailed(e.to_string()))?;
            }
        }

        total += chunk.len() as u64;
    }

    writer
        .flush()
        .await
        .map_err(|e| StorageError::WriteFailed(e.to_string()))?;

    Ok(total)
}
