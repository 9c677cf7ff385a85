use crate::stream::copy_stream;
use crate::traits::{Storage, StorageError, StorageResult, StoredFile, StreamOptions};
use async_trait::async_trait;
use beta_stack_core::ByteStream;
use std::path::{Component, Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Local filesystem storage implementation
#[derive(Clone, Debug)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    /// Create a new LocalStorage instance, creating the root directory and any
    /// missing parents.
    ///
    /// # Arguments
    /// * `base_path` - Root directory for uploaded files (e.g., "/var/lib/beta-stack/uploads")
    pub async fn new(base_path: impl Into<PathBuf>) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalStorage { base_path })
    }

    /// Convert a file name to its path under the root.
    ///
    /// The name must be exactly one normal path component: no separators, no `.`
    /// or `..`, no leading dot and no NUL byte.
    fn key_to_path(&self, file_name: &str) -> StorageResult<PathBuf> {
        if file_name.is_empty()
            || file_name.starts_with('.')
            || file_name.contains(['/', '\\', '\0'])
        {
            return Err(StorageError::InvalidKey(format!(
                "File name '{}' is not a single safe path component",
                file_name
            )));
        }

        let mut components = Path::new(file_name).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => Ok(self.base_path.join(file_name)),
            _ => Err(StorageError::InvalidKey(format!(
                "File name '{}' is not a single safe path component",
                file_name
            ))),
        }
    }

    async fn discard_partial(&self, path: &Path) {
        match fs::remove_file(path).await {
            Ok(()) => tracing::debug!(path = %path.display(), "Removed partial upload"),
            Err(e) => tracing::warn!(
                path = %path.display(),
                error = %e,
                "Failed to remove partial upload"
            ),
        }
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn store_stream(
        &self,
        file_name: &str,
        mut stream: ByteStream,
        options: StreamOptions,
    ) -> StorageResult<StoredFile> {
        let path = self.key_to_path(file_name)?;
        let start = std::time::Instant::now();

        // create_new: never truncate an existing upload
        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
            .map_err(|e| {
                StorageError::UploadFailed(format!("Failed to create file {}: {}", file_name, e))
            })?;

        let copied = copy_stream(&mut stream, &mut file, &options.cancel, options.deadline).await;

        let result = match copied {
            Ok(size) => file.sync_all().await.map(|_| size).map_err(|e| {
                StorageError::WriteFailed(format!("Failed to sync file {}: {}", file_name, e))
            }),
            Err(e) => {
                // Let any in-flight write land so the partial file is complete up to the failure
                if let Err(flush_err) = file.flush().await {
                    tracing::debug!(
                        path = %path.display(),
                        error = %flush_err,
                        "Flush of partial upload failed"
                    );
                }
                Err(e)
            }
        };

        // Release the handle before reporting, on success and failure alike
        drop(file);

        match result {
            Ok(size) => {
                tracing::info!(
                    path = %path.display(),
                    file_name = %file_name,
                    size_bytes = size,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Local storage stream upload successful"
                );

                Ok(StoredFile {
                    file_name: file_name.to_string(),
                    size,
                    path,
                })
            }
            Err(err) => {
                tracing::warn!(
                    path = %path.display(),
                    file_name = %file_name,
                    error = %err,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    remove_partial = options.remove_partial_on_failure,
                    "Local storage stream upload failed"
                );

                if options.remove_partial_on_failure {
                    self.discard_partial(&path).await;
                }

                Err(err)
            }
        }
    }

    async fn exists(&self, file_name: &str) -> StorageResult<bool> {
        let path = self.key_to_path(file_name)?;
        Ok(fs::try_exists(&path).await?)
    }

    async fn content_length(&self, file_name: &str) -> StorageResult<u64> {
        let path = self.key_to_path(file_name)?;
        match fs::metadata(&path).await {
            Ok(meta) => Ok(meta.len()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(file_name.to_string()))
            }
            Err(e) => Err(StorageError::IoError(e)),
        }
    }

    async fn health_check(&self) -> StorageResult<()> {
        let meta = fs::metadata(&self.base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Storage directory {} is not accessible: {}",
                self.base_path.display(),
                e
            ))
        })?;

        if !meta.is_dir() {
            return Err(StorageError::ConfigError(format!(
                "Storage path {} is not a directory",
                self.base_path.display()
            )));
        }

        if meta.permissions().readonly() {
            return Err(StorageError::ConfigError(format!(
                "Storage directory {} is read-only",
                self.base_path.display()
            )));
        }

        Ok(())
    }

    fn root(&self) -> &Path {
        &self.base_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use futures::StreamExt;
    use std::io;
    use std::time::Duration;
    use tempfile::tempdir;
    use tokio_util::sync::CancellationToken;

    fn chunked(data: &[u8], chunk_size: usize) -> ByteStream {
        let chunks: Vec<io::Result<Bytes>> = data
            .chunks(chunk_size.max(1))
            .map(|c| Ok(Bytes::copy_from_slice(c)))
            .collect();
        futures::stream::iter(chunks).boxed()
    }

    #[tokio::test]
    async fn test_new_creates_missing_parents() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("a").join("b").join("uploads");

        let storage = LocalStorage::new(&root).await.unwrap();

        assert!(root.is_dir());
        assert_eq!(storage.root(), root.as_path());
        storage.health_check().await.unwrap();
    }

    #[tokio::test]
    async fn test_new_fails_when_root_is_a_file() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("not-a-dir");
        std::fs::write(&file, b"x").unwrap();

        let result = LocalStorage::new(&file).await;
        assert!(matches!(result, Err(StorageError::ConfigError(_))));
    }

    #[tokio::test]
    async fn test_store_stream_size_matches_input() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();

        for (i, len) in [0usize, 1, 4096, 70_000].into_iter().enumerate() {
            let data: Vec<u8> = (0..len).map(|b| (b % 251) as u8).collect();
            let name = format!("{}-payload.bin", i);

            let stored = storage
                .store_stream(&name, chunked(&data, 16 * 1024), StreamOptions::default())
                .await
                .unwrap();

            assert_eq!(stored.size, len as u64);
            assert_eq!(storage.content_length(&name).await.unwrap(), len as u64);
            assert_eq!(std::fs::read(&stored.path).unwrap(), data);
        }
    }

    #[tokio::test]
    async fn test_store_stream_never_overwrites() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();

        storage
            .store_stream("1-clip.mp4", chunked(b"original", 4), StreamOptions::default())
            .await
            .unwrap();

        let result = storage
            .store_stream("1-clip.mp4", chunked(b"replacement", 4), StreamOptions::default())
            .await;

        assert!(matches!(result, Err(StorageError::UploadFailed(_))));
        assert_eq!(
            std::fs::read(dir.path().join("1-clip.mp4")).unwrap(),
            b"original"
        );
    }

    #[tokio::test]
    async fn test_path_traversal_rejected() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();

        for name in ["../escape.txt", "..", ".", "", "a/b.txt", "a\\b.txt", "/etc/passwd", ".hidden"] {
            let result = storage
                .store_stream(name, chunked(b"x", 1), StreamOptions::default())
                .await;
            assert!(
                matches!(result, Err(StorageError::InvalidKey(_))),
                "name {:?} should be rejected",
                name
            );
        }

        assert!(matches!(
            storage.exists("../etc/passwd").await,
            Err(StorageError::InvalidKey(_))
        ));
    }

    #[tokio::test]
    async fn test_failed_stream_keeps_partial_file_by_default() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();

        let stream = futures::stream::iter(vec![
            Ok(Bytes::from_static(b"0123456789")),
            Err(io::Error::new(io::ErrorKind::ConnectionReset, "connection reset by peer")),
        ])
        .boxed();

        let err = storage
            .store_stream("9-partial.bin", stream, StreamOptions::default())
            .await
            .unwrap_err();

        assert!(matches!(err, StorageError::StreamFailed(_)));
        assert!(storage.exists("9-partial.bin").await.unwrap());
        assert_eq!(storage.content_length("9-partial.bin").await.unwrap(), 10);
    }

    #[tokio::test]
    async fn test_failed_stream_removes_partial_file_when_asked() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();

        let stream = futures::stream::iter(vec![
            Ok(Bytes::from_static(b"0123456789")),
            Err(io::Error::other("boom")),
        ])
        .boxed();

        let options = StreamOptions {
            remove_partial_on_failure: true,
            ..StreamOptions::default()
        };
        let result = storage.store_stream("9-partial.bin", stream, options).await;

        assert!(result.is_err());
        assert!(!storage.exists("9-partial.bin").await.unwrap());
    }

    #[tokio::test]
    async fn test_cancelled_upload_returns_promptly() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();

        let cancel = CancellationToken::new();
        let options = StreamOptions {
            cancel: cancel.clone(),
            ..StreamOptions::default()
        };
        let stream = futures::stream::iter(vec![Ok(Bytes::from_static(b"head"))])
            .chain(futures::stream::pending())
            .boxed();

        let handle = tokio::spawn({
            let storage = storage.clone();
            async move { storage.store_stream("3-stalled.bin", stream, options).await }
        });

        tokio::time::sleep(Duration::from_millis(20)).await;
        cancel.cancel();

        let result = tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("upload should stop after cancellation")
            .unwrap();

        assert!(matches!(result, Err(StorageError::Cancelled(_))));
    }

    #[tokio::test]
    async fn test_exists_reports_io_errors() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("uploads");
        let storage = LocalStorage::new(&root).await.unwrap();

        // Root replaced by a regular file: lookups below it fail with ENOTDIR
        std::fs::remove_dir(&root).unwrap();
        std::fs::write(&root, b"x").unwrap();

        assert!(matches!(
            storage.exists("1-clip.mp4").await,
            Err(StorageError::IoError(_))
        ));
    }

    #[tokio::test]
    async fn test_content_length_missing_file() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();

        assert!(matches!(
            storage.content_length("missing.bin").await,
            Err(StorageError::NotFound(_))
        ));
        assert!(!storage.exists("missing.bin").await.unwrap());
    }
}
