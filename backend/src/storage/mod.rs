//! Upload storage - streams request bodies into files.
//!
//! Files land directly in the configured directory under the name the
//! client supplied, reduced to its last path component.

use axum::body::Bytes;
use futures::{pin_mut, Stream, StreamExt};
use std::path::{Path, PathBuf};
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;

use crate::error::{StoreError, StoreResult};
use crate::progress::{ProgressReporter, TransferProgress};

/// A file that was written successfully.
#[derive(Debug, Clone)]
pub struct StoredFile {
    pub file_name: String,
    pub path: PathBuf,
    pub bytes_written: u64,
}

/// Reduce a client-supplied name to a safe file name.
///
/// Both `/` and `\` count as separators, so `../../etc/passwd` and
/// `C:\Users\me\a.txt` become `passwd` and `a.txt`.
pub fn sanitize_file_name(raw: &str) -> StoreResult<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(StoreError::MissingFileName);
    }

    let last = trimmed
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();

    if last.is_empty() || last == "." || last == ".." || last.contains('\0') {
        return Err(StoreError::InvalidFileName(raw.to_string()));
    }
    Ok(last.to_string())
}

/// Writes uploads into a single directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
    reporter: ProgressReporter,
}

impl FileStore {
    pub fn new(root: impl AsRef<Path>, reporter: ProgressReporter) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            reporter,
        }
    }

    /// Stream `chunks` into `<root>/<name>`.
    ///
    /// `length` is the announced body size, used only for progress output.
    /// Stream errors are passed through as they are. On a failed copy the
    /// partial file is removed.
    pub async fn store<S>(&self, name: &str, length: Option<u64>, chunks: S) -> StoreResult<StoredFile>
    where
        S: Stream<Item = StoreResult<Bytes>>,
    {
        let file_name = sanitize_file_name(name)?;
        let path = self.root.join(&file_name);

        let mut out = File::create(&path).await.map_err(StoreError::Create)?;
        let mut progress = TransferProgress::new(file_name.clone(), length);

        let copied = copy_chunks(&mut out, chunks, &mut progress, self.reporter).await;
        if let Err(e) = copied {
            drop(out);
            let _ = fs::remove_file(&path).await;
            return Err(e);
        }

        self.reporter.finish(&progress);

        Ok(StoredFile {
            file_name,
            path,
            bytes_written: progress.written,
        })
    }
}

async fn copy_chunks<S>(
    out: &mut File,
    chunks: S,
    progress: &mut TransferProgress,
    reporter: ProgressReporter,
) -> StoreResult<()>
where
    S: Stream<Item = StoreResult<Bytes>>,
{
    pin_mut!(chunks);
    while let Some(chunk) = chunks.next().await {
        let chunk = chunk?;
        out.write_all(&chunk).await.map_err(StoreError::Copy)?;
        reporter.record(progress, chunk.len() as u64);
    }
    out.flush().await.map_err(StoreError::Copy)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;
    use tempfile::tempdir;

    fn chunks(parts: &[&'static [u8]]) -> impl Stream<Item = StoreResult<Bytes>> {
        stream::iter(
            parts
                .iter()
                .map(|p| Ok(Bytes::from_static(p)))
                .collect::<Vec<_>>(),
        )
    }

    #[test]
    fn test_sanitize_plain_name() {
        assert_eq!(sanitize_file_name("a.txt").unwrap(), "a.txt");
        assert_eq!(sanitize_file_name("  spaced name.pdf ").unwrap(), "spaced name.pdf");
    }

    #[test]
    fn test_sanitize_strips_directories() {
        assert_eq!(sanitize_file_name("../../etc/passwd").unwrap(), "passwd");
        assert_eq!(sanitize_file_name("C:\\Users\\me\\a.txt").unwrap(), "a.txt");
    }

    #[test]
    fn test_sanitize_rejects_empty_and_dots() {
        assert!(matches!(sanitize_file_name("   "), Err(StoreError::MissingFileName)));
        assert!(matches!(sanitize_file_name(".."), Err(StoreError::InvalidFileName(_))));
        assert!(matches!(sanitize_file_name("dir/"), Err(StoreError::InvalidFileName(_))));
    }

    #[tokio::test]
    async fn test_store_writes_all_chunks() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path(), ProgressReporter::new(false));

        let stored = store
            .store("hello.txt", Some(11), chunks(&[b"hello", b" ", b"world"]))
            .await
            .unwrap();

        assert_eq!(stored.bytes_written, 11);
        assert_eq!(stored.file_name, "hello.txt");
        let content = std::fs::read(dir.path().join("hello.txt")).unwrap();
        assert_eq!(content, b"hello world");
    }

    #[tokio::test]
    async fn test_store_removes_partial_file_on_error() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path(), ProgressReporter::new(true));

        let broken = stream::iter(vec![
            Ok(Bytes::from_static(b"part")),
            Err(StoreError::Body("connection reset".to_string())),
        ]);
        let err = store.store("broken.bin", None, broken).await.unwrap_err();

        assert!(matches!(err, StoreError::Body(_)));
        assert!(!dir.path().join("broken.bin").exists());
    }

    #[tokio::test]
    async fn test_store_keeps_too_large_and_cleans_up() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path(), ProgressReporter::new(false));

        let capped = stream::iter(vec![Ok(Bytes::from_static(b"first")), Err(StoreError::TooLarge)]);
        let err = store.store("capped.bin", None, capped).await.unwrap_err();

        assert!(matches!(err, StoreError::TooLarge));
        assert!(!dir.path().join("capped.bin").exists());
    }

    #[tokio::test]
    async fn test_store_rejects_traversal_before_touching_disk() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path(), ProgressReporter::new(false));

        let err = store.store("..", None, chunks(&[b"x"])).await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidFileName(_)));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
