//! Shared helpers for filesystem operations.

use std::time::{SystemTime, UNIX_EPOCH};

use futures::future::{try_join_all, BoxFuture};
use sha2::{Digest, Sha256};
use tokio::task::JoinHandle;

use crate::error::{Result, StorageError};

/// Normalize a folder-relative path: collapse `//`, drop trailing slashes,
/// force a leading slash. The storage root is the empty string.
pub(crate) fn relative_path(path: &str) -> String {
    let mut result = path.to_string();
    while result.contains("//") {
        result = result.replace("//", "/");
    }
    while result.ends_with('/') {
        result.pop();
    }
    if !result.is_empty() && !result.starts_with('/') {
        result = format!("/{}", result);
    }
    result
}

/// Absolute storage path for a normalized relative path.
pub(crate) fn remote_path(folder: &str, relative: &str) -> String {
    format!("{}{}", folder, relative)
}

/// Folder-relative path for an absolute storage path.
///
/// Bulk listings report names without the leading slash
/// (`12345/a/b.txt`); both spellings are accepted. Paths outside the
/// folder are returned unchanged.
pub(crate) fn strip_folder(folder: &str, full: &str) -> String {
    let full = if full.starts_with('/') {
        full.to_string()
    } else {
        format!("/{}", full)
    };
    match full.strip_prefix(folder) {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => rest.to_string(),
        _ => full,
    }
}

/// Current time as Unix seconds.
pub(crate) fn now_unix() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

/// Hex SHA-256 of an upload body.
pub(crate) fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

/// Wait for spawned child tasks, returning the first failure.
///
/// Remaining tasks keep running detached once an error is returned.
pub(crate) async fn join_children(handles: Vec<JoinHandle<Result<()>>>) -> Result<()> {
    try_join_all(handles.into_iter().map(|handle| async move {
        match handle.await {
            Ok(result) => result,
            Err(e) => Err(StorageError::Interrupted(e.to_string())),
        }
    }))
    .await?;
    Ok(())
}

/// Run a recursive operation on its own task and wait for it.
pub(crate) async fn run_task(operation: BoxFuture<'static, Result<()>>) -> Result<()> {
    tokio::spawn(operation)
        .await
        .map_err(|e| StorageError::Interrupted(e.to_string()))?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_path() {
        assert_eq!(relative_path(""), "");
        assert_eq!(relative_path("/"), "");
        assert_eq!(relative_path("/foo"), "/foo");
        assert_eq!(relative_path("/foo/"), "/foo");
        assert_eq!(relative_path("/foo//bar"), "/foo/bar");
        assert_eq!(relative_path("/foo///bar"), "/foo/bar");
        assert_eq!(relative_path("foo"), "/foo");
    }

    #[test]
    fn test_strip_folder() {
        assert_eq!(strip_folder("/12345", "/12345/a/b.txt"), "/a/b.txt");
        assert_eq!(strip_folder("/12345", "12345/a/b.txt"), "/a/b.txt");
        assert_eq!(strip_folder("/12345", "/12345"), "");
        assert_eq!(strip_folder("/12345", "/123456/x"), "/123456/x");
        assert_eq!(strip_folder("/12345", "/other/x"), "/other/x");
    }

    #[test]
    fn test_remote_path() {
        assert_eq!(remote_path("/12345", "/a"), "/12345/a");
        assert_eq!(remote_path("/12345", ""), "/12345");
    }

    fn panicking_task() -> JoinHandle<Result<()>> {
        tokio::spawn(async {
            let died = true;
            if died {
                panic!("worker died");
            }
            Ok(())
        })
    }

    #[tokio::test]
    async fn test_join_children_reports_panicked_task_as_interrupted() {
        let ok = tokio::spawn(async { Ok(()) });
        let err = join_children(vec![ok, panicking_task()]).await.unwrap_err();
        assert!(matches!(err, StorageError::Interrupted(_)));
    }

    #[tokio::test]
    async fn test_run_task_reports_panic_as_interrupted() {
        use futures::FutureExt;

        let operation = async {
            let died = true;
            if died {
                panic!("worker died");
            }
            Ok::<(), StorageError>(())
        };
        let err = run_task(operation.boxed()).await.unwrap_err();
        assert!(matches!(err, StorageError::Interrupted(_)));
    }

    #[tokio::test]
    async fn test_join_children_passes_task_errors_through() {
        let ok = tokio::spawn(async { Ok(()) });
        let failed = tokio::spawn(async { Err(StorageError::Forbidden("/x".into())) });
        let err = join_children(vec![ok, failed]).await.unwrap_err();
        assert_eq!(err, StorageError::Forbidden("/x".into()));
        assert!(join_children(Vec::new()).await.is_ok());
    }

    #[test]
    fn test_sha256_hex() {
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
