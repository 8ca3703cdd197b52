//! Waitfile inspection.
//!
//! The plugin writes the path of its result file into the waitfile once it
//! is done. A missing or empty waitfile means "not yet"; any other read
//! failure is reported separately but is still treated as not ready.

use std::io;
use std::path::{Path, PathBuf};

/// What a single look at the waitfile found.
#[derive(Debug)]
pub enum WaitfileStatus {
    /// The waitfile does not exist yet, or exists but is still empty.
    Missing,
    /// The waitfile exists but could not be read.
    Unreadable(io::Error),
    /// The waitfile names this result file.
    Ready(PathBuf),
}

impl WaitfileStatus {
    /// Label used for logs and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            WaitfileStatus::Missing => "missing",
            WaitfileStatus::Unreadable(_) => "unreadable",
            WaitfileStatus::Ready(_) => "ready",
        }
    }
}

/// Read the waitfile at `waitfile`.
pub async fn inspect(waitfile: &Path) -> WaitfileStatus {
    match tokio::fs::read(waitfile).await {
        Ok(bytes) => match String::from_utf8(bytes) {
            Ok(content) => match resolve_reference(&content) {
                Some(result_file) => WaitfileStatus::Ready(result_file),
                None => WaitfileStatus::Missing,
            },
            Err(e) => WaitfileStatus::Unreadable(io::Error::new(io::ErrorKind::InvalidData, e)),
        },
        Err(e) if e.kind() == io::ErrorKind::NotFound => WaitfileStatus::Missing,
        Err(e) => WaitfileStatus::Unreadable(e),
    }
}

/// Turn waitfile content into a result path.
///
/// Surrounding whitespace is trimmed; the rest is used verbatim, so a
/// relative reference resolves against the worker's working directory.
/// Blank content yields `None`.
pub fn resolve_reference(content: &str) -> Option<PathBuf> {
    let reference = content.trim();
    if reference.is_empty() {
        return None;
    }
    Some(PathBuf::from(reference))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_trims_newline() {
        let path = resolve_reference("/tmp/results.tar.gz\n");
        assert_eq!(path, Some(PathBuf::from("/tmp/results.tar.gz")));
    }

    #[test]
    fn test_resolve_relative_kept_as_is() {
        let path = resolve_reference("out/e2e.tar.gz");
        assert_eq!(path, Some(PathBuf::from("out/e2e.tar.gz")));
    }

    #[test]
    fn test_resolve_blank() {
        assert_eq!(resolve_reference("  \n"), None);
    }

    #[tokio::test]
    async fn test_inspect_missing() {
        let dir = tempfile::tempdir().unwrap();
        let status = inspect(&dir.path().join("done")).await;
        assert!(matches!(status, WaitfileStatus::Missing));
    }

    #[tokio::test]
    async fn test_inspect_empty_is_missing() {
        let dir = tempfile::tempdir().unwrap();
        let waitfile = dir.path().join("done");
        std::fs::write(&waitfile, "").unwrap();
        assert!(matches!(inspect(&waitfile).await, WaitfileStatus::Missing));
    }

    #[tokio::test]
    async fn test_inspect_ready() {
        let dir = tempfile::tempdir().unwrap();
        let waitfile = dir.path().join("done");
        std::fs::write(&waitfile, "/tmp/results.tar.gz").unwrap();

        match inspect(&waitfile).await {
            WaitfileStatus::Ready(path) => {
                assert_eq!(path, PathBuf::from("/tmp/results.tar.gz"))
            }
            other => panic!("unexpected status: {}", other.label()),
        }
    }

    #[tokio::test]
    async fn test_inspect_relative_reference_not_rebased() {
        let dir = tempfile::tempdir().unwrap();
        let waitfile = dir.path().join("done");
        std::fs::write(&waitfile, "results.tar.gz\n").unwrap();

        match inspect(&waitfile).await {
            WaitfileStatus::Ready(path) => assert_eq!(path, PathBuf::from("results.tar.gz")),
            other => panic!("unexpected status: {}", other.label()),
        }
    }

    #[tokio::test]
    async fn test_inspect_directory_is_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        let status = inspect(dir.path()).await;
        assert!(matches!(status, WaitfileStatus::Unreadable(_)));
    }

    #[tokio::test]
    async fn test_inspect_invalid_utf8_is_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        let waitfile = dir.path().join("done");
        std::fs::write(&waitfile, [0xff, 0xfe, 0x00]).unwrap();
        let status = inspect(&waitfile).await;
        assert_eq!(status.label(), "unreadable");
    }
}
