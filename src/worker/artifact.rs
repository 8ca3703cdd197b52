//! The result file handed to the transmission primitive.
//!
//! An `Artifact` owns the only read handle the worker opens on the result
//! file. Moving it into the transmitter moves the handle; the file is
//! closed when the artifact (or the body built from it) is dropped.

use std::path::{Path, PathBuf};

use tokio::fs::File;
use tokio::io::AsyncReadExt;

use crate::error::WorkerError;
use crate::worker::content_type::content_type_for;

/// An opened result file ready for upload.
#[derive(Debug)]
pub struct Artifact {
    path: PathBuf,
    content_type: Option<&'static str>,
    len: u64,
    file: File,
}

impl Artifact {
    /// Open `path` read-only and resolve its content type.
    pub async fn open(path: PathBuf) -> Result<Self, WorkerError> {
        let file = match File::open(&path).await {
            Ok(file) => file,
            Err(source) => return Err(WorkerError::OpenArtifact { path, source }),
        };
        let len = match file.metadata().await {
            Ok(meta) => meta.len(),
            Err(source) => return Err(WorkerError::OpenArtifact { path, source }),
        };
        let content_type = content_type_for(&path);

        tracing::debug!(
            result_file = %path.display(),
            content_type = content_type.unwrap_or("unspecified"),
            bytes = len,
            "Opened result file"
        );

        Ok(Self {
            path,
            content_type,
            len,
            file,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Content type from the extension table; `None` leaves it unspecified.
    pub fn content_type(&self) -> Option<&'static str> {
        self.content_type
    }

    /// Size of the file when it was opened.
    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Give up the handle, e.g. to stream it as a request body.
    pub fn into_file(self) -> File {
        self.file
    }

    /// Read the whole file, closing it afterwards.
    pub async fn read_all(self) -> std::io::Result<Vec<u8>> {
        let mut file = self.file;
        let mut buf = Vec::with_capacity(self.len as usize);
        file.read_to_end(&mut buf).await?;
        Ok(buf)
    }
}

/// Number of descriptors this process holds open on `path`.
#[cfg(all(test, target_os = "linux"))]
pub(crate) fn open_handles(path: &Path) -> usize {
    let Ok(entries) = std::fs::read_dir("/proc/self/fd") else {
        return 0;
    };
    let target = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    entries
        .filter_map(Result::ok)
        .filter_map(|entry| std::fs::read_link(entry.path()).ok())
        .filter(|link| *link == target)
        .count()
}
