//! Transfer requests
//!
//! The resolved paths of one copy or move, as supplied by the locator layer.

use std::path::PathBuf;

use crate::transfer::TransferDirection;

/// One file transfer between a remote path and a local path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferRequest {
    pub remote_path: String,
    pub local_path: PathBuf,
    pub direction: TransferDirection,
}

impl TransferRequest {
    /// Builds a request from the collaborator's `isDownload` flag.
    pub fn new(remote_path: impl Into<String>, local_path: impl Into<PathBuf>, is_download: bool) -> Self {
        Self {
            remote_path: remote_path.into(),
            local_path: local_path.into(),
            direction: TransferDirection::from_is_download(is_download),
        }
    }

    pub fn download(remote_path: impl Into<String>, local_path: impl Into<PathBuf>) -> Self {
        Self::new(remote_path, local_path, true)
    }

    pub fn upload(local_path: impl Into<PathBuf>, remote_path: impl Into<String>) -> Self {
        Self::new(remote_path, local_path, false)
    }
}
