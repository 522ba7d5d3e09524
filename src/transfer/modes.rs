//! FTP Transfer directions
//!
//! Determines which side of a data connection is source and which is sink.

use std::fmt;

/// Direction of a file transfer relative to the client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferDirection {
    /// Server to client (`RETR`); the local file is the sink.
    Download,
    /// Client to server (`STOR`); the local file is the source.
    Upload,
}

impl TransferDirection {
    pub fn from_is_download(is_download: bool) -> Self {
        if is_download {
            TransferDirection::Download
        } else {
            TransferDirection::Upload
        }
    }

    pub fn is_download(self) -> bool {
        self == TransferDirection::Download
    }
}

impl fmt::Display for TransferDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransferDirection::Download => write!(f, "download"),
            TransferDirection::Upload => write!(f, "upload"),
        }
    }
}
