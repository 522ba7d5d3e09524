//! Module `file_ops`
//!
//! Streams file bytes between local files and data connections using a
//! fixed-size buffer, and prepares the local side of a transfer.

use log::{debug, info, warn};
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use crate::error::{ConnectionError, FtpClientError, Result};
use crate::transfer::passive::DataConnection;

/// Which end of a copy failed.
#[derive(Debug)]
pub enum CopyError {
    Read(io::Error),
    Write(io::Error),
}

/// Copies `reader` into `writer` until end-of-stream, then flushes.
///
/// Returns the number of bytes copied.
pub fn copy_stream<R, W>(
    reader: &mut R,
    writer: &mut W,
    buffer_size: usize,
) -> std::result::Result<u64, CopyError>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
{
    let mut buffer = vec![0u8; buffer_size];
    let mut total = 0u64;

    loop {
        let n = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(CopyError::Read(e)),
        };

        writer.write_all(&buffer[..n]).map_err(CopyError::Write)?;
        total += n as u64;
    }

    writer.flush().map_err(CopyError::Write)?;
    Ok(total)
}

/// Creates the parent directories of `local_path` if they are missing.
pub fn ensure_parent_dir(local_path: &Path) -> Result<()> {
    match local_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).map_err(|e| FtpClientError::LocalIo(parent.into(), e))
        }
        _ => Ok(()),
    }
}

/// Path of the in-progress file for a download: `<name>.<suffix>` beside it.
pub fn temp_path_for(local_path: &Path, suffix: &str) -> PathBuf {
    let mut name = local_path
        .file_name()
        .map(OsString::from)
        .unwrap_or_default();
    name.push(".");
    name.push(suffix);
    local_path.with_file_name(name)
}

/// Opens a local file as the source of an upload.
pub fn open_local_source(local_path: &Path) -> Result<File> {
    let metadata = fs::metadata(local_path).map_err(|e| FtpClientError::local(local_path, e))?;
    if metadata.is_dir() {
        return Err(FtpClientError::LocalIo(
            local_path.into(),
            io::Error::new(io::ErrorKind::InvalidInput, "is a directory"),
        ));
    }
    File::open(local_path).map_err(|e| FtpClientError::local(local_path, e))
}

/// Streams the data connection into a new file at `temp_path`.
///
/// The file is removed again if the copy fails.
pub fn receive_file(data: &mut DataConnection, temp_path: &Path, buffer_size: usize) -> Result<u64> {
    let mut file = File::create(temp_path).map_err(|e| FtpClientError::local(temp_path, e))?;

    let copied = copy_stream(data.stream_mut(), &mut file, buffer_size)
        .and_then(|n| file.sync_all().map(|_| n).map_err(CopyError::Write));
    drop(file);

    match copied {
        Ok(n) => {
            debug!("Received {} bytes into {}", n, temp_path.display());
            Ok(n)
        }
        Err(e) => {
            discard_temp(temp_path);
            Err(match e {
                CopyError::Read(e) => ConnectionError::from(e).into(),
                CopyError::Write(e) => FtpClientError::LocalIo(temp_path.into(), e),
            })
        }
    }
}

/// Streams `file` into the data connection.
pub fn send_file(
    data: &mut DataConnection,
    file: &mut File,
    local_path: &Path,
    buffer_size: usize,
) -> Result<u64> {
    match copy_stream(file, data.stream_mut(), buffer_size) {
        Ok(n) => {
            debug!("Sent {} bytes from {}", n, local_path.display());
            Ok(n)
        }
        Err(CopyError::Read(e)) => Err(FtpClientError::LocalIo(local_path.into(), e)),
        Err(CopyError::Write(e)) => Err(ConnectionError::from(e).into()),
    }
}

/// Moves a completed download onto its destination.
pub fn commit_download(temp_path: &Path, local_path: &Path) -> Result<()> {
    match fs::rename(temp_path, local_path) {
        Ok(()) => {
            info!("Saved {}", local_path.display());
            Ok(())
        }
        Err(e) => {
            discard_temp(temp_path);
            Err(FtpClientError::LocalIo(local_path.into(), e))
        }
    }
}

/// Removes an abandoned in-progress file.
pub fn discard_temp(temp_path: &Path) {
    if let Err(e) = fs::remove_file(temp_path) {
        if e.kind() != io::ErrorKind::NotFound {
            warn!("Failed to remove {}: {}", temp_path.display(), e);
        }
    }
}

/// Deletes a local file.
pub fn remove_local_file(local_path: &Path) -> Result<()> {
    if !local_path.exists() {
        return Err(FtpClientError::FileNotFound(local_path.into()));
    }
    fs::remove_file(local_path).map_err(|e| FtpClientError::local(local_path, e))?;
    info!("Deleted local file {}", local_path.display());
    Ok(())
}
