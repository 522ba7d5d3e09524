//! Module `operations`
//!
//! One function per FTP operation. Every function takes an already
//! negotiated [`Session`] and runs its commands in strict request/reply
//! order. Data transfers open the passive connection first, then send the
//! verb, stream the bytes and finally read the terminal reply.

use log::{debug, info, warn};
use std::io;
use std::path::Path;

use crate::control::ControlChannel;
use crate::engine::request::TransferRequest;
use crate::error::{ConnectionError, DataChannelError, FtpClientError, OperationError, Result};
use crate::protocol::{FtpCommand, Reply, responses};
use crate::session::Session;
use crate::transfer::{DataConnection, TransferDirection, file_ops, open_passive};
use crate::utils::validation::validate_path;

// --- Shared helpers ---

/// Sends `command` and requires one of `expected` in reply.
fn expect_reply(
    channel: &mut ControlChannel,
    command: &FtpCommand,
    expected: &[u16],
    context: &'static str,
) -> Result<Reply> {
    let reply = channel.send(command)?;
    if reply.is_one_of(expected) {
        Ok(reply)
    } else {
        Err(OperationError::new(context, command.to_string(), reply).into())
    }
}

/// Opens a passive data connection, then sends the data-bearing `command`.
///
/// The data connection is dropped again if the server does not answer with a
/// preliminary `150`/`125`.
pub(crate) fn start_transfer(
    channel: &mut ControlChannel,
    command: &FtpCommand,
    context: &'static str,
) -> Result<DataConnection> {
    let data = open_passive(channel)?;
    let reply = channel.send(command)?;
    if !reply.is_one_of(responses::TRANSFER_STARTING) {
        drop(data);
        return Err(OperationError::new(context, command.to_string(), reply).into());
    }
    debug!("{} started on {}", command, data.endpoint());
    Ok(data)
}

/// Reads the terminal reply of a transfer whose data connection is closed.
pub(crate) fn finish_transfer(
    channel: &mut ControlChannel,
    command: &FtpCommand,
    context: &'static str,
) -> Result<Reply> {
    let reply = channel.read_reply()?;
    if reply.is_one_of(responses::TRANSFER_FINISHED) {
        Ok(reply)
    } else {
        Err(OperationError::new(context, command.to_string(), reply).into())
    }
}

/// Consumes the pending reply of a transfer abandoned on the client side.
///
/// The data connection must already be closed. Returns the reply, if one
/// could be read.
pub(crate) fn abort_transfer(channel: &mut ControlChannel, command: &FtpCommand) -> Option<Reply> {
    if channel.is_broken() {
        return None;
    }
    match channel.read_reply() {
        Ok(reply) => {
            debug!("{} abandoned, server replied {}", command, reply);
            Some(reply)
        }
        Err(e) => {
            warn!("{} abandoned, no terminal reply: {}", command, e);
            None
        }
    }
}

/// Aborts a transfer that failed mid-stream and classifies the failure.
///
/// A data socket failure answered by a server reply becomes
/// [`DataChannelError::Aborted`] carrying that reply; local file errors and
/// unanswered failures are returned unchanged.
pub(crate) fn fail_transfer(
    channel: &mut ControlChannel,
    command: &FtpCommand,
    error: FtpClientError,
) -> FtpClientError {
    match (error, abort_transfer(channel, command)) {
        (FtpClientError::Connection(cause), Some(reply)) => DataChannelError::Aborted {
            command: command.to_string(),
            reply,
            cause,
        }
        .into(),
        (error, _) => error,
    }
}

// --- Directory and delete operations ---

/// `MKD path`, requiring `257`.
pub fn make_directory(session: &mut Session, path: &str) -> Result<()> {
    validate_path(path)?;
    let command = FtpCommand::MKD(path.to_string());
    expect_reply(
        session.channel_mut(),
        &command,
        &[responses::PATH_CREATED],
        "create directory failed",
    )?;
    info!("Created remote directory {}", path);
    Ok(())
}

/// `RMD path`, requiring `250`.
pub fn remove_directory(session: &mut Session, path: &str) -> Result<()> {
    validate_path(path)?;
    let command = FtpCommand::RMD(path.to_string());
    expect_reply(
        session.channel_mut(),
        &command,
        &[responses::FILE_ACTION_OK],
        "remove directory failed",
    )?;
    info!("Removed remote directory {}", path);
    Ok(())
}

/// `DELE path`, requiring `250`.
pub fn delete_remote(session: &mut Session, path: &str) -> Result<()> {
    validate_path(path)?;
    let command = FtpCommand::DELE(path.to_string());
    expect_reply(
        session.channel_mut(),
        &command,
        &[responses::FILE_ACTION_OK],
        "delete remote file failed",
    )?;
    info!("Deleted remote file {}", path);
    Ok(())
}

/// Removes a local file; fails with [`FtpClientError::FileNotFound`] if absent.
pub fn delete_local(local_path: &Path) -> Result<()> {
    file_ops::remove_local_file(local_path)
}

// --- File transfers ---

/// `RETR remote_path` into `local_path`, returning the bytes received.
///
/// Bytes land in a temporary file beside the destination, which is renamed
/// into place only after the server confirms the transfer.
pub fn download(session: &mut Session, remote_path: &str, local_path: &Path) -> Result<u64> {
    validate_path(remote_path)?;
    if local_path.file_name().is_none() {
        return Err(FtpClientError::LocalIo(
            local_path.into(),
            io::Error::new(io::ErrorKind::InvalidInput, "destination has no file name"),
        ));
    }
    file_ops::ensure_parent_dir(local_path)?;

    let buffer_size = session.config().buffer_size;
    let temp_path = file_ops::temp_path_for(local_path, &session.config().temp_suffix);
    let channel = session.channel_mut();
    let command = FtpCommand::RETR(remote_path.to_string());

    let mut data = start_transfer(channel, &command, "download failed")?;
    let received = match file_ops::receive_file(&mut data, &temp_path, buffer_size) {
        Ok(n) => n,
        Err(e) => {
            drop(data);
            return Err(fail_transfer(channel, &command, e));
        }
    };
    drop(data);

    if let Err(e) = finish_transfer(channel, &command, "download failed") {
        file_ops::discard_temp(&temp_path);
        return Err(e);
    }
    file_ops::commit_download(&temp_path, local_path)?;

    info!(
        "Downloaded {} to {} ({} bytes)",
        remote_path,
        local_path.display(),
        received
    );
    Ok(received)
}

/// `STOR remote_path` from `local_path`, returning the bytes sent.
pub fn upload(session: &mut Session, local_path: &Path, remote_path: &str) -> Result<u64> {
    validate_path(remote_path)?;
    let mut file = file_ops::open_local_source(local_path)?;

    let buffer_size = session.config().buffer_size;
    let channel = session.channel_mut();
    let command = FtpCommand::STOR(remote_path.to_string());

    let mut data = start_transfer(channel, &command, "upload failed")?;
    let sent = match file_ops::send_file(&mut data, &mut file, local_path, buffer_size) {
        Ok(n) => n,
        Err(e) => {
            drop(data);
            return Err(fail_transfer(channel, &command, e));
        }
    };
    if let Err(e) = data.finish() {
        return Err(fail_transfer(channel, &command, ConnectionError::from(e).into()));
    }

    finish_transfer(channel, &command, "upload failed")?;

    info!(
        "Uploaded {} to {} ({} bytes)",
        local_path.display(),
        remote_path,
        sent
    );
    Ok(sent)
}

/// Runs the transfer described by `request`.
pub fn copy(session: &mut Session, request: &TransferRequest) -> Result<u64> {
    match request.direction {
        TransferDirection::Download => {
            download(session, &request.remote_path, &request.local_path)
        }
        TransferDirection::Upload => upload(session, &request.local_path, &request.remote_path),
    }
}

/// Copies, then deletes the source side.
///
/// A failed delete after a successful copy is reported as
/// [`FtpClientError::PartialMove`]; the copy is not rolled back.
pub fn move_file(session: &mut Session, request: &TransferRequest) -> Result<u64> {
    let bytes = copy(session, request)?;

    let removed = match request.direction {
        TransferDirection::Download => delete_remote(session, &request.remote_path),
        TransferDirection::Upload => delete_local(&request.local_path),
    };

    match removed {
        Ok(()) => Ok(bytes),
        Err(e) => {
            warn!(
                "Move {} copied {} bytes but left the source in place: {}",
                request.direction, bytes, e
            );
            Err(FtpClientError::PartialMove {
                direction: request.direction,
                source: Box::new(e),
            })
        }
    }
}
