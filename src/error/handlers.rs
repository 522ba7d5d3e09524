//! Error handlers
//!
//! Classifies and reports client errors for the collaborator layer.

use crate::error::types::{FtpClientError, ProtocolError};
use crate::protocol::Reply;
use log::{error, warn};

/// Log an FTP client error at a level matching its severity
pub fn log_error(err: &FtpClientError) {
    if is_session_fatal(err) {
        error!("FTP session failed: {}", err);
    } else {
        warn!("FTP operation failed: {}", err);
    }
}

/// Whether the error leaves the control session unusable.
///
/// Authentication and transport failures end the session, as does a reply
/// stream that can no longer be framed. A rejected command, a bad argument or
/// a local file problem only fails the current operation.
pub fn is_session_fatal(err: &FtpClientError) -> bool {
    match err {
        FtpClientError::Connection(_) => true,
        FtpClientError::Protocol(e) => is_stream_desync(e),
        FtpClientError::Session(_) => true,
        FtpClientError::Auth(_) => true,
        FtpClientError::DataChannel(_) => false,
        FtpClientError::Operation(_) => false,
        FtpClientError::FileNotFound(_) => false,
        FtpClientError::LocalIo(_, _) => false,
        FtpClientError::PartialMove { source, .. } => is_session_fatal(source),
    }
}

/// Whether a protocol error left the reply stream out of step.
fn is_stream_desync(err: &ProtocolError) -> bool {
    match err {
        ProtocolError::MalformedReply(_) | ProtocolError::TooManyLines { .. } => true,
        ProtocolError::MalformedPassiveReply(_)
        | ProtocolError::InvalidArgument(_)
        | ProtocolError::ListingLineTooLong { .. } => false,
    }
}

/// Returns the raw server reply carried by an error, if any
pub fn server_reply(err: &FtpClientError) -> Option<&Reply> {
    use crate::error::types::{AuthError, DataChannelError};

    match err {
        FtpClientError::Session(reply) => Some(reply),
        FtpClientError::Auth(AuthError::UserRejected(reply))
        | FtpClientError::Auth(AuthError::PasswordRejected(reply)) => Some(reply),
        FtpClientError::DataChannel(DataChannelError::PassiveRefused(reply)) => Some(reply),
        FtpClientError::DataChannel(DataChannelError::Aborted { reply, .. }) => Some(reply),
        FtpClientError::Operation(e) => Some(&e.reply),
        FtpClientError::PartialMove { source, .. } => server_reply(source),
        _ => None,
    }
}
