//! Error types
//!
//! Defines domain-specific error types for each layer of the FTP client.

use std::fmt;
use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::protocol::Reply;
use crate::transfer::TransferDirection;

/// Control or data socket failures
#[derive(Debug)]
pub enum ConnectionError {
    ConnectFailed(String, io::Error),
    Closed,
    Io(io::Error),
}

impl fmt::Display for ConnectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionError::ConnectFailed(target, e) => {
                write!(f, "Failed to connect to {}: {}", target, e)
            }
            ConnectionError::Closed => write!(f, "Connection closed by peer"),
            ConnectionError::Io(e) => write!(f, "Socket I/O failed: {}", e),
        }
    }
}

impl std::error::Error for ConnectionError {}

impl From<io::Error> for ConnectionError {
    fn from(error: io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::UnexpectedEof => ConnectionError::Closed,
            _ => ConnectionError::Io(error),
        }
    }
}

/// Reply parsing and command formatting errors
#[derive(Debug)]
pub enum ProtocolError {
    MalformedReply(String),
    TooManyLines { code: u16, limit: usize },
    MalformedPassiveReply(String),
    InvalidArgument(String),
    ListingLineTooLong { limit: usize },
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolError::MalformedReply(line) => write!(f, "Malformed reply line: {:?}", line),
            ProtocolError::TooManyLines { code, limit } => {
                write!(f, "Multi-line {} reply exceeded {} lines", code, limit)
            }
            ProtocolError::MalformedPassiveReply(text) => {
                write!(f, "Malformed passive mode reply: {}", text)
            }
            ProtocolError::InvalidArgument(arg) => {
                write!(f, "Invalid command argument: {:?}", arg)
            }
            ProtocolError::ListingLineTooLong { limit } => {
                write!(f, "Listing line exceeded {} bytes", limit)
            }
        }
    }
}

impl std::error::Error for ProtocolError {}

/// Login sequence failures
#[derive(Debug)]
pub enum AuthError {
    UserRejected(Reply),
    PasswordRejected(Reply),
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::UserRejected(reply) => write!(f, "USER rejected: {}", reply),
            AuthError::PasswordRejected(reply) => write!(f, "PASS rejected: {}", reply),
        }
    }
}

impl std::error::Error for AuthError {}

/// Passive mode and data transfer errors
#[derive(Debug)]
pub enum DataChannelError {
    PassiveRefused(Reply),
    ConnectFailed(SocketAddr, io::Error),
    /// The data connection failed mid-transfer and the server closed the
    /// command with `reply`.
    Aborted {
        command: String,
        reply: Reply,
        cause: ConnectionError,
    },
}

impl fmt::Display for DataChannelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataChannelError::PassiveRefused(reply) => {
                write!(f, "Failed to enter passive mode: {}", reply)
            }
            DataChannelError::ConnectFailed(addr, e) => {
                write!(f, "Failed to open data connection to {}: {}", addr, e)
            }
            DataChannelError::Aborted {
                command,
                reply,
                cause,
            } => write!(f, "{} aborted ({}): {}", command, reply, cause),
        }
    }
}

impl std::error::Error for DataChannelError {}

/// A command's reply fell outside its required success codes.
///
/// Keeps the command line (password masked) and the raw reply for diagnostics.
#[derive(Debug)]
pub struct OperationError {
    pub context: &'static str,
    pub command: String,
    pub reply: Reply,
}

impl OperationError {
    pub fn new(context: &'static str, command: impl Into<String>, reply: Reply) -> Self {
        Self {
            context,
            command: command.into(),
            reply,
        }
    }
}

impl fmt::Display for OperationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} -> {})", self.context, self.command, self.reply)
    }
}

impl std::error::Error for OperationError {}

/// General FTP client error that encompasses all error types
#[derive(Debug)]
pub enum FtpClientError {
    Connection(ConnectionError),
    Protocol(ProtocolError),
    Session(Reply),
    Auth(AuthError),
    DataChannel(DataChannelError),
    Operation(OperationError),
    FileNotFound(PathBuf),
    LocalIo(PathBuf, io::Error),
    PartialMove {
        direction: TransferDirection,
        source: Box<FtpClientError>,
    },
}

impl FtpClientError {
    /// Wraps a local filesystem failure, keeping `NotFound` distinct.
    pub fn local(path: impl Into<PathBuf>, error: io::Error) -> Self {
        let path = path.into();
        if error.kind() == io::ErrorKind::NotFound {
            FtpClientError::FileNotFound(path)
        } else {
            FtpClientError::LocalIo(path, error)
        }
    }
}

impl fmt::Display for FtpClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FtpClientError::Connection(e) => write!(f, "Connection error: {}", e),
            FtpClientError::Protocol(e) => write!(f, "Protocol error: {}", e),
            FtpClientError::Session(reply) => write!(f, "FTP server not ready: {}", reply),
            FtpClientError::Auth(e) => write!(f, "Authentication error: {}", e),
            FtpClientError::DataChannel(e) => write!(f, "Data channel error: {}", e),
            FtpClientError::Operation(e) => write!(f, "Operation error: {}", e),
            FtpClientError::FileNotFound(p) => {
                write!(f, "Local file not found: {}", p.display())
            }
            FtpClientError::LocalIo(p, e) => {
                write!(f, "Local file error on {}: {}", p.display(), e)
            }
            FtpClientError::PartialMove { direction, source } => write!(
                f,
                "Move {} copied the file but did not remove the source: {}",
                direction, source
            ),
        }
    }
}

impl std::error::Error for FtpClientError {}

// Implement conversions from specific errors to FtpClientError
impl From<ConnectionError> for FtpClientError {
    fn from(error: ConnectionError) -> Self {
        FtpClientError::Connection(error)
    }
}

impl From<ProtocolError> for FtpClientError {
    fn from(error: ProtocolError) -> Self {
        FtpClientError::Protocol(error)
    }
}

impl From<AuthError> for FtpClientError {
    fn from(error: AuthError) -> Self {
        FtpClientError::Auth(error)
    }
}

impl From<DataChannelError> for FtpClientError {
    fn from(error: DataChannelError) -> Self {
        FtpClientError::DataChannel(error)
    }
}

impl From<OperationError> for FtpClientError {
    fn from(error: OperationError) -> Self {
        FtpClientError::Operation(error)
    }
}

/// Result alias used across the client
pub type Result<T> = std::result::Result<T, FtpClientError>;
