//! Module `commands`
//!
//! Defines the closed set of FTP commands the client sends on the control
//! channel and their wire representation.

use std::fmt;

/// Representation type for `TYPE`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepresentationType {
    Image,
}

/// Transmission mode for `MODE`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransmissionMode {
    Stream,
}

/// File structure for `STRU`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStructure {
    File,
}

/// Represents an FTP command issued by the client.
///
/// Commands that require arguments store them as `String` variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FtpCommand {
    USER(String),
    PASS(String),
    TYPE(RepresentationType),
    MODE(TransmissionMode),
    STRU(FileStructure),
    PASV,
    LIST(Option<String>),
    RETR(String),
    STOR(String),
    MKD(String),
    RMD(String),
    DELE(String),
    QUIT,
}

impl FtpCommand {
    /// The command verb.
    pub fn verb(&self) -> &'static str {
        match self {
            FtpCommand::USER(_) => "USER",
            FtpCommand::PASS(_) => "PASS",
            FtpCommand::TYPE(_) => "TYPE",
            FtpCommand::MODE(_) => "MODE",
            FtpCommand::STRU(_) => "STRU",
            FtpCommand::PASV => "PASV",
            FtpCommand::LIST(_) => "LIST",
            FtpCommand::RETR(_) => "RETR",
            FtpCommand::STOR(_) => "STOR",
            FtpCommand::MKD(_) => "MKD",
            FtpCommand::RMD(_) => "RMD",
            FtpCommand::DELE(_) => "DELE",
            FtpCommand::QUIT => "QUIT",
        }
    }

    fn argument(&self) -> Option<&str> {
        match self {
            FtpCommand::USER(arg)
            | FtpCommand::PASS(arg)
            | FtpCommand::RETR(arg)
            | FtpCommand::STOR(arg)
            | FtpCommand::MKD(arg)
            | FtpCommand::RMD(arg)
            | FtpCommand::DELE(arg) => Some(arg),
            FtpCommand::LIST(arg) => arg.as_deref().filter(|a| !a.is_empty()),
            FtpCommand::TYPE(RepresentationType::Image) => Some("I"),
            FtpCommand::MODE(TransmissionMode::Stream) => Some("S"),
            FtpCommand::STRU(FileStructure::File) => Some("F"),
            FtpCommand::PASV | FtpCommand::QUIT => None,
        }
    }

    /// The full command line including the CRLF terminator.
    pub fn to_line(&self) -> String {
        match self.argument() {
            Some(arg) => format!("{} {}\r\n", self.verb(), arg),
            None => format!("{}\r\n", self.verb()),
        }
    }
}

/// Log-safe rendering without the terminator; the password is masked.
impl fmt::Display for FtpCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self, self.argument()) {
            (FtpCommand::PASS(_), _) => write!(f, "PASS ****"),
            (_, Some(arg)) => write!(f, "{} {}", self.verb(), arg),
            (_, None) => write!(f, "{}", self.verb()),
        }
    }
}
