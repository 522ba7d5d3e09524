//! FTP Protocol implementation
//!
//! Handles command formatting, reply parsing and reply code classification.

pub mod commands;
pub mod reply;
pub mod responses;

pub use commands::{FileStructure, FtpCommand, RepresentationType, TransmissionMode};
pub use reply::{Reply, ReplyClass, parse_reply_line, read_reply};
