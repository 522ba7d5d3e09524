//! Transfer module for the FTP client
//!
//! Handles passive-mode data connections and byte streaming between local
//! files and data sockets.

pub mod file_ops;
pub mod modes;
pub mod passive;

// Re-export key types and functions
pub use file_ops::{CopyError, copy_stream};
pub use modes::TransferDirection;
pub use passive::{DataConnection, DataEndpoint, PassiveReply, open_passive, parse_passive_reply};
