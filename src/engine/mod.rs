//! Transfer engine
//!
//! FTP operations over a negotiated session, the closed operation set and a
//! per-invocation executor.

pub mod dispatch;
pub mod executor;
pub mod listing;
pub mod operations;
pub mod request;

pub use dispatch::{Operation, Outcome, execute};
pub use executor::FtpExecutor;
pub use listing::{Listing, list, list_all};
pub use operations::{
    copy, delete_local, delete_remote, download, make_directory, move_file, remove_directory,
    upload,
};
pub use request::TransferRequest;
