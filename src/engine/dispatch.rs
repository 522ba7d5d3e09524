//! Operation dispatch
//!
//! A closed set of operations the collaborator layer can request, each
//! carrying its own parameters.

use std::fmt;
use std::path::PathBuf;

use crate::engine::listing::list_all;
use crate::engine::operations::{
    copy, delete_local, delete_remote, make_directory, move_file, remove_directory,
};
use crate::engine::request::TransferRequest;
use crate::error::Result;
use crate::session::Session;

/// An operation to run on a negotiated session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    List { path: String },
    MakeDirectory { path: String },
    RemoveDirectory { path: String },
    DeleteRemote { path: String },
    DeleteLocal { path: PathBuf },
    Copy(TransferRequest),
    Move(TransferRequest),
}

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Operation::List { .. } => "list",
            Operation::MakeDirectory { .. } => "mkdir",
            Operation::RemoveDirectory { .. } => "rmdir",
            Operation::DeleteRemote { .. } => "delete",
            Operation::DeleteLocal { .. } => "delete local",
            Operation::Copy(_) => "copy",
            Operation::Move(_) => "move",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::List { path }
            | Operation::MakeDirectory { path }
            | Operation::RemoveDirectory { path }
            | Operation::DeleteRemote { path } => write!(f, "{} {}", self.name(), path),
            Operation::DeleteLocal { path } => write!(f, "{} {}", self.name(), path.display()),
            Operation::Copy(request) | Operation::Move(request) => write!(
                f,
                "{} {} {} {}",
                self.name(),
                request.direction,
                request.remote_path,
                request.local_path.display()
            ),
        }
    }
}

/// What a successful operation produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Listing(Vec<String>),
    Transferred(u64),
    Completed,
}

/// Runs `operation` on `session`.
pub fn execute(session: &mut Session, operation: &Operation) -> Result<Outcome> {
    match operation {
        Operation::List { path } => list_all(session, path).map(Outcome::Listing),
        Operation::MakeDirectory { path } => {
            make_directory(session, path).map(|_| Outcome::Completed)
        }
        Operation::RemoveDirectory { path } => {
            remove_directory(session, path).map(|_| Outcome::Completed)
        }
        Operation::DeleteRemote { path } => {
            delete_remote(session, path).map(|_| Outcome::Completed)
        }
        Operation::DeleteLocal { path } => delete_local(path).map(|_| Outcome::Completed),
        Operation::Copy(request) => copy(session, request).map(Outcome::Transferred),
        Operation::Move(request) => move_file(session, request).map(Outcome::Transferred),
    }
}
