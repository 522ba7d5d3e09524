pub mod config;
pub mod control;
pub mod engine;
pub mod error;
pub mod protocol;
pub mod session;
pub mod transfer;
pub mod utils;

pub use config::{ClientConfig, PassiveAddressPolicy};
pub use control::{ControlObserver, Transcript};
pub use engine::{FtpExecutor, Operation, Outcome, TransferRequest};
pub use error::{FtpClientError, Result};
pub use session::{ConnectionTarget, Credentials, Session};
pub use transfer::TransferDirection;
