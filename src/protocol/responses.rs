//! FTP Response codes
//!
//! Reply codes the client checks for.

pub const DATA_CONNECTION_ALREADY_OPEN: u16 = 125;
pub const FILE_STATUS_OK: u16 = 150;
pub const OK: u16 = 200;
pub const READY: u16 = 220;
pub const CLOSING_CONTROL: u16 = 221;
pub const TRANSFER_COMPLETE: u16 = 226;
pub const ENTERING_PASSIVE_MODE: u16 = 227;
pub const LOGIN_SUCCESS: u16 = 230;
pub const FILE_ACTION_OK: u16 = 250;
pub const PATH_CREATED: u16 = 257;
pub const PASSWORD_REQUIRED: u16 = 331;

/// Replies that open a data transfer
pub const TRANSFER_STARTING: &[u16] = &[FILE_STATUS_OK, DATA_CONNECTION_ALREADY_OPEN];

/// Replies that close a successful data transfer
pub const TRANSFER_FINISHED: &[u16] = &[TRANSFER_COMPLETE, FILE_ACTION_OK];
