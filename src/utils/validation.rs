//! Input validation utilities
//!
//! Validates arguments before they are written onto the control channel.

use crate::error::ProtocolError;

/// Maximum argument length accepted in a single command line
pub const MAX_ARGUMENT_LENGTH: usize = 4096;

/// Checks that input contains no line delimiters or NUL bytes.
pub fn is_valid_input(input: &str) -> bool {
    input.len() <= MAX_ARGUMENT_LENGTH && !input.contains(['\r', '\n', '\0'])
}

/// Validates an optional argument (empty allowed).
pub fn validate_argument(input: &str) -> Result<(), ProtocolError> {
    if is_valid_input(input) {
        Ok(())
    } else {
        Err(ProtocolError::InvalidArgument(input.to_string()))
    }
}

/// Validates a path argument that a command requires.
pub fn validate_path(path: &str) -> Result<(), ProtocolError> {
    if path.trim().is_empty() {
        return Err(ProtocolError::InvalidArgument(path.to_string()));
    }
    validate_argument(path)
}
