//! Session negotiation
//!
//! Drives the fixed startup sequence on a freshly greeted control channel:
//! log in, then select binary type, stream mode and file structure.

use log::{info, warn};

use crate::control::ControlChannel;
use crate::error::{AuthError, Result};
use crate::protocol::{FileStructure, FtpCommand, RepresentationType, TransmissionMode, responses};
use crate::session::credentials::Credentials;
use crate::utils::validation::{validate_argument, validate_path};

/// Logs in with `credentials` and sets the transfer parameters.
///
/// `USER` answered by `230` completes login without a password; `331` asks
/// for `PASS`, which must end in a 2yz completion. Any other reply is an
/// [`AuthError`]. A reply other than `200` to `TYPE I`, `MODE S` or `STRU F`
/// is logged and negotiation carries on; only transport failures abort there.
pub fn negotiate(channel: &mut ControlChannel, credentials: &Credentials) -> Result<()> {
    login(channel, credentials)?;

    for command in [
        FtpCommand::TYPE(RepresentationType::Image),
        FtpCommand::MODE(TransmissionMode::Stream),
        FtpCommand::STRU(FileStructure::File),
    ] {
        let reply = channel.send(&command)?;
        if reply.code() != responses::OK {
            warn!("Server answered {} with {}", command, reply);
        }
    }

    Ok(())
}

fn login(channel: &mut ControlChannel, credentials: &Credentials) -> Result<()> {
    validate_path(credentials.username())?;
    validate_argument(credentials.password())?;

    let reply = channel.send(&FtpCommand::USER(credentials.username().to_string()))?;
    match reply.code() {
        responses::LOGIN_SUCCESS => {
            info!("Logged in as {} without password", credentials.username());
            Ok(())
        }
        responses::PASSWORD_REQUIRED => {
            let reply = channel.send(&FtpCommand::PASS(credentials.password().to_string()))?;
            if reply.is_completion() {
                info!("Logged in as {}", credentials.username());
                Ok(())
            } else {
                Err(AuthError::PasswordRejected(reply).into())
            }
        }
        _ => Err(AuthError::UserRejected(reply).into()),
    }
}
