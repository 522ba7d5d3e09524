//! Module `state`
//!
//! Defines the `Session` struct: one authenticated, negotiated control
//! connection owned for its whole lifetime.

use log::info;

use crate::config::ClientConfig;
use crate::control::{ControlChannel, ControlObserver};
use crate::error::Result;
use crate::protocol::Reply;
use crate::session::credentials::{ConnectionTarget, Credentials};
use crate::session::negotiator::negotiate;

/// An authenticated FTP session.
///
/// A session only exists after the greeting and negotiation succeeded, so
/// every operation run on it can rely on binary type, stream mode and file
/// structure being set. It is not shareable: operations take `&mut Session`
/// and run one command at a time.
pub struct Session {
    host: String,
    control_port: u16,
    credentials: Credentials,
    greeting: Reply,
    channel: ControlChannel,
}

impl Session {
    /// Connects, authenticates and negotiates transfer parameters.
    pub fn connect(target: &ConnectionTarget, config: &ClientConfig) -> Result<Self> {
        Self::connect_with_observer(target, config, None)
    }

    /// Like [`Session::connect`], attaching an observer before the greeting
    /// is read so the whole conversation is reported.
    pub fn connect_with_observer(
        target: &ConnectionTarget,
        config: &ClientConfig,
        observer: Option<Box<dyn ControlObserver>>,
    ) -> Result<Self> {
        let (mut channel, greeting) =
            ControlChannel::open(&target.host, target.port, config, observer)?;

        if let Err(e) = negotiate(&mut channel, &target.credentials) {
            channel.close();
            return Err(e);
        }

        info!(
            "Session ready on {}:{} as {}",
            target.host,
            target.port,
            target.credentials.username()
        );

        Ok(Self {
            host: target.host.clone(),
            control_port: target.port,
            credentials: target.credentials.clone(),
            greeting,
            channel,
        })
    }

    // --------------------
    // Getter methods
    // --------------------

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn control_port(&self) -> u16 {
        self.control_port
    }

    pub fn username(&self) -> &str {
        self.credentials.username()
    }

    /// The server's `220` greeting.
    pub fn greeting(&self) -> &Reply {
        &self.greeting
    }

    pub fn config(&self) -> &ClientConfig {
        self.channel.config()
    }

    /// Whether the control channel has failed and the session must be dropped.
    pub fn is_broken(&self) -> bool {
        self.channel.is_broken()
    }

    pub(crate) fn channel_mut(&mut self) -> &mut ControlChannel {
        &mut self.channel
    }

    /// Sends `QUIT` best-effort and closes the control socket. Never fails.
    pub fn disconnect(self) {
        self.channel.close();
    }
}
