//! Module `executor`
//!
//! Runs one operation per connection: connect, negotiate, execute and
//! disconnect. The control connection is torn down whatever the outcome.

use log::info;

use crate::config::ClientConfig;
use crate::control::{ControlObserver, Transcript};
use crate::engine::dispatch::{Operation, Outcome, execute};
use crate::error::Result;
use crate::error::handlers::log_error;
use crate::session::{ConnectionTarget, Session};

/// Connection settings plus an optional transcript shared by every run.
pub struct FtpExecutor {
    target: ConnectionTarget,
    config: ClientConfig,
    transcript: Option<Transcript>,
}

impl FtpExecutor {
    pub fn new(target: ConnectionTarget, config: ClientConfig) -> Self {
        Self {
            target,
            config,
            transcript: None,
        }
    }

    /// Records every command, reply and listing line of later runs.
    pub fn with_transcript(mut self) -> Self {
        self.transcript = Some(Transcript::new());
        self
    }

    pub fn transcript(&self) -> Option<&Transcript> {
        self.transcript.as_ref()
    }

    pub fn target(&self) -> &ConnectionTarget {
        &self.target
    }

    /// Opens a fresh session, runs `operation` and closes the session.
    pub fn execute(&self, operation: &Operation) -> Result<Outcome> {
        info!(
            "Running {} on {}:{}",
            operation, self.target.host, self.target.port
        );

        let observer = self
            .transcript
            .clone()
            .map(|t| Box::new(t) as Box<dyn ControlObserver>);

        let mut session = match Session::connect_with_observer(&self.target, &self.config, observer)
        {
            Ok(session) => session,
            Err(e) => {
                log_error(&e);
                return Err(e);
            }
        };

        let result = execute(&mut session, operation);
        session.disconnect();

        if let Err(e) = &result {
            log_error(e);
        }
        result
    }
}
