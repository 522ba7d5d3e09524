//! Connection targets and credentials
//!
//! Plain data handed over by the locator-parsing collaborator.

use std::fmt;

/// Default FTP control port
pub const DEFAULT_CONTROL_PORT: u16 = 21;

/// Username used when a locator carries none
pub const ANONYMOUS_USERNAME: &str = "anonymous";

/// Login credentials. The password never appears in `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// `anonymous` with an empty password.
    pub fn anonymous() -> Self {
        Self::new(ANONYMOUS_USERNAME, "")
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

impl Default for Credentials {
    fn default() -> Self {
        Self::anonymous()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"****")
            .finish()
    }
}

/// Where and as whom to connect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionTarget {
    pub host: String,
    pub port: u16,
    pub credentials: Credentials,
}

impl ConnectionTarget {
    pub fn new(host: impl Into<String>, port: u16, credentials: Credentials) -> Self {
        Self {
            host: host.into(),
            port,
            credentials,
        }
    }

    /// Anonymous login on the default control port.
    pub fn anonymous(host: impl Into<String>) -> Self {
        Self::new(host, DEFAULT_CONTROL_PORT, Credentials::anonymous())
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }
}
