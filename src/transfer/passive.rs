//! Module `passive`
//!
//! Passive-mode data connections. Each transfer sends `PASV`, parses the
//! `227` reply into an endpoint and dials it; the resulting connection is
//! consumed by exactly one transfer and never reused.

use log::{debug, info};
use std::fmt;
use std::io::{self, Write};
use std::net::{IpAddr, Ipv4Addr, Shutdown, SocketAddr, TcpStream};

use crate::config::PassiveAddressPolicy;
use crate::control::ControlChannel;
use crate::error::{ConnectionError, DataChannelError, ProtocolError, Result};
use crate::protocol::{FtpCommand, responses};

/// Host/port tuple advertised in a `227` reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassiveReply {
    pub address: Ipv4Addr,
    pub port: u16,
}

/// Where the data connection for one transfer is dialed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataEndpoint {
    pub host: IpAddr,
    pub port: u16,
}

impl DataEndpoint {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl fmt::Display for DataEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.socket_addr())
    }
}

/// Extracts `(h1,h2,h3,h4,p1,p2)` from the text of a `227` reply.
///
/// When the text holds a parenthesised group, exactly six numbers must appear
/// inside the first one. Without parentheses the last six numbers of the text
/// are used. Every number must fit an octet and the port must be non-zero.
pub fn parse_passive_reply(text: &str) -> std::result::Result<PassiveReply, ProtocolError> {
    let malformed = || ProtocolError::MalformedPassiveReply(text.to_string());

    let group = text.find('(').and_then(|start| {
        let inner = &text[start + 1..];
        inner.find(')').map(|end| &inner[..end])
    });
    let (scope, exact) = match group {
        Some(inner) => (inner, true),
        None => (text, false),
    };

    let tokens: Vec<&str> = scope
        .split(|c: char| !c.is_ascii_digit())
        .filter(|t| !t.is_empty())
        .collect();
    if tokens.len() < 6 || (exact && tokens.len() != 6) {
        return Err(malformed());
    }

    let mut octets = [0u8; 6];
    for (slot, token) in octets.iter_mut().zip(&tokens[tokens.len() - 6..]) {
        *slot = token.parse::<u8>().map_err(|_| malformed())?;
    }

    let port = u16::from(octets[4]) * 256 + u16::from(octets[5]);
    if port == 0 {
        return Err(malformed());
    }

    Ok(PassiveReply {
        address: Ipv4Addr::new(octets[0], octets[1], octets[2], octets[3]),
        port,
    })
}

/// Chooses the address to dial for an advertised passive endpoint.
pub fn resolve_endpoint(
    advertised: &PassiveReply,
    control_peer: IpAddr,
    policy: PassiveAddressPolicy,
) -> DataEndpoint {
    let host = match policy {
        PassiveAddressPolicy::ControlHost => control_peer,
        PassiveAddressPolicy::Advertised => IpAddr::V4(advertised.address),
    };
    DataEndpoint {
        host,
        port: advertised.port,
    }
}

/// An open data connection, good for one transfer.
pub struct DataConnection {
    stream: TcpStream,
    endpoint: DataEndpoint,
}

impl DataConnection {
    pub fn endpoint(&self) -> DataEndpoint {
        self.endpoint
    }

    pub(crate) fn stream_mut(&mut self) -> &mut TcpStream {
        &mut self.stream
    }

    pub(crate) fn into_stream(self) -> TcpStream {
        self.stream
    }

    /// Flushes and closes the connection so the server sees end-of-data.
    pub(crate) fn finish(mut self) -> io::Result<()> {
        self.stream.flush()?;
        match self.stream.shutdown(Shutdown::Both) {
            Err(e) if e.kind() != io::ErrorKind::NotConnected => Err(e),
            _ => Ok(()),
        }
    }
}

/// Sends `PASV` and connects to the endpoint the server opened.
///
/// A reply other than `227` is a [`DataChannelError::PassiveRefused`]; a
/// reply without a usable tuple is a [`ProtocolError`].
pub fn open_passive(channel: &mut ControlChannel) -> Result<DataConnection> {
    let reply = channel.send(&FtpCommand::PASV)?;
    if reply.code() != responses::ENTERING_PASSIVE_MODE {
        return Err(DataChannelError::PassiveRefused(reply).into());
    }

    let advertised = parse_passive_reply(reply.text())?;
    let policy = channel.config().passive_address;
    let endpoint = resolve_endpoint(&advertised, channel.peer_addr().ip(), policy);
    debug!(
        "Server advertised {}:{}, dialing {} ({:?})",
        advertised.address, advertised.port, endpoint, policy
    );

    let addr = endpoint.socket_addr();
    let stream =
        TcpStream::connect(addr).map_err(|e| DataChannelError::ConnectFailed(addr, e))?;
    let timeout = channel.config().io_timeout();
    stream
        .set_read_timeout(timeout)
        .map_err(ConnectionError::from)?;
    stream
        .set_write_timeout(timeout)
        .map_err(ConnectionError::from)?;

    info!("Data connection opened to {}", endpoint);
    Ok(DataConnection { stream, endpoint })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_reply_resolves_port() {
        let parsed = parse_passive_reply("Entering Passive Mode (127,0,0,1,19,136)").unwrap();
        assert_eq!(parsed.address, Ipv4Addr::new(127, 0, 0, 1));
        assert_eq!(parsed.port, 19 * 256 + 136);
        assert_eq!(parsed.port, 5000);
    }

    #[test]
    fn tolerates_decoration_around_tuple() {
        let parsed = parse_passive_reply("Entering Passive Mode (10,1,2,3,4,1).").unwrap();
        assert_eq!(parsed.port, 1025);

        let parsed = parse_passive_reply("=192,168,0,7,200,21 ok").unwrap();
        assert_eq!(parsed.address, Ipv4Addr::new(192, 168, 0, 7));
        assert_eq!(parsed.port, 200 * 256 + 21);
    }

    #[test]
    fn trailing_parenthesised_text_is_ignored() {
        let parsed = parse_passive_reply("Entering Passive Mode (127,0,0,1,19,136). Timeout 60 (s)").unwrap();
        assert_eq!(parsed.address, Ipv4Addr::LOCALHOST);
        assert_eq!(parsed.port, 5000);
    }

    #[test]
    fn bare_tuple_uses_last_six_numbers() {
        let parsed = parse_passive_reply("Mode 2 entered 127,0,0,1,0,21").unwrap();
        assert_eq!(parsed.address, Ipv4Addr::new(127, 0, 0, 1));
        assert_eq!(parsed.port, 21);
    }

    #[test]
    fn short_tuple_is_a_protocol_error() {
        for text in [
            "Entering Passive Mode",
            "Entering Passive Mode (127,0,0,1,19)",
            "(127,0,0,1,19,136,7)",
            "(127,0,0,1,300,1)",
            "(127,0,0,1,0,0)",
        ] {
            assert!(
                matches!(
                    parse_passive_reply(text),
                    Err(ProtocolError::MalformedPassiveReply(_))
                ),
                "{} accepted",
                text
            );
        }
    }

    #[test]
    fn policy_selects_dial_address() {
        let advertised = PassiveReply {
            address: Ipv4Addr::new(10, 0, 0, 5),
            port: 40000,
        };
        let control = IpAddr::V4(Ipv4Addr::new(203, 0, 113, 9));

        let endpoint = resolve_endpoint(&advertised, control, PassiveAddressPolicy::ControlHost);
        assert_eq!(
            endpoint.socket_addr(),
            "203.0.113.9:40000".parse::<SocketAddr>().unwrap()
        );

        let endpoint = resolve_endpoint(&advertised, control, PassiveAddressPolicy::Advertised);
        assert_eq!(endpoint.to_string(), "10.0.0.5:40000");
    }
}
