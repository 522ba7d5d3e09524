//! Module `channel`
//!
//! Owns the control connection to an FTP server. Commands are written one at
//! a time and each is answered by exactly one logical reply before the next
//! command may be sent; nothing is pipelined.

use log::{debug, info, warn};
use std::io::{BufReader, Write};
use std::net::{Shutdown, SocketAddr, TcpStream};

use crate::config::ClientConfig;
use crate::control::observer::ControlObserver;
use crate::error::{ConnectionError, FtpClientError, Result};
use crate::protocol::{FtpCommand, Reply, read_reply, responses};

/// Blocking control connection.
pub struct ControlChannel {
    reader: BufReader<TcpStream>,
    writer: TcpStream,
    host: String,
    peer_addr: SocketAddr,
    config: ClientConfig,
    observer: Option<Box<dyn ControlObserver>>,
    broken: bool,
}

impl ControlChannel {
    /// Connects to `host:port` and reads the server greeting.
    ///
    /// The greeting must be `220`; anything else closes the socket and fails
    /// with [`FtpClientError::Session`].
    pub fn open(
        host: &str,
        port: u16,
        config: &ClientConfig,
        observer: Option<Box<dyn ControlObserver>>,
    ) -> Result<(Self, Reply)> {
        let target = format!("{}:{}", host, port);
        let stream = TcpStream::connect((host, port))
            .map_err(|e| ConnectionError::ConnectFailed(target.clone(), e))?;
        stream
            .set_read_timeout(config.io_timeout())
            .map_err(ConnectionError::from)?;
        stream
            .set_write_timeout(config.io_timeout())
            .map_err(ConnectionError::from)?;

        let peer_addr = stream.peer_addr().map_err(ConnectionError::from)?;
        let writer = stream.try_clone().map_err(ConnectionError::from)?;
        info!("Control connection established to {} ({})", target, peer_addr);

        let mut channel = Self {
            reader: BufReader::new(stream),
            writer,
            host: host.to_string(),
            peer_addr,
            config: config.clone(),
            observer,
            broken: false,
        };

        let greeting = channel.read_reply()?;
        if greeting.code() != responses::READY {
            warn!("FTP server {} not ready: {}", target, greeting);
            channel.shutdown();
            return Err(FtpClientError::Session(greeting));
        }

        Ok((channel, greeting))
    }

    // --- Accessors ---

    /// Host name the control connection was opened with.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Resolved address of the server's control endpoint.
    pub fn peer_addr(&self) -> SocketAddr {
        self.peer_addr
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Whether a transport or framing failure has made the channel unusable.
    pub fn is_broken(&self) -> bool {
        self.broken
    }

    // --- Command/reply primitives ---

    /// Writes `command` and reads its reply.
    pub fn send(&mut self, command: &FtpCommand) -> Result<Reply> {
        self.write_command(command)?;
        self.read_reply()
    }

    /// Reads one logical reply, e.g. the terminal reply after a data transfer.
    pub fn read_reply(&mut self) -> Result<Reply> {
        match read_reply(&mut self.reader, self.config.max_reply_lines) {
            Ok(reply) => {
                debug!("<- {}", reply);
                if let Some(observer) = self.observer.as_mut() {
                    observer.on_reply(&reply);
                }
                Ok(reply)
            }
            Err(e) => {
                self.broken = true;
                Err(e)
            }
        }
    }

    fn write_command(&mut self, command: &FtpCommand) -> Result<()> {
        debug!("-> {}", command);
        if let Some(observer) = self.observer.as_mut() {
            observer.on_command(&command.to_string());
        }

        let line = command.to_line();
        let written = self
            .writer
            .write_all(line.as_bytes())
            .and_then(|_| self.writer.flush());
        if let Err(e) = written {
            self.broken = true;
            return Err(ConnectionError::from(e).into());
        }
        Ok(())
    }

    /// Forwards a listing line to the observer, if one is attached.
    pub(crate) fn notify_data_line(&mut self, line: &str) {
        if let Some(observer) = self.observer.as_mut() {
            observer.on_data_line(line);
        }
    }

    // --- Teardown ---

    /// Best-effort teardown: sends `QUIT` when the channel is still healthy,
    /// then closes the socket. Never fails.
    pub fn close(mut self) {
        if !self.broken {
            match self.send(&FtpCommand::QUIT) {
                Ok(reply) if reply.code() == responses::CLOSING_CONTROL => {
                    debug!("Server {} acknowledged QUIT", self.peer_addr);
                }
                Ok(reply) => warn!("Unexpected reply to QUIT from {}: {}", self.peer_addr, reply),
                Err(e) => warn!("QUIT to {} failed: {}", self.peer_addr, e),
            }
        }
        self.shutdown();
        info!("Control connection to {} closed", self.peer_addr);
    }

    fn shutdown(&mut self) {
        self.broken = true;
        if let Err(e) = self.writer.shutdown(Shutdown::Both) {
            debug!("Control socket shutdown for {}: {}", self.peer_addr, e);
        }
    }
}
