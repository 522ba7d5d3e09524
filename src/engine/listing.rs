//! Module `listing`
//!
//! Lazy directory listings. Lines are read from the data connection as the
//! caller pulls them; the terminal reply is read once the server closes the
//! data connection.

use log::{debug, info, warn};
use std::io::{self, BufRead, BufReader, Read};
use std::net::TcpStream;

use crate::control::ControlChannel;
use crate::engine::operations::{abort_transfer, fail_transfer, finish_transfer, start_transfer};
use crate::error::{ConnectionError, ProtocolError, Result};
use crate::protocol::FtpCommand;
use crate::protocol::reply::MAX_LINE_LENGTH;
use crate::session::Session;
use crate::utils::validation::validate_argument;

/// Iterator over the lines of a `LIST` reply.
///
/// Holds the session's control channel for its lifetime. Dropping it before
/// the end closes the data connection and drains the pending reply, so the
/// session stays usable either way.
pub struct Listing<'s> {
    channel: &'s mut ControlChannel,
    command: FtpCommand,
    reader: Option<BufReader<TcpStream>>,
    entries: usize,
    finished: bool,
}

impl<'s> Listing<'s> {
    fn start(channel: &'s mut ControlChannel, command: FtpCommand) -> Result<Self> {
        let data = start_transfer(channel, &command, "list failed")?;
        Ok(Self {
            channel,
            command,
            reader: Some(BufReader::new(data.into_stream())),
            entries: 0,
            finished: false,
        })
    }

    /// Number of lines yielded so far.
    pub fn entries(&self) -> usize {
        self.entries
    }

    fn next_line(&mut self) -> Option<Result<String>> {
        let reader = self.reader.as_mut()?;
        let mut buf = Vec::new();
        loop {
            buf.clear();
            match reader
                .by_ref()
                .take(MAX_LINE_LENGTH as u64)
                .read_until(b'\n', &mut buf)
            {
                Ok(0) => return None,
                Ok(n) if n >= MAX_LINE_LENGTH && buf.last() != Some(&b'\n') => {
                    return Some(Err(ProtocolError::ListingLineTooLong {
                        limit: MAX_LINE_LENGTH,
                    }
                    .into()));
                }
                Ok(_) => {
                    let line = String::from_utf8_lossy(&buf)
                        .trim_end_matches(['\r', '\n'])
                        .to_string();
                    if line.trim().is_empty() {
                        continue;
                    }
                    return Some(Ok(line));
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Some(Err(ConnectionError::from(e).into())),
            }
        }
    }

    fn complete(&mut self) -> Result<()> {
        self.finished = true;
        self.reader = None;
        finish_transfer(self.channel, &self.command, "list failed")?;
        info!("{} returned {} entries", self.command, self.entries);
        Ok(())
    }
}

impl Iterator for Listing<'_> {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        match self.next_line() {
            Some(Ok(line)) => {
                self.entries += 1;
                self.channel.notify_data_line(&line);
                Some(Ok(line))
            }
            Some(Err(e)) => {
                warn!("{} failed while reading data: {}", self.command, e);
                self.finished = true;
                self.reader = None;
                Some(Err(fail_transfer(self.channel, &self.command, e)))
            }
            None => self.complete().err().map(Err),
        }
    }
}

impl Drop for Listing<'_> {
    fn drop(&mut self) {
        if !self.finished {
            debug!("{} dropped before end of data", self.command);
            self.finished = true;
            self.reader = None;
            abort_transfer(self.channel, &self.command);
        }
    }
}

/// Starts a `LIST` of `path`; an empty path lists the working directory.
pub fn list<'s>(session: &'s mut Session, path: &str) -> Result<Listing<'s>> {
    validate_argument(path)?;
    let argument = Some(path.trim())
        .filter(|p| !p.is_empty())
        .map(str::to_string);
    Listing::start(session.channel_mut(), FtpCommand::LIST(argument))
}

/// Lists `path` and collects every line.
pub fn list_all(session: &mut Session, path: &str) -> Result<Vec<String>> {
    list(session, path)?.collect()
}
