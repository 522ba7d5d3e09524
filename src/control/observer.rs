//! Module `observer`
//!
//! Optional interceptor for control-channel traffic. The control channel
//! reports every command it writes, every reply it reads and every listing
//! line received on a data connection to an attached [`ControlObserver`].

use std::sync::{Arc, Mutex, MutexGuard};

use crate::protocol::Reply;

/// Receives a copy of the control-channel conversation.
pub trait ControlObserver: Send {
    /// A command line as sent, password masked, without the terminator.
    fn on_command(&mut self, _command: &str) {}

    /// A complete reply as received.
    fn on_reply(&mut self, _reply: &Reply) {}

    /// One line of directory listing read from a data connection.
    fn on_data_line(&mut self, _line: &str) {}
}

/// One recorded event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscriptEntry {
    Command(String),
    Reply(Reply),
    DataLine(String),
}

/// Shared in-memory recorder of a session's conversation.
///
/// Cloning yields another handle to the same log, so the caller keeps one
/// handle while the control channel owns the other.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    entries: Arc<Mutex<Vec<TranscriptEntry>>>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<TranscriptEntry>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Snapshot of every recorded entry
    pub fn entries(&self) -> Vec<TranscriptEntry> {
        self.lock().clone()
    }

    /// Commands sent, in order
    pub fn commands(&self) -> Vec<String> {
        self.lock()
            .iter()
            .filter_map(|entry| match entry {
                TranscriptEntry::Command(c) => Some(c.clone()),
                _ => None,
            })
            .collect()
    }

    /// Reply codes received, in order
    pub fn reply_codes(&self) -> Vec<u16> {
        self.lock()
            .iter()
            .filter_map(|entry| match entry {
                TranscriptEntry::Reply(r) => Some(r.code()),
                _ => None,
            })
            .collect()
    }

    /// Replies and listing lines rendered as CRLF-terminated text.
    ///
    /// Multi-line replies are rendered in wire form with hyphenated
    /// continuation lines.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for entry in self.lock().iter() {
            match entry {
                TranscriptEntry::Command(_) => {}
                TranscriptEntry::Reply(reply) => {
                    let mut lines = reply.text().split('\n').peekable();
                    while let Some(line) = lines.next() {
                        let sep = if lines.peek().is_some() { '-' } else { ' ' };
                        out.push_str(&format!("{}{}{}\r\n", reply.code(), sep, line));
                    }
                }
                TranscriptEntry::DataLine(line) => {
                    out.push_str(line);
                    out.push_str("\r\n");
                }
            }
        }
        out
    }

    fn push(&self, entry: TranscriptEntry) {
        self.lock().push(entry);
    }
}

impl ControlObserver for Transcript {
    fn on_command(&mut self, command: &str) {
        self.push(TranscriptEntry::Command(command.to_string()));
    }

    fn on_reply(&mut self, reply: &Reply) {
        self.push(TranscriptEntry::Reply(reply.clone()));
    }

    fn on_data_line(&mut self, line: &str) {
        self.push(TranscriptEntry::DataLine(line.to_string()));
    }
}
