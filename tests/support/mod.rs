//! In-process FTP server for integration tests.
//!
//! Serves a temporary directory over a minimal passive-mode command set. Runs
//! on its own tokio runtime in a background thread so tests can drive the
//! blocking client directly.

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::{Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::sync::{Arc, mpsc};
use std::thread;

use log::{info, warn};
use tempfile::TempDir;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};

use rax_ftp_client::{ClientConfig, ConnectionTarget, Credentials};

pub const USER: &str = "alice";
pub const PASSWORD: &str = "secret";

pub struct MockServerOptions {
    /// Raw greeting lines, sent CRLF-terminated.
    pub greeting: Vec<String>,
    /// Known users; `None` logs in on `USER` alone.
    pub users: HashMap<String, Option<String>>,
    /// Address put into `227` replies.
    pub advertised_ip: Ipv4Addr,
    /// Raw reply sent to `PASV` instead of opening a listener.
    pub passive_override: Option<String>,
    /// `STOR` reads this many bytes, drops the data socket and answers `552`.
    pub store_quota: Option<u64>,
    /// `DELE` always answers `550`.
    pub refuse_delete: bool,
}

impl Default for MockServerOptions {
    fn default() -> Self {
        let mut users = HashMap::new();
        users.insert("anonymous".to_string(), None);
        users.insert(USER.to_string(), Some(PASSWORD.to_string()));
        Self {
            greeting: vec!["220 Welcome to RAX FTP Server".to_string()],
            users,
            advertised_ip: Ipv4Addr::LOCALHOST,
            passive_override: None,
            store_quota: None,
            refuse_delete: false,
        }
    }
}

pub struct MockServer {
    addr: SocketAddr,
    root: TempDir,
}

impl MockServer {
    pub fn start() -> Self {
        Self::with_options(MockServerOptions::default())
    }

    pub fn with_options(options: MockServerOptions) -> Self {
        let root = tempfile::tempdir().unwrap();
        let root_path = root.path().to_path_buf();
        let options = Arc::new(options);
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .worker_threads(2)
                .enable_all()
                .build()
                .unwrap();
            runtime.block_on(async move {
                let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
                tx.send(listener.local_addr().unwrap()).unwrap();

                loop {
                    let (stream, addr) = match listener.accept().await {
                        Ok(accepted) => accepted,
                        Err(e) => {
                            warn!("mock accept failed: {}", e);
                            continue;
                        }
                    };
                    let root = root_path.clone();
                    let options = Arc::clone(&options);
                    tokio::spawn(async move {
                        if let Err(e) = handle_session(stream, root, options).await {
                            warn!("mock session {} ended: {}", addr, e);
                        }
                    });
                }
            });
        });

        let addr = rx.recv().unwrap();
        Self { addr, root }
    }

    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    /// Directory the server serves as `/`.
    pub fn root(&self) -> &Path {
        self.root.path()
    }

    pub fn target(&self, username: &str, password: &str) -> ConnectionTarget {
        ConnectionTarget::new("127.0.0.1", self.port(), Credentials::new(username, password))
    }

    pub fn user_target(&self) -> ConnectionTarget {
        self.target(USER, PASSWORD)
    }

    pub fn anonymous_target(&self) -> ConnectionTarget {
        ConnectionTarget::anonymous("127.0.0.1").with_port(self.port())
    }
}

/// Client configuration with a timeout so a protocol bug fails instead of hanging.
pub fn test_config() -> ClientConfig {
    ClientConfig {
        io_timeout_secs: 10,
        ..ClientConfig::default()
    }
}

fn resolve(root: &Path, arg: &str) -> PathBuf {
    root.join(arg.trim().trim_start_matches('/'))
}

fn passive_reply(ip: Ipv4Addr, port: u16) -> String {
    let [a, b, c, d] = ip.octets();
    format!(
        "227 Entering Passive Mode ({},{},{},{},{},{})\r\n",
        a,
        b,
        c,
        d,
        port / 256,
        port % 256
    )
}

fn list_lines(dir: &Path) -> std::io::Result<String> {
    let mut entries: Vec<_> = std::fs::read_dir(dir)?.filter_map(|e| e.ok()).collect();
    entries.sort_by_key(|e| e.file_name());

    let mut out = String::new();
    for entry in entries {
        let metadata = entry.metadata()?;
        let kind = if metadata.is_dir() { 'd' } else { '-' };
        out.push_str(&format!(
            "{}rw-r--r-- 1 ftp ftp {:>8} Jan 01 00:00 {}\r\n",
            kind,
            metadata.len(),
            entry.file_name().to_string_lossy()
        ));
    }
    Ok(out)
}

async fn accept_data(listener: TcpListener) -> std::io::Result<TcpStream> {
    let (stream, _) = listener.accept().await?;
    Ok(stream)
}

async fn handle_session(
    stream: TcpStream,
    root: PathBuf,
    options: Arc<MockServerOptions>,
) -> std::io::Result<()> {
    let (read_half, mut writer) = stream.into_split();
    let mut reader = BufReader::new(read_half);

    for line in &options.greeting {
        writer.write_all(format!("{}\r\n", line).as_bytes()).await?;
    }
    writer.flush().await?;

    let mut pending_user: Option<String> = None;
    let mut logged_in = false;
    let mut passive: Option<TcpListener> = None;
    let mut line = String::new();

    loop {
        line.clear();
        if reader.read_line(&mut line).await? == 0 {
            return Ok(());
        }

        let trimmed = line.trim_end_matches(['\r', '\n']);
        let (verb, arg) = match trimmed.split_once(' ') {
            Some((verb, arg)) => (verb.to_ascii_uppercase(), arg.to_string()),
            None => (trimmed.to_ascii_uppercase(), String::new()),
        };
        info!("mock received {} {}", verb, arg);

        let reply = match verb.as_str() {
            "USER" => {
                let immediate = matches!(options.users.get(&arg), Some(None));
                pending_user = Some(arg);
                if immediate {
                    logged_in = true;
                    "230 User logged in\r\n".to_string()
                } else {
                    "331 Password required\r\n".to_string()
                }
            }
            "PASS" => {
                let expected = pending_user
                    .take()
                    .and_then(|user| options.users.get(&user).cloned());
                if expected == Some(Some(arg)) {
                    logged_in = true;
                    "230 User logged in\r\n".to_string()
                } else {
                    "530 Login incorrect\r\n".to_string()
                }
            }
            "QUIT" => {
                writer.write_all(b"221 Goodbye\r\n").await?;
                return Ok(());
            }
            _ if !logged_in => "530 Not logged in\r\n".to_string(),
            "TYPE" | "MODE" | "STRU" => format!("200 {} set to {}\r\n", verb, arg),
            "PASV" if options.passive_override.is_some() => {
                format!("{}\r\n", options.passive_override.as_deref().unwrap_or_default())
            }
            "PASV" => {
                let listener = TcpListener::bind("127.0.0.1:0").await?;
                let port = listener.local_addr()?.port();
                passive = Some(listener);
                passive_reply(options.advertised_ip, port)
            }
            "LIST" | "RETR" | "STOR" => match passive.take() {
                None => "425 Use PASV first\r\n".to_string(),
                Some(listener) => {
                    let path = resolve(&root, &arg);
                    transfer(&verb, &path, listener, &mut writer, &options).await?
                }
            },
            "MKD" => {
                let path = resolve(&root, &arg);
                match std::fs::create_dir(&path) {
                    Ok(()) => format!("257 \"{}\" created\r\n", arg),
                    Err(e) => format!("550 {}\r\n", e),
                }
            }
            "RMD" => match std::fs::remove_dir(resolve(&root, &arg)) {
                Ok(()) => "250 Directory removed\r\n".to_string(),
                Err(e) => format!("550 {}\r\n", e),
            },
            "DELE" if options.refuse_delete => "550 Permission denied\r\n".to_string(),
            "DELE" => match std::fs::remove_file(resolve(&root, &arg)) {
                Ok(()) => "250 File deleted\r\n".to_string(),
                Err(e) => format!("550 {}\r\n", e),
            },
            _ => "502 Command not implemented\r\n".to_string(),
        };

        writer.write_all(reply.as_bytes()).await?;
        writer.flush().await?;
    }
}

/// Runs one data transfer and returns the terminal reply.
async fn transfer(
    verb: &str,
    path: &Path,
    listener: TcpListener,
    writer: &mut tokio::net::tcp::OwnedWriteHalf,
    options: &MockServerOptions,
) -> std::io::Result<String> {
    let ready = match verb {
        "LIST" => path.is_dir(),
        "RETR" => path.is_file(),
        _ => path.parent().is_some_and(|p| p.is_dir()),
    };
    if !ready {
        return Ok("550 No such file or directory\r\n".to_string());
    }

    writer
        .write_all(b"150 Opening BINARY mode data connection\r\n")
        .await?;
    writer.flush().await?;

    let mut data = accept_data(listener).await?;
    if let (Some(quota), "STOR") = (options.store_quota, verb) {
        let mut head = Vec::new();
        (&mut data).take(quota).read_to_end(&mut head).await?;
        drop(data);
        return Ok("552 Quota exceeded\r\n".to_string());
    }
    let streamed: std::io::Result<()> = async {
        match verb {
            "LIST" => {
                let listing = list_lines(path)?;
                data.write_all(listing.as_bytes()).await?;
            }
            "RETR" => {
                let bytes = tokio::fs::read(path).await?;
                data.write_all(&bytes).await?;
            }
            _ => {
                let mut bytes = Vec::new();
                data.read_to_end(&mut bytes).await?;
                tokio::fs::write(path, &bytes).await?;
            }
        }
        data.shutdown().await
    }
    .await;

    Ok(match streamed {
        Ok(()) => "226 Transfer complete\r\n".to_string(),
        Err(e) => format!("426 Connection closed; transfer aborted: {}\r\n", e),
    })
}
