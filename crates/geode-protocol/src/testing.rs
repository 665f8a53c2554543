//! In-memory transport that serves canned responses keyed by request URL.
//!
//! Unknown URLs receive `51 Not found`. Every request line and every
//! connection attempt is recorded for assertions.

use std::collections::{HashMap, HashSet};
use std::io::{self, Cursor, Read, Write};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::ProtocolError;
use crate::transport::{Connection, Transport};
use crate::Result;

#[derive(Debug, Clone)]
enum Reply {
    Complete(Vec<u8>),
    /// Serve the bytes, then fail the next read with this error kind
    Interrupted(Vec<u8>, io::ErrorKind),
}

#[derive(Debug, Default)]
struct Script {
    replies: HashMap<String, Reply>,
    unreachable: HashSet<String>,
    requests: Vec<String>,
    connections: Vec<(String, u16)>,
}

#[derive(Debug, Clone, Default)]
pub struct ScriptedTransport {
    script: Arc<Mutex<Script>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve raw response bytes, header included
    pub fn respond(&self, url: &str, response: impl Into<Vec<u8>>) -> &Self {
        self.script
            .lock()
            .replies
            .insert(url.to_string(), Reply::Complete(response.into()));
        self
    }

    /// Serve a `20 text/gemini` response with `body`
    pub fn success(&self, url: &str, body: &str) -> &Self {
        self.respond(url, format!("20 text/gemini\r\n{}", body))
    }

    pub fn redirect(&self, url: &str, target: &str) -> &Self {
        self.respond(url, format!("31 {}\r\n", target))
    }

    pub fn respond_then_fail(
        &self,
        url: &str,
        response: impl Into<Vec<u8>>,
        kind: io::ErrorKind,
    ) -> &Self {
        self.script
            .lock()
            .replies
            .insert(url.to_string(), Reply::Interrupted(response.into(), kind));
        self
    }

    /// Connections to `host` time out
    pub fn unreachable(&self, host: &str) -> &Self {
        self.script.lock().unreachable.insert(host.to_string());
        self
    }

    /// Request lines received, without CRLF, in order
    pub fn requests(&self) -> Vec<String> {
        self.script.lock().requests.clone()
    }

    pub fn connections(&self) -> Vec<(String, u16)> {
        self.script.lock().connections.clone()
    }
}

impl Transport for ScriptedTransport {
    fn connect(&self, host: &str, port: u16) -> Result<Box<dyn Connection>> {
        let mut script = self.script.lock();
        script.connections.push((host.to_string(), port));
        if script.unreachable.contains(host) {
            return Err(ProtocolError::ConnectTimeout {
                host: host.to_string(),
                port,
            });
        }

        Ok(Box::new(ScriptedConnection {
            script: Arc::clone(&self.script),
            written: Vec::new(),
            reply: None,
            failure: None,
        }))
    }
}

struct ScriptedConnection {
    script: Arc<Mutex<Script>>,
    written: Vec<u8>,
    reply: Option<Cursor<Vec<u8>>>,
    failure: Option<io::ErrorKind>,
}

impl ScriptedConnection {
    fn start_reply(&mut self) {
        let request = String::from_utf8_lossy(&self.written);
        let url = request.trim_end_matches(['\r', '\n']).to_string();

        let mut script = self.script.lock();
        let reply = script
            .replies
            .get(&url)
            .cloned()
            .unwrap_or_else(|| Reply::Complete(b"51 Not found\r\n".to_vec()));
        script.requests.push(url);

        let bytes = match reply {
            Reply::Complete(bytes) => bytes,
            Reply::Interrupted(bytes, kind) => {
                self.failure = Some(kind);
                bytes
            }
        };
        self.reply = Some(Cursor::new(bytes));
    }
}

impl Read for ScriptedConnection {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.reply.is_none() {
            self.start_reply();
        }

        let n = match self.reply.as_mut() {
            Some(reply) => reply.read(buf)?,
            None => 0,
        };
        if n == 0 && !buf.is_empty() {
            if let Some(kind) = self.failure {
                return Err(io::Error::new(kind, "scripted connection failure"));
            }
        }
        Ok(n)
    }
}

impl Write for ScriptedConnection {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.written.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
