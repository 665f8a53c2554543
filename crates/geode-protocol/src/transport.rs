//! Connection establishment
//!
//! [`Transport`] is the seam between the client loop and the network.
//! [`TlsTransport`] dials TCP with a timeout and completes a rustls
//! handshake whose certificate check is the trust store.

use std::io::{self, Read, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::sync::Arc;
use std::time::Duration;

use rustls::pki_types::ServerName;
use rustls::{ClientConfig, ClientConnection, StreamOwned};

use geode_trust::{trust_failure, KnownHosts, TofuVerifier, TrustError};

use crate::error::ProtocolError;
use crate::Result;

pub const DEFAULT_PORT: u16 = 1965;
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(7);
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(30);

/// A bidirectional byte stream to a server
pub trait Connection: Read + Write + Send {}

impl<T: Read + Write + Send> Connection for T {}

/// Opens connections to Gemini servers
pub trait Transport: Send + Sync {
    fn connect(&self, host: &str, port: u16) -> Result<Box<dyn Connection>>;
}

pub struct TlsTransport {
    config: Arc<ClientConfig>,
    known_hosts: KnownHosts,
    connect_timeout: Duration,
    read_timeout: Duration,
}

impl TlsTransport {
    pub fn new(known_hosts: KnownHosts) -> Result<Self> {
        let provider = Arc::new(rustls::crypto::ring::default_provider());
        let verifier = Arc::new(TofuVerifier::new(known_hosts.clone(), &provider));

        let config = ClientConfig::builder_with_provider(provider)
            .with_safe_default_protocol_versions()
            .map_err(|e| ProtocolError::Tls(e.to_string()))?
            .dangerous()
            .with_custom_certificate_verifier(verifier)
            .with_no_client_auth();

        Ok(Self {
            config: Arc::new(config),
            known_hosts,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            read_timeout: DEFAULT_READ_TIMEOUT,
        })
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    /// Trust store consulted during handshakes
    pub fn known_hosts(&self) -> &KnownHosts {
        &self.known_hosts
    }

    /// Try each resolved address in turn, each bounded by the connect timeout
    fn dial(&self, host: &str, port: u16) -> Result<TcpStream> {
        let addrs = (host, port)
            .to_socket_addrs()
            .map_err(|e| ProtocolError::Dial {
                host: host.to_string(),
                port,
                reason: e.to_string(),
            })?;

        let mut last_error = None;
        for addr in addrs {
            tracing::debug!(host = %host, addr = %addr, "Dialing");
            match TcpStream::connect_timeout(&addr, self.connect_timeout) {
                Ok(stream) => return Ok(stream),
                Err(e) => last_error = Some(e),
            }
        }

        Err(match last_error {
            Some(e) if is_timeout(&e) => ProtocolError::ConnectTimeout {
                host: host.to_string(),
                port,
            },
            Some(e) => ProtocolError::Dial {
                host: host.to_string(),
                port,
                reason: e.to_string(),
            },
            None => ProtocolError::Dial {
                host: host.to_string(),
                port,
                reason: "no addresses resolved".to_string(),
            },
        })
    }

    fn handshake_error(&self, host: &str, port: u16, err: io::Error) -> ProtocolError {
        if is_timeout(&err) {
            return ProtocolError::ConnectTimeout {
                host: host.to_string(),
                port,
            };
        }

        let tls_error = err
            .get_ref()
            .and_then(|inner| inner.downcast_ref::<rustls::Error>());

        match tls_error.and_then(trust_failure) {
            Some(TrustError::CertificateMismatch {
                host,
                expected,
                presented,
            }) => ProtocolError::CertificateMismatch {
                host: host.clone(),
                expected: expected.clone(),
                presented: presented.clone(),
            },
            Some(other) => ProtocolError::Trust(other.to_string()),
            None => ProtocolError::Dial {
                host: host.to_string(),
                port,
                reason: format!("TLS handshake failed: {err}"),
            },
        }
    }
}

impl Transport for TlsTransport {
    fn connect(&self, host: &str, port: u16) -> Result<Box<dyn Connection>> {
        let tcp = self.dial(host, port)?;
        // The handshake shares the connect budget
        set_timeouts(&tcp, self.connect_timeout)?;

        let server_name = ServerName::try_from(host.to_string())
            .map_err(|e| ProtocolError::InvalidUrl(format!("{host}: {e}")))?;
        let conn = ClientConnection::new(Arc::clone(&self.config), server_name)
            .map_err(|e| ProtocolError::Tls(e.to_string()))?;

        // Handshake eagerly so trust failures surface before the request
        let mut stream = StreamOwned::new(conn, tcp);
        while stream.conn.is_handshaking() {
            if let Err(e) = stream.conn.complete_io(&mut stream.sock) {
                return Err(self.handshake_error(host, port, e));
            }
        }

        set_timeouts(&stream.sock, self.read_timeout)?;
        tracing::debug!(host = %host, port, "TLS session established");
        Ok(Box::new(stream))
    }
}

fn set_timeouts(tcp: &TcpStream, timeout: Duration) -> io::Result<()> {
    tcp.set_read_timeout(Some(timeout))?;
    tcp.set_write_timeout(Some(timeout))
}

fn is_timeout(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock
    )
}
