//! End-to-end fetches against a loopback rustls server with self-signed
//! certificates.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use rcgen::{generate_simple_self_signed, CertifiedKey};
use rustls::pki_types::{CertificateDer, PrivateKeyDer, PrivatePkcs8KeyDer};
use rustls::{ServerConfig, ServerConnection, StreamOwned};
use tempfile::TempDir;
use url::Url;

use geode_protocol::{GeminiClient, ProtocolError, TlsTransport, Transport};
use geode_storage::ContentCache;
use geode_trust::{fingerprint, KnownHosts};

struct TestServer {
    port: u16,
    cert_der: CertificateDer<'static>,
}

/// Serve `connections` requests, each answered with `response`
fn spawn_server(response: &'static str, connections: usize) -> TestServer {
    let CertifiedKey { cert, key_pair } =
        generate_simple_self_signed(vec!["localhost".to_string()]).unwrap();
    let cert_der = cert.der().clone();
    let key = PrivateKeyDer::Pkcs8(PrivatePkcs8KeyDer::from(key_pair.serialize_der()));

    let config = ServerConfig::builder_with_provider(Arc::new(
        rustls::crypto::ring::default_provider(),
    ))
    .with_safe_default_protocol_versions()
    .unwrap()
    .with_no_client_auth()
    .with_single_cert(vec![cert_der.clone()], key)
    .unwrap();
    let config = Arc::new(config);

    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();

    thread::spawn(move || {
        for stream in listener.incoming().take(connections) {
            let Ok(stream) = stream else { continue };
            let _ = serve(Arc::clone(&config), stream, response);
        }
    });

    TestServer { port, cert_der }
}

fn serve(config: Arc<ServerConfig>, stream: TcpStream, response: &str) -> std::io::Result<()> {
    let conn = ServerConnection::new(config).map_err(std::io::Error::other)?;
    let mut tls = StreamOwned::new(conn, stream);

    let mut request = Vec::new();
    let mut byte = [0u8; 1];
    while !request.ends_with(b"\r\n") {
        if tls.read(&mut byte)? == 0 {
            return Ok(());
        }
        request.push(byte[0]);
    }

    tls.write_all(response.as_bytes())?;
    tls.conn.send_close_notify();
    tls.flush()?;
    Ok(())
}

fn client(dir: &TempDir) -> (KnownHosts, GeminiClient) {
    let known_hosts = KnownHosts::new(dir.path().join("known-hosts"));
    let transport = TlsTransport::new(known_hosts.clone()).unwrap();
    let cache = ContentCache::new(dir.path().join("cache"));
    (known_hosts, GeminiClient::new(Arc::new(transport), cache))
}

#[test]
fn test_first_fetch_pins_certificate() {
    let dir = TempDir::new().unwrap();
    let (known_hosts, client) = client(&dir);
    let server = spawn_server("20 text/gemini\r\n# Hello\n", 2);
    let url = Url::parse(&format!("gemini://127.0.0.1:{}/", server.port)).unwrap();

    let resp = client.fetch(&url, false).unwrap();
    assert_eq!(resp.status.code, 20);
    assert_eq!(resp.body, b"# Hello\n");

    assert_eq!(
        known_hosts.fingerprint_of("127.0.0.1").unwrap(),
        Some(fingerprint(server.cert_der.as_ref()))
    );

    // Same certificate on the second visit
    let resp = client.fetch(&url, false).unwrap();
    assert_eq!(resp.body, b"# Hello\n");
}

#[test]
fn test_changed_certificate_is_rejected() {
    let dir = TempDir::new().unwrap();
    let (known_hosts, client) = client(&dir);

    let first = spawn_server("20 text/gemini\r\nfirst\n", 1);
    let url = Url::parse(&format!("gemini://127.0.0.1:{}/", first.port)).unwrap();
    client.fetch(&url, false).unwrap();

    // Trust is keyed by host name only, so a new server on another port
    // with a fresh certificate is an impostor
    let second = spawn_server("20 text/gemini\r\nsecond\n", 1);
    let url = Url::parse(&format!("gemini://127.0.0.1:{}/", second.port)).unwrap();

    match client.fetch(&url, false) {
        Err(ProtocolError::CertificateMismatch {
            host,
            expected,
            presented,
        }) => {
            assert_eq!(host, "127.0.0.1");
            assert_eq!(expected, fingerprint(first.cert_der.as_ref()));
            assert_eq!(presented, fingerprint(second.cert_der.as_ref()));
        }
        other => panic!("expected certificate mismatch, got {:?}", other),
    }

    // The original pin survives
    assert_eq!(
        known_hosts.fingerprint_of("127.0.0.1").unwrap(),
        Some(fingerprint(first.cert_der.as_ref()))
    );
}

#[test]
fn test_refused_connection_is_a_dial_error() {
    let dir = TempDir::new().unwrap();
    let (_known_hosts, client) = client(&dir);

    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let url = Url::parse(&format!("gemini://127.0.0.1:{}/", port)).unwrap();

    let err = client.fetch(&url, false).unwrap_err();
    assert!(matches!(err, ProtocolError::Dial { .. }), "got {:?}", err);
}

#[test]
fn test_silent_server_times_out_within_connect_budget() {
    let dir = TempDir::new().unwrap();
    let known_hosts = KnownHosts::new(dir.path().join("known-hosts"));
    let transport = TlsTransport::new(known_hosts)
        .unwrap()
        .with_connect_timeout(Duration::from_millis(300))
        .with_read_timeout(Duration::from_secs(30));

    // Accepts TCP but never answers the ClientHello
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();

    let started = Instant::now();
    let err = match transport.connect("127.0.0.1", port) {
        Err(e) => e,
        Ok(_) => panic!("handshake with a silent server succeeded"),
    };
    assert!(matches!(err, ProtocolError::ConnectTimeout { .. }), "got {:?}", err);
    assert!(started.elapsed() < Duration::from_secs(10));
    drop(listener);
}

#[test]
fn test_transport_shares_trust_store() {
    let dir = TempDir::new().unwrap();
    let known_hosts = KnownHosts::new(dir.path().join("known-hosts"));
    let transport = TlsTransport::new(known_hosts.clone()).unwrap();
    let server = spawn_server("20 text/gemini\r\nok\n", 1);

    transport.connect("127.0.0.1", server.port).unwrap();
    assert_eq!(transport.known_hosts().path(), known_hosts.path());
    assert_eq!(
        transport.known_hosts().fingerprint_of("127.0.0.1").unwrap(),
        Some(fingerprint(server.cert_der.as_ref()))
    );
}
