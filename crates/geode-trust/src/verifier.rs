//! rustls certificate verifier backed by the known hosts file

use std::sync::Arc;

use rustls::client::danger::{HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier};
use rustls::crypto::{
    verify_tls12_signature, verify_tls13_signature, CryptoProvider, WebPkiSupportedAlgorithms,
};
use rustls::pki_types::{CertificateDer, ServerName, UnixTime};
use rustls::{CertificateError, DigitallySignedStruct, OtherError, SignatureScheme};

use crate::error::TrustError;
use crate::known_hosts::KnownHosts;

/// Replaces CA chain validation with a TOFU lookup.
///
/// Handshake signatures are still checked with the provider's algorithms,
/// so a peer must hold the private key of the certificate it presents.
#[derive(Debug)]
pub struct TofuVerifier {
    known_hosts: KnownHosts,
    algorithms: WebPkiSupportedAlgorithms,
}

impl TofuVerifier {
    pub fn new(known_hosts: KnownHosts, provider: &CryptoProvider) -> Self {
        Self {
            known_hosts,
            algorithms: provider.signature_verification_algorithms,
        }
    }
}

impl ServerCertVerifier for TofuVerifier {
    fn verify_server_cert(
        &self,
        end_entity: &CertificateDer<'_>,
        _intermediates: &[CertificateDer<'_>],
        server_name: &ServerName<'_>,
        _ocsp_response: &[u8],
        _now: UnixTime,
    ) -> Result<ServerCertVerified, rustls::Error> {
        let host = server_name.to_str();
        match self.known_hosts.verify(&host, end_entity.as_ref()) {
            Ok(_) => Ok(ServerCertVerified::assertion()),
            Err(err) => Err(rustls::Error::InvalidCertificate(CertificateError::Other(
                OtherError(Arc::new(err)),
            ))),
        }
    }

    fn verify_tls12_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        verify_tls12_signature(message, cert, dss, &self.algorithms)
    }

    fn verify_tls13_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        verify_tls13_signature(message, cert, dss, &self.algorithms)
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        self.algorithms.supported_schemes()
    }
}

/// Recover the trust failure a [`TofuVerifier`] raised during a handshake
pub fn trust_failure(err: &rustls::Error) -> Option<&TrustError> {
    match err {
        rustls::Error::InvalidCertificate(CertificateError::Other(other)) => {
            other.0.downcast_ref::<TrustError>()
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn verifier() -> (TempDir, TofuVerifier) {
        let dir = TempDir::new().unwrap();
        let hosts = KnownHosts::new(dir.path().join("known-hosts"));
        let provider = rustls::crypto::ring::default_provider();
        (dir, TofuVerifier::new(hosts, &provider))
    }

    fn check(verifier: &TofuVerifier, host: &str, der: &[u8]) -> Result<ServerCertVerified, rustls::Error> {
        let cert = CertificateDer::from(der.to_vec());
        let name = ServerName::try_from(host.to_string()).unwrap();
        verifier.verify_server_cert(&cert, &[], &name, &[], UnixTime::now())
    }

    #[test]
    fn test_pins_then_accepts_same_certificate() {
        let (_dir, verifier) = verifier();
        assert!(check(&verifier, "example.test", b"cert-a").is_ok());
        assert!(check(&verifier, "example.test", b"cert-a").is_ok());
    }

    #[test]
    fn test_mismatch_is_recoverable_from_tls_error() {
        let (_dir, verifier) = verifier();
        check(&verifier, "example.test", b"cert-a").unwrap();

        let err = check(&verifier, "example.test", b"cert-b").unwrap_err();
        match trust_failure(&err) {
            Some(TrustError::CertificateMismatch { host, .. }) => assert_eq!(host, "example.test"),
            other => panic!("expected mismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_unrelated_tls_error_is_not_a_trust_failure() {
        assert!(trust_failure(&rustls::Error::DecryptError).is_none());
    }

    #[test]
    fn test_advertises_provider_schemes() {
        let (_dir, verifier) = verifier();
        assert!(!verifier.supported_verify_schemes().is_empty());
    }
}
