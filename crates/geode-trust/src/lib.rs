//! Geode Trust Store
//!
//! Server identity without certificate authorities:
//! - The first certificate seen for a host is pinned by its SHA-256 fingerprint
//! - Later connections must present the same certificate
//! - A changed certificate is a hard failure, never a silent re-pin

mod error;
mod known_hosts;
mod verifier;

pub use error::TrustError;
pub use known_hosts::{fingerprint, KnownHosts, TrustOutcome};
pub use verifier::{trust_failure, TofuVerifier};

pub type Result<T> = std::result::Result<T, TrustError>;
