//! Known hosts file
//!
//! Plain text, one `<hostname> <fingerprint>` record per line. Records are
//! appended, never edited in place, and the first record for a host wins.

use parking_lot::Mutex;
use sha2::{Digest, Sha256};
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::TrustError;
use crate::Result;

/// How a successful verification was reached
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrustOutcome {
    /// No record existed; the presented certificate is now pinned
    FirstUse,
    /// The presented certificate matches the pinned one
    Known,
}

/// Lowercase hex SHA-256 of a DER encoded certificate
pub fn fingerprint(certificate_der: &[u8]) -> String {
    Sha256::digest(certificate_der)
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect()
}

#[derive(Debug, Clone)]
pub struct KnownHosts {
    path: PathBuf,
    /// Serializes check-then-append within the process
    lock: Arc<Mutex<()>>,
}

impl KnownHosts {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check a presented certificate against the pinned record for `host`.
    ///
    /// An unknown host is pinned on the spot. A known host presenting a
    /// different certificate fails with [`TrustError::CertificateMismatch`].
    pub fn verify(&self, host: &str, certificate_der: &[u8]) -> Result<TrustOutcome> {
        let presented = fingerprint(certificate_der);
        let _guard = self.lock.lock();

        match self.lookup(host)? {
            Some(expected) if expected == presented => Ok(TrustOutcome::Known),
            Some(expected) => {
                tracing::warn!(
                    host = %host,
                    expected = %expected,
                    presented = %presented,
                    "Server certificate does not match pinned fingerprint"
                );
                Err(TrustError::CertificateMismatch {
                    host: host.to_string(),
                    expected,
                    presented,
                })
            }
            None => {
                self.append(host, &presented)?;
                tracing::info!(host = %host, fingerprint = %presented, "Pinned new host");
                Ok(TrustOutcome::FirstUse)
            }
        }
    }

    /// Pinned fingerprint for `host`, if any
    pub fn fingerprint_of(&self, host: &str) -> Result<Option<String>> {
        let _guard = self.lock.lock();
        self.lookup(host)
    }

    /// Drop every record for `host` so the next connection pins afresh.
    /// Returns whether anything was removed.
    pub fn forget(&self, host: &str) -> Result<bool> {
        let _guard = self.lock.lock();

        let records = self.read_records()?;
        let kept: Vec<&(String, String)> = records.iter().filter(|(h, _)| h != host).collect();
        if kept.len() == records.len() {
            return Ok(false);
        }

        let dir = self.parent_dir();
        fs::create_dir_all(&dir)?;
        let mut file = tempfile::NamedTempFile::new_in(&dir)?;
        for (h, fp) in kept {
            writeln!(file, "{} {}", h, fp)?;
        }
        file.as_file().sync_all()?;
        file.persist(&self.path).map_err(|e| TrustError::Io(e.error))?;

        tracing::info!(host = %host, "Forgot pinned host");
        Ok(true)
    }

    fn lookup(&self, host: &str) -> Result<Option<String>> {
        Ok(self
            .read_records()?
            .into_iter()
            .find(|(h, _)| h == host)
            .map(|(_, fp)| fp))
    }

    fn read_records(&self) -> Result<Vec<(String, String)>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        Ok(contents
            .lines()
            .filter_map(|line| {
                let mut parts = line.split_whitespace();
                match (parts.next(), parts.next()) {
                    (Some(host), Some(fp)) => Some((host.to_string(), fp.to_string())),
                    _ => None,
                }
            })
            .collect())
    }

    fn append(&self, host: &str, fingerprint: &str) -> Result<()> {
        fs::create_dir_all(self.parent_dir())?;

        let mut options = OpenOptions::new();
        options.create(true).append(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }

        let mut file = options.open(&self.path)?;
        writeln!(file, "{} {}", host, fingerprint)?;
        Ok(())
    }

    fn parent_dir(&self) -> PathBuf {
        match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }
}
