//! Response header parsing

use crate::error::ProtocolError;
use crate::Result;

/// Longest meta field a server may send
pub const MAX_META_LEN: usize = 1024;

/// Broad meaning of a status code, taken from its first digit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    Input,
    Success,
    Redirect,
    TemporaryFailure,
    PermanentFailure,
    ClientCertificate,
    Unknown,
}

/// A parsed `<code> <meta>` response header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub code: u8,
    pub meta: String,
}

impl Status {
    pub fn new(code: u8, meta: impl Into<String>) -> Self {
        Self {
            code,
            meta: meta.into(),
        }
    }

    /// Parse a header line with its CRLF already removed.
    ///
    /// The first whitespace separated token must be an integer; the rest
    /// of the line, trimmed, is the meta field.
    pub fn parse(line: &str) -> Result<Self> {
        let line = line.trim_end_matches(['\r', '\n']);
        let mut parts = line.splitn(2, [' ', '\t']);

        let code_token = parts.next().unwrap_or_default();
        if code_token.is_empty() {
            return Err(ProtocolError::MalformedStatusLine(line.to_string()));
        }
        let code: u8 = code_token
            .parse()
            .map_err(|_| ProtocolError::MalformedStatusLine(line.to_string()))?;

        let meta = parts.next().unwrap_or_default().trim();
        if meta.len() > MAX_META_LEN {
            return Err(ProtocolError::MalformedStatusLine(format!(
                "meta longer than {} bytes",
                MAX_META_LEN
            )));
        }

        Ok(Self::new(code, meta))
    }

    pub fn class(&self) -> StatusClass {
        match self.code / 10 {
            1 => StatusClass::Input,
            2 => StatusClass::Success,
            3 => StatusClass::Redirect,
            4 => StatusClass::TemporaryFailure,
            5 => StatusClass::PermanentFailure,
            6 => StatusClass::ClientCertificate,
            _ => StatusClass::Unknown,
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.meta.is_empty() {
            write!(f, "{}", self.code)
        } else {
            write!(f, "{} {}", self.code, self.meta)
        }
    }
}
