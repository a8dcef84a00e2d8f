use std::error::Error;
use std::fmt::Display;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::SUPPORTED_DOMAINS;

static MAGIC_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"#( Netscape)? HTTP Cookie File").unwrap());
static HTTPONLY_PREFIX: &str = "#HttpOnly_";
static SESSION_COOKIE: &str = "ndus";

/// Cookie header value sent to Terabox, `lang=en; ndus=<token>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn from_ndus(token: &str) -> Self {
        Self(format!("lang=en; {SESSION_COOKIE}={token}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One record of a Netscape cookie file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieRecord {
    pub domain: String,
    pub domain_specified: bool,
    pub path: String,
    pub secure: bool,
    pub expires: Option<i64>,
    pub name: String,
    pub value: Option<String>,
    pub http_only: bool,
}

#[derive(Debug)]
pub enum CookieFileError {
    Read(std::io::Error),
    MissingHeader,
    InvalidLine(usize, String),
}

impl Display for CookieFileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read(e) => write!(f, "could not read cookie file: {e}"),
            Self::MissingHeader => write!(f, "does not look like a Netscape format cookies file"),
            Self::InvalidLine(number, line) => {
                write!(f, "invalid Netscape format cookies file at line {number}: {line:?}")
            }
        }
    }
}

impl Error for CookieFileError {}

/// Parse the contents of a Netscape/Mozilla `cookies.txt` file.
///
/// Expiry and discard flags are kept but never enforced.
pub fn parse_netscape(content: &str) -> Result<Vec<CookieRecord>, CookieFileError> {
    let mut lines = content.lines().enumerate();
    match lines.next() {
        Some((_, magic)) if MAGIC_RE.is_match(magic) => {}
        _ => return Err(CookieFileError::MissingHeader),
    }

    let mut records = Vec::new();
    for (index, raw) in lines {
        let (line, http_only) = match raw.strip_prefix(HTTPONLY_PREFIX) {
            Some(rest) => (rest, true),
            None => (raw, false),
        };
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('$') {
            continue;
        }

        let invalid = || CookieFileError::InvalidLine(index + 1, raw.to_owned());
        let fields: Vec<&str> = line.split('\t').collect();
        let [domain, domain_specified, path, secure, expires, name, value] = fields[..] else {
            return Err(invalid());
        };

        let domain_specified = domain_specified == "TRUE";
        if domain_specified != domain.starts_with('.') {
            return Err(invalid());
        }

        // A bare `value` line is stored by browsers with an empty name
        let (name, value) = if name.is_empty() {
            (value.to_owned(), None)
        } else {
            (name.to_owned(), Some(value.to_owned()))
        };

        records.push(CookieRecord {
            domain: domain.to_owned(),
            domain_specified,
            path: path.to_owned(),
            secure: secure == "TRUE",
            expires: expires.parse().ok(),
            name,
            value,
            http_only,
        });
    }
    Ok(records)
}

/// Pick the session cookie, giving earlier entries of [`SUPPORTED_DOMAINS`] priority over file
/// order.
pub fn find_session_credential(records: &[CookieRecord]) -> Option<Credential> {
    SUPPORTED_DOMAINS.iter().find_map(|domain| {
        records
            .iter()
            .find(|c| c.name == SESSION_COOKIE && c.domain.contains(domain))
            .map(|c| {
                tracing::info!("Found {SESSION_COOKIE} cookie for {}", c.domain);
                Credential::from_ndus(c.value.as_deref().unwrap_or_default())
            })
    })
}

/// Read the cookie file at `path` and return the Terabox session credential, if any.
///
/// A missing or malformed file is logged and treated the same as a file without a session
/// cookie.
pub async fn load_session_credential(path: &Path) -> Option<Credential> {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::error!("{} not found", path.display());
            return None;
        }
        Err(e) => {
            tracing::error!("Error reading {}: {}", path.display(), CookieFileError::Read(e));
            return None;
        }
    };

    let records = match parse_netscape(&content) {
        Ok(records) => records,
        Err(e) => {
            tracing::error!("Error reading {}: {e}", path.display());
            return None;
        }
    };

    let credential = find_session_credential(&records);
    if credential.is_none() {
        tracing::error!("No {SESSION_COOKIE} cookie found for any Terabox domain");
    }
    credential
}
