use std::error::Error;
use std::fmt::Display;
use std::future::Future;

use crate::cookies::Credential;
use crate::terabox::{ClientError, ClientOptions, TeraboxClient};

/// Metadata of a shared file as reported by the remote service
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FileDescriptor {
    pub file_name: Option<String>,
    pub size_bytes: Option<u64>,
    pub download_link: Option<String>,
    /// Kept loosely typed, the service does not always send a string here
    pub thumbnail: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// The client could not be built from the credential
    Init(String),
    /// The remote service reported a problem with the share
    Remote(String),
    /// Anything else that went wrong while talking to the service
    Unexpected(String),
}

impl Display for ResolveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Init(msg) | Self::Remote(msg) | Self::Unexpected(msg) => f.write_str(msg),
        }
    }
}

impl Error for ResolveError {}

/// Turns a share URL into file metadata using a session credential
pub trait ShareResolver: Send + Sync + 'static {
    fn resolve(
        &self,
        url: &str,
        credential: &Credential,
    ) -> impl Future<Output = Result<FileDescriptor, ResolveError>> + Send;
}

/// Resolves shares through a fresh [`TeraboxClient`] per request
#[derive(Debug, Clone, Default)]
pub struct TeraboxResolver {
    options: ClientOptions,
}

impl TeraboxResolver {
    pub fn new(options: ClientOptions) -> Self {
        Self { options }
    }
}

impl ShareResolver for TeraboxResolver {
    async fn resolve(
        &self,
        url: &str,
        credential: &Credential,
    ) -> Result<FileDescriptor, ResolveError> {
        let client = TeraboxClient::with_options(credential.as_str(), &self.options)
            .map_err(|e| ResolveError::Init(e.to_string()))?;
        tracing::info!("Terabox client initialized for: {url}");

        client.file_info(url).await.map_err(|e| match e {
            ClientError::Init(msg) => ResolveError::Init(msg),
            ClientError::Remote(msg) => ResolveError::Remote(msg),
            ClientError::Http(e) => ResolveError::Unexpected(e.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn bad_credential_is_an_init_error() {
        let resolver = TeraboxResolver::default();
        let credential = Credential::from_ndus("line\nbreak");
        let result = resolver
            .resolve("https://www.terabox.com/s/1abc", &credential)
            .await;
        assert!(matches!(result, Err(ResolveError::Init(_))));
    }

    #[tokio::test]
    async fn transport_failure_is_unexpected() {
        let resolver = TeraboxResolver::new(ClientOptions {
            timeout: std::time::Duration::from_secs(2),
            ..Default::default()
        });
        let result = resolver
            .resolve("http://127.0.0.1:1/s/1abc", &Credential::from_ndus("tok"))
            .await;
        assert!(matches!(result, Err(ResolveError::Unexpected(_))));
    }

    #[test]
    fn display_is_the_bare_message() {
        assert_eq!(ResolveError::Remote("share expired".into()).to_string(), "share expired");
    }
}
