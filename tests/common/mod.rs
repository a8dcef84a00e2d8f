//! Shared test utilities.

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use tempfile::TempDir;
use terabox_link::cookies::Credential;
use terabox_link::{create_router, AppState, FileDescriptor, ResolveError, ShareResolver};
use tower::ServiceExt;

pub const SHARE_URL: &str = "https://www.terabox.com/s/1AbCdEf";

/// Resolver returning a canned outcome and recording what it was asked.
/// Note: #[allow(dead_code)] because each test file compiles common/ separately.
#[allow(dead_code)]
#[derive(Clone)]
pub struct FakeResolver {
    outcome: Result<FileDescriptor, ResolveError>,
    pub calls: Arc<AtomicUsize>,
    pub last_credential: Arc<std::sync::Mutex<Option<Credential>>>,
}

#[allow(dead_code)]
impl FakeResolver {
    pub fn returning(outcome: Result<FileDescriptor, ResolveError>) -> Self {
        Self {
            outcome,
            calls: Arc::new(AtomicUsize::new(0)),
            last_credential: Arc::new(std::sync::Mutex::new(None)),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ShareResolver for FakeResolver {
    async fn resolve(
        &self,
        _url: &str,
        credential: &Credential,
    ) -> Result<FileDescriptor, ResolveError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_credential.lock().unwrap() = Some(credential.clone());
        self.outcome.clone()
    }
}

/// A router backed by a fake resolver and a temporary cookie file.
#[allow(dead_code)]
pub struct TestServer {
    pub router: axum::Router,
    pub resolver: FakeResolver,
    pub cookies_file: PathBuf,
    _temp_dir: TempDir,
}

#[allow(dead_code)]
impl TestServer {
    /// `cookies` is written verbatim to the cookie file; `None` leaves it absent.
    pub fn new(resolver: FakeResolver, cookies: Option<&str>) -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
        let cookies_file = temp_dir.path().join("cookies.txt");
        if let Some(content) = cookies {
            std::fs::write(&cookies_file, content).expect("Failed to write cookie file");
        }

        let state = AppState::new(resolver.clone(), &cookies_file);
        Self {
            router: create_router(state),
            resolver,
            cookies_file,
            _temp_dir: temp_dir,
        }
    }

    /// GET `uri`, returning status, raw body and the body parsed as JSON (Null if empty).
    pub async fn get(&self, uri: &str) -> (StatusCode, Vec<u8>, Value) {
        let request = Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        let response = self.router.clone().oneshot(request).await.unwrap();

        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec();
        let json = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body).unwrap_or(Value::Null)
        };
        (status, body, json)
    }
}

/// Cookie file containing a single `ndus` cookie for `domain`.
#[allow(dead_code)]
pub fn cookie_file(domain: &str, value: &str) -> String {
    format!("# Netscape HTTP Cookie File\n{domain}\tTRUE\t/\tFALSE\t0\tndus\t{value}\n")
}

/// `/?url=` with the share URL percent-encoded.
#[allow(dead_code)]
pub fn details_uri(share_url: &str) -> String {
    let query: String = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("url", share_url)
        .finish();
    format!("/?{query}")
}
