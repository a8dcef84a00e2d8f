use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::resolver::ShareResolver;

/// Handler state; holds no per-request data
pub struct AppState<R> {
    pub resolver: Arc<R>,
    pub cookies_file: Arc<PathBuf>,
}

impl<R: ShareResolver> AppState<R> {
    pub fn new(resolver: R, cookies_file: impl AsRef<Path>) -> Self {
        Self {
            resolver: Arc::new(resolver),
            cookies_file: Arc::new(cookies_file.as_ref().to_path_buf()),
        }
    }
}

// Derived Clone would require `R: Clone`
impl<R> Clone for AppState<R> {
    fn clone(&self) -> Self {
        Self {
            resolver: self.resolver.clone(),
            cookies_file: self.cookies_file.clone(),
        }
    }
}
