use std::{error::Error, fmt::Display};

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::resolver::ResolveError;

/// Body of every non-2xx response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    MissingInput,
    InvalidUrl,
    MissingCredential,
    ClientInit(String),
    RemoteResolution(String),
    Unexpected(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingInput
            | Self::InvalidUrl
            | Self::MissingCredential
            | Self::RemoteResolution(_) => StatusCode::BAD_REQUEST,
            Self::ClientInit(_) | Self::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingInput => write!(f, "No URL provided"),
            Self::InvalidUrl => write!(f, "Invalid Terabox URL"),
            Self::MissingCredential => write!(f, "No valid ndus cookie found in cookies.txt"),
            Self::ClientInit(msg) => write!(f, "TeraboxDL initialization failed: {msg}"),
            Self::RemoteResolution(msg) => write!(f, "Fetch failed: {msg}"),
            Self::Unexpected(msg) => write!(f, "Fetch error: {msg}"),
        }
    }
}

impl Error for ApiError {}

impl From<ResolveError> for ApiError {
    fn from(e: ResolveError) -> Self {
        match e {
            ResolveError::Init(msg) => Self::ClientInit(msg),
            ResolveError::Remote(msg) => Self::RemoteResolution(msg),
            ResolveError::Unexpected(msg) => Self::Unexpected(msg),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.to_string(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;
