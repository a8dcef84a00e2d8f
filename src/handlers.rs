use axum::extract::{RawQuery, State};
use axum::http::StatusCode;
use axum::Json;

use crate::cookies::load_session_credential;
use crate::domain::is_supported;
use crate::error::{ApiError, ApiResult};
use crate::resolver::ShareResolver;
use crate::response::FileResponse;
use crate::state::AppState;

/// First value of `key` in a raw query string
fn query_param(query: Option<&str>, key: &str) -> Option<String> {
    url::form_urlencoded::parse(query?.as_bytes())
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
}

/// GET /?url=<share url>
pub async fn get_details<R: ShareResolver>(
    State(state): State<AppState<R>>,
    RawQuery(query): RawQuery,
) -> ApiResult<Json<FileResponse>> {
    let Some(url) = query_param(query.as_deref(), "url").filter(|url| !url.is_empty()) else {
        tracing::error!("No URL provided");
        return Err(ApiError::MissingInput);
    };

    if !is_supported(&url) {
        tracing::error!("Invalid Terabox URL: {url}");
        return Err(ApiError::InvalidUrl);
    }

    let Some(credential) = load_session_credential(&state.cookies_file).await else {
        tracing::error!("No valid ndus cookie found");
        return Err(ApiError::MissingCredential);
    };

    let descriptor = match state.resolver.resolve(&url, &credential).await {
        Ok(descriptor) => descriptor,
        Err(e) => {
            let e = ApiError::from(e);
            tracing::error!(url = %url, "{e}");
            return Err(e);
        }
    };
    tracing::info!("Got file info: {descriptor:?}");

    Ok(Json(FileResponse::from(descriptor)))
}

/// GET /favicon.ico
pub async fn favicon() -> StatusCode {
    StatusCode::NO_CONTENT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_param_takes_first_decoded_value() {
        assert_eq!(
            query_param(Some("url=https%3A%2F%2Fterabox.com%2Fs%2F1&url=second"), "url"),
            Some("https://terabox.com/s/1".into())
        );
        assert_eq!(query_param(Some("other=1"), "url"), None);
        assert_eq!(query_param(None, "url"), None);
        assert_eq!(query_param(Some("url="), "url"), Some(String::new()));
    }
}
