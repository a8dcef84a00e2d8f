use std::time::Duration;

use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{redirect, Url};
use serde::{Deserialize, Deserializer};

use super::ClientError;
use crate::resolver::FileDescriptor;

static DEFAULT_API_BASE: &str = "https://www.terabox.app";
static BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
    (KHTML, like Gecko) Chrome/135.0.0.0 Safari/537.36 Edg/135.0.0.0";
static BROWSER_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,\
    image/avif,image/webp,image/apng,*/*;q=0.8";
static JS_TOKEN_BOUNDS: (&str, &str) = ("fn%28%22", "%22%29");
static LOG_ID_BOUNDS: (&str, &str) = ("dp-logid=", "&");

#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub api_base: String,
    pub timeout: Duration,
    /// Follow the `dlink` redirect and report the final location instead
    pub resolve_direct_link: bool,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.into(),
            timeout: Duration::from_secs(30),
            resolve_direct_link: false,
        }
    }
}

/// Minimal Terabox web client, authenticated by a `Cookie` header
pub struct TeraboxClient {
    http: reqwest::Client,
    no_redirect: reqwest::Client,
    api_base: Url,
    resolve_direct_link: bool,
}

#[derive(Debug, Deserialize)]
struct ShareList {
    #[serde(default, deserialize_with = "deserialize_errno")]
    errno: i64,
    #[serde(default, deserialize_with = "deserialize_errmsg")]
    errmsg: Option<String>,
    #[serde(default)]
    list: Vec<ShareEntry>,
}

#[derive(Debug, Deserialize)]
struct ShareEntry {
    server_filename: Option<String>,
    dlink: Option<String>,
    #[serde(default, deserialize_with = "deserialize_size")]
    size: Option<u64>,
    /// Usually `{"url1": .., "url3": ..}`, but not always an object
    thumbs: Option<serde_json::Value>,
}

/// Terabox sends sizes as numbers or numeric strings
fn deserialize_size<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Number(n) => n.as_u64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

fn deserialize_errno<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Number(n) => n.as_i64().unwrap_or(-1),
        serde_json::Value::String(s) => s.trim().parse().unwrap_or(-1),
        serde_json::Value::Null => 0,
        _ => -1,
    })
}

fn deserialize_errmsg<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => Some(s),
        _ => None,
    })
}

impl TeraboxClient {
    pub fn new(cookie: &str) -> Result<Self, ClientError> {
        Self::with_options(cookie, &ClientOptions::default())
    }

    pub fn with_options(cookie: &str, options: &ClientOptions) -> Result<Self, ClientError> {
        if cookie.is_empty() {
            return Err(ClientError::Init("Cookie cannot be empty.".into()));
        }
        let api_base = Url::parse(&options.api_base)
            .map_err(|e| ClientError::Init(format!("invalid API base {}: {e}", options.api_base)))?;

        let mut headers = HeaderMap::new();
        headers.insert(
            header::USER_AGENT,
            HeaderValue::from_static(BROWSER_USER_AGENT),
        );
        headers.insert(header::ACCEPT, HeaderValue::from_static(BROWSER_ACCEPT));
        headers.insert(
            header::ACCEPT_LANGUAGE,
            HeaderValue::from_static("en-US,en;q=0.9"),
        );
        headers.insert(
            header::COOKIE,
            HeaderValue::from_str(cookie)
                .map_err(|e| ClientError::Init(format!("invalid cookie header: {e}")))?,
        );

        let build = |policy: redirect::Policy| {
            reqwest::Client::builder()
                .use_rustls_tls()
                .timeout(options.timeout)
                .default_headers(headers.clone())
                .redirect(policy)
                .build()
                .map_err(|e| ClientError::Init(e.to_string()))
        };

        Ok(Self {
            http: build(redirect::Policy::default())?,
            no_redirect: build(redirect::Policy::none())?,
            api_base,
            resolve_direct_link: options.resolve_direct_link,
        })
    }

    /// Look up the first file of a share link
    pub async fn file_info(&self, link: &str) -> Result<FileDescriptor, ClientError> {
        if link.is_empty() {
            return Err(ClientError::remote("Link cannot be empty."));
        }

        // Short links redirect to a page carrying the `surl` share id
        let landing = self.http.get(link).send().await?;
        if !landing.status().is_success() {
            return Err(ClientError::remote("Failed to fetch the initial link."));
        }
        let share_url = landing.url().clone();
        let surl = share_url
            .query_pairs()
            .find(|(key, value)| key == "surl" && !value.is_empty())
            .map(|(_, value)| value.into_owned())
            .ok_or_else(|| ClientError::remote("Invalid link. Please check the link."))?;

        let page = landing.text().await?;
        let (Some(js_token), Some(log_id)) = (
            find_between(&page, JS_TOKEN_BOUNDS.0, JS_TOKEN_BOUNDS.1),
            find_between(&page, LOG_ID_BOUNDS.0, LOG_ID_BOUNDS.1),
        ) else {
            return Err(ClientError::remote("Required tokens not found."));
        };

        let endpoint = self
            .api_base
            .join("/share/list")
            .map_err(|e| ClientError::Init(e.to_string()))?;
        let list = self
            .http
            .get(endpoint)
            .query(&[
                ("app_id", "250528"),
                ("web", "1"),
                ("channel", "dubox"),
                ("clienttype", "0"),
                ("jsToken", js_token),
                ("dplogid", log_id),
                ("page", "1"),
                ("num", "20"),
                ("order", "time"),
                ("desc", "1"),
                ("site_referer", share_url.as_str()),
                ("shorturl", surl.as_str()),
                ("root", "1"),
            ])
            .send()
            .await?
            .json::<ShareList>()
            .await?;

        if list.errno != 0 {
            return Err(ClientError::Remote(
                list.errmsg.unwrap_or_else(|| "Unknown error".into()),
            ));
        }
        let entry = list
            .list
            .into_iter()
            .next()
            .ok_or_else(|| ClientError::remote("Invalid response data."))?;

        let mut download_link = entry.dlink;
        if self.resolve_direct_link {
            if let Some(dlink) = &download_link {
                match self.direct_link(dlink).await {
                    Ok(Some(location)) => download_link = Some(location),
                    Ok(None) => {}
                    Err(e) => tracing::warn!("Could not resolve direct link, keeping dlink: {e}"),
                }
            }
        }

        let descriptor = FileDescriptor {
            file_name: entry.server_filename,
            size_bytes: entry.size,
            download_link,
            thumbnail: entry.thumbs.and_then(|t| t.get("url3").cloned()),
        };
        tracing::debug!(
            "Resolved {} ({})",
            descriptor.file_name.as_deref().unwrap_or("unnamed file"),
            formatted_size(descriptor.size_bytes.unwrap_or(0))
        );
        Ok(descriptor)
    }

    async fn direct_link(&self, dlink: &str) -> Result<Option<String>, ClientError> {
        let response = self
            .no_redirect
            .head(dlink)
            .header(header::REFERER, "https://terabox.com/")
            .send()
            .await?;
        Ok(response
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned))
    }
}

/// Text between the first `start` and the next `end` after it; `None` if either is missing or
/// the span is empty
pub fn find_between<'a>(haystack: &'a str, start: &str, end: &str) -> Option<&'a str> {
    let from = haystack.find(start)? + start.len();
    let len = haystack[from..].find(end)?;
    Some(&haystack[from..from + len]).filter(|s| !s.is_empty())
}

/// Human readable size the way the Terabox web UI shows it
pub fn formatted_size(size_bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = 1024 * 1024;
    let (size, unit) = if size_bytes >= MB {
        (size_bytes as f64 / MB as f64, "MB")
    } else if size_bytes >= KB {
        (size_bytes as f64 / KB as f64, "KB")
    } else {
        (size_bytes as f64, "bytes")
    };
    format!("{size:.2} {unit}")
}
