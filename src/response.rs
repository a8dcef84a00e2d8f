use serde::Serialize;

use crate::resolver::FileDescriptor;

/// Public JSON shape of a resolved share.
///
/// Key names, including the `tumbanail` typo and the capitalized `Size`, are what existing
/// clients parse. Fields are declared in sorted key order so the body matches byte for byte.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileResponse {
    #[serde(rename = "Size")]
    pub size: String,
    pub bytes: u64,
    pub direct_link: String,
    pub name: String,
    pub tumbanail: Option<String>,
}

impl From<FileDescriptor> for FileResponse {
    fn from(descriptor: FileDescriptor) -> Self {
        let bytes = descriptor.size_bytes.unwrap_or(0);
        Self {
            size: format!("{} mb", megabytes(bytes)),
            bytes,
            direct_link: descriptor.download_link.unwrap_or_default(),
            name: descriptor.file_name.unwrap_or_else(|| "unknown".into()),
            tumbanail: thumbnail(descriptor.thumbnail),
        }
    }
}

/// Only non-empty `https://` strings are passed through
fn thumbnail(value: Option<serde_json::Value>) -> Option<String> {
    match value {
        Some(serde_json::Value::String(url)) if url.starts_with("https://") => Some(url),
        None | Some(serde_json::Value::Null) => {
            tracing::info!("No thumbnail available, setting to null");
            None
        }
        Some(serde_json::Value::String(url)) if url.is_empty() => {
            tracing::info!("No thumbnail available, setting to null");
            None
        }
        Some(other) => {
            tracing::warn!("Invalid thumbnail format: {other}, setting to null");
            None
        }
    }
}

/// Mebibytes rounded to two places, printed with the fewest digits (at least one) after the
/// decimal point: `2.0`, `1.5`, `0.01`
fn megabytes(bytes: u64) -> String {
    let mut s = format!("{:.2}", bytes as f64 / (1024.0 * 1024.0));
    while s.ends_with('0') && !s.ends_with(".0") {
        s.pop();
    }
    s
}
