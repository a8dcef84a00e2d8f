use url::Url;

/// Terabox mirrors, in the priority order used when picking a session cookie
pub static SUPPORTED_DOMAINS: [&str; 6] = [
    "terabox.com",
    "terabox.app",
    "terabox.me",
    "1024terabox.com",
    "teraboxd.com",
    "terabox.club",
];

/// Checks whether `url` points at a known Terabox host.
///
/// The host only has to contain one of [`SUPPORTED_DOMAINS`], so lookalike hosts such as
/// `evil-terabox.com.attacker.net` are accepted too.
pub fn is_supported(url: &str) -> bool {
    let valid = match Url::parse(url) {
        Ok(parsed) => parsed
            .host_str()
            .filter(|host| !host.is_empty())
            .map(|host| SUPPORTED_DOMAINS.iter().any(|domain| host.contains(domain)))
            .unwrap_or(false),
        Err(e) => {
            tracing::error!("URL validation failed: {e}");
            false
        }
    };
    tracing::info!(
        "URL check: {url} - {}",
        if valid { "Valid" } else { "Invalid" }
    );
    valid
}
