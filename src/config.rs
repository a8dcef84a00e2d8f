use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use figment::providers::{Env, Format, Toml};
use figment::Figment;
use serde::Deserialize;

use crate::terabox::ClientOptions;

pub static CONFIG_FILE: &str = "config.toml";
pub static ENV_PREFIX: &str = "TERABOX_";

#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_cookies_file")]
    pub cookies_file: PathBuf,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default)]
    pub resolve_direct_link: bool,
}

fn default_host() -> String {
    "0.0.0.0".into()
}

fn default_port() -> u16 {
    8000
}

fn default_cookies_file() -> PathBuf {
    "cookies.txt".into()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_api_base() -> String {
    ClientOptions::default().api_base
}

impl Config {
    /// `config.toml` if present, overridden by `TERABOX_*` environment variables
    pub fn get_config() -> Result<Self> {
        Self::from_figment(
            Figment::new()
                .merge(Toml::file(CONFIG_FILE))
                .merge(Env::prefixed(ENV_PREFIX)),
        )
    }

    pub fn from_figment(figment: Figment) -> Result<Self> {
        Ok(figment.extract()?)
    }

    pub fn bind_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid bind address {}:{}", self.host, self.port))
    }

    pub fn client_options(&self) -> ClientOptions {
        ClientOptions {
            api_base: self.api_base.clone(),
            timeout: Duration::from_secs(self.request_timeout_secs),
            resolve_direct_link: self.resolve_direct_link,
        }
    }
}
