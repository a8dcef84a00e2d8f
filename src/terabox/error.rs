use std::error::Error;
use std::fmt::Display;

#[derive(Debug)]
pub enum ClientError {
    Init(String),
    Remote(String),
    Http(reqwest::Error),
}

impl ClientError {
    pub(crate) fn remote(msg: &str) -> Self {
        Self::Remote(msg.to_owned())
    }
}

impl Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Init(msg) => write!(f, "{msg}"),
            Self::Remote(msg) => write!(f, "{msg}"),
            Self::Http(e) => write!(f, "{e}"),
        }
    }
}

impl Error for ClientError {}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        Self::Http(e)
    }
}
