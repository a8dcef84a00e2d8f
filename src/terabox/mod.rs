mod client;
mod error;

pub use client::{find_between, formatted_size, ClientOptions, TeraboxClient};
pub use error::ClientError;
