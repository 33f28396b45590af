use thiserror::Error;

use crate::api::ParseError;
use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("invalid http client configuration: {0}")]
    Build(#[source] reqwest::Error),
    #[error("request `{endpoint}` failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("request `{endpoint}` returned status {status}")]
    Http {
        endpoint: String,
        status: reqwest::StatusCode,
    },
    #[error("couldn't decode `{endpoint}` response: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("couldn't parse `{endpoint}` response: {source}")]
    Parse {
        endpoint: String,
        #[source]
        source: ParseError,
    },
    #[error("server answered status `{actual}`, expected `{expected}`")]
    UnexpectedStatus {
        expected: &'static str,
        actual: String,
    },
}
pub type Result<T> = std::result::Result<T, Error>;
