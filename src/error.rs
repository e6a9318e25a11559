//! Error taxonomy shared by every operation in the crate.
//!
//! All failures are configuration or programmer errors detected
//! synchronously. Nothing here is retried: a call either produces its full
//! result or fails with one of these variants.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Malformed or contradictory source configuration.
    #[error("configuration error: {0}")]
    Configuration(String),
    /// A request named a source the registry does not know, or omitted the
    /// source in multi-source mode without a `default_source`.
    #[error("{}", unknown_source_message(.0.as_deref()))]
    UnknownSource(Option<String>),
    /// Inputs of the wrong shape (empty path, bad tolerance, unknown keys).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

fn unknown_source_message(source: Option<&str>) -> String {
    match source {
        Some(id) => format!("unknown source '{id}'"),
        None => "no source given and no default_source configured".to_string(),
    }
}

pub type Result<T> = std::result::Result<T, Error>;
