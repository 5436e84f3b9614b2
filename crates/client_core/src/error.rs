use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

/// Failure of a single backend call.
///
/// `Display` yields the text shown to the user: the server's `detail` when it
/// sent one, otherwise a generic status or transport message.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("invalid api url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("'{0}' cannot be used as a user tag")]
    DotSegment(String),
    #[error("{}", status_message(.status, .detail))]
    Status {
        status: StatusCode,
        detail: Option<String>,
    },
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

fn status_message(status: &StatusCode, detail: &Option<String>) -> String {
    match detail {
        Some(detail) => detail.clone(),
        None => format!("Request failed with status code {}", status.as_u16()),
    }
}

impl RequestError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport(err) => err.status(),
            Self::InvalidUrl { .. } | Self::DotSegment(_) => None,
        }
    }

    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Status { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("{0}")]
    Validation(String),
    #[error("another request is already in flight")]
    Busy,
    #[error(transparent)]
    Request(#[from] RequestError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read settings file '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse settings file '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid value for {key}: '{value}'")]
    InvalidValue { key: String, value: String },
}
