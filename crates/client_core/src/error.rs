use reqwest::StatusCode;
use shared::error::{ErrorBody, ValidationErrors};
use thiserror::Error;

pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid base url '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error("request could not be completed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("{status}: {body}")]
    Http { status: StatusCode, body: String },
    #[error("response body is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ClientError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The backend's own `message` field, when the failure carried one.
    pub fn server_message(&self) -> Option<String> {
        match self {
            Self::Http { body, .. } => ErrorBody::message_from(body),
            _ => None,
        }
    }

    /// One-line text for a notice, preferring the server's wording.
    pub fn notice_text(&self, fallback: &str) -> String {
        self.server_message()
            .unwrap_or_else(|| fallback.to_string())
    }
}

/// Why a create dialog submission did not produce a record.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
    #[error(transparent)]
    Request(#[from] ClientError),
}

impl SubmitError {
    pub fn validation(&self) -> Option<&ValidationErrors> {
        match self {
            Self::Validation(errors) => Some(errors),
            Self::Request(_) => None,
        }
    }
}
