use reqwest::StatusCode;
use thiserror::Error;

use crate::media::MediaKind;

/// Error codes the platform returns when the supplied access token is no longer accepted.
const TOKEN_REJECTED_CODES: [i64; 2] = [40014, 42001];

#[derive(Debug, Error)]
pub enum Error {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("authentication failed: {0}")]
    Auth(#[from] AuthError),
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),
    #[error("api error {code}: {message}")]
    Api { code: i64, message: String },
    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("unexpected http status {0}: {1}")]
    HttpStatus(StatusCode, String),
    #[error("config error: {0}")]
    Config(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True when a business endpoint refused the access token itself.
    ///
    /// Callers can react with `WeComClient::invalidate_token` and try again; the
    /// client never does this on its own.
    pub fn is_token_rejected(&self) -> bool {
        matches!(self, Error::Api { code, .. } if TOKEN_REJECTED_CODES.contains(code))
    }
}

/// Failures while obtaining an access token from the identity provider.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("corp id and corp secret must both be set")]
    MissingCredentials,
    #[error("{message} (errcode {code})")]
    Rejected { code: i64, message: String },
    #[error("token request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("token response malformed: {0}")]
    Decode(#[from] serde_json::Error),
}

impl AuthError {
    /// Provider message for rejections, otherwise the rendered error.
    pub fn message(&self) -> String {
        match self {
            AuthError::Rejected { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

/// Caller-side checks that fail before anything is sent.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("invalid media type '{0}', must be image, voice, video or file")]
    UnknownMediaType(String),
    #[error("file size must be at least {min} bytes, got {size}")]
    TooSmall { size: u64, min: u64 },
    #[error("{kind} size {size} exceeds the {max} byte limit")]
    TooLarge { kind: MediaKind, size: u64, max: u64 },
    #[error("{kind} must use one of {allowed:?}, got '{found}'")]
    WrongExtension {
        kind: MediaKind,
        found: String,
        allowed: &'static [&'static str],
    },
    #[error("message needs at least one of touser, toparty or totag")]
    MissingRecipients,
    #[error("article count must be between 1 and {max}, got {count}")]
    ArticleCount { count: usize, max: usize },
    #[error("media path has no file name")]
    MissingFileName,
    #[error("mobile number must not be empty")]
    EmptyMobile,
}
