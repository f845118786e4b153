use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde_json::json;
use thiserror::Error;

/// Where a browser without a session is sent.
pub const AUTH_PAGE: &str = "/auth";

/// Where a browser whose session the backend rejected is sent.
pub const LOGIN_PAGE: &str = "/login";

/// Anything that went wrong talking to the URL-shortener API.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Backend origin is not a usable base URL: {0}")]
    InvalidOrigin(String),

    #[error("Backend did not answer in time")]
    Timeout,

    #[error("Backend request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("Backend sent a malformed response: {0}")]
    Malformed(String),

    #[error("Backend answered with unexpected status {0}")]
    UnexpectedStatus(u16),

    #[error("Backend rejected the request: {0}")]
    Rejected(String),
}

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            BackendError::Timeout
        } else if err.is_decode() {
            BackendError::Malformed(err.to_string())
        } else {
            BackendError::Transport(err)
        }
    }
}

impl BackendError {
    /// Failures that may go away if the same GET is sent again.
    pub fn is_transient(&self) -> bool {
        matches!(self, BackendError::Timeout | BackendError::Transport(_))
    }
}

#[derive(Debug, Error)]
pub enum PageError {
    #[error("Not found")]
    NotFound,

    #[error("No session token")]
    Unauthenticated,

    #[error("Session token rejected")]
    Unauthorized,

    #[error(transparent)]
    Backend(#[from] BackendError),
}

impl PageError {
    /// The page a guard sends the browser to instead of failing.
    pub fn redirect_target(&self) -> Option<&'static str> {
        match self {
            PageError::Unauthenticated => Some(AUTH_PAGE),
            PageError::Unauthorized => Some(LOGIN_PAGE),
            _ => None,
        }
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            PageError::Unauthenticated | PageError::Unauthorized => {
                let target = self.redirect_target().unwrap_or(AUTH_PAGE);
                return Redirect::temporary(target).into_response();
            }
            PageError::NotFound => (StatusCode::NOT_FOUND, "Not found"),
            PageError::Backend(BackendError::Timeout) => (
                StatusCode::GATEWAY_TIMEOUT,
                "The link service took too long to answer",
            ),
            PageError::Backend(e) => {
                tracing::error!("Backend failure: {:?}", e);
                (StatusCode::BAD_GATEWAY, "The link service is unavailable")
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
