use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use tracing::instrument;

use crate::{
    errors::{BackendError, PageError},
    models::{ProfileResponse, profile::UNAUTHORIZED},
    services::backend::BackendClient,
};

/// A browser session the backend vouched for.
#[derive(Debug)]
pub struct Session {
    pub user_id: String,
    pub token: SecretString,
}

#[derive(Clone, Debug)]
pub struct AuthService {
    backend: BackendClient,
}

impl AuthService {
    pub fn new(backend: BackendClient) -> Self {
        Self { backend }
    }

    /// Checks the `token` cookie against the backend profile endpoint.
    ///
    /// A missing token fails with [`PageError::Unauthenticated`] before any
    /// request is made; a token the backend refuses fails with
    /// [`PageError::Unauthorized`]. Both are turned into redirects by the
    /// page layer.
    #[instrument(name = "AuthService: Authenticate", skip(self, token))]
    pub async fn authenticate(&self, token: Option<SecretString>) -> Result<Session, PageError> {
        let token = match token {
            Some(t) if !t.expose_secret().is_empty() => t,
            _ => {
                tracing::warn!("No session token in request");
                return Err(PageError::Unauthenticated);
            }
        };

        let url = self.backend.endpoint(&["v1", "user", "profile"])?;
        let reply = self
            .backend
            .get_json::<ProfileResponse>(url, Some(&token))
            .await?;

        if reply.status == StatusCode::UNAUTHORIZED {
            tracing::warn!("Backend refused the session token");
            return Err(PageError::Unauthorized);
        }

        match reply.body? {
            ProfileResponse::Failure { error } if error == UNAUTHORIZED => {
                tracing::warn!("Backend refused the session token");
                Err(PageError::Unauthorized)
            }
            ProfileResponse::Failure { error } => {
                tracing::error!("Profile lookup failed: {}", error);
                Err(BackendError::Rejected(error).into())
            }
            ProfileResponse::Profile(_) if !reply.status.is_success() => {
                Err(BackendError::UnexpectedStatus(reply.status.as_u16()).into())
            }
            ProfileResponse::Profile(profile) => {
                tracing::info!(
                    user_id = %profile.id,
                    username = profile.username.as_deref().unwrap_or("-"),
                    "Session authenticated"
                );
                Ok(Session {
                    user_id: profile.id,
                    token,
                })
            }
        }
    }
}
