use axum::RequestPartsExt;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::CookieJar;
use secrecy::SecretString;
use tracing::instrument;

use crate::errors::PageError;
use crate::services::Session;
use crate::startup::AppState;

/// Name of the cookie holding the backend-issued session token.
pub const TOKEN_COOKIE: &str = "token";

impl FromRequestParts<AppState> for Session {
    type Rejection = PageError;

    #[instrument(name = "Extracting Session", skip(state, parts))]
    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .extract::<CookieJar>()
            .await
            .ok()
            .and_then(|jar| jar.get(TOKEN_COOKIE).map(|c| c.value().to_string()))
            .map(SecretString::from);

        state.auth_service.authenticate(token).await
    }
}
