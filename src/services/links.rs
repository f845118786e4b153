use axum::http::HeaderValue;
use reqwest::{StatusCode, Url};
use tracing::instrument;

use crate::{
    errors::{AUTH_PAGE, BackendError, LOGIN_PAGE, PageError},
    models::LookupResponse,
    services::backend::BackendClient,
};

#[derive(Clone, Debug)]
pub struct LinkService {
    backend: BackendClient,
}

impl LinkService {
    pub fn new(backend: BackendClient) -> Self {
        Self { backend }
    }

    /// Looks `slug` up and returns the URL to redirect to.
    #[instrument(name = "Service: Resolve slug", skip(self))]
    pub async fn resolve(&self, slug: &str) -> Result<String, PageError> {
        if slug.trim().is_empty() {
            tracing::warn!("Empty slug, not asking the backend");
            return Err(PageError::NotFound);
        }

        if is_reserved(slug) {
            tracing::warn!("Slug names a front-end page, not asking the backend");
            return Err(PageError::NotFound);
        }

        let url = self.backend.endpoint(&["v1", "url", slug])?;
        let reply = self.backend.get_json::<LookupResponse>(url, None).await?;

        let lookup = match reply.body {
            Ok(lookup) => lookup,
            Err(_) if reply.status == StatusCode::NOT_FOUND => {
                tracing::warn!("Backend answered 404 without a body");
                return Err(PageError::NotFound);
            }
            Err(e) => return Err(e.into()),
        };

        if let LookupResponse::Status { status } = lookup {
            if status == StatusCode::NOT_FOUND.as_u16() {
                tracing::warn!("Slug unknown to the backend");
                return Err(PageError::NotFound);
            }
            return Err(BackendError::UnexpectedStatus(status).into());
        }

        match lookup.first_target() {
            Some(target) => {
                let target = redirect_target(target)?;
                tracing::info!("Redirecting to {}", target);
                Ok(target)
            }
            None => {
                tracing::warn!("Backend returned no original_url");
                Err(PageError::NotFound)
            }
        }
    }
}

/// Pages the guards redirect to live beside `/{slug}` and are never links.
fn is_reserved(slug: &str) -> bool {
    [AUTH_PAGE, LOGIN_PAGE]
        .iter()
        .any(|page| page.trim_start_matches('/') == slug)
}

/// Only absolute web URLs are followed. The original spelling is kept when
/// it is already a valid `Location` value.
fn redirect_target(raw: &str) -> Result<String, BackendError> {
    let parsed = Url::parse(raw)
        .map_err(|e| BackendError::Malformed(format!("original_url {raw:?}: {e}")))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(BackendError::Malformed(format!(
            "original_url {raw:?} is not a web address"
        )));
    }

    if raw.is_ascii() && HeaderValue::from_str(raw).is_ok() {
        Ok(raw.to_string())
    } else {
        Ok(parsed.to_string())
    }
}
